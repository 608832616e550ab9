//! Transaction domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire::{self, deserialize_optional_id};

/// Kind of ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Transfer,
    AddFunds,
    #[serde(other)]
    Other,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Transfer => "transfer",
            TransactionType::AddFunds => "add_funds",
            TransactionType::Other => "other",
        }
    }
}

/// A settled (or pending) transfer or top-up
///
/// Immutable once created; the client only lists and reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(alias = "id", deserialize_with = "wire::deserialize_id")]
    pub transaction_id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub sender_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub receiver_id: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(with = "wire::amount")]
    pub amount: Decimal,
    #[serde(with = "wire::amount", default)]
    pub fee: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    /// Amount plus fee, what the sender was debited
    pub fn total_debit(&self) -> Decimal {
        self.amount + self.fee
    }

    pub fn is_sent_by(&self, user_id: &str) -> bool {
        self.kind == TransactionType::Transfer && self.sender_id.as_deref() == Some(user_id)
    }

    pub fn is_received_by(&self, user_id: &str) -> bool {
        match self.kind {
            TransactionType::AddFunds => true,
            TransactionType::Transfer => self.receiver_id.as_deref() == Some(user_id),
            TransactionType::Other => false,
        }
    }

    /// Counterparty label from `user_id`'s point of view
    pub fn counterparty(&self, user_id: &str) -> String {
        if self.is_sent_by(user_id) {
            self.receiver_name.clone().unwrap_or_else(|| "Sent Money".to_string())
        } else if self.kind == TransactionType::AddFunds {
            self.sender_name.clone().unwrap_or_else(|| "Added Funds".to_string())
        } else {
            self.sender_name.clone().unwrap_or_else(|| "Received Money".to_string())
        }
    }

    /// Parse `created_at` in any of the formats the backend has been seen to use
    ///
    /// RFC 3339, RFC 2822 (`Mon, 20 Oct 2025 10:00:00 GMT`) and naive
    /// `YYYY-MM-DD HH:MM:SS[.fff]` (taken as UTC).
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    /// Display form of `created_at`; unparseable values pass through
    pub fn created_at_display(&self) -> String {
        match self.created_at_utc() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => self.created_at.clone().unwrap_or_default(),
        }
    }

    fn in_month_of(&self, now: DateTime<Utc>) -> bool {
        self.created_at_utc()
            .is_some_and(|dt| dt.year() == now.year() && dt.month() == now.month())
    }
}

/// History tab selection relative to the signed-in user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    All,
    Sent,
    Received,
}

impl Direction {
    pub fn matches(&self, tx: &Transaction, user_id: &str) -> bool {
        match self {
            Direction::All => true,
            Direction::Sent => tx.is_sent_by(user_id),
            Direction::Received => tx.is_received_by(user_id),
        }
    }

    pub fn apply<'a>(&self, txs: &'a [Transaction], user_id: &str) -> Vec<&'a Transaction> {
        txs.iter().filter(|tx| self.matches(tx, user_id)).collect()
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Direction::All),
            "sent" => Ok(Direction::Sent),
            "received" => Ok(Direction::Received),
            other => Err(format!(
                "unknown direction '{}'. Available: all, sent, received",
                other
            )),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::All => "all",
            Direction::Sent => "sent",
            Direction::Received => "received",
        })
    }
}

/// This calendar month's money in and out for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// Transfers sent, fees included
    pub sent: Decimal,
    /// Transfers received plus top-ups
    pub received: Decimal,
}

impl MonthlySummary {
    pub fn compute(txs: &[Transaction], user_id: &str, now: DateTime<Utc>) -> Self {
        txs.iter()
            .filter(|tx| tx.in_month_of(now))
            .fold(Self::default(), |mut acc, tx| {
                if tx.is_sent_by(user_id) {
                    acc.sent += tx.total_debit();
                } else if tx.is_received_by(user_id) {
                    acc.received += tx.amount;
                }
                acc
            })
    }
}
