//! Money helpers: fee schedule, amount parsing, transfer pre-checks, formatting

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::result::{Error, Result};

/// Amounts the send view offers as one-tap presets
pub const PRESET_AMOUNTS: [u32; 6] = [10, 25, 50, 100, 250, 500];

/// Transfer fee rate (1.5%)
pub fn fee_rate() -> Decimal {
    Decimal::new(15, 3)
}

/// Round to cents, half away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Fee charged on a transfer of `amount`, rounded to cents
pub fn transfer_fee(amount: Decimal) -> Decimal {
    round_cents(amount * fee_rate())
}

/// Parse a user-entered amount; rejects empty, non-numeric and non-positive input
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Please enter a valid amount"));
    }
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| Error::validation("Please enter a valid amount"))?;
    if amount <= Decimal::ZERO {
        return Err(Error::validation("Please enter a valid amount"));
    }
    Ok(amount)
}

/// Breakdown of a transfer before it is submitted
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferQuote {
    pub amount: Decimal,
    pub fee: Decimal,
    pub total: Decimal,
}

impl TransferQuote {
    pub fn for_amount(amount: Decimal) -> Self {
        let fee = transfer_fee(amount);
        Self {
            amount,
            fee,
            total: amount + fee,
        }
    }

    /// Parse the input and check it against the balance the user is looking at
    ///
    /// Both checks happen before any network call; a failing quote has no side
    /// effects.
    pub fn prepare(input: &str, available: Decimal) -> Result<Self> {
        let quote = Self::for_amount(parse_amount(input)?);
        if quote.total > available {
            return Err(Error::InsufficientBalance {
                required: quote.total,
                available,
            });
        }
        Ok(quote)
    }
}

/// Format an amount with its currency symbol and two decimals
///
/// Unknown currency codes are used verbatim as the prefix.
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    let symbol = match currency.trim().to_uppercase().as_str() {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "KES" => "KSh".to_string(),
        _ => currency.to_string(),
    };
    format!("{}{:.2}", symbol, round_cents(amount))
}

/// Format in US dollars
pub fn format_usd(amount: Decimal) -> String {
    format_currency(amount, "USD")
}
