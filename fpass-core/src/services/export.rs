//! CSV export of transaction history
//!
//! Header row `From,To,Amount,Fee,Date & Time`, one row per transaction,
//! every field quoted, rows joined with `\n`.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::money::round_cents;
use crate::domain::result::{Error, Result};
use crate::domain::Transaction;

pub const CSV_HEADERS: [&str; 5] = ["From", "To", "Amount", "Fee", "Date & Time"];

const UNKNOWN_PARTY: &str = "Unknown";

/// `transactions-YYYY-MM-DD.csv`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("transactions-{}.csv", date.format("%Y-%m-%d"))
}

fn party(name: &Option<String>) -> &str {
    name.as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(UNKNOWN_PARTY)
}

/// Write the CSV to any writer
pub fn write_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<()> {
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    let csv_err = |e: csv::Error| Error::Other(format!("Failed to write CSV: {}", e));

    csv.write_record(CSV_HEADERS).map_err(csv_err)?;
    for tx in transactions {
        let amount = format!("{:.2}", round_cents(tx.amount));
        let fee = format!("{:.2}", round_cents(tx.fee));
        let date = tx.created_at_display();
        csv.write_record([
            party(&tx.sender_name),
            party(&tx.receiver_name),
            amount.as_str(),
            fee.as_str(),
            date.as_str(),
        ])
        .map_err(csv_err)?;
    }
    csv.flush()?;
    Ok(())
}

/// Render the CSV to a string, without a trailing newline
pub fn to_csv_string(transactions: &[Transaction]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(transactions, &mut buffer)?;
    let mut text =
        String::from_utf8(buffer).map_err(|e| Error::Other(format!("CSV is not UTF-8: {}", e)))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Write the CSV to `path`, or to the default file name inside `dir`
pub fn export_to_file(
    transactions: &[Transaction],
    path: Option<&Path>,
    dir: &Path,
    today: NaiveDate,
) -> Result<PathBuf> {
    let target = match path {
        Some(p) => p.to_path_buf(),
        None => dir.join(default_file_name(today)),
    };
    let contents = to_csv_string(transactions)?;
    let mut file = File::create(&target)?;
    file.write_all(contents.as_bytes())?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn transactions() -> Vec<Transaction> {
        serde_json::from_value(json!([
            {
                "transaction_id": "TX-1",
                "sender_name": "Alice Cooper",
                "receiver_name": "Bob Marley",
                "amount": 100,
                "fee": 1.5,
                "type": "transfer",
                "created_at": "2026-03-04T10:15:00Z"
            },
            {
                "transaction_id": "TX-2",
                "receiver_name": "Alice Cooper",
                "amount": "500",
                "type": "add_funds",
                "created_at": "2026-03-05T08:00:00Z"
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_csv_has_header_and_one_line_per_transaction() {
        let csv = to_csv_string(&transactions()).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#""From","To","Amount","Fee","Date & Time""#);
        assert_eq!(
            lines[1],
            r#""Alice Cooper","Bob Marley","100.00","1.50","2026-03-04 10:15""#
        );
    }

    #[test]
    fn test_half_cents_round_like_the_display() {
        let txs: Vec<Transaction> = serde_json::from_value(json!([
            {
                "transaction_id": "TX-9",
                "sender_name": "A",
                "receiver_name": "B",
                "amount": "1.005",
                "fee": "0.015",
                "type": "transfer",
                "created_at": "2026-03-04T10:15:00Z"
            }
        ]))
        .unwrap();

        let csv = to_csv_string(&txs).unwrap();
        assert!(csv.ends_with(r#""A","B","1.01","0.02","2026-03-04 10:15""#));
    }

    #[test]
    fn test_missing_names_are_unknown() {
        let csv = to_csv_string(&transactions()).unwrap();
        let last = csv.lines().last().unwrap();
        assert!(last.starts_with(r#""Unknown","Alice Cooper","500.00","0.00""#));
    }

    #[test]
    fn test_empty_history_is_header_only() {
        let csv = to_csv_string(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_default_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(default_file_name(date), "transactions-2026-10-19.csv");
    }

    #[test]
    fn test_export_to_file_uses_default_name() {
        let dir = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let path = export_to_file(&transactions(), None, dir.path(), date).unwrap();

        assert_eq!(path, dir.path().join("transactions-2026-10-19.csv"));
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written.lines().count(), 3);
    }
}
