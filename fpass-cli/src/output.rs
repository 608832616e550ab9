//! Output formatting utilities

use std::future::Future;
use std::time::Duration;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;

use fpass_core::domain::format_currency;
use fpass_core::Transaction;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Notice shown whenever the backend ends the session
pub fn session_expired() {
    error("Your session has expired. Please log in again.");
    eprintln!("{}", "Redirecting to login: run 'fpass login'".cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Key/value table without borders, for detail views
pub fn detail_table(rows: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table
}

pub fn money(amount: Decimal, currency: &str) -> String {
    format_currency(amount, currency)
}

/// Amount cell signed from `user_id`'s point of view: green in, red out
pub fn signed_amount_cell(tx: &Transaction, user_id: &str, currency: &str) -> Cell {
    if tx.is_sent_by(user_id) {
        Cell::new(format!("-{}", money(tx.total_debit(), currency))).fg(Color::Red)
    } else if tx.is_received_by(user_id) {
        Cell::new(format!("+{}", money(tx.amount, currency))).fg(Color::Green)
    } else {
        Cell::new(money(tx.amount, currency))
    }
}

/// Print pretty JSON
pub fn json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run `fut` behind a spinner on stderr
pub async fn with_spinner<F, T>(msg: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = fut.await;
    spinner.finish_and_clear();
    result
}
