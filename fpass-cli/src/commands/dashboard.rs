//! Dashboard command - balance, this month's totals and recent activity

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use comfy_table::Cell;
use fpass_core::Transaction;

use super::get_context;
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = ctx.auth.require_session()?;
    let dashboard =
        output::with_spinner("Loading dashboard...", ctx.dashboard.user_dashboard(Utc::now()))
            .await?;

    if json {
        return output::json(&dashboard);
    }

    let currency = dashboard.wallet.currency.as_str();
    println!("{}", format!("Hello, {}", session.user.first_name).bold());
    println!();

    let table = output::detail_table(&[
        ("Balance", output::money(dashboard.wallet.balance, currency)),
        ("Wallet ID", dashboard.wallet.wallet_id.clone()),
        ("Sent this month", output::money(dashboard.month.sent, currency)),
        ("Received this month", output::money(dashboard.month.received, currency)),
    ]);
    println!("{}", table);
    println!();

    println!("{}", "Recent Transactions".bold());
    if dashboard.recent.is_empty() {
        println!("No transactions yet. Run 'fpass add-funds' to get started.");
        return Ok(());
    }
    println!("{}", transactions_table(&dashboard.recent, &session.user.id, currency));
    Ok(())
}

/// Activity table shared by the dashboard and history views
pub fn transactions_table(txs: &[Transaction], user_id: &str, currency: &str) -> comfy_table::Table {
    let mut table = output::create_table();
    table.set_header(vec!["Date", "Type", "Counterparty", "Amount", "Status"]);
    for tx in txs {
        table.add_row(vec![
            Cell::new(tx.created_at_display()),
            Cell::new(tx.kind.as_str()),
            Cell::new(tx.counterparty(user_id)),
            output::signed_amount_cell(tx, user_id, currency),
            Cell::new(tx.status.as_deref().unwrap_or("-")),
        ]);
    }
    table
}
