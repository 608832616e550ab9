//! History commands - list, inspect and export transactions

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use fpass_core::api::TransactionQuery;
use fpass_core::domain::Direction;
use fpass_core::services::export;
use fpass_core::Transaction;

use super::dashboard::transactions_table;
use super::get_context;
use crate::output;

/// Write `txs` as CSV and report where it went
pub fn export_csv(txs: &[Transaction], path: Option<PathBuf>) -> Result<()> {
    let dir = std::env::current_dir().context("Failed to resolve current directory")?;
    let written = export::export_to_file(txs, path.as_deref(), &dir, Local::now().date_naive())
        .context("Failed to export transactions")?;
    output::success(&format!(
        "Exported {} transactions to {}",
        txs.len(),
        written.display()
    ));
    Ok(())
}

pub async fn run(
    direction: Direction,
    limit: u32,
    export: bool,
    output_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let session = ctx.auth.require_session()?;

    let all = output::with_spinner(
        "Loading transactions...",
        ctx.transactions.list(&TransactionQuery::limit(limit)),
    )
    .await?;
    let selected: Vec<Transaction> = direction
        .apply(&all, &session.user.id)
        .into_iter()
        .cloned()
        .collect();

    if export || output_path.is_some() {
        return export_csv(&selected, output_path);
    }

    if json {
        return output::json(&selected);
    }

    if selected.is_empty() {
        println!("No {} transactions.", direction);
        return Ok(());
    }

    let currency = ctx.session.currency();
    println!("{}", format!("Transactions ({})", direction).bold());
    println!("{}", transactions_table(&selected, &session.user.id, &currency));
    println!("{} shown", selected.len());
    Ok(())
}

pub async fn show(id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = ctx.auth.require_session()?;
    let tx = output::with_spinner("Loading transaction...", ctx.transactions.get(id)).await?;

    if json {
        return output::json(&tx);
    }

    let currency = ctx.session.currency();
    let mut rows = vec![
        ("Transaction", tx.transaction_id.clone()),
        ("Type", tx.kind.as_str().to_string()),
        ("From", tx.sender_name.clone().unwrap_or_else(|| "Unknown".to_string())),
        ("To", tx.receiver_name.clone().unwrap_or_else(|| "Unknown".to_string())),
        ("Amount", output::money(tx.amount, &currency)),
        ("Fee", output::money(tx.fee, &currency)),
        ("Date", tx.created_at_display()),
        ("Status", tx.status.clone().unwrap_or_else(|| "-".to_string())),
    ];
    if tx.is_sent_by(&session.user.id) {
        rows.insert(6, ("Total debited", output::money(tx.total_debit(), &currency)));
    }
    if let Some(note) = &tx.note {
        rows.push(("Note", note.clone()));
    }
    println!("{}", output::detail_table(&rows));
    Ok(())
}
