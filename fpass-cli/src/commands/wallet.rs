//! Wallet commands - show the balance once or keep it live

use anyhow::Result;
use chrono::Local;
use clap::Subcommand;
use colored::Colorize;
use fpass_core::domain::EndReason;
use fpass_core::services::MonitorUpdate;
use fpass_core::{ApiError, Error, Wallet};

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum WalletCommands {
    /// Show wallet details (default)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Keep the balance on screen, refreshing in the background
    Watch,
}

pub async fn run(command: Option<WalletCommands>) -> Result<()> {
    match command.unwrap_or(WalletCommands::Show { json: false }) {
        WalletCommands::Show { json } => show(json).await,
        WalletCommands::Watch => watch().await,
    }
}

pub async fn show(json: bool) -> Result<()> {
    let ctx = get_context()?;
    ctx.auth.require_session()?;
    let wallet = output::with_spinner("Fetching wallet...", ctx.auth.refresh_wallet()).await?;

    if json {
        return output::json(&wallet);
    }

    let table = output::detail_table(&[
        ("Wallet ID", wallet.wallet_id.clone()),
        ("Balance", output::money(wallet.balance, &wallet.currency)),
        ("Currency", wallet.currency.clone()),
        ("Status", wallet.status.clone().unwrap_or_else(|| "active".to_string())),
    ]);
    println!("{}", table);
    Ok(())
}

fn balance_line(wallet: &Wallet) {
    println!(
        "[{}] {} {}",
        Local::now().format("%H:%M:%S"),
        wallet.wallet_id,
        output::money(wallet.balance, &wallet.currency).bold()
    );
}

/// Live balance until Ctrl-C, logout or session expiry
pub async fn watch() -> Result<()> {
    let ctx = get_context()?;
    ctx.auth.require_session()?;

    let wallet = ctx.auth.refresh_wallet().await?;
    output::info(&format!(
        "Refreshing every {}s. Press Ctrl-C to stop.",
        ctx.config.refresh_secs
    ));
    balance_line(&wallet);

    let mut monitor = ctx.wallet_monitor().spawn(ctx.session.subscribe());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                monitor.stop();
                println!();
                return Ok(());
            }
            update = monitor.next() => match update {
                Some(MonitorUpdate::Refreshed(wallet)) => balance_line(&wallet),
                Some(MonitorUpdate::Failed(e)) if e.is_unauthenticated() => return Err(e.into()),
                Some(MonitorUpdate::Failed(e)) => {
                    output::warning(&format!("Refresh failed: {}", e.user_message()));
                }
                Some(MonitorUpdate::SessionEnded(EndReason::Expired)) => {
                    return Err(Error::Unauthenticated(ApiError::from_body(
                        401,
                        serde_json::Value::Null,
                    ))
                    .into());
                }
                Some(MonitorUpdate::SessionEnded(EndReason::Logout)) | None => {
                    output::info("Session ended.");
                    return Ok(());
                }
            },
        }
    }
}
