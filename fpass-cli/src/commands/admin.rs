//! Admin commands - back-office views and actions

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{Cell, Color};
use dialoguer::Confirm;
use fpass_core::api::{AdminUserUpdate, WalletAction, WalletAdjustment};
use fpass_core::domain::money::parse_amount;
use fpass_core::domain::{
    Role, UserFilter, UserStatus, WalletFilter, WalletTotals, DEFAULT_CURRENCY,
};
use fpass_core::{Transaction, User, Wallet};
use serde_json::json;

use super::history::export_csv;
use super::{get_context, require_admin};
use crate::output;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Platform stats and latest activity
    Overview {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List users
    Users {
        /// Search name, email or phone
        #[arg(long, short)]
        search: Option<String>,
        /// Status filter: all, active, inactive, suspended
        #[arg(long, default_value = "all")]
        status: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one user
    User {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a user's status to active
    Activate { id: String },
    /// Set a user's status to suspended
    Suspend { id: String },
    /// Change a user's role (user, admin)
    Role { id: String, role: Role },
    /// Delete a user
    DeleteUser {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
    /// List wallets with totals
    Wallets {
        /// Search owner name or email
        #[arg(long, short)]
        search: Option<String>,
        /// Status filter: all, active, frozen, ...
        #[arg(long, default_value = "all")]
        status: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add or deduct wallet funds
    Adjust {
        /// Wallet ID
        wallet: String,
        /// add or deduct
        action: String,
        amount: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// List all transactions
    Transactions {
        /// Export to CSV
        #[arg(long)]
        export: bool,
        /// CSV path (implies --export)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: AdminCommands) -> Result<()> {
    match command {
        AdminCommands::Overview { json } => overview(json).await,
        AdminCommands::Users {
            search,
            status,
            json,
        } => users(search.unwrap_or_default(), &status, json).await,
        AdminCommands::User { id, json } => user(&id, json).await,
        AdminCommands::Activate { id } => {
            update_user(&id, AdminUserUpdate::status(UserStatus::Active)).await
        }
        AdminCommands::Suspend { id } => {
            update_user(&id, AdminUserUpdate::status(UserStatus::Suspended)).await
        }
        AdminCommands::Role { id, role } => update_user(&id, AdminUserUpdate::role(role)).await,
        AdminCommands::DeleteUser { id, force } => delete_user(&id, force).await,
        AdminCommands::Wallets {
            search,
            status,
            json,
        } => wallets(search.unwrap_or_default(), &status, json).await,
        AdminCommands::Adjust {
            wallet,
            action,
            amount,
            yes,
        } => adjust(&wallet, &action, &amount, yes).await,
        AdminCommands::Transactions {
            export,
            output,
            json,
        } => transactions(export, output, json).await,
    }
}

/// "all" means no filter
fn status_filter(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    (!raw.is_empty() && !raw.eq_ignore_ascii_case("all")).then_some(raw)
}

fn ledger_table(txs: &[Transaction]) -> comfy_table::Table {
    let mut table = output::create_table();
    table.set_header(vec!["ID", "From", "To", "Amount", "Fee", "Type", "Date"]);
    for tx in txs {
        table.add_row(vec![
            Cell::new(&tx.transaction_id),
            Cell::new(tx.sender_name.as_deref().unwrap_or("Unknown")),
            Cell::new(tx.receiver_name.as_deref().unwrap_or("Unknown")),
            Cell::new(output::money(tx.amount, DEFAULT_CURRENCY)),
            Cell::new(output::money(tx.fee, DEFAULT_CURRENCY)),
            Cell::new(tx.kind.as_str()),
            Cell::new(tx.created_at_display()),
        ]);
    }
    table
}

pub async fn overview(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = require_admin(&ctx)?;
    let overview =
        output::with_spinner("Loading overview...", ctx.dashboard.admin_overview()).await?;

    if json {
        return output::json(&overview);
    }

    let stats = &overview.stats;
    println!("{}", format!("Admin Overview ({})", session.user.full_name()).bold());
    println!();

    let avg = stats
        .average_revenue_per_transaction()
        .map(|a| output::money(a, DEFAULT_CURRENCY))
        .unwrap_or_else(|| "-".to_string());
    let table = output::detail_table(&[
        ("Users", stats.total_users.to_string()),
        (
            "Active users",
            format!("{} ({}%)", stats.active_users, overview.active_user_percent),
        ),
        ("Transactions", stats.total_transactions.to_string()),
        ("Revenue", output::money(stats.total_revenue, DEFAULT_CURRENCY)),
        ("Avg revenue / transaction", avg),
        ("Wallet balances", output::money(stats.total_wallet_balance, DEFAULT_CURRENCY)),
    ]);
    println!("{}", table);
    println!();

    println!("{}", "Recent Transactions".bold());
    if overview.recent.is_empty() {
        println!("No transactions yet.");
    } else {
        println!("{}", ledger_table(&overview.recent));
    }
    Ok(())
}

fn status_cell(status: UserStatus) -> Cell {
    let color = match status {
        UserStatus::Active => Color::Green,
        UserStatus::Inactive => Color::Yellow,
        UserStatus::Suspended => Color::Red,
    };
    Cell::new(status.as_str()).fg(color)
}

fn users_table(users: &[&User]) -> comfy_table::Table {
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Email", "Phone", "Role", "Status", "Balance"]);
    for u in users {
        let balance = u
            .wallet
            .as_ref()
            .map(|w| output::money(w.balance, &w.currency))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&u.id),
            Cell::new(u.full_name()),
            Cell::new(&u.email),
            Cell::new(u.phone.as_deref().unwrap_or("-")),
            Cell::new(u.role.as_str()),
            status_cell(u.status),
            Cell::new(balance),
        ]);
    }
    table
}

pub async fn users(search: String, status: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_admin(&ctx)?;

    let status = match status_filter(status) {
        Some(s) => Some(s.parse::<UserStatus>().map_err(anyhow::Error::msg)?),
        None => None,
    };
    let filter = UserFilter { search, status };

    let all = output::with_spinner("Loading users...", ctx.admin.users()).await?;
    let shown = filter.apply(&all);

    if json {
        return output::json(&shown);
    }

    if shown.is_empty() {
        println!("No users match.");
        return Ok(());
    }
    println!("{}", users_table(&shown));
    println!("Showing {} of {} users", shown.len(), all.len());
    Ok(())
}

pub async fn user(id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_admin(&ctx)?;
    let user = output::with_spinner("Loading user...", ctx.admin.user(id)).await?;

    if json {
        return output::json(&user);
    }
    println!("{}", users_table(&[&user]));
    Ok(())
}

async fn update_user(id: &str, update: AdminUserUpdate) -> Result<()> {
    let ctx = get_context()?;
    require_admin(&ctx)?;
    let ack = output::with_spinner("Updating user...", ctx.admin.update_user(id, &update)).await?;
    output::success(ack.message_or("User updated"));
    Ok(())
}

pub async fn delete_user(id: &str, force: bool) -> Result<()> {
    let ctx = get_context()?;
    require_admin(&ctx)?;

    if !force
        && !Confirm::new()
            .with_prompt(format!(
                "Delete user {}? This action cannot be undone.",
                id
            ))
            .default(false)
            .interact()?
    {
        output::warning("Cancelled.");
        return Ok(());
    }

    let ack = output::with_spinner("Deleting user...", ctx.admin.delete_user(id)).await?;
    output::success(ack.message_or("User deleted"));
    Ok(())
}

fn wallets_table(wallets: &[&Wallet]) -> comfy_table::Table {
    let mut table = output::create_table();
    table.set_header(vec!["Wallet ID", "Owner", "Email", "Balance", "Status"]);
    for w in wallets {
        let (owner, email) = match &w.user {
            Some(o) => (o.full_name(), o.email.clone()),
            None => ("Unknown".to_string(), "-".to_string()),
        };
        let status = w.status.as_deref().unwrap_or("-");
        let status_cell = if w.is_active() {
            Cell::new(status).fg(Color::Green)
        } else {
            Cell::new(status).fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&w.wallet_id),
            Cell::new(owner),
            Cell::new(email),
            Cell::new(output::money(w.balance, &w.currency)),
            status_cell,
        ]);
    }
    table
}

pub async fn wallets(search: String, status: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_admin(&ctx)?;

    let filter = WalletFilter {
        search,
        status: status_filter(status).map(str::to_lowercase),
    };
    let all = output::with_spinner("Loading wallets...", ctx.admin.wallets()).await?;
    let shown: Vec<Wallet> = filter.apply(&all).into_iter().cloned().collect();
    let totals = WalletTotals::compute(&shown);

    if json {
        return output::json(&json!({ "wallets": shown, "totals": totals }));
    }

    let summary = output::detail_table(&[
        ("Total balance", output::money(totals.total_balance, DEFAULT_CURRENCY)),
        ("Average balance", output::money(totals.average_balance, DEFAULT_CURRENCY)),
        ("Active wallets", totals.active_wallets.to_string()),
    ]);
    println!("{}", summary);

    if shown.is_empty() {
        println!("No wallets match.");
        return Ok(());
    }
    let refs: Vec<&Wallet> = shown.iter().collect();
    println!("{}", wallets_table(&refs));
    Ok(())
}

pub async fn adjust(wallet: &str, action: &str, amount: &str, yes: bool) -> Result<()> {
    let ctx = get_context()?;
    require_admin(&ctx)?;

    let adjustment = WalletAdjustment {
        action: action.parse::<WalletAction>()?,
        amount: parse_amount(amount)?,
    };
    let verb = match adjustment.action {
        WalletAction::Add => "Add",
        WalletAction::Deduct => "Deduct",
    };

    if !yes
        && !Confirm::new()
            .with_prompt(format!(
                "{} {} for wallet {}?",
                verb,
                output::money(adjustment.amount, DEFAULT_CURRENCY),
                wallet
            ))
            .default(false)
            .interact()?
    {
        output::warning("Cancelled.");
        return Ok(());
    }

    let receipt = output::with_spinner(
        "Adjusting wallet...",
        ctx.admin.adjust_wallet(wallet, &adjustment),
    )
    .await?;
    output::success(receipt.message.as_deref().unwrap_or("Wallet updated"));
    if let Some(w) = receipt.wallet {
        println!("New balance: {}", output::money(w.balance, &w.currency).bold());
    }
    Ok(())
}

pub async fn transactions(export: bool, output_path: Option<PathBuf>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_admin(&ctx)?;
    let txs = output::with_spinner("Loading transactions...", ctx.admin.transactions())
        .await
        .context("Failed to load transactions")?;

    if export || output_path.is_some() {
        return export_csv(&txs, output_path);
    }

    if json {
        return output::json(&txs);
    }

    if txs.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }
    println!("{}", ledger_table(&txs));
    println!("{} transactions", txs.len());
    Ok(())
}
