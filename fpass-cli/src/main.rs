//! F-Pass CLI - your wallet in the terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{admin, auth, beneficiary, config, dashboard, funds, go, history, profile, send, wallet};
use fpass_core::domain::{Direction, DEFAULT_CURRENCY};

/// F-Pass - send money, add funds and track your wallet
#[derive(Parser)]
#[command(name = "fpass", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        /// Account email (prompted if omitted)
        #[arg(long, short)]
        email: Option<String>,
        /// Password (or FPASS_PASSWORD; prompted if neither is set)
        #[arg(long, short)]
        password: Option<String>,
    },

    /// Create an account and log in
    Register {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the stored session
    Logout,

    /// Check the stored session with the backend
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Balance, monthly totals and recent activity
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or watch the wallet
    Wallet {
        #[command(subcommand)]
        command: Option<wallet::WalletCommands>,
    },

    /// Top up the wallet
    AddFunds {
        /// Amount (picked from presets if omitted)
        amount: Option<String>,
        /// Note for the ledger
        #[arg(long)]
        note: Option<String>,
        /// Funding method
        #[arg(long)]
        method: Option<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Send money (1.5% fee)
    Send {
        /// Amount (picked from presets if omitted)
        amount: Option<String>,
        /// Recipient wallet ID
        #[arg(long, conflicts_with_all = ["to_user", "beneficiary"])]
        to_wallet: Option<String>,
        /// Recipient user ID
        #[arg(long, conflicts_with = "beneficiary")]
        to_user: Option<String>,
        /// Saved beneficiary (name or tag search)
        #[arg(long, short)]
        beneficiary: Option<String>,
        /// Note for the recipient
        #[arg(long)]
        note: Option<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Transaction history
    History {
        /// all, sent or received
        #[arg(long, short, default_value = "all")]
        direction: Direction,
        /// Maximum rows fetched
        #[arg(long, short, default_value_t = 50)]
        limit: u32,
        /// Export to CSV in the current directory
        #[arg(long)]
        export: bool,
        /// CSV path (implies --export)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one transaction
    Tx {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage saved beneficiaries
    Beneficiary {
        #[command(subcommand)]
        command: beneficiary::BeneficiaryCommands,
    },

    /// Show or edit your profile
    Profile {
        #[command(subcommand)]
        command: Option<profile::ProfileCommands>,
    },

    /// Back-office views (admins only)
    Admin {
        #[command(subcommand)]
        command: admin::AdminCommands,
    },

    /// Client settings
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
    },

    /// Open a view by route, e.g. /user/dashboard
    Go { route: String },

    /// List every route
    Routes,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FPASS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Show a failed command; session expiry gets the login redirect
fn report(e: &anyhow::Error) {
    let core = e
        .chain()
        .find_map(|cause| cause.downcast_ref::<fpass_core::Error>());

    match core {
        Some(err) if err.is_unauthenticated() => output::session_expired(),
        Some(fpass_core::Error::InsufficientBalance {
            required,
            available,
        }) => {
            let currency = commands::get_context()
                .map(|ctx| ctx.session.currency())
                .unwrap_or_else(|_| DEFAULT_CURRENCY.to_string());
            output::error(&format!(
                "Insufficient balance (including fee): need {}, available {}",
                output::money(*required, &currency),
                output::money(*available, &currency)
            ))
        }
        Some(err) => output::error(&err.user_message()),
        None => output::error(&format!("{:#}", e)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { email, password } => auth::login(email, password).await,
        Commands::Register {
            first_name,
            last_name,
            email,
            phone,
            country,
            password,
        } => auth::register(first_name, last_name, email, phone, country, password).await,
        Commands::Logout => auth::logout(),
        Commands::Whoami { json } => auth::whoami(json).await,
        Commands::Dashboard { json } => dashboard::run(json).await,
        Commands::Wallet { command } => wallet::run(command).await,
        Commands::AddFunds {
            amount,
            note,
            method,
            yes,
        } => funds::run(amount, note, method, yes).await,
        Commands::Send {
            amount,
            to_wallet,
            to_user,
            beneficiary,
            note,
            yes,
        } => send::run(amount, to_wallet, to_user, beneficiary, note, yes).await,
        Commands::History {
            direction,
            limit,
            export,
            output,
            json,
        } => history::run(direction, limit, export, output, json).await,
        Commands::Tx { id, json } => history::show(&id, json).await,
        Commands::Beneficiary { command } => beneficiary::run(command).await,
        Commands::Profile { command } => profile::run(command).await,
        Commands::Admin { command } => admin::run(command).await,
        Commands::Config { command } => config::run(command),
        Commands::Go { route } => go::run(&route).await,
        Commands::Routes => {
            go::list_routes();
            Ok(())
        }
    }
}
