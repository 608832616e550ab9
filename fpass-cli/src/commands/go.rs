//! Go command - open a view by its route path

use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;
use fpass_core::domain::Direction;

use super::{admin, auth, beneficiary, dashboard, funds, history, profile, send, wallet};
use crate::output;

/// Every view reachable by path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    LoggedOut,
    AdminDashboard,
    AdminTransactions,
    AdminUsers,
    AdminWallets,
    AdminProfile,
    UserDashboard,
    AddFunds,
    SendMoney,
    Transactions,
    Wallet,
    Contacts,
    AddBeneficiary,
    UserProfile,
    EditBeneficiary(String),
    NotFound(String),
}

/// Route table: path pattern, what it shows, equivalent command
pub const ROUTES: [(&str, &str, &str); 16] = [
    ("/", "Log in", "fpass login"),
    ("/loggedout", "Log out", "fpass logout"),
    ("/admin/dashboard", "Admin overview", "fpass admin overview"),
    ("/admin/dashboard/transactions", "All transactions", "fpass admin transactions"),
    ("/admin/dashboard/users", "User management", "fpass admin users"),
    ("/admin/dashboard/wallets", "Wallet management", "fpass admin wallets"),
    ("/admin/profile", "Admin profile", "fpass profile"),
    ("/user/dashboard", "Dashboard", "fpass dashboard"),
    ("/user/add-funds", "Add funds", "fpass add-funds"),
    ("/user/send-money", "Send money", "fpass send"),
    ("/user/transactions", "Transaction history", "fpass history"),
    ("/user/wallet", "Wallet", "fpass wallet"),
    ("/user/contacts", "Beneficiaries", "fpass beneficiary list"),
    ("/user/add-beneficiary", "Add beneficiary", "fpass beneficiary add"),
    ("/user/profile", "Profile", "fpass profile"),
    ("/user/edit-beneficiary/:id", "Edit beneficiary", "fpass beneficiary edit <id>"),
];

impl Route {
    /// Match a path; query strings and trailing slashes are ignored
    pub fn parse(path: &str) -> Self {
        let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or("").trim();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        match normalized {
            "/" => Route::Login,
            "/loggedout" => Route::LoggedOut,
            "/admin/dashboard" => Route::AdminDashboard,
            "/admin/dashboard/transactions" => Route::AdminTransactions,
            "/admin/dashboard/users" => Route::AdminUsers,
            "/admin/dashboard/wallets" => Route::AdminWallets,
            "/admin/profile" => Route::AdminProfile,
            "/user/dashboard" => Route::UserDashboard,
            "/user/add-funds" => Route::AddFunds,
            "/user/send-money" => Route::SendMoney,
            "/user/transactions" => Route::Transactions,
            "/user/wallet" => Route::Wallet,
            "/user/contacts" => Route::Contacts,
            "/user/add-beneficiary" => Route::AddBeneficiary,
            "/user/profile" => Route::UserProfile,
            other => match other.strip_prefix("/user/edit-beneficiary/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Route::EditBeneficiary(id.to_string())
                }
                _ => Route::NotFound(path.to_string()),
            },
        }
    }
}

pub async fn run(path: &str) -> Result<()> {
    match Route::parse(path) {
        Route::Login => auth::login(None, None).await,
        Route::LoggedOut => auth::logout(),
        Route::AdminDashboard => admin::overview(false).await,
        Route::AdminTransactions => admin::transactions(false, None, false).await,
        Route::AdminUsers => admin::users(String::new(), "all", false).await,
        Route::AdminWallets => admin::wallets(String::new(), "all", false).await,
        Route::AdminProfile | Route::UserProfile => profile::show(false).await,
        Route::UserDashboard => dashboard::run(false).await,
        Route::AddFunds => funds::run(None, None, None, false).await,
        Route::SendMoney => send::run(None, None, None, None, None, false).await,
        Route::Transactions => history::run(Direction::All, 50, false, None, false).await,
        Route::Wallet => wallet::show(false).await,
        Route::Contacts => beneficiary::list(None, false).await,
        Route::AddBeneficiary => beneficiary::add(None, None, None).await,
        Route::EditBeneficiary(id) => beneficiary::edit(&id, None, None, None).await,
        Route::NotFound(path) => {
            not_found(&path);
            Ok(())
        }
    }
}

fn not_found(path: &str) {
    println!("{}", "404 - Page Not Found".bold());
    println!();
    output::warning(&format!("No view at '{}'.", path));
    println!("Back to login: fpass go /");
    println!("All views: fpass routes");
}

pub fn list_routes() {
    let mut table = output::create_table();
    table.set_header(vec!["Route", "View", "Command"]);
    for (route, view, command) in ROUTES {
        table.add_row(vec![Cell::new(route), Cell::new(view), Cell::new(command)]);
    }
    println!("{}", table);
}
