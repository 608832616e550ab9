//! Auth commands - login, register, logout, whoami

use std::env;

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::{Input, Password};
use fpass_core::api::{Credentials, RegisterRequest};
use fpass_core::{FpassContext, Session};

use super::get_context;
use crate::output;

/// Password from the flag, the FPASS_PASSWORD env var, or a prompt
fn get_password_or_prompt(password_flag: Option<String>, prompt: &str) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }

    if let Ok(p) = env::var("FPASS_PASSWORD") {
        return Ok(p);
    }

    let p = Password::new().with_prompt(prompt).interact()?;
    Ok(p)
}

fn prompt_required(value: Option<String>, prompt: &str) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    let v: String = Input::new().with_prompt(prompt).interact_text()?;
    Ok(v.trim().to_string())
}

fn prompt_optional(value: Option<String>, prompt: &str) -> Result<Option<String>> {
    if value.is_some() {
        return Ok(value);
    }
    let v: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    let v = v.trim();
    Ok((!v.is_empty()).then(|| v.to_string()))
}

pub async fn login(email: Option<String>, password: Option<String>) -> Result<()> {
    let ctx = get_context()?;
    let email = prompt_required(email, "Email")?;
    let password = get_password_or_prompt(password, "Password")?;

    let session = output::with_spinner(
        "Signing in...",
        ctx.auth.login(&Credentials::new(email, password)),
    )
    .await?;

    welcome(&ctx, &session, "Welcome back")
}

pub async fn register(
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    country: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;

    let request = RegisterRequest {
        first_name: prompt_required(first_name, "First name")?,
        last_name: prompt_required(last_name, "Last name")?,
        email: prompt_required(email, "Email")?,
        phone: prompt_optional(phone, "Phone (optional)")?,
        country: prompt_optional(country, "Country (optional)")?,
        password: match password {
            Some(p) => p,
            None => {
                let p1 = get_password_or_prompt(None, "Password")?;
                if env::var("FPASS_PASSWORD").is_err() {
                    let p2 = Password::new().with_prompt("Confirm password").interact()?;
                    if p1 != p2 {
                        bail!("Passwords do not match");
                    }
                }
                p1
            }
        },
    };

    let session = output::with_spinner("Creating account...", ctx.auth.register(&request)).await?;
    welcome(&ctx, &session, "Welcome to F-Pass")
}

fn welcome(ctx: &FpassContext, session: &Session, greeting: &str) -> Result<()> {
    output::success(&format!("{}, {}!", greeting, session.user.first_name));

    if let Some(wallet) = ctx.session.wallet()? {
        println!(
            "Wallet {}: {}",
            wallet.wallet_id,
            output::money(wallet.balance, &wallet.currency).bold()
        );
    }

    let home = if session.user.is_admin() {
        "/admin/dashboard"
    } else {
        "/user/dashboard"
    };
    output::info(&format!("Next: fpass go {}", home));
    Ok(())
}

pub fn logout() -> Result<()> {
    let ctx = get_context()?;
    let was_logged_in = ctx.session.is_authenticated();
    // Leftover user or wallet keys are cleared even without a token
    ctx.auth.logout()?;
    if was_logged_in {
        output::success("Logged out.");
    } else {
        output::warning("Not logged in.");
    }
    Ok(())
}

/// Revalidate the stored session against the backend and show who it is
pub async fn whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = match output::with_spinner("Checking session...", ctx.auth.bootstrap()).await? {
        Some(session) => session,
        None => return Err(fpass_core::Error::NotLoggedIn.into()),
    };

    if json {
        return output::json(&session.user);
    }

    let user = &session.user;
    let table = output::detail_table(&[
        ("Name", user.full_name()),
        ("Email", user.email.clone()),
        ("Role", user.role.to_string()),
        ("Status", user.status.to_string()),
        ("API", ctx.config.api_url.clone()),
    ]);
    println!("{}", table);
    Ok(())
}
