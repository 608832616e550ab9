//! Profile commands - show, update, change password

use anyhow::{bail, Result};
use clap::Subcommand;
use dialoguer::Password;
use fpass_core::api::{PasswordChange, ProfileUpdate};

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show your profile (default)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update profile fields
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        country: Option<String>,
    },
    /// Change your password
    Password,
}

pub async fn run(command: Option<ProfileCommands>) -> Result<()> {
    match command.unwrap_or(ProfileCommands::Show { json: false }) {
        ProfileCommands::Show { json } => show(json).await,
        ProfileCommands::Update {
            first_name,
            last_name,
            phone,
            country,
        } => {
            update(ProfileUpdate {
                first_name,
                last_name,
                phone,
                country,
            })
            .await
        }
        ProfileCommands::Password => change_password().await,
    }
}

pub async fn show(json: bool) -> Result<()> {
    let ctx = get_context()?;
    ctx.auth.require_session()?;
    let user = output::with_spinner("Loading profile...", ctx.users.profile()).await?;
    ctx.session.store_user(&user)?;

    if json {
        return output::json(&user);
    }

    let table = output::detail_table(&[
        ("Name", user.full_name()),
        ("Email", user.email.clone()),
        ("Phone", user.phone.clone().unwrap_or_else(|| "-".to_string())),
        ("Country", user.country.clone().unwrap_or_else(|| "-".to_string())),
        ("Role", user.role.to_string()),
        ("Status", user.status.to_string()),
        ("Member since", user.created_at.clone().unwrap_or_else(|| "-".to_string())),
    ]);
    println!("{}", table);
    Ok(())
}

pub async fn update(update: ProfileUpdate) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to update. Pass at least one of --first-name, --last-name, --phone, --country.");
    }

    let ctx = get_context()?;
    ctx.auth.require_session()?;
    let user = output::with_spinner("Saving profile...", ctx.users.update_profile(&update)).await?;
    ctx.session.store_user(&user)?;
    output::success(&format!("Profile updated for {}", user.full_name()));
    Ok(())
}

pub async fn change_password() -> Result<()> {
    let ctx = get_context()?;
    ctx.auth.require_session()?;

    let current_password = Password::new().with_prompt("Current password").interact()?;
    let new_password = Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm new password", "Passwords do not match")
        .interact()?;

    let ack = output::with_spinner(
        "Changing password...",
        ctx.users.change_password(&PasswordChange {
            current_password,
            new_password,
        }),
    )
    .await?;
    output::success(ack.message_or("Password changed"));
    Ok(())
}
