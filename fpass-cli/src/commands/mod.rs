//! CLI command implementations

pub mod admin;
pub mod auth;
pub mod beneficiary;
pub mod config;
pub mod dashboard;
pub mod funds;
pub mod go;
pub mod history;
pub mod profile;
pub mod send;
pub mod wallet;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use fpass_core::{FpassContext, Session};

/// Get the F-Pass directory from environment or default
pub fn get_fpass_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FPASS_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory; set FPASS_DIR")?;
    Ok(home.join(".fpass"))
}

/// Get or create the F-Pass context
pub fn get_context() -> Result<FpassContext> {
    let fpass_dir = get_fpass_dir()?;

    std::fs::create_dir_all(&fpass_dir)
        .with_context(|| format!("Failed to create F-Pass directory: {:?}", fpass_dir))?;

    FpassContext::new(&fpass_dir).context("Failed to initialize F-Pass context")
}

/// The signed-in session, which must belong to an admin
pub fn require_admin(ctx: &FpassContext) -> Result<Session> {
    let session = ctx.auth.require_session()?;
    if !session.user.is_admin() {
        bail!("This page is only available to administrators.");
    }
    Ok(session)
}
