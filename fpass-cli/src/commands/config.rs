//! Config commands - show and change client settings

use anyhow::Result;
use clap::Subcommand;
use fpass_core::config::{Config, ValueSource, API_URL_ENV, REFRESH_SECS_ENV};
use serde_json::json;

use super::get_fpass_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show effective settings and where they come from (default)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the backend base URL
    SetApiUrl { url: String },
    /// Set the wallet refresh interval in seconds
    SetRefresh { seconds: u64 },
}

pub fn run(command: Option<ConfigCommands>) -> Result<()> {
    let fpass_dir = get_fpass_dir()?;
    let mut config = Config::load(&fpass_dir)?;

    match command.unwrap_or(ConfigCommands::Show { json: false }) {
        ConfigCommands::Show { json } => {
            if json {
                return output::json(&json!({
                    "directory": fpass_dir,
                    "api_url": config.api_url,
                    "api_url_source": config.api_url_source,
                    "refresh_secs": config.refresh_secs,
                    "refresh_source": config.refresh_source,
                    "request_timeout_secs": config.request_timeout_secs,
                }));
            }

            let table = output::detail_table(&[
                ("Directory", fpass_dir.display().to_string()),
                (
                    "API URL",
                    format!("{} ({})", config.api_url, config.api_url_source),
                ),
                (
                    "Wallet refresh",
                    format!("{}s ({})", config.refresh_secs, config.refresh_source),
                ),
                ("Request timeout", format!("{}s", config.request_timeout_secs)),
            ]);
            println!("{}", table);
        }
        ConfigCommands::SetApiUrl { url } => {
            config.set_api_url(&url)?;
            config.save(&fpass_dir)?;
            output::success(&format!("API URL saved: {}", url.trim_end_matches('/')));
            if config.api_url_source == ValueSource::Env {
                output::warning(&format!(
                    "{} is set and takes precedence ({})",
                    API_URL_ENV, config.api_url
                ));
            }
        }
        ConfigCommands::SetRefresh { seconds } => {
            config.set_refresh_secs(seconds)?;
            config.save(&fpass_dir)?;
            output::success(&format!("Wallet refresh interval saved: {}s", seconds));
            if config.refresh_source == ValueSource::Env {
                output::warning(&format!(
                    "{} is set and takes precedence ({}s)",
                    REFRESH_SECS_ENV, config.refresh_secs
                ));
            }
        }
    }

    Ok(())
}
