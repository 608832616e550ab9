//! Configuration management
//!
//! Settings live in `settings.json` inside the F-Pass directory:
//! ```json
//! {
//!   "app": { "apiUrl": "http://localhost:5000/api", "refreshSecs": 30, "requestTimeoutSecs": 30 }
//! }
//! ```
//! Keys the CLI does not manage are preserved on save. `FPASS_API_URL` and
//! `FPASS_REFRESH_SECS` override the file.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::domain::result::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REFRESH_SECS: u64 = 30;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const API_URL_ENV: &str = "FPASS_API_URL";
pub const REFRESH_SECS_ENV: &str = "FPASS_REFRESH_SECS";

const SETTINGS_FILE: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Where a setting's effective value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::File => "settings.json",
            Self::Env => "environment",
        })
    }
}

/// F-Pass configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_url_source: ValueSource,
    pub refresh_secs: u64,
    pub refresh_source: ValueSource,
    pub request_timeout_secs: u64,
    // Values as stored in the file, written back on save
    stored: AppSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_url_source: ValueSource::Default,
            refresh_secs: DEFAULT_REFRESH_SECS,
            refresh_source: ValueSource::Default,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            stored: AppSettings::default(),
        }
    }
}

/// Check that `raw` is an absolute http(s) URL and drop any trailing slash
pub fn normalize_api_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| Error::Config(format!("Invalid API URL '{}': {}", trimmed, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        other => Err(Error::Config(format!(
            "Invalid API URL '{}': unsupported scheme '{}'",
            trimmed, other
        ))),
    }
}

fn validate_refresh(secs: u64) -> Result<u64> {
    if secs == 0 {
        return Err(Error::Config(
            "Refresh interval must be at least 1 second".to_string(),
        ));
    }
    Ok(secs)
}

fn read_settings(dir: &Path) -> Result<SettingsFile> {
    let settings_path = dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %settings_path.display(), error = %e, "ignoring unreadable settings file");
        SettingsFile::default()
    }))
}

impl Config {
    /// Load config from the F-Pass directory, applying environment overrides
    pub fn load(fpass_dir: &Path) -> Result<Self> {
        Self::load_with_env(fpass_dir, |key| std::env::var(key).ok())
    }

    /// Load with an explicit environment lookup
    pub fn load_with_env(fpass_dir: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw = read_settings(fpass_dir)?;
        let mut config = Self {
            stored: raw.app.clone(),
            ..Self::default()
        };

        if let Some(url) = raw.app.api_url.as_deref() {
            config.api_url = normalize_api_url(url)?;
            config.api_url_source = ValueSource::File;
        }
        if let Some(url) = env(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.api_url = normalize_api_url(&url)?;
            config.api_url_source = ValueSource::Env;
        }

        if let Some(secs) = raw.app.refresh_secs {
            config.refresh_secs = validate_refresh(secs)?;
            config.refresh_source = ValueSource::File;
        }
        if let Some(secs) = env(REFRESH_SECS_ENV).filter(|v| !v.trim().is_empty()) {
            let parsed = secs.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("{} must be a whole number of seconds", REFRESH_SECS_ENV))
            })?;
            config.refresh_secs = validate_refresh(parsed)?;
            config.refresh_source = ValueSource::Env;
        }

        if let Some(secs) = raw.app.request_timeout_secs {
            config.request_timeout_secs = secs.max(1);
        }

        Ok(config)
    }

    /// Save config to the F-Pass directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, fpass_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(fpass_dir)?;
        let mut settings = read_settings(fpass_dir)?;

        settings.app.api_url = self.stored.api_url.clone();
        settings.app.refresh_secs = self.stored.refresh_secs;
        settings.app.request_timeout_secs = self.stored.request_timeout_secs;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(fpass_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// Set the backend base URL (persisted on save)
    pub fn set_api_url(&mut self, raw: &str) -> Result<()> {
        let url = normalize_api_url(raw)?;
        self.stored.api_url = Some(url.clone());
        if self.api_url_source != ValueSource::Env {
            self.api_url = url;
            self.api_url_source = ValueSource::File;
        }
        Ok(())
    }

    /// Set the wallet refresh interval (persisted on save)
    pub fn set_refresh_secs(&mut self, secs: u64) -> Result<()> {
        let secs = validate_refresh(secs)?;
        self.stored.refresh_secs = Some(secs);
        if self.refresh_source != ValueSource::Env {
            self.refresh_secs = secs;
            self.refresh_source = ValueSource::File;
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
