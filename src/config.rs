//! Configuration Management
//!
//! Typed configuration for the CloudStack endpoint, credentials and
//! project scope. Loaded from disk once at startup; environment
//! variables override individual fields.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Full API endpoint, e.g. "https://cloud.example.com:8080/client/api"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Account API key
    #[serde(default)]
    pub api_key: String,
    /// Account secret key used for request signing
    #[serde(default)]
    pub secret_key: String,
    /// How long to wait on an asynchronous job, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Block on asynchronous jobs until they reach a terminal state
    #[serde(default = "default_asyncblock")]
    pub asyncblock: bool,
    /// Optional project scope injected into every request
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_api_url() -> String {
    "http://localhost:8080/client/api".to_string()
}

fn default_timeout() -> u64 {
    3600
}

fn default_asyncblock() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            secret_key: String::new(),
            timeout_secs: default_timeout(),
            asyncblock: default_asyncblock(),
            project_id: None,
        }
    }
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("csinv").join("config.json"))
    }

    /// Load configuration from the default location, then apply
    /// environment overrides. A missing or unreadable file falls back
    /// to defaults rather than failing; credentials are validated later,
    /// just before the first request is signed.
    pub fn load() -> Self {
        let mut config = Self::config_path()
            .filter(|p| p.exists())
            .and_then(|p| Self::load_from(&p).ok())
            .unwrap_or_default();
        config.apply_env();
        config
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// CSINV_* environment variables win over the config file
    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("CSINV_API_URL") {
            self.api_url = v;
        }
        if let Ok(v) = std::env::var("CSINV_API_KEY") {
            self.api_key = v;
        }
        if let Ok(v) = std::env::var("CSINV_SECRET_KEY") {
            self.secret_key = v;
        }
        if let Ok(v) = std::env::var("CSINV_PROJECT_ID") {
            self.project_id = if v.is_empty() { None } else { Some(v) };
        }
        if let Some(v) = std::env::var("CSINV_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.timeout_secs = v;
        }
        if let Some(v) = std::env::var("CSINV_ASYNCBLOCK").ok().and_then(parse_bool) {
            self.asyncblock = v;
        }
    }

    /// Credentials must be present before any request can be signed
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() || self.secret_key.is_empty() {
            bail!(
                "api_key and secret_key are not configured. \
                 Set them in the config file or via CSINV_API_KEY / CSINV_SECRET_KEY"
            );
        }
        Ok(())
    }
}

fn parse_bool(value: String) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
