//! Backend connection settings.
//!
//! Resolution order, highest first:
//! 1. `TONE_BACKEND_URL` / `TONE_TIMEOUT_SECS`
//! 2. `~/.tone/config.yaml` (`backend_url`, `timeout_secs`)
//! 3. built-in defaults

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use tone_core::paths::config_path;

use crate::error::{io_err, ClientError};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BACKEND_URL: &str = "TONE_BACKEND_URL";
pub const ENV_TIMEOUT_SECS: &str = "TONE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// File layer only. A missing file yields the defaults.
    pub fn load_at(home: &Path) -> Result<Self, ClientError> {
        let path = config_path(home);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|source| ClientError::Config { path, source })
    }

    /// File layer plus overrides from `lookup` (normally the process env).
    pub fn resolve_at<F>(home: &Path, lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::load_at(home)?.with_overrides(lookup)
    }

    pub fn resolve() -> Result<Self, ClientError> {
        let home = dirs::home_dir().ok_or(ClientError::HomeNotFound)?;
        Self::resolve_at(&home, |var| std::env::var(var).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ClientError::InvalidSetting {
                    var: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `backend_url` joined with an absolute API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.backend_url.trim_end_matches('/'), path)
    }

    fn validate(&self) -> Result<(), ClientError> {
        if !(self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://")) {
            return Err(ClientError::InvalidSetting {
                var: ENV_BACKEND_URL,
                value: self.backend_url.clone(),
                reason: "expected an http:// or https:// URL".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::InvalidSetting {
                var: ENV_TIMEOUT_SECS,
                value: "0".into(),
                reason: "timeout must be at least one second".into(),
            });
        }
        Ok(())
    }
}
