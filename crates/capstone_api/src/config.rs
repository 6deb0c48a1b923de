//! Client configuration.
//!
//! Resolution order: built-in defaults, then `capstone.toml` (if present),
//! then `CAPSTONE_*` environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_BASE_URL: &str = "https://localhost:7064/api";
pub const DEFAULT_CONFIG_FILE: &str = "capstone.toml";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for talking to the portal backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL, including the `/api` prefix
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Accept self-signed certificates (local development backends)
    pub accept_invalid_certs: bool,
    /// Directory holding the session token and cached user
    pub session_dir: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
            session_dir: default_session_dir(),
        }
    }
}

fn default_session_dir() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".capstone")
}

impl ApiConfig {
    /// Load configuration, reading `path` or `./capstone.toml` when it exists.
    pub fn load(path: Option<&Path>) -> ApiResult<Self> {
        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if file.exists() {
            debug!("Loading configuration from {}", file.display());
            Self::from_file(&file)?
        } else if path.is_some() {
            return Err(ApiError::Config(format!(
                "config file not found: {}",
                file.display()
            )));
        } else {
            Self::default()
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ApiResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Override fields from `CAPSTONE_*` environment variables.
    pub fn apply_env(&mut self) -> ApiResult<()> {
        if let Ok(url) = env::var("CAPSTONE_API_URL") {
            if !url.is_empty() {
                self.base_url = url;
            }
        }

        if let Ok(raw) = env::var("CAPSTONE_TIMEOUT_SECS") {
            self.timeout_secs = raw.parse().map_err(|_| {
                ApiError::Config(format!("CAPSTONE_TIMEOUT_SECS is not a number: {}", raw))
            })?;
        }

        if let Ok(raw) = env::var("CAPSTONE_ACCEPT_INVALID_CERTS") {
            self.accept_invalid_certs = matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Ok(dir) = env::var("CAPSTONE_SESSION_DIR") {
            if !dir.is_empty() {
                self.session_dir = PathBuf::from(dir);
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> ApiResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base_url must start with http:// or https://, got {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ApiError::Config("timeout_secs must be greater than zero".into()));
        }
        Ok(())
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://localhost:7064/api");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.session_dir.ends_with(".capstone"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("capstone.toml");
        fs::write(&path, "base_url = \"https://portal.example.edu/api\"\n").unwrap();

        let config = ApiConfig::from_file(&path).unwrap();
        assert_eq!(config.base_url, "https://portal.example.edu/api");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_missing_explicit_file() {
        let temp = tempdir().unwrap();
        let result = ApiConfig::load(Some(&temp.path().join("nope.toml")));
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_url() {
        let config = ApiConfig::default().base_url("localhost:7064");
        assert!(config.validate().is_err());
    }
}
