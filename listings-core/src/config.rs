use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::sources::SourceCatalog;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "ALPINE_SELLER_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub sources: SourceCatalog,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub request_timeout_seconds: u64,
    /// Upper bound for one source including retries.
    pub source_timeout_seconds: u64,
    /// Extra attempts after the first failed request.
    pub retry_attempts: u8,
    pub retry_backoff_ms: u64,
    pub max_concurrent_fetches: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 10,
            source_timeout_seconds: 20,
            retry_attempts: 1,
            retry_backoff_ms: 250,
            max_concurrent_fetches: 8,
            user_agent: concat!("AlpineSeller/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_seconds)
    }

    /// Linear backoff before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u8) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }

    pub fn concurrency(&self) -> usize {
        self.max_concurrent_fetches.max(1)
    }
}

impl AppConfig {
    /// `$ALPINE_SELLER_CONFIG`, else `<config dir>/alpine-seller/config.json`.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("alpine-seller").join("config.json"))
    }

    /// Loads the configuration file, or falls back to the built-in defaults.
    pub fn load() -> Self {
        let path = match Self::config_file_path() {
            Ok(path) => path,
            Err(err) => {
                warn!(error = %err, "no configuration path, using defaults");
                return Self::default();
            }
        };
        if !path.exists() {
            info!(path = %path.display(), "no configuration file, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                info!(path = %path.display(), areas = config.sources.areas.len(), "configuration loaded");
                config
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load configuration, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
