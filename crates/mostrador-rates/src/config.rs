//! # Rates Configuration
//!
//! Configuration for the exchange rate feed.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MOSTRADOR_RATE_URL=https://api.example.com/rates/usd-ars           │
//! │     MOSTRADOR_RATE_REFRESH_SECS=300                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/mostrador/rates.toml (Linux)                             │
//! │     ~/Library/Application Support/com.mostrador.backoffice/rates.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # rates.toml
//! [source]
//! url = "http://localhost:8000/api/exchange-rate/usd-ars"
//! timeout_secs = 10
//!
//! [refresh]
//! interval_secs = 300
//! max_age_secs = 3600
//! max_retries = 5
//! initial_backoff_ms = 500
//! max_backoff_secs = 60
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{RatesError, RatesResult};

// =============================================================================
// Source Settings
// =============================================================================

/// Where the rate comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Endpoint answering `{ "rate": number }`.
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:8000/api/exchange-rate/usd-ars".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings {
            url: default_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl SourceSettings {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Refresh Settings
// =============================================================================

/// How often the rate is refreshed and how failures are retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSettings {
    /// Interval between scheduled refreshes (seconds).
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// A rate older than this is treated as missing (seconds).
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,

    /// Retries per refresh after the first attempt fails.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff between retries (milliseconds).
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff between retries (seconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_interval() -> u64 {
    300
}

fn default_max_age() -> u64 {
    3600
}

fn default_max_retries() -> u32 {
    5
}

fn default_initial_backoff() -> u64 {
    500
}

fn default_max_backoff() -> u64 {
    60
}

impl Default for RefreshSettings {
    fn default() -> Self {
        RefreshSettings {
            interval_secs: default_interval(),
            max_age_secs: default_max_age(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }
}

// =============================================================================
// Main Rates Configuration
// =============================================================================

/// Complete rates configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Rate endpoint.
    #[serde(default)]
    pub source: SourceSettings,

    /// Refresh schedule.
    #[serde(default)]
    pub refresh: RefreshSettings,
}

impl RatesConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (rates.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> RatesResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading rates config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load rates config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> RatesResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| RatesError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RatesError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| RatesError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Rates config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RatesResult<()> {
        let url = &self.source.url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(RatesError::InvalidConfig(format!(
                "Rate URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.source.timeout_secs == 0 {
            return Err(RatesError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.refresh.interval_secs == 0 {
            return Err(RatesError::InvalidConfig(
                "interval_secs must be greater than 0".into(),
            ));
        }

        if self.refresh.max_age_secs < self.refresh.interval_secs {
            return Err(RatesError::InvalidConfig(format!(
                "max_age_secs ({}) must be at least interval_secs ({})",
                self.refresh.max_age_secs, self.refresh.interval_secs
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("MOSTRADOR_RATE_URL") {
            debug!(url = %url, "Overriding rate URL from environment");
            self.source.url = url;
        }

        if let Ok(secs) = std::env::var("MOSTRADOR_RATE_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.source.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid MOSTRADOR_RATE_TIMEOUT_SECS"),
            }
        }

        if let Ok(secs) = std::env::var("MOSTRADOR_RATE_REFRESH_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => {
                    debug!(interval_secs = s, "Overriding refresh interval from environment");
                    self.refresh.interval_secs = s;
                }
                Err(_) => warn!(value = %secs, "Ignoring invalid MOSTRADOR_RATE_REFRESH_SECS"),
            }
        }

        if let Ok(secs) = std::env::var("MOSTRADOR_RATE_MAX_AGE_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.refresh.max_age_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid MOSTRADOR_RATE_MAX_AGE_SECS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mostrador", "backoffice")
            .map(|dirs| dirs.config_dir().join("rates.toml"))
    }
}
