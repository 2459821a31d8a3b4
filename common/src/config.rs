// common/src/config.rs
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use config::{Config as ConfigFile, File, Environment};

pub const DEFAULT_API_BASE_URL: &str = "https://task-backend-zsr6.onrender.com/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STORAGE_PATH: &str = "./.task-client/storage.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Client configuration shared by the gateway, the storage layer and tracing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base address every API path is resolved against
    pub api_base_url: String,
    /// Upper bound on a single request, in seconds
    pub request_timeout_secs: u64,
    /// JSON file backing the persistent key-value slots
    pub storage_path: String,
    /// Maximum tracing level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            storage_path: DEFAULT_STORAGE_PATH.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, ConfigError> {
        // Get the run mode, defaulting to "development"
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        // Locate the config directory
        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Check if we're in the project root or a subcrate
                let mut path = PathBuf::from("./config");
                if !path.exists() {
                    path = PathBuf::from("../config");
                }
                path
            });

        tracing::info!("Loading configuration from {}", config_dir.display());
        tracing::info!("Using run mode: {}", run_mode);

        Self::load_from(&config_dir, &run_mode)
    }

    /// Layer defaults, `default.toml`, `<run_mode>.toml`, `local.toml` and
    /// `APP__*` environment variables, in that order
    pub fn load_from(config_dir: &Path, run_mode: &str) -> Result<Self, ConfigError> {
        let config: Config = ConfigFile::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS as i64)?
            .set_default("storage_path", DEFAULT_STORAGE_PATH)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", run_mode))).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load from files and environment, falling back to plain environment
    /// variables when the file layers cannot be read. A configuration that
    /// loads but fails validation is returned as an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::or_env_fallback(Self::load())
    }

    fn or_env_fallback(loaded: Result<Self, ConfigError>) -> Result<Self, ConfigError> {
        match loaded {
            Ok(config) => {
                tracing::info!("Configuration loaded from files and environment");
                Ok(config)
            },
            Err(ConfigError::Invalid(reason)) => {
                tracing::error!("Rejecting configuration: {}", reason);
                Err(ConfigError::Invalid(reason))
            },
            Err(e) => {
                tracing::warn!("Failed to load configuration from files: {}", e);
                tracing::info!("Falling back to environment variables only");

                let api_base_url = env::var("API_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

                let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

                let storage_path = env::var("STORAGE_PATH")
                    .unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string());

                let log_level = env::var("LOG_LEVEL")
                    .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

                let config = Self {
                    api_base_url,
                    request_timeout_secs,
                    storage_path,
                    log_level,
                };
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Per-request wait bound
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base_url must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
