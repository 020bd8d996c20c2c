//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `FARINE_DATA_DIR` - Directory holding the persisted store documents
//!   (default: `.farine`)

use std::path::PathBuf;

use thiserror::Error;

/// Default data directory, relative to the working directory.
const DEFAULT_DATA_DIR: &str = ".farine";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding one JSON document per store.
    pub data_dir: PathBuf,
}

impl CliConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `FARINE_DATA_DIR` is set but
    /// empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = match std::env::var("FARINE_DATA_DIR") {
            Ok(dir) if dir.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    "FARINE_DATA_DIR".to_owned(),
                    "must not be empty".to_owned(),
                ));
            }
            Ok(dir) => PathBuf::from(dir),
            Err(_) => PathBuf::from(DEFAULT_DATA_DIR),
        };

        Ok(Self { data_dir })
    }
}
