//! Layered configuration: built-in defaults, then `invest-sim.toml`, then
//! command-line flags.
//!
//! ```toml
//! backend = "json"
//! database = "simulations.json"
//! fallback_frequency = 12
//! log_level = "debug"
//! ```

use std::path::{Path, PathBuf};

use invest_core::db::DbConfig;
use invest_core::input::InputDefaults;
use invest_core::CompoundingFrequency;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "invest-sim.toml";

pub const DEFAULT_BACKEND: &str = "sqlite";
pub const DEFAULT_DATABASE: &str = "simulations.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("fallback_frequency must be at least 1")]
    ZeroFallbackFrequency,
}

/// One configuration layer. Every key is optional so layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub backend: Option<String>,
    pub database: Option<String>,
    pub fallback_frequency: Option<u32>,
    pub log_level: Option<String>,
}

impl ConfigLayer {
    pub fn from_toml(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Loads `explicit` when given (it must exist), otherwise
    /// [`DEFAULT_CONFIG_FILE`] if present, otherwise an empty layer.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let implicit = Path::new(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            debug!(path = DEFAULT_CONFIG_FILE, "loading config file");
            Self::load(implicit)
        } else {
            Ok(Self::default())
        }
    }

    /// Keys set in `over` replace keys in `self`.
    pub fn merge(
        self,
        over: ConfigLayer,
    ) -> Self {
        Self {
            backend: over.backend.or(self.backend),
            database: over.database.or(self.database),
            fallback_frequency: over.fallback_frequency.or(self.fallback_frequency),
            log_level: over.log_level.or(self.log_level),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db: DbConfig,
    pub input: InputDefaults,
    /// `None` leaves the level to `RUST_LOG`.
    pub log_level: Option<String>,
}

impl TryFrom<ConfigLayer> for Settings {
    type Error = ConfigError;

    fn try_from(layer: ConfigLayer) -> Result<Self, Self::Error> {
        let fallback_frequency = match layer.fallback_frequency {
            Some(n) => CompoundingFrequency::new(n).ok_or(ConfigError::ZeroFallbackFrequency)?,
            None => CompoundingFrequency::default(),
        };

        Ok(Self {
            db: DbConfig {
                backend: layer.backend.unwrap_or_else(|| DEFAULT_BACKEND.to_string()),
                connection_string: layer
                    .database
                    .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            },
            input: InputDefaults { fallback_frequency },
            log_level: layer.log_level,
        })
    }
}
