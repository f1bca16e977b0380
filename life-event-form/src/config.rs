//! Form host configuration, read from a TOML file.
//!
//! Every section and key is optional:
//!
//! ```toml
//! [export]
//! output_dir = "exports"
//!
//! [logging]
//! level = "debug"
//! file = "life-event.log"
//! stdout = true
//!
//! [calculation]
//! rounding = "half-even"
//! today = "2025-03-10"
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use life_event_core::{LifeEventInput, RoundingPolicy};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    pub export: ExportConfig,
    pub logging: LoggingConfig,
    pub calculation: CalculationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory exported records are written to. Created on first export.
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level or full `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    /// Append log records to this file in addition to stdout.
    pub file: Option<PathBuf>,
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            stdout: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculationConfig {
    pub rounding: RoundingPolicy,
    /// Pins "today" for open-ended employment. Uses the local date when unset.
    pub today: Option<NaiveDate>,
}

impl FormConfig {
    /// Reads configuration from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_toml(path)
    }

    /// Reads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

/// Reads a prefilled form from a TOML file.
///
/// Keys may be camelCase (`employerName`) or snake_case (`employer_name`).
pub fn load_input(path: &Path) -> Result<LifeEventInput, ConfigError> {
    read_toml(path)
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
