//! Engine settings
//!
//! Settings bound the definition tree construction (recursion depth,
//! default constructor choice) and tune the unique-value generators. They
//! can be loaded from TOML files and/or environment variables.

mod defaults;
mod loading;


use crate::configuration::CtorSelectionPolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

pub use defaults::{DEFAULT_DECIMAL_SCALE, DEFAULT_MAX_DEPTH};

/// Returns the path to the global settings file
///
/// The global settings are stored at `~/.fixtura/config.toml` and apply to
/// every test process that does not pass an explicit path.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".fixtura").join("config.toml"))
}

/// Definition tree construction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionConfig {
    /// Maximum nesting of anonymous fixtures before construction fails
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Constructor choice when no overload is configured
    #[serde(default)]
    pub ctor_selection: CtorSelectionPolicy,
}

/// Unique-value generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueConfig {
    /// Number of fractional digits of generated decimals
    #[serde(default = "default_decimal_scale")]
    pub decimal_scale: u8,

    /// Retries after a decimal could not be constructed
    #[serde(default = "default_decimal_max_retries")]
    pub decimal_max_retries: usize,

    /// Length of generated byte arrays
    #[serde(default = "default_byte_array_length")]
    pub byte_array_length: usize,
}

/// Main settings structure of the fixture engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Definition tree settings
    #[serde(default)]
    pub definition: DefinitionConfig,

    /// Unique-value generator settings
    #[serde(default)]
    pub unique: UniqueConfig,
}

impl Default for DefinitionConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            ctor_selection: CtorSelectionPolicy::default(),
        }
    }
}

impl Default for UniqueConfig {
    fn default() -> Self {
        Self {
            decimal_scale: default_decimal_scale(),
            decimal_max_retries: default_decimal_max_retries(),
            byte_array_length: default_byte_array_length(),
        }
    }
}

impl Config {
    /// Validates the settings
    pub fn validate(&self) -> Result<()> {
        if self.definition.max_depth == 0 {
            return Err(Error::config(
                "definition.max_depth must be greater than 0".to_string(),
            ));
        }

        if self.unique.decimal_scale > crate::value::DECIMAL_MAX_SCALE {
            return Err(Error::config(format!(
                "unique.decimal_scale too large (max {}, got {})",
                crate::value::DECIMAL_MAX_SCALE,
                self.unique.decimal_scale
            )));
        }

        if self.unique.decimal_max_retries == 0 {
            return Err(Error::config(
                "unique.decimal_max_retries must be greater than 0".to_string(),
            ));
        }

        if self.unique.byte_array_length == 0 {
            return Err(Error::config(
                "unique.byte_array_length must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Saves the settings to a TOML file, creating missing parent directories
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
