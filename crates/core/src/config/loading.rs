//! Settings loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;

use super::defaults::*;
use super::{global_config_path, Config};

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads settings from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `FIXTURA_` and use double underscores
    /// for nested values. For example:
    /// - `FIXTURA_DEFINITION__MAX_DEPTH=8`
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // config crate doesn't apply serde defaults for missing sections
        let builder =
            set_config_default(builder, "definition.max_depth", default_max_depth() as i64)?;
        let builder = set_config_default(builder, "definition.ctor_selection", "most_parameters")?;
        let builder = set_config_default(
            builder,
            "unique.decimal_scale",
            i64::from(default_decimal_scale()),
        )?;
        let builder = set_config_default(
            builder,
            "unique.decimal_max_retries",
            default_decimal_max_retries() as i64,
        )?;
        let mut builder = set_config_default(
            builder,
            "unique.byte_array_length",
            default_byte_array_length() as i64,
        )?;

        // Add the settings file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with FIXTURA_ prefix
        builder = builder.add_source(
            Environment::with_prefix("FIXTURA")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        let settings: Config = config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Creates settings from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load settings from a single file
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Settings file (~/.fixtura/config.toml or a custom path)
    /// 3. Environment variables (FIXTURA_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
