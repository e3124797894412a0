mod file_creation;

use std::{fs, path::Path};

use file_creation::create_default_config_file;
use tracing::{debug, instrument};

use super::{Config, ConfigPaths};
use crate::{PrepaidError, Result};

impl Config {
    /// Loads the configuration from `path`.
    ///
    /// A missing file is replaced by a commented default file and the
    /// defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file cannot be read or created
    /// - The TOML content is invalid
    /// - The TOML does not match the configuration schema
    #[instrument]
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!("No configuration file, writing defaults");
            create_default_config_file(path)?;
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| PrepaidError::io(e, path))?;
        Self::from_toml(&content, Some(path))
    }

    /// Loads the configuration from the default location.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined or loading fails
    pub fn load_default() -> Result<Config> {
        let path = ConfigPaths::main_config()?;
        Self::load(&path)
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    /// Returns an error if the TOML is malformed or fails schema validation
    pub fn from_toml(content: &str, path: Option<&Path>) -> Result<Config> {
        let value: toml::Value =
            toml::from_str(content).map_err(|e| PrepaidError::toml_parse(e, path))?;

        value
            .try_into()
            .map_err(|e| PrepaidError::ConfigValidation {
                component: "config parsing".to_string(),
                details: format!("Configuration validation failed: {e}"),
            })
    }
}
