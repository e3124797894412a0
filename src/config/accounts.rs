use std::{io, path::PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigPaths;

/// Persisted account store settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct AccountsConfig {
    /// Location of the account file. Defaults to `accounts.json` in the config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl AccountsConfig {
    /// Resolved location of the account file.
    ///
    /// # Errors
    /// Returns an error if no path is configured and the config directory cannot be determined
    pub fn store_path(&self) -> Result<PathBuf, io::Error> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => ConfigPaths::accounts_file(),
        }
    }
}
