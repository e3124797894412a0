//! Configuration schema definitions and loading.
//!
//! Defines the configuration structure for the prepaid manager: logging,
//! modem polling behaviour, provider database locations and the account
//! store path. All sections are optional in the TOML file and fall back
//! to defaults.

mod accounts;
mod general;
mod loading;
mod modem;
mod paths;
mod providers;

#[cfg(test)]
mod tests;

pub use accounts::AccountsConfig;
pub use general::{GeneralConfig, LogLevel};
pub use modem::ModemConfig;
pub use paths::ConfigPaths;
pub use providers::ProvidersConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure.
///
/// Represents the complete configuration schema that can be loaded
/// from TOML files. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Modem service polling and restart behaviour.
    #[serde(default)]
    pub modem: ModemConfig,

    /// Mobile broadband provider database locations.
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Persisted account store settings.
    #[serde(default)]
    pub accounts: AccountsConfig,
}
