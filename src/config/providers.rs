use std::{env, path::PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the provider database location.
pub const PROVIDER_DB_ENV: &str = "PPM_PROVIDER_DB";

const DEFAULT_DATABASE: &str = "/usr/share/mobile-broadband-provider-info/serviceproviders.xml";
const DEFAULT_COUNTRY_CODES: &str = "/usr/share/zoneinfo/iso3166.tab";

/// Locations of the mobile broadband provider database.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Path to `serviceproviders.xml`.
    pub database: PathBuf,

    /// Path to the ISO 3166 country table used for country display names.
    pub country_codes: PathBuf,
}

impl ProvidersConfig {
    /// Database path, honouring the `PPM_PROVIDER_DB` override.
    pub fn database_path(&self) -> PathBuf {
        env::var_os(PROVIDER_DB_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.database.clone())
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            country_codes: PathBuf::from(DEFAULT_COUNTRY_CODES),
        }
    }
}
