use std::{
    collections::HashMap,
    fs,
    path::Path,
    sync::Arc,
};

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{CatalogError, Provider, SmsCommand, TopUpTemplate};
use crate::services::modem::NetworkId;

/// Read-only lookup of providers.
pub trait ProviderCatalog: Send + Sync {
    /// Providers issuing SIMs for `network`, in database order.
    fn lookup_by_network_id(&self, network: &NetworkId) -> Vec<Arc<Provider>>;

    /// The provider called `name` in `country`.
    fn lookup_by_country_and_name(&self, country: &str, name: &str) -> Option<Arc<Provider>>;

    /// Every country in the database as `(display name, code)`.
    ///
    /// The display name is absent when the code is not in the country table.
    fn list_countries(&self) -> Vec<(Option<String>, String)>;

    /// Names of all providers in `country`.
    fn list_provider_names(&self, country: &str) -> Vec<String>;
}

#[derive(Deserialize)]
struct ServiceProvidersXml {
    #[serde(rename = "country", default)]
    countries: Vec<CountryXml>,
}

#[derive(Deserialize)]
struct CountryXml {
    #[serde(rename = "@code")]
    code: String,
    #[serde(rename = "provider", default)]
    providers: Vec<ProviderXml>,
}

#[derive(Deserialize)]
struct ProviderXml {
    #[serde(rename = "name", default)]
    names: Vec<TextXml>,
    #[serde(default)]
    gsm: Option<GsmXml>,
}

#[derive(Deserialize)]
struct TextXml {
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Deserialize)]
struct GsmXml {
    #[serde(rename = "network-id", default)]
    network_ids: Vec<NetworkIdXml>,
    #[serde(rename = "balance-check", default)]
    balance_check: Vec<CommandsXml>,
    #[serde(rename = "balance-top-up", default)]
    balance_top_up: Vec<CommandsXml>,
}

#[derive(Deserialize)]
struct NetworkIdXml {
    #[serde(rename = "@mcc")]
    mcc: String,
    #[serde(rename = "@mnc")]
    mnc: String,
}

// Repeated elements are collected and the last one wins.
#[derive(Deserialize)]
struct CommandsXml {
    #[serde(default)]
    ussd: Vec<UssdXml>,
    #[serde(default)]
    sms: Vec<SmsXml>,
}

#[derive(Deserialize)]
struct UssdXml {
    #[serde(rename = "@replacement", default)]
    replacement: Option<String>,
    #[serde(rename = "@length", default)]
    length: Option<String>,
    #[serde(rename = "$text", default)]
    sequence: String,
}

#[derive(Deserialize)]
struct SmsXml {
    #[serde(rename = "@text", default)]
    text: String,
    #[serde(rename = "$text", default)]
    number: String,
}

impl From<SmsXml> for SmsCommand {
    fn from(sms: SmsXml) -> Self {
        Self {
            number: sms.number.trim().to_string(),
            text: sms.text,
        }
    }
}

impl ProviderXml {
    fn into_provider(self, country: &str) -> Option<Provider> {
        let name = self.names.into_iter().next()?.text.trim().to_string();
        let mut provider = Provider::new(country, name);

        let Some(mut gsm) = self.gsm else {
            return Some(provider);
        };

        provider.network_ids = gsm
            .network_ids
            .into_iter()
            .map(|id| NetworkId::new(id.mcc, id.mnc))
            .collect();

        if let Some(mut check) = gsm.balance_check.pop() {
            provider.balance_check = check.ussd.pop().map(|ussd| ussd.sequence.trim().to_string());
            provider.sms_balance_check = check.sms.pop().map(SmsCommand::from);
        }

        if let Some(mut top_up) = gsm.balance_top_up.pop() {
            if let Some(ussd) = top_up.ussd.pop() {
                provider.top_up_code_length = ussd.length.as_deref().and_then(|len| len.parse().ok());
                provider.top_up = match ussd.replacement {
                    Some(replacement) if !replacement.is_empty() => Some(TopUpTemplate {
                        sequence: ussd.sequence.trim().to_string(),
                        replacement,
                    }),
                    _ => {
                        warn!(provider = %provider, "Top-up command without replacement marker");
                        None
                    }
                };
            }
            provider.sms_top_up = top_up.sms.pop().map(SmsCommand::from);
        }

        Some(provider)
    }
}

/// The `mobile-broadband-provider-info` database.
///
/// Parsed once; lookups are linear scans over a few thousand entries at
/// most.
#[derive(Debug, Default)]
pub struct ServiceProviderDb {
    countries: Vec<String>,
    providers: Vec<Arc<Provider>>,
    country_names: HashMap<String, String>,
}

impl ServiceProviderDb {
    /// Loads the provider database and the country name table.
    ///
    /// A missing country table only costs the display names.
    ///
    /// # Errors
    /// Returns `CatalogError` if the database cannot be read or parsed
    #[instrument]
    pub fn load(database: &Path, country_codes: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(database).map_err(|err| CatalogError::Io {
            path: database.to_path_buf(),
            details: err.to_string(),
        })?;

        let db = Self::from_xml(&content, &database.display().to_string())?
            .with_country_names(load_country_names(country_codes));

        info!(
            countries = db.countries.len(),
            providers = db.providers.len(),
            "Loaded provider database"
        );
        Ok(db)
    }

    /// Parses a database document. `location` only shows up in errors.
    ///
    /// # Errors
    /// Returns `CatalogError::Parse` if `xml` is not a provider database
    pub fn from_xml(xml: &str, location: &str) -> Result<Self, CatalogError> {
        let document: ServiceProvidersXml =
            quick_xml::de::from_str(xml).map_err(|err| CatalogError::Parse {
                location: location.to_string(),
                details: err.to_string(),
            })?;

        let mut db = Self::default();
        for country in document.countries {
            let code = country.code.to_lowercase();
            for entry in country.providers {
                match entry.into_provider(&code) {
                    Some(provider) => db.providers.push(Arc::new(provider)),
                    None => debug!(country = %code, "Skipping provider without name"),
                }
            }
            db.countries.push(code);
        }

        Ok(db)
    }

    /// Builds a database from already constructed providers.
    pub fn from_providers(providers: impl IntoIterator<Item = Provider>) -> Self {
        let mut db = Self::default();
        for provider in providers {
            if !db.countries.contains(&provider.country) {
                db.countries.push(provider.country.clone());
            }
            db.providers.push(Arc::new(provider));
        }
        db
    }

    /// Attaches display names keyed by lower-case country code.
    pub fn with_country_names(mut self, names: HashMap<String, String>) -> Self {
        self.country_names = names;
        self
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the database has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ProviderCatalog for ServiceProviderDb {
    fn lookup_by_network_id(&self, network: &NetworkId) -> Vec<Arc<Provider>> {
        self.providers
            .iter()
            .filter(|provider| provider.network_ids.contains(network))
            .cloned()
            .collect()
    }

    fn lookup_by_country_and_name(&self, country: &str, name: &str) -> Option<Arc<Provider>> {
        self.providers
            .iter()
            .find(|provider| provider.country == country && provider.name == name)
            .cloned()
    }

    fn list_countries(&self) -> Vec<(Option<String>, String)> {
        self.countries
            .iter()
            .map(|code| (self.country_names.get(code).cloned(), code.clone()))
            .collect()
    }

    fn list_provider_names(&self, country: &str) -> Vec<String> {
        self.providers
            .iter()
            .filter(|provider| provider.country == country)
            .map(|provider| provider.name.clone())
            .collect()
    }
}

/// Reads an `iso3166.tab` style table into lower-case code -> name.
///
/// Failure to read the file is logged and yields an empty table.
pub fn load_country_names(path: &Path) -> HashMap<String, String> {
    match fs::read_to_string(path) {
        Ok(content) => parse_country_names(&content),
        Err(err) => {
            warn!("Loading country code database {} failed: {err}", path.display());
            HashMap::new()
        }
    }
}

/// Parses `CODE<TAB>Name` lines; `#` lines are comments.
pub fn parse_country_names(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| line.split_once('\t'))
        .map(|(code, name)| (code.trim().to_lowercase(), name.trim().to_string()))
        .collect()
}
