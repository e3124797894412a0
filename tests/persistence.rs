//! Integration tests for the on-disk inputs: configuration, provider
//! database and account store.

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::{fs, path::Path, sync::Arc};

use prepaid_manager::{
    account::{AccountError, AccountStore, JsonAccountStore},
    config::{Config, LogLevel},
    provider::{ProviderCatalog, ProviderResolver, Resolution, ServiceProviderDb},
    services::modem::SimIdentity,
};
use tempfile::TempDir;

const DATABASE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<serviceproviders format="2.0">
  <country code="DE">
    <provider primary="true">
      <name>Example Mobile</name>
      <gsm>
        <network-id mcc="262" mnc="01"/>
        <balance-check>
          <ussd>*100#</ussd>
        </balance-check>
        <balance-top-up>
          <ussd replacement="XXXX" length="16">*101*XXXX#</ussd>
        </balance-top-up>
      </gsm>
    </provider>
    <provider>
      <name>Reseller One</name>
      <gsm>
        <network-id mcc="262" mnc="02"/>
      </gsm>
    </provider>
    <provider>
      <name>Reseller Two</name>
      <gsm>
        <network-id mcc="262" mnc="02"/>
      </gsm>
    </provider>
  </country>
  <country code="AT">
    <provider>
      <name>Alpine</name>
      <gsm>
        <network-id mcc="232" mnc="01"/>
      </gsm>
    </provider>
  </country>
</serviceproviders>
"#;

const COUNTRY_CODES: &str = "# ISO 3166 alpha-2 country codes\n#\nAT\tAustria\nDE\tGermany\n";

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn identity(imsi: &str) -> SimIdentity {
    SimIdentity::parse(imsi).unwrap()
}

mod configuration {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");

        let config = Config::load(&path).unwrap();

        assert_eq!(config, Config::default());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# prepaid-manager configuration file"));
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.toml",
            "[general]\nlog_level = \"debug\"\n\n[modem]\nmax_restarts = 5\n",
        );

        let config = Config::load(&path).unwrap();

        assert_eq!(config.general.log_level, LogLevel::Debug);
        assert_eq!(config.modem.max_restarts, 5);
        assert_eq!(config.modem.max_service_polls, 10);
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.toml", "[modem\nmax_restarts = ");

        assert!(Config::load(&path).is_err());
    }
}

mod provider_database {
    use super::*;

    fn load(dir: &TempDir) -> ServiceProviderDb {
        let database = write(dir, "serviceproviders.xml", DATABASE);
        let countries = write(dir, "iso3166.tab", COUNTRY_CODES);
        ServiceProviderDb::load(&database, &countries).unwrap()
    }

    #[test]
    fn loads_providers_and_country_names() {
        let dir = TempDir::new().unwrap();
        let db = load(&dir);

        assert_eq!(db.len(), 4);
        assert_eq!(
            db.list_countries(),
            vec![
                (Some("Germany".to_string()), "de".to_string()),
                (Some("Austria".to_string()), "at".to_string()),
            ]
        );
        assert_eq!(
            db.list_provider_names("de"),
            vec!["Example Mobile", "Reseller One", "Reseller Two"]
        );
    }

    #[test]
    fn missing_country_table_only_loses_names() {
        let dir = TempDir::new().unwrap();
        let database = write(&dir, "serviceproviders.xml", DATABASE);

        let db = ServiceProviderDb::load(&database, &dir.path().join("absent.tab")).unwrap();

        assert_eq!(db.list_countries()[0], (None, "de".to_string()));
    }

    #[test]
    fn missing_database_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = ServiceProviderDb::load(
            &dir.path().join("serviceproviders.xml"),
            Path::new("/nonexistent/iso3166.tab"),
        );

        assert!(result.is_err());
    }

    #[test]
    fn resolves_sims_against_the_loaded_database() {
        let dir = TempDir::new().unwrap();
        let resolver = ProviderResolver::new(Arc::new(load(&dir)));

        let Resolution::Resolved(provider) =
            resolver.resolve_by_identity(&identity("262011234567890"))
        else {
            panic!("expected a single provider");
        };
        assert_eq!(provider.name, "Example Mobile");
        assert_eq!(provider.top_up.as_ref().unwrap().render("1234"), "*101*1234#");
        assert_eq!(provider.top_up_code_length, Some(16));

        let Resolution::Ambiguous(candidates) =
            resolver.resolve_by_identity(&identity("262021234567890"))
        else {
            panic!("expected several providers");
        };
        assert_eq!(candidates.len(), 2);

        assert!(matches!(
            resolver.resolve_by_identity(&identity("310150123456789")),
            Resolution::Unknown(_)
        ));

        let explicit = resolver.resolve_explicit("at", "Alpine").unwrap();
        assert_eq!(explicit.country, "at");
    }
}

mod account_store {
    use super::*;

    #[test]
    fn accounts_survive_reopening() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state/accounts.json");
        let db = ServiceProviderDb::from_xml(DATABASE, "inline").unwrap();
        let provider = db.lookup_by_country_and_name("de", "Example Mobile").unwrap();
        let sim = identity("262011234567890");

        let mut store = JsonAccountStore::open(&path).unwrap();
        assert!(!store.is_known(&sim));
        let mut account = store.add(&sim, &provider).unwrap();
        assert!(store
            .update_balance(&mut account, "5.00 EUR", "Sun Oct 18 14:02:11 2026")
            .unwrap());
        assert!(!store
            .update_balance(&mut account, "5.00 EUR", "Sun Oct 18 14:02:11 2026")
            .unwrap());

        let reopened = JsonAccountStore::open(&path).unwrap();
        let stored = reopened.fetch(&sim).unwrap().unwrap();

        assert_eq!(stored, account);
        assert_eq!(
            stored.balance(),
            Some(("5.00 EUR", "Sun Oct 18 14:02:11 2026"))
        );
        assert_eq!(reopened.accounts().count(), 1);
    }

    #[test]
    fn unreadable_store_is_reported_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "accounts.json", "{ not json");

        assert!(matches!(
            JsonAccountStore::open(&path),
            Err(AccountError::Corrupt { .. })
        ));
    }
}
