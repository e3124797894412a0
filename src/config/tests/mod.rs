//! Unit tests for config module
//!
//! Tests configuration types, defaults, and serialization.

#![allow(clippy::unwrap_used)]

use std::{path::PathBuf, time::Duration};

use crate::config::{Config, LogLevel};

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, LogLevel::Info);
    assert_eq!(config.modem.poll_interval(), Duration::from_millis(500));
    assert_eq!(config.modem.max_service_polls, 10);
    assert_eq!(config.modem.max_restarts, 3);
    assert!(config.accounts.path.is_none());
}

#[test]
fn config_serialize_toml() {
    let toml_str = toml::to_string(&Config::default()).unwrap();

    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[modem]"));
    assert!(toml_str.contains("[providers]"));
    assert!(toml_str.contains("serviceproviders.xml"));
}

#[test]
fn partial_sections_keep_defaults() {
    let config = Config::from_toml(
        r#"
        [general]
        log_level = "debug"

        [modem]
        max_service_polls = 3
        "#,
        None,
    )
    .unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.modem.max_service_polls, 3);
    assert_eq!(config.modem.poll_interval_ms, 500);
    assert_eq!(config.modem.max_restarts, 3);
}

#[test]
fn accounts_path_is_honoured() {
    let config = Config::from_toml(
        r#"
        [accounts]
        path = "/tmp/ppm/accounts.json"
        "#,
        None,
    )
    .unwrap();

    assert_eq!(
        config.accounts.store_path().unwrap(),
        PathBuf::from("/tmp/ppm/accounts.json")
    );
}

#[test]
fn invalid_log_level_is_rejected() {
    let result = Config::from_toml("[general]\nlog_level = \"loud\"\n", None);
    assert!(result.is_err());
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = Config::from_toml("[modem\n", None).unwrap_err();
    assert!(err.to_string().starts_with("failed to parse TOML at 'string'"));
}

#[test]
fn log_level_filter_caps_dbus_noise() {
    assert_eq!(LogLevel::Debug.filter_directive(), "debug,zbus=warn");
    assert_eq!(LogLevel::Trace.filter_directive(), "trace");
}

#[test]
fn default_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/config.toml");

    let created = Config::load(&path).unwrap();
    assert!(path.exists());

    let reloaded = Config::load(&path).unwrap();
    assert_eq!(created, reloaded);
}
