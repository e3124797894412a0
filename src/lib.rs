//! Prepaid SIM balance manager.
//!
//! Talks to ModemManager over D-Bus to find the modem, read the SIM identity
//! and send USSD commands. The mobile broadband provider database maps the
//! SIM's network to a provider and tells which USSD codes query the balance
//! or redeem a voucher. Known SIMs and their last balance are kept in a small
//! JSON account store.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use prepaid_manager::provider::{ProviderCatalog, ServiceProviderDb};
//! use std::path::Path;
//!
//! let db = ServiceProviderDb::load(
//!     Path::new("/usr/share/mobile-broadband-provider-info/serviceproviders.xml"),
//!     Path::new("/usr/share/zoneinfo/iso3166.tab"),
//! )?;
//! println!("{:?}", db.list_provider_names("de"));
//! # Ok::<(), prepaid_manager::provider::CatalogError>(())
//! ```

/// SIM accounts and their persistence.
pub mod account;

/// Session state machine from modem discovery to a bound provider.
pub mod bootstrap;

/// Command-line interface.
pub mod cli;

/// Configuration schema definitions and loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Provider database and provider resolution.
pub mod provider;

/// D-Bus services.
pub mod services;

/// Logging setup.
pub mod tracing_config;

#[cfg(test)]
mod testing;

/// Re-exported core types for convenience.
pub use core::{PrepaidError, Result};
