//! Provider database and provider resolution.

/// Provider database
mod catalog;
/// Provider database errors
mod error;
/// Provider records and balance operations
mod record;
/// Identity to provider mapping
mod resolution;

pub use catalog::{ProviderCatalog, ServiceProviderDb, load_country_names, parse_country_names};
pub use error::CatalogError;
pub use record::{Provider, SmsCommand, TopUpTemplate};
pub use resolution::{ProviderResolver, Resolution};
