//! Persisted SIM accounts.

/// Account store errors
mod error;
/// JSON file store
mod json;
/// Account record
mod record;
/// Store interface
mod store;

pub use error::AccountError;
pub use json::JsonAccountStore;
pub use record::Account;
pub use store::AccountStore;
