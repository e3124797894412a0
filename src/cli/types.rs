use thiserror::Error;

use crate::{PrepaidError, account::AccountError, provider::CatalogError, services::modem::ModemError};

/// Errors that can occur during CLI command execution.
///
/// Each variant names the subsystem that failed so the message printed to
/// the user says where to look.
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid arguments were provided to a command.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The configuration could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The provider database could not be loaded.
    #[error("Provider database error: {0}")]
    Catalog(#[from] CatalogError),

    /// The account store could not be opened.
    #[error("Account store error: {0}")]
    Accounts(#[from] AccountError),

    /// The modem service could not be reached or gave up.
    #[error("Modem error: {0}")]
    Modem(#[from] ModemError),

    /// The session ended without reaching the requested result.
    #[error("Service error: {0}")]
    ServiceError(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<PrepaidError> for CliError {
    fn from(err: PrepaidError) -> Self {
        CliError::ConfigError(err.to_string())
    }
}

/// Output of a command, or what went wrong.
pub type CommandResult = Result<String, CliError>;
