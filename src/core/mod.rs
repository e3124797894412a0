use std::{
    fmt, io,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

use crate::{account::AccountError, provider::CatalogError, services::modem::ModemError};

/// Error types for the prepaid manager.
///
/// Top-level error that wraps configuration problems and the errors of
/// each subsystem so the binary can report them uniformly.
#[derive(Error, Debug)]
pub enum PrepaidError {
    /// Configuration validation error
    #[error("configuration validation failed for '{component}': {details}")]
    ConfigValidation {
        /// Component that failed validation
        component: String,
        /// Validation error details
        details: String,
    },

    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error (for compatibility)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// Modem service error
    #[error(transparent)]
    Modem(#[from] ModemError),

    /// Provider database error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Account store error
    #[error(transparent)]
    Account(#[from] AccountError),
}

/// A specialized `Result` type for prepaid manager operations.
pub type Result<T> = result::Result<T, PrepaidError>;

impl PrepaidError {
    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        PrepaidError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates an I/O error that remembers which path was involved.
    pub fn io(error: impl fmt::Display, path: &Path) -> Self {
        PrepaidError::IoError {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_parse_without_path_reports_string_location() {
        let err = PrepaidError::toml_parse("expected value", None);
        assert_eq!(
            err.to_string(),
            "failed to parse TOML at 'string': expected value"
        );
    }

    #[test]
    fn modem_errors_are_transparent() {
        let err = PrepaidError::from(ModemError::Device {
            message: "Enable failed: boom".to_string(),
        });
        assert_eq!(err.to_string(), "Enable failed: boom");
    }
}
