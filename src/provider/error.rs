use std::path::PathBuf;

/// Provider database errors
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// The database file could not be read
    #[error("failed to read provider database {path}: {details}")]
    Io {
        /// Path of the database file
        path: PathBuf,
        /// Underlying I/O error
        details: String,
    },

    /// The database is not well-formed
    #[error("failed to parse provider database at {location}: {details}")]
    Parse {
        /// File path, or a description of the in-memory source
        location: String,
        /// Parser message
        details: String,
    },
}
