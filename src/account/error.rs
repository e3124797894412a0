use std::path::PathBuf;

/// Account store errors
#[derive(thiserror::Error, Debug)]
pub enum AccountError {
    /// Reading or writing the store failed
    #[error("account store I/O failed for {path}: {details}")]
    Io {
        /// Path of the store file
        path: PathBuf,
        /// Underlying I/O error
        details: String,
    },

    /// The store file is not valid JSON
    #[error("account store {path} is corrupt: {details}")]
    Corrupt {
        /// Path of the store file
        path: PathBuf,
        /// Parser message
        details: String,
    },
}
