//! Error types for the license store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a license store.
///
/// A store that does not exist is not an error; it loads as empty.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The store exists but could not be read.
    #[error("failed to read license store {path}: {source}")]
    Io {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The location of the running executable could not be determined.
    #[error("cannot locate running executable: {0}")]
    ExecutablePath(#[source] std::io::Error),
}

/// Result type for store operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
