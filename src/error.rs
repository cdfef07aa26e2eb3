//! Error types for the dictionary.

use thiserror::Error;

/// Error variants for building, loading and saving dictionaries.
///
/// Query misses are not errors: lookups return [`None`] or an empty vector
/// instead.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred while reading or writing a serialized image.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialized image was truncated or internally inconsistent.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}

/// A specialized Result type for dictionary operations.
pub type Result<T> = std::result::Result<T, Error>;
