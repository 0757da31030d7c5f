//! Error types for docsearch-index

use thiserror::Error;

/// Errors that can occur while building or querying an index
#[derive(Debug, Error)]
pub enum IndexError {
    /// Field declarations cannot produce a scorable index
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A filter referenced a field that was not declared as a keyword field
    #[error("Unknown keyword field: {0}")]
    UnknownKeywordField(String),

    /// Zip archive could not be read
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an unknown keyword field error
    pub fn unknown_keyword_field(field: impl Into<String>) -> Self {
        Self::UnknownKeywordField(field.into())
    }
}

/// Result type for index operations
pub type Result<T> = std::result::Result<T, IndexError>;
