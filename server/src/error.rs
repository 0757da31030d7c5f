//! Error types for the docsearch server.

use crate::mcp::protocol::JsonRpcError;
use docsearch_index::IndexError;
use thiserror::Error;

/// Errors that can occur while serving tools.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Request to {url} failed with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ServerError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

impl From<ServerError> for JsonRpcError {
    fn from(err: ServerError) -> Self {
        match &err {
            ServerError::InvalidArgument(_)
            | ServerError::UnknownTool(_)
            | ServerError::Index(IndexError::UnknownKeywordField(_)) => {
                JsonRpcError::invalid_params(err.to_string())
            }
            _ => JsonRpcError::internal_error(err.to_string()),
        }
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
