//! Error types for data operations.
//!
//! This module defines [`DataError`] which covers all error cases that can occur
//! when fetching, parsing, or storing company data.

use thiserror::Error;

/// Errors that can occur during data operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// The upstream API answered with a non-200 status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status code.
        status: u16,
        /// Response body, kept for diagnostics.
        body: String,
    },

    /// The requested symbol was not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Error parsing data from a provider or from the store.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the company store.
    #[error("Store error: {0}")]
    Store(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = DataError::Http {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: not found");
    }
}
