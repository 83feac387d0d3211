//! Error handling for the explorer core
//!
//! One error type covers configuration, binary decoding, and node
//! communication, with typed variants for every decode failure so callers
//! can tell malformed data apart from transport problems.

use thiserror::Error;

/// Result type alias for explorer core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the explorer core
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Hex decoding errors
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input buffer ended before a required read
    #[error("truncated input: needed {expected} bytes, got {actual}")]
    TruncatedInput { expected: usize, actual: usize },

    /// A decoded offset points outside the buffer
    #[error("offset out of bounds: [{start}, {end}) in a buffer of {len} bytes")]
    OffsetOutOfBounds { start: usize, end: usize, len: usize },

    /// A fixed-width field had the wrong length
    #[error("unexpected field length: expected {expected} bytes, got {actual}")]
    UnexpectedLength { expected: usize, actual: usize },

    /// JSON-RPC error object returned by the node
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Node communication errors
    #[error("Node error: {message}")]
    Node { message: String },

    /// Inconsistent persistence-supplied data
    #[error("Data error: {message}")]
    Data { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a truncated-input error
    pub fn truncated(expected: usize, actual: usize) -> Self {
        Self::TruncatedInput { expected, actual }
    }

    /// Create an out-of-bounds error
    pub fn out_of_bounds(start: usize, end: usize, len: usize) -> Self {
        Self::OffsetOutOfBounds { start, end, len }
    }

    /// Create an unexpected-length error
    pub fn unexpected_length(expected: usize, actual: usize) -> Self {
        Self::UnexpectedLength { expected, actual }
    }

    /// Create an RPC error from a node error object
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Create a node error
    pub fn node(message: impl Into<String>) -> Self {
        Self::Node {
            message: message.into(),
        }
    }

    /// Create a data error
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data {
            message: message.into(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => {
                if let Some(status) = e.status() {
                    status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
                } else {
                    // Network errors are typically retryable
                    e.is_timeout() || e.is_connect() || e.is_request()
                }
            }
            Error::Node { .. } => true,
            Error::Io(_) => true,
            _ => false,
        }
    }

    /// Get error category for metrics/logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Http(_) => "http",
            Error::Json(_) => "json",
            Error::Yaml(_) => "yaml",
            Error::Io(_) => "io",
            Error::Hex(_) => "hex",
            Error::Config { .. } => "config",
            Error::TruncatedInput { .. } => "truncated_input",
            Error::OffsetOutOfBounds { .. } => "offset_out_of_bounds",
            Error::UnexpectedLength { .. } => "unexpected_length",
            Error::Rpc { .. } => "rpc",
            Error::Node { .. } => "node",
            Error::Data { .. } => "data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_messages() {
        let err = Error::truncated(12, 4);
        assert_eq!(err.to_string(), "truncated input: needed 12 bytes, got 4");

        let err = Error::out_of_bounds(16, 48, 20);
        assert_eq!(
            err.to_string(),
            "offset out of bounds: [16, 48) in a buffer of 20 bytes"
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(Error::truncated(4, 0).category(), "truncated_input");
        assert_eq!(Error::node("down").category(), "node");
        assert_eq!(Error::rpc(-32602, "bad params").category(), "rpc");
    }

    #[test]
    fn test_retryable() {
        assert!(Error::node("connection reset").is_retryable());
        assert!(!Error::truncated(4, 0).is_retryable());
        assert!(!Error::rpc(-32602, "bad params").is_retryable());
    }
}
