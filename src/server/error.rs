//! Error types for the HTTP server.

use thiserror::Error;

use crate::parser::Error as ParserError;

/// Errors that can occur during HTTP server operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file could not be decoded.
    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] serde_json::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    /// The log backend could not be installed.
    #[error("Logging setup failed: {0}")]
    LoggingError(String),
}
