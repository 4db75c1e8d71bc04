//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur during HTTP request parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The request line is missing its method or target.
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The request line and headers are not valid UTF-8.
    #[error("Request head is not valid UTF-8")]
    InvalidEncoding,

    /// The request is empty.
    #[error("Empty request")]
    EmptyRequest,
}
