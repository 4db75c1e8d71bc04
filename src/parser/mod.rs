//! HTTP parser module.
//!
//! Turns the bytes read from a connection into an [`HttpRequest`]: request line,
//! colon-delimited headers and a `Content-Length`-framed body.

mod request;
mod method;
mod error;
pub mod framing;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use error::Error;

// Re-export the parse_request function
pub use request::parse_request;
