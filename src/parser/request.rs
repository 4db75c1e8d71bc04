//! HTTP request parsing and representation.

use std::collections::HashMap;

use crate::parser::error::Error;
use crate::parser::framing::{self, CRLF};
use crate::parser::method::Method;

/// Represents an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target, path plus optional query, not decoded
    pub target: String,
    /// The version token from the request line, if one was sent
    pub version: Option<String>,
    /// The HTTP headers, keyed by their exact name
    pub headers: HashMap<String, String>,
    /// The request body
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `target` - The request target
    /// * `headers` - The HTTP headers
    ///
    /// # Returns
    ///
    /// A new HTTP/1.1 request with an empty body
    pub fn new(method: Method, target: impl Into<String>, headers: HashMap<String, String>) -> Self {
        Self {
            method,
            target: target.into(),
            version: Some("HTTP/1.1".to_string()),
            headers,
            body: Vec::new(),
        }
    }

    /// Create a new HTTP request with a body.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `target` - The request target
    /// * `headers` - The HTTP headers
    /// * `body` - The request body
    ///
    /// # Returns
    ///
    /// A new HTTP request with the specified body
    pub fn with_body(
        method: Method,
        target: impl Into<String>,
        headers: HashMap<String, String>,
        body: Vec<u8>,
    ) -> Self {
        let mut request = Self::new(method, target, headers);
        request.body = body;
        request
    }

    /// Get a header value.
    ///
    /// Names are compared exactly: `user-agent` does not find `User-Agent`.
    ///
    /// # Arguments
    ///
    /// * `name` - The header name
    ///
    /// # Returns
    ///
    /// The header value, if it exists
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }
}

/// Parse an HTTP request from a byte slice.
///
/// The slice is everything that was read from the connection. Only the bytes given
/// are examined; a body shorter than its declared `Content-Length` is kept as is.
///
/// # Arguments
///
/// * `input` - A byte slice containing the HTTP request to parse
///
/// # Returns
///
/// The parsed HTTP request, or an error if the request line is unusable
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    if input.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let (head, remainder) = framing::split_head(input);
    let head = std::str::from_utf8(head).map_err(|_| Error::InvalidEncoding)?;

    let mut lines = head.split(CRLF);

    // `split` always yields at least one item
    let request_line = lines.next().unwrap_or_default();

    let mut parts = request_line.split(' ');
    let method = parts.next().filter(|m| !m.is_empty());
    let target = parts.next().filter(|t| !t.is_empty());
    let (Some(method), Some(target)) = (method, target) else {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    };
    let version = parts.next().map(str::to_string);

    let mut headers = HashMap::new();
    for (name, value) in lines.filter_map(framing::parse_header_line) {
        headers.insert(name.to_string(), value.to_string());
    }

    let body = match framing::content_length(&headers) {
        Some(declared) if declared > 0 => remainder[..declared.min(remainder.len())].to_vec(),
        _ => Vec::new(),
    };

    Ok(HttpRequest {
        method: Method::from(method),
        target: target.to_string(),
        version,
        headers,
        body,
    })
}
