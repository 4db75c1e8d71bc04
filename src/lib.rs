//! A minimal HTTP/1.1 server.
//!
//! Each connection carries one request. The bytes are parsed into an
//! [`HttpRequest`], routed by path prefix, and the [`HttpResponse`] is written back,
//! gzip-encoded when the client asks for it. Then the connection is closed.
//!
//! # Routes
//!
//! - `GET /` answers `200 OK` with no body
//! - `GET /echo/{text}` returns `text` as `text/plain`
//! - `GET /user-agent` returns the `User-Agent` header
//! - `GET /file/{name}` and `POST /file/{name}` read and write files under the storage root
//!
//! # Examples
//!
//! ## Parsing
//!
//! ```
//! use tinyhttpd::parse_request;
//!
//! let raw = b"POST /file/notes HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
//! let request = parse_request(raw).unwrap();
//!
//! assert_eq!(request.target, "/file/notes");
//! assert_eq!(request.body, b"hello");
//! ```
//!
//! ## Routing and writing
//!
//! ```
//! use std::sync::Arc;
//! use tinyhttpd::{parse_request, write_response, DiskStore, Router, StatusCode, UserAgentPolicy};
//!
//! let router = Router::new(Arc::new(DiskStore::new("./files")), UserAgentPolicy::NotFound);
//! let request = parse_request(b"GET /echo/abc HTTP/1.1\r\n\r\n").unwrap();
//!
//! let (response, _outcome) = router.handle(&request);
//! assert_eq!(response.status, StatusCode::Ok);
//!
//! let bytes = write_response(response, &request);
//! assert!(bytes.ends_with(b"\r\n\r\nabc"));
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

pub mod logging;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, Method, parse_request};
pub use server::{
    DiskStore, Error as ServerError, FileStore, HttpResponse, HttpServer, ReadMode, RouteOutcome, Router,
    ServerConfig, StatusCode, StoreError, UserAgentPolicy, write_response,
};
