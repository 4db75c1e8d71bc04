//! HTTP server implementation for tinyhttpd.
//!
//! This module holds the router, the response model and writer, the file store
//! behind `/file`, and the tokio driver that ties them to TCP connections.

mod response;
mod config;
mod error;
mod router;
mod store;
mod writer;
mod http_server;

// Re-export public items
pub use response::{HttpResponse, StatusCode};
pub use config::{ReadMode, ServerConfig, UserAgentPolicy};
pub use error::Error;
pub use router::{Route, RouteOutcome, Router};
pub use store::{DiskStore, FileStore, StoreError};
pub use writer::{accepts_gzip, gzip, write_response};
pub use http_server::{BoundServer, HttpServer};
