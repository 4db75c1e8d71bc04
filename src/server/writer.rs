//! Response serialization with `Accept-Encoding` negotiation.

use std::io::{self, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, error};

use crate::parser::HttpRequest;
use crate::server::response::HttpResponse;

/// The only content coding this server applies.
pub const GZIP: &str = "gzip";

/// Whether the client listed `gzip` in `Accept-Encoding`.
///
/// The header value is split on `", "` and each token compared exactly, so
/// `gzip;q=1.0` or `GZIP` do not count.
pub fn accepts_gzip(request: &HttpRequest) -> bool {
    request
        .get_header("Accept-Encoding")
        .map(|value| value.split(", ").any(|coding| coding == GZIP))
        .unwrap_or(false)
}

/// Compress `body` into a gzip stream.
pub fn gzip(body: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body)?;
    encoder.finish()
}

/// Serialize `response` for the client that sent `request`.
///
/// When the client accepts gzip the body is compressed and `Content-Encoding: gzip`
/// is added. If compression fails the failure is logged and the body goes out as is.
pub fn write_response(mut response: HttpResponse, request: &HttpRequest) -> Vec<u8> {
    if accepts_gzip(request) {
        match gzip(&response.body) {
            Ok(compressed) => {
                debug!("Compressed body from {} to {} bytes", response.body.len(), compressed.len());
                response.body = compressed;
                response.headers.insert("Content-Encoding".to_string(), GZIP.to_string());
            }
            Err(e) => {
                error!("Failed to compress response body: {e}");
            }
        }
    }

    response.to_bytes()
}
