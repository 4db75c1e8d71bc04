//! Message framing: where the head ends and how long the body is.
//!
//! These helpers are shared by [`parse_request`](crate::parser::parse_request) and by the
//! server's accumulating reader, which needs to know when it has seen a whole request.

use std::collections::HashMap;

/// The empty line separating the header section from the body.
pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Line separator inside the header section.
pub const CRLF: &str = "\r\n";

/// Name of the header that governs body length. Matched exactly.
pub const CONTENT_LENGTH: &str = "Content-Length";

/// Split a buffer into its header section and body remainder.
///
/// The split happens at the first `CRLF CRLF`. When no terminator is present the
/// whole buffer is the header section and the remainder is empty.
pub fn split_head(buf: &[u8]) -> (&[u8], &[u8]) {
    match find_head_end(buf) {
        Some(end) => (&buf[..end], &buf[end + HEAD_TERMINATOR.len()..]),
        None => (buf, &[]),
    }
}

/// Index of the first `CRLF CRLF` in `buf`, if any.
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_TERMINATOR.len())
        .position(|window| window == HEAD_TERMINATOR)
}

/// Split a header line on its first colon and trim both halves.
///
/// Returns `None` for lines without a colon; callers skip those.
pub fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(':')
        .map(|(name, value)| (name.trim(), value.trim()))
}

/// The declared body length, if `Content-Length` is present and a non-negative integer.
pub fn content_length(headers: &HashMap<String, String>) -> Option<usize> {
    headers.get(CONTENT_LENGTH)?.parse().ok()
}

/// Whether `buf` holds a complete request: the head terminator has arrived and at
/// least as many body bytes as `Content-Length` declares.
pub fn is_complete(buf: &[u8]) -> bool {
    FrameScanner::new().is_complete(buf)
}

/// Completeness check for a request that arrives in pieces.
///
/// Only bytes not seen by an earlier call are searched for the head terminator,
/// and the declared body length is read once, when the terminator turns up.
#[derive(Debug, Default)]
pub struct FrameScanner {
    scanned: usize,
    body_start: Option<usize>,
    declared: usize,
}

impl FrameScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `buf` now holds a complete request. Each call must pass a buffer
    /// that extends the one passed before.
    pub fn is_complete(&mut self, buf: &[u8]) -> bool {
        if self.body_start.is_none() {
            // The terminator may straddle the previous boundary.
            let from = self.scanned.saturating_sub(HEAD_TERMINATOR.len() - 1);
            self.scanned = buf.len();
            let Some(offset) = find_head_end(&buf[from..]) else {
                return false;
            };
            let end = from + offset;
            self.declared = declared_length(&buf[..end]);
            self.body_start = Some(end + HEAD_TERMINATOR.len());
        }

        match self.body_start {
            Some(start) => buf.len() - start >= self.declared,
            None => false,
        }
    }
}

/// `Content-Length` of a raw header section, or 0 when absent or unparseable.
fn declared_length(head: &[u8]) -> usize {
    let head = String::from_utf8_lossy(head);
    // Last occurrence wins, as in the parser.
    head.split(CRLF)
        .skip(1)
        .filter_map(parse_header_line)
        .filter(|(name, _)| *name == CONTENT_LENGTH)
        .last()
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0)
}
