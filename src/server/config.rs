//! Server configuration.

use std::fs;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::server::error::Error;

/// How a connection's request bytes are collected before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReadMode {
    /// One receive of at most `read_buffer_size` bytes.
    #[default]
    Single,
    /// Keep reading until the head and the declared body have arrived, the peer
    /// closes, or `max_request_size` bytes have been read.
    Accumulate,
}

/// Status returned by `/user-agent` when the header is missing or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UserAgentPolicy {
    #[default]
    NotFound,
    BadRequest,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The read buffer size.
    pub read_buffer_size: usize,
    /// How request bytes are collected.
    pub read_mode: ReadMode,
    /// Upper bound on bytes read per request in accumulate mode.
    pub max_request_size: usize,
    /// Deadline for the read phase, in milliseconds. `None` waits forever.
    pub read_timeout_ms: Option<u64>,
    /// Directory served by `/file/{name}`.
    pub storage_root: PathBuf,
    /// Log file appended to alongside stdout.
    pub log_file: Option<PathBuf>,
    /// Answer for `/user-agent` without a `User-Agent` header.
    pub user_agent_policy: UserAgentPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 6969)),
            read_buffer_size: 4096,
            read_mode: ReadMode::default(),
            max_request_size: 1024 * 1024,
            read_timeout_ms: None,
            storage_root: PathBuf::from("./files"),
            log_file: Some(PathBuf::from("./server.log")),
            user_agent_policy: UserAgentPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes under which no request could ever be read.
    pub fn validate(&self) -> Result<(), Error> {
        if self.read_buffer_size == 0 {
            return Err(Error::InvalidConfig("read_buffer_size must be at least 1".to_string()));
        }
        if self.max_request_size == 0 {
            return Err(Error::InvalidConfig("max_request_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// The read deadline as a [`Duration`].
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }
}
