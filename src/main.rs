//! tinyhttpd entry point.
//!
//! Configuration is layered: built-in defaults, then an optional JSON file
//! (`--config`), then command-line flags and their environment variables.

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use tinyhttpd::{logging, HttpServer, ReadMode, ServerConfig, ServerError, UserAgentPolicy};

/// A minimal HTTP/1.1 server with echo, user-agent and file routes.
#[derive(Debug, Parser)]
#[command(name = "tinyhttpd", version, about)]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(short, long, env = "TINYHTTPD_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, env = "TINYHTTPD_ADDR")]
    addr: Option<SocketAddr>,

    /// Directory served by /file/{name}
    #[arg(long, visible_alias = "directory", env = "TINYHTTPD_STORAGE_ROOT")]
    storage_root: Option<PathBuf>,

    /// File that log lines are appended to
    #[arg(long, env = "TINYHTTPD_LOG_FILE", conflicts_with = "no_log_file")]
    log_file: Option<PathBuf>,

    /// Log to stdout only
    #[arg(long)]
    no_log_file: bool,

    /// How request bytes are collected
    #[arg(long, value_enum, env = "TINYHTTPD_READ_MODE")]
    read_mode: Option<ReadMode>,

    /// Size of each receive, in bytes
    #[arg(long, env = "TINYHTTPD_READ_BUFFER_SIZE")]
    read_buffer_size: Option<usize>,

    /// Upper bound on a request in accumulate mode, in bytes
    #[arg(long, env = "TINYHTTPD_MAX_REQUEST_SIZE")]
    max_request_size: Option<usize>,

    /// Deadline for reading a request, in milliseconds
    #[arg(long, env = "TINYHTTPD_READ_TIMEOUT_MS")]
    read_timeout_ms: Option<u64>,

    /// Status for /user-agent when the header is missing
    #[arg(long, value_enum, env = "TINYHTTPD_USER_AGENT_POLICY")]
    user_agent_policy: Option<UserAgentPolicy>,
}

impl Cli {
    /// Merge the flags over the file configuration (or the defaults).
    fn into_config(self) -> Result<ServerConfig, ServerError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_json_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(addr) = self.addr {
            config.addr = addr;
        }
        if let Some(root) = self.storage_root {
            config.storage_root = root;
        }
        if self.no_log_file {
            config.log_file = None;
        } else if let Some(log_file) = self.log_file {
            config.log_file = Some(log_file);
        }
        if let Some(mode) = self.read_mode {
            config.read_mode = mode;
        }
        if let Some(size) = self.read_buffer_size {
            config.read_buffer_size = size;
        }
        if let Some(size) = self.max_request_size {
            config.max_request_size = size;
        }
        if let Some(ms) = self.read_timeout_ms {
            config.read_timeout_ms = Some(ms);
        }
        if let Some(policy) = self.user_agent_policy {
            config.user_agent_policy = policy;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(config.log_file.as_deref())?;

    fs::create_dir_all(&config.storage_root)?;
    info!("Starting HTTP server on {}", config.addr);

    if let Err(e) = HttpServer::new(config).start().await {
        error!("Failed to start server: {e}");
        return Err(e.into());
    }

    Ok(())
}
