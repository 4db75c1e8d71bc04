//! Log backend installation.
//!
//! Components log through the `log` macros only. [`init`] installs a single
//! `env_logger` whose output goes to stdout and, when configured, is appended to a
//! log file. env_logger holds its pipe behind a lock, so lines from concurrent
//! connections never interleave.

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::Level;

use crate::server::Error;

/// Target for per-request audit lines.
pub const REQUEST: &str = "request";

/// Target for per-response audit lines.
pub const RESPONSE: &str = "response";

/// Writes everything to stdout and, if present, to a file.
struct Tee {
    file: Option<File>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// The label printed before a message: `REQUEST`/`RESPONSE` for the audit
/// targets, the level otherwise.
pub fn line_label(target: &str, level: Level) -> Cow<'static, str> {
    match target {
        REQUEST => Cow::Borrowed("REQUEST"),
        RESPONSE => Cow::Borrowed("RESPONSE"),
        _ => Cow::Owned(level.to_string()),
    }
}

/// Install the process-wide logger. `RUST_LOG` overrides the default `info` filter.
pub fn init(log_file: Option<&Path>) -> Result<(), Error> {
    let file = log_file
        .map(|path| OpenOptions::new().create(true).append(true).open(path))
        .transpose()?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                buf.timestamp_seconds(),
                line_label(record.target(), record.level()),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(Tee { file })))
        .try_init()
        .map_err(|e| Error::LoggingError(e.to_string()))
}
