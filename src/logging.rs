//! Logging setup for the `listpack` binary, using `tracing-subscriber`.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary.
//!
//! # Log Levels
//!
//! - `warn`: unparsable timestamps, ignored drop fields
//! - `info`: run open and close summaries
//! - `debug`: partition opens, per-record progress
//! - `trace`: everything else
//!
//! `RUST_LOG` takes precedence over the configured level.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    /// Include the module path in each line.
    pub with_target: bool,
    pub with_ansi: bool,
    /// When set, logs are appended to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            with_target: false,
            with_ansi: true,
            log_file: None,
        }
    }
}

impl LogConfig {
    /// Create a `LogConfig` from CLI verbosity.
    ///
    /// - `quiet`: warn level
    /// - 0 (no `-v`): info level
    /// - 1 (`-v`): debug level
    /// - 2+ (`-vv`): trace level
    #[must_use]
    pub fn from_verbosity(verbosity: u8, quiet: bool) -> Self {
        let level = match (quiet, verbosity) {
            (true, _) => Level::WARN,
            (false, 0) => Level::INFO,
            (false, 1) => Level::DEBUG,
            (false, _) => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    /// Set the log file path (writes to stderr when None).
    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.with_ansi = path.is_none();
        self.log_file = path;
        self
    }
}

/// Installs the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_logging_with_writer(config, SharedFileWriter::new(file));
    } else {
        init_logging_with_writer(config, io::stderr);
    }
    Ok(())
}

/// Installs the global subscriber with a custom writer.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target)
        .without_time();

    // A second initialization (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init();
}

fn build_env_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    // Dependencies stay at warn.
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,listpack={level}")))
}

#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl SharedFileWriter {
    fn new(file: std::fs::File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct SharedFileGuard {
    file: Arc<Mutex<std::fs::File>>,
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}
