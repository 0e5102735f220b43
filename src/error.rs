//! Unified error types for listpack.
//!
//! This module provides a single [`ListpackError`] enum covering every fatal
//! condition of a run. Recoverable problems (an unparsable timestamp, a
//! missing field) are not errors: they become the `NA` sentinel and a
//! `tracing` diagnostic.
//!
//! # Error Categories
//!
//! - **Configuration gaps** are surfaced when a run is opened
//!   ([`UnknownSource`](ListpackError::UnknownSource),
//!   [`InvalidConfig`](ListpackError::InvalidConfig))
//! - **Structural violations** mean an input broke an assumption the pipeline
//!   relies on ([`Structural`](ListpackError::Structural))
//! - **I/O failures** while writing exports are fatal to the run
//!   ([`Io`](ListpackError::Io), [`Csv`](ListpackError::Csv),
//!   [`Xml`](ListpackError::Xml))

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for listpack operations.
///
/// # Example
///
/// ```rust
/// use listpack::error::Result;
///
/// fn my_function() -> Result<u64> {
///     Ok(19900808123634)
/// }
/// ```
pub type Result<T> = std::result::Result<T, ListpackError>;

/// The error type for all listpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ListpackError {
    /// An I/O error occurred.
    ///
    /// Typically raised while creating the output directory or an export
    /// file, or while reading the input records.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Writing the tabular export failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing a structured export failed.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Decoding the run configuration or an input record failed.
    #[error("JSON error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    Json {
        /// The underlying decoding error
        #[source]
        source: serde_json::Error,
        /// The file being decoded, if known
        path: Option<PathBuf>,
    },

    /// A line of the record input is not a JSON raw record.
    #[error("Invalid record on line {line}: {source}")]
    InvalidRecord {
        /// 1-based line number in the input
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The run names a source that has no registered policy.
    #[error("No policy registered for source '{source_id}' (known: {known})")]
    UnknownSource {
        /// The source identifier that was requested
        source_id: String,
        /// Comma-separated list of registered sources
        known: String,
    },

    /// The run configuration is unusable.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong
        message: String,
    },

    /// A record broke an assumption the pipeline relies on.
    ///
    /// Examples: the record URL does not end in a numeric message file, or
    /// the receipt timestamp is `NA` when an identifier or partition year
    /// must be derived from it.
    #[error("<{url}> {message}")]
    Structural {
        /// URL of the offending record
        url: String,
        /// Description of the violated assumption
        message: String,
    },
}

impl From<serde_json::Error> for ListpackError {
    fn from(err: serde_json::Error) -> Self {
        ListpackError::Json {
            source: err,
            path: None,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ListpackError {
    /// Creates a JSON decoding error attached to a file.
    pub fn json_in(source: serde_json::Error, path: impl Into<PathBuf>) -> Self {
        ListpackError::Json {
            source,
            path: Some(path.into()),
        }
    }

    /// Creates an error for an undecodable input line.
    pub fn invalid_record(line: usize, source: serde_json::Error) -> Self {
        ListpackError::InvalidRecord { line, source }
    }

    /// Creates an unknown-source error listing the registered sources.
    pub fn unknown_source<'a>(
        source_id: impl Into<String>,
        known: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        ListpackError::UnknownSource {
            source_id: source_id.into(),
            known: known.into_iter().collect::<Vec<_>>().join(", "),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ListpackError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates a structural violation error for the record at `url`.
    pub fn structural(url: impl Into<String>, message: impl Into<String>) -> Self {
        ListpackError::Structural {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is an I/O failure of any kind.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ListpackError::Io(_) | ListpackError::Csv(_) | ListpackError::Xml(_)
        )
    }

    /// Returns `true` if this is a configuration gap.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ListpackError::UnknownSource { .. } | ListpackError::InvalidConfig { .. }
        )
    }

    /// Returns `true` if the record input could not be decoded.
    pub fn is_input(&self) -> bool {
        matches!(self, ListpackError::InvalidRecord { .. })
    }

    /// Returns `true` if this is a structural violation.
    pub fn is_structural(&self) -> bool {
        matches!(self, ListpackError::Structural { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let err = ListpackError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("read-only"));
        assert!(err.is_io());
    }

    #[test]
    fn test_unknown_source_lists_known() {
        let err = ListpackError::unknown_source("TEI-L", ["hypermail", "marc"]);
        let display = err.to_string();
        assert!(display.contains("TEI-L"));
        assert!(display.contains("hypermail, marc"));
        assert!(err.is_config());
        assert!(!err.is_structural());
    }

    #[test]
    fn test_structural_display_carries_url() {
        let err = ListpackError::structural(
            "http://lkml.iu.edu/hypermail/linux/kernel/index.html",
            "cannot derive reply base URL",
        );
        let display = err.to_string();
        assert!(display.starts_with("<http://lkml.iu.edu/"));
        assert!(display.contains("reply base URL"));
        assert!(err.is_structural());
        assert!(!err.is_io());
    }

    #[test]
    fn test_json_error_with_path() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ListpackError::json_in(json_err, "/tmp/run.json");
        assert!(err.to_string().contains("in /tmp/run.json"));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ListpackError = json_err.into();
        assert!(err.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn test_invalid_record_names_line() {
        let json_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = ListpackError::invalid_record(7, json_err);
        assert!(err.to_string().starts_with("Invalid record on line 7"));
        assert!(err.is_input());
        assert!(!err.is_config());
    }

    #[test]
    fn test_csv_error_is_io() {
        let csv_err = csv::Error::from(io::Error::other("disk full"));
        let err: ListpackError = csv_err.into();
        assert!(err.is_io());
        assert!(err.to_string().contains("CSV error"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let err = ListpackError::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(err.source().is_some());
    }
}
