//! # Listpack
//!
//! A Rust library for post-processing scraped mailing-list archives into
//! analysis-ready exports.
//!
//! ## Overview
//!
//! Scrapers of list archives (hypermail, MARC and friends) hand over one raw
//! record per message: free-text date headers, obfuscated addresses and
//! relative reply links. Listpack runs every record through a fixed
//! pipeline:
//!
//! 1. **Timestamp normalization**: raw dates become canonical
//!    `YYYY-MM-DD hh:mm:ss±hhmm` strings, or `NA`
//! 2. **Identifier assignment**: a run-unique integer id derived from the
//!    receipt time
//! 3. **Field enrichment**: address cleanup, absolute reply links,
//!    mailing-list labels
//! 4. **Export**: one XML file per receipt year plus one CSV for the run
//!
//! Source-specific behavior (default timezone, address obfuscation, reply
//! link style) is captured by a [`SourcePolicy`](policy::SourcePolicy)
//! resolved once per run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use listpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = RunConfig::from_json_file("hypermail.json")?;
//!     let mut pipeline = Pipeline::open(config)?;
//!
//!     for raw in RecordReader::open("lkml.jsonl")? {
//!         if let Some(record) = pipeline.process_or_skip(raw?)? {
//!             println!("{} {}", record.timestamp_received, record.subject);
//!         }
//!     }
//!
//!     let stats = pipeline.close()?;
//!     println!("{} records, {} partitions", stats.records, stats.exports.partitions.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`record`] — [`RawRecord`] (scraper output) and [`Record`] (pipeline record)
//! - [`input`] — [`RecordReader`](input::RecordReader) for JSON Lines input
//! - [`config`] — [`RunConfig`](config::RunConfig) and its parts
//! - [`policy`] — per-source behavior and the registry resolving it
//! - [`parsing`] — flexible date/time parsing
//! - [`format`] — export fields and projection
//! - [`core`] — the pipeline stages and export sinks
//!   - [`core::timestamps`], [`core::identifier`], [`core::enrich`]
//!   - [`core::output`] — [`ExportRouter`](core::output::ExportRouter)
//!   - [`core::processor`] — [`Pipeline`](core::processor::Pipeline)
//! - [`error`] — Unified error types ([`ListpackError`], [`Result`])
//! - [`prelude`] — Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod input;
#[cfg(feature = "cli")]
pub mod logging;
pub mod parsing;
pub mod policy;
pub mod record;

// Re-export the main types at the crate root for convenience
pub use error::{ListpackError, Result};
pub use record::{NA, RawRecord, Record};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use listpack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::record::{NA, RawRecord, Record};

    pub use crate::error::{ListpackError, Result};

    pub use crate::config::{ListMapping, PolicyOverride, RunConfig};
    pub use crate::policy::{PolicyRegistry, SourcePolicy};

    pub use crate::input::RecordReader;

    pub use crate::core::{ExportRouter, ExportSummary, IdAssigner, TimestampNormalizer};
    pub use crate::core::{Pipeline, RunStats, run};

    pub use crate::format::{ExportField, ExportFormat, Projection};
}
