//! Core processing logic for listpack.
//!
//! This module contains:
//! - [`timestamps`] - Canonical timestamps from raw date headers
//! - [`identifier`] - Run-scoped message identifiers
//! - [`enrich`] - Sender address, reply link and mailing-list cleanup
//! - [`output`] - Export sinks (CSV, year-partitioned XML)
//! - [`processor`] - The per-run pipeline tying the stages together
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use listpack::config::RunConfig;
//! use listpack::core::run;
//! use listpack::record::RawRecord;
//!
//! let config = RunConfig::new("marc", "marc").with_scraping_lists(["git"]);
//! let stats = run(config, [RawRecord::new("http://marc.info/?l=git&m=1")
//!     .with_time_received("2005-04-07 22:13:13")])?;
//! println!("{} records", stats.records);
//! # Ok::<(), listpack::ListpackError>(())
//! ```

pub mod enrich;
pub mod identifier;
pub mod output;
pub mod processor;
pub mod timestamps;

pub use enrich::{enrich, normalize_sender_email, resolve_replyto, tag_mailing_list};
pub use identifier::IdAssigner;
pub use output::{ExportRouter, ExportSummary, PartitionSummary};
pub use processor::{Pipeline, RunStats, run};
pub use timestamps::{TimestampField, TimestampNormalizer, TimestampOutcome};
