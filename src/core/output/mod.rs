//! Export sinks.
//!
//! - [`CsvSink`]: one comma-delimited file per run, `<base>ByEmail.csv`
//! - [`XmlPartition`]: one file per receipt year, `<base><year>Bodies.xml`
//! - [`ExportRouter`]: owns both and sends every record to the right place
//!
//! # Example
//!
//! ```rust,no_run
//! use listpack::config::RunConfig;
//! use listpack::core::output::ExportRouter;
//!
//! let config = RunConfig::new("hypermail", "hypermail")
//!     .with_scraping_lists(["lkml"])
//!     .with_output_dir("out");
//! let router = ExportRouter::open(&config)?;
//! let summary = router.close()?;
//! assert_eq!(summary.rows, 0);
//! # Ok::<(), listpack::ListpackError>(())
//! ```

mod csv_writer;
mod router;
mod xml_writer;

pub use csv_writer::CsvSink;
pub use router::{ExportRouter, ExportSummary, PartitionSummary};
pub use xml_writer::{ITEM_ELEMENT, ROOT_ELEMENT, XmlPartition};
