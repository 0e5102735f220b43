//! Routes every record to the run's sinks.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use tracing::{debug, info, warn};

use super::csv_writer::CsvSink;
use super::xml_writer::XmlPartition;
use crate::config::RunConfig;
use crate::error::{ListpackError, Result};
use crate::format::{ExportFormat, Projection};
use crate::parsing::timestamp::parse_canonical;
use crate::record::Record;

/// One closed structured partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSummary {
    pub year: i32,
    pub path: PathBuf,
    pub records: usize,
}

/// What a run wrote, returned by [`ExportRouter::close`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub tabular_path: PathBuf,
    pub rows: usize,
    /// Partitions in ascending year order.
    pub partitions: Vec<PartitionSummary>,
}

/// Fans records out to the tabular export and the per-year structured exports.
///
/// Structured partitions are opened lazily, the first time a record of a
/// given receipt year arrives, and stay open until [`close`](Self::close).
/// Every sink is finished exactly once: either by `close`, or on drop when a
/// run is abandoned after an error.
#[derive(Debug)]
pub struct ExportRouter {
    output_dir: PathBuf,
    file_base: String,
    projection: Projection,
    export_bodies: bool,
    tabular: Option<CsvSink>,
    partitions: BTreeMap<i32, XmlPartition>,
    closed: bool,
}

impl ExportRouter {
    /// Opens the router for a run: creates the output directory and the
    /// tabular export (truncating any previous one).
    pub fn open(config: &RunConfig) -> Result<Self> {
        fs::create_dir_all(&config.output_dir)?;
        let projection = Projection::from_config(config);
        let file_base = config.file_base().to_string();

        let tabular_path = tabular_path(&config.output_dir, &file_base);
        let tabular = CsvSink::create(&tabular_path, &projection)?;
        debug!(path = %tabular_path.display(), fields = ?projection.names(), "opened tabular export");

        Ok(Self {
            output_dir: config.output_dir.clone(),
            file_base,
            projection,
            export_bodies: config.export_bodies,
            tabular: Some(tabular),
            partitions: BTreeMap::new(),
            closed: false,
        })
    }

    /// Writes one record to its year partition and to the tabular export.
    ///
    /// Fails with a structural error when the record has no canonical
    /// `timestampReceived` and structured export is enabled.
    pub fn write(&mut self, record: &Record) -> Result<()> {
        if self.export_bodies {
            let year = partition_year(record)?;
            let partition =
                open_partition(&mut self.partitions, &self.output_dir, &self.file_base, year)?;
            partition.write(record, &self.projection)?;
        }
        if let Some(tabular) = self.tabular.as_mut() {
            tabular.write(record, &self.projection)?;
        }
        Ok(())
    }

    /// Finishes every sink and reports what was written.
    pub fn close(mut self) -> Result<ExportSummary> {
        let summary = self.finish_all();
        if let Ok(summary) = &summary {
            info!(
                rows = summary.rows,
                partitions = summary.partitions.len(),
                path = %summary.tabular_path.display(),
                "closed exports"
            );
        }
        summary
    }

    /// Number of structured partitions currently open.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Location of the run's tabular export.
    pub fn tabular_path(&self) -> PathBuf {
        tabular_path(&self.output_dir, &self.file_base)
    }

    /// Location of the structured export for `year`.
    pub fn partition_path(&self, year: i32) -> PathBuf {
        partition_path(&self.output_dir, &self.file_base, year)
    }

    /// Finishes all sinks, attempting each one even after a failure.
    /// The first failure is returned.
    fn finish_all(&mut self) -> Result<ExportSummary> {
        self.closed = true;
        let mut first_error = None;

        let mut partitions = Vec::with_capacity(self.partitions.len());
        for (year, mut partition) in std::mem::take(&mut self.partitions) {
            if let Err(e) = partition.finish() {
                first_error.get_or_insert(e);
            }
            partitions.push(PartitionSummary {
                year,
                path: partition.path().to_path_buf(),
                records: partition.records(),
            });
        }

        let tabular_path = self.tabular_path();
        let mut rows = 0;
        if let Some(mut tabular) = self.tabular.take() {
            rows = tabular.rows();
            if let Err(e) = tabular.finish() {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(ExportSummary {
                tabular_path,
                rows,
                partitions,
            }),
        }
    }
}

impl Drop for ExportRouter {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.finish_all() {
            warn!(error = %e, "failed to finish exports of an abandoned run");
        }
    }
}

/// Returns the partition for `year`, creating its file on first use.
fn open_partition<'a>(
    partitions: &'a mut BTreeMap<i32, XmlPartition>,
    dir: &Path,
    base: &str,
    year: i32,
) -> Result<&'a mut XmlPartition> {
    match partitions.entry(year) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            let path = partition_path(dir, base, year);
            let partition = XmlPartition::create(&path, year)?;
            debug!(year, path = %path.display(), "opened structured partition");
            Ok(entry.insert(partition))
        }
    }
}

fn partition_year(record: &Record) -> Result<i32> {
    parse_canonical(&record.timestamp_received)
        .map(|ts| ts.year())
        .ok_or_else(|| {
            ListpackError::structural(
                &record.url,
                format!(
                    "cannot partition record, timestampReceived is '{}'",
                    record.timestamp_received
                ),
            )
        })
}

fn tabular_path(dir: &Path, base: &str) -> PathBuf {
    dir.join(format!("{base}ByEmail.{}", ExportFormat::Csv.extension()))
}

fn partition_path(dir: &Path, base: &str, year: i32) -> PathBuf {
    dir.join(format!("{base}{year}Bodies.{}", ExportFormat::Xml.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawRecord;
    use tempfile::tempdir;

    fn record(url: &str, received: &str) -> Record {
        let mut record = Record::from(RawRecord::new(url).with_sender_name("Alice"));
        record.timestamp_received = received.into();
        record
    }

    #[test]
    fn test_partitions_by_year() {
        let dir = tempdir().unwrap();
        let config = RunConfig::new("hypermail", "hypermail")
            .with_scraping_lists(["lkml"])
            .with_output_dir(dir.path());

        let mut router = ExportRouter::open(&config).unwrap();
        router.write(&record("a", "1990-08-08 12:36:34-0500")).unwrap();
        router.write(&record("b", "1990-12-31 23:59:59-0500")).unwrap();
        router.write(&record("c", "1991-01-01 00:00:01-0500")).unwrap();
        assert_eq!(router.partition_count(), 2);

        let summary = router.close().unwrap();
        assert_eq!(summary.rows, 3);
        assert_eq!(
            summary
                .partitions
                .iter()
                .map(|p| (p.year, p.records))
                .collect::<Vec<_>>(),
            [(1990, 2), (1991, 1)]
        );
        assert!(dir.path().join("lkml1990Bodies.xml").exists());
        assert!(dir.path().join("lkml1991Bodies.xml").exists());
        assert_eq!(summary.tabular_path, dir.path().join("lkmlByEmail.csv"));
    }

    #[test]
    fn test_na_received_is_structural() {
        let dir = tempdir().unwrap();
        let config = RunConfig::new("marc", "marc").with_output_dir(dir.path());

        let mut router = ExportRouter::open(&config).unwrap();
        let err = router.write(&record("http://marc.info/?m=9", "NA")).unwrap_err();
        assert!(err.is_structural());
        assert_eq!(router.partition_count(), 0);
    }

    #[test]
    fn test_without_bodies_only_tabular() {
        let dir = tempdir().unwrap();
        let config = RunConfig::new("marc", "marc")
            .with_export_bodies(false)
            .with_output_dir(dir.path());

        let mut router = ExportRouter::open(&config).unwrap();
        router.write(&record("a", "2004-02-29 10:00:00-0400")).unwrap();
        let summary = router.close().unwrap();

        assert_eq!(summary.rows, 1);
        assert!(summary.partitions.is_empty());
        assert!(!dir.path().join("marc2004Bodies.xml").exists());
    }

    #[test]
    fn test_drop_finishes_open_partitions() {
        let dir = tempdir().unwrap();
        let config = RunConfig::new("marc", "marc").with_output_dir(dir.path());
        {
            let mut router = ExportRouter::open(&config).unwrap();
            router.write(&record("a", "2004-02-29 10:00:00-0400")).unwrap();
        }
        let xml = std::fs::read_to_string(dir.path().join("marc2004Bodies.xml")).unwrap();
        assert!(xml.trim_end().ends_with("</emails>"));
    }
}
