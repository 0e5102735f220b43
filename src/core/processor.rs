//! The record pipeline: normalize, identify, enrich, export.
//!
//! A [`Pipeline`] is the context of a single run. It is opened from a
//! [`RunConfig`], fed records one at a time, and closed once. Each record
//! passes through the stages in a fixed order:
//!
//! 1. [`TimestampNormalizer`] fills `timestampReceived` / `timestampSent`
//! 2. [`IdAssigner`] derives `emailId` from `timestampReceived`
//! 3. [`enrich`] canonicalizes the sender address, resolves `replyto`, and
//!    tags the mailing list
//! 4. [`ExportRouter`] writes the record to its sinks
//!
//! # Example
//!
//! ```rust,no_run
//! use listpack::config::RunConfig;
//! use listpack::core::processor::Pipeline;
//! use listpack::record::RawRecord;
//!
//! let config = RunConfig::new("hypermail", "hypermail").with_scraping_lists(["lkml"]);
//! let mut pipeline = Pipeline::open(config)?;
//!
//! let record = pipeline.process(
//!     RawRecord::new("http://lkml.iu.edu/hypermail/linux/kernel/9008/0005.html")
//!         .with_time_received("Wed, 8 Aug 90 12:36:34 CDT"),
//! )?;
//! assert_eq!(record.email_id, Some(19900808123634));
//!
//! let stats = pipeline.close()?;
//! assert_eq!(stats.records, 1);
//! # Ok::<(), listpack::ListpackError>(())
//! ```

use tracing::{debug, info, warn};

use super::enrich::enrich;
use super::identifier::IdAssigner;
use super::output::{ExportRouter, ExportSummary};
use super::timestamps::TimestampNormalizer;
use crate::config::RunConfig;
use crate::error::Result;
use crate::policy::{PolicyRegistry, SourcePolicy};
use crate::record::{NA, RawRecord, Record};

/// Statistics about a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Records that made it through every stage.
    pub records: usize,
    /// Records dropped because their `timestampReceived` was `NA`.
    pub skipped: usize,
    /// Records whose `timestampSent` ended up `NA`.
    pub missing_sent: usize,
    /// Records whose identifier was corrected for a same-second collision.
    pub collisions: usize,
    /// Records carrying a mailing-list label.
    pub labelled: usize,
    pub exports: ExportSummary,
}

impl RunStats {
    /// Share of records with a usable `timestampSent`, in percent.
    pub fn sent_coverage(&self) -> f64 {
        if self.records == 0 {
            return 0.0;
        }
        (1.0 - (self.missing_sent as f64 / self.records as f64)) * 100.0
    }
}

/// The per-run processing context.
#[derive(Debug)]
pub struct Pipeline {
    config: RunConfig,
    policy: SourcePolicy,
    normalizer: TimestampNormalizer,
    ids: IdAssigner,
    router: ExportRouter,
    records: usize,
    skipped: usize,
    missing_sent: usize,
    labelled: usize,
}

impl Pipeline {
    /// Opens a run.
    ///
    /// Fails before anything is written when the run's source has no
    /// policy or the configuration is invalid, and fails if the exports
    /// cannot be created.
    pub fn open(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let policy = PolicyRegistry::with_overrides(&config.policies)?.resolve(&config.source_id)?;
        let normalizer = TimestampNormalizer::new(&policy);
        let router = ExportRouter::open(&config)?;
        info!(
            run = %config.name,
            source = %policy.source_id,
            offset = %policy.default_offset,
            output_dir = %config.output_dir.display(),
            "opened run"
        );

        Ok(Self {
            config,
            policy,
            normalizer,
            ids: IdAssigner::new(),
            router,
            records: 0,
            skipped: 0,
            missing_sent: 0,
            labelled: 0,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn policy(&self) -> &SourcePolicy {
        &self.policy
    }

    /// Runs one record through every stage and returns the finished record.
    ///
    /// A record whose receipt timestamp is `NA` is a structural error here.
    /// Any error is fatal to the run; the caller should stop feeding records
    /// and drop or close the pipeline.
    pub fn process(&mut self, raw: RawRecord) -> Result<Record> {
        let record = self.normalize(raw);
        self.complete(record)
    }

    /// Like [`process`](Self::process), but drops a record without a usable
    /// receipt timestamp instead of failing.
    ///
    /// Returns `Ok(None)` for a dropped record. The drop is logged with the
    /// record URL and counted in [`RunStats::skipped`].
    pub fn process_or_skip(&mut self, raw: RawRecord) -> Result<Option<Record>> {
        let record = self.normalize(raw);
        if record.timestamp_received == NA {
            warn!(url = %record.url, "dropping record, timestampReceived is NA");
            self.skipped += 1;
            return Ok(None);
        }
        self.complete(record).map(Some)
    }

    fn normalize(&self, raw: RawRecord) -> Record {
        let mut record = Record::from(raw);
        if record.source_id.is_empty() {
            record.source_id.clone_from(&self.config.source_id);
        }
        self.normalizer.apply(&mut record);
        record
    }

    fn complete(&mut self, mut record: Record) -> Result<Record> {
        let id = self.ids.assign(&record.timestamp_received, &record.url)?;
        record.email_id = Some(id);

        enrich(&mut record, &self.policy, &self.config.mailing_lists)?;
        self.router.write(&record)?;

        self.records += 1;
        if record.timestamp_sent == NA {
            self.missing_sent += 1;
        }
        if record.mailing_list.is_some() {
            self.labelled += 1;
        }
        debug!(url = %record.url, id, "processed record");
        Ok(record)
    }

    /// Finishes the exports and reports the run.
    pub fn close(self) -> Result<RunStats> {
        let exports = self.router.close()?;
        let stats = RunStats {
            records: self.records,
            skipped: self.skipped,
            missing_sent: self.missing_sent,
            collisions: self.ids.collisions(),
            labelled: self.labelled,
            exports,
        };
        info!(
            run = %self.config.name,
            records = stats.records,
            skipped = stats.skipped,
            collisions = stats.collisions,
            "finished run"
        );
        Ok(stats)
    }
}

/// Processes `records` in order and closes the run.
///
/// Records without a usable receipt timestamp are skipped. Any other error
/// stops the run; exports written so far are finished before the error is
/// returned.
pub fn run<I>(config: RunConfig, records: I) -> Result<RunStats>
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut pipeline = Pipeline::open(config)?;
    for raw in records {
        pipeline.process_or_skip(raw)?;
    }
    pipeline.close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListMapping;
    use tempfile::tempdir;

    fn hypermail(dir: &std::path::Path) -> RunConfig {
        RunConfig::new("hypermail", "hypermail")
            .with_scraping_lists(["lkml"])
            .with_mailing_list(ListMapping::new("lkml", "linux/kernel"))
            .with_output_dir(dir)
    }

    #[test]
    fn test_record_passes_all_stages() {
        let dir = tempdir().unwrap();
        let mut pipeline = Pipeline::open(hypermail(dir.path())).unwrap();

        let record = pipeline
            .process(
                RawRecord::new("http://lkml.iu.edu/hypermail/linux/kernel/9008/0005.html")
                    .with_sender_name("Linus Torvalds")
                    .with_time_received("Wed, 8 Aug 90 12:36:34 CDT")
                    .with_time_sent("garbage")
                    .with_replyto("0003.html"),
            )
            .unwrap();

        assert_eq!(record.source_id, "hypermail");
        assert_eq!(record.timestamp_received, "1990-08-08 12:36:34-0500");
        assert_eq!(record.timestamp_sent, NA);
        assert_eq!(record.email_id, Some(19900808123634));
        assert_eq!(
            record.replyto,
            "http://lkml.iu.edu/hypermail/linux/kernel/9008/0003.html"
        );
        assert_eq!(record.mailing_list.as_deref(), Some("lkml"));

        let stats = pipeline.close().unwrap();
        assert_eq!(stats.records, 1);
        assert_eq!(stats.missing_sent, 1);
        assert_eq!(stats.labelled, 1);
        assert_eq!(stats.collisions, 0);
        assert_eq!(stats.sent_coverage(), 0.0);
    }

    #[test]
    fn test_unknown_source_fails_before_writing() {
        let dir = tempdir().unwrap();
        let config = RunConfig::new("pipermail", "pipermail").with_output_dir(dir.path().join("out"));
        let err = Pipeline::open(config).unwrap_err();
        assert!(err.is_config());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_missing_received_is_structural_in_process() {
        let dir = tempdir().unwrap();
        let mut pipeline = Pipeline::open(hypermail(dir.path())).unwrap();
        let err = pipeline
            .process(RawRecord::new("http://lkml.iu.edu/hypermail/linux/kernel/9008/0005.html"))
            .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_run_skips_missing_received() {
        let dir = tempdir().unwrap();
        let stats = run(
            hypermail(dir.path()),
            [
                RawRecord::new("http://lkml.iu.edu/hypermail/linux/kernel/9008/0001.html")
                    .with_time_received("Wed, 8 Aug 90 12:36:34 CDT"),
                RawRecord::new("http://lkml.iu.edu/hypermail/linux/kernel/9008/0002.html"),
                RawRecord::new("http://lkml.iu.edu/hypermail/linux/kernel/9008/0003.html")
                    .with_time_received("no date at all"),
                RawRecord::new("http://lkml.iu.edu/hypermail/linux/kernel/9008/0004.html")
                    .with_time_received("Wed, 8 Aug 90 12:40:00 CDT"),
            ],
        )
        .unwrap();
        assert_eq!(stats.records, 2);
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.exports.rows, 2);
    }

    #[test]
    fn test_open_validates_builder_config() {
        let dir = tempdir().unwrap();
        let config = hypermail(dir.path()).with_mailing_list(ListMapping::new("x", ""));
        let err = Pipeline::open(config).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_run_counts_collisions() {
        let dir = tempdir().unwrap();
        let raw = |n: u32| {
            RawRecord::new(format!(
                "http://lkml.iu.edu/hypermail/linux/kernel/9008/{n:04}.html"
            ))
            .with_time_received("Wed, 8 Aug 90 12:36:34 CDT")
        };
        let stats = run(hypermail(dir.path()), [raw(1), raw(2), raw(3)]).unwrap();
        assert_eq!(stats.records, 3);
        assert_eq!(stats.collisions, 2);
        assert_eq!(stats.exports.partitions.len(), 1);
        assert_eq!(stats.exports.partitions[0].records, 3);
    }
}
