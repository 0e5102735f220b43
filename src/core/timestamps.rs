//! Timestamp normalization stage.
//!
//! Turns the raw date fields of a [`Record`] into canonical timestamps
//! (`1990-08-08 12:36:34-0500`) or the [`NA`] sentinel. Failures never stop
//! the run: an unparsable field becomes `NA` and a warning naming the
//! record URL and field is logged.
//!
//! # Example
//!
//! ```rust
//! use listpack::core::timestamps::{TimestampNormalizer, TimestampOutcome};
//! use listpack::policy::SourcePolicy;
//!
//! let normalizer = TimestampNormalizer::new(&SourcePolicy::hypermail());
//!
//! assert_eq!(
//!     normalizer.normalize("Mon Jan  8 16:08:22 1990"),
//!     TimestampOutcome::Canonical("1990-01-08 16:08:22-0500".into())
//! );
//! assert_eq!(normalizer.normalize(""), TimestampOutcome::Missing);
//! ```

use chrono::{Datelike, FixedOffset};
use tracing::warn;

use crate::parsing::timestamp::{extract_time_prefix, parse_flexible, to_canonical};
use crate::policy::SourcePolicy;
use crate::record::{NA, Record};

/// A timestamp field pair: the raw input and its normalized counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampField {
    /// When the archive received the message.
    Received,
    /// When the sender sent the message.
    Sent,
}

impl TimestampField {
    /// Fields normalized by a default run.
    pub const ALL: [TimestampField; 2] = [TimestampField::Received, TimestampField::Sent];

    /// Name of the raw input field.
    pub fn raw_name(self) -> &'static str {
        match self {
            TimestampField::Received => "timeReceived",
            TimestampField::Sent => "timeSent",
        }
    }

    /// Name of the normalized field.
    pub fn name(self) -> &'static str {
        match self {
            TimestampField::Received => "timestampReceived",
            TimestampField::Sent => "timestampSent",
        }
    }

    fn raw(self, record: &Record) -> &str {
        match self {
            TimestampField::Received => &record.time_received,
            TimestampField::Sent => &record.time_sent,
        }
    }

    fn set(self, record: &mut Record, value: String) {
        match self {
            TimestampField::Received => record.timestamp_received = value,
            TimestampField::Sent => record.timestamp_sent = value,
        }
    }
}

/// What became of one raw timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampOutcome {
    /// Parsed and formatted.
    Canonical(String),
    /// The raw field was empty.
    Missing,
    /// The raw field could not be parsed, even after trimming.
    Unparsable,
}

impl TimestampOutcome {
    /// The value stored on the record: the canonical text or [`NA`].
    pub fn into_value(self) -> String {
        match self {
            TimestampOutcome::Canonical(text) => text,
            TimestampOutcome::Missing | TimestampOutcome::Unparsable => NA.to_string(),
        }
    }
}

/// Normalizes raw dates using one source's default timezone.
#[derive(Debug, Clone)]
pub struct TimestampNormalizer {
    default_offset: FixedOffset,
    fields: Vec<TimestampField>,
}

impl TimestampNormalizer {
    /// Creates a normalizer for both timestamp fields.
    pub fn new(policy: &SourcePolicy) -> Self {
        Self {
            default_offset: policy.default_offset,
            fields: TimestampField::ALL.to_vec(),
        }
    }

    /// Restricts the fields this normalizer touches.
    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = TimestampField>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    /// Normalizes one raw date.
    ///
    /// Years outside `0..=9999` are unparsable: they have no four-digit
    /// canonical form.
    pub fn normalize(&self, raw: &str) -> TimestampOutcome {
        if raw.trim().is_empty() {
            return TimestampOutcome::Missing;
        }

        let parsed = parse_flexible(raw)
            .or_else(|| extract_time_prefix(raw).and_then(parse_flexible))
            .and_then(|p| p.with_default_offset(self.default_offset))
            .filter(|dt| (0..=9999).contains(&dt.year()));

        match parsed {
            Some(dt) => TimestampOutcome::Canonical(to_canonical(&dt)),
            None => TimestampOutcome::Unparsable,
        }
    }

    /// Normalizes `raw` for `field` of the record at `url`, logging failures.
    pub fn normalize_field(&self, raw: &str, field: TimestampField, url: &str) -> String {
        let outcome = self.normalize(raw);
        if outcome == TimestampOutcome::Unparsable {
            warn!(
                url,
                field = field.raw_name(),
                raw,
                "<{}> could not parse {}, {} will be NA",
                url,
                field.raw_name(),
                field.name()
            );
        }
        outcome.into_value()
    }

    /// Fills every configured normalized field of `record`.
    pub fn apply(&self, record: &mut Record) {
        for &field in &self.fields {
            let value = self.normalize_field(field.raw(record), field, &record.url);
            field.set(record, value);
        }
    }
}
