//! Export formats and field projection.
//!
//! Both sinks write the same subset of record fields, the *projection*:
//! `mailingList, senderName, timestampReceived, subject, body`, minus the
//! run's drop fields, minus `mailingList` when a single list is scraped.
//!
//! # Example
//!
//! ```rust
//! use listpack::config::RunConfig;
//! use listpack::format::{ExportField, Projection};
//!
//! let config = RunConfig::new("marc", "marc")
//!     .with_scraping_lists(["git", "linux-kernel"])
//!     .with_drop_fields(["body"]);
//! let projection = Projection::from_config(&config);
//!
//! assert_eq!(
//!     projection.names(),
//!     ["mailingList", "senderName", "timestampReceived", "subject"]
//! );
//! assert!(!projection.contains(ExportField::Body));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::RunConfig;
use crate::record::Record;

/// File formats written by the export router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One flat file per run, one row per record.
    Csv,
    /// One file per partition year, one element per record.
    Xml,
}

impl ExportFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
        }
    }
}

/// A record field that can appear in an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportField {
    MailingList,
    SenderName,
    TimestampReceived,
    Subject,
    Body,
}

impl ExportField {
    /// All exportable fields, in export order.
    pub const ALL: [ExportField; 5] = [
        ExportField::MailingList,
        ExportField::SenderName,
        ExportField::TimestampReceived,
        ExportField::Subject,
        ExportField::Body,
    ];

    /// Column / element name of the field.
    pub fn name(self) -> &'static str {
        match self {
            ExportField::MailingList => "mailingList",
            ExportField::SenderName => "senderName",
            ExportField::TimestampReceived => "timestampReceived",
            ExportField::Subject => "subject",
            ExportField::Body => "body",
        }
    }

    /// Value of the field on `record`; `None` when the field is unset.
    pub fn value(self, record: &Record) -> Option<&str> {
        match self {
            ExportField::MailingList => record.mailing_list.as_deref(),
            ExportField::SenderName => Some(&record.sender_name),
            ExportField::TimestampReceived => Some(&record.timestamp_received),
            ExportField::Subject => Some(&record.subject),
            ExportField::Body => Some(&record.body),
        }
    }
}

impl fmt::Display for ExportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown export field: '{}'. Expected one of: {}",
                    s,
                    ExportField::ALL.map(ExportField::name).join(", ")
                )
            })
    }
}

/// The ordered list of fields a run exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<ExportField>,
}

impl Projection {
    /// Projection of every exportable field.
    pub fn all() -> Self {
        Self {
            fields: ExportField::ALL.to_vec(),
        }
    }

    /// Computes the projection for a run.
    ///
    /// Unknown drop-field names are reported and otherwise ignored.
    pub fn from_config(config: &RunConfig) -> Self {
        let mut dropped = Vec::new();
        for name in &config.drop_fields {
            match name.parse::<ExportField>() {
                Ok(field) => dropped.push(field),
                Err(_) => warn!(field = %name, "drop field is not exported, ignoring it"),
            }
        }
        if config.is_single_list() {
            dropped.push(ExportField::MailingList);
        }
        Self {
            fields: ExportField::ALL
                .into_iter()
                .filter(|field| !dropped.contains(field))
                .collect(),
        }
    }

    pub fn fields(&self) -> &[ExportField] {
        &self.fields
    }

    /// Field names, usable as a CSV header.
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    pub fn contains(&self, field: ExportField) -> bool {
        self.fields.contains(&field)
    }

    /// Projected values of `record`, absent values as empty strings.
    pub fn row<'r>(&self, record: &'r Record) -> Vec<&'r str> {
        self.fields
            .iter()
            .map(|f| f.value(record).unwrap_or_default())
            .collect()
    }
}
