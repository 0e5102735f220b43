//! Mailing-list message records.
//!
//! A message enters the pipeline as a [`RawRecord`], the field dictionary
//! produced by HTML extraction, and is converted once into a [`Record`]
//! which every stage then mutates in place.
//!
//! # Examples
//!
//! ```
//! use listpack::record::{NA, RawRecord, Record};
//!
//! let raw: RawRecord = serde_json::from_str(r#"{
//!     "url": "http://lkml.iu.edu/hypermail/linux/kernel/9008/0005.html",
//!     "senderName": "Linus Torvalds",
//!     "timeReceived": "Wed, 8 Aug 90 12:36:34 CDT"
//! }"#)?;
//!
//! let record = Record::from(raw);
//! assert_eq!(record.sender_name, "Linus Torvalds");
//! assert!(record.subject.is_empty());
//! assert_eq!(record.timestamp_received, NA);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};

/// Sentinel for a value that is intentionally absent or could not be parsed.
///
/// Distinct from the empty string, which means the source had an empty field.
pub const NA: &str = "NA";

/// Raw fields of one scraped message, as supplied by the extractor.
///
/// Every field defaults to the empty string when missing from the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawRecord {
    /// Absolute URL of the message page.
    pub url: String,

    /// Archive integration that produced the record.
    ///
    /// Empty means "same as the run".
    pub source_id: String,

    pub sender_name: String,

    /// Sender address, possibly obfuscated (`john () example ! com`).
    pub sender_email: String,

    #[serde(alias = "timestampReceived")]
    pub time_received: String,

    #[serde(alias = "timestampSent")]
    pub time_sent: String,

    /// Empty, or a relative/absolute link to the parent message.
    pub replyto: String,

    pub subject: String,

    pub body: String,
}

impl RawRecord {
    /// Creates a raw record with only its URL set.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the source identifier.
    #[must_use]
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    /// Sets the sender name.
    #[must_use]
    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = name.into();
        self
    }

    /// Sets the raw sender address.
    #[must_use]
    pub fn with_sender_email(mut self, email: impl Into<String>) -> Self {
        self.sender_email = email.into();
        self
    }

    /// Sets the raw receipt date.
    #[must_use]
    pub fn with_time_received(mut self, raw: impl Into<String>) -> Self {
        self.time_received = raw.into();
        self
    }

    /// Sets the raw sending date.
    #[must_use]
    pub fn with_time_sent(mut self, raw: impl Into<String>) -> Self {
        self.time_sent = raw.into();
        self
    }

    /// Sets the raw reply reference.
    #[must_use]
    pub fn with_replyto(mut self, raw: impl Into<String>) -> Self {
        self.replyto = raw.into();
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// A message flowing through the pipeline.
///
/// Raw fields are kept as extracted; the post-hoc fields start out empty
/// (`NA` for timestamps and the reply reference, `None` for the list label
/// and identifier) and are filled by the stages in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub url: String,
    pub source_id: String,
    pub sender_name: String,
    pub subject: String,
    pub body: String,

    /// Sender address; canonicalized in place by the email stage.
    pub sender_email: String,

    pub time_received: String,
    pub time_sent: String,

    /// Reply reference as extracted.
    pub replyto_raw: String,

    /// Resolved reply reference: an absolute URL or [`NA`].
    pub replyto: String,

    /// Label of the mailing list the URL belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailing_list: Option<String>,

    /// Run-unique identifier derived from the receipt timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<u64>,

    /// Canonical receipt timestamp or [`NA`].
    pub timestamp_received: String,

    /// Canonical sending timestamp or [`NA`].
    pub timestamp_sent: String,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        Self {
            url: raw.url,
            source_id: raw.source_id,
            sender_name: raw.sender_name,
            subject: raw.subject,
            body: raw.body,
            sender_email: raw.sender_email,
            time_received: raw.time_received,
            time_sent: raw.time_sent,
            replyto_raw: raw.replyto,
            replyto: NA.to_string(),
            mailing_list: None,
            email_id: None,
            timestamp_received: NA.to_string(),
            timestamp_sent: NA.to_string(),
        }
    }
}

impl Record {
    /// Returns `true` once an identifier has been assigned.
    pub fn has_id(&self) -> bool {
        self.email_id.is_some()
    }
}
