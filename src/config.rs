//! Run configuration.
//!
//! A [`RunConfig`] describes one processing run: which archive produced the
//! records, which mailing lists are being scraped, how URLs map to list
//! labels, and what gets exported where. It is plain data with builder
//! methods and a camelCase JSON form, so drivers can load it from a file.
//!
//! # Example
//!
//! ```rust
//! use listpack::config::{ListMapping, RunConfig};
//!
//! let config = RunConfig::new("hypermail", "hypermail")
//!     .with_scraping_lists(["lkml"])
//!     .with_mailing_list(ListMapping::new("lkml", "lkml.iu.edu/hypermail/linux/kernel"))
//!     .with_drop_fields(["body"]);
//!
//! assert_eq!(config.file_base(), "lkml");
//! assert!(config.is_single_list());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ListpackError, Result};

/// Default directory for export files.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// One entry of the ordered label to URL-substring mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMapping {
    /// Mailing-list label assigned to matching records.
    pub label: String,

    /// Substring searched for in the record URL.
    pub substring: String,
}

impl ListMapping {
    pub fn new(label: impl Into<String>, substring: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            substring: substring.into(),
        }
    }
}

/// Extra or replacement source policy declared in configuration.
///
/// See [`PolicyRegistry::with_overrides`](crate::policy::PolicyRegistry::with_overrides).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyOverride {
    pub source_id: String,

    /// Offset for naive timestamps, `[+-]HHMM`.
    pub default_offset: String,

    #[serde(default)]
    pub obfuscated_email: bool,

    #[serde(default)]
    pub relative_replies: bool,
}

impl PolicyOverride {
    pub fn new(source_id: impl Into<String>, default_offset: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            default_offset: default_offset.into(),
            obfuscated_email: false,
            relative_replies: false,
        }
    }
}

/// Configuration for one processing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    /// Run name; the export filename base when several lists are scraped.
    pub name: String,

    /// Archive integration that produced the records.
    pub source_id: String,

    /// Labels of the lists scraped in this run.
    #[serde(default)]
    pub scraping_lists: Vec<String>,

    /// Ordered label to URL-substring mapping. Later matches win.
    #[serde(default)]
    pub mailing_lists: Vec<ListMapping>,

    /// Projection fields excluded from both exports.
    #[serde(default)]
    pub drop_fields: Vec<String>,

    /// Write the per-year structured exports (default: true).
    #[serde(default = "default_true")]
    pub export_bodies: bool,

    /// Directory receiving the exports (default: `data`).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Policies for sources beyond the built-in ones.
    #[serde(default)]
    pub policies: Vec<PolicyOverride>,
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl RunConfig {
    /// Creates a configuration with default values.
    pub fn new(name: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_id: source_id.into(),
            scraping_lists: Vec::new(),
            mailing_lists: Vec::new(),
            drop_fields: Vec::new(),
            export_bodies: true,
            output_dir: default_output_dir(),
            policies: Vec::new(),
        }
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| ListpackError::json_in(e, path.to_path_buf()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the fields a run cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ListpackError::invalid_config("run name is empty"));
        }
        if self.source_id.trim().is_empty() {
            return Err(ListpackError::invalid_config("sourceId is empty"));
        }
        if let Some(mapping) = self.mailing_lists.iter().find(|m| m.substring.is_empty()) {
            return Err(ListpackError::invalid_config(format!(
                "mailing list '{}' has an empty URL substring",
                mapping.label
            )));
        }
        Ok(())
    }

    /// Sets the scraped list labels.
    #[must_use]
    pub fn with_scraping_lists<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scraping_lists = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one entry to the label mapping.
    #[must_use]
    pub fn with_mailing_list(mut self, mapping: ListMapping) -> Self {
        self.mailing_lists.push(mapping);
        self
    }

    /// Sets the fields excluded from the exports.
    #[must_use]
    pub fn with_drop_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables the structured per-year exports.
    #[must_use]
    pub fn with_export_bodies(mut self, enabled: bool) -> Self {
        self.export_bodies = enabled;
        self
    }

    /// Sets the export directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Registers an extra source policy.
    #[must_use]
    pub fn with_policy(mut self, policy: PolicyOverride) -> Self {
        self.policies.push(policy);
        self
    }

    /// Returns `true` when exactly one list is scraped.
    pub fn is_single_list(&self) -> bool {
        self.scraping_lists.len() == 1
    }

    /// Export filename base: the single list label, or the run name.
    pub fn file_base(&self) -> &str {
        match self.scraping_lists.as_slice() {
            [only] => only,
            _ => &self.name,
        }
    }
}
