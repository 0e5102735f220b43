//! Per-field cleanup applied after identifiers are assigned.
//!
//! Three independent transforms, run in this order:
//! - [`normalize_sender_email`]: undo MARC-style address obfuscation
//! - [`resolve_replyto`]: turn relative reply links into absolute URLs
//! - [`tag_mailing_list`]: label the record with the list its URL belongs to

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ListMapping;
use crate::error::{ListpackError, Result};
use crate::policy::SourcePolicy;
use crate::record::{NA, Record};

/// Directory part of a message URL ending in a numeric page: `.../9008/0005.html`.
static MESSAGE_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)/\d{4,6}\.html").expect("message page regex is valid"));

/// Resolves a raw reply reference against the record's own URL.
///
/// Empty references become [`NA`]. Under a relative-replies policy the
/// reference is appended to the directory of `record_url`; a URL that does
/// not end in a numeric message page is a structural error.
///
/// # Example
///
/// ```rust
/// use listpack::core::enrich::resolve_replyto;
/// use listpack::policy::SourcePolicy;
///
/// let url = "http://lkml.iu.edu/hypermail/linux/kernel/9008/0005.html";
/// let policy = SourcePolicy::hypermail();
///
/// assert_eq!(resolve_replyto("", url, &policy)?, "NA");
/// assert_eq!(
///     resolve_replyto("0012.html", url, &policy)?,
///     "http://lkml.iu.edu/hypermail/linux/kernel/9008/0012.html"
/// );
/// # Ok::<(), listpack::ListpackError>(())
/// ```
pub fn resolve_replyto(raw: &str, record_url: &str, policy: &SourcePolicy) -> Result<String> {
    if raw.is_empty() {
        return Ok(NA.to_string());
    }
    if !policy.relative_replies || is_absolute(raw) {
        return Ok(raw.to_string());
    }

    let base = MESSAGE_PAGE
        .captures(record_url)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| {
            ListpackError::structural(
                record_url,
                format!("cannot derive a base URL to resolve reply reference '{raw}'"),
            )
        })?;
    Ok(format!("{}/{}", base.as_str(), raw))
}

fn is_absolute(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Canonicalizes a sender address under the source's obfuscation quirk.
///
/// # Example
///
/// ```rust
/// use listpack::core::enrich::normalize_sender_email;
/// use listpack::policy::SourcePolicy;
///
/// let raw = "J.Doe () example ! com";
/// assert_eq!(normalize_sender_email(raw, &SourcePolicy::marc()), "j.doe@example.com");
/// assert_eq!(normalize_sender_email(raw, &SourcePolicy::hypermail()), raw);
/// ```
pub fn normalize_sender_email(raw: &str, policy: &SourcePolicy) -> String {
    if !policy.obfuscated_email {
        return raw.to_string();
    }
    raw.to_lowercase().replace(" () ", "@").replace(" ! ", ".")
}

/// Finds the mailing-list label for `record_url`.
///
/// Every mapping whose substring occurs in the URL matches; the last match
/// in mapping order wins.
pub fn tag_mailing_list(record_url: &str, mappings: &[ListMapping]) -> Option<String> {
    let mut label = None;
    for mapping in mappings {
        if record_url.contains(&mapping.substring) {
            label = Some(mapping.label.clone());
        }
    }
    label
}

/// Runs the three enrichers on `record` in pipeline order.
pub fn enrich(record: &mut Record, policy: &SourcePolicy, mappings: &[ListMapping]) -> Result<()> {
    record.sender_email = normalize_sender_email(&record.sender_email, policy);
    record.replyto = resolve_replyto(&record.replyto_raw, &record.url, policy)?;
    if let Some(label) = tag_mailing_list(&record.url, mappings) {
        record.mailing_list = Some(label);
    }
    Ok(())
}
