//! Run-scoped message identifiers.
//!
//! An identifier is the receipt time read as a 14-digit number
//! (`YYYYMMDDhhmmss`, offset ignored). Few messages share a receipt second;
//! when one does, its identifier gets a single trailing zero. The correction
//! is applied once and only once, so a third message on the same second
//! receives the same identifier as the second one.

use std::collections::HashSet;

use crate::error::{ListpackError, Result};
use crate::parsing::timestamp::parse_canonical;

const ID_FORMAT: &str = "%Y%m%d%H%M%S";

/// Assigns identifiers for one run.
#[derive(Debug, Default)]
pub struct IdAssigner {
    assigned: HashSet<u64>,
    collisions: usize,
}

impl IdAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the identifier for a canonical receipt timestamp.
    ///
    /// `url` only labels the error raised when the timestamp is `NA` or
    /// otherwise not canonical.
    ///
    /// # Example
    ///
    /// ```rust
    /// use listpack::core::identifier::IdAssigner;
    ///
    /// let mut ids = IdAssigner::new();
    /// let ts = "1990-08-08 12:36:34-0500";
    /// assert_eq!(ids.assign(ts, "a")?, 19900808123634);
    /// assert_eq!(ids.assign(ts, "b")?, 199008081236340);
    /// # Ok::<(), listpack::ListpackError>(())
    /// ```
    pub fn assign(&mut self, canonical_received: &str, url: &str) -> Result<u64> {
        let base = base_id(canonical_received).ok_or_else(|| {
            ListpackError::structural(
                url,
                format!("cannot derive an identifier from timestampReceived '{canonical_received}'"),
            )
        })?;

        let id = if self.assigned.contains(&base) {
            self.collisions += 1;
            base * 10
        } else {
            base
        };
        self.assigned.insert(id);
        Ok(id)
    }

    /// Number of distinct identifiers handed out.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Number of assignments that hit an already used base identifier.
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

fn base_id(canonical: &str) -> Option<u64> {
    parse_canonical(canonical)?
        .format(ID_FORMAT)
        .to_string()
        .parse()
        .ok()
}
