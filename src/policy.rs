//! Per-source processing policies.
//!
//! Each archive integration has quirks: the timezone its server stamps
//! naive dates with, whether addresses are obfuscated MARC-style, and
//! whether reply links are relative to the message page. A [`SourcePolicy`]
//! bundles those quirks and is resolved once per run from the source
//! identifier, then passed to every stage.
//!
//! # Example
//!
//! ```rust
//! use listpack::policy::PolicyRegistry;
//!
//! let registry = PolicyRegistry::builtin();
//! let marc = registry.resolve("marc")?;
//! assert!(marc.obfuscated_email);
//! assert_eq!(marc.default_offset.local_minus_utc(), -4 * 3600);
//!
//! assert!(registry.resolve("TEI-L").is_err());
//! # Ok::<(), listpack::ListpackError>(())
//! ```

use chrono::{FixedOffset, Offset, Utc};

use crate::config::PolicyOverride;
use crate::error::{ListpackError, Result};
use crate::parsing::timestamp::parse_offset;

/// Processing quirks of one archive integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePolicy {
    /// Source identifier this policy applies to.
    pub source_id: String,

    /// Offset applied to timestamps that carry no timezone.
    pub default_offset: FixedOffset,

    /// Addresses are written `user () host ! tld`.
    pub obfuscated_email: bool,

    /// Reply references are relative to the message's directory.
    pub relative_replies: bool,
}

impl SourcePolicy {
    /// Creates a policy with no quirks beyond the default offset.
    pub fn new(source_id: impl Into<String>, default_offset: FixedOffset) -> Self {
        Self {
            source_id: source_id.into(),
            default_offset,
            obfuscated_email: false,
            relative_replies: false,
        }
    }

    /// Hypermail archives (lkml.iu.edu): EST server, relative reply links.
    pub fn hypermail() -> Self {
        Self {
            relative_replies: true,
            ..Self::new("hypermail", fixed_hours(-5))
        }
    }

    /// MARC archives (marc.info): EDT server, obfuscated addresses.
    pub fn marc() -> Self {
        Self {
            obfuscated_email: true,
            ..Self::new("marc", fixed_hours(-4))
        }
    }

    /// Marks addresses as MARC-obfuscated.
    #[must_use]
    pub fn with_obfuscated_email(mut self, enabled: bool) -> Self {
        self.obfuscated_email = enabled;
        self
    }

    /// Marks reply references as relative.
    #[must_use]
    pub fn with_relative_replies(mut self, enabled: bool) -> Self {
        self.relative_replies = enabled;
        self
    }

    fn from_override(entry: &PolicyOverride) -> Result<Self> {
        let offset = parse_offset(&entry.default_offset).ok_or_else(|| {
            ListpackError::invalid_config(format!(
                "policy for '{}' has invalid defaultOffset '{}' (expected e.g. -0500)",
                entry.source_id, entry.default_offset
            ))
        })?;
        Ok(Self::new(entry.source_id.clone(), offset)
            .with_obfuscated_email(entry.obfuscated_email)
            .with_relative_replies(entry.relative_replies))
    }
}

fn fixed_hours(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

/// Lookup table from source identifier to [`SourcePolicy`].
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: Vec<SourcePolicy>,
}

impl PolicyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing the `hypermail` and `marc` policies.
    pub fn builtin() -> Self {
        Self {
            policies: vec![SourcePolicy::hypermail(), SourcePolicy::marc()],
        }
    }

    /// Built-in policies extended (or overridden) by configuration entries.
    pub fn with_overrides(overrides: &[PolicyOverride]) -> Result<Self> {
        let mut registry = Self::builtin();
        for entry in overrides {
            registry.register(SourcePolicy::from_override(entry)?);
        }
        Ok(registry)
    }

    /// Adds a policy, replacing any existing one for the same source.
    pub fn register(&mut self, policy: SourcePolicy) {
        match self
            .policies
            .iter_mut()
            .find(|p| p.source_id == policy.source_id)
        {
            Some(existing) => *existing = policy,
            None => self.policies.push(policy),
        }
    }

    /// Resolves the policy for `source_id`.
    ///
    /// A missing entry is a configuration gap, reported when a run opens.
    pub fn resolve(&self, source_id: &str) -> Result<SourcePolicy> {
        self.policies
            .iter()
            .find(|p| p.source_id == source_id)
            .cloned()
            .ok_or_else(|| ListpackError::unknown_source(source_id, self.source_ids()))
    }

    /// Registered source identifiers, in registration order.
    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.policies.iter().map(|p| p.source_id.as_str())
    }
}
