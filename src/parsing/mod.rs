//! Shared parsing utilities.
//!
//! This module contains the text-level parsers used by the pipeline stages,
//! kept free of record and policy types so they can be tested and benched
//! on plain strings.

pub mod timestamp;

pub use timestamp::{
    CANONICAL_FORMAT, ParsedTimestamp, extract_time_prefix, parse_canonical, parse_flexible,
    parse_offset, to_canonical,
};
