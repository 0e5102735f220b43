//! Flexible parsing of free-text mail dates.
//!
//! Archive pages carry dates in whatever shape the originating mail system
//! produced over three decades: RFC 822 with two-digit years and named
//! zones, asctime, ISO 8601, US slash dates, and assorted trailing noise.
//! [`parse_flexible`] tokenizes the text the way `dateutil` does (weekdays
//! and comments are dropped, zones are lifted out) and tries the remainder
//! against an ordered list of chrono formats.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;

/// Canonical textual timestamp: `1990-08-08 12:36:34-0500`.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

/// Result of a successful flexible parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    /// The text named a zone or offset.
    Aware(DateTime<FixedOffset>),
    /// No zone information was present.
    Naive(NaiveDateTime),
}

impl ParsedTimestamp {
    /// Resolves to an instant, interpreting naive values in `offset`.
    pub fn with_default_offset(self, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
        match self {
            ParsedTimestamp::Aware(dt) => Some(dt),
            ParsedTimestamp::Naive(naive) => offset.from_local_datetime(&naive).single(),
        }
    }

    /// Returns `true` if the text carried timezone information.
    pub fn is_aware(&self) -> bool {
        matches!(self, ParsedTimestamp::Aware(_))
    }
}

/// Zone names resolved to an offset. Other zone words (`EST`, `CDT`, `MEZ`)
/// are dropped and leave the value naive, so the source default applies.
const ZONES: &[(&str, i32)] = &[("UT", 0), ("UTC", 0), ("GMT", 0), ("Z", 0)];

const WEEKDAYS: &[&str] = &[
    "mon", "tue", "tues", "wed", "thu", "thur", "thurs", "fri", "sat", "sun", "monday",
    "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
];

/// Date-time layouts, tried in order. Two-digit-year layouts come before
/// their four-digit twins because `%Y` happily reads `90` as year 90.
const DATETIME_FORMATS: &[&str] = &[
    // RFC 822 / 2822 bodies
    "%d %B %y %H:%M:%S",
    "%d %B %Y %H:%M:%S",
    "%d %B %y %H:%M",
    "%d %B %Y %H:%M",
    "%d %B %Y %I:%M:%S %p",
    // asctime and friends
    "%B %d %H:%M:%S %Y",
    "%B %d %y %H:%M:%S",
    "%B %d %Y %H:%M:%S",
    "%B %d %Y %H:%M",
    "%B %d %Y %I:%M:%S %p",
    "%B %d %Y %I:%M %p",
    // ISO 8601
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    // US slash dates
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    // Dashed and dotted day-first
    "%d-%B-%y %H:%M:%S",
    "%d-%B-%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Date-only layouts; the time defaults to midnight.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%d %B %y", "%d %B %Y", "%B %d %Y", "%m/%d/%y", "%m/%d/%Y",
    "%d-%B-%Y", "%d.%m.%Y",
];

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("comment regex is valid"));

/// A time glued to its zone: `12:36:34+0200`, `12:36:34GMT`.
static GLUED_ZONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?)([+-]\d{2}:?\d{2}|[A-Za-z]{1,5}\b)")
        .expect("glued zone regex is valid")
});

static NUMERIC_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:GMT|UTC|UT)?([+-])(\d{1,2})(?::?(\d{2}))?$").expect("offset regex is valid")
});

/// Trailing `HH:MM:SS [+-HHMM]` used to cut noise off unparsable dates.
static TIME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(.* \d{2}:\d{2}:\d{2}(\s?[+-]\d{4})?)").expect("time prefix regex is valid")
});

/// Parses a UTC offset or zone name (`-0500`, `+02:00`, `GMT+2`, `UTC`).
///
/// # Example
///
/// ```rust
/// use listpack::parsing::timestamp::parse_offset;
///
/// assert_eq!(parse_offset("-0500").unwrap().local_minus_utc(), -18000);
/// assert_eq!(parse_offset("GMT").unwrap().local_minus_utc(), 0);
/// assert!(parse_offset("CDT").is_none());
/// assert!(parse_offset("central").is_none());
/// ```
pub fn parse_offset(token: &str) -> Option<FixedOffset> {
    let token = token.trim();
    if let Some(seconds) = zone_seconds(token) {
        return FixedOffset::east_opt(seconds);
    }

    let caps = NUMERIC_OFFSET.captures(token)?;
    let hours: i32 = caps[2].parse().ok()?;
    let minutes: i32 = caps.get(3).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    let seconds = hours * 3600 + minutes * 60;
    FixedOffset::east_opt(if &caps[1] == "-" { -seconds } else { seconds })
}

fn zone_seconds(token: &str) -> Option<i32> {
    ZONES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token))
        .map(|&(_, seconds)| seconds)
}

fn is_weekday(token: &str) -> bool {
    let word = token.trim_end_matches('.').to_ascii_lowercase();
    WEEKDAYS.contains(&word.as_str())
}

fn is_month(token: &str) -> bool {
    let word = token.trim_end_matches('.').to_ascii_lowercase();
    MONTHS.iter().any(|m| word.starts_with(m)) && word.len() <= "september".len()
}

fn is_meridiem(token: &str) -> bool {
    token.eq_ignore_ascii_case("am") || token.eq_ignore_ascii_case("pm")
}

/// An all-caps word following the time that is not a known zone, e.g. `CDT`.
fn looks_like_zone(token: &str) -> bool {
    (2..=5).contains(&token.len()) && token.chars().all(|c| c.is_ascii_uppercase())
}

/// Splits `text` into the date-time words and the zone, if any.
fn tokenize(text: &str) -> (String, Option<FixedOffset>) {
    let cleaned = COMMENT.replace_all(text, " ");
    let cleaned = GLUED_ZONE.replace_all(&cleaned, "$1 $2");
    let cleaned = cleaned.replace(',', " ");

    let mut words: Vec<&str> = Vec::new();
    let mut zone = None;
    let mut seen_time = false;

    for token in cleaned.split_whitespace() {
        if is_weekday(token) {
            continue;
        }
        if zone.is_none() && (seen_time || token.starts_with(['+', '-'])) {
            if let Some(offset) = parse_offset(token) {
                zone = Some(offset);
                continue;
            }
        }
        if seen_time && !is_month(token) && !is_meridiem(token) && looks_like_zone(token) {
            continue;
        }
        if token.contains(':') {
            seen_time = true;
        }
        words.push(token);
    }

    (words.join(" "), zone)
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Parses a free-text date.
///
/// Returns `None` when no known layout matches; leftover words that are not
/// part of the date make the parse fail rather than being guessed around.
///
/// # Example
///
/// ```rust
/// use listpack::parsing::timestamp::{ParsedTimestamp, parse_flexible};
///
/// let parsed = parse_flexible("Wed, 8 Aug 90 12:36:34 -0500").unwrap();
/// assert!(parsed.is_aware());
///
/// // Regional zone names are not resolved.
/// let regional = parse_flexible("Wed, 8 Aug 90 12:36:34 CDT").unwrap();
/// assert!(!regional.is_aware());
///
/// let naive = parse_flexible("Mon Jan  8 16:08:22 1990").unwrap();
/// assert!(matches!(naive, ParsedTimestamp::Naive(_)));
/// ```
pub fn parse_flexible(raw: &str) -> Option<ParsedTimestamp> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(ParsedTimestamp::Aware(dt));
    }

    let (words, zone) = tokenize(text);
    let naive = parse_naive(&words)?;
    match zone {
        Some(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .map(ParsedTimestamp::Aware),
        None => Some(ParsedTimestamp::Naive(naive)),
    }
}

/// Extracts the leading `... HH:MM:SS [+-HHMM]` part of `raw`.
///
/// # Example
///
/// ```rust
/// use listpack::parsing::timestamp::extract_time_prefix;
///
/// let raw = "Tue, 14 Nov 1995 09:01:02 -0500 [forwarded by listserv]";
/// assert_eq!(extract_time_prefix(raw), Some("Tue, 14 Nov 1995 09:01:02 -0500"));
/// ```
pub fn extract_time_prefix(raw: &str) -> Option<&str> {
    TIME_PREFIX
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Formats an instant as a canonical timestamp.
pub fn to_canonical(dt: &DateTime<FixedOffset>) -> String {
    dt.format(CANONICAL_FORMAT).to_string()
}

/// Parses a canonical timestamp back into an instant.
pub fn parse_canonical(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(text, CANONICAL_FORMAT).ok()
}
