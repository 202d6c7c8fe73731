//! Wall-clock helpers for `created` values, file stamps and date keys.
//!
//! # Responsibility
//! - Provide an injectable clock for every write path.
//! - Format and parse the timestamp shapes persisted in documents and paths.
//!
//! # Invariants
//! - `created` values are built from local wall-clock fields plus the literal
//!   `+09:00` suffix. No timezone conversion happens on write.
//! - Parsed timestamps are compared as wall-clock values in the offset they
//!   were written with.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::SystemTime;

/// Literal offset appended to every `created` value.
pub const CREATED_OFFSET_SUFFIX: &str = "+09:00";
/// Default file-stamp pattern.
pub const DEFAULT_STAMP_FORMAT: &str = "YYYYMMDD_HHmmss";
/// Stamp mode that uses the UTC ISO form with `:`/`.` replaced by `-`.
pub const ISO_STAMP_FORMAT: &str = "ISO";
/// Stamp mode that uses epoch seconds.
pub const UNIX_STAMP_FORMAT: &str = "Unix";

static PATH_STAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{8})_(\d{6})").expect("valid path stamp regex"));

const CREATED_PARSE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Source of "now" for write paths.
pub trait Clock {
    /// Returns the current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant. Used by tests and replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Formats a `created` value: `YYYY-MM-DDTHH:MM:SS.mmm+09:00`.
///
/// The suffix is appended verbatim to the wall-clock fields, whatever the
/// host timezone is.
pub fn format_created(now: NaiveDateTime) -> String {
    format!(
        "{}{}",
        now.format("%Y-%m-%dT%H:%M:%S%.3f"),
        CREATED_OFFSET_SUFFIX
    )
}

/// Formats the stamp used as a file-name prefix for captured documents.
///
/// - `ISO` -> `2025-03-29T08-02-00` (UTC instant, separators replaced).
/// - `Unix` -> epoch seconds.
/// - anything else is a pattern where `YYYY`, `MM`, `DD`, `HH`, `mm`, `ss`
///   are substituted in that order.
pub fn format_file_stamp(format: &str, now: NaiveDateTime) -> String {
    match format {
        ISO_STAMP_FORMAT => iso_file_stamp(now),
        UNIX_STAMP_FORMAT => local_to_utc(now).timestamp().to_string(),
        pattern => pattern
            .replace("YYYY", &now.format("%Y").to_string())
            .replace("MM", &now.format("%m").to_string())
            .replace("DD", &now.format("%d").to_string())
            .replace("HH", &now.format("%H").to_string())
            .replace("mm", &now.format("%M").to_string())
            .replace("ss", &now.format("%S").to_string()),
    }
}

/// Formats the stamp used for notification file names.
///
/// Notifications only honor the `ISO` mode; every other setting produces
/// `YYYYMMDD_HHmmss`.
pub fn format_notification_stamp(format: &str, now: NaiveDateTime) -> String {
    if format == ISO_STAMP_FORMAT {
        iso_file_stamp(now)
    } else {
        now.format("%Y%m%d_%H%M%S").to_string()
    }
}

/// Parses a `created` value into its wall-clock time.
///
/// Accepts RFC 3339 (offset kept as written), offset-less date-times and
/// bare dates. Returns `None` for anything else.
pub fn parse_created(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    for format in CREATED_PARSE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Extracts the first `YYYYMMDD_HHmmss` stamp found anywhere in `path`.
pub fn parse_path_stamp(path: &str) -> Option<NaiveDateTime> {
    let caps = PATH_STAMP_RE.captures(path)?;
    let joined = format!("{}{}", &caps[1], &caps[2]);
    NaiveDateTime::parse_from_str(&joined, "%Y%m%d%H%M%S").ok()
}

/// Converts a file-system modification time into local wall-clock time.
pub fn system_time_to_local(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}

/// `YYYY-MM-DD` calendar day string.
pub fn day_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `YYYYMMDD` bucket key used by activity statistics.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn iso_file_stamp(now: NaiveDateTime) -> String {
    local_to_utc(now).format("%Y-%m-%dT%H-%M-%S").to_string()
}

fn local_to_utc(now: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&now).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // Wall-clock time skipped by a DST jump; treat it as UTC.
        None => Utc.from_utc_datetime(&now),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        day_key, format_created, format_file_stamp, format_notification_stamp, parse_created,
        parse_path_stamp,
    };
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(hh, mm, ss, 45)
            .unwrap()
    }

    #[test]
    fn created_uses_fixed_suffix_over_wall_clock_fields() {
        assert_eq!(
            format_created(at(2025, 3, 29, 8, 2, 0)),
            "2025-03-29T08:02:00.045+09:00"
        );
    }

    #[test]
    fn pattern_stamp_substitutes_every_token() {
        let now = at(2025, 3, 29, 8, 2, 9);
        assert_eq!(
            format_file_stamp("YYYYMMDD_HHmmss", now),
            "20250329_080209"
        );
        assert_eq!(format_file_stamp("YYYY-MM-DD", now), "2025-03-29");
    }

    #[test]
    fn notification_stamp_ignores_custom_patterns() {
        let now = at(2025, 3, 29, 8, 2, 9);
        assert_eq!(
            format_notification_stamp("DD.MM.YYYY", now),
            "20250329_080209"
        );
    }

    #[test]
    fn created_parsing_keeps_written_wall_clock() {
        let parsed = parse_created("2025-03-29T08:02:00.000+09:00").unwrap();
        assert_eq!(parsed, at(2025, 3, 29, 8, 2, 0) - chrono::Duration::milliseconds(45));
        assert!(parse_created("2025-03-29").is_some());
        assert!(parse_created("yesterday").is_none());
    }

    #[test]
    fn path_stamp_is_found_anywhere_in_path() {
        let parsed = parse_path_stamp("Archives/2025/x/20250329_080200_memo_hi.md").unwrap();
        assert_eq!(day_key(parsed.date()), "20250329");
        assert!(parse_path_stamp("Archives/20251399_999999.md").is_none());
    }
}
