//! Shared parsing helpers used by the cleaner and the CLI.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Common error/missing value markers in data.
pub const ERROR_MARKERS: [&str; 10] = [
    "error", "unknown", "n/a", "na", "nan", "null", "missing", "none", "#n/a", "-",
];

/// Check if a string is an error/missing value marker.
pub fn is_error_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    ERROR_MARKERS.iter().any(|&marker| lower == marker)
}

/// True for empty, whitespace-only or error-marker cells.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty() || is_error_marker(s)
}

/// Parse an engagement count.
///
/// Only surrounding whitespace is tolerated: thousands separators, currency
/// signs and percent signs make the cell unreadable. Integers are parsed
/// exactly; other numbers go through `f64` and truncate toward zero.
/// Blank, non-numeric, non-finite and negative inputs yield `None` so the
/// caller can repair them to 0.
pub fn parse_count(s: &str) -> Option<u64> {
    if is_blank(s) {
        return None;
    }

    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if let Ok(count) = digits.parse::<u64>() {
        return Some(count);
    }

    let value = trimmed.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    // Saturates above u64::MAX.
    Some(value.trunc() as u64)
}

// =============================================================================
// Date Parsing Utilities
// =============================================================================

/// Date-only layouts, tried in order. For `a?b?yyyy` the month-first layout
/// comes first whatever the separator; the day-first one only catches days
/// above 12.
pub const DATE_FORMATS: [&str; 12] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%m.%d.%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Date-and-time layouts without a zone; the time part is discarded.
pub const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Best-effort parse of a calendar date from free text.
///
/// Accepts plain dates in the layouts of [`DATE_FORMATS`], naive datetimes
/// in [`DATETIME_FORMATS`], RFC 3339 and RFC 2822 timestamps. Zoned
/// timestamps keep the calendar day as written, not converted to UTC.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if is_blank(trimmed) {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
    {
        return Some(date);
    }

    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Some(datetime.date());
    }

    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
        .ok()
        .map(|dt| dt.date_naive())
}

/// Parse a `YYYY-MM-DD` date given on the command line.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", s, e))
}

// =============================================================================
// Tests
// =============================================================================
