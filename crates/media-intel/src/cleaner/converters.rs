//! Per-field conversions from upload text to record values.

use crate::types::Sentiment;
use crate::utils::{parse_count, parse_date};
use chrono::NaiveDate;

/// Outcome of converting one engagement cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Engagements {
    /// The cell held a usable count.
    Parsed(u64),
    /// The cell was missing or unreadable and was repaired to 0.
    Defaulted,
}

impl Engagements {
    pub(crate) fn value(self) -> u64 {
        match self {
            Self::Parsed(n) => n,
            Self::Defaulted => 0,
        }
    }
}

pub(crate) fn convert_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(parse_date)
}

pub(crate) fn convert_engagements(raw: Option<&str>) -> Engagements {
    match raw.and_then(parse_count) {
        Some(n) => Engagements::Parsed(n),
        None => Engagements::Defaulted,
    }
}

/// Categorical text is kept verbatim; only empty cells become `None`.
pub(crate) fn convert_category(raw: Option<&str>) -> Option<String> {
    raw.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

pub(crate) fn convert_sentiment(raw: Option<&str>) -> Option<Sentiment> {
    convert_category(raw).map(Sentiment::from)
}
