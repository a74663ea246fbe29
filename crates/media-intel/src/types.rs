//! Shared data types: raw upload rows, cleaned records, filter criteria and
//! summary views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Column names
// ============================================================================

pub const DATE_COLUMN: &str = "Date";
pub const PLATFORM_COLUMN: &str = "Platform";
pub const SENTIMENT_COLUMN: &str = "Sentiment";
pub const MEDIA_TYPE_COLUMN: &str = "MediaType";
pub const LOCATION_COLUMN: &str = "Location";
pub const ENGAGEMENTS_COLUMN: &str = "Engagements";

/// Column names the loader recognizes, in display order. Case-sensitive.
pub const RECOGNIZED_COLUMNS: [&str; 6] = [
    DATE_COLUMN,
    PLATFORM_COLUMN,
    SENTIMENT_COLUMN,
    MEDIA_TYPE_COLUMN,
    LOCATION_COLUMN,
    ENGAGEMENTS_COLUMN,
];

/// Which recognized columns were present in the upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSet {
    pub date: bool,
    pub platform: bool,
    pub sentiment: bool,
    pub media_type: bool,
    pub location: bool,
    pub engagements: bool,
}

impl ColumnSet {
    /// Every recognized column present.
    pub fn all() -> Self {
        Self {
            date: true,
            platform: true,
            sentiment: true,
            media_type: true,
            location: true,
            engagements: true,
        }
    }

    /// Build from a header row. Unknown names are ignored.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let has = |name: &str| headers.iter().any(|h| h.as_ref() == name);
        Self {
            date: has(DATE_COLUMN),
            platform: has(PLATFORM_COLUMN),
            sentiment: has(SENTIMENT_COLUMN),
            media_type: has(MEDIA_TYPE_COLUMN),
            location: has(LOCATION_COLUMN),
            engagements: has(ENGAGEMENTS_COLUMN),
        }
    }

    /// True when none of the recognized columns is present.
    pub fn is_empty(&self) -> bool {
        !(self.date
            || self.platform
            || self.sentiment
            || self.media_type
            || self.location
            || self.engagements)
    }

    /// Whether the column backing a categorical field is present.
    pub fn has(&self, field: CategoryField) -> bool {
        match field {
            CategoryField::Platform => self.platform,
            CategoryField::Sentiment => self.sentiment,
            CategoryField::MediaType => self.media_type,
            CategoryField::Location => self.location,
        }
    }

    /// Names of the present columns, in [`RECOGNIZED_COLUMNS`] order.
    pub fn present_names(&self) -> Vec<&'static str> {
        let flags = [
            self.date,
            self.platform,
            self.sentiment,
            self.media_type,
            self.location,
            self.engagements,
        ];
        RECOGNIZED_COLUMNS
            .iter()
            .zip(flags)
            .filter_map(|(name, present)| present.then_some(*name))
            .collect()
    }
}

/// The four free-text categorical dimensions of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    Platform,
    Sentiment,
    MediaType,
    Location,
}

impl CategoryField {
    pub const ALL: [CategoryField; 4] = [
        CategoryField::Platform,
        CategoryField::Sentiment,
        CategoryField::MediaType,
        CategoryField::Location,
    ];

    /// The CSV column backing this field.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Platform => PLATFORM_COLUMN,
            Self::Sentiment => SENTIMENT_COLUMN,
            Self::MediaType => MEDIA_TYPE_COLUMN,
            Self::Location => LOCATION_COLUMN,
        }
    }
}

// ============================================================================
// Sentiment
// ============================================================================

/// Sentiment label of a mention.
///
/// The three known labels are matched exactly (case-sensitive, as the
/// selector offers them); any other text is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Other(String),
}

impl Sentiment {
    /// The fixed choices offered by the sentiment selector.
    pub const CHOICES: [&'static str; 3] = ["Positive", "Neutral", "Negative"];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for Sentiment {
    fn from(label: &str) -> Self {
        match label {
            "Positive" => Self::Positive,
            "Neutral" => Self::Neutral,
            "Negative" => Self::Negative,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Sentiment {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Positive" | "Neutral" | "Negative" => Sentiment::from(label.as_str()),
            _ => Self::Other(label),
        }
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Raw upload
// ============================================================================

/// One uploaded row, as text, restricted to the recognized columns.
///
/// `None` means the cell was empty or the column is absent; [`RawTable::columns`]
/// tells the two apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub date: Option<String>,
    pub platform: Option<String>,
    pub sentiment: Option<String>,
    pub media_type: Option<String>,
    pub location: Option<String>,
    pub engagements: Option<String>,
}

/// A loosely-typed table straight out of the loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub columns: ColumnSet,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: ColumnSet, rows: Vec<RawRow>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Cleaned records
// ============================================================================

/// One cleaned media mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub platform: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub media_type: Option<String>,
    pub location: Option<String>,
    pub engagements: u64,
}

impl Record {
    /// The value of a categorical field, if present.
    pub fn category(&self, field: CategoryField) -> Option<&str> {
        match field {
            CategoryField::Platform => self.platform.as_deref(),
            CategoryField::Sentiment => self.sentiment.as_ref().map(Sentiment::as_str),
            CategoryField::MediaType => self.media_type.as_deref(),
            CategoryField::Location => self.location.as_deref(),
        }
    }
}

impl From<&Record> for RawRow {
    /// Render a record back into upload form, e.g. to re-clean it.
    fn from(record: &Record) -> Self {
        RawRow {
            date: Some(record.date.format("%Y-%m-%d").to_string()),
            platform: record.platform.clone(),
            sentiment: record.sentiment.as_ref().map(|s| s.as_str().to_string()),
            media_type: record.media_type.clone(),
            location: record.location.clone(),
            engagements: Some(record.engagements.to_string()),
        }
    }
}

/// Counters describing what the cleaner did to an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Rows received from the loader.
    pub rows_in: usize,
    /// Rows that became records.
    pub rows_kept: usize,
    /// Rows dropped because their date could not be parsed.
    pub rows_dropped: usize,
    /// Engagement cells that were missing or unreadable and became 0.
    pub engagements_defaulted: usize,
    /// Which recognized columns the upload carried.
    pub columns: ColumnSet,
}

/// Output of the cleaner: records in input order plus the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedTable {
    pub records: Vec<Record>,
    pub report: CleaningReport,
}

impl CleanedTable {
    pub fn columns(&self) -> ColumnSet {
        self.report.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Convert back into upload form, keeping the column set.
    pub fn to_raw(&self) -> RawTable {
        RawTable::new(self.columns(), self.records.iter().map(RawRow::from).collect())
    }
}

// ============================================================================
// Filter criteria
// ============================================================================

/// Snapshot of the user's filter selections.
///
/// `None` (or an empty string) on any field means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub platform: Option<String>,
    pub sentiment: Option<String>,
    pub media_type: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platform(mut self, value: impl Into<String>) -> Self {
        self.platform = Some(value.into());
        self
    }

    pub fn sentiment(mut self, value: impl Into<String>) -> Self {
        self.sentiment = Some(value.into());
        self
    }

    pub fn media_type(mut self, value: impl Into<String>) -> Self {
        self.media_type = Some(value.into());
        self
    }

    pub fn location(mut self, value: impl Into<String>) -> Self {
        self.location = Some(value.into());
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// The active (non-empty) equality constraint on a field.
    pub fn category(&self, field: CategoryField) -> Option<&str> {
        let value = match field {
            CategoryField::Platform => self.platform.as_deref(),
            CategoryField::Sentiment => self.sentiment.as_deref(),
            CategoryField::MediaType => self.media_type.as_deref(),
            CategoryField::Location => self.location.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// True when no field constrains anything.
    pub fn is_unconstrained(&self) -> bool {
        CategoryField::ALL.iter().all(|f| self.category(*f).is_none())
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

// ============================================================================
// Summary views
// ============================================================================

/// One `(key, value)` point of a summary view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPoint<K> {
    pub key: K,
    pub value: u64,
}

impl<K> ViewPoint<K> {
    pub fn new(key: K, value: u64) -> Self {
        Self { key, value }
    }
}

/// An aggregated `(key, value)` sequence ready for charting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryView<K> {
    points: Vec<ViewPoint<K>>,
}

impl<K> SummaryView<K> {
    pub fn new(points: Vec<ViewPoint<K>>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ViewPoint<K>] {
        &self.points
    }

    pub fn into_points(self) -> Vec<ViewPoint<K>> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of all values in the view, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.points
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.value))
    }

    /// Value recorded for a key, if the key is present.
    pub fn get<Q>(&self, key: &Q) -> Option<u64>
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.points.iter().find(|p| p.key == *key).map(|p| p.value)
    }

    /// Wrap as an outcome: an empty view is "no data", never "all zero".
    pub fn into_outcome(self) -> ViewOutcome<K> {
        if self.is_empty() {
            ViewOutcome::NoData
        } else {
            ViewOutcome::Data(self)
        }
    }
}

impl<K> Default for SummaryView<K> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

/// What a panel should draw: a view, or an explicit "no data" state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "points", rename_all = "snake_case")]
pub enum ViewOutcome<K> {
    Data(SummaryView<K>),
    NoData,
}

impl<K> ViewOutcome<K> {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    pub fn view(&self) -> Option<&SummaryView<K>> {
        match self {
            Self::Data(view) => Some(view),
            Self::NoData => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_set_from_headers() {
        let columns = ColumnSet::from_headers(&["Date", "Platform", "Extra", "engagements"]);
        assert!(columns.date);
        assert!(columns.platform);
        assert!(!columns.engagements); // names are case-sensitive
        assert!(!columns.is_empty());
        assert_eq!(columns.present_names(), vec!["Date", "Platform"]);
    }

    #[test]
    fn test_column_set_empty() {
        let columns = ColumnSet::from_headers(&["foo", "bar"]);
        assert!(columns.is_empty());
    }

    #[test]
    fn test_sentiment_labels() {
        assert_eq!(Sentiment::from("Positive"), Sentiment::Positive);
        assert_eq!(
            Sentiment::from("positive"),
            Sentiment::Other("positive".to_string())
        );
        assert_eq!(Sentiment::from("Mixed".to_string()).as_str(), "Mixed");
    }

    #[test]
    fn test_sentiment_serializes_as_label() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"Negative\"");
        let back: Sentiment = serde_json::from_str("\"Sarcastic\"").unwrap();
        assert_eq!(back, Sentiment::Other("Sarcastic".to_string()));
    }

    #[test]
    fn test_criteria_empty_string_is_unconstrained() {
        let criteria = FilterCriteria::new().platform("");
        assert_eq!(criteria.category(CategoryField::Platform), None);
        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn test_empty_view_becomes_no_data() {
        let view: SummaryView<String> = SummaryView::default();
        assert!(view.into_outcome().is_no_data());

        let zero = SummaryView::new(vec![ViewPoint::new("X".to_string(), 0)]);
        assert!(!zero.into_outcome().is_no_data());
    }

    #[test]
    fn test_view_total_saturates() {
        let view = SummaryView::new(vec![
            ViewPoint::new("A".to_string(), u64::MAX),
            ViewPoint::new("B".to_string(), 1),
        ]);
        assert_eq!(view.total(), u64::MAX);
    }

    #[test]
    fn test_view_outcome_serialization() {
        let outcome = SummaryView::new(vec![ViewPoint::new("X".to_string(), 3)]).into_outcome();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "data");
        assert_eq!(json["points"][0]["key"], "X");
        assert_eq!(json["points"][0]["value"], 3);

        let none: ViewOutcome<String> = ViewOutcome::NoData;
        assert_eq!(serde_json::to_value(&none).unwrap()["status"], "no_data");
    }
}
