//! The five summary views behind the dashboard panels.
//!
//! Each function is pure over a filtered slice. Callers are expected to
//! short-circuit on an empty slice (see [`DashboardSession`]); given one
//! anyway, every function returns an empty view.
//!
//! Ordering:
//! - category views list keys in first-seen order of the input,
//! - the trend is ascending by date with no zero-filled days,
//! - top-N sorts by sum descending and breaks ties by first-seen order.
//!
//! Records with no value for a view's key are left out of that view.
//! Sums saturate at `u64::MAX`.
//!
//! [`DashboardSession`]: crate::dashboard::DashboardSession

use crate::types::{CategoryField, Record, SummaryView, ViewPoint};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Record count per sentiment label.
pub fn sentiment_breakdown(records: &[Record]) -> SummaryView<String> {
    count_by(records, CategoryField::Sentiment)
}

/// Engagement sum per platform.
pub fn platform_engagement(records: &[Record]) -> SummaryView<String> {
    sum_by(records, CategoryField::Platform)
}

/// Engagement sum per calendar day, ascending.
pub fn engagement_trend(records: &[Record]) -> SummaryView<NaiveDate> {
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in records {
        let total = per_day.entry(record.date).or_insert(0);
        *total = total.saturating_add(record.engagements);
    }

    SummaryView::new(
        per_day
            .into_iter()
            .map(|(day, total)| ViewPoint::new(day, total))
            .collect(),
    )
}

/// Record count per media type.
pub fn media_type_mix(records: &[Record]) -> SummaryView<String> {
    count_by(records, CategoryField::MediaType)
}

/// The `n` locations with the largest engagement sums.
///
/// Sorting is stable, so locations with equal sums keep the order in which
/// they first appear in `records`.
pub fn top_locations(records: &[Record], n: usize) -> SummaryView<String> {
    let mut points = sum_by(records, CategoryField::Location).into_points();
    let groups = points.len();

    points.sort_by(|a, b| b.value.cmp(&a.value));
    points.truncate(n);

    debug!("Top {} of {} locations kept", points.len(), groups);
    SummaryView::new(points)
}

/// All five views computed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summaries {
    pub sentiment: SummaryView<String>,
    pub platform: SummaryView<String>,
    pub trend: SummaryView<NaiveDate>,
    pub media_type: SummaryView<String>,
    pub top_locations: SummaryView<String>,
}

/// Aggregator over a filtered record set.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    top_n: usize,
}

impl Aggregator {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Run the five independent queries.
    pub fn summarize(&self, records: &[Record]) -> Summaries {
        Summaries {
            sentiment: sentiment_breakdown(records),
            platform: platform_engagement(records),
            trend: engagement_trend(records),
            media_type: media_type_mix(records),
            top_locations: top_locations(records, self.top_n),
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TOP_N)
    }
}

fn count_by(records: &[Record], field: CategoryField) -> SummaryView<String> {
    group_in_first_seen_order(records, field, |_| 1)
}

fn sum_by(records: &[Record], field: CategoryField) -> SummaryView<String> {
    group_in_first_seen_order(records, field, |r| r.engagements)
}

fn group_in_first_seen_order<F>(
    records: &[Record],
    field: CategoryField,
    value: F,
) -> SummaryView<String>
where
    F: Fn(&Record) -> u64,
{
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut points: Vec<ViewPoint<String>> = Vec::new();

    for record in records {
        let Some(key) = record.category(field) else {
            continue;
        };
        let slot = *slots.entry(key).or_insert_with(|| {
            points.push(ViewPoint::new(key.to_string(), 0));
            points.len() - 1
        });
        points[slot].value = points[slot].value.saturating_add(value(record));
    }

    SummaryView::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sentiment;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn record(d: u32, platform: &str, sentiment: &str, media: &str, loc: &str, eng: u64) -> Record {
        Record {
            date: day(d),
            platform: Some(platform.to_string()),
            sentiment: Some(Sentiment::from(sentiment)),
            media_type: Some(media.to_string()),
            location: Some(loc.to_string()),
            engagements: eng,
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record(2, "X", "Positive", "Article", "NYC", 10),
            record(1, "Y", "Negative", "Video", "LA", 4),
            record(2, "X", "Neutral", "Video", "SF", 7),
            record(3, "Z", "Positive", "Podcast", "NYC", 1),
            record(1, "Y", "Positive", "Article", "Austin", 2),
        ]
    }

    fn points(view: &SummaryView<String>) -> Vec<(&str, u64)> {
        view.points()
            .iter()
            .map(|p| (p.key.as_str(), p.value))
            .collect()
    }

    #[test]
    fn test_sentiment_breakdown_counts() {
        let view = sentiment_breakdown(&sample());
        assert_eq!(
            points(&view),
            vec![("Positive", 3), ("Negative", 1), ("Neutral", 1)]
        );
    }

    #[test]
    fn test_sentiment_counts_sum_to_record_count() {
        let records = sample();
        assert_eq!(sentiment_breakdown(&records).total(), records.len() as u64);
    }

    #[test]
    fn test_platform_engagement_sums() {
        let view = platform_engagement(&sample());
        assert_eq!(points(&view), vec![("X", 17), ("Y", 6), ("Z", 1)]);
    }

    #[test]
    fn test_platform_sums_preserve_total() {
        let records = sample();
        let total: u64 = records.iter().map(|r| r.engagements).sum();
        assert_eq!(platform_engagement(&records).total(), total);
    }

    #[test]
    fn test_engagement_trend_sorted_without_gaps_filled() {
        let records = vec![
            record(5, "X", "Positive", "Article", "NYC", 3),
            record(1, "X", "Positive", "Article", "NYC", 5),
            record(1, "X", "Negative", "Video", "LA", 0),
        ];

        let trend = engagement_trend(&records);
        let got: Vec<_> = trend.points().iter().map(|p| (p.key, p.value)).collect();
        assert_eq!(got, vec![(day(1), 5), (day(5), 3)]);
    }

    #[test]
    fn test_media_type_mix() {
        let view = media_type_mix(&sample());
        assert_eq!(
            points(&view),
            vec![("Article", 2), ("Video", 2), ("Podcast", 1)]
        );
    }

    #[test]
    fn test_top_locations_limits_and_orders() {
        let view = top_locations(&sample(), 2);
        assert_eq!(points(&view), vec![("NYC", 11), ("SF", 7)]);
    }

    #[test]
    fn test_top_locations_tie_break_is_first_seen() {
        let records = vec![
            record(1, "X", "Positive", "Article", "B", 5),
            record(1, "X", "Positive", "Article", "A", 5),
            record(1, "X", "Positive", "Article", "C", 9),
            record(1, "X", "Positive", "Article", "D", 5),
        ];

        let view = top_locations(&records, 3);
        assert_eq!(points(&view), vec![("C", 9), ("B", 5), ("A", 5)]);
    }

    #[test]
    fn test_top_locations_dominates_excluded_groups() {
        let mut records = sample();
        for (i, loc) in ["P", "Q", "R", "S"].iter().enumerate() {
            records.push(record(4, "X", "Positive", "Article", loc, i as u64 * 3));
        }

        let all = sum_by(&records, CategoryField::Location);
        let top = top_locations(&records, 5);
        assert!(top.len() <= 5);

        let min_kept = top.points().iter().map(|p| p.value).min().unwrap();
        for point in all.points() {
            if top.get(point.key.as_str()).is_none() {
                assert!(point.value <= min_kept);
            }
        }
    }

    #[test]
    fn test_missing_keys_are_skipped() {
        let mut records = sample();
        records.push(Record {
            location: None,
            ..record(4, "X", "Positive", "Article", "", 100)
        });

        let view = top_locations(&records, 10);
        assert!(view.points().iter().all(|p| !p.key.is_empty()));
        assert_eq!(view.total(), 24);
    }

    #[test]
    fn test_absent_column_gives_empty_view() {
        let records: Vec<Record> = sample()
            .into_iter()
            .map(|r| Record {
                media_type: None,
                ..r
            })
            .collect();
        assert!(media_type_mix(&records).is_empty());
    }

    #[test]
    fn test_sums_saturate_instead_of_overflowing() {
        let records = vec![
            record(1, "X", "Positive", "Article", "NYC", u64::MAX),
            record(1, "X", "Positive", "Article", "NYC", 5),
        ];

        assert_eq!(platform_engagement(&records).get("X"), Some(u64::MAX));
        assert_eq!(top_locations(&records, 5).get("NYC"), Some(u64::MAX));
        assert_eq!(engagement_trend(&records).get(&day(1)), Some(u64::MAX));
        assert_eq!(platform_engagement(&records).total(), u64::MAX);
    }

    #[test]
    fn test_summarize_uses_configured_top_n() {
        let summaries = Aggregator::new(1).summarize(&sample());
        assert_eq!(summaries.top_locations.len(), 1);
        assert_eq!(summaries.platform.len(), 3);
        assert_eq!(summaries.trend.len(), 3);
    }

    #[test]
    fn test_empty_input_gives_empty_views() {
        let summaries = Aggregator::default().summarize(&[]);
        assert!(summaries.sentiment.is_empty());
        assert!(summaries.trend.is_empty());
        assert!(summaries.top_locations.is_empty());
    }
}
