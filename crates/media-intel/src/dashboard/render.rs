//! The render model: everything a shell needs to draw one dashboard state.

use crate::aggregator::Summaries;
use crate::filter::FilterOptions;
use crate::insights::{ChartKind, PanelKind};
use crate::loader::UploadInfo;
use crate::types::{CleaningReport, FilterCriteria, Record, SummaryView, ViewOutcome};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Message shown when the filters leave nothing to chart.
pub const NO_DATA_NOTICE: &str = "No data available after applying the filters.";

/// One chart panel with its insight text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel<K> {
    pub kind: PanelKind,
    pub title: String,
    pub chart_title: String,
    pub chart: ChartKind,
    pub value_label: String,
    pub outcome: ViewOutcome<K>,
    pub insights: Vec<String>,
}

impl<K> Panel<K> {
    fn new(kind: PanelKind, top_n: usize, outcome: ViewOutcome<K>) -> Self {
        Self {
            kind,
            title: kind.title(top_n),
            chart_title: kind.chart_title(top_n),
            chart: kind.chart_kind(),
            value_label: kind.value_label().to_string(),
            outcome,
            insights: kind.insights().iter().map(|s| s.to_string()).collect(),
        }
    }

    fn from_view(kind: PanelKind, top_n: usize, view: SummaryView<K>) -> Self {
        Self::new(kind, top_n, view.into_outcome())
    }

    pub fn is_no_data(&self) -> bool {
        self.outcome.is_no_data()
    }
}

/// The five panels of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardPanels {
    pub sentiment: Panel<String>,
    pub platform: Panel<String>,
    pub trend: Panel<NaiveDate>,
    pub media_type: Panel<String>,
    pub top_locations: Panel<String>,
}

impl DashboardPanels {
    pub fn from_summaries(summaries: Summaries, top_n: usize) -> Self {
        Self {
            sentiment: Panel::from_view(PanelKind::SentimentBreakdown, top_n, summaries.sentiment),
            platform: Panel::from_view(PanelKind::PlatformEngagement, top_n, summaries.platform),
            trend: Panel::from_view(PanelKind::EngagementTrend, top_n, summaries.trend),
            media_type: Panel::from_view(PanelKind::MediaTypeMix, top_n, summaries.media_type),
            top_locations: Panel::from_view(
                PanelKind::TopLocations,
                top_n,
                summaries.top_locations,
            ),
        }
    }

    /// Every panel in the "no data" state.
    pub fn no_data(top_n: usize) -> Self {
        Self {
            sentiment: Panel::new(PanelKind::SentimentBreakdown, top_n, ViewOutcome::NoData),
            platform: Panel::new(PanelKind::PlatformEngagement, top_n, ViewOutcome::NoData),
            trend: Panel::new(PanelKind::EngagementTrend, top_n, ViewOutcome::NoData),
            media_type: Panel::new(PanelKind::MediaTypeMix, top_n, ViewOutcome::NoData),
            top_locations: Panel::new(PanelKind::TopLocations, top_n, ViewOutcome::NoData),
        }
    }

    /// Number of panels without data.
    pub fn no_data_count(&self) -> usize {
        [
            self.sentiment.is_no_data(),
            self.platform.is_no_data(),
            self.trend.is_no_data(),
            self.media_type.is_no_data(),
            self.top_locations.is_no_data(),
        ]
        .into_iter()
        .filter(|&empty| empty)
        .count()
    }
}

/// Snapshot of the dashboard after one upload or filter event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderModel {
    pub upload: UploadInfo,
    pub cleaning: CleaningReport,
    /// First rows of the cleaned (unfiltered) table.
    pub preview: Vec<Record>,
    pub options: FilterOptions,
    pub criteria: FilterCriteria,
    pub total_records: usize,
    pub filtered_records: usize,
    /// True when the filtered table is empty; every panel is then `NoData`.
    pub no_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub panels: DashboardPanels,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViewPoint;

    #[test]
    fn test_no_data_panels() {
        let panels = DashboardPanels::no_data(5);
        assert_eq!(panels.no_data_count(), 5);
        assert_eq!(panels.top_locations.title, "Top 5 Locations by Engagement");
        assert_eq!(panels.trend.chart, ChartKind::Line);
    }

    #[test]
    fn test_panel_from_empty_view_is_no_data() {
        let panel: Panel<String> =
            Panel::from_view(PanelKind::MediaTypeMix, 5, SummaryView::default());
        assert!(panel.is_no_data());
        assert_eq!(panel.insights.len(), 3);
    }

    #[test]
    fn test_panel_serialization() {
        let view = SummaryView::new(vec![ViewPoint::new("X".to_string(), 12)]);
        let panel = Panel::from_view(PanelKind::PlatformEngagement, 5, view);
        let json = serde_json::to_value(&panel).unwrap();

        assert_eq!(json["kind"], "platform_engagement");
        assert_eq!(json["chart"], "bar");
        assert_eq!(json["outcome"]["status"], "data");
        assert_eq!(json["outcome"]["points"][0]["value"], 12);
    }
}
