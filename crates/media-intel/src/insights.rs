//! Panel metadata: titles, chart kinds and the static insight bullets shown
//! under each chart.

use serde::{Deserialize, Serialize};

/// How a panel's view should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Pie with a hole, for share-of-total views.
    Donut,
    /// Vertical bars, one per category.
    Bar,
    /// Line with markers, for the daily trend.
    Line,
}

/// The five dashboard panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    SentimentBreakdown,
    PlatformEngagement,
    EngagementTrend,
    MediaTypeMix,
    TopLocations,
}

impl PanelKind {
    pub const ALL: [PanelKind; 5] = [
        PanelKind::SentimentBreakdown,
        PanelKind::PlatformEngagement,
        PanelKind::EngagementTrend,
        PanelKind::MediaTypeMix,
        PanelKind::TopLocations,
    ];

    /// Panel heading.
    pub fn title(&self, top_n: usize) -> String {
        match self {
            Self::SentimentBreakdown => "Sentiment Breakdown".to_string(),
            Self::PlatformEngagement => "Platform Engagements".to_string(),
            Self::EngagementTrend => "Engagement Trend over Time".to_string(),
            Self::MediaTypeMix => "Media Type Mix".to_string(),
            Self::TopLocations => format!("Top {} Locations by Engagement", top_n),
        }
    }

    /// Chart subtitle.
    pub fn chart_title(&self, top_n: usize) -> String {
        match self {
            Self::SentimentBreakdown => "Sentiment Distribution".to_string(),
            Self::PlatformEngagement => "Total Engagement per Platform".to_string(),
            Self::EngagementTrend => "Engagement Trend Over Time".to_string(),
            Self::MediaTypeMix => "Media Type Proportions".to_string(),
            Self::TopLocations => format!("Top {} Locations by Engagement", top_n),
        }
    }

    pub fn chart_kind(&self) -> ChartKind {
        match self {
            Self::SentimentBreakdown | Self::MediaTypeMix => ChartKind::Donut,
            Self::PlatformEngagement | Self::TopLocations => ChartKind::Bar,
            Self::EngagementTrend => ChartKind::Line,
        }
    }

    /// Label of the value axis.
    pub fn value_label(&self) -> &'static str {
        match self {
            Self::SentimentBreakdown | Self::MediaTypeMix => "Count",
            Self::PlatformEngagement | Self::TopLocations => "Engagements",
            Self::EngagementTrend => "Total Engagements",
        }
    }

    /// Static insight bullets for the panel.
    pub fn insights(&self) -> &'static [&'static str] {
        match self {
            Self::SentimentBreakdown => &[
                "A majority of positive sentiment points to a strong brand image.",
                "A sizeable neutral share is an opportunity to win over undecided audiences.",
                "Watch negative sentiment closely; a sudden rise can signal a problem.",
            ],
            Self::PlatformEngagement => &[
                "The platform with the highest engagement is your audience's main channel.",
                "Low-engagement platforms may need a rethink of content or targeting.",
                "Some content performs better on specific platforms; tailor your strategy.",
            ],
            Self::EngagementTrend => &[
                "Engagement spikes after a campaign launch indicate success.",
                "Engagement tends to peak in the first 24-48 hours after publication.",
                "Spot seasonal trends to plan relevant content.",
            ],
            Self::MediaTypeMix => &[
                "The dominant media type reflects your audience's preferences.",
                "If articles engage well but are a small share, consider producing more.",
                "Diversifying media types helps reach a wider audience.",
            ],
            Self::TopLocations => &[
                "Top locations are the areas most interested in your brand or topic.",
                "This supports localized marketing campaigns or content.",
                "Emerging areas outside the top group can be expansion targets.",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_panel_has_insights() {
        for panel in PanelKind::ALL {
            assert_eq!(panel.insights().len(), 3, "{:?}", panel);
            assert!(!panel.title(5).is_empty());
        }
    }

    #[test]
    fn test_top_locations_title_tracks_n() {
        assert_eq!(
            PanelKind::TopLocations.title(5),
            "Top 5 Locations by Engagement"
        );
        assert_eq!(
            PanelKind::TopLocations.title(3),
            "Top 3 Locations by Engagement"
        );
    }

    #[test]
    fn test_chart_kinds() {
        assert_eq!(PanelKind::SentimentBreakdown.chart_kind(), ChartKind::Donut);
        assert_eq!(PanelKind::EngagementTrend.chart_kind(), ChartKind::Line);
        assert_eq!(PanelKind::TopLocations.chart_kind(), ChartKind::Bar);
    }
}
