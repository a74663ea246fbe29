//! Output of dashboard state: a plain-text rendering of a [`RenderModel`]
//! and CSV export of the cleaned table.

use crate::dashboard::{Panel, RenderModel};
use crate::error::{Result, ResultExt};
use crate::types::{
    CleanedTable, DATE_COLUMN, ENGAGEMENTS_COLUMN, FilterCriteria, LOCATION_COLUMN,
    MEDIA_TYPE_COLUMN, PLATFORM_COLUMN, Record, SENTIMENT_COLUMN, ViewOutcome,
};
use polars::prelude::*;
use std::fmt::{self, Display, Write as _};
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

const RULE: &str = "----------------------------------------";

/// Render the dashboard as text, one section per panel.
pub fn render_text(model: &RenderModel) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_model(&mut out, model);
    out
}

fn write_model(out: &mut String, model: &RenderModel) -> fmt::Result {
    let report = &model.cleaning;

    writeln!(out, "Media Intelligence Dashboard")?;
    writeln!(out, "{}", RULE)?;
    writeln!(
        out,
        "Source:   {} ({} bytes)",
        model.upload.name, model.upload.size_bytes
    )?;
    writeln!(out, "Columns:  {}", report.columns.present_names().join(", "))?;
    writeln!(
        out,
        "Cleaning: {} rows in, {} kept, {} dropped, {} engagements defaulted",
        report.rows_in, report.rows_kept, report.rows_dropped, report.engagements_defaulted
    )?;
    writeln!(out, "Filters:  {}", describe_criteria(&model.criteria))?;
    writeln!(
        out,
        "Records:  {} of {} match",
        model.filtered_records, model.total_records
    )?;

    if !model.preview.is_empty() {
        writeln!(out)?;
        writeln!(out, "Preview (first {} cleaned rows)", model.preview.len())?;
        for record in &model.preview {
            writeln!(out, "  {}", preview_line(record))?;
        }
    }

    if let Some(notice) = &model.notice {
        writeln!(out)?;
        writeln!(out, "{}", notice)?;
    }

    let panels = &model.panels;
    write_panel(out, &panels.sentiment)?;
    write_panel(out, &panels.platform)?;
    write_panel(out, &panels.trend)?;
    write_panel(out, &panels.media_type)?;
    write_panel(out, &panels.top_locations)?;

    Ok(())
}

fn write_panel<K: Display>(out: &mut String, panel: &Panel<K>) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "== {} ==", panel.title)?;

    match &panel.outcome {
        ViewOutcome::NoData => writeln!(out, "  No data available.")?,
        ViewOutcome::Data(view) => {
            writeln!(out, "  {} ({})", panel.chart_title, panel.value_label)?;
            let width = view
                .points()
                .iter()
                .map(|p| p.key.to_string().chars().count())
                .max()
                .unwrap_or(0);
            for point in view.points() {
                writeln!(
                    out,
                    "  {:<width$}  {:>10}",
                    point.key.to_string(),
                    point.value,
                    width = width
                )?;
            }
        }
    }

    writeln!(out, "  Insights:")?;
    for insight in &panel.insights {
        writeln!(out, "  - {}", insight)?;
    }
    Ok(())
}

fn describe_criteria(criteria: &FilterCriteria) -> String {
    if criteria.is_unconstrained() {
        return "none".to_string();
    }

    let mut parts = Vec::new();
    let categories = [
        ("platform", &criteria.platform),
        ("sentiment", &criteria.sentiment),
        ("media type", &criteria.media_type),
        ("location", &criteria.location),
    ];
    for (label, value) in categories {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            parts.push(format!("{}={}", label, value));
        }
    }
    if let Some(start) = criteria.start_date {
        parts.push(format!("from {}", start));
    }
    if let Some(end) = criteria.end_date {
        parts.push(format!("until {}", end));
    }
    parts.join(", ")
}

fn preview_line(record: &Record) -> String {
    let cell = |value: Option<&str>| value.unwrap_or("-").to_string();
    [
        record.date.to_string(),
        cell(record.platform.as_deref()),
        cell(record.sentiment.as_ref().map(|s| s.as_str())),
        cell(record.media_type.as_deref()),
        cell(record.location.as_deref()),
        record.engagements.to_string(),
    ]
    .join(" | ")
}

// ============================================================================
// CSV export
// ============================================================================

/// Build a DataFrame of the cleaned table, present columns only.
///
/// Dates are written as `YYYY-MM-DD` text so the export re-cleans to the
/// same records.
pub fn cleaned_dataframe(table: &CleanedTable) -> Result<DataFrame> {
    let columns = table.columns();
    let records = &table.records;
    let text = |f: fn(&Record) -> Option<String>| records.iter().map(f).collect::<Vec<_>>();

    let mut out: Vec<Column> = vec![Column::new(
        DATE_COLUMN.into(),
        records
            .iter()
            .map(|r| r.date.format("%Y-%m-%d").to_string())
            .collect::<Vec<_>>(),
    )];
    if columns.platform {
        out.push(Column::new(PLATFORM_COLUMN.into(), text(|r| r.platform.clone())));
    }
    if columns.sentiment {
        out.push(Column::new(
            SENTIMENT_COLUMN.into(),
            text(|r| r.sentiment.as_ref().map(|s| s.as_str().to_string())),
        ));
    }
    if columns.media_type {
        out.push(Column::new(MEDIA_TYPE_COLUMN.into(), text(|r| r.media_type.clone())));
    }
    if columns.location {
        out.push(Column::new(LOCATION_COLUMN.into(), text(|r| r.location.clone())));
    }
    if columns.engagements {
        out.push(Column::new(
            ENGAGEMENTS_COLUMN.into(),
            records.iter().map(|r| r.engagements).collect::<Vec<u64>>(),
        ));
    }

    DataFrame::new(out).context("Failed to build cleaned DataFrame")
}

/// Write the cleaned table to `path` as CSV.
pub fn write_cleaned_csv(table: &CleanedTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut df = cleaned_dataframe(table)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context(format!("Failed to write {}", path.display()))?;

    info!("Cleaned data saved: {} ({} rows)", path.display(), df.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::clean;
    use crate::dashboard::DashboardSession;
    use crate::loader::Loader;
    use crate::types::FilterCriteria;

    const CSV: &str = "Date,Platform,Sentiment,MediaType,Location,Engagements\n\
                       2024-01-01,X,Positive,Article,NYC,10\n\
                       2024-01-02,Y,Negative,Video,LA,4\n";

    #[test]
    fn test_render_text_sections() {
        let session = DashboardSession::default();
        session.upload_bytes("sample.csv", CSV.as_bytes()).unwrap();
        let text = render_text(&session.render().unwrap());

        assert!(text.contains("Source:   sample.csv"));
        assert!(text.contains("Filters:  none"));
        assert!(text.contains("== Sentiment Breakdown =="));
        assert!(text.contains("== Top 5 Locations by Engagement =="));
        assert!(text.contains("2024-01-01 | X | Positive | Article | NYC | 10"));
    }

    #[test]
    fn test_render_text_no_data() {
        let session = DashboardSession::default();
        session.upload_bytes("sample.csv", CSV.as_bytes()).unwrap();
        let model = session
            .apply_filters(FilterCriteria::new().platform("Z"))
            .unwrap();
        let text = render_text(&model);

        assert!(text.contains("Filters:  platform=Z"));
        assert_eq!(text.matches("No data available.").count(), 5);
    }

    #[test]
    fn test_cleaned_dataframe_keeps_present_columns() {
        let raw = Loader::read_bytes(b"Date,Location,Engagements\n1/2/2024,NYC,5\n").unwrap();
        let df = cleaned_dataframe(&clean(&raw)).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["Date", "Location", "Engagements"]);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn test_written_csv_recleans_to_same_records() {
        let table = clean(&Loader::read_bytes(CSV.as_bytes()).unwrap());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("cleaned.csv");

        write_cleaned_csv(&table, &path).unwrap();
        let reread = clean(&Loader::read_path(&path).unwrap().1);

        assert_eq!(reread.records, table.records);
    }
}
