//! Data cleaning for uploaded media records.
//!
//! This module turns a [`RawTable`] into a [`CleanedTable`]:
//! - Dates are parsed from many layouts; rows without a valid date are dropped
//! - Engagement counts are parsed; missing or junk values become 0
//! - Categorical text is passed through, absent columns stay absent
//!
//! Cleaning is a pure function of its input, so the session may memoize it
//! by upload fingerprint.

mod converters;

use crate::types::{CleanedTable, CleaningReport, RawTable, Record};
use converters::{
    Engagements, convert_category, convert_date, convert_engagements, convert_sentiment,
};
use tracing::{debug, info, warn};

/// Clean a raw upload. Shorthand for [`Cleaner::clean`].
pub fn clean(raw: &RawTable) -> CleanedTable {
    Cleaner.clean(raw)
}

/// Cleaner for raw upload rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cleaner;

impl Cleaner {
    /// Normalize every row of `raw`, keeping input order.
    pub fn clean(&self, raw: &RawTable) -> CleanedTable {
        let columns = raw.columns;
        let mut report = CleaningReport {
            rows_in: raw.len(),
            columns,
            ..CleaningReport::default()
        };

        info!("Cleaning {} uploaded rows...", raw.len());
        if !columns.date {
            warn!("Upload has no Date column; every row will be dropped");
        }

        let mut records = Vec::with_capacity(raw.len());
        for (index, row) in raw.rows.iter().enumerate() {
            let Some(date) = convert_date(row.date.as_deref()) else {
                debug!("Dropping row {}: unparseable date {:?}", index, row.date);
                report.rows_dropped += 1;
                continue;
            };

            let engagements = if columns.engagements {
                let converted = convert_engagements(row.engagements.as_deref());
                if converted == Engagements::Defaulted {
                    report.engagements_defaulted += 1;
                }
                converted.value()
            } else {
                0
            };

            records.push(Record {
                date,
                platform: convert_category(row.platform.as_deref()),
                sentiment: convert_sentiment(row.sentiment.as_deref()),
                media_type: convert_category(row.media_type.as_deref()),
                location: convert_category(row.location.as_deref()),
                engagements,
            });
        }

        report.rows_kept = records.len();

        if report.rows_dropped > 0 {
            let pct = (report.rows_dropped as f64 / report.rows_in as f64) * 100.0;
            info!(
                "Dropped {} rows with invalid dates ({:.1}%)",
                report.rows_dropped, pct
            );
        }
        if report.engagements_defaulted > 0 {
            debug!(
                "Repaired {} engagement values to 0",
                report.engagements_defaulted
            );
        }

        CleanedTable { records, report }
    }
}
