//! Filter engine: a conjunction of optional equality and date-range
//! predicates over cleaned records.

use crate::error::{DashboardError, Result};
use crate::types::{CategoryField, ColumnSet, FilterCriteria, Record, Sentiment};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Apply `criteria` assuming every column was uploaded.
///
/// See [`FilterEngine::apply`] for the column-aware version.
pub fn apply(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    FilterEngine::new(ColumnSet::all()).apply(records, criteria)
}

/// Column-aware filter engine.
///
/// Constraints on a column the upload did not carry are ignored rather
/// than matching nothing.
#[derive(Debug, Clone, Copy)]
pub struct FilterEngine {
    columns: ColumnSet,
}

impl FilterEngine {
    pub fn new(columns: ColumnSet) -> Self {
        Self { columns }
    }

    /// Reject contradictory criteria.
    pub fn validate(criteria: &FilterCriteria) -> Result<()> {
        if let (Some(start), Some(end)) = (criteria.start_date, criteria.end_date)
            && start > end
        {
            return Err(DashboardError::InvalidCriteria(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        Ok(())
    }

    /// The criteria with constraints on absent columns removed.
    pub fn effective_criteria(&self, criteria: &FilterCriteria) -> FilterCriteria {
        let mut effective = criteria.clone();
        for field in CategoryField::ALL {
            if criteria.category(field).is_some() && !self.columns.has(field) {
                warn!(
                    "Ignoring {} filter: column is not in the upload",
                    field.column_name()
                );
                let slot = match field {
                    CategoryField::Platform => &mut effective.platform,
                    CategoryField::Sentiment => &mut effective.sentiment,
                    CategoryField::MediaType => &mut effective.media_type,
                    CategoryField::Location => &mut effective.location,
                };
                *slot = None;
            }
        }
        effective
    }

    /// Records satisfying every active predicate, in input order.
    pub fn apply(&self, records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
        let criteria = self.effective_criteria(criteria);
        let filtered: Vec<Record> = records
            .iter()
            .filter(|record| matches(record, &criteria))
            .cloned()
            .collect();

        debug!(
            "Filter kept {} of {} records",
            filtered.len(),
            records.len()
        );
        filtered
    }
}

fn matches(record: &Record, criteria: &FilterCriteria) -> bool {
    let categories_match = CategoryField::ALL.iter().all(|&field| {
        match criteria.category(field) {
            Some(wanted) => record.category(field) == Some(wanted),
            None => true,
        }
    });

    categories_match
        && criteria.start_date.is_none_or(|start| record.date >= start)
        && criteria.end_date.is_none_or(|end| record.date <= end)
}

/// Choices a shell offers in its filter selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Sorted distinct platforms; empty when the column is absent.
    pub platforms: Vec<String>,
    /// The fixed sentiment choices.
    pub sentiments: Vec<String>,
    /// Sorted distinct media types; empty when the column is absent.
    pub media_types: Vec<String>,
    /// Sorted distinct locations; empty when the column is absent.
    pub locations: Vec<String>,
    /// Earliest record date, the default start of the range.
    pub min_date: Option<NaiveDate>,
    /// Latest record date, the default end of the range.
    pub max_date: Option<NaiveDate>,
}

impl FilterOptions {
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            platforms: distinct(records, CategoryField::Platform),
            sentiments: Sentiment::CHOICES.iter().map(|s| s.to_string()).collect(),
            media_types: distinct(records, CategoryField::MediaType),
            locations: distinct(records, CategoryField::Location),
            min_date: records.iter().map(|r| r.date).min(),
            max_date: records.iter().map(|r| r.date).max(),
        }
    }
}

fn distinct(records: &[Record], field: CategoryField) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.category(field))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
