//! Media Intelligence Dashboard Core
//!
//! Cleaning, filtering and aggregation for a dashboard over social-media
//! mention exports, built on Polars for CSV I/O.
//!
//! # Overview
//!
//! An uploaded CSV flows through a fixed pipeline:
//!
//! - **Loading**: every cell read as text, unrecognized columns ignored
//! - **Cleaning**: dates parsed (bad rows dropped), engagements repaired to counts
//! - **Filtering**: optional equality predicates plus an inclusive date range
//! - **Aggregation**: five summary views, each with an explicit "no data" state
//!
//! A [`DashboardSession`] drives the pipeline from explicit events and
//! memoizes the cleaning step by content hash.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use media_intel::{DashboardConfig, DashboardSession, FilterCriteria};
//!
//! let session = DashboardSession::new(DashboardConfig::default())?;
//! session.upload_path("mentions.csv")?;
//!
//! let model = session.apply_filters(FilterCriteria::new().platform("Twitter"))?;
//! if model.no_data {
//!     println!("Nothing matches");
//! }
//! ```
//!
//! # Using the pieces directly
//!
//! ```rust,ignore
//! use media_intel::{Loader, aggregator, clean, filter};
//!
//! let (_, raw) = Loader::read_path("mentions.csv")?;
//! let table = clean(&raw);
//! let filtered = filter::apply(&table.records, &Default::default());
//! let top = aggregator::top_locations(&filtered, 5);
//! ```

pub mod aggregator;
pub mod cleaner;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod insights;
pub mod loader;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use aggregator::{Aggregator, Summaries};
pub use cleaner::{Cleaner, clean};
pub use config::{ConfigValidationError, DashboardConfig, DashboardConfigBuilder};
pub use dashboard::{
    CacheStats, DashboardPanels, DashboardSession, NO_DATA_NOTICE, Panel, RenderModel,
    UploadSummary,
};
pub use error::{DashboardError, Result as DashboardResult, ResultExt};
pub use filter::{FilterEngine, FilterOptions};
pub use insights::{ChartKind, PanelKind};
pub use loader::{Loader, UploadInfo};
pub use reporting::{render_text, write_cleaned_csv};
pub use types::{
    CategoryField, CleanedTable, CleaningReport, ColumnSet, FilterCriteria, RawRow, RawTable,
    Record, Sentiment, SummaryView, ViewOutcome, ViewPoint,
};
pub use utils::{parse_count, parse_date, parse_iso_date};
