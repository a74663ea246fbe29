//! Dashboard session state and its event handlers.

use super::cache::{CacheStats, CleaningCache};
use super::render::{DashboardPanels, NO_DATA_NOTICE, RenderModel};
use crate::aggregator::Aggregator;
use crate::cleaner::Cleaner;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result, ResultExt};
use crate::filter::{FilterEngine, FilterOptions};
use crate::loader::{Loader, UploadInfo};
use crate::types::{CleanedTable, CleaningReport, FilterCriteria, Record};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The cleaned upload currently backing the dashboard.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub upload: UploadInfo,
    pub table: Arc<CleanedTable>,
}

/// What an upload event produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub upload: UploadInfo,
    pub cleaning: CleaningReport,
    /// True when the cleaned table came from the cache.
    pub from_cache: bool,
}

/// Dataset and filters, always read and written together.
#[derive(Debug, Default)]
struct SessionState {
    dataset: Option<LoadedDataset>,
    criteria: FilterCriteria,
}

impl SessionState {
    fn current(&self) -> Result<LoadedDataset> {
        self.dataset.clone().ok_or(DashboardError::NoDataLoaded)
    }
}

/// One user's dashboard: the current dataset, the current filters and the
/// cleaning cache.
///
/// Every handler takes `&self`; state sits behind `parking_lot` locks so a
/// session can be shared between threads. The dataset and its filters share
/// one lock, so stored criteria always belong to the stored dataset.
#[derive(Debug)]
pub struct DashboardSession {
    config: DashboardConfig,
    state: RwLock<SessionState>,
    cache: Mutex<CleaningCache>,
}

static_assertions::assert_impl_all!(DashboardSession: Send, Sync);

impl DashboardSession {
    /// Create a session after validating `config`.
    pub fn new(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: DashboardConfig) -> Self {
        Self {
            config,
            state: RwLock::new(SessionState::default()),
            cache: Mutex::new(CleaningCache::new()),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    // ========================================================================
    // Upload events
    // ========================================================================

    /// Handle an upload from disk.
    ///
    /// A file that cannot be read clears the session like any other failed
    /// upload.
    pub fn upload_path(&self, path: impl AsRef<Path>) -> Result<UploadSummary> {
        let (name, bytes) = match Loader::read_file(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Upload rejected: {}", e);
                self.clear();
                return Err(e);
            }
        };
        self.upload_bytes(&name, &bytes)
    }

    /// Handle an upload of raw CSV bytes.
    ///
    /// Replaces the current dataset and resets the filters. On failure the
    /// session is left with no dataset.
    pub fn upload_bytes(&self, name: &str, bytes: &[u8]) -> Result<UploadSummary> {
        let upload = UploadInfo::from_bytes(name, bytes);
        info!("Upload received: {} ({} bytes)", upload.name, upload.size_bytes);

        let cached = if self.config.cache_cleaning {
            self.cache.lock().get(&upload.fingerprint)
        } else {
            None
        };

        let (table, from_cache) = match cached {
            Some(table) => {
                info!("Reusing cleaned table for {}", upload.name);
                (table, true)
            }
            None => {
                let raw = match Loader::read_bytes(bytes)
                    .context(format!("Failed to load {}", upload.name))
                {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!("Upload rejected: {}", e);
                        self.clear();
                        return Err(e);
                    }
                };

                let table = Arc::new(Cleaner.clean(&raw));
                if self.config.cache_cleaning {
                    self.cache
                        .lock()
                        .insert(upload.fingerprint.clone(), Arc::clone(&table));
                }
                (table, false)
            }
        };

        let summary = UploadSummary {
            upload: upload.clone(),
            cleaning: table.report.clone(),
            from_cache,
        };

        *self.state.write() = SessionState {
            dataset: Some(LoadedDataset { upload, table }),
            criteria: FilterCriteria::default(),
        };

        Ok(summary)
    }

    /// Drop the current dataset and filters. The cache is kept.
    pub fn clear(&self) {
        *self.state.write() = SessionState::default();
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().dataset.is_some()
    }

    // ========================================================================
    // Filter events
    // ========================================================================

    /// Handle a filter change: validate, store and re-render.
    ///
    /// Invalid criteria leave the stored filters untouched.
    pub fn apply_filters(&self, criteria: FilterCriteria) -> Result<RenderModel> {
        let dataset = {
            let mut state = self.state.write();
            let dataset = state.current()?;
            FilterEngine::validate(&criteria)?;
            state.criteria = criteria.clone();
            dataset
        };
        Ok(self.build_model(&dataset, criteria))
    }

    /// Clear every filter and re-render.
    pub fn reset_filters(&self) -> Result<RenderModel> {
        self.apply_filters(FilterCriteria::default())
    }

    /// Render with the stored filters.
    pub fn render(&self) -> Result<RenderModel> {
        let (dataset, criteria) = {
            let state = self.state.read();
            (state.current()?, state.criteria.clone())
        };
        Ok(self.build_model(&dataset, criteria))
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.state.read().criteria.clone()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Selector choices for the loaded dataset.
    pub fn options(&self) -> Result<FilterOptions> {
        let dataset = self.current()?;
        Ok(FilterOptions::from_records(&dataset.table.records))
    }

    /// The full cleaned table.
    pub fn cleaned(&self) -> Result<Arc<CleanedTable>> {
        Ok(self.current()?.table)
    }

    /// The first `preview_rows` cleaned records.
    pub fn preview(&self) -> Result<Vec<Record>> {
        let dataset = self.current()?;
        Ok(self.preview_of(&dataset.table))
    }

    pub fn upload_info(&self) -> Option<UploadInfo> {
        self.state
            .read()
            .dataset
            .as_ref()
            .map(|d| d.upload.clone())
    }

    // ========================================================================
    // Cache
    // ========================================================================

    /// Forget the memoized cleaning result.
    pub fn invalidate_cache(&self) {
        self.cache.lock().invalidate();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn current(&self) -> Result<LoadedDataset> {
        self.state.read().current()
    }

    fn preview_of(&self, table: &CleanedTable) -> Vec<Record> {
        table
            .records
            .iter()
            .take(self.config.preview_rows)
            .cloned()
            .collect()
    }

    fn build_model(&self, dataset: &LoadedDataset, criteria: FilterCriteria) -> RenderModel {
        let table = &dataset.table;
        let top_n = self.config.top_n;

        let filtered = FilterEngine::new(table.columns()).apply(&table.records, &criteria);
        let no_data = filtered.is_empty();

        let panels = if no_data {
            debug!("Filtered set is empty; skipping aggregation");
            DashboardPanels::no_data(top_n)
        } else {
            DashboardPanels::from_summaries(Aggregator::new(top_n).summarize(&filtered), top_n)
        };

        RenderModel {
            upload: dataset.upload.clone(),
            cleaning: table.report.clone(),
            preview: self.preview_of(table),
            options: FilterOptions::from_records(&table.records),
            criteria,
            total_records: table.len(),
            filtered_records: filtered.len(),
            no_data,
            notice: no_data.then(|| NO_DATA_NOTICE.to_string()),
            panels,
        }
    }
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::with_valid_config(DashboardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const CSV: &str = "Date,Platform,Sentiment,MediaType,Location,Engagements\n\
                       2024-01-01,X,Positive,Article,NYC,10\n\
                       2024-01-02,Y,Negative,Video,LA,4\n\
                       2024-01-03,X,Neutral,Video,LA,7\n";

    fn loaded() -> DashboardSession {
        let session = DashboardSession::default();
        session.upload_bytes("sample.csv", CSV.as_bytes()).unwrap();
        session
    }

    #[test]
    fn test_handlers_require_upload() {
        let session = DashboardSession::default();
        assert!(!session.is_loaded());
        assert_eq!(session.render().unwrap_err().error_code(), "NO_DATA_LOADED");
        assert_eq!(
            session
                .apply_filters(FilterCriteria::new())
                .unwrap_err()
                .error_code(),
            "NO_DATA_LOADED"
        );
        assert!(session.options().is_err());
    }

    #[test]
    fn test_upload_then_render() {
        let session = loaded();
        let model = session.render().unwrap();

        assert_eq!(model.total_records, 3);
        assert_eq!(model.filtered_records, 3);
        assert!(!model.no_data);
        assert_eq!(model.notice, None);
        assert_eq!(model.panels.no_data_count(), 0);
        assert_eq!(model.preview.len(), 3);
    }

    #[test]
    fn test_second_identical_upload_hits_cache() {
        let session = loaded();
        let again = session.upload_bytes("renamed.csv", CSV.as_bytes()).unwrap();

        assert!(again.from_cache);
        assert_eq!(again.upload.name, "renamed.csv");
        assert_eq!(session.cache_stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_cache_disabled() {
        let config = DashboardConfig::builder().cache_cleaning(false).build().unwrap();
        let session = DashboardSession::new(config).unwrap();
        session.upload_bytes("a.csv", CSV.as_bytes()).unwrap();
        let again = session.upload_bytes("a.csv", CSV.as_bytes()).unwrap();

        assert!(!again.from_cache);
        assert_eq!(session.cache_stats(), CacheStats::default());
    }

    #[test]
    fn test_invalidate_cache_forces_reclean() {
        let session = loaded();
        session.invalidate_cache();
        let again = session.upload_bytes("sample.csv", CSV.as_bytes()).unwrap();
        assert!(!again.from_cache);
    }

    #[test]
    fn test_invalid_upload_clears_dataset() {
        let session = loaded();
        session.apply_filters(FilterCriteria::new().platform("X")).unwrap();

        let err = session.upload_bytes("junk.csv", b"foo,bar\n1,2\n").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_UPLOAD");
        assert!(!session.is_loaded());
        assert!(session.criteria().is_unconstrained());
    }

    #[test]
    fn test_new_upload_resets_filters() {
        let session = loaded();
        session.apply_filters(FilterCriteria::new().platform("X")).unwrap();
        session.upload_bytes("other.csv", b"Date,Platform\n2024-02-01,Z\n").unwrap();

        assert!(session.criteria().is_unconstrained());
        assert_eq!(session.render().unwrap().total_records, 1);
    }

    #[test]
    fn test_invalid_criteria_keep_previous_filters() {
        let session = loaded();
        session.apply_filters(FilterCriteria::new().platform("X")).unwrap();

        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let bad = FilterCriteria::new().start_date(day(3)).end_date(day(1));
        assert_eq!(
            session.apply_filters(bad).unwrap_err().error_code(),
            "INVALID_CRITERIA"
        );
        assert_eq!(session.criteria().platform.as_deref(), Some("X"));
    }

    #[test]
    fn test_empty_filter_result_is_no_data() {
        let session = loaded();
        let model = session
            .apply_filters(FilterCriteria::new().platform("Nowhere"))
            .unwrap();

        assert!(model.no_data);
        assert_eq!(model.filtered_records, 0);
        assert_eq!(model.panels.no_data_count(), 5);
        assert_eq!(model.notice.as_deref(), Some(NO_DATA_NOTICE));
        // preview and options still describe the whole upload
        assert_eq!(model.preview.len(), 3);
        assert_eq!(model.options.platforms, vec!["X", "Y"]);
    }

    #[test]
    fn test_reset_filters() {
        let session = loaded();
        session.apply_filters(FilterCriteria::new().platform("X")).unwrap();
        let model = session.reset_filters().unwrap();
        assert_eq!(model.filtered_records, 3);
    }

    #[test]
    fn test_preview_rows_limit() {
        let config = DashboardConfig::builder().preview_rows(2).build().unwrap();
        let session = DashboardSession::new(config).unwrap();
        session.upload_bytes("sample.csv", CSV.as_bytes()).unwrap();
        assert_eq!(session.preview().unwrap().len(), 2);
    }

    #[test]
    fn test_unreadable_path_clears_dataset() {
        let session = loaded();
        session.apply_filters(FilterCriteria::new().platform("X")).unwrap();

        // a directory passes the existence check but cannot be read as a file
        let err = session.upload_path(std::env::temp_dir()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_UPLOAD");
        assert!(!session.is_loaded());
        assert!(session.criteria().is_unconstrained());
    }

    #[test]
    fn test_filters_follow_their_dataset() {
        let session = Arc::new(loaded());
        let writers: Vec<_> = (0..4)
            .map(|i| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || {
                    for _ in 0..20 {
                        if i % 2 == 0 {
                            session.upload_bytes("sample.csv", CSV.as_bytes()).unwrap();
                        } else {
                            let _ = session.apply_filters(FilterCriteria::new().platform("X"));
                        }
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let model = session.render().unwrap();
        let platform = model.criteria.platform.as_deref();
        assert!(platform.is_none() || platform == Some("X"));
        assert_eq!(model.total_records, 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DashboardConfig {
            top_n: 0,
            ..DashboardConfig::default()
        };
        let err = DashboardSession::new(config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
