//! Error types for the dashboard core.
//!
//! Row-level problems (unparseable dates, junk engagement counts) are never
//! errors: the cleaner repairs or drops them and records the fact in a
//! [`CleaningReport`](crate::types::CleaningReport). What remains here are
//! the failures that end one upload or filter cycle.
//!
//! Errors serialize as `{ code, message }` so a UI shell can show them.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the dashboard core.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The upload could not be read as a table.
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// A filter or render was requested before any file was uploaded.
    #[error("No data loaded")]
    NoDataLoaded,

    /// The filter selection is contradictory (e.g. start after end).
    #[error("Invalid filter criteria: {0}")]
    InvalidCriteria(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DashboardError>,
    },
}

impl DashboardError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DashboardError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for the UI.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidUpload(_) => "INVALID_UPLOAD",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::InvalidCriteria(_) => "INVALID_CRITERIA",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the session can continue by re-uploading or changing filters.
    ///
    /// Every variant except internal serialization failures is recoverable
    /// from the user's side.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Json(_) => false,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => true,
        }
    }
}

impl Serialize for DashboardError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DashboardError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DashboardError::Polars(e).with_context(context))
    }
}
