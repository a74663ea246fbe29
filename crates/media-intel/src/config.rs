//! Configuration for the dashboard session.
//!
//! Uses the builder pattern so shells can override only what they need.

use serde::{Deserialize, Serialize};

/// Default number of locations kept by the top-locations view.
pub const DEFAULT_TOP_N: usize = 5;

/// Default number of cleaned rows shown in the preview table.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Configuration for a [`DashboardSession`](crate::dashboard::DashboardSession).
///
/// # Example
///
/// ```rust,ignore
/// use media_intel::DashboardConfig;
///
/// let config = DashboardConfig::builder()
///     .top_n(10)
///     .preview_rows(20)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// How many locations the top-locations view keeps.
    /// Default: 5
    pub top_n: usize,

    /// How many cleaned rows go into the preview table.
    /// Default: 5
    pub preview_rows: usize,

    /// Reuse the cleaned table when the same bytes are uploaded again.
    /// Default: true
    pub cache_cleaning: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            cache_cleaning: true,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_n == 0 {
            return Err(ConfigValidationError::InvalidTopN(self.top_n));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid top-N: {0} (must be at least 1)")]
    InvalidTopN(usize),
}

impl From<ConfigValidationError> for crate::error::DashboardError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::DashboardError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`DashboardConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    top_n: Option<usize>,
    preview_rows: Option<usize>,
    cache_cleaning: Option<bool>,
}

impl DashboardConfigBuilder {
    /// Set how many locations the top-locations view keeps.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Set how many cleaned rows the preview shows.
    ///
    /// Zero is allowed and simply hides the preview.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Enable or disable memoized cleaning.
    pub fn cache_cleaning(mut self, enable: bool) -> Self {
        self.cache_cleaning = Some(enable);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `DashboardConfig` or an error if validation fails.
    pub fn build(self) -> Result<DashboardConfig, ConfigValidationError> {
        let config = DashboardConfig {
            top_n: self.top_n.unwrap_or(DEFAULT_TOP_N),
            preview_rows: self.preview_rows.unwrap_or(DEFAULT_PREVIEW_ROWS),
            cache_cleaning: self.cache_cleaning.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
