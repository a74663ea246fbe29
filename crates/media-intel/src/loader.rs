//! CSV upload loading.
//!
//! Reads an uploaded file with Polars into a [`RawTable`]. Every column is
//! read as text (`infer_schema_length = 0`) so the cleaner, not the CSV
//! reader, decides what counts as a date or a number.
//!
//! Loading tries two strategies before giving up:
//!
//! 1. Standard parsing with `"` as the quote character.
//! 2. Parsing after a light content clean-up (collapsed doubled quotes,
//!    blank lines removed).
//!
//! If both fail, or the result has none of the recognized columns, the
//! upload is rejected as [`DashboardError::InvalidUpload`].

use crate::error::{DashboardError, Result, ResultExt};
use crate::types::{
    ColumnSet, DATE_COLUMN, ENGAGEMENTS_COLUMN, LOCATION_COLUMN, MEDIA_TYPE_COLUMN,
    PLATFORM_COLUMN, RawRow, RawTable, SENTIMENT_COLUMN,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

/// Identity of an upload, used for display and for the cleaning cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadInfo {
    /// File name as shown to the user.
    pub name: String,
    /// Size of the uploaded content in bytes.
    pub size_bytes: u64,
    /// Hex SHA-256 of the uploaded content.
    pub fingerprint: String,
}

impl UploadInfo {
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            fingerprint: fingerprint(bytes),
        }
    }
}

/// Hex SHA-256 of a byte slice.
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Loader for uploaded CSV files.
pub struct Loader;

impl Loader {
    /// Read the file at `path` and parse it.
    pub fn read_path(path: impl AsRef<Path>) -> Result<(UploadInfo, RawTable)> {
        let (name, bytes) = Self::read_file(path)?;
        let info = UploadInfo::from_bytes(name, &bytes);
        let table = Self::read_bytes(&bytes)?;
        Ok((info, table))
    }

    /// Read the raw content of the file at `path` along with its display name.
    pub fn read_file(path: impl AsRef<Path>) -> Result<(String, Vec<u8>)> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DashboardError::InvalidUpload(format!(
                "file not found: {}",
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(DashboardError::InvalidUpload(format!(
                "not a file: {}",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(DashboardError::from)
            .context(format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload.csv")
            .to_string();
        Ok((name, bytes))
    }

    /// Parse uploaded CSV content.
    pub fn read_bytes(bytes: &[u8]) -> Result<RawTable> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(DashboardError::InvalidUpload("file is empty".to_string()));
        }

        let df = Self::parse_with_fallbacks(bytes)?;
        info!("Upload parsed: {:?}", df.shape());

        Self::to_raw_table(&df)
    }

    fn parse_with_fallbacks(bytes: &[u8]) -> Result<DataFrame> {
        // Strategy 1: standard parsing with quote handling
        match Self::parse_csv(bytes.to_vec()) {
            Ok(df) => return Ok(df),
            Err(e) => debug!("Standard CSV parsing failed: {}", e),
        }

        // Strategy 2: pre-clean content
        let content = String::from_utf8_lossy(bytes);
        let cleaned = clean_csv_content(&content);
        Self::parse_csv(cleaned.into_bytes()).map_err(|e| {
            warn!("Upload could not be parsed as CSV: {}", e);
            DashboardError::InvalidUpload(format!("not a readable CSV table: {}", e))
        })
    }

    fn parse_csv(bytes: Vec<u8>) -> PolarsResult<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
    }

    /// Project a text DataFrame onto the recognized columns.
    pub fn to_raw_table(df: &DataFrame) -> Result<RawTable> {
        let headers: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        let columns = ColumnSet::from_headers(&headers);

        if columns.is_empty() {
            return Err(DashboardError::InvalidUpload(format!(
                "none of the expected columns found (got: {})",
                headers.join(", ")
            )));
        }

        let ignored: Vec<&String> = headers
            .iter()
            .filter(|h| !crate::types::RECOGNIZED_COLUMNS.contains(&h.as_str()))
            .collect();
        if !ignored.is_empty() {
            debug!("Ignoring unrecognized columns: {:?}", ignored);
        }

        let height = df.height();
        let mut dates = text_column(df, DATE_COLUMN, height)?;
        let mut platforms = text_column(df, PLATFORM_COLUMN, height)?;
        let mut sentiments = text_column(df, SENTIMENT_COLUMN, height)?;
        let mut media_types = text_column(df, MEDIA_TYPE_COLUMN, height)?;
        let mut locations = text_column(df, LOCATION_COLUMN, height)?;
        let mut engagements = text_column(df, ENGAGEMENTS_COLUMN, height)?;

        let rows = (0..height)
            .map(|i| RawRow {
                date: dates[i].take(),
                platform: platforms[i].take(),
                sentiment: sentiments[i].take(),
                media_type: media_types[i].take(),
                location: locations[i].take(),
                engagements: engagements[i].take(),
            })
            .collect();

        Ok(RawTable::new(columns, rows))
    }
}

/// Values of a column as text, one entry per row.
///
/// Absent columns yield all `None`; empty cells are `None` as well.
fn text_column(df: &DataFrame, name: &str, height: usize) -> Result<Vec<Option<String>>> {
    let Ok(column) = df.column(name) else {
        return Ok(vec![None; height]);
    };

    let as_text = column.cast(&DataType::String)?;
    let values = as_text
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| value.filter(|v| !v.trim().is_empty()).map(str::to_string))
        .collect();

    Ok(values)
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
