//! The dashboard core behind a UI shell.
//!
//! A shell forwards two kinds of events to a [`DashboardSession`]:
//!
//! - an upload ([`DashboardSession::upload_bytes`] / [`DashboardSession::upload_path`]),
//! - a filter change ([`DashboardSession::apply_filters`]).
//!
//! Each event produces plain data ([`UploadSummary`], [`RenderModel`]); the
//! shell only draws it.
//!
//! ```text
//! bytes ──► Loader ──► Cleaner ──► FilterEngine ──► Aggregator ──► RenderModel
//!              └─ fingerprint ─► CleaningCache ─┘
//! ```

mod cache;
mod render;
mod session;

pub use cache::{CacheStats, CleaningCache};
pub use render::{DashboardPanels, NO_DATA_NOTICE, Panel, RenderModel};
pub use session::{DashboardSession, LoadedDataset, UploadSummary};
