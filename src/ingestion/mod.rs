//! Source adapters: decode files into rows, then normalize them into records.
//!
//! Most callers should use [`read_records`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IoOptions`])
//! - normalizes rows through [`crate::bridge`] into [`crate::types::Record`]s
//! - optionally reports success/failure/alerts to an [`crate::observability::IoObserver`]
//!
//! Format-specific readers returning raw rows are also available under:
//! - [`csv`]
//! - [`json`]

pub mod csv;
pub mod json;
pub mod unified;

pub use unified::{read_records, DataFormat, IoOptions};
