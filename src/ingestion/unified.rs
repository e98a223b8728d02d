//! Unified read entrypoint.
//!
//! Most callers should use [`read_records`], which reads a file and normalizes it into
//! [`crate::types::Record`]s through the matching [`crate::bridge`] format.
//!
//! - If [`IoOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`IoObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bridge::{Delimited, RecordFormat, Structured};
use crate::error::{PipelineError, PipelineResult};
use crate::observability::{report, IoContext, IoDirection, IoObserver, IoSeverity};
use crate::types::Record;

use super::{csv, json};

/// Supported file formats, for both sources and sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// Comma-separated values (string-valued rows).
    Csv,
    /// JSON array-of-objects, single object, or NDJSON (typed documents).
    Json,
}

impl DataFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }

    /// Infer the format from `path`'s extension.
    pub fn from_path(path: &Path) -> PipelineResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                PipelineError::invalid_config(format!(
                    "cannot infer format: path has no extension ({})",
                    path.display()
                ))
            })?;

        Self::from_extension(ext).ok_or_else(|| {
            PipelineError::invalid_config(format!(
                "cannot infer format from extension '{ext}' for path ({})",
                path.display()
            ))
        })
    }
}

/// Options controlling [`read_records`] and [`crate::output::write_records`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IoOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<DataFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IoObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IoSeverity,
}

impl fmt::Debug for IoOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IoOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: IoSeverity::Critical,
        }
    }
}

impl IoOptions {
    pub(crate) fn resolve_format(&self, path: &Path) -> PipelineResult<DataFormat> {
        match self.format {
            Some(f) => Ok(f),
            None => DataFormat::from_path(path),
        }
    }
}

/// Read `path` and normalize it into records.
///
/// CSV rows become string-valued records; JSON documents keep their scalar types.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row count stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use std::sync::Arc;
///
/// use rule_pipeline::ingestion::{read_records, IoOptions};
/// use rule_pipeline::observability::{IoSeverity, TracingObserver};
///
/// # fn main() -> Result<(), rule_pipeline::PipelineError> {
/// let opts = IoOptions {
///     observer: Some(Arc::new(TracingObserver)),
///     alert_at_or_above: IoSeverity::Critical,
///     ..Default::default()
/// };
/// let records = read_records("orders.csv", &opts)?;
/// println!("rows={}", records.len());
/// # Ok(())
/// # }
/// ```
pub fn read_records(path: impl AsRef<Path>, options: &IoOptions) -> PipelineResult<Vec<Record>> {
    let path = path.as_ref();
    let format = options.resolve_format(path)?;

    let ctx = IoContext {
        path: path.to_path_buf(),
        format,
        direction: IoDirection::Read,
    };

    let result = match format {
        DataFormat::Csv => csv::read_csv_from_path(path).and_then(Delimited::normalize),
        DataFormat::Json => json::read_json_from_path(path).and_then(Structured::normalize),
    };

    report(options.observer.as_ref(), &ctx, options.alert_at_or_above, &result, Vec::len);
    result
}
