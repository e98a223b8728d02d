//! Sink adapters: denormalize records and encode them to files.
//!
//! [`write_records`] mirrors [`crate::ingestion::read_records`]: the format is taken from
//! [`IoOptions::format`] or inferred from the extension, and outcomes are reported to the
//! configured observer.
//!
//! Stringification policy per sink:
//!
//! - CSV always stringifies (see [`crate::types::Value`]'s `Display`)
//! - JSON keeps typed values; integral numbers are written as integers

pub mod csv;
pub mod json;

use std::fs;
use std::path::Path;

use crate::bridge::{Delimited, RecordFormat, Structured};
use crate::error::PipelineResult;
use crate::ingestion::{DataFormat, IoOptions};
use crate::observability::{report, IoContext, IoDirection};
use crate::types::Record;

/// Denormalize `records` and write them to `path`, creating parent directories as needed.
///
/// Returns the number of records written.
pub fn write_records(path: impl AsRef<Path>, records: &[Record], options: &IoOptions) -> PipelineResult<usize> {
    let path = path.as_ref();
    let format = options.resolve_format(path)?;

    let ctx = IoContext {
        path: path.to_path_buf(),
        format,
        direction: IoDirection::Write,
    };

    // Nothing touches the filesystem until denormalization succeeded.
    let result = match format {
        DataFormat::Csv => Delimited::denormalize(records).and_then(|rows| {
            ensure_parent_dir(path)?;
            csv::write_csv_to_path(path, &rows)
        }),
        DataFormat::Json => Structured::denormalize(records).and_then(|docs| {
            ensure_parent_dir(path)?;
            json::write_json_to_path(path, &docs)
        }),
    }
    .map(|()| records.len());

    report(options.observer.as_ref(), &ctx, options.alert_at_or_above, &result, |n| *n);
    result
}

fn ensure_parent_dir(path: &Path) -> PipelineResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}
