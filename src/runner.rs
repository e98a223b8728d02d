//! End-to-end execution of a [`PipelineConfig`]: read, transform, write.

use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::ingestion::{read_records, DataFormat, IoOptions};
use crate::observability::{IoObserver, IoSeverity};
use crate::output::write_records;
use crate::processing::{run_with_stats, TransformStats};

/// Options for [`run_pipeline`].
#[derive(Clone, Default)]
pub struct RunOptions {
    /// Observer notified about the read and the write.
    pub observer: Option<Arc<dyn IoObserver>>,
    /// Alert threshold passed to the observer; defaults to critical.
    pub alert_at_or_above: Option<IoSeverity>,
}

impl std::fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

/// Outcome of a successful [`run_pipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub rows_read: usize,
    pub rows_written: usize,
    pub input_format: DataFormat,
    pub output_format: DataFormat,
    /// Row and field counts around the rule set.
    pub transform: TransformStats,
}

/// Read the configured input, apply the configured rules, and write the configured output.
///
/// The whole record set is held in memory between the read and the write. A failure in any
/// step aborts the run; the output file is only touched once the transformation succeeded.
pub fn run_pipeline(config: &PipelineConfig, options: &RunOptions) -> PipelineResult<RunSummary> {
    let input_format = config.input.resolved_format()?;
    let output_format = config.output.resolved_format()?;

    let span = tracing::info_span!(
        "pipeline",
        input = %config.input.path().display(),
        output = %config.output.path().display()
    );
    let _enter = span.enter();

    let io = |format: DataFormat| IoOptions {
        format: Some(format),
        observer: options.observer.clone(),
        alert_at_or_above: options.alert_at_or_above.unwrap_or(IoSeverity::Critical),
    };

    let records = read_records(config.input.path(), &io(input_format))?;
    let (transformed, transform) = run_with_stats(&records, &config.transformations);
    let rows_written = write_records(config.output.path(), &transformed, &io(output_format))?;

    let summary = RunSummary {
        rows_read: records.len(),
        rows_written,
        input_format,
        output_format,
        transform,
    };
    tracing::info!(
        rows_read = summary.rows_read,
        rows_written = summary.rows_written,
        rows_dropped = transform.input_rows.saturating_sub(transform.output_rows),
        "pipeline finished"
    );
    Ok(summary)
}
