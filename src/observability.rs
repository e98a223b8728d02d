//! Observer hooks for reading and writing records.
//!
//! [`crate::ingestion::read_records`] and [`crate::output::write_records`] report every
//! attempt to an optional [`IoObserver`]: `on_success` with row counts, `on_failure` with a
//! computed [`IoSeverity`], and `on_alert` when that severity meets the configured threshold.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::PipelineError;
use crate::ingestion::DataFormat;

/// How bad a reported event is. Ordered, so it can be compared against an alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IoSeverity {
    /// Informational event.
    Info,
    /// Non-fatal.
    Warning,
    /// The read or write failed because of the data or the configuration.
    Error,
    /// The read or write failed because of the filesystem.
    Critical,
}

/// Whether records were being read from a source or written to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoDirection {
    Read,
    Write,
}

impl fmt::Display for IoDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoDirection::Read => f.write_str("read"),
            IoDirection::Write => f.write_str("write"),
        }
    }
}

/// Context about a read or write attempt.
#[derive(Debug, Clone)]
pub struct IoContext {
    /// The file being read or written.
    pub path: PathBuf,
    /// Format used for the file.
    pub format: DataFormat,
    pub direction: IoDirection,
}

/// Minimal stats reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoStats {
    /// Number of records read or written.
    pub rows: usize,
}

/// Receives the outcome of every read and write.
pub trait IoObserver: Send + Sync {
    /// Called when the operation succeeds.
    fn on_success(&self, _ctx: &IoContext, _stats: IoStats) {}

    /// Called when the operation fails.
    fn on_failure(&self, _ctx: &IoContext, _severity: IoSeverity, _error: &PipelineError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IoContext, severity: IoSeverity, error: &PipelineError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Report `result` to `observer`, alerting when the severity is at or above `alert_at_or_above`.
pub(crate) fn report<T>(
    observer: Option<&Arc<dyn IoObserver>>,
    ctx: &IoContext,
    alert_at_or_above: IoSeverity,
    result: &Result<T, PipelineError>,
    rows: impl FnOnce(&T) -> usize,
) {
    let Some(obs) = observer else {
        return;
    };
    match result {
        Ok(v) => obs.on_success(ctx, IoStats { rows: rows(v) }),
        Err(e) => {
            let sev = severity_for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

/// Classify an error: infrastructure (I/O) failures are critical, data problems are errors.
pub fn severity_for_error(e: &PipelineError) -> IoSeverity {
    match e {
        PipelineError::Io(_) => IoSeverity::Critical,
        PipelineError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IoSeverity::Critical,
            _ => IoSeverity::Error,
        },
        PipelineError::Json(err) if err.is_io() => IoSeverity::Critical,
        PipelineError::Json(_) => IoSeverity::Error,
        PipelineError::Yaml(_)
        | PipelineError::InvalidInput { .. }
        | PipelineError::InvalidConfig { .. }
        | PipelineError::UnsupportedValue { .. } => IoSeverity::Error,
    }
}

/// Forwards every event to each inner observer, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IoObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IoObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IoObserver for CompositeObserver {
    fn on_success(&self, ctx: &IoContext, stats: IoStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IoContext, severity: IoSeverity, error: &PipelineError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IoContext, severity: IoSeverity, error: &PipelineError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IoObserver for TracingObserver {
    fn on_success(&self, ctx: &IoContext, stats: IoStats) {
        tracing::info!(
            direction = %ctx.direction,
            format = ?ctx.format,
            path = %ctx.path.display(),
            rows = stats.rows,
            "records {}", ctx.direction
        );
    }

    fn on_failure(&self, ctx: &IoContext, severity: IoSeverity, error: &PipelineError) {
        tracing::warn!(
            direction = %ctx.direction,
            severity = ?severity,
            format = ?ctx.format,
            path = %ctx.path.display(),
            %error,
            "record {} failed", ctx.direction
        );
    }

    fn on_alert(&self, ctx: &IoContext, severity: IoSeverity, error: &PipelineError) {
        tracing::error!(
            direction = %ctx.direction,
            severity = ?severity,
            format = ?ctx.format,
            path = %ctx.path.display(),
            %error,
            "ALERT: record {} failed", ctx.direction
        );
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Append one line per event to `path`. A log file that cannot be opened is skipped silently.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl IoObserver for FileObserver {
    fn on_success(&self, ctx: &IoContext, stats: IoStats) {
        self.append_line(&format!(
            "{} ok {} format={:?} path={} rows={}",
            unix_ts(),
            ctx.direction,
            ctx.format,
            ctx.path.display(),
            stats.rows
        ));
    }

    fn on_failure(&self, ctx: &IoContext, severity: IoSeverity, error: &PipelineError) {
        self.append_line(&format!(
            "{} fail {} severity={:?} format={:?} path={} err={}",
            unix_ts(),
            ctx.direction,
            severity,
            ctx.format,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &IoContext, severity: IoSeverity, error: &PipelineError) {
        self.append_line(&format!(
            "{} ALERT {} severity={:?} format={:?} path={} err={}",
            unix_ts(),
            ctx.direction,
            severity,
            ctx.format,
            ctx.path.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::{severity_for_error, IoSeverity};
    use crate::error::PipelineError;

    #[test]
    fn io_failures_are_critical_and_data_failures_are_errors() {
        let io = PipelineError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(severity_for_error(&io), IoSeverity::Critical);

        let bad = PipelineError::invalid_input("nope");
        assert_eq!(severity_for_error(&bad), IoSeverity::Error);

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(severity_for_error(&PipelineError::Json(json)), IoSeverity::Error);
    }
}
