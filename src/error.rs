use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type returned by readers, writers, config loading and the format bridge.
///
/// The transformation engine in [`crate::processing`] never fails; every variant here comes
/// from the I/O edges or from a value that cannot cross the [`crate::bridge`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decode/encode error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML config decode error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The input does not have the expected shape (e.g. a JSON row that is not an object).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A rule set or pipeline configuration failed validation at load time.
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    /// A value has no representation on the other side of the format bridge.
    #[error("unsupported value at row {row} field '{field}': {message}")]
    UnsupportedValue {
        row: usize,
        field: String,
        message: String,
    },
}

impl PipelineError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
