//! Pipeline configuration files.
//!
//! A configuration names one input, the [`RuleSet`] to apply, and one output:
//!
//! ```yaml
//! pipeline:
//!   input:
//!     type: csv
//!     config:
//!       filePath: data/input.csv
//!   transformations:
//!     filter:
//!       - { column: age, condition: ">18" }
//!     mapping:
//!       dynamic_mapping: true
//!     aggregation:
//!       - { operation: sum, column: amount, as: total_<column> }
//!   output:
//!     type: json
//!     config:
//!       filePath: out/output.json
//! ```
//!
//! `type` may be omitted when the file extension identifies the format. Relative paths are
//! used as written, i.e. relative to the working directory of the process.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::ingestion::DataFormat;
use crate::rules::RuleSet;

/// File location of an [`Endpoint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    pub file_path: PathBuf,
}

/// A source or sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Explicit format; inferred from the file extension when absent.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DataFormat>,
    pub config: EndpointConfig,
}

impl Endpoint {
    /// An endpoint at `path` with the format left to inference.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            format: None,
            config: EndpointConfig { file_path: path.into() },
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.file_path
    }

    /// The explicit format, or the one implied by the file extension.
    pub fn resolved_format(&self) -> PipelineResult<DataFormat> {
        match self.format {
            Some(f) => Ok(f),
            None => DataFormat::from_path(self.path()),
        }
    }
}

/// One input → rules → output run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub input: Endpoint,
    #[serde(default)]
    pub transformations: RuleSet,
    pub output: Endpoint,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    pipeline: PipelineConfig,
}

impl PipelineConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded pipeline config");
        Ok(config)
    }

    /// Parse and validate a YAML configuration (with the top-level `pipeline:` key).
    pub fn from_yaml_str(input: &str) -> PipelineResult<Self> {
        let file: ConfigFile = serde_yaml::from_str(input)?;
        file.pipeline.validate()?;
        Ok(file.pipeline)
    }

    /// Check endpoints and rules once, so nothing is re-validated while running.
    pub fn validate(&self) -> PipelineResult<()> {
        for (label, endpoint) in [("input", &self.input), ("output", &self.output)] {
            if endpoint.path().as_os_str().is_empty() {
                return Err(PipelineError::invalid_config(format!(
                    "{label}: filePath must not be empty"
                )));
            }
            endpoint.resolved_format()?;
        }
        self.transformations.validate()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::PipelineConfig;
    use crate::ingestion::DataFormat;
    use crate::rules::AggregateOp;

    const CONFIG: &str = r#"
pipeline:
  input:
    type: csv
    config:
      filePath: data/input.csv
  transformations:
    filter:
      - column: age
        condition: ">18"
    mapping:
      dynamic_mapping: true
    aggregation:
      - operation: count
        column: age
        as: n_<column>
  output:
    config:
      filePath: out/result.json
"#;

    #[test]
    fn parses_endpoints_and_rules() {
        let cfg = PipelineConfig::from_yaml_str(CONFIG).unwrap();
        assert_eq!(cfg.input.format, Some(DataFormat::Csv));
        assert_eq!(cfg.input.path(), Path::new("data/input.csv"));
        assert_eq!(cfg.output.format, None);
        assert_eq!(cfg.output.resolved_format().unwrap(), DataFormat::Json);
        assert_eq!(cfg.transformations.filter.len(), 1);
        assert!(cfg.transformations.mapping.lowered_field_names);
        assert_eq!(cfg.transformations.aggregation[0].operation, AggregateOp::Count);
    }

    #[test]
    fn transformations_default_to_noop() {
        let cfg = PipelineConfig::from_yaml_str(
            "pipeline:\n  input: { config: { filePath: a.csv } }\n  output: { config: { filePath: b.csv } }\n",
        )
        .unwrap();
        assert!(cfg.transformations.is_noop());
    }

    #[test]
    fn remote_store_endpoint_is_rejected() {
        let err = PipelineConfig::from_yaml_str(
            "pipeline:\n  input: { type: firebase, config: { filePath: x } }\n  output: { config: { filePath: b.csv } }\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown variant"));
    }

    #[test]
    fn unresolvable_format_is_rejected() {
        let err = PipelineConfig::from_yaml_str(
            "pipeline:\n  input: { config: { filePath: data.txt } }\n  output: { config: { filePath: b.csv } }\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("cannot infer format from extension 'txt'"));
    }

    #[test]
    fn empty_path_is_rejected() {
        let err = PipelineConfig::from_yaml_str(
            "pipeline:\n  input: { type: csv, config: { filePath: '' } }\n  output: { config: { filePath: b.csv } }\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("input: filePath must not be empty"));
    }
}
