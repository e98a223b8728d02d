//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "rule-pipeline",
    version,
    about = "Filter, rename and aggregate records between CSV and JSON files"
)]
#[command(group(ArgGroup::new("source").required(true).args(["config", "pipeline"])))]
pub struct Cli {
    /// Pipeline configuration file (YAML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Named pipeline; loads `<config-dir>/<name>.yaml`.
    #[arg(long, value_enum)]
    pub pipeline: Option<NamedPipeline>,

    /// Directory holding the named pipeline configurations.
    #[arg(long, value_name = "DIR", default_value = "config")]
    pub config_dir: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log output format.
    #[arg(long, value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Append read/write events to this file.
    #[arg(long, value_name = "PATH")]
    pub observer_log: Option<PathBuf>,
}

impl Cli {
    /// The configuration file selected by `--config` or `--pipeline`.
    pub fn config_path(&self) -> Option<PathBuf> {
        match (&self.config, self.pipeline) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(named)) => Some(self.config_dir.join(named.file_name())),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamedPipeline {
    Csv,
    Json,
    CsvToJson,
    JsonToCsv,
}

impl NamedPipeline {
    pub fn file_name(self) -> &'static str {
        match self {
            NamedPipeline::Csv => "csv.yaml",
            NamedPipeline::Json => "json.yaml",
            NamedPipeline::CsvToJson => "csv_to_json.yaml",
            NamedPipeline::JsonToCsv => "json_to_csv.yaml",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
