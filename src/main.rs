//! `rule-pipeline` command-line entry point.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rule_pipeline::config::PipelineConfig;
use rule_pipeline::observability::{CompositeObserver, FileObserver, IoObserver, TracingObserver};
use rule_pipeline::runner::{run_pipeline, RunOptions, RunSummary};

mod cli;
mod logging;

use crate::cli::Cli;
use crate::logging::{init_logging, LogConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&LogConfig::from_verbosity(cli.verbose, cli.log_format)) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(summary) => {
            tracing::info!(
                rows_read = summary.rows_read,
                rows_written = summary.rows_written,
                output_fields = summary.transform.output_fields,
                input = ?summary.input_format,
                output = ?summary.output_format,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    let config_path = cli
        .config_path()
        .context("either --config or --pipeline is required")?;
    let config = PipelineConfig::from_path(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;

    let options = RunOptions {
        observer: Some(build_observer(cli)),
        alert_at_or_above: None,
    };
    run_pipeline(&config, &options)
        .with_context(|| format!("pipeline {} failed", config_path.display()))
}

fn build_observer(cli: &Cli) -> Arc<dyn IoObserver> {
    let tracing_observer: Arc<dyn IoObserver> = Arc::new(TracingObserver);
    match &cli.observer_log {
        Some(path) => {
            let file_observer: Arc<dyn IoObserver> = Arc::new(FileObserver::new(path));
            Arc::new(CompositeObserver::new(vec![tracing_observer, file_observer]))
        }
        None => tracing_observer,
    }
}
