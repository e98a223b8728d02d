//! `rule-pipeline` reads records from a CSV or JSON file, applies a declarative rule set, and
//! writes the result to a CSV or JSON file.
//!
//! Every source is normalized into the same value model ([`types::Record`] of
//! [`types::Value`]s) before any rule runs, so one transformation engine serves every
//! source/sink combination.
//!
//! ## Rules
//!
//! A [`rules::RuleSet`] runs three stages in a fixed order:
//!
//! 1. **filter**: keep records whose numeric fields satisfy every `>N`, `<N` or `=N` condition.
//!    Values that are missing or not numeric never reject a record.
//! 2. **mapping**: optionally lower-case every field name.
//! 3. **aggregation**: compute a column `sum` or `count` over all records and broadcast it into
//!    every record under a templated name such as `total_<column>`.
//!
//! ## Formats
//!
//! - **CSV**: `.csv`. Cells are strings; headers are field names.
//! - **JSON**: `.json` / `.ndjson`. An array of objects, a single object, or one object per line.
//!   Scalars keep their type; nested arrays or objects are rejected.
//!
//! ## Quick example: run a configuration file
//!
//! ```no_run
//! use rule_pipeline::config::PipelineConfig;
//! use rule_pipeline::runner::{run_pipeline, RunOptions};
//!
//! # fn main() -> Result<(), rule_pipeline::PipelineError> {
//! let config = PipelineConfig::from_path("config/csv.yaml")?;
//! let summary = run_pipeline(&config, &RunOptions::default())?;
//! println!("read={} written={}", summary.rows_read, summary.rows_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: transform in memory
//!
//! ```rust
//! use rule_pipeline::processing::run;
//! use rule_pipeline::record;
//! use rule_pipeline::rules::{FilterRule, RuleSet};
//!
//! let records = vec![
//!     record! { "age" => "17" },
//!     record! { "age" => "30" },
//!     record! { "age" => "unknown" },
//! ];
//! let rules = RuleSet {
//!     filter: vec![FilterRule::new("age", ">18")],
//!     ..Default::default()
//! };
//! assert_eq!(run(&records, &rules).len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`types`]: the value model
//! - [`rules`]: rule definitions as loaded from configuration
//! - [`processing`]: filter, mapping and aggregation
//! - [`bridge`]: conversion between decoded rows and records
//! - [`ingestion`] / [`output`]: file sources and sinks
//! - [`config`] / [`runner`]: pipeline configuration files and their execution
//! - [`observability`]: read/write observer hooks
//! - [`error`]: the error type shared by every fallible operation

pub mod bridge;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod observability;
pub mod output;
pub mod processing;
pub mod rules;
pub mod runner;
pub mod types;

pub use error::{PipelineError, PipelineResult};
