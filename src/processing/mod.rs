//! The transformation engine.
//!
//! The processing layer operates on normalized [`crate::types::Record`]s, whatever format they
//! were decoded from. It is purely in-memory, single-threaded and infallible: odd data
//! (non-numeric values, malformed conditions, empty input) is handled locally instead of
//! surfacing an error.
//!
//! - [`filter()`]: keep records that satisfy every [`crate::rules::FilterRule`]
//! - [`apply_mapping()`]: optional lower-casing of field names
//! - [`aggregate()`]: broadcast sum/count columns
//! - [`run()`]: the three stages in their fixed order
//!
//! ## Example: filter → map → aggregate
//!
//! ```rust
//! use rule_pipeline::processing::run;
//! use rule_pipeline::record;
//! use rule_pipeline::rules::{AggregateOp, AggregationRule, FilterRule, MappingRule, RuleSet};
//! use rule_pipeline::types::Value;
//!
//! let records = vec![
//!     record! { "Age" => "17", "Amount" => "10" },
//!     record! { "Age" => "19", "Amount" => "5" },
//!     record! { "Age" => "abc", "Amount" => "x" },
//! ];
//! let rules = RuleSet {
//!     filter: vec![FilterRule::new("Age", ">18")],
//!     mapping: MappingRule { lowered_field_names: true, ..Default::default() },
//!     aggregation: vec![AggregationRule::new(AggregateOp::Sum, "amount", "total_<column>")],
//! };
//!
//! let out = run(&records, &rules);
//! assert_eq!(out.len(), 2);
//! assert_eq!(out[0].get("total_amount"), &Value::Number(5.0));
//! assert_eq!(out[1].get("age"), &Value::from("abc"));
//! ```

pub mod aggregate;
pub mod condition;
pub mod filter;
pub mod map;
pub mod pipeline;

pub use aggregate::{aggregate, reduce};
pub use condition::{evaluate, Comparison, Condition};
pub use filter::filter;
pub use map::{apply_mapping, lowercase_field_names};
pub use pipeline::{run, run_with_stats, TransformStats};
