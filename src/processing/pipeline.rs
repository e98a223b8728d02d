//! The fixed filter → mapping → aggregation sequence.

use crate::rules::RuleSet;
use crate::types::Record;

use super::aggregate::aggregate;
use super::filter::filter;
use super::map::apply_mapping;

/// Row counts observed while running a [`RuleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformStats {
    /// Records handed to the pipeline.
    pub input_rows: usize,
    /// Records left after the filter stage (and therefore in the output).
    pub output_rows: usize,
    /// Distinct field names present in the output.
    pub output_fields: usize,
}

/// Run `rules` over `records`: filter, then (if enabled) lower-case field names, then
/// aggregate. The order is fixed.
///
/// Every stage is pure over its input; `records` is never modified. A rule set with no
/// filters, no mapping and no aggregations returns the input unchanged.
pub fn run(records: &[Record], rules: &RuleSet) -> Vec<Record> {
    run_with_stats(records, rules).0
}

/// Like [`run`], also returning [`TransformStats`].
pub fn run_with_stats(records: &[Record], rules: &RuleSet) -> (Vec<Record>, TransformStats) {
    let span = tracing::info_span!("transform", rows = records.len());
    let _enter = span.enter();

    let filtered = filter(records, &rules.filter);
    tracing::debug!(rows = filtered.len(), rules = rules.filter.len(), "filter stage done");

    let mapped = apply_mapping(&filtered, &rules.mapping);
    tracing::debug!(
        rows = mapped.len(),
        lowered = rules.mapping.lowered_field_names,
        "mapping stage done"
    );

    let aggregated = aggregate(&mapped, &rules.aggregation);
    tracing::debug!(
        rows = aggregated.len(),
        rules = rules.aggregation.len(),
        "aggregation stage done"
    );

    let stats = TransformStats {
        input_rows: records.len(),
        output_rows: aggregated.len(),
        output_fields: distinct_field_count(&aggregated),
    };
    tracing::info!(
        input_rows = stats.input_rows,
        output_rows = stats.output_rows,
        "transform finished"
    );
    (aggregated, stats)
}

fn distinct_field_count(records: &[Record]) -> usize {
    let mut seen: Vec<&str> = Vec::new();
    for name in records.iter().flat_map(|r| r.names()) {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen.len()
}
