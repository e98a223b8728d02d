//! Row filtering by [`FilterRule`]s.

use crate::rules::{ColumnSelector, FilterRule};
use crate::types::{Record, Value};

use super::condition::Condition;

/// A filter rule with its condition compiled. `None` means the condition was malformed.
struct CompiledRule<'a> {
    column: &'a ColumnSelector,
    condition: Option<Condition>,
}

impl CompiledRule<'_> {
    /// Non-numeric and missing values impose no constraint; neither does a malformed condition.
    fn passes(&self, record: &Record) -> bool {
        let Some(condition) = self.condition else {
            return true;
        };
        match self.column {
            ColumnSelector::Named(name) => satisfies(record.get(name), &condition),
            ColumnSelector::All => record.iter().all(|(_, v)| satisfies(v, &condition)),
        }
    }
}

fn satisfies(value: &Value, condition: &Condition) -> bool {
    value.as_number().is_none_or(|n| condition.matches(n))
}

fn compile(rules: &[FilterRule]) -> Vec<CompiledRule<'_>> {
    rules
        .iter()
        .map(|rule| {
            let condition = Condition::parse(&rule.condition);
            if condition.is_none() {
                tracing::warn!(
                    column = %rule.column,
                    condition = %rule.condition,
                    "malformed filter condition; rule keeps every row"
                );
            }
            CompiledRule {
                column: &rule.column,
                condition,
            }
        })
        .collect()
}

/// Returns the records that pass every rule (rules combine with logical AND).
///
/// - A rule on a named column passes when the column is missing or non-numeric.
/// - A `*` rule applies the condition to every numeric field of the record; one failing
///   field drops the record.
/// - A malformed condition passes every record.
///
/// The input is left untouched and record order is preserved.
pub fn filter(records: &[Record], rules: &[FilterRule]) -> Vec<Record> {
    if rules.is_empty() {
        return records.to_vec();
    }
    let compiled = compile(rules);
    records
        .iter()
        .filter(|record| compiled.iter().all(|rule| rule.passes(record)))
        .cloned()
        .collect()
}
