//! Broadcast aggregation.
//!
//! Each [`AggregationRule`] reduces one column (or every numeric column) to a single scalar
//! and writes that scalar into *every* record under a derived name. This adds a summary
//! column to each row; it is not a group-by.

use crate::rules::{AggregateOp, AggregationRule, ColumnSelector};
use crate::types::{Record, Value};

/// Reduce `column` over `records` with `op`.
///
/// Only records holding a numeric value for `column` take part:
///
/// - `Sum` returns the float total (`0` when nothing is numeric)
/// - `Count` returns how many records hold a numeric value, not the record count
pub fn reduce(records: &[Record], column: &str, op: AggregateOp) -> Value {
    let numeric = records.iter().filter_map(|r| r.get(column).as_number());
    let result = match op {
        // Fold from +0.0: `Iterator::sum` on an empty float iterator yields -0.0.
        AggregateOp::Sum => numeric.fold(0.0, |acc, n| acc + n),
        AggregateOp::Count => numeric.count() as f64,
    };
    Value::Number(result)
}

/// Columns targeted by `selector`.
///
/// For `*` the schema is inferred from the first record only: its numeric fields, in
/// declaration order. Numeric columns that first appear in later records are not included.
pub fn resolve_columns(records: &[Record], selector: &ColumnSelector) -> Vec<String> {
    match selector {
        ColumnSelector::Named(name) => vec![name.clone()],
        ColumnSelector::All => records
            .first()
            .map(|first| {
                first
                    .iter()
                    .filter(|(_, v)| v.is_numeric())
                    .map(|(name, _)| name.to_owned())
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Apply `rules` left to right and return the records with the broadcast fields added.
///
/// A later rule sees the fields written by earlier rules as ordinary columns. Zero records in
/// means zero records out, with no fields added.
pub fn aggregate(records: &[Record], rules: &[AggregationRule]) -> Vec<Record> {
    let mut out = records.to_vec();
    if out.is_empty() {
        return out;
    }

    for rule in rules {
        for column in resolve_columns(&out, &rule.column) {
            let value = reduce(&out, &column, rule.operation);
            let name = rule.output_name(&column);
            tracing::debug!(
                op = %rule.operation,
                column = %column,
                output = %name,
                value = %value,
                "broadcast aggregate"
            );
            for record in &mut out {
                record.insert(name.as_str(), value.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{aggregate, reduce, resolve_columns};
    use crate::record;
    use crate::rules::{AggregateOp, AggregationRule, ColumnSelector};
    use crate::types::{Record, Value};

    fn amounts() -> Vec<Record> {
        vec![
            record! { "amount" => "10" },
            record! { "amount" => "x" },
            record! { "amount" => "5" },
        ]
    }

    #[test]
    fn reduce_sum_and_count_skip_non_numeric() {
        let rows = amounts();
        assert_eq!(reduce(&rows, "amount", AggregateOp::Sum), Value::Number(15.0));
        assert_eq!(reduce(&rows, "amount", AggregateOp::Count), Value::Number(2.0));
    }

    #[test]
    fn reduce_mixes_typed_and_text_numbers() {
        let rows = vec![
            record! { "v" => 1.5 },
            record! { "v" => "2.5" },
            record! { "v" => true },
            record! { "other" => "9" },
        ];
        assert_eq!(reduce(&rows, "v", AggregateOp::Sum), Value::Number(4.0));
        assert_eq!(reduce(&rows, "v", AggregateOp::Count), Value::Number(2.0));
    }

    #[test]
    fn reduce_skips_non_finite_text() {
        let rows = vec![record! { "v" => "NaN" }, record! { "v" => "infinity" }, record! { "v" => "4" }];
        assert_eq!(reduce(&rows, "v", AggregateOp::Sum), Value::Number(4.0));
        assert_eq!(reduce(&rows, "v", AggregateOp::Count), Value::Number(1.0));
    }

    #[test]
    fn reduce_of_missing_column_is_zero() {
        assert_eq!(reduce(&amounts(), "missing", AggregateOp::Sum), Value::Number(0.0));
        assert_eq!(reduce(&amounts(), "missing", AggregateOp::Count), Value::Number(0.0));
        assert_eq!(reduce(&amounts(), "missing", AggregateOp::Sum).to_string(), "0");
    }

    #[test]
    fn sum_is_broadcast_into_every_record() {
        let rule = AggregationRule::new(AggregateOp::Sum, "amount", "total_<column>");
        let out = aggregate(&amounts(), &[rule]);

        assert_eq!(out.len(), 3);
        for r in &out {
            assert_eq!(r.get("total_amount"), &Value::Number(15.0));
        }
        assert_eq!(out[1].get("amount"), &Value::from("x"));
    }

    #[test]
    fn count_is_broadcast_into_every_record() {
        let rule = AggregationRule::new(AggregateOp::Count, "amount", "n_<column>");
        let out = aggregate(&amounts(), &[rule]);
        assert!(out.iter().all(|r| r.get("n_amount") == &Value::Number(2.0)));
    }

    #[test]
    fn wildcard_uses_numeric_columns_of_first_record_only() {
        let rows = vec![
            record! { "a" => "1", "b" => 2.0, "name" => "x" },
            record! { "a" => "3", "b" => "4", "late" => "100" },
        ];
        assert_eq!(resolve_columns(&rows, &ColumnSelector::All), vec!["a", "b"]);

        let rule = AggregationRule::new(AggregateOp::Sum, ColumnSelector::All, "sum_<column>");
        let out = aggregate(&rows, &[rule]);
        for r in &out {
            assert_eq!(r.get("sum_a"), &Value::Number(4.0));
            assert_eq!(r.get("sum_b"), &Value::Number(6.0));
            assert!(!r.contains("sum_late"));
            assert!(!r.contains("sum_name"));
        }
    }

    #[test]
    fn later_rules_see_earlier_broadcast_fields() {
        let rules = [
            AggregationRule::new(AggregateOp::Sum, "amount", "total_<column>"),
            AggregationRule::new(AggregateOp::Sum, "total_amount", "<column>_x"),
        ];
        let out = aggregate(&amounts(), &rules);
        // 15 broadcast into 3 records, summed again.
        assert!(out.iter().all(|r| r.get("total_amount_x") == &Value::Number(45.0)));
    }

    #[test]
    fn empty_input_adds_nothing() {
        let rule = AggregationRule::new(AggregateOp::Count, ColumnSelector::All, "n_<column>");
        assert!(aggregate(&[], &[rule]).is_empty());
        assert!(resolve_columns(&[], &ColumnSelector::All).is_empty());
    }

    #[test]
    fn input_is_left_untouched() {
        let rows = amounts();
        let rule = AggregationRule::new(AggregateOp::Sum, "amount", "total");
        let _ = aggregate(&rows, &[rule]);
        assert!(!rows[0].contains("total"));
    }
}
