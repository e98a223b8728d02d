//! Conversion between decoded source rows and normalized [`Record`]s.
//!
//! Each wire shape implements [`RecordFormat`]:
//!
//! - [`Delimited`]: string-only rows (CSV). Normalization wraps every cell in
//!   [`Value::String`] without parsing it; denormalization always stringifies using the
//!   [`Value`] `Display` policy.
//! - [`Structured`]: typed JSON objects. Scalars map one-to-one onto [`Value`]; nested arrays
//!   and objects cannot be represented and are rejected, and so are integers that `f64` cannot
//!   hold exactly. Denormalization keeps types. Every integral number is written as a JSON
//!   integer, so a document holding `2.0` comes back as `2`.
//!
//! Because both sides meet in the same value model, one transformation engine serves every
//! source/sink combination, including cross-format runs (CSV in, JSON out).

use serde_json::Number;

use crate::error::{PipelineError, PipelineResult};
use crate::processing;
use crate::rules::RuleSet;
use crate::types::{Record, Value};

/// A decoded delimited-text row: `(header, cell)` pairs in column order.
pub type TextRow = Vec<(String, String)>;

/// A decoded structured document (a JSON object, keys in document order).
pub type Document = serde_json::Map<String, serde_json::Value>;

/// 2^63: integral floats in `[-2^63, 2^63)` are written as `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
/// 2^64: non-negative integral floats below this are written as `u64`.
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

/// A wire representation that can be normalized into, and produced from, [`Record`]s.
pub trait RecordFormat {
    /// One decoded row in this representation.
    type Raw;

    /// Convert decoded rows into records.
    fn normalize(raw: Vec<Self::Raw>) -> PipelineResult<Vec<Record>>;

    /// Convert records back into this representation.
    fn denormalize(records: &[Record]) -> PipelineResult<Vec<Self::Raw>>;
}

/// String-valued rows from delimited text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Delimited;

/// Typed documents from JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct Structured;

impl RecordFormat for Delimited {
    type Raw = TextRow;

    fn normalize(raw: Vec<TextRow>) -> PipelineResult<Vec<Record>> {
        Ok(raw
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(name, cell)| (name, Value::String(cell)))
                    .collect::<Record>()
            })
            .collect())
    }

    fn denormalize(records: &[Record]) -> PipelineResult<Vec<TextRow>> {
        Ok(records
            .iter()
            .map(|record| {
                record
                    .iter()
                    .map(|(name, value)| (name.to_owned(), value.to_string()))
                    .collect::<TextRow>()
            })
            .collect())
    }
}

impl RecordFormat for Structured {
    type Raw = Document;

    fn normalize(raw: Vec<Document>) -> PipelineResult<Vec<Record>> {
        raw.into_iter()
            .enumerate()
            .map(|(idx0, doc)| {
                let row = idx0 + 1;
                doc.into_iter()
                    .map(|(name, json)| {
                        let value = value_from_json(row, &name, json)?;
                        Ok((name, value))
                    })
                    .collect::<PipelineResult<Record>>()
            })
            .collect()
    }

    fn denormalize(records: &[Record]) -> PipelineResult<Vec<Document>> {
        records
            .iter()
            .enumerate()
            .map(|(idx0, record)| {
                let row = idx0 + 1;
                record
                    .iter()
                    .map(|(name, value)| Ok((name.to_owned(), value_to_json(row, name, value)?)))
                    .collect::<PipelineResult<Document>>()
            })
            .collect()
    }
}

fn value_from_json(row: usize, field: &str, json: serde_json::Value) -> PipelineResult<Value> {
    match json {
        serde_json::Value::Null => Ok(Value::Absent),
        serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_json::Value::String(s) => Ok(Value::String(s)),
        serde_json::Value::Number(n) => number_from_json(&n).map(Value::Number).ok_or_else(|| {
            PipelineError::UnsupportedValue {
                row,
                field: field.to_owned(),
                message: format!("number {n} is not exactly representable as f64"),
            }
        }),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Err(PipelineError::UnsupportedValue {
                row,
                field: field.to_owned(),
                message: "nested arrays/objects have no scalar representation".to_string(),
            })
        }
    }
}

/// `None` when the conversion to `f64` would change the number.
fn number_from_json(n: &Number) -> Option<f64> {
    if let Some(i) = n.as_i64() {
        let f = i as f64;
        return (f as i128 == i128::from(i)).then_some(f);
    }
    if let Some(u) = n.as_u64() {
        let f = u as f64;
        return (f as u128 == u128::from(u)).then_some(f);
    }
    n.as_f64()
}

fn value_to_json(row: usize, field: &str, value: &Value) -> PipelineResult<serde_json::Value> {
    match value {
        Value::Absent => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::String(s) => Ok(serde_json::Value::String(s.clone())),
        Value::Number(n) => {
            if n.fract() == 0.0 {
                if (-I64_BOUND..I64_BOUND).contains(n) {
                    return Ok(serde_json::Value::Number(Number::from(*n as i64)));
                }
                if (0.0..U64_BOUND).contains(n) {
                    return Ok(serde_json::Value::Number(Number::from(*n as u64)));
                }
            }
            Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .ok_or_else(|| PipelineError::UnsupportedValue {
                    row,
                    field: field.to_owned(),
                    message: format!("non-finite number {n} has no JSON representation"),
                })
        }
    }
}

/// Normalize `raw` rows of format `F`.
pub fn normalize<F: RecordFormat>(raw: Vec<F::Raw>) -> PipelineResult<Vec<Record>> {
    F::normalize(raw)
}

/// Denormalize `records` into format `F`.
pub fn denormalize<F: RecordFormat>(records: &[Record]) -> PipelineResult<Vec<F::Raw>> {
    F::denormalize(records)
}

/// Normalize rows of format `I`, run `rules`, and denormalize into format `O`.
///
/// ```rust
/// use rule_pipeline::bridge::{transform, Delimited, Structured, TextRow};
/// use rule_pipeline::rules::{AggregateOp, AggregationRule, RuleSet};
///
/// let rows: Vec<TextRow> = vec![
///     vec![("amount".into(), "10".into())],
///     vec![("amount".into(), "5".into())],
/// ];
/// let rules = RuleSet {
///     aggregation: vec![AggregationRule::new(AggregateOp::Count, "amount", "n_<column>")],
///     ..Default::default()
/// };
///
/// let docs = transform::<Delimited, Structured>(rows, &rules).unwrap();
/// assert_eq!(docs[0]["amount"], "10");
/// assert_eq!(docs[0]["n_amount"], 2);
/// ```
pub fn transform<I: RecordFormat, O: RecordFormat>(
    raw: Vec<I::Raw>,
    rules: &RuleSet,
) -> PipelineResult<Vec<O::Raw>> {
    let records = I::normalize(raw)?;
    let out = processing::run(&records, rules);
    O::denormalize(&out)
}
