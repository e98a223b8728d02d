//! Field-name mapping.

use crate::rules::MappingRule;
use crate::types::Record;

/// Returns new records with every field name lower-cased. Values are untouched.
///
/// Names that collide after lower-casing (`Amount` and `amount`) resolve last-write-wins in
/// declaration order: the value of the later field is kept, at the position of the first.
pub fn lowercase_field_names(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .map(|record| {
            record
                .iter()
                .map(|(name, value)| (name.to_lowercase(), value.clone()))
                .collect::<Record>()
        })
        .collect()
}

/// Apply `mapping` to `records`; a copy of the input when dynamic mapping is off.
pub fn apply_mapping(records: &[Record], mapping: &MappingRule) -> Vec<Record> {
    if mapping.lowered_field_names {
        lowercase_field_names(records)
    } else {
        records.to_vec()
    }
}
