//! Declarative transformation rules.
//!
//! A [`RuleSet`] is parsed and validated once (see [`RuleSet::validate`]) and is read-only
//! afterwards. Its serialized shape is:
//!
//! ```yaml
//! filter:
//!   - column: age
//!     condition: ">18"
//! mapping:
//!   dynamic_mapping: true
//!   custom_mapping:
//!     - { from: Name, to: full_name }
//! aggregation:
//!   - operation: sum
//!     column: amount
//!     as: total_<column>
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Placeholder substituted with the real column name in [`AggregationRule::output`].
pub const COLUMN_PLACEHOLDER: &str = "<column>";

/// Which field(s) a rule targets: one named column, or `*` for every column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnSelector {
    /// `*`
    All,
    /// A single named column (case-sensitive).
    Named(String),
}

impl ColumnSelector {
    /// Returns `true` for `*`.
    pub fn is_all(&self) -> bool {
        matches!(self, ColumnSelector::All)
    }
}

impl From<String> for ColumnSelector {
    fn from(s: String) -> Self {
        if s == "*" {
            ColumnSelector::All
        } else {
            ColumnSelector::Named(s)
        }
    }
}

impl From<&str> for ColumnSelector {
    fn from(s: &str) -> Self {
        ColumnSelector::from(s.to_owned())
    }
}

impl From<ColumnSelector> for String {
    fn from(c: ColumnSelector) -> Self {
        match c {
            ColumnSelector::All => "*".to_string(),
            ColumnSelector::Named(s) => s,
        }
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::All => f.write_str("*"),
            ColumnSelector::Named(s) => f.write_str(s),
        }
    }
}

/// Keep only records whose `column` satisfies `condition` (e.g. `">18"`).
///
/// The condition text is kept verbatim; it is compiled by
/// [`crate::processing::condition::Condition::parse`] when the filter runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    pub column: ColumnSelector,
    pub condition: String,
}

impl FilterRule {
    pub fn new(column: impl Into<ColumnSelector>, condition: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            condition: condition.into(),
        }
    }
}

/// A declared `from -> to` rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomMapping {
    pub from: String,
    pub to: String,
}

/// Field-name mapping options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingRule {
    /// Lower-case every field name.
    #[serde(rename = "dynamic_mapping")]
    pub lowered_field_names: bool,
    /// Accepted by the schema but not applied by the engine.
    pub custom_mapping: Vec<CustomMapping>,
}

/// Reduction applied by an [`AggregationRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    /// Running float total of numeric values.
    Sum,
    /// Number of records holding a numeric value (not the total record count).
    Count,
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateOp::Sum => f.write_str("sum"),
            AggregateOp::Count => f.write_str("count"),
        }
    }
}

/// Compute `operation` over `column` and broadcast the result into every record under
/// `output` (with `<column>` replaced by the column name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationRule {
    pub operation: AggregateOp,
    pub column: ColumnSelector,
    #[serde(rename = "as")]
    pub output: String,
}

impl AggregationRule {
    pub fn new(operation: AggregateOp, column: impl Into<ColumnSelector>, output: impl Into<String>) -> Self {
        Self {
            operation,
            column: column.into(),
            output: output.into(),
        }
    }

    /// Output field name for `column`: the first `<column>` in the pattern is replaced.
    pub fn output_name(&self, column: &str) -> String {
        self.output.replacen(COLUMN_PLACEHOLDER, column, 1)
    }
}

/// The full rule set for one run: filters, then mapping, then aggregations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub filter: Vec<FilterRule>,
    pub mapping: MappingRule,
    pub aggregation: Vec<AggregationRule>,
}

impl RuleSet {
    /// Parse and validate a rule set from YAML.
    pub fn from_yaml_str(input: &str) -> PipelineResult<Self> {
        let rules: RuleSet = serde_yaml::from_str(input)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Parse and validate a rule set from JSON.
    pub fn from_json_str(input: &str) -> PipelineResult<Self> {
        let rules: RuleSet = serde_json::from_str(input)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Returns `true` if running this rule set is the identity.
    pub fn is_noop(&self) -> bool {
        self.filter.is_empty() && !self.mapping.lowered_field_names && self.aggregation.is_empty()
    }

    /// Structural checks performed once at load time.
    ///
    /// Malformed condition strings are not rejected here; they keep every row
    /// when the filter runs.
    pub fn validate(&self) -> PipelineResult<()> {
        for (i, rule) in self.filter.iter().enumerate() {
            if let ColumnSelector::Named(name) = &rule.column {
                if name.is_empty() {
                    return Err(PipelineError::invalid_config(format!(
                        "filter[{i}]: column must not be empty"
                    )));
                }
            }
        }
        for (i, rule) in self.aggregation.iter().enumerate() {
            if rule.output.is_empty() {
                return Err(PipelineError::invalid_config(format!(
                    "aggregation[{i}]: 'as' must not be empty"
                )));
            }
            if let ColumnSelector::Named(name) = &rule.column {
                if name.is_empty() {
                    return Err(PipelineError::invalid_config(format!(
                        "aggregation[{i}]: column must not be empty"
                    )));
                }
            }
        }
        if !self.mapping.custom_mapping.is_empty() {
            tracing::warn!(
                entries = self.mapping.custom_mapping.len(),
                "custom_mapping is declared but not applied"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AggregateOp, AggregationRule, ColumnSelector, FilterRule, RuleSet};

    const RULES_YAML: &str = r#"
filter:
  - column: age
    condition: ">18"
  - column: "*"
    condition: "< 1000"
mapping:
  dynamic_mapping: true
  custom_mapping:
    - { from: Name, to: full_name }
aggregation:
  - operation: sum
    column: amount
    as: total_<column>
  - operation: count
    column: "*"
    as: n_<column>
"#;

    #[test]
    fn parses_full_rule_set_from_yaml() {
        let rules = RuleSet::from_yaml_str(RULES_YAML).unwrap();

        assert_eq!(
            rules.filter,
            vec![FilterRule::new("age", ">18"), FilterRule::new("*", "< 1000")]
        );
        assert!(rules.filter[1].column.is_all());
        assert!(rules.mapping.lowered_field_names);
        assert_eq!(rules.mapping.custom_mapping.len(), 1);
        assert_eq!(rules.mapping.custom_mapping[0].to, "full_name");
        assert_eq!(
            rules.aggregation,
            vec![
                AggregationRule::new(AggregateOp::Sum, "amount", "total_<column>"),
                AggregationRule::new(AggregateOp::Count, ColumnSelector::All, "n_<column>"),
            ]
        );
    }

    #[test]
    fn missing_sections_default_to_noop() {
        let rules = RuleSet::from_yaml_str("{}").unwrap();
        assert!(rules.is_noop());

        let rules = RuleSet::from_json_str(r#"{"mapping":{"dynamic_mapping":false}}"#).unwrap();
        assert!(rules.is_noop());
    }

    #[test]
    fn unknown_operation_is_rejected_at_load() {
        let err = RuleSet::from_yaml_str(
            "aggregation:\n  - { operation: avg, column: x, as: avg_<column> }\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("yaml error"));
    }

    #[test]
    fn empty_output_pattern_is_rejected_at_load() {
        let err = RuleSet::from_json_str(
            r#"{"aggregation":[{"operation":"sum","column":"x","as":""}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("aggregation[0]: 'as' must not be empty"));
    }

    #[test]
    fn malformed_condition_is_accepted_at_load() {
        let rules = RuleSet::from_json_str(r#"{"filter":[{"column":"x","condition":"~~"}]}"#).unwrap();
        assert_eq!(rules.filter[0].condition, "~~");
    }

    #[test]
    fn output_name_replaces_first_placeholder_only() {
        let rule = AggregationRule::new(AggregateOp::Sum, "amount", "<column>_sum_<column>");
        assert_eq!(rule.output_name("amount"), "amount_sum_<column>");

        let literal = AggregationRule::new(AggregateOp::Sum, "amount", "grand_total");
        assert_eq!(literal.output_name("amount"), "grand_total");
    }

    #[test]
    fn column_selector_round_trips_through_strings() {
        assert_eq!(ColumnSelector::from("*"), ColumnSelector::All);
        assert_eq!(String::from(ColumnSelector::All), "*");
        assert_eq!(ColumnSelector::from("a").to_string(), "a");
    }
}
