//! Numeric conditions used by filter rules.
//!
//! Grammar: optional whitespace, one of `>`, `<`, `=`, then a float literal (surrounding
//! whitespace allowed). Examples: `">18"`, `" < 2.5 "`, `"=0"`.
//!
//! Anything else is malformed and evaluates as *pass*: the row is kept.

use std::str::FromStr;

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Less,
    Equal,
}

/// A compiled condition, e.g. `>18`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condition {
    pub op: Comparison,
    pub threshold: f64,
}

/// Returned by [`Condition::from_str`] for text outside the condition grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedCondition(pub String);

impl Condition {
    /// Parse condition text; `None` if it does not match the grammar.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let mut chars = text.chars();
        let op = match chars.next()? {
            '>' => Comparison::Greater,
            '<' => Comparison::Less,
            '=' => Comparison::Equal,
            _ => return None,
        };
        let threshold = chars
            .as_str()
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())?;
        Some(Self { op, threshold })
    }

    /// Test a numeric value against this condition.
    pub fn matches(&self, value: f64) -> bool {
        match self.op {
            Comparison::Greater => value > self.threshold,
            Comparison::Less => value < self.threshold,
            Comparison::Equal => value == self.threshold,
        }
    }
}

impl FromStr for Condition {
    type Err = MalformedCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::parse(s).ok_or_else(|| MalformedCondition(s.to_owned()))
    }
}

/// Evaluate `condition` against `value`. Malformed conditions are vacuously true.
pub fn evaluate(value: f64, condition: &str) -> bool {
    Condition::parse(condition).is_none_or(|c| c.matches(value))
}
