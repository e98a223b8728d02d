//! Core data model: one [`Value`] per cell and one [`Record`] per row/document.
//!
//! Every source format is normalized into these types (see [`crate::bridge`]) so the
//! transformation engine only ever sees a single value model.

use std::fmt;

/// A single field value.
///
/// Numeric semantics live in exactly one place: [`Value::as_number`]. A value is
/// numeric-comparable iff it is a [`Value::Number`] or a [`Value::String`] holding text that
/// parses as a finite decimal float. [`Value::Bool`] and [`Value::Absent`] are never numeric.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Missing/null value.
    #[default]
    Absent,
    /// UTF-8 text, as decoded. Never trimmed or re-parsed on the way in.
    String(String),
    /// 64-bit float.
    Number(f64),
    /// Boolean.
    Bool(bool),
}

impl Value {
    /// Coerce to a float, if this value is numeric-comparable.
    ///
    /// Strings use standard `f64` parsing; a failed parse is "not numeric", never an error.
    /// Text that parses to a non-finite float (`NaN`, `inf`, `infinity`) is not numeric either.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => s.parse::<f64>().ok().filter(|n| n.is_finite()),
            Value::Bool(_) | Value::Absent => None,
        }
    }

    /// Returns `true` if [`Value::as_number`] would succeed.
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }
}

/// Text form of a value, used wherever a sink needs strings.
///
/// - strings are written as is
/// - numbers use the shortest representation that round-trips (`15`, `15.5`), never exponent
///   notation
/// - booleans are `true` / `false`
/// - absent is the empty string
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => Ok(()),
            Value::String(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

static ABSENT: Value = Value::Absent;

/// One row/document: a mapping from field name to [`Value`].
///
/// Fields are kept in declaration order (the order a decoder produced them, then the order
/// later fields were added). Equality ignores that order. Records can be sparse: looking up a
/// field that is not present yields [`Value::Absent`].
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of `name`, or [`Value::Absent`] if the field is not present.
    pub fn get(&self, name: &str) -> &Value {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
            .unwrap_or(&ABSENT)
    }

    /// Returns `true` if the record declares `name` (even with an absent value).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    /// Set `name` to `value`, returning the previous value if the field existed.
    ///
    /// An existing field keeps its position; a new field is appended.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    /// Iterate `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .fields
                .iter()
                .all(|(k, v)| other.contains(k) && other.get(k) == v)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    /// Duplicate names resolve last-write-wins, at the position of the first occurrence.
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Build a [`Record`] from `name => value` pairs; values go through `Value::from`.
///
/// ```rust
/// use rule_pipeline::record;
/// use rule_pipeline::types::Value;
///
/// let r = record! { "age" => "19", "active" => true };
/// assert_eq!(r.get("age"), &Value::String("19".to_string()));
/// assert_eq!(r.get("missing"), &Value::Absent);
/// ```
#[macro_export]
macro_rules! record {
    () => { $crate::types::Record::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut r = $crate::types::Record::new();
        $( r.insert($name, $crate::types::Value::from($value)); )+
        r
    }};
}
