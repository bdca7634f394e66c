//! Record and dataset representation.
//!
//! Records are flat (or nested) key/value maps as produced by a loader. Keys are
//! kept sorted so that every walk over a record visits them in the same order.

use std::collections::BTreeMap;
use std::fmt;

/// A value in a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/missing value
    Null,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Nested record
    Map(Record),
    /// Sequence of values
    List(Vec<Value>),
}

/// A single record: field name to value.
pub type Record = BTreeMap<String, Value>;

impl Value {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for nested records and sequences.
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Map(_) | Value::List(_))
    }

    /// Returns the runtime type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Map(_) => "record",
            Value::List(_) => "list",
        }
    }

    /// Renders a scalar as a plain string for grouping and counting.
    ///
    /// Returns `None` for null and composite values.
    pub fn scalar_key(&self) -> Option<String> {
        match self {
            Value::Null | Value::Map(_) | Value::List(_) => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::String(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Map(_) | Value::List(_) => {
                write!(f, "{}", serde_json::Value::from(self))
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Map(m) => serde_json::Value::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A record together with its position in the source sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Position in the sequence returned by the loader
    pub index: usize,
    /// The record itself
    pub record: Record,
}

impl Row {
    /// Returns the value of `key`, treating a missing key as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.record.get(key)
    }

    /// Returns true if `key` is present and not null.
    pub fn has_value(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }
}

/// An ordered collection of records.
///
/// Row indices are assigned once, by position in the loaded sequence, and
/// survive filtering so failures can be traced back to the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    rows: Vec<Row>,
}

impl DataSet {
    /// Creates a new empty dataset.
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Creates a dataset, numbering records from zero.
    pub fn from_records(records: Vec<Record>) -> Self {
        records.into_iter().collect()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Appends a record with the next free index.
    pub fn push(&mut self, record: Record) {
        let index = self.rows.last().map_or(0, |r| r.index + 1);
        self.rows.push(Row { index, record });
    }

    /// Returns the rows whose `key` is present and not null.
    pub fn retain_with_value(&self, key: &str) -> DataSet {
        DataSet {
            rows: self.rows.iter().filter(|r| r.has_value(key)).cloned().collect(),
        }
    }
}

impl FromIterator<Record> for DataSet {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self {
            rows: iter
                .into_iter()
                .enumerate()
                .map(|(index, record)| Row { index, record })
                .collect(),
        }
    }
}
