//! Place record model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One place listing: a flat mapping of field name to JSON value.
///
/// Key order is preserved as loaded. A field that is absent, `null`, an empty
/// string, an empty array or an empty object is "not filled".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Set a field, returning the record for chaining.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Raw value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Whether the key exists with a non-null value.
    pub fn is_present(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !v.is_null())
    }

    /// Whether the field carries a usable value.
    pub fn is_filled(&self, field: &str) -> bool {
        self.get(field).is_some_and(is_filled_value)
    }

    /// String value of a field, if it is a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Numeric value of a field, if it is a number.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    /// Filled value rendered as text: strings verbatim, other values as JSON.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).filter(|v| is_filled_value(v)).map(value_text)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Filled means anything but null, "", [] and {}.
pub fn is_filled_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Text form used when a value is echoed in a report.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
