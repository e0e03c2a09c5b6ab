//! Attribute values as reported by the instrumentation registry

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single scalar attribute value.
///
/// The registry reports either numeric counters or text labels. The
/// distinction matters to the report renderer, which single-quotes text
/// values and renders numbers bare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Numeric attribute (counts, ports, durations)
    Int(i64),
    /// Text attribute (host names, namespaces, thread names)
    Text(String),
}

impl ScalarValue {
    /// Get the numeric value, if this is a numeric attribute
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(n) => Some(*n),
            ScalarValue::Text(_) => None,
        }
    }

    /// Get the text value, if this is a text attribute
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Int(_) => None,
            ScalarValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Int(n) => write!(f, "{}", n),
            ScalarValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(n: i64) -> Self {
        ScalarValue::Int(n)
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::Text(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::Text(s)
    }
}

/// One nested record returned for a record-array attribute.
///
/// Fields are looked up by name; a field the registry did not report is
/// simply not present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, ScalarValue>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by name
    pub fn get(&self, field: &str) -> Option<&ScalarValue> {
        self.fields.get(field)
    }

    /// Builder-style field insertion
    pub fn with(mut self, field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }
}

/// An attribute as fetched from the registry: either a scalar or an
/// ordered array of records.
///
/// The two shapes share one wire representation; the collector dispatches
/// on the known key rather than inspecting the payload at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    Scalar(ScalarValue),
    RecordArray(Vec<Record>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_display_is_unquoted() {
        assert_eq!(ScalarValue::Int(42).to_string(), "42");
        assert_eq!(ScalarValue::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_scalar_untagged_serialization() {
        let n: ScalarValue = serde_json::from_str("27017").unwrap();
        assert_eq!(n, ScalarValue::Int(27017));

        let s: ScalarValue = serde_json::from_str("\"db.coll\"").unwrap();
        assert_eq!(s, ScalarValue::from("db.coll"));
    }

    #[test]
    fn test_record_field_lookup() {
        let record = Record::new().with("opCode", "query").with("localPort", 54000);

        assert_eq!(record.get("opCode"), Some(&ScalarValue::from("query")));
        assert_eq!(record.get("localPort"), Some(&ScalarValue::Int(54000)));
        assert_eq!(record.get("namespace"), None);
    }

    #[test]
    fn test_attribute_untagged_round_trip() {
        let scalar = Attribute::Scalar(ScalarValue::Int(10));
        let json = serde_json::to_string(&scalar).unwrap();
        assert_eq!(json, "10");
        assert_eq!(serde_json::from_str::<Attribute>(&json).unwrap(), scalar);

        let records = Attribute::RecordArray(vec![Record::new().with("threadName", "t1")]);
        let json = serde_json::to_string(&records).unwrap();
        assert_eq!(serde_json::from_str::<Attribute>(&json).unwrap(), records);
    }
}
