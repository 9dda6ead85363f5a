//=========================================================================
// Data Value
//=========================================================================
//
// Loosely typed payload used for object data, scene start data and the
// global registry.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

//=== DataValue ===========================================================

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<DataValue>),
    Map(BTreeMap<String, DataValue>),
}

impl DataValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DataValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Looks up `key` when this value is a map.
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        match self {
            DataValue::Map(map) => map.get(key),
            _ => None,
        }
    }
}

//--- Conversions ---------------------------------------------------------

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Number(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Number(f64::from(value))
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Text(value)
    }
}

impl<V: Into<DataValue>> From<Vec<V>> for DataValue {
    fn from(values: Vec<V>) -> Self {
        DataValue::List(values.into_iter().map(Into::into).collect())
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        assert_eq!(DataValue::from(true).as_bool(), Some(true));
        assert_eq!(DataValue::from(3).as_number(), Some(3.0));
        assert_eq!(DataValue::from("hi").as_text(), Some("hi"));
        assert_eq!(DataValue::from("hi").as_number(), None);
    }

    #[test]
    fn untagged_values_read_from_ron() {
        let value: DataValue = ron::from_str(r#"{"level": 3.0, "name": "cave"}"#)
            .expect("valid ron map");
        assert_eq!(value.get("level"), Some(&DataValue::Number(3.0)));
        assert_eq!(value.get("name").and_then(DataValue::as_text), Some("cave"));
    }
}
