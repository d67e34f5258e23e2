//! Flat attribute records used for desired and tracked state.
//!
//! A [`Record`] maps attribute names to scalar values in declaration order.
//! An attribute that is not set is simply absent; explicit JSON `null` values
//! are dropped while deserializing so that "unset" has exactly one spelling.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ProviderError, Violation};
use crate::value::AttrValue;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: IndexMap<String, AttrValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Inserts `value` when it is `Some`, otherwise removes the attribute.
    pub fn set_opt<V: Into<AttrValue>>(&mut self, name: &str, value: Option<V>) {
        match value {
            Some(v) => {
                self.values.insert(name.to_string(), v.into());
            }
            None => {
                self.values.shift_remove(name);
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.values.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(AttrValue::as_i64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(AttrValue::as_bool)
    }

    /// Reads a mandatory int64 attribute, failing with a validation error
    /// attributed to `entity_type` when it is missing or mistyped.
    pub fn require_i64(&self, entity_type: &str, name: &str) -> Result<i64, ProviderError> {
        self.get_i64(name)
            .ok_or_else(|| missing(entity_type, name, "int64"))
    }

    /// Reads a mandatory string attribute.
    pub fn require_str(&self, entity_type: &str, name: &str) -> Result<&str, ProviderError> {
        self.get_str(name)
            .ok_or_else(|| missing(entity_type, name, "string"))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn missing(entity_type: &str, name: &str, expected: &str) -> ProviderError {
    ProviderError::validation(
        entity_type,
        vec![Violation::attribute(
            name,
            "Missing attribute",
            format!("`{name}` must be set to a {expected} value"),
        )],
    )
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Option<AttrValue>>::deserialize(deserializer)?;
        let values = raw
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();
        Ok(Self { values })
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nulls_are_unset() {
        let record: Record = serde_json::from_value(json!({
            "name": "Eng",
            "privacy": null,
            "org_id": 42
        }))
        .unwrap();

        assert_eq!(record.len(), 2);
        assert!(!record.contains("privacy"));
        assert_eq!(record.get_i64("org_id"), Some(42));
    }

    #[test]
    fn test_serialization_preserves_order() {
        let record = Record::new()
            .with("space_id", 7)
            .with("name", "Eng")
            .with("auto_join", false);
        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"space_id":7,"name":"Eng","auto_join":false}"#);
    }

    #[test]
    fn test_set_opt_removes_on_none() {
        let mut record = Record::new().with("icon", "12.png");
        record.set_opt::<String>("icon", None);
        assert!(record.is_empty());

        record.set_opt("icon", Some("3.png"));
        assert_eq!(record.get_str("icon"), Some("3.png"));
    }

    #[test]
    fn test_require_reports_attribute() {
        let record = Record::new().with("space_id", "not-a-number");
        let err = record.require_i64("podio_space", "space_id").unwrap_err();
        assert!(err.to_string().contains("space_id"));
        assert_eq!(err.violations().len(), 1);
    }
}
