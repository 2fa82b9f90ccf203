//! Host record contract.
//!
//! The processor never owns the record whose field it validates; it reads
//! the field, then either writes a new value or attaches errors through
//! [`HostRecord`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::Record;

/// Record that owns the field being validated.
pub trait HostRecord {
    /// Reads a field value; `None` when the field is not set.
    fn get(&self, field: &str) -> Option<&Value>;

    /// Replaces a field value.
    fn set(&mut self, field: &str, value: Value);

    /// Attaches an error message to a field.
    fn add_error(&mut self, field: &str, message: String);
}

/// Plain in-memory host: ordered attributes plus ordered per-field errors.
///
/// # Examples
///
/// ```
/// use sift_validator::{HostRecord, Model};
/// use serde_json::json;
///
/// let mut model = Model::from_value(json!({"users": []})).unwrap();
/// model.add_error("users", "users is invalid.".into());
///
/// assert!(model.has_errors());
/// assert_eq!(model.errors_for("users"), ["users is invalid."]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(flatten)]
    attributes: Record,
    #[serde(skip)]
    errors: IndexMap<String, Vec<String>>,
}

impl Model {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a model from a JSON object. Returns `None` for other values.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(attributes) => Some(Self::from(attributes)),
            _ => None,
        }
    }

    /// Sets an attribute, consuming and returning the model.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }

    /// All attributes.
    pub fn attributes(&self) -> &Record {
        &self.attributes
    }

    /// All errors, keyed by field, in the order fields first failed.
    pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
        &self.errors
    }

    /// Errors for one field.
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// Whether any field has errors.
    pub fn has_errors(&self) -> bool {
        self.errors.values().any(|messages| !messages.is_empty())
    }

    /// Drops all attached errors.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Converts the attributes into a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.attributes)
    }
}

impl From<Record> for Model {
    fn from(attributes: Record) -> Self {
        Self {
            attributes,
            errors: IndexMap::new(),
        }
    }
}

impl HostRecord for Model {
    fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    fn set(&mut self, field: &str, value: Value) {
        self.attributes.insert(field.to_owned(), value);
    }

    fn add_error(&mut self, field: &str, message: String) {
        self.errors.entry(field.to_owned()).or_default().push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn errors_accumulate_per_field_in_order() {
        let mut model = Model::new();
        model.add_error("b", "first".into());
        model.add_error("a", "second".into());
        model.add_error("b", "third".into());

        let fields: Vec<_> = model.errors().keys().cloned().collect();
        assert_eq!(fields, vec!["b".to_owned(), "a".to_owned()]);
        assert_eq!(model.errors_for("b"), ["first", "third"]);
        assert!(model.errors_for("missing").is_empty());
    }

    #[test]
    fn set_replaces_value() {
        let mut model = Model::new().with("tags", json!(["a"]));
        model.set("tags", json!(["b"]));
        assert_eq!(model.get("tags"), Some(&json!(["b"])));
        assert!(!model.has_errors());
    }

    #[test]
    fn serde_uses_flat_attributes() {
        let model: Model = serde_json::from_value(json!({"id": 1, "items": []})).unwrap();
        assert_eq!(model.get("id"), Some(&json!(1)));
        assert_eq!(serde_json::to_value(&model).unwrap(), json!({"id": 1, "items": []}));
    }

    #[test]
    fn from_value_requires_object() {
        assert!(Model::from_value(json!([1, 2])).is_none());
        assert!(Model::from_value(json!({})).is_some());
    }
}
