//! Field-level orchestration.
//!
//! [`FieldProcessor::process`] reads one field from a [`HostRecord`],
//! optionally decodes it from JSON, validates the record (or every record in
//! `each` mode) and then either writes the rebuilt value back or attaches
//! every collected message to the field. The host is touched at most once
//! per call and never receives both a value and errors.

use std::sync::Arc;

use serde_json::Value;

use crate::codec::{JsonCodec, SerdeJsonCodec};
use crate::config::FieldConfig;
use crate::error::{ProcessError, ValidationErrors};
use crate::host::HostRecord;
use crate::record::{RecordValidator, ValidationOutcome};
use crate::registry::ValidatorRegistry;
use crate::value::{Record, Shape, classify, value_type_name};

/// What `process` did to the host record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// The rebuilt value (JSON-encoded when configured) was written.
    Written(Value),
    /// Validation failed; these per-item errors were attached to the field.
    ///
    /// Items that passed are not listed.
    Rejected(Vec<ValidationErrors>),
}

impl FieldOutcome {
    /// Whether the value was written.
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }

    /// Total number of messages attached to the host.
    pub fn error_count(&self) -> usize {
        match self {
            Self::Written(_) => 0,
            Self::Rejected(items) => items.iter().map(ValidationErrors::len).sum(),
        }
    }
}

/// Validates an array-shaped field of a host record.
///
/// # Examples
///
/// ```
/// use sift_validator::{FieldConfig, FieldProcessor, HostRecord, Model, RuleSpec};
/// use serde_json::json;
///
/// let processor = FieldProcessor::new(
///     FieldConfig::new()
///         .each(true)
///         .rule(RuleSpec::new(["id", "login"], "required")),
/// );
///
/// let mut model = Model::new().with("users", json!([{"id": 1, "login": "ann"}]));
/// let outcome = processor.process(&mut model, "users").unwrap();
///
/// assert!(outcome.is_written());
/// assert!(!model.has_errors());
/// ```
#[derive(Clone)]
pub struct FieldProcessor {
    config: FieldConfig,
    registry: Arc<ValidatorRegistry>,
    codec: Arc<dyn JsonCodec>,
}

impl FieldProcessor {
    /// Creates a processor with the built-in registry and `serde_json` codec.
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            registry: Arc::new(ValidatorRegistry::new()),
            codec: Arc::new(SerdeJsonCodec),
        }
    }

    /// Uses a custom validator registry.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_registry(mut self, registry: impl Into<Arc<ValidatorRegistry>>) -> Self {
        self.registry = registry.into();
        self
    }

    /// Uses a custom JSON codec.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_codec(mut self, codec: impl JsonCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// The configuration this processor applies.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// The registry validator kinds are resolved against.
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Validates `field` of `host` and writes back the value or the errors.
    ///
    /// Structural problems (not an array, list without `each`, unknown
    /// validator kind) are returned as `Err` and leave the host untouched.
    #[tracing::instrument(
        level = "debug",
        skip(self, host),
        fields(each = self.config.each, json = %self.config.json)
    )]
    pub fn process<H>(&self, host: &mut H, field: &str) -> Result<FieldOutcome, ProcessError>
    where
        H: HostRecord + ?Sized,
    {
        let validator = RecordValidator::new(&self.registry);
        validator.check_rules(&self.config.rules)?;

        let mut raw = host.get(field).cloned().unwrap_or(Value::Null);

        if self.config.json.decodes() {
            raw = self.codec.decode(&raw);
        }

        let mut failures = Vec::new();

        let rebuilt = match classify(&raw) {
            Shape::Scalar => {
                return Err(ProcessError::InvalidInput {
                    field: field.to_owned(),
                    actual: value_type_name(&raw),
                });
            }
            _ if self.config.each => {
                let mut records = Vec::new();
                for (index, item) in into_items(raw).into_iter().enumerate() {
                    let Value::Object(record) = item else {
                        return Err(ProcessError::InvalidItem {
                            field: field.to_owned(),
                            index,
                            actual: value_type_name(&item),
                        });
                    };
                    match validator.validate(record, &self.config.rules)? {
                        ValidationOutcome::Success(record) => records.push(Value::Object(record)),
                        ValidationOutcome::Failure(errors) => {
                            tracing::debug!(index, errors = errors.len(), "item failed validation");
                            failures.push(errors);
                        }
                    }
                }
                Value::Array(records)
            }
            Shape::List => {
                return Err(ProcessError::AmbiguousShape {
                    field: field.to_owned(),
                });
            }
            Shape::Record => {
                // An empty array is validated as an empty record.
                let (record, from_array) = match raw {
                    Value::Object(record) => (record, false),
                    _ => (Record::new(), true),
                };
                match validator.validate(record, &self.config.rules)? {
                    // Nothing was added, so keep the array type.
                    ValidationOutcome::Success(record) if from_array && record.is_empty() => {
                        Value::Array(Vec::new())
                    }
                    ValidationOutcome::Success(record) => Value::Object(record),
                    ValidationOutcome::Failure(errors) => {
                        failures.push(errors);
                        Value::Null
                    }
                }
            }
        };

        if !failures.is_empty() {
            for errors in &failures {
                for (_, message) in errors.messages() {
                    host.add_error(field, message.to_owned());
                }
            }
            tracing::debug!(items = failures.len(), "field rejected");
            return Ok(FieldOutcome::Rejected(failures));
        }

        let value = if self.config.json.encodes() {
            let encoded = self
                .codec
                .encode(&rebuilt)
                .map_err(|source| ProcessError::Encode {
                    field: field.to_owned(),
                    source,
                })?;
            Value::String(encoded)
        } else {
            rebuilt
        };

        host.set(field, value.clone());
        tracing::debug!("field written");
        Ok(FieldOutcome::Written(value))
    }
}

impl std::fmt::Debug for FieldProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldProcessor")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Elements of an `each` field: array items, or object values in key order.
fn into_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, item)| item).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Model;
    use crate::rule::RuleSpec;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Host that records every call, to check the write-once contract.
    #[derive(Default)]
    struct RecordingHost {
        value: Option<Value>,
        sets: Vec<(String, Value)>,
        errors: Vec<(String, String)>,
    }

    impl HostRecord for RecordingHost {
        fn get(&self, _field: &str) -> Option<&Value> {
            self.value.as_ref()
        }

        fn set(&mut self, field: &str, value: Value) {
            self.sets.push((field.to_owned(), value));
        }

        fn add_error(&mut self, field: &str, message: String) {
            self.errors.push((field.to_owned(), message));
        }
    }

    fn host(value: Value) -> RecordingHost {
        RecordingHost {
            value: Some(value),
            ..RecordingHost::default()
        }
    }

    #[test]
    fn success_sets_once_and_adds_no_errors() {
        let processor = FieldProcessor::new(FieldConfig::new().rule(RuleSpec::new("id", "int")));
        let mut host = host(json!({"id": 1}));

        let outcome = processor.process(&mut host, "data").unwrap();

        assert_eq!(outcome, FieldOutcome::Written(json!({"id": 1})));
        assert_eq!(host.sets, vec![("data".to_owned(), json!({"id": 1}))]);
        assert!(host.errors.is_empty());
    }

    #[test]
    fn failure_adds_errors_and_never_sets() {
        let processor = FieldProcessor::new(
            FieldConfig::new()
                .each(true)
                .rule(RuleSpec::new(["id", "title"], "required")),
        );
        let mut host = host(json!([{"title": "A"}, {"id": 2}, {"id": 3, "title": "C"}]));

        let outcome = processor.process(&mut host, "posts").unwrap();

        assert!(host.sets.is_empty());
        assert_eq!(
            host.errors,
            vec![
                ("posts".to_owned(), "id cannot be blank.".to_owned()),
                ("posts".to_owned(), "title cannot be blank.".to_owned()),
            ]
        );
        assert_eq!(outcome.error_count(), 2);
    }

    #[test]
    fn missing_field_is_invalid_input() {
        let processor = FieldProcessor::new(FieldConfig::new());
        let mut host = RecordingHost::default();

        let err = processor.process(&mut host, "data").unwrap_err();
        assert!(matches!(err, ProcessError::InvalidInput { actual: "null", .. }));
        assert!(host.sets.is_empty() && host.errors.is_empty());
    }

    #[test]
    fn structural_errors_leave_host_untouched() {
        let processor = FieldProcessor::new(FieldConfig::new());
        let mut host = host(json!([{"id": 1}]));

        let err = processor.process(&mut host, "data").unwrap_err();
        assert!(matches!(err, ProcessError::AmbiguousShape { .. }));
        assert!(host.sets.is_empty() && host.errors.is_empty());
    }

    #[test]
    fn each_rejects_scalar_items() {
        let processor = FieldProcessor::new(FieldConfig::new().each(true));
        let mut host = host(json!([{"id": 1}, 5]));

        let err = processor.process(&mut host, "data").unwrap_err();
        assert!(matches!(
            err,
            ProcessError::InvalidItem { index: 1, actual: "number", .. }
        ));
        assert!(host.sets.is_empty());
    }

    #[test]
    fn each_over_keyed_object_collects_values_in_order() {
        let processor = FieldProcessor::new(FieldConfig::new().each(true));
        let mut model = Model::new().with("items", json!({"7": {"id": 7}, "3": {"id": 3}}));

        processor.process(&mut model, "items").unwrap();
        assert_eq!(model.get("items"), Some(&json!([{"id": 7}, {"id": 3}])));
    }

    #[test]
    fn empty_array_is_an_empty_record() {
        let processor = FieldProcessor::new(
            FieldConfig::new()
                .rule(RuleSpec::new("content", "default").with_option("value", "none")),
        );
        let mut model = Model::new().with("data", json!([]));

        processor.process(&mut model, "data").unwrap();
        assert_eq!(model.get("data"), Some(&json!({"content": "none"})));

        let passthrough = FieldProcessor::new(FieldConfig::new());
        let mut model = Model::new().with("data", json!([]));
        passthrough.process(&mut model, "data").unwrap();
        assert_eq!(model.get("data"), Some(&json!([])));
    }

    #[test]
    fn empty_array_survives_json_both() {
        let processor =
            FieldProcessor::new(FieldConfig::new().json(crate::config::JsonMode::Both));
        let mut model = Model::new().with("data", json!("[]"));

        processor.process(&mut model, "data").unwrap();
        assert_eq!(model.get("data"), Some(&json!("[]")));
    }

    #[test]
    fn unknown_kind_fails_even_without_items() {
        let processor = FieldProcessor::new(
            FieldConfig::new()
                .each(true)
                .rule(RuleSpec::new("id", "uuid")),
        );

        for input in [json!([]), json!([{"id": 1}])] {
            let mut host = host(input);
            let err = processor.process(&mut host, "data").unwrap_err();
            assert_eq!(err.code(), "SIFT_UNKNOWN_VALIDATOR");
            assert!(host.sets.is_empty() && host.errors.is_empty());
        }
    }

    #[test]
    fn encode_writes_json_string() {
        let processor = FieldProcessor::new(
            FieldConfig::new()
                .json(crate::config::JsonMode::Encode)
                .rule(RuleSpec::new("title", "trim")),
        );
        let mut model = Model::new().with("data", json!({"title": " T "}));

        processor.process(&mut model, "data").unwrap();
        assert_eq!(model.get("data"), Some(&json!(r#"{"title":"T"}"#)));
    }

    #[test]
    fn decode_failure_surfaces_as_invalid_input() {
        let processor =
            FieldProcessor::new(FieldConfig::new().json(crate::config::JsonMode::Decode));
        let mut model = Model::new().with("data", json!("{broken"));

        let err = processor.process(&mut model, "data").unwrap_err();
        assert!(matches!(err, ProcessError::InvalidInput { actual: "null", .. }));
        assert_eq!(model.get("data"), Some(&json!("{broken")));
    }

    #[test]
    fn processor_is_reusable_across_fields() {
        let processor = FieldProcessor::new(
            FieldConfig::new().rule(RuleSpec::new("id", "required")),
        );
        let mut model = Model::new()
            .with("bad", json!({"name": "x"}))
            .with("good", json!({"id": 1}));

        let first = processor.process(&mut model, "bad").unwrap();
        let second = processor.process(&mut model, "good").unwrap();

        assert_eq!(first.error_count(), 1);
        assert!(second.is_written());
        assert_eq!(model.errors_for("bad"), ["id cannot be blank."]);
        assert!(model.errors_for("good").is_empty());
    }
}
