//! Property-based tests for sift-validator.

use proptest::prelude::*;
use serde_json::{Map, Value};
use sift_validator::prelude::*;

fn flat_record() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(
        "[a-z]{1,6}",
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            "[ a-zA-Z0-9]{0,12}".prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            Just(Value::Null),
        ],
        1..6,
    )
    .prop_map(|entries| entries.into_iter().collect())
}

// ============================================================================
// IDEMPOTENCY: a written value validates to itself
// ============================================================================

proptest! {
    #[test]
    fn trim_and_default_are_idempotent(records in prop::collection::vec(flat_record(), 1..5)) {
        let processor = FieldProcessor::new(
            FieldConfig::new()
                .each(true)
                .rule(RuleSpec::new("title", "trim"))
                .rule(RuleSpec::new("content", "default").with_option("value", "none")),
        );
        let input = Value::Array(records.into_iter().map(Value::Object).collect());

        let mut first = Model::new().with("items", input);
        processor.process(&mut first, "items").unwrap();
        let once = first.get("items").cloned();

        let mut second = Model::new().with("items", once.clone().unwrap());
        processor.process(&mut second, "items").unwrap();

        prop_assert_eq!(once.as_ref(), second.get("items"));
    }

    #[test]
    fn empty_rules_pass_lists_through(records in prop::collection::vec(flat_record(), 1..5)) {
        let processor = FieldProcessor::new(FieldConfig::new().each(true));
        let input = Value::Array(records.into_iter().map(Value::Object).collect());

        let mut model = Model::new().with("items", input.clone());
        processor.process(&mut model, "items").unwrap();

        prop_assert_eq!(model.get("items"), Some(&input));
        prop_assert!(!model.has_errors());
    }
}

// ============================================================================
// JSON ENVELOPE: Both mode round-trips the structure
// ============================================================================

proptest! {
    #[test]
    fn both_mode_roundtrips_structure(record in flat_record()) {
        let processor = FieldProcessor::new(FieldConfig::new().json(JsonMode::Both));
        let encoded = serde_json::to_string(&record).unwrap();

        let mut model = Model::new().with("data", encoded);
        let outcome = processor.process(&mut model, "data");

        // Records whose first key is "0" are never generated, so this is a record.
        prop_assert!(outcome.is_ok());
        let written = model.get("data").and_then(Value::as_str).unwrap();
        let decoded: Value = serde_json::from_str(written).unwrap();
        prop_assert_eq!(decoded, Value::Object(record));
    }
}

// ============================================================================
// SHAPE: lists need `each`
// ============================================================================

proptest! {
    #[test]
    fn non_empty_list_without_each_is_rejected(records in prop::collection::vec(flat_record(), 1..5)) {
        let processor = FieldProcessor::new(FieldConfig::new());
        let input = Value::Array(records.into_iter().map(Value::Object).collect());

        let mut model = Model::new().with("items", input.clone());
        let err = processor.process(&mut model, "items").unwrap_err();

        prop_assert!(matches!(err, ProcessError::AmbiguousShape { .. }), "expected AmbiguousShape, got {:?}", err);
        prop_assert_eq!(model.get("items"), Some(&input));
    }

    #[test]
    fn required_failures_never_write(records in prop::collection::vec(flat_record(), 1..5)) {
        let processor = FieldProcessor::new(
            FieldConfig::new().each(true).rule(RuleSpec::new("zzzzzzz", "required")),
        );
        let input = Value::Array(records.into_iter().map(Value::Object).collect());
        let count = match &input {
            Value::Array(items) => items.len(),
            _ => 0,
        };

        let mut model = Model::new().with("items", input.clone());
        processor.process(&mut model, "items").unwrap();

        prop_assert_eq!(model.get("items"), Some(&input));
        prop_assert_eq!(model.errors_for("items").len(), count);
        prop_assert_eq!(model.errors_for("items")[0].as_str(), "zzzzzzz cannot be blank.");
    }
}
