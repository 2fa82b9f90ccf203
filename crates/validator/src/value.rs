//! Helpers for working with `serde_json::Value` records.

use serde_json::{Map, Value};

/// One ad-hoc record: attribute name to value, in insertion order.
pub type Record = Map<String, Value>;

/// Get the type name of a Value for error messages
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check if a value counts as empty: null, `""`, `[]` or `{}`.
///
/// Validators that skip empty values and the `required`/`default` builtins
/// all share this definition.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// How an array-like field value is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Keyed record (or empty container).
    Record,
    /// Sequential list: the first positional key is index 0.
    List,
    /// Not an array-like value at all.
    Scalar,
}

/// Classifies a field value by its first positional key.
///
/// A non-empty array starts at index 0 and is a list. An object is a list
/// only when its first key is literally `"0"`, which mirrors how
/// integer-keyed maps decode; a keyed record whose first key is `"0"` is
/// therefore misclassified. Empty containers classify as records.
pub fn classify(value: &Value) -> Shape {
    match value {
        Value::Array(items) if items.is_empty() => Shape::Record,
        Value::Array(_) => Shape::List,
        Value::Object(map) => match map.keys().next() {
            Some(first) if first == "0" => Shape::List,
            _ => Shape::Record,
        },
        _ => Shape::Scalar,
    }
}

/// Extract i64 from a value, accepting integer-looking strings.
///
/// Whole-valued floats such as `1.0` count as integers.
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let trimmed = s.trim();
            let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            trimmed.trim_start_matches('+').parse().ok()
        }
        _ => None,
    }
}

/// Extract f64 from a value, accepting numeric strings.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            // `f64::from_str` also accepts "inf" / "NaN"; numeric strings may not.
            if trimmed.is_empty()
                || !trimmed
                    .bytes()
                    .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
            {
                return None;
            }
            trimmed.parse().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"id": 1}), Shape::Record)]
    #[case(json!({}), Shape::Record)]
    #[case(json!([]), Shape::Record)]
    #[case(json!([{"id": 1}]), Shape::List)]
    #[case(json!([1, 2]), Shape::List)]
    #[case(json!({"0": {"id": 1}, "1": {"id": 2}}), Shape::List)]
    #[case(json!({"1": {"id": 1}, "0": {"id": 2}}), Shape::Record)]
    #[case(json!("text"), Shape::Scalar)]
    #[case(json!(null), Shape::Scalar)]
    #[case(json!(42), Shape::Scalar)]
    fn classify_by_first_key(#[case] value: Value, #[case] expected: Shape) {
        assert_eq!(classify(&value), expected);
    }

    #[rstest]
    #[case(json!(null), true)]
    #[case(json!(""), true)]
    #[case(json!([]), true)]
    #[case(json!({}), true)]
    #[case(json!(" "), false)]
    #[case(json!(0), false)]
    #[case(json!(false), false)]
    fn empty_values(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_empty_value(&value), expected);
    }

    #[rstest]
    #[case(json!(12), Some(12))]
    #[case(json!(" -7 "), Some(-7))]
    #[case(json!("+3"), Some(3))]
    #[case(json!("1.5"), None)]
    #[case(json!(1.5), None)]
    #[case(json!("-"), None)]
    #[case(json!(true), None)]
    fn integer_extraction(#[case] value: Value, #[case] expected: Option<i64>) {
        assert_eq!(as_integer(&value), expected);
    }

    #[test]
    fn whole_floats_are_integers() {
        assert_eq!(as_integer(&json!(1.0)), Some(1));
        assert_eq!(as_integer(&json!(-3.0)), Some(-3));
        assert_eq!(as_integer(&json!(1.5)), None);
        assert_eq!(as_integer(&json!(1e300)), None);
        assert_eq!(as_integer(&json!("1.0")), None);
    }

    #[test]
    fn number_extraction_rejects_words() {
        assert_eq!(as_number(&json!("2.5")), Some(2.5));
        assert_eq!(as_number(&json!("1e3")), Some(1000.0));
        assert_eq!(as_number(&json!("inf")), None);
        assert_eq!(as_number(&json!("NaN")), None);
    }
}
