//! `in` validator: value must be one of a fixed list.

use serde_json::Value;

use super::failure;
use crate::error::ValidationError;
use crate::rule::RuleOptions;
use crate::value::Record;

/// Value must appear in the `range` option.
///
/// Comparison is loose by default: scalars match when their textual forms
/// are equal, so `"1"` matches `1`. With `strict`, JSON values must be equal.
/// An attribute holding an array passes when every element is in range.
pub fn in_range(
    record: &mut Record,
    attribute: &str,
    options: Option<&RuleOptions>,
) -> Result<(), ValidationError> {
    let Some(value) = record.get(attribute) else {
        return Ok(());
    };

    let range = options
        .and_then(|o| o.get("range"))
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice);
    let strict = options.is_some_and(|o| o.flag("strict"));

    let contains = |candidate: &Value| {
        range.iter().any(|allowed| {
            if strict {
                allowed == candidate
            } else {
                loose_eq(allowed, candidate)
            }
        })
    };

    let ok = match value {
        Value::Array(items) => items.iter().all(contains),
        other => contains(other),
    };

    if ok {
        Ok(())
    } else {
        Err(failure(options, attribute, "in", format!("{attribute} is invalid.")))
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    match (scalar_text(a), scalar_text(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_owned()),
        Value::Bool(false) => Some("0".to_owned()),
        _ => None,
    }
}
