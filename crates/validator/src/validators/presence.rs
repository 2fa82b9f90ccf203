//! Presence validators: `required`, `default`, `safe`.
//!
//! These run on empty values, which is the point of them.

use serde_json::Value;

use super::failure;
use crate::error::ValidationError;
use crate::rule::RuleOptions;
use crate::value::{Record, is_empty_value};

/// Fails when the attribute is empty (null, `""`, `[]` or `{}`).
pub fn required(
    record: &mut Record,
    attribute: &str,
    options: Option<&RuleOptions>,
) -> Result<(), ValidationError> {
    match record.get(attribute) {
        Some(value) if !is_empty_value(value) => Ok(()),
        _ => Err(failure(
            options,
            attribute,
            "required",
            format!("{attribute} cannot be blank."),
        )),
    }
}

/// Replaces an empty attribute with the `value` option (null when unset).
pub fn default_value(
    record: &mut Record,
    attribute: &str,
    options: Option<&RuleOptions>,
) -> Result<(), ValidationError> {
    if record.get(attribute).is_none_or(is_empty_value) {
        let default = options
            .and_then(|o| o.get("value"))
            .cloned()
            .unwrap_or(Value::Null);
        record.insert(attribute.to_owned(), default);
    }
    Ok(())
}

/// Accepts anything; marks the attribute as known.
pub fn safe(
    _record: &mut Record,
    _attribute: &str,
    _options: Option<&RuleOptions>,
) -> Result<(), ValidationError> {
    Ok(())
}
