//! String validator.

use serde_json::Value;

use super::{failure, numeric_option, type_failure};
use crate::error::ValidationError;
use crate::rule::RuleOptions;
use crate::value::Record;

/// Value must be a string; `min`, `max` and `length` bound its character count.
pub fn string(
    record: &mut Record,
    attribute: &str,
    options: Option<&RuleOptions>,
) -> Result<(), ValidationError> {
    let text = match record.get(attribute) {
        Some(Value::String(text)) => text,
        Some(other) => {
            return Err(type_failure(
                options,
                attribute,
                "string",
                format!("{attribute} must be a string."),
                other,
            ));
        }
        None => return Ok(()),
    };

    let chars = text.chars().count();
    let limit = |key: &str| numeric_option(options, key).map(|n| n as usize);

    if let Some(length) = limit("length").filter(|length| chars != *length) {
        return Err(failure(
            options,
            attribute,
            "length",
            format!("{attribute} should contain {length} characters."),
        )
        .with_param("length", length.to_string())
        .with_param("actual", chars.to_string()));
    }
    if let Some(min) = limit("min").filter(|min| chars < *min) {
        return Err(failure(
            options,
            attribute,
            "too_short",
            format!("{attribute} should contain at least {min} characters."),
        )
        .with_param("min", min.to_string())
        .with_param("actual", chars.to_string()));
    }
    if let Some(max) = limit("max").filter(|max| chars > *max) {
        return Err(failure(
            options,
            attribute,
            "too_long",
            format!("{attribute} should contain at most {max} characters."),
        )
        .with_param("max", max.to_string())
        .with_param("actual", chars.to_string()));
    }

    Ok(())
}
