//! Filters rewrite the attribute in place and never fail.

use serde_json::Value;

use crate::error::ValidationError;
use crate::rule::RuleOptions;
use crate::value::Record;

/// Trims whitespace from both ends of a string attribute.
///
/// Non-string values, including null, are left untouched.
pub fn trim(
    record: &mut Record,
    attribute: &str,
    _options: Option<&RuleOptions>,
) -> Result<(), ValidationError> {
    if let Some(Value::String(text)) = record.get_mut(attribute) {
        let trimmed = text.trim();
        if trimmed.len() != text.len() {
            *text = trimmed.to_owned();
        }
    }
    Ok(())
}
