//! Boolean validator

use serde_json::Value;

use super::type_failure;
use crate::error::ValidationError;
use crate::rule::RuleOptions;
use crate::value::Record;

/// Value must be boolean-like: `true`/`false`, `1`/`0` or `"1"`/`"0"`.
///
/// With the `strict` option only JSON booleans pass.
pub fn boolean(
    record: &mut Record,
    attribute: &str,
    options: Option<&RuleOptions>,
) -> Result<(), ValidationError> {
    let Some(value) = record.get(attribute) else {
        return Ok(());
    };

    let strict = options.is_some_and(|o| o.flag("strict"));
    let accepted = match value {
        Value::Bool(_) => true,
        Value::Number(n) if !strict => matches!(n.as_i64(), Some(0 | 1)),
        Value::String(s) if !strict => matches!(s.as_str(), "0" | "1"),
        _ => false,
    };

    if accepted {
        Ok(())
    } else {
        Err(type_failure(
            options,
            attribute,
            "boolean",
            format!("{attribute} must be either \"1\" or \"0\"."),
            value,
        ))
    }
}
