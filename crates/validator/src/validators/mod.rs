//! Built-in validators
//!
//! Every builtin is a plain function with the [`ValidatorFn`] signature and is
//! registered under one or more kinds by
//! [`ValidatorRegistry::new`](crate::registry::ValidatorRegistry::new).
//!
//! # Kinds
//!
//! - **Presence**: `required`, `default`, `safe`
//! - **Filters**: `trim`
//! - **Numeric**: `integer` / `int`, `number` / `double`
//! - **String**: `string`, `match`, `email`
//! - **Logical**: `boolean`, `in`
//!
//! All builtins accept a `message` option that replaces the default message;
//! `{attribute}` in it is replaced with the attribute name.
//!
//! [`ValidatorFn`]: crate::registry::ValidatorFn

pub mod boolean;
pub mod content;
pub mod filter;
pub mod number;
pub mod presence;
pub mod range;
pub mod text;

pub use boolean::boolean;
pub use content::{email, matches};
pub use filter::trim;
pub use number::{integer, number};
pub use presence::{default_value, required, safe};
pub use range::in_range;
pub use text::string;

use serde_json::Value;

use crate::error::ValidationError;
use crate::rule::RuleOptions;
use crate::value::value_type_name;

/// Builds the error for a failed check, honouring the `message` option.
pub(crate) fn failure(
    options: Option<&RuleOptions>,
    attribute: &str,
    code: &'static str,
    default_message: String,
) -> ValidationError {
    let message = options
        .and_then(|o| o.get_str("message"))
        .map_or(default_message, |template| {
            template.replace("{attribute}", attribute)
        });
    ValidationError::new(code, message).with_field(attribute.to_owned())
}

/// Like [`failure`] but records the offending value's type.
pub(crate) fn type_failure(
    options: Option<&RuleOptions>,
    attribute: &str,
    code: &'static str,
    default_message: String,
    actual: &Value,
) -> ValidationError {
    failure(options, attribute, code, default_message).with_param("actual", value_type_name(actual))
}

/// Reads a numeric option such as `min` or `max`.
pub(crate) fn numeric_option(options: Option<&RuleOptions>, key: &str) -> Option<f64> {
    options.and_then(|o| o.get(key)).and_then(Value::as_f64)
}

/// Formats a bound without a trailing `.0` for whole numbers.
pub(crate) fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}

/// Checks `min` / `max` options against an already-parsed number.
pub(crate) fn check_bounds(
    options: Option<&RuleOptions>,
    attribute: &str,
    value: f64,
) -> Result<(), ValidationError> {
    if let Some(min) = numeric_option(options, "min").filter(|min| value < *min) {
        return Err(failure(
            options,
            attribute,
            "too_small",
            format!("{attribute} must be no less than {}.", format_bound(min)),
        )
        .with_param("min", format_bound(min)));
    }
    if let Some(max) = numeric_option(options, "max").filter(|max| value > *max) {
        return Err(failure(
            options,
            attribute,
            "too_big",
            format!("{attribute} must be no greater than {}.", format_bound(max)),
        )
        .with_param("max", format_bound(max)));
    }
    Ok(())
}
