//! String content validators: `match` and `email`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{failure, type_failure};
use crate::error::ValidationError;
use crate::rule::RuleOptions;
use crate::value::Record;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap()
});

// ============================================================================
// REGEX VALIDATOR
// ============================================================================

/// String must match the `pattern` option; `not` inverts the check.
///
/// A missing or uncompilable pattern is reported as an `invalid_option`
/// error on the attribute.
pub fn matches(
    record: &mut Record,
    attribute: &str,
    options: Option<&RuleOptions>,
) -> Result<(), ValidationError> {
    let Some(pattern) = options.and_then(|o| o.get_str("pattern")) else {
        return Err(ValidationError::new("invalid_option", "match requires a `pattern` option")
            .with_field(attribute.to_owned()));
    };
    let regex = Regex::new(pattern).map_err(|error| {
        ValidationError::new("invalid_option", format!("invalid pattern: {error}"))
            .with_field(attribute.to_owned())
            .with_param("pattern", pattern.to_owned())
    })?;

    let text = string_value(record, attribute, options)?;
    let Some(text) = text else {
        return Ok(());
    };

    let invert = options.is_some_and(|o| o.flag("not"));
    if regex.is_match(text) != invert {
        Ok(())
    } else {
        Err(failure(options, attribute, "match", format!("{attribute} is invalid."))
            .with_param("pattern", pattern.to_owned()))
    }
}

// ============================================================================
// EMAIL VALIDATOR
// ============================================================================

/// String must look like an e-mail address.
pub fn email(
    record: &mut Record,
    attribute: &str,
    options: Option<&RuleOptions>,
) -> Result<(), ValidationError> {
    let Some(text) = string_value(record, attribute, options)? else {
        return Ok(());
    };

    if EMAIL_REGEX.is_match(text) {
        Ok(())
    } else {
        Err(failure(
            options,
            attribute,
            "email",
            format!("{attribute} is not a valid email address."),
        ))
    }
}

fn string_value<'r>(
    record: &'r Record,
    attribute: &str,
    options: Option<&RuleOptions>,
) -> Result<Option<&'r str>, ValidationError> {
    match record.get(attribute) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(other) => Err(type_failure(
            options,
            attribute,
            "string",
            format!("{attribute} must be a string."),
            other,
        )),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::test_support::{options, run};
    use serde_json::json;

    #[test]
    fn test_match_pattern() {
        let opts = options(&[("pattern", json!(r"^[a-z]+$"))]);
        assert!(run(matches, json!("login"), Some(&opts)).1.is_ok());

        let err = run(matches, json!("Login1"), Some(&opts)).1.unwrap_err();
        assert_eq!(err.code, "match");
        assert_eq!(err.param("pattern"), Some(r"^[a-z]+$"));
    }

    #[test]
    fn test_match_inverted() {
        let opts = options(&[("pattern", json!(r"\d")), ("not", json!(true))]);
        assert!(run(matches, json!("abc"), Some(&opts)).1.is_ok());
        assert!(run(matches, json!("a1"), Some(&opts)).1.is_err());
    }

    #[test]
    fn test_match_bad_options() {
        assert_eq!(run(matches, json!("x"), None).1.unwrap_err().code, "invalid_option");

        let opts = options(&[("pattern", json!("("))]);
        assert_eq!(run(matches, json!("x"), Some(&opts)).1.unwrap_err().code, "invalid_option");
    }

    #[test]
    fn test_match_non_string() {
        let opts = options(&[("pattern", json!(".*"))]);
        assert_eq!(run(matches, json!(5), Some(&opts)).1.unwrap_err().code, "string");
    }

    #[test]
    fn test_email() {
        assert!(run(email, json!("user@example.com"), None).1.is_ok());
        assert!(run(email, json!("first.last+tag@sub.example.org"), None).1.is_ok());

        for bad in ["invalid", "@example.com", "user@", "user@-example.com"] {
            let err = run(email, json!(bad), None).1.unwrap_err();
            assert_eq!(err.message, "attr is not a valid email address.");
        }
    }
}
