//! Numeric validators: `integer` and `number`.
//!
//! Both accept JSON numbers as well as numeric strings (surrounding
//! whitespace allowed) and honour `min` / `max` options. The value is not
//! converted; a string stays a string.

use super::{check_bounds, type_failure};
use crate::error::ValidationError;
use crate::rule::RuleOptions;
use crate::value::{Record, as_integer, as_number};

/// Value must be an integer.
pub fn integer(
    record: &mut Record,
    attribute: &str,
    options: Option<&RuleOptions>,
) -> Result<(), ValidationError> {
    let Some(value) = record.get(attribute) else {
        return Ok(());
    };

    let Some(n) = as_integer(value) else {
        return Err(type_failure(
            options,
            attribute,
            "integer",
            format!("{attribute} must be an integer."),
            value,
        ));
    };

    check_bounds(options, attribute, n as f64)
}

/// Value must be a number.
pub fn number(
    record: &mut Record,
    attribute: &str,
    options: Option<&RuleOptions>,
) -> Result<(), ValidationError> {
    let Some(value) = record.get(attribute) else {
        return Ok(());
    };

    let Some(n) = as_number(value) else {
        return Err(type_failure(
            options,
            attribute,
            "number",
            format!("{attribute} must be a number."),
            value,
        ));
    };

    check_bounds(options, attribute, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::test_support::{options, run};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(json!(1), true)]
    #[case(json!("42"), true)]
    #[case(json!(" -3 "), true)]
    #[case(json!(1.5), false)]
    #[case(json!("1.5"), false)]
    #[case(json!("abc"), false)]
    #[case(json!(true), false)]
    #[case(json!([1]), false)]
    fn integer_accepts(#[case] value: Value, #[case] ok: bool) {
        assert_eq!(run(integer, value, None).1.is_ok(), ok);
    }

    #[test]
    fn integer_message_and_params() {
        let err = run(integer, json!("x"), None).1.unwrap_err();
        assert_eq!(err.code, "integer");
        assert_eq!(err.message, "attr must be an integer.");
        assert_eq!(err.param("actual"), Some("string"));
    }

    #[test]
    fn integer_accepts_whole_floats() {
        assert!(run(integer, json!(1.0), None).1.is_ok());
        assert_eq!(run(integer, json!(1.5), None).1.unwrap_err().code, "integer");
    }

    #[test]
    fn integer_bounds() {
        let opts = options(&[("min", json!(18))]);
        let err = run(integer, json!(17), Some(&opts)).1.unwrap_err();
        assert_eq!(err.message, "attr must be no less than 18.");
        assert!(run(integer, json!("18"), Some(&opts)).1.is_ok());
    }

    #[rstest]
    #[case(json!(1), true)]
    #[case(json!(2.5), true)]
    #[case(json!("-0.5"), true)]
    #[case(json!("1e2"), true)]
    #[case(json!("one"), false)]
    #[case(json!(false), false)]
    fn number_accepts(#[case] value: Value, #[case] ok: bool) {
        assert_eq!(run(number, value, None).1.is_ok(), ok);
    }

    #[test]
    fn number_bounds() {
        let opts = options(&[("max", json!(1.5))]);
        let err = run(number, json!(2), Some(&opts)).1.unwrap_err();
        assert_eq!(err.code, "too_big");
        assert_eq!(err.message, "attr must be no greater than 1.5.");
    }
}
