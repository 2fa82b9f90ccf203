//! Rule engine for a single record.
//!
//! [`RecordValidator::validate`] works in two phases:
//!
//! 1. **Registration.** Rules are walked in declaration order; every
//!    (rule, attribute) pair is resolved against the registry and appended to
//!    the pipeline. An attribute missing from the record is materialized as
//!    `null` unless the rule's `when` predicate says it is not required.
//! 2. **Execution.** Only after every rule is registered does the pipeline
//!    run, in registration order, mutating the record and collecting errors.
//!
//! Registration has to finish first: later rules may stack validators on
//! attributes touched by earlier ones, and a `when` predicate may look at
//! attributes materialized earlier in the same pass.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{ProcessError, ValidationErrors};
use crate::registry::{AttributeValidator, ValidatorRegistry};
use crate::rule::{RuleOptions, RuleSpec};
use crate::value::{Record, is_empty_value};

/// Result of validating one record.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The record passed; it includes any changes made by validators.
    Success(Record),
    /// At least one attribute failed. No partial record is kept.
    Failure(ValidationErrors),
}

impl ValidationOutcome {
    /// Whether the record passed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The validated record, if any.
    pub fn record(&self) -> Option<&Record> {
        match self {
            Self::Success(record) => Some(record),
            Self::Failure(_) => None,
        }
    }

    /// The errors, if any.
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Success(_) => None,
            Self::Failure(errors) => Some(errors),
        }
    }

    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<Record, ValidationErrors> {
        match self {
            Self::Success(record) => Ok(record),
            Self::Failure(errors) => Err(errors),
        }
    }
}

/// One validator bound to one attribute.
struct Registration<'r> {
    attribute: &'r str,
    options: Option<&'r RuleOptions>,
    validator: Arc<dyn AttributeValidator>,
}

impl Registration<'_> {
    fn skips_empty(&self) -> bool {
        self.options
            .and_then(|o| o.get("skip_on_empty"))
            .and_then(Value::as_bool)
            .unwrap_or_else(|| self.validator.skip_on_empty())
    }
}

/// Transient state for one record: the record itself plus its pipeline.
struct ValidationContext<'r> {
    record: Record,
    pipeline: Vec<Registration<'r>>,
}

impl<'r> ValidationContext<'r> {
    fn new(record: Record) -> Self {
        Self {
            record,
            pipeline: Vec::new(),
        }
    }

    fn register(
        &mut self,
        registry: &ValidatorRegistry,
        rule: &'r RuleSpec,
    ) -> Result<(), ProcessError> {
        for attribute in rule.attributes() {
            let validator =
                registry
                    .get(rule.validator())
                    .ok_or_else(|| ProcessError::UnknownValidator {
                        kind: rule.validator().to_owned(),
                        attribute: attribute.clone(),
                    })?;

            self.pipeline.push(Registration {
                attribute: attribute.as_str(),
                options: rule.options(),
                validator,
            });

            if !self.record.contains_key(attribute.as_str()) {
                let required = rule
                    .condition()
                    .is_none_or(|condition| condition.evaluate(&self.record));
                if required {
                    tracing::trace!(attribute = %attribute, "materializing missing attribute");
                    self.record.insert(attribute.clone(), Value::Null);
                } else {
                    tracing::trace!(attribute = %attribute, "attribute not required, left absent");
                }
            }
        }
        Ok(())
    }

    fn run(mut self) -> ValidationOutcome {
        let mut errors = ValidationErrors::new();

        for registration in &self.pipeline {
            let attribute = registration.attribute;

            let Some(value) = self.record.get(attribute) else {
                continue;
            };
            if errors.has_field(attribute) {
                continue;
            }
            if registration.skips_empty() && is_empty_value(value) {
                continue;
            }
            if let Some(condition) = registration.options.and_then(RuleOptions::when) {
                if !condition.evaluate(&self.record) {
                    continue;
                }
            }

            if let Err(mut error) = registration.validator.validate_attribute(
                &mut self.record,
                attribute,
                registration.options,
            ) {
                if error.field.is_none() {
                    error.field = Some(attribute.to_owned().into());
                }
                tracing::trace!(attribute = %attribute, code = %error.code, "attribute failed");
                errors.add(error);
            }
        }

        if errors.is_empty() {
            ValidationOutcome::Success(self.record)
        } else {
            ValidationOutcome::Failure(errors)
        }
    }
}

/// Applies a rule list to one record.
///
/// # Examples
///
/// ```
/// use sift_validator::{RecordValidator, RuleSpec, ValidatorRegistry};
/// use serde_json::json;
///
/// let registry = ValidatorRegistry::new();
/// let rules = [
///     RuleSpec::new("title", "trim"),
///     RuleSpec::new("content", "default").with_option("value", "empty body example"),
/// ];
///
/// let record = json!({"id": 1, "title": "  Hello "}).as_object().unwrap().clone();
/// let outcome = RecordValidator::new(&registry).validate(record, &rules).unwrap();
///
/// assert_eq!(
///     outcome.record().cloned().map(serde_json::Value::Object),
///     Some(json!({"id": 1, "title": "Hello", "content": "empty body example"}))
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RecordValidator<'a> {
    registry: &'a ValidatorRegistry,
}

impl<'a> RecordValidator<'a> {
    /// Creates a validator that resolves kinds through `registry`.
    pub fn new(registry: &'a ValidatorRegistry) -> Self {
        Self { registry }
    }

    /// Checks that every rule names a registered validator kind.
    ///
    /// Does not depend on any record, so an empty list of records still
    /// reports a misconfigured rule.
    pub fn check_rules(&self, rules: &[RuleSpec]) -> Result<(), ProcessError> {
        for rule in rules {
            if !self.registry.has_validator(rule.validator()) {
                return Err(ProcessError::UnknownValidator {
                    kind: rule.validator().to_owned(),
                    attribute: rule.attributes().first().cloned().unwrap_or_default(),
                });
            }
        }
        Ok(())
    }

    /// Validates one record against `rules`.
    ///
    /// Attribute-level failures come back as [`ValidationOutcome::Failure`];
    /// only an unknown validator kind is an `Err`.
    pub fn validate(
        &self,
        record: Record,
        rules: &[RuleSpec],
    ) -> Result<ValidationOutcome, ProcessError> {
        let mut context = ValidationContext::new(record);
        for rule in rules {
            context.register(self.registry, rule)?;
        }
        Ok(context.run())
    }
}
