//! Validator registry.
//!
//! Rules name validators by kind (`"required"`, `"int"`, ...). The registry
//! maps each kind to an [`AttributeValidator`]. [`ValidatorRegistry::new`]
//! comes with the built-in set from [`crate::validators`]; custom kinds are
//! added with [`ValidatorRegistry::register`] or
//! [`ValidatorRegistry::register_fn`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::rule::RuleOptions;
use crate::validators;
use crate::value::Record;

/// A validator applied to one attribute of a record.
///
/// Validators receive the whole record so they can read sibling attributes
/// and mutate the target value in place (trimming, defaults). Returning an
/// error attaches it to the attribute; the engine fills in the field name
/// when the validator leaves it unset.
pub trait AttributeValidator: Send + Sync {
    /// Validates `record[attribute]`.
    fn validate_attribute(
        &self,
        record: &mut Record,
        attribute: &str,
        options: Option<&RuleOptions>,
    ) -> Result<(), ValidationError>;

    /// Whether empty values (null, `""`, `[]`, `{}`) bypass this validator.
    fn skip_on_empty(&self) -> bool {
        true
    }
}

/// Signature of a built-in validator function.
pub type ValidatorFn =
    fn(&mut Record, &str, Option<&RuleOptions>) -> Result<(), ValidationError>;

/// A built-in validator: a plain function plus its empty-value policy.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    func: ValidatorFn,
    skip_on_empty: bool,
}

impl Builtin {
    /// Validator that is skipped for empty values.
    pub const fn new(func: ValidatorFn) -> Self {
        Self {
            func,
            skip_on_empty: true,
        }
    }

    /// Validator that also sees empty values.
    pub const fn on_empty(func: ValidatorFn) -> Self {
        Self {
            func,
            skip_on_empty: false,
        }
    }
}

impl AttributeValidator for Builtin {
    fn validate_attribute(
        &self,
        record: &mut Record,
        attribute: &str,
        options: Option<&RuleOptions>,
    ) -> Result<(), ValidationError> {
        (self.func)(record, attribute, options)
    }

    fn skip_on_empty(&self) -> bool {
        self.skip_on_empty
    }
}

/// Adapter for closures registered with [`ValidatorRegistry::register_fn`].
struct FnValidator<F>(F);

impl<F> AttributeValidator for FnValidator<F>
where
    F: Fn(&mut Record, &str, Option<&RuleOptions>) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate_attribute(
        &self,
        record: &mut Record,
        attribute: &str,
        options: Option<&RuleOptions>,
    ) -> Result<(), ValidationError> {
        (self.0)(record, attribute, options)
    }
}

/// Registry of validators by kind.
#[derive(Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<dyn AttributeValidator>>,
}

impl ValidatorRegistry {
    /// Create a registry with all built-in validators.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtins();
        registry
    }

    /// Create a registry with no validators at all.
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Register a validator, replacing any previous one of the same kind.
    pub fn register<V>(&mut self, kind: impl Into<String>, validator: V)
    where
        V: AttributeValidator + 'static,
    {
        self.validators.insert(kind.into(), Arc::new(validator));
    }

    /// Register a closure as a validator that skips empty values.
    pub fn register_fn<F>(&mut self, kind: impl Into<String>, func: F)
    where
        F: Fn(&mut Record, &str, Option<&RuleOptions>) -> Result<(), ValidationError>
            + Send
            + Sync
            + 'static,
    {
        self.register(kind, FnValidator(func));
    }

    /// Look up a validator by kind.
    pub fn get(&self, kind: &str) -> Option<Arc<dyn AttributeValidator>> {
        self.validators.get(kind).cloned()
    }

    /// Check if a validator kind exists
    pub fn has_validator(&self, kind: &str) -> bool {
        self.validators.contains_key(kind)
    }

    /// All registered kinds, sorted.
    pub fn validator_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.validators.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    fn register_builtins(&mut self) {
        self.register("required", Builtin::on_empty(validators::required));
        self.register("default", Builtin::on_empty(validators::default_value));
        self.register("trim", Builtin::on_empty(validators::trim));
        self.register("safe", Builtin::new(validators::safe));

        self.register("integer", Builtin::new(validators::integer));
        self.register("int", Builtin::new(validators::integer));
        self.register("number", Builtin::new(validators::number));
        self.register("double", Builtin::new(validators::number));

        self.register("string", Builtin::new(validators::string));
        self.register("boolean", Builtin::new(validators::boolean));
        self.register("in", Builtin::new(validators::in_range));
        self.register("match", Builtin::new(validators::matches));
        self.register("email", Builtin::new(validators::email));
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.validator_names())
            .finish()
    }
}
