//! Declarative rule definitions.
//!
//! A [`RuleSpec`] names one or more attributes, a validator kind from the
//! registry, and optional parameters. Rules are plain data: they are parsed
//! once when a configuration is loaded and are read-only while records are
//! validated.
//!
//! The declarative form is a positional array:
//!
//! ```json
//! [["id", "title"], "required"]
//! ["content", "default", {"value": "empty body example"}]
//! ```

use std::fmt;
use std::sync::Arc;

use serde::de::{Deserialize, Deserializer, Error as _};
use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::error::ConfigError;
use crate::value::Record;

/// Attribute names targeted by a rule. Most rules name one or two.
pub type Attributes = SmallVec<[String; 2]>;

/// Option key that only code may attach.
pub const WHEN_OPTION: &str = "when";

// ============================================================================
// CONDITION
// ============================================================================

/// Lazy predicate attached to a rule as its `when` option.
///
/// The engine evaluates it against the record being built, once for every
/// missing attribute the rule targets, to decide whether the attribute is
/// materialized. It is evaluated again before the validator runs; a `false`
/// result skips that validator for the attribute. Results are never cached.
#[derive(Clone)]
pub struct Condition(Arc<dyn Fn(&Record) -> bool + Send + Sync>);

impl Condition {
    /// Wraps a predicate over the current record.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    /// Wraps a predicate that does not look at the record.
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(move |_| predicate()))
    }

    /// Evaluates the predicate.
    pub fn evaluate(&self, record: &Record) -> bool {
        (self.0)(record)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Rule parameters. Opaque to the engine apart from `when`.
#[derive(Debug, Clone, Default)]
pub struct RuleOptions {
    params: Map<String, Value>,
    when: Option<Condition>,
}

impl RuleOptions {
    /// Creates an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a parameter.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Looks up a string parameter.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Looks up a boolean parameter, treating absence as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// All parameters, in declaration order.
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// The `when` predicate, if any.
    pub fn when(&self) -> Option<&Condition> {
        self.when.as_ref()
    }

    /// Sets a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(key.into(), value.into());
    }
}

// ============================================================================
// RULES
// ============================================================================

/// One declarative rule.
///
/// # Examples
///
/// ```
/// use sift_validator::RuleSpec;
///
/// let rule = RuleSpec::new(["id", "title"], "required");
/// assert_eq!(rule.attributes().len(), 2);
/// assert!(rule.options().is_none());
///
/// let rule = RuleSpec::new("content", "default").with_option("value", "empty body example");
/// assert_eq!(rule.attributes().as_slice(), ["content"]);
/// assert!(rule.options().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct RuleSpec {
    attributes: Attributes,
    validator: String,
    options: Option<RuleOptions>,
}

impl RuleSpec {
    /// Creates a rule without options.
    ///
    /// `attributes` accepts a single name or any collection of names; a
    /// single name becomes a one-element list.
    pub fn new(attributes: impl IntoAttributes, validator: impl Into<String>) -> Self {
        Self {
            attributes: attributes.into_attributes(),
            validator: validator.into(),
            options: None,
        }
    }

    /// Adds a parameter, creating the option set on first use.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options
            .get_or_insert_with(RuleOptions::new)
            .insert(key, value);
        self
    }

    /// Attaches a `when` predicate over the record being validated.
    #[must_use = "builder methods must be chained or built"]
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        self.options.get_or_insert_with(RuleOptions::new).when = Some(Condition::new(predicate));
        self
    }

    /// Attaches an already-built [`Condition`].
    #[must_use = "builder methods must be chained or built"]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.options.get_or_insert_with(RuleOptions::new).when = Some(condition);
        self
    }

    /// Attributes targeted by this rule.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Validator kind, resolved through the registry.
    pub fn validator(&self) -> &str {
        &self.validator
    }

    /// Options, or `None` when the rule was declared without any.
    pub fn options(&self) -> Option<&RuleOptions> {
        self.options.as_ref()
    }

    /// The `when` predicate, if present.
    pub fn condition(&self) -> Option<&Condition> {
        self.options.as_ref().and_then(RuleOptions::when)
    }

    /// Parses the positional `[attributes, kind, {options}]` form.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let items = value
            .as_array()
            .ok_or_else(|| ConfigError::invalid_rule("rule must be an array"))?;

        let (attributes, validator, options) = match items.as_slice() {
            [attributes, validator] => (attributes, validator, None),
            [attributes, validator, options] => (attributes, validator, Some(options)),
            _ => {
                return Err(ConfigError::invalid_rule(format!(
                    "rule must have 2 or 3 elements, got {}",
                    items.len()
                )));
            }
        };

        let attributes = parse_attributes(attributes)?;

        let validator = validator
            .as_str()
            .filter(|kind| !kind.is_empty())
            .ok_or_else(|| ConfigError::invalid_rule("validator kind must be a non-empty string"))?
            .to_owned();

        let options = options.map(parse_options).transpose()?;

        Ok(Self {
            attributes,
            validator,
            options,
        })
    }
}

impl<'de> Deserialize<'de> for RuleSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(D::Error::custom)
    }
}

fn parse_attributes(value: &Value) -> Result<Attributes, ConfigError> {
    let attributes: Attributes = match value {
        Value::String(name) => SmallVec::from_iter([name.clone()]),
        Value::Array(names) => names
            .iter()
            .map(|name| {
                name.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| ConfigError::invalid_rule("attribute names must be strings"))
            })
            .collect::<Result<_, _>>()?,
        _ => {
            return Err(ConfigError::invalid_rule(
                "attributes must be a string or an array of strings",
            ));
        }
    };

    if attributes.is_empty() || attributes.iter().any(String::is_empty) {
        return Err(ConfigError::invalid_rule("attribute names must not be empty"));
    }
    Ok(attributes)
}

fn parse_options(value: &Value) -> Result<RuleOptions, ConfigError> {
    let params = value
        .as_object()
        .ok_or_else(|| ConfigError::invalid_rule("rule options must be an object"))?;

    if params.contains_key(WHEN_OPTION) {
        return Err(ConfigError::ReservedOption {
            key: WHEN_OPTION.to_owned(),
        });
    }

    Ok(RuleOptions {
        params: params.clone(),
        when: None,
    })
}

// ============================================================================
// ATTRIBUTE NORMALIZATION
// ============================================================================

/// Conversion into the attribute list of a rule.
pub trait IntoAttributes {
    fn into_attributes(self) -> Attributes;
}

impl IntoAttributes for &str {
    fn into_attributes(self) -> Attributes {
        SmallVec::from_iter([self.to_owned()])
    }
}

impl IntoAttributes for String {
    fn into_attributes(self) -> Attributes {
        SmallVec::from_iter([self])
    }
}

impl<const N: usize> IntoAttributes for [&str; N] {
    fn into_attributes(self) -> Attributes {
        self.into_iter().map(str::to_owned).collect()
    }
}

impl IntoAttributes for &[&str] {
    fn into_attributes(self) -> Attributes {
        self.iter().map(|name| (*name).to_owned()).collect()
    }
}

impl IntoAttributes for Vec<String> {
    fn into_attributes(self) -> Attributes {
        self.into_iter().collect()
    }
}
