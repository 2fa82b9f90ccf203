//! Error types for field processing
//!
//! Two tiers live here:
//!
//! - [`ValidationError`] / [`ValidationErrors`]: recoverable, per-attribute
//!   failures reported by validators. They are collected, never propagated,
//!   and end up on the host record under the owning field name.
//! - [`ProcessError`] / [`ConfigError`]: structural failures that abort the
//!   current field (or configuration load) and are returned to the caller.
//!
//! String fields on [`ValidationError`] use `Cow<'static, str>` so static
//! codes and messages do not allocate.

use std::borrow::Cow;
use std::fmt;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A single attribute-level validation failure.
///
/// # Examples
///
/// ```
/// use sift_validator::ValidationError;
///
/// let error = ValidationError::new("too_small", "age must be no less than 18.")
///     .with_field("age")
///     .with_param("min", "18");
///
/// assert_eq!(error.field.as_deref(), Some("age"));
/// assert_eq!(error.param("min"), Some("18"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error code for programmatic handling.
    ///
    /// Examples: "required", "integer", "too_small"
    pub code: Cow<'static, str>,

    /// Human-readable message. This is the text surfaced on the host record.
    pub message: Cow<'static, str>,

    /// Attribute inside the record that failed.
    pub field: Option<Cow<'static, str>>,

    /// Ordered key-value parameters, typically 0-3 entries.
    pub params: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl ValidationError {
    /// Creates a new validation error with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            params: Vec::new(),
        }
    }

    /// Sets the attribute this error belongs to.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Adds a parameter to the error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }

    /// Creates a "required" error for an attribute.
    pub fn required(field: impl Into<Cow<'static, str>>) -> Self {
        let field = field.into();
        Self::new("required", format!("{field} cannot be blank.")).with_field(field)
    }

    /// Creates a "type_mismatch" error.
    pub fn type_mismatch(
        field: impl Into<Cow<'static, str>>,
        expected: impl Into<Cow<'static, str>>,
        actual: impl Into<Cow<'static, str>>,
    ) -> Self {
        let field = field.into();
        let expected = expected.into();
        Self::new("type_mismatch", format!("{field} must be {expected}."))
            .with_field(field)
            .with_param("expected", expected)
            .with_param("actual", actual)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "[{}] {}: {}", field, self.code, self.message)?;
        } else {
            write!(f, "{}: {}", self.code, self.message)?;
        }

        if !self.params.is_empty() {
            write!(f, " (params: [")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, "])")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// ERROR COLLECTION
// ============================================================================

/// Ordered collection of validation errors for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Creates a new empty error collection.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Adds an error to the collection.
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds multiple errors to the collection.
    pub fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.errors.extend(errors);
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true if any error is attached to `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field.as_deref() == Some(field))
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns all errors.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Iterates `(attribute, message)` pairs in the order they were reported.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|e| (e.field.as_deref().unwrap_or_default(), e.message.as_ref()))
    }

    /// Converts to a Result.
    #[must_use = "result must be used"]
    pub fn into_result<T>(self, ok_value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(ok_value)
        } else {
            Err(self)
        }
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// STRUCTURAL ERRORS
// ============================================================================

/// Fatal error for one field's processing.
///
/// Returned before the host record is touched; never attached to it.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The field value (after optional decoding) is not an array or object.
    #[error("attribute `{field}` must be an array, got {actual}")]
    InvalidInput { field: String, actual: &'static str },

    /// A list-shaped value was given without `each`.
    #[error("attribute `{field}` seems to contain different objects, use 'each'")]
    AmbiguousShape { field: String },

    /// An element of an `each` list is not itself a record.
    #[error("item {index} of attribute `{field}` must be an object, got {actual}")]
    InvalidItem {
        field: String,
        index: usize,
        actual: &'static str,
    },

    /// A rule names a validator kind missing from the registry.
    #[error("unknown validator `{kind}` for attribute `{attribute}`")]
    UnknownValidator { kind: String, attribute: String },

    /// Encoding the validated value to JSON failed.
    #[error("failed to encode attribute `{field}` to JSON: {source}")]
    Encode {
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ProcessError {
    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "SIFT_INVALID_INPUT",
            Self::AmbiguousShape { .. } => "SIFT_AMBIGUOUS_SHAPE",
            Self::InvalidItem { .. } => "SIFT_INVALID_ITEM",
            Self::UnknownValidator { .. } => "SIFT_UNKNOWN_VALIDATOR",
            Self::Encode { .. } => "SIFT_ENCODE",
        }
    }
}

/// Error raised while loading a declarative field configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A rule entry does not have the `[attributes, kind, {options}]` shape.
    #[error("invalid rule: {reason}")]
    InvalidRule { reason: String },

    /// The `json` setting is neither a known flag value nor a known name.
    #[error("invalid json mode `{value}`: expected 0-3 or none/encode/decode/both")]
    InvalidJsonMode { value: String },

    /// An option key that only code may provide.
    #[error("option `{key}` cannot be set declaratively; attach it with RuleSpec::{key}")]
    ReservedOption { key: String },

    /// The configuration document is not valid JSON for this shape.
    #[error("failed to parse field configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid_rule(reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
