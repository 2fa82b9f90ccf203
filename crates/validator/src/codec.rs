//! JSON envelope codec.

use serde_json::Value;

/// Converts a field between its transport string and structured form.
pub trait JsonCodec: Send + Sync {
    /// Parses a raw field value.
    ///
    /// Malformed input yields `Value::Null` rather than an error; the shape
    /// check downstream reports it.
    fn decode(&self, raw: &Value) -> Value;

    /// Serializes a validated value.
    fn encode(&self, value: &Value) -> Result<String, serde_json::Error>;
}

/// Default codec backed by `serde_json`.
///
/// Only string inputs are decoded; any other raw value decodes to null.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonCodec;

impl JsonCodec for SerdeJsonCodec {
    fn decode(&self, raw: &Value) -> Value {
        let Value::String(text) = raw else {
            tracing::debug!(
                actual = crate::value::value_type_name(raw),
                "json decode skipped: field is not a string"
            );
            return Value::Null;
        };

        serde_json::from_str(text).unwrap_or_else(|error| {
            tracing::debug!(%error, "json decode failed");
            Value::Null
        })
    }

    fn encode(&self, value: &Value) -> Result<String, serde_json::Error> {
        serde_json::to_string(value)
    }
}
