//! Field-level configuration.
//!
//! A [`FieldConfig`] bundles the rule list with the JSON envelope mode and
//! the `each` switch. It can be built in code or loaded from JSON:
//!
//! ```
//! use sift_validator::{FieldConfig, JsonMode};
//!
//! let config = FieldConfig::from_json_str(r#"{
//!     "json": 3,
//!     "rules": [
//!         [["id", "title", "content"], "required"],
//!         ["id", "int"],
//!         ["title", "trim"],
//!         ["content", "default", {"value": "empty body example"}]
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(config.json, JsonMode::Both);
//! assert!(!config.each);
//! assert_eq!(config.rules.len(), 4);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::ConfigError;
use crate::rule::RuleSpec;

// ============================================================================
// JSON MODE
// ============================================================================

/// JSON envelope around validation, as bit flags.
///
/// `Decode` parses the field value before validation, `Encode` serializes the
/// validated value afterwards, `Both` does both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum JsonMode {
    #[default]
    None = 0,
    Encode = 1,
    Decode = 2,
    Both = 3,
}

impl JsonMode {
    const ENCODE_BIT: u8 = 1;
    const DECODE_BIT: u8 = 2;

    /// Builds a mode from its flag value.
    #[must_use]
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::None),
            1 => Some(Self::Encode),
            2 => Some(Self::Decode),
            3 => Some(Self::Both),
            _ => None,
        }
    }

    /// The flag value.
    #[must_use]
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Whether the raw field value is decoded before validation.
    #[must_use]
    pub fn decodes(self) -> bool {
        self.bits() & Self::DECODE_BIT != 0
    }

    /// Whether the validated value is encoded before being written back.
    #[must_use]
    pub fn encodes(self) -> bool {
        self.bits() & Self::ENCODE_BIT != 0
    }

    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Encode => "encode",
            Self::Decode => "decode",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for JsonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "encode" => Ok(Self::Encode),
            "decode" => Ok(Self::Decode),
            "both" => Ok(Self::Both),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(Self::from_bits)
                .ok_or_else(|| ConfigError::InvalidJsonMode {
                    value: s.to_owned(),
                }),
        }
    }
}

impl Serialize for JsonMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for JsonMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self::None),
            Value::Number(n) => n
                .as_u64()
                .and_then(|bits| u8::try_from(bits).ok())
                .and_then(Self::from_bits)
                .ok_or_else(|| {
                    D::Error::custom(ConfigError::InvalidJsonMode {
                        value: n.to_string(),
                    })
                }),
            Value::String(s) => s.parse().map_err(D::Error::custom),
            other => Err(D::Error::custom(ConfigError::InvalidJsonMode {
                value: other.to_string(),
            })),
        }
    }
}

// ============================================================================
// FIELD CONFIG
// ============================================================================

/// Everything the processor needs to handle one field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    /// Rules applied to every record, in declaration order.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,

    /// JSON envelope mode.
    #[serde(default)]
    pub json: JsonMode,

    /// Treat the field as a list of records.
    #[serde(default)]
    pub each: bool,
}

impl FieldConfig {
    /// Creates an empty configuration: no rules, no JSON, single record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, rule: RuleSpec) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends several rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleSpec>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the JSON envelope mode.
    #[must_use = "builder methods must be chained or built"]
    pub fn json(mut self, mode: JsonMode) -> Self {
        self.json = mode;
        self
    }

    /// Sets the `each` switch.
    #[must_use = "builder methods must be chained or built"]
    pub fn each(mut self, each: bool) -> Self {
        self.each = each;
        self
    }

    /// Loads a configuration from a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Loads a configuration from an already-parsed JSON value.
    pub fn from_json_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }
}
