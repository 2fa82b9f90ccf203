//! # sift-validator
//!
//! Rule-driven validation for array-shaped fields of a host record.
//!
//! A field holds either one key/value record or a list of records. Each
//! record is checked against an ordered list of rules; every rule names one
//! or more attributes and a validator kind resolved through a
//! [`ValidatorRegistry`]. Validators may also rewrite attribute values
//! (`trim`, `default`), so a passing field is written back with the
//! rebuilt records.
//!
//! ## Quick Start
//!
//! ```rust
//! use sift_validator::prelude::*;
//! use serde_json::json;
//!
//! let processor = FieldProcessor::new(
//!     FieldConfig::new()
//!         .rule(RuleSpec::new("title", "trim"))
//!         .rule(RuleSpec::new("content", "default").with_option("value", "empty body example")),
//! );
//!
//! let mut model = Model::new().with("data", json!({"id": 1, "title": "  Hello "}));
//! processor.process(&mut model, "data").unwrap();
//!
//! assert_eq!(
//!     model.get("data"),
//!     Some(&json!({"id": 1, "title": "Hello", "content": "empty body example"}))
//! );
//! ```
//!
//! ## Declarative configuration
//!
//! [`FieldConfig`] also loads from JSON, with rules in positional form:
//!
//! ```rust
//! use sift_validator::FieldConfig;
//!
//! let config = FieldConfig::from_json_str(
//!     r#"{"each": true, "json": "both", "rules": [[["id", "login"], "required"]]}"#,
//! )
//! .unwrap();
//! assert!(config.each);
//! ```
//!
//! ## Built-in validators
//!
//! `required`, `default`, `trim`, `safe`, `integer`/`int`, `number`/`double`,
//! `string`, `boolean`, `in`, `match` and `email`. Register more with
//! [`ValidatorRegistry::register_fn`].

// ValidationError is returned by every validator call; boxing it buys nothing.
#![allow(clippy::result_large_err)]

pub mod codec;
pub mod config;
pub mod error;
pub mod host;
pub mod prelude;
pub mod processor;
pub mod record;
pub mod registry;
pub mod rule;
pub mod validators;
pub mod value;

pub use codec::{JsonCodec, SerdeJsonCodec};
pub use config::{FieldConfig, JsonMode};
pub use error::{ConfigError, ProcessError, ValidationError, ValidationErrors};
pub use host::{HostRecord, Model};
pub use processor::{FieldOutcome, FieldProcessor};
pub use record::{RecordValidator, ValidationOutcome};
pub use registry::{AttributeValidator, Builtin, ValidatorFn, ValidatorRegistry};
pub use rule::{Attributes, Condition, IntoAttributes, RuleOptions, RuleSpec};
pub use value::Record;
