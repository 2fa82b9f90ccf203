//! Prelude module for convenient imports.
//!
//! `use sift_validator::prelude::*;` brings in the processor, its
//! configuration, the host contract and the error types.

pub use crate::codec::{JsonCodec, SerdeJsonCodec};
pub use crate::config::{FieldConfig, JsonMode};
pub use crate::error::{ConfigError, ProcessError, ValidationError, ValidationErrors};
pub use crate::host::{HostRecord, Model};
pub use crate::processor::{FieldOutcome, FieldProcessor};
pub use crate::record::{RecordValidator, ValidationOutcome};
pub use crate::registry::{AttributeValidator, Builtin, ValidatorRegistry};
pub use crate::rule::{Condition, RuleOptions, RuleSpec};
pub use crate::value::Record;
