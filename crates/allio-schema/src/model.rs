//! Raw schema violation records

use allio_ir::DocumentPath;
use serde_json::{Map, Value};

/// Keyword of a conditional (`if`/`then`) match failure
pub const KEYWORD_IF: &str = "if";
/// Keyword of a union (`anyOf`) match failure
pub const KEYWORD_ANY_OF: &str = "anyOf";
/// Keyword of a closed-object violation
pub const KEYWORD_ADDITIONAL_PROPERTIES: &str = "additionalProperties";
/// Parameter naming the unexpected property of an `additionalProperties` violation
pub const PARAM_ADDITIONAL_PROPERTY: &str = "additionalProperty";

/// One violation reported by the schema validator.
///
/// Mirrors the common JSON Schema error shape: a slash-separated instance
/// path with a leading empty segment, the failing rule keyword, a raw
/// message, and keyword-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub instance_path: String,
    pub keyword: String,
    pub message: String,
    pub params: Map<String, Value>,
}

impl Violation {
    pub fn new(
        instance_path: impl Into<String>,
        keyword: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            instance_path: instance_path.into(),
            keyword: keyword.into(),
            message: message.into(),
            params: Map::new(),
        }
    }

    /// Attach a keyword parameter
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Structural path of the offending instance
    pub fn path(&self) -> DocumentPath {
        DocumentPath::from_pointer(&self.instance_path)
    }

    /// Generic union/conditional failures that restate a more specific one
    pub fn is_generic_match_failure(&self) -> bool {
        self.keyword == KEYWORD_IF || self.keyword == KEYWORD_ANY_OF
    }

    /// Name of the unexpected property, for `additionalProperties` violations
    pub fn additional_property(&self) -> Option<&str> {
        if self.keyword != KEYWORD_ADDITIONAL_PROPERTIES {
            return None;
        }
        self.params
            .get(PARAM_ADDITIONAL_PROPERTY)
            .and_then(Value::as_str)
    }
}
