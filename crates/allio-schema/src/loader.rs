//! Compilation of the bundled diagram schema and adaptation of validator errors

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, ValidationError, Validator};
use serde_json::Value;
use tracing::{debug, trace};

use crate::model::{
    KEYWORD_ADDITIONAL_PROPERTIES, KEYWORD_ANY_OF, PARAM_ADDITIONAL_PROPERTY, Violation,
};
use crate::{Error, Result};

/// The versioned diagram schema shipped with this crate
pub const DIAGRAM_SCHEMA: &str = include_str!("../schema/alliodiagram.schema.json");

/// How much of a document the schema validator inspects after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strictness {
    /// Stop at the first violation
    #[default]
    FirstError,
    /// Collect every violation, including across union branches
    Exhaustive,
}

impl Strictness {
    /// Strictness selected by a verbose flag
    #[must_use]
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Self::Exhaustive
        } else {
            Self::FirstError
        }
    }
}

/// Options that affect a compiled validator's behavior.
///
/// Used as the [`ValidatorCache`](crate::ValidatorCache) key, so every new
/// option must be added here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ValidatorOptions {
    pub strictness: Strictness,
}

impl ValidatorOptions {
    #[must_use]
    pub fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }
}

/// A compiled schema together with the options it was built for
pub struct SchemaValidator {
    validator: Validator,
    options: ValidatorOptions,
}

impl SchemaValidator {
    /// Compile the bundled diagram schema
    ///
    /// # Errors
    ///
    /// Returns an error when the bundled schema is not valid JSON or not a
    /// valid draft 7 schema.
    pub fn compile(options: ValidatorOptions) -> Result<Self> {
        let schema: Value = serde_json::from_str(DIAGRAM_SCHEMA)
            .map_err(|e| Error::InvalidSchema(format!("JSON parse error: {e}")))?;
        Self::from_schema(&schema, options)
    }

    /// Compile an arbitrary draft 7 schema
    ///
    /// # Errors
    ///
    /// Returns an error when `schema` cannot be compiled.
    pub fn from_schema(schema: &Value, options: ValidatorOptions) -> Result<Self> {
        debug!(?options, "Compiling diagram schema");
        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .build(schema)
            .map_err(|e| Error::InvalidSchema(e.to_string()))?;
        Ok(Self { validator, options })
    }

    #[must_use]
    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Validate `instance`, returning violations in validator order.
    ///
    /// An empty result means the instance is schema-valid.
    #[must_use]
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        let violations: Vec<Violation> = match self.options.strictness {
            Strictness::FirstError => match self.validator.validate(instance) {
                Ok(()) => Vec::new(),
                Err(error) => adapt_error(&error),
            },
            Strictness::Exhaustive => self
                .validator
                .iter_errors(instance)
                .flat_map(|error| adapt_error(&error))
                .collect(),
        };
        trace!(count = violations.len(), "Schema validation finished");
        violations
    }
}

/// Convert one validator error into violation records.
///
/// A closed-object error naming several unexpected keys becomes one
/// violation per key.
fn adapt_error(error: &ValidationError<'_>) -> Vec<Violation> {
    let instance_path = error.instance_path.to_string();
    match &error.kind {
        ValidationErrorKind::AdditionalProperties { unexpected } => unexpected
            .iter()
            .map(|property| {
                Violation::new(
                    instance_path.clone(),
                    KEYWORD_ADDITIONAL_PROPERTIES,
                    "must NOT have additional properties",
                )
                .with_param(PARAM_ADDITIONAL_PROPERTY, property.as_str())
            })
            .collect(),
        kind => vec![Violation::new(instance_path, keyword_of(kind), error.to_string())],
    }
}

fn keyword_of(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::AdditionalProperties { .. } => KEYWORD_ADDITIONAL_PROPERTIES,
        ValidationErrorKind::AnyOf { .. } => KEYWORD_ANY_OF,
        ValidationErrorKind::OneOfNotValid { .. } | ValidationErrorKind::OneOfMultipleValid { .. } => {
            "oneOf"
        }
        ValidationErrorKind::Required { .. } => "required",
        ValidationErrorKind::Type { .. } => "type",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::Constant { .. } => "const",
        ValidationErrorKind::MinLength { .. } => "minLength",
        ValidationErrorKind::FalseSchema { .. } => "false",
        _ => "schema",
    }
}
