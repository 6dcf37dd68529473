//! # allio-schema
//!
//! Schema artifact, validator cache, and schema error translation for ALLIO
//! diagrams.
//!
//! The bundled JSON Schema describes the shape of a diagram document. A
//! [`ValidatorCache`] compiles it once per set of [`ValidatorOptions`], and
//! [`translate_violations`] turns the raw violations into diagnostics that
//! point at source lines.

pub mod loader;
pub mod model;
pub mod registry;
pub mod translator;

pub use loader::{DIAGRAM_SCHEMA, SchemaValidator, Strictness, ValidatorOptions};
pub use model::Violation;
pub use registry::ValidatorCache;
pub use translator::translate_violations;

use thiserror::Error;

/// Errors that can occur when working with schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

pub type Result<T> = std::result::Result<T, Error>;
