#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # allio-ir
//!
//! Shared data model for ALLIO diagram validation.
//!
//! This crate provides the diagnostic record every validation stage emits,
//! abstract document paths, source position lookup, and the typed view of
//! a diagram document.

/// Diagnostic records, severities, and deduplication.
pub mod diagnostic;
/// Typed diagram document model.
pub mod document;
/// Abstract paths into a document tree.
pub mod path;
/// Resolution of document paths to source positions.
pub mod position;

pub use diagnostic::{Diagnostic, Finding, Severity, count_by_severity, dedup_diagnostics};
pub use document::{Component, ComponentKind, Diagram, DiagramDocument};
pub use path::{DocumentPath, PathSegment};
pub use position::{PositionIndex, SourceMap, SourcePosition};

use thiserror::Error;

/// Errors that can occur when working with the IR
#[derive(Error, Debug)]
pub enum Error {
    #[error("Conversion error in {context}: {message}")]
    Conversion { context: String, message: String },
}

impl Error {
    /// Build a conversion error with conversion context.
    pub fn conversion(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Crate-local result type for IR operations.
pub type Result<T> = std::result::Result<T, Error>;
