#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # allio-validation
//!
//! Semantic checks for schema-valid ALLIO diagrams.
//!
//! Each diagram is checked for unique component ids, a single root `Begin`
//! block, and reachability of every component from that root. Results are
//! [`Finding`]s located by document path; positions are attached later.
//!
//! ## Example Usage
//!
//! ```rust
//! use allio_ir::{Component, Diagram};
//! use allio_validation::ValidationEngine;
//!
//! let diagram = Diagram {
//!     name: None,
//!     content: vec![
//!         Component::Begin { id: Some("start".to_string()) },
//!         Component::End { id: Some("stop".to_string()) },
//!     ],
//! };
//!
//! // no transition: "stop" is unreachable and "start" leads nowhere
//! let findings = ValidationEngine::new().validate_diagram(&diagram);
//! let locations: Vec<_> = findings.iter().map(|f| f.location.to_string()).collect();
//! assert_eq!(locations, vec!["/content/1", "/content/0"]);
//! ```

pub mod engine;
pub mod graph;
pub mod rules;

pub use engine::{ValidationConfig, ValidationEngine};
pub use graph::TransitionGraph;
pub use rules::{IdentifierIndex, check_dead_ends, check_unconditional_fanout, find_root};

use allio_ir::{DiagramDocument, Finding};
use thiserror::Error;

/// Errors that can occur during validation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Document error: {0}")]
    Document(#[from] allio_ir::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to validate a document with default settings
#[must_use]
pub fn validate(document: &DiagramDocument) -> Vec<Finding> {
    ValidationEngine::new().validate_document(document)
}

/// Convenience function to validate a schema-valid JSON tree
///
/// # Errors
///
/// Returns an error when the tree does not have the diagram document shape.
pub fn validate_value(value: serde_json::Value) -> Result<Vec<Finding>> {
    let document = DiagramDocument::from_value(value)?;
    Ok(validate(&document))
}
