#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # allio-pipeline
//!
//! Staged validation of ALLIO diagram documents with acceptance policies.
//!
//! A [`Pipeline`] takes source text through syntax, schema, and semantic
//! stages and returns an [`Outcome`] carrying located diagnostics. The
//! compiled schema validator lives in a caller-owned
//! [`ValidatorCache`](allio_schema::ValidatorCache) shared across runs.
//!
//! ## Example Usage
//!
//! ```rust
//! use allio_pipeline::{Pipeline, PipelineConfig};
//! use allio_schema::ValidatorCache;
//!
//! let cache = ValidatorCache::new();
//! let mut pipeline = Pipeline::new(PipelineConfig::default());
//!
//! let outcome = pipeline.validate(&cache, "devices: {}\ndiagrams: []\n").unwrap();
//! assert!(outcome.is_accepted());
//! assert!(outcome.diagnostics().is_empty());
//! ```

pub mod pipeline;
pub mod policies;

pub use pipeline::{Outcome, Pipeline, PipelineConfig, PipelineStats, Stage};
pub use policies::{AcceptancePolicy, WarningPolicy};

use thiserror::Error;

/// Errors that can occur in the pipeline
#[derive(Error, Debug)]
pub enum Error {
    #[error("Pipeline error during {operation} for '{path}': {message}")]
    Pipeline {
        operation: String,
        path: String,
        message: String,
    },

    #[error("IO error during {operation} for '{path}': {message}")]
    Io {
        operation: String,
        path: String,
        message: String,
    },

    #[error("Schema error: {0}")]
    Schema(#[from] allio_schema::Error),

    #[error("Document error: {0}")]
    Document(#[from] allio_ir::Error),
}

impl Error {
    /// Create a structured pipeline error with operation/path context.
    pub fn pipeline(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Pipeline {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a structured I/O error with operation/path context.
    pub fn io(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_preserves_operation_and_path_context() {
        let error = Error::io("read", "/tmp/diagram.yaml", "permission denied");
        match error {
            Error::Io {
                operation,
                path,
                message,
            } => {
                assert_eq!(operation, "read");
                assert_eq!(path, "/tmp/diagram.yaml");
                assert_eq!(message, "permission denied");
            }
            _ => panic!("expected io variant"),
        }
    }

    #[test]
    fn document_error_converts() {
        let error: Error = allio_ir::Error::conversion("document", "bad shape").into();
        assert!(matches!(error, Error::Document(_)));
        assert!(error.to_string().contains("bad shape"));
    }
}
