//! Diagnostic records shared by every validation stage
#![allow(clippy::must_use_candidate)] // Constructor helpers are clear at call sites without #[must_use].

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::DocumentPath;
use crate::position::PositionIndex;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Defect that makes the document unusable
    Error,
    /// Advisory issue, never blocking on its own
    Warning,
}

impl Severity {
    /// Lowercase label used when rendering diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A located, severity-tagged validation message.
///
/// `line` and `column` are 1-based and `None` when no source location could
/// be resolved. Two diagnostics with equal fields describe the same defect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic with an explicit (1-based) location
    pub fn new(
        line: Option<usize>,
        column: Option<usize>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line,
            column,
            severity,
            message: message.into(),
        }
    }

    /// Create an error diagnostic
    pub fn error(line: Option<usize>, column: Option<usize>, message: impl Into<String>) -> Self {
        Self::new(line, column, Severity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(line: Option<usize>, column: Option<usize>, message: impl Into<String>) -> Self {
        Self::new(line, column, Severity::Warning, message)
    }

    /// Whether this diagnostic is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.line.unwrap_or(0),
            self.column.unwrap_or(0),
            self.severity,
            self.message
        )
    }
}

/// A diagnostic whose location is still an abstract document path.
///
/// Semantic checks produce findings; they become [`Diagnostic`]s once the
/// path is resolved against a [`PositionIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub location: DocumentPath,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn error(location: DocumentPath, message: impl Into<String>) -> Self {
        Self {
            location,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(location: DocumentPath, message: impl Into<String>) -> Self {
        Self {
            location,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Prefix the location, e.g. with the owning diagram's path
    #[must_use]
    pub fn within(mut self, prefix: &DocumentPath) -> Self {
        self.location = prefix.join(&self.location);
        self
    }

    /// Resolve the location into a line/column diagnostic
    pub fn resolve(self, index: &dyn PositionIndex) -> Diagnostic {
        let position = index.resolve(&self.location);
        if position.is_none() {
            tracing::debug!(path = %self.location, "no source position for finding");
        }
        Diagnostic {
            line: position.map(|(line, _)| line),
            column: position.map(|(_, column)| column),
            severity: self.severity,
            message: self.message,
        }
    }
}

/// Drop later occurrences of identical diagnostics, keeping first-seen order.
///
/// Idempotent: applying it to its own output changes nothing.
pub fn dedup_diagnostics(diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut seen = HashSet::with_capacity(diagnostics.len());
    diagnostics
        .into_iter()
        .filter(|diagnostic| seen.insert(diagnostic.clone()))
        .collect()
}

/// Count diagnostics by severity as `(errors, warnings)`
pub fn count_by_severity(diagnostics: &[Diagnostic]) -> (usize, usize) {
    diagnostics
        .iter()
        .fold((0, 0), |(errors, warnings), d| match d.severity {
            Severity::Error => (errors + 1, warnings),
            Severity::Warning => (errors, warnings + 1),
        })
}
