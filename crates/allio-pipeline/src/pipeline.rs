//! Pipeline orchestration
//!
//! Runs the three validation stages over one source text:
//!
//! 1. syntax: parse into a plain JSON tree,
//! 2. schema: check the tree against the bundled diagram schema,
//! 3. semantics: check component ids, roots and reachability.
//!
//! A syntax or schema failure ends the run. Source positions are only
//! computed when a stage has something to report.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use allio_ir::{
    Diagnostic, DiagramDocument, Severity, SourceMap, count_by_severity, dedup_diagnostics,
};
use allio_schema::{Strictness, ValidatorCache, ValidatorOptions, translate_violations};
use allio_validation::{ValidationConfig, ValidationEngine};
use serde_json::Value;
use tracing::{debug, info};

use crate::{AcceptancePolicy, Error, Result, WarningPolicy};

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Schema strictness
    pub strictness: Strictness,
    /// What to do with documents that fail semantic checks
    pub acceptance_policy: AcceptancePolicy,
    /// Semantic check options
    pub validation: ValidationConfig,
    /// Maximum file size in bytes
    pub max_file_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            acceptance_policy: AcceptancePolicy::default(),
            validation: ValidationConfig::default(),
            max_file_size: 16 * 1024 * 1024, // 16MB
        }
    }
}

impl PipelineConfig {
    /// Configuration for a verbose run: every schema violation is collected
    #[must_use]
    pub fn verbose(verbose: bool) -> Self {
        Self {
            strictness: Strictness::from_verbose(verbose),
            ..Self::default()
        }
    }
}

/// Validation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ParsingSyntax,
    ValidatingSchema,
    ValidatingSemantics,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParsingSyntax => "syntax",
            Self::ValidatingSchema => "schema",
            Self::ValidatingSemantics => "semantics",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of validating one document
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The document passed syntax and schema checks
    Accepted {
        document: DiagramDocument,
        diagnostics: Vec<Diagnostic>,
    },
    /// The document was rejected by `stage`
    Rejected {
        stage: Stage,
        diagnostics: Vec<Diagnostic>,
    },
}

impl Outcome {
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Accepted { diagnostics, .. } | Self::Rejected { diagnostics, .. } => diagnostics,
        }
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self {
            Self::Accepted { diagnostics, .. } | Self::Rejected { diagnostics, .. } => diagnostics,
        }
    }

    #[must_use]
    pub fn document(&self) -> Option<&DiagramDocument> {
        match self {
            Self::Accepted { document, .. } => Some(document),
            Self::Rejected { .. } => None,
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Stage that rejected the document, if any
    #[must_use]
    pub fn rejected_at(&self) -> Option<Stage> {
        match self {
            Self::Rejected { stage, .. } => Some(*stage),
            Self::Accepted { .. } => None,
        }
    }

    /// Whether the run counts as a success under `warnings`.
    ///
    /// A rejected document always fails. Otherwise error diagnostics fail,
    /// and warnings fail only under [`WarningPolicy::Deny`].
    #[must_use]
    pub fn passes(&self, warnings: WarningPolicy) -> bool {
        if !self.is_accepted() {
            return false;
        }
        let (error_count, warning_count) = count_by_severity(self.diagnostics());
        match warnings {
            WarningPolicy::Allow => error_count == 0,
            WarningPolicy::Deny => error_count == 0 && warning_count == 0,
        }
    }
}

/// Statistics for pipeline runs
#[derive(Debug, Default, Clone)]
pub struct PipelineStats {
    /// Total documents validated
    pub documents_validated: usize,
    /// Documents accepted
    pub documents_accepted: usize,
    /// Documents rejected
    pub documents_rejected: usize,
    /// Diagnostics reported across all documents
    pub diagnostics_reported: usize,
    /// Total processing time
    pub total_processing_time: Duration,
}

/// Validation pipeline for diagram documents
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    engine: ValidationEngine,
    stats: PipelineStats,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            engine: ValidationEngine::with_config(config.validation.clone()),
            config,
            stats: PipelineStats::default(),
        }
    }

    /// Create a pipeline with default configuration
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(PipelineConfig::default())
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get current statistics
    #[must_use]
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Validate a file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is too large, or
    /// when [`Pipeline::validate`] fails.
    pub fn validate_file<P: AsRef<Path>>(
        &mut self,
        cache: &ValidatorCache,
        path: P,
    ) -> Result<Outcome> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();

        let metadata = std::fs::metadata(path)
            .map_err(|e| Error::io("stat", &path_str, e.to_string()))?;
        if metadata.len() > self.config.max_file_size as u64 {
            return Err(Error::pipeline(
                "read",
                &path_str,
                format!(
                    "file too large: {} bytes (max: {} bytes)",
                    metadata.len(),
                    self.config.max_file_size
                ),
            ));
        }

        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::io("read", &path_str, e.to_string()))?;
        info!("Validating {}", path_str);
        self.validate(cache, &source)
    }

    /// Validate source text.
    ///
    /// Diagnostics on the returned [`Outcome`] are the expected result of
    /// validating a bad document.
    ///
    /// # Errors
    ///
    /// Returns an error only for internal faults: the bundled schema fails
    /// to compile, or a schema-valid tree does not convert into a document.
    pub fn validate(&mut self, cache: &ValidatorCache, source: &str) -> Result<Outcome> {
        let start = Instant::now();
        let outcome = self.run_stages(cache, source);

        self.stats.total_processing_time += start.elapsed();
        if let Ok(outcome) = &outcome {
            self.stats.documents_validated += 1;
            self.stats.diagnostics_reported += outcome.diagnostics().len();
            if outcome.is_accepted() {
                self.stats.documents_accepted += 1;
            } else {
                self.stats.documents_rejected += 1;
            }
        }
        outcome
    }

    fn run_stages(&self, cache: &ValidatorCache, source: &str) -> Result<Outcome> {
        let tree = match parse_syntax(source) {
            Ok(tree) => tree,
            Err(diagnostic) => {
                debug!(stage = %Stage::ParsingSyntax, "Rejected");
                return Ok(Outcome::Rejected {
                    stage: Stage::ParsingSyntax,
                    diagnostics: vec![diagnostic],
                });
            }
        };

        let validator = cache.get_or_build(ValidatorOptions::new(self.config.strictness))?;
        let violations = validator.violations(&tree);
        if !violations.is_empty() {
            let source_map = SourceMap::parse(source);
            let diagnostics = translate_violations(&violations, &source_map);
            debug!(
                stage = %Stage::ValidatingSchema,
                violations = violations.len(),
                diagnostics = diagnostics.len(),
                "Rejected"
            );
            return Ok(Outcome::Rejected {
                stage: Stage::ValidatingSchema,
                diagnostics,
            });
        }

        let document = DiagramDocument::from_value(tree)?;
        let findings = self.engine.validate_document(&document);
        let diagnostics = if findings.is_empty() {
            Vec::new()
        } else {
            let source_map = SourceMap::parse(source);
            dedup_diagnostics(
                findings
                    .into_iter()
                    .map(|finding| finding.resolve(&source_map))
                    .collect(),
            )
        };

        let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
        if has_errors && self.config.acceptance_policy == AcceptancePolicy::FailFast {
            debug!(stage = %Stage::ValidatingSemantics, "Rejected");
            return Ok(Outcome::Rejected {
                stage: Stage::ValidatingSemantics,
                diagnostics,
            });
        }

        debug!(
            diagrams = document.diagrams.len(),
            diagnostics = diagnostics.len(),
            "Accepted"
        );
        Ok(Outcome::Accepted {
            document,
            diagnostics,
        })
    }
}

/// Parse the source into a plain tree.
///
/// The text is first loaded as a YAML value so that repeated mapping keys
/// are rejected, then converted into a JSON tree. On failure, returns a
/// single diagnostic at the parser's reported one-based position, or
/// without position when the parser gives none.
fn parse_syntax(source: &str) -> std::result::Result<Value, Diagnostic> {
    let yaml = serde_yaml::from_str::<serde_yaml::Value>(source).map_err(|e| {
        let location = e.location();
        Diagnostic::error(
            location.as_ref().map(serde_yaml::Location::line),
            location.as_ref().map(serde_yaml::Location::column),
            e.to_string(),
        )
    })?;
    // keys that have no JSON form (sequences, mappings) land here
    serde_json::to_value(&yaml).map_err(|e| Diagnostic::error(None, None, e.to_string()))
}
