//! Semantic validation engine

use allio_ir::{Diagram, DiagramDocument, Finding, Severity};
use tracing::debug;

use crate::graph::TransitionGraph;
use crate::rules::{
    IdentifierIndex, UNREACHABLE_COMPONENT, check_dead_ends, check_unconditional_fanout, find_root,
};

/// Validation configuration
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Report components with more than one unconditional outgoing transition
    pub detect_unconditional_fanout: bool,
    /// Report reachable components that no transition leaves
    pub detect_dead_ends: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            detect_unconditional_fanout: true,
            detect_dead_ends: true,
        }
    }
}

/// Checks graph properties of schema-valid diagrams.
///
/// Per diagram, in order:
/// 1. identifier uniqueness (errors stop the remaining checks),
/// 2. a single root `Begin` component (errors stop the remaining checks),
/// 3. reachability of every component from the root, plus transition
///    endpoint, dead-end and fan-out checks. These never stop anything.
#[derive(Debug, Default)]
pub struct ValidationEngine {
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Create a new validation engine
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with specific configuration
    #[must_use]
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate every diagram in document order.
    ///
    /// Finding locations are absolute (prefixed with `/diagrams/<index>`).
    /// A failing diagram never prevents later diagrams from being checked.
    #[must_use]
    pub fn validate_document(&self, document: &DiagramDocument) -> Vec<Finding> {
        document
            .diagrams
            .iter()
            .enumerate()
            .flat_map(|(position, diagram)| {
                let prefix = DiagramDocument::diagram_path(position);
                self.validate_diagram(diagram)
                    .into_iter()
                    .map(move |finding| finding.within(&prefix))
            })
            .collect()
    }

    /// Validate one diagram; locations are relative to the diagram
    #[must_use]
    pub fn validate_diagram(&self, diagram: &Diagram) -> Vec<Finding> {
        let (index, mut findings) = IdentifierIndex::build(diagram);
        if findings.iter().any(|f| f.severity == Severity::Error) {
            debug!(findings = findings.len(), "Duplicate ids, skipping graph checks");
            return findings;
        }

        let root = match find_root(diagram) {
            Ok(root) => root,
            Err(root_findings) => {
                debug!(findings = root_findings.len(), "No unique root, skipping reachability");
                findings.extend(root_findings);
                return findings;
            }
        };

        let (graph, reference_findings) = TransitionGraph::build(diagram, &index);
        findings.extend(reference_findings);

        let visited = graph.reachable_from(root);
        let unreachable_ids: Vec<usize> = visited
            .iter()
            .enumerate()
            .filter(|(_, reached)| !**reached)
            .map(|(position, _)| position)
            .collect();
        for position in unreachable_ids {
            let location = Diagram::component_path(position);
            let already_reported = findings
                .iter()
                .any(|f| f.location == location && f.message == UNREACHABLE_COMPONENT);
            if !already_reported {
                findings.push(Finding::warning(location, UNREACHABLE_COMPONENT));
            }
        }

        if self.config.detect_dead_ends {
            findings.extend(check_dead_ends(diagram, &graph, &visited));
        }

        if self.config.detect_unconditional_fanout {
            findings.extend(check_unconditional_fanout(diagram, &index));
        }

        debug!(
            components = diagram.content.len(),
            findings = findings.len(),
            "Diagram validated"
        );
        findings
    }
}
