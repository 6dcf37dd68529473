//! Translation of raw schema violations into located diagnostics

use allio_ir::{Diagnostic, DocumentPath, PositionIndex, Severity, dedup_diagnostics};
use tracing::debug;

use crate::model::Violation;

/// Convert schema violations into deduplicated diagnostics.
///
/// 1. Generic `if`/`anyOf` failures are dropped when a more specific
///    violation sits at the same path or below it.
/// 2. Each remaining instance path is resolved through `index`.
/// 3. Unexpected-property violations are reworded to
///    `found invalid key "<name>"` and located at the key itself.
/// 4. Identical diagnostics are reported once, in first-seen order.
///
/// Paths that cannot be resolved produce diagnostics without a position.
pub fn translate_violations(violations: &[Violation], index: &dyn PositionIndex) -> Vec<Diagnostic> {
    let paths: Vec<DocumentPath> = violations.iter().map(Violation::path).collect();

    let diagnostics: Vec<Diagnostic> = violations
        .iter()
        .zip(&paths)
        .filter(|(violation, path)| !is_redundant(violation, path, violations, &paths))
        .map(|(violation, path)| to_diagnostic(violation, path.clone(), index))
        .collect();

    let total = diagnostics.len();
    let diagnostics = dedup_diagnostics(diagnostics);
    debug!(
        violations = violations.len(),
        diagnostics = diagnostics.len(),
        duplicates = total - diagnostics.len(),
        "Translated schema violations"
    );
    diagnostics
}

fn is_redundant(
    violation: &Violation,
    path: &DocumentPath,
    violations: &[Violation],
    paths: &[DocumentPath],
) -> bool {
    violation.is_generic_match_failure()
        && violations
            .iter()
            .zip(paths)
            .any(|(other, other_path)| !other.is_generic_match_failure() && other_path.starts_with(path))
}

fn to_diagnostic(violation: &Violation, mut path: DocumentPath, index: &dyn PositionIndex) -> Diagnostic {
    let message = match violation.additional_property() {
        Some(property) => {
            // the instance path names the enclosing object, not the key
            path.push_key(property);
            format!("found invalid key \"{property}\"")
        }
        None => violation.message.clone(),
    };

    let position = index.resolve(&path);
    Diagnostic::new(
        position.map(|(line, _)| line),
        position.map(|(_, column)| column),
        Severity::Error,
        message,
    )
}
