//! Per-diagram semantic rules
//!
//! Locations in the returned findings are relative to the diagram.

use std::collections::HashMap;

use allio_ir::{Component, ComponentKind, Diagram, Finding};

use crate::graph::TransitionGraph;

pub const DUPLICATE_ID: &str = "component id should be unique";
pub const UNREACHABLE_COMPONENT: &str = "found unreachable diagram component";
pub const MISSING_BEGIN: &str = "diagram should start with a \"Begin\" block";
pub const MULTIPLE_BEGIN: &str = "only one root \"Begin\" block is allowed in a diagram";
pub const MULTIPLE_UNCONDITIONAL: &str =
    "only one unconditional transition is allowed from a component";
pub const DEAD_END: &str =
    "component should transition to another component or an \"End\" block";

/// Message for a transition endpoint naming no component
#[must_use]
pub fn unknown_reference(id: &str) -> String {
    format!("transition refers to unknown component \"{id}\"")
}

/// Mapping from component id to its position in the diagram's content.
///
/// The first occurrence of an id wins.
#[derive(Debug, Default)]
pub struct IdentifierIndex<'a> {
    ids: HashMap<&'a str, usize>,
}

impl<'a> IdentifierIndex<'a> {
    /// Build the index, reporting duplicate ids and unaddressable components.
    ///
    /// A duplicate is reported at its own `id` field. A non-transition
    /// component without an id can never be the target of a transition and
    /// is reported as unreachable.
    #[must_use]
    pub fn build(diagram: &'a Diagram) -> (Self, Vec<Finding>) {
        let mut ids = HashMap::with_capacity(diagram.content.len());
        let mut findings = Vec::new();

        for (position, component) in diagram.content.iter().enumerate() {
            match component.id() {
                Some(id) => {
                    if ids.contains_key(id) {
                        findings.push(Finding::error(
                            Diagram::component_path(position).key("id"),
                            DUPLICATE_ID,
                        ));
                    } else {
                        ids.insert(id, position);
                    }
                }
                None if !component.is_transition() => {
                    findings.push(Finding::warning(
                        Diagram::component_path(position),
                        UNREACHABLE_COMPONENT,
                    ));
                }
                None => {}
            }
        }

        (Self { ids }, findings)
    }

    /// Content position of the component with `id`
    #[must_use]
    pub fn get(&self, id: &str) -> Option<usize> {
        self.ids.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Locate the single `Begin` component.
///
/// # Errors
///
/// Returns one finding at `content` when there is no `Begin`, or one finding
/// per `Begin` component when there are several.
pub fn find_root(diagram: &Diagram) -> Result<usize, Vec<Finding>> {
    let begins: Vec<usize> = diagram
        .content
        .iter()
        .enumerate()
        .filter(|(_, component)| component.is_begin())
        .map(|(position, _)| position)
        .collect();

    match begins.as_slice() {
        [] => Err(vec![Finding::error(Diagram::content_path(), MISSING_BEGIN)]),
        [root] => Ok(*root),
        _ => Err(begins
            .into_iter()
            .map(|position| Finding::error(Diagram::component_path(position), MULTIPLE_BEGIN))
            .collect()),
    }
}

/// Report every unconditional transition after the first leaving the same
/// component.
#[must_use]
pub fn check_unconditional_fanout(diagram: &Diagram, index: &IdentifierIndex<'_>) -> Vec<Finding> {
    let mut sources_seen: HashMap<usize, usize> = HashMap::new();
    let mut findings = Vec::new();

    for (position, component) in diagram.content.iter().enumerate() {
        let Component::Transition {
            from,
            condition: None,
            ..
        } = component
        else {
            continue;
        };
        let Some(source) = index.get(from) else {
            continue;
        };

        let count = sources_seen.entry(source).or_insert(0);
        *count += 1;
        if *count > 1 {
            findings.push(Finding::error(
                Diagram::component_path(position),
                MULTIPLE_UNCONDITIONAL,
            ));
        }
    }

    findings
}

/// Report every reachable `Begin` or `Command` component that no transition
/// leaves.
///
/// `visited` is the reachability result for `graph`. Transitions are not
/// checked here; a dangling endpoint is reported when the graph is built.
#[must_use]
pub fn check_dead_ends(
    diagram: &Diagram,
    graph: &TransitionGraph,
    visited: &[bool],
) -> Vec<Finding> {
    diagram
        .content
        .iter()
        .enumerate()
        .filter(|(position, component)| {
            matches!(component.kind(), ComponentKind::Begin | ComponentKind::Command)
                && visited.get(*position).copied().unwrap_or(false)
                && graph.successors(*position).is_empty()
        })
        .map(|(position, _)| Finding::error(Diagram::component_path(position), DEAD_END))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use allio_ir::Severity;

    fn begin(id: &str) -> Component {
        Component::Begin {
            id: Some(id.to_string()),
        }
    }

    fn end(id: &str) -> Component {
        Component::End {
            id: Some(id.to_string()),
        }
    }

    fn transition(from: &str, to: &str, condition: Option<&str>) -> Component {
        Component::Transition {
            id: None,
            from: from.to_string(),
            to: to.to_string(),
            condition: condition.map(str::to_string),
        }
    }

    fn diagram(content: Vec<Component>) -> Diagram {
        Diagram {
            name: None,
            content,
        }
    }

    fn locations(findings: &[Finding]) -> Vec<String> {
        findings.iter().map(|f| f.location.to_string()).collect()
    }

    #[test]
    fn test_index_first_occurrence_wins() {
        let d = diagram(vec![begin("a"), end("a"), end("b")]);
        let (index, findings) = IdentifierIndex::build(&d);

        assert_eq!(index.get("a"), Some(0));
        assert_eq!(index.get("b"), Some(2));
        assert_eq!(index.len(), 2);
        assert_eq!(locations(&findings), vec!["/content/1/id"]);
        assert_eq!(findings[0].message, DUPLICATE_ID);
    }

    #[test]
    fn test_index_reports_count_minus_one_duplicates() {
        let d = diagram(vec![begin("x"), end("x"), end("x"), end("y"), end("x")]);
        let (_, findings) = IdentifierIndex::build(&d);

        assert_eq!(
            locations(&findings),
            vec!["/content/1/id", "/content/2/id", "/content/4/id"]
        );
        assert!(findings.iter().all(|f| f.severity == Severity::Error));
    }

    #[test]
    fn test_index_component_without_id() {
        let d = diagram(vec![
            begin("b"),
            Component::End { id: None },
            transition("b", "e", None),
        ]);
        let (index, findings) = IdentifierIndex::build(&d);

        assert_eq!(index.len(), 1);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].message, UNREACHABLE_COMPONENT);
        assert_eq!(locations(&findings), vec!["/content/1"]);
    }

    #[test]
    fn test_find_root_single() {
        let d = diagram(vec![end("e"), begin("b")]);
        assert_eq!(find_root(&d), Ok(1));
    }

    #[test]
    fn test_find_root_missing() {
        let findings = find_root(&diagram(vec![end("e")])).unwrap_err();
        assert_eq!(locations(&findings), vec!["/content"]);
        assert_eq!(findings[0].message, MISSING_BEGIN);
    }

    #[test]
    fn test_find_root_empty_diagram() {
        let findings = find_root(&diagram(Vec::new())).unwrap_err();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, MISSING_BEGIN);
    }

    #[test]
    fn test_find_root_reports_every_begin() {
        let d = diagram(vec![begin("a"), end("e"), begin("b"), begin("c")]);
        let findings = find_root(&d).unwrap_err();

        assert_eq!(
            locations(&findings),
            vec!["/content/0", "/content/2", "/content/3"]
        );
        assert!(findings.iter().all(|f| f.message == MULTIPLE_BEGIN));
    }

    #[test]
    fn test_unconditional_fanout() {
        let d = diagram(vec![
            begin("b"),
            end("e1"),
            end("e2"),
            transition("b", "e1", None),
            transition("b", "e2", Some("timeout")),
            transition("b", "e2", None),
            transition("e1", "e2", None),
        ]);
        let (index, _) = IdentifierIndex::build(&d);

        let findings = check_unconditional_fanout(&d, &index);
        assert_eq!(locations(&findings), vec!["/content/5"]);
        assert_eq!(findings[0].message, MULTIPLE_UNCONDITIONAL);
    }

    #[test]
    fn test_dead_ends() {
        let d = diagram(vec![
            begin("b"),
            Component::Command {
                id: Some("c".to_string()),
                device: "lamp".to_string(),
                command: "toggle".to_string(),
                args: None,
            },
            end("e"),
            Component::Command {
                id: Some("orphan".to_string()),
                device: "lamp".to_string(),
                command: "toggle".to_string(),
                args: None,
            },
            transition("b", "c", None),
        ]);
        let (index, _) = IdentifierIndex::build(&d);
        let (graph, _) = TransitionGraph::build(&d, &index);
        let visited = graph.reachable_from(0);

        // the unreachable command and the End block are not dead ends
        let findings = check_dead_ends(&d, &graph, &visited);
        assert_eq!(locations(&findings), vec!["/content/1"]);
        assert_eq!(findings[0].message, DEAD_END);
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn test_loop_back_is_not_a_dead_end() {
        let d = diagram(vec![
            begin("b"),
            Component::Command {
                id: Some("c".to_string()),
                device: "lamp".to_string(),
                command: "toggle".to_string(),
                args: None,
            },
            transition("b", "c", None),
            transition("c", "b", Some("again")),
        ]);
        let (index, _) = IdentifierIndex::build(&d);
        let (graph, _) = TransitionGraph::build(&d, &index);
        let visited = graph.reachable_from(0);

        assert!(check_dead_ends(&d, &graph, &visited).is_empty());
    }

    #[test]
    fn test_unknown_reference_message() {
        assert_eq!(
            unknown_reference("ghost"),
            "transition refers to unknown component \"ghost\""
        );
    }
}
