//! Transition graph and reachability
//!
//! Nodes are positions in a diagram's `content` sequence. Every transition
//! is itself a node: its source points at it and it points at its
//! destination.

use std::collections::VecDeque;

use allio_ir::{Component, Diagram, Finding};
use tracing::trace;

use crate::rules::{IdentifierIndex, unknown_reference};

/// Directed graph over the components of one diagram
#[derive(Debug, Clone)]
pub struct TransitionGraph {
    edges: Vec<Vec<usize>>,
}

impl TransitionGraph {
    /// Build the graph from every transition in `diagram`.
    ///
    /// Endpoints are resolved through `index`; an endpoint naming no
    /// component is reported at its own field and contributes no edge.
    #[must_use]
    pub fn build(diagram: &Diagram, index: &IdentifierIndex<'_>) -> (Self, Vec<Finding>) {
        let mut edges = vec![Vec::new(); diagram.content.len()];
        let mut findings = Vec::new();

        for (position, component) in diagram.content.iter().enumerate() {
            let Component::Transition { from, to, .. } = component else {
                continue;
            };

            match index.get(from) {
                Some(source) => edges[source].push(position),
                None => findings.push(Finding::error(
                    Diagram::component_path(position).key("from"),
                    unknown_reference(from),
                )),
            }
            match index.get(to) {
                Some(destination) => edges[position].push(destination),
                None => findings.push(Finding::error(
                    Diagram::component_path(position).key("to"),
                    unknown_reference(to),
                )),
            }
        }

        (Self { edges }, findings)
    }

    /// Number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Direct successors of `node`, in insertion order
    #[must_use]
    pub fn successors(&self, node: usize) -> &[usize] {
        self.edges.get(node).map_or(&[][..], Vec::as_slice)
    }

    /// Breadth-first reachability from `root`.
    ///
    /// Element `i` of the result tells whether node `i` was visited. Each
    /// node is visited at most once, so cycles terminate.
    #[must_use]
    pub fn reachable_from(&self, root: usize) -> Vec<bool> {
        let mut visited = vec![false; self.edges.len()];
        if root >= visited.len() {
            return visited;
        }

        let mut queue = VecDeque::new();
        visited[root] = true;
        queue.push_back(root);

        while let Some(node) = queue.pop_front() {
            for &next in self.successors(node) {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }

        trace!(
            root,
            visited = visited.iter().filter(|v| **v).count(),
            nodes = visited.len(),
            "Reachability walk finished"
        );
        visited
    }
}
