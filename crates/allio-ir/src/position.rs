//! Source position lookup for document paths
//!
//! The structural parse used on the success path carries no positions. When a
//! defect has to be reported, the source text is parsed a second time with a
//! position-preserving parser and paths are resolved against that tree.

use std::collections::HashMap;

use tracing::{trace, warn};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::Marker;

use crate::path::{DocumentPath, PathSegment};

/// Position in the source text, 0-based in both coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourcePosition {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed)
    pub column: usize,
}

impl SourcePosition {
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Build from 1-based coordinates as reported by most parsers
    #[must_use]
    pub fn from_one_based(line: usize, column: usize) -> Self {
        Self {
            line: line.saturating_sub(1),
            column: column.saturating_sub(1),
        }
    }

    /// `(line, column)` for display, both 1-based.
    ///
    /// Line 0 is a valid position and maps to line 1.
    #[must_use]
    pub fn to_one_based(self) -> (usize, usize) {
        (self.line + 1, self.column + 1)
    }
}

/// Resolves document paths to source positions
pub trait PositionIndex {
    /// 0-based position of the node at `path`, or `None` when the path does
    /// not correspond to any node in the source
    fn locate(&self, path: &DocumentPath) -> Option<SourcePosition>;

    /// 1-based `(line, column)` of the node at `path`
    fn resolve(&self, path: &DocumentPath) -> Option<(usize, usize)> {
        self.locate(path).map(SourcePosition::to_one_based)
    }
}

/// Position index built from the YAML event stream.
///
/// A path whose last segment is a mapping key resolves to the key itself,
/// so `.../content/2/foo` points at the `foo:` token rather than its value.
/// Aliases resolve to the nodes of their anchor.
pub struct SourceMap {
    root: Option<PositionNode>,
}

impl SourceMap {
    /// Parse `text` with positions.
    ///
    /// Text the position parser rejects yields an index on which every lookup
    /// returns `None`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut builder = TreeBuilder::default();
        let mut parser = Parser::new_from_str(text);
        match parser.load(&mut builder, false) {
            Ok(()) => Self { root: builder.root },
            Err(error) => {
                warn!(error = %error, "position-aware parse failed, locations will be unresolved");
                Self { root: None }
            }
        }
    }

    /// An index that resolves nothing
    #[must_use]
    pub fn empty() -> Self {
        Self { root: None }
    }
}

impl PositionIndex for SourceMap {
    fn locate(&self, path: &DocumentPath) -> Option<SourcePosition> {
        let mut node = self.root.as_ref()?;
        let mut position = node.start;

        for segment in path.segments() {
            match &node.kind {
                NodeKind::Mapping(entries) => {
                    let wanted = match segment {
                        PathSegment::Key(key) => key.clone(),
                        PathSegment::Index(index) => index.to_string(),
                    };
                    let (key, value) = entries
                        .iter()
                        .find(|(key, _)| key.scalar() == Some(wanted.as_str()))?;
                    position = key.start;
                    node = value;
                }
                NodeKind::Sequence(items) => {
                    let index = match segment {
                        PathSegment::Index(index) => *index,
                        PathSegment::Key(key) => key.parse().ok()?,
                    };
                    node = items.get(index)?;
                    position = node.start;
                }
                NodeKind::Scalar(_) => {
                    trace!(%path, "path descends into a scalar");
                    return None;
                }
            }
        }

        Some(position)
    }
}

/// A node of the source tree with the position where it starts
#[derive(Debug, Clone)]
struct PositionNode {
    start: SourcePosition,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Scalar(String),
    Sequence(Vec<PositionNode>),
    Mapping(Vec<(PositionNode, PositionNode)>),
}

impl PositionNode {
    fn scalar(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar(text) => Some(text),
            _ => None,
        }
    }
}

/// Collection being filled while its events arrive
enum Frame {
    Sequence {
        start: SourcePosition,
        anchor: usize,
        items: Vec<PositionNode>,
    },
    Mapping {
        start: SourcePosition,
        anchor: usize,
        entries: Vec<(PositionNode, PositionNode)>,
        pending_key: Option<PositionNode>,
    },
}

/// Builds a [`PositionNode`] tree from parser events.
///
/// Anchor id `0` means "no anchor".
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, PositionNode>,
    root: Option<PositionNode>,
}

impl TreeBuilder {
    fn complete(&mut self, node: PositionNode, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => entries.push((key, node)),
                None => *pending_key = Some(node),
            },
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, event: Event, marker: Marker) {
        // line is 1-based, column 0-based
        let start = SourcePosition::new(marker.line().saturating_sub(1), marker.col());
        match event {
            Event::Scalar(value, _, anchor, _) => {
                let node = PositionNode {
                    start,
                    kind: NodeKind::Scalar(value),
                };
                self.complete(node, anchor);
            }
            Event::Alias(anchor) => {
                let node = match self.anchors.get(&anchor) {
                    Some(target) => PositionNode {
                        start,
                        kind: target.kind.clone(),
                    },
                    None => PositionNode {
                        start,
                        kind: NodeKind::Scalar(String::new()),
                    },
                };
                self.complete(node, 0);
            }
            Event::SequenceStart(anchor, ..) => self.stack.push(Frame::Sequence {
                start,
                anchor,
                items: Vec::new(),
            }),
            Event::MappingStart(anchor, ..) => self.stack.push(Frame::Mapping {
                start,
                anchor,
                entries: Vec::new(),
                pending_key: None,
            }),
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Sequence {
                    start,
                    anchor,
                    items,
                }) => self.complete(
                    PositionNode {
                        start,
                        kind: NodeKind::Sequence(items),
                    },
                    anchor,
                ),
                Some(Frame::Mapping {
                    start,
                    anchor,
                    entries,
                    ..
                }) => self.complete(
                    PositionNode {
                        start,
                        kind: NodeKind::Mapping(entries),
                    },
                    anchor,
                ),
                None => {}
            },
            _ => {}
        }
    }
}
