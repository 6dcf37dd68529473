//! Typed view of a diagram document
#![allow(clippy::must_use_candidate)] // Accessors are clear at call sites without #[must_use].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::DocumentPath;

/// A parsed diagram file: device declarations plus an ordered list of diagrams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramDocument {
    /// Device declarations, opaque to validation
    pub devices: Value,

    /// Diagrams in document order
    pub diagrams: Vec<Diagram>,
}

impl DiagramDocument {
    /// Build a typed document from a schema-valid structural value
    ///
    /// # Errors
    ///
    /// Returns an error when the value does not have the document shape.
    pub fn from_value(value: Value) -> crate::Result<Self> {
        serde_json::from_value(value).map_err(|e| crate::Error::conversion("document", e.to_string()))
    }

    /// Path of the diagram at `index`
    pub fn diagram_path(index: usize) -> DocumentPath {
        DocumentPath::root().key("diagrams").index(index)
    }
}

/// One automation flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Components in declaration order
    pub content: Vec<Component>,
}

impl Diagram {
    /// Path of the `content` sequence, relative to the diagram
    pub fn content_path() -> DocumentPath {
        DocumentPath::root().key("content")
    }

    /// Path of the component at `index`, relative to the diagram
    pub fn component_path(index: usize) -> DocumentPath {
        Self::content_path().index(index)
    }
}

/// A typed node of a diagram, tagged by its `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Component {
    /// Entry point of the flow
    Begin {
        #[serde(default)]
        id: Option<String>,
    },

    /// Exit point of the flow
    End {
        #[serde(default)]
        id: Option<String>,
    },

    /// Sends a command to a device
    Command {
        #[serde(default)]
        id: Option<String>,
        device: String,
        command: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        args: Option<Value>,
    },

    /// Edge from one component to another, referenced by id
    Transition {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        from: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
    },
}

/// Variant of a [`Component`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Begin,
    End,
    Command,
    Transition,
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Begin { .. } => ComponentKind::Begin,
            Component::End { .. } => ComponentKind::End,
            Component::Command { .. } => ComponentKind::Command,
            Component::Transition { .. } => ComponentKind::Transition,
        }
    }

    /// Identifier, if present and non-empty
    pub fn id(&self) -> Option<&str> {
        let id = match self {
            Component::Begin { id }
            | Component::End { id }
            | Component::Command { id, .. }
            | Component::Transition { id, .. } => id.as_deref(),
        };
        id.filter(|id| !id.is_empty())
    }

    pub fn is_begin(&self) -> bool {
        self.kind() == ComponentKind::Begin
    }

    pub fn is_transition(&self) -> bool {
        self.kind() == ComponentKind::Transition
    }
}
