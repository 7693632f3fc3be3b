//! Core domain models for the workflow graph.
//!
//! [`Node`] and [`Edge`] are what the [`GraphStore`](crate::GraphStore)
//! holds in memory.  [`PortableDocument`] is the flat export/import shape
//! handed to whatever persists the graph.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use nodes::{NodeAttributes, NodeKind};

/// Current version of the [`PortableDocument`] layout.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite, so the position survives JSON export.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single node in the workflow graph.
///
/// The kind is carried by the attribute variant, so the two can never
/// disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique within the graph; referenced by edges.
    pub id: String,
    /// Display name.  Workflow nodes refer to agents by this name.
    pub label: String,
    pub attributes: NodeAttributes,
    pub position: Position,
    /// Fields this version doesn't understand, carried through export.
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.attributes.kind()
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// Directed edge from one node to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub extra: Map<String, Value>,
}

impl Edge {
    /// Whether `node_id` is either endpoint.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

// ---------------------------------------------------------------------------
// PortableDocument
// ---------------------------------------------------------------------------

/// Serialised node.  `kind` and `attributes` stay untyped here so that an
/// unknown kind or a bad record surfaces as a malformed document rather than
/// a serde error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub label: String,
    pub attributes: Value,
    #[serde(default)]
    pub position: Position,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The persistable form of a graph: flat node and edge lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableDocument {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

impl Default for PortableDocument {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}
