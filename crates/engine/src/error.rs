//! Engine-level error types.

use thiserror::Error;

use nodes::SchemaError;

use crate::ConnectionRejection;

/// Errors produced by the graph engine (mutation, import, ordering).
///
/// Every variant leaves the [`GraphStore`](crate::GraphStore) exactly as it
/// was before the failing call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// An operation referenced a node, edge or template that doesn't exist.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The edge was rejected by the connection rules.
    #[error("cannot connect '{from}' to '{to}': {reason}")]
    InvalidConnection {
        from: String,
        to: String,
        reason: ConnectionRejection,
    },

    /// An attribute record violates its kind's schema.
    #[error("validation error: {0}")]
    Validation(#[from] SchemaError),

    /// A node position has a NaN or infinite coordinate.
    #[error("position ({x}, {y}) is not finite")]
    InvalidPosition { x: f64, y: f64 },

    /// An imported document violates the graph's structural invariants.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Topological ordering found a directed cycle through these nodes.
    #[error("workflow graph contains a cycle through {}", .nodes.join(", "))]
    CycleDetected { nodes: Vec<String> },
}

impl GraphError {
    pub(crate) fn node_not_found(id: &str) -> Self {
        GraphError::NotFound { entity: "node", id: id.to_owned() }
    }

    pub(crate) fn edge_not_found(id: &str) -> Self {
        GraphError::NotFound { entity: "edge", id: id.to_owned() }
    }
}
