//! Persisted record types.
//!
//! These are *persistence* models — they carry no graph behaviour.
//! The graph itself lives in the `engine` crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use engine::PortableDocument;

/// A saved workflow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredWorkflow {
    pub id: Uuid,
    pub name: String,
    /// Exported graph (nodes, edges, format version).
    pub document: PortableDocument,
    pub saved_at: DateTime<Utc>,
}

impl StoredWorkflow {
    /// Wrap a freshly exported document under a new id.
    pub fn new(name: impl Into<String>, document: PortableDocument) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            document,
            saved_at: Utc::now(),
        }
    }
}

/// Listing entry without the document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub id: Uuid,
    pub name: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub saved_at: DateTime<Utc>,
}

impl From<&StoredWorkflow> for WorkflowSummary {
    fn from(stored: &StoredWorkflow) -> Self {
        Self {
            id: stored.id,
            name: stored.name.clone(),
            node_count: stored.document.nodes.len(),
            edge_count: stored.document.edges.len(),
            saved_at: stored.saved_at,
        }
    }
}
