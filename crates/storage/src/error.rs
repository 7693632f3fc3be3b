//! Typed error type for the storage crate.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("workflow {0} not found")]
    NotFound(Uuid),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The stored document no longer imports into a valid graph.
    #[error("stored document is invalid: {0}")]
    Graph(#[from] engine::GraphError),
}
