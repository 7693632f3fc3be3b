//! Document repositories — one trait, one implementation per medium.
//!
//! Every method returns a `Result<T, StorageError>`.  No graph logic lives
//! here; the helpers below only call the engine's serializer.

mod file;
mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use engine::{GraphStore, PortableDocument};

use crate::{models::WorkflowSummary, StorageError, StoredWorkflow};

pub use file::FileDocumentStore;
pub use memory::InMemoryDocumentStore;

/// Where exported workflow documents are kept.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `document` under a new id.
    async fn save(&self, name: &str, document: PortableDocument) -> Result<StoredWorkflow, StorageError>;

    /// Replace the document of an existing workflow, keeping its id and name.
    async fn update(&self, id: Uuid, document: PortableDocument) -> Result<StoredWorkflow, StorageError>;

    /// Fetch a single workflow.
    async fn load(&self, id: Uuid) -> Result<StoredWorkflow, StorageError>;

    /// All workflows, newest first.
    async fn list(&self) -> Result<Vec<WorkflowSummary>, StorageError>;

    /// Permanently delete a workflow.
    ///
    /// Returns `StorageError::NotFound` if nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<(), StorageError>;
}

/// Export `graph` and save it under `name`.
pub async fn save_graph(
    store: &dyn DocumentStore,
    name: &str,
    graph: &GraphStore,
) -> Result<StoredWorkflow, StorageError> {
    store.save(name, engine::serialize(graph)).await
}

/// Load a workflow and import it back into a graph.
pub async fn load_graph(store: &dyn DocumentStore, id: Uuid) -> Result<GraphStore, StorageError> {
    let stored = store.load(id).await?;
    Ok(engine::deserialize(stored.document)?)
}
