//! In-process document store, used by tests and short-lived sessions.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use engine::PortableDocument;

use crate::{models::WorkflowSummary, StorageError, StoredWorkflow};

use super::DocumentStore;

#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    data: RwLock<HashMap<Uuid, StoredWorkflow>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn save(&self, name: &str, document: PortableDocument) -> Result<StoredWorkflow, StorageError> {
        let stored = StoredWorkflow::new(name, document);
        self.data.write().await.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: Uuid, document: PortableDocument) -> Result<StoredWorkflow, StorageError> {
        let mut data = self.data.write().await;
        let stored = data.get_mut(&id).ok_or(StorageError::NotFound(id))?;
        stored.document = document;
        stored.saved_at = Utc::now();
        Ok(stored.clone())
    }

    async fn load(&self, id: Uuid) -> Result<StoredWorkflow, StorageError> {
        self.data
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<WorkflowSummary>, StorageError> {
        let mut summaries: Vec<WorkflowSummary> =
            self.data.read().await.values().map(WorkflowSummary::from).collect();
        summaries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(summaries)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        self.data
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound(id))
    }
}
