//! File-backed document store: one pretty-printed JSON file per workflow.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use engine::PortableDocument;

use crate::{models::WorkflowSummary, StorageError, StoredWorkflow};

use super::DocumentStore;

#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    dir: PathBuf,
}

impl FileDocumentStore {
    /// Use `dir` for storage, creating it if needed.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        info!("Using workflow directory {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.workflow.json"))
    }

    async fn write(&self, stored: &StoredWorkflow) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(stored)?;
        tokio::fs::write(self.path_for(stored.id), bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    #[instrument(skip(self, document), fields(dir = %self.dir.display()))]
    async fn save(&self, name: &str, document: PortableDocument) -> Result<StoredWorkflow, StorageError> {
        let stored = StoredWorkflow::new(name, document);
        self.write(&stored).await?;
        info!("saved workflow {}", stored.id);
        Ok(stored)
    }

    #[instrument(skip(self, document))]
    async fn update(&self, id: Uuid, document: PortableDocument) -> Result<StoredWorkflow, StorageError> {
        let mut stored = self.load(id).await?;
        stored.document = document;
        stored.saved_at = Utc::now();
        self.write(&stored).await?;
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn load(&self, id: Uuid) -> Result<StoredWorkflow, StorageError> {
        let bytes = match tokio::fs::read(self.path_for(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StorageError::NotFound(id)),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<WorkflowSummary>, StorageError> {
        let mut summaries = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_workflow = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".workflow.json"));
            if !is_workflow {
                continue;
            }

            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<StoredWorkflow>(&bytes) {
                Ok(stored) => summaries.push(WorkflowSummary::from(&stored)),
                Err(e) => warn!("skipping unreadable workflow file {}: {}", path.display(), e),
            }
        }

        summaries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(summaries)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }
}
