//! `storage` crate — the persistence collaborator for workflow documents.
//!
//! Saves, lists, loads and deletes named [`PortableDocument`]s.  The graph
//! engine never calls in here; callers load on open and save on export.
//!
//! [`PortableDocument`]: engine::PortableDocument

pub mod error;
pub mod models;
pub mod repository;

pub use error::StorageError;
pub use models::{StoredWorkflow, WorkflowSummary};
pub use repository::{load_graph, save_graph, DocumentStore, FileDocumentStore, InMemoryDocumentStore};
