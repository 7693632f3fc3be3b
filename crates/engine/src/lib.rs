//! `engine` crate — the workflow graph model, connection rules, import/export,
//! and execution-readiness checks.

pub mod models;
pub mod error;
pub mod connection;
pub mod store;
pub mod serializer;
pub mod dag;
pub mod readiness;
pub mod templates;

pub use models::{Edge, Node, PortableDocument, Position, FORMAT_VERSION};
pub use error::GraphError;
pub use connection::{check_connection, is_valid_connection, ConnectionRejection};
pub use store::{GraphStore, StoreConfig};
pub use serializer::{deserialize, deserialize_with, from_json, serialize, to_json};
pub use dag::topological_order;
pub use readiness::{check_readiness, IssueKind, ReadinessIssue, ReadinessReport, Severity};
pub use templates::{template, TEMPLATE_NAMES};

#[cfg(test)]
mod store_tests;
