//! `nodes` crate — node kinds, their attribute schemas, and the editor palette.
//!
//! Every workflow node belongs to one [`NodeKind`] and carries the matching
//! [`NodeAttributes`] variant.  The graph engine consults this crate to seed
//! new nodes and to validate attribute edits and imported documents.

pub mod error;
pub mod kind;
pub mod attributes;
pub mod schema;
pub mod catalog;

pub use error::{FieldIssue, SchemaError};
pub use kind::{NodeKind, NodeRole, INCOMING_CAPABLE, OUTGOING_CAPABLE};
pub use attributes::{
    AgentAttributes, ChainAttributes, EvaluatorOptimizerAttributes, MinRating, NodeAttributes,
    OrchestratorAttributes, ParallelAttributes, PlanType, RouterAttributes, ServerAttributes,
};
pub use schema::{default_attributes, schema, validate_attributes, FieldSpec, FieldType};
pub use catalog::{catalog, PaletteEntry, PaletteGroup};
