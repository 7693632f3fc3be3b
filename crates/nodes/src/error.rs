//! Schema-level error types.

use thiserror::Error;

use crate::NodeKind;

/// A single problem found while checking an attribute record against its
/// kind's schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldIssue {
    /// The record itself is not a JSON object.
    #[error("attributes must be an object")]
    NotAnObject,

    /// A required field is absent or `null`.
    #[error("missing required field '{field}'")]
    Missing { field: String },

    /// The field is present but has the wrong JSON shape.
    #[error("field '{field}' must be {expected}")]
    WrongShape {
        field: String,
        expected: &'static str,
    },

    /// The record names a field the kind does not declare.
    #[error("unknown field '{field}'")]
    Unknown { field: String },

    /// Passed the shape checks but serde still refused it.
    #[error("attributes could not be decoded: {0}")]
    Undecodable(String),
}

/// Errors produced by the node schema registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The string does not name one of the seven node kinds.
    #[error("unknown node kind '{0}'")]
    UnknownKind(String),

    /// The attribute record violates its kind's schema.
    #[error("invalid {kind} attributes: {}", join_issues(.issues))]
    InvalidAttributes {
        kind: NodeKind,
        issues: Vec<FieldIssue>,
    },

    /// Attributes of one kind were supplied where another was declared.
    #[error("attributes for '{found}' cannot be used on a '{expected}' node")]
    KindMismatch { expected: NodeKind, found: NodeKind },
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
