//! Node schema registry.
//!
//! Declares, per kind, which fields an attribute record carries, their JSON
//! shape and whether they are required.  Used to seed new nodes and to vet
//! attribute edits and imported documents before they reach the graph.

use serde_json::Value;

use crate::{FieldIssue, NodeAttributes, NodeKind, SchemaError};

/// The JSON shape a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A string.
    Text,
    /// An array of strings.
    TextList,
    /// A string or a number.
    Rating,
    /// A non-negative integer.
    Count,
    /// Exactly `"full"` or `"iterative"`.
    PlanType,
}

impl FieldType {
    /// Whether `value` has this shape.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldType::Text => value.is_string(),
            FieldType::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldType::Rating => value.is_string() || value.is_number(),
            FieldType::Count => value.is_u64(),
            FieldType::PlanType => matches!(value.as_str(), Some("full" | "iterative")),
        }
    }

    /// Human description used in validation messages.
    pub fn describe(self) -> &'static str {
        match self {
            FieldType::Text => "a string",
            FieldType::TextList => "a list of strings",
            FieldType::Rating => "a string or a number",
            FieldType::Count => "a non-negative integer",
            FieldType::PlanType => "\"full\" or \"iterative\"",
        }
    }

    /// The empty value a freshly added node starts with.
    pub fn default_value(self) -> Value {
        match self {
            FieldType::Text | FieldType::Rating => Value::String(String::new()),
            FieldType::TextList => Value::Array(Vec::new()),
            FieldType::Count => Value::from(0u64),
            FieldType::PlanType => Value::String("full".into()),
        }
    }
}

/// One field of a kind's attribute record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
}

const fn required(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec { name, field_type, required: true }
}

const fn optional(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec { name, field_type, required: false }
}

const AGENT: &[FieldSpec] = &[
    required("instruction", FieldType::Text),
    optional("model", FieldType::Text),
    required("servers", FieldType::TextList),
];
const CHAIN: &[FieldSpec] = &[required("sequence", FieldType::TextList)];
const PARALLEL: &[FieldSpec] = &[
    required("fan_out", FieldType::TextList),
    optional("fan_in", FieldType::Text),
];
const ROUTER: &[FieldSpec] = &[required("agents", FieldType::TextList)];
const EVALUATOR_OPTIMIZER: &[FieldSpec] = &[
    required("generator", FieldType::Text),
    required("evaluator", FieldType::Text),
    required("min_rating", FieldType::Rating),
    required("max_refinements", FieldType::Count),
];
const ORCHESTRATOR: &[FieldSpec] = &[
    required("plan_type", FieldType::PlanType),
    required("agents", FieldType::TextList),
];
const SERVER: &[FieldSpec] = &[
    required("name", FieldType::Text),
    required("transport", FieldType::Text),
    optional("url", FieldType::Text),
];

/// The field list for `kind`, in editor order.
pub fn schema(kind: NodeKind) -> &'static [FieldSpec] {
    match kind {
        NodeKind::Agent => AGENT,
        NodeKind::Chain => CHAIN,
        NodeKind::Parallel => PARALLEL,
        NodeKind::Router => ROUTER,
        NodeKind::EvaluatorOptimizer => EVALUATOR_OPTIMIZER,
        NodeKind::Orchestrator => ORCHESTRATOR,
        NodeKind::Server => SERVER,
    }
}

/// Fully-populated default attributes for `kind`.
pub fn default_attributes(kind: NodeKind) -> NodeAttributes {
    NodeAttributes::default_for(kind)
}

/// Check a raw attribute record against `kind`'s schema.
///
/// Every problem is collected; the record is closed, so fields the kind does
/// not declare are reported too.  Optional fields may be absent or `null`.
///
/// # Errors
/// [`SchemaError::InvalidAttributes`] listing each [`FieldIssue`].
pub fn validate_attributes(kind: NodeKind, record: &Value) -> Result<(), SchemaError> {
    let Some(map) = record.as_object() else {
        return Err(SchemaError::InvalidAttributes {
            kind,
            issues: vec![FieldIssue::NotAnObject],
        });
    };

    let fields = schema(kind);
    let mut issues = Vec::new();

    for spec in fields {
        match map.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    issues.push(FieldIssue::Missing { field: spec.name.to_owned() });
                }
            }
            Some(value) if !spec.field_type.accepts(value) => {
                issues.push(FieldIssue::WrongShape {
                    field: spec.name.to_owned(),
                    expected: spec.field_type.describe(),
                });
            }
            Some(_) => {}
        }
    }

    for name in map.keys() {
        if !fields.iter().any(|spec| spec.name == name) {
            issues.push(FieldIssue::Unknown { field: name.clone() });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::InvalidAttributes { kind, issues })
    }
}
