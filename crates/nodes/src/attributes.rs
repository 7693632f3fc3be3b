//! Per-kind attribute records.
//!
//! Each kind has its own closed struct; [`NodeAttributes`] is the tagged
//! union the graph stores.  On the wire the attributes are a flat JSON object
//! and the kind travels next to it, so conversion goes through
//! [`NodeAttributes::from_record`] / [`NodeAttributes::to_record`] rather
//! than a serde tag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::validate_attributes;
use crate::{FieldIssue, NodeKind, SchemaError};

// ---------------------------------------------------------------------------
// Kind-specific records
// ---------------------------------------------------------------------------

/// A single agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentAttributes {
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Names of the servers this agent attaches to.
    pub servers: Vec<String>,
}

/// Agents run in order, each receiving the previous output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainAttributes {
    pub sequence: Vec<String>,
}

/// Agents run concurrently; `fan_in` merges their results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParallelAttributes {
    pub fan_out: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan_in: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterAttributes {
    pub agents: Vec<String>,
}

/// Minimum quality the evaluator must award before refinement stops.
///
/// The editor stores either a rating word (`"GOOD"`) or a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinRating {
    Score(serde_json::Number),
    Level(String),
}

impl MinRating {
    /// True for the empty rating word the palette seeds.
    pub fn is_blank(&self) -> bool {
        matches!(self, MinRating::Level(level) if level.trim().is_empty())
    }
}

impl Default for MinRating {
    fn default() -> Self {
        MinRating::Level(String::new())
    }
}

impl From<MinRating> for Value {
    fn from(rating: MinRating) -> Self {
        match rating {
            MinRating::Score(n) => Value::Number(n),
            MinRating::Level(s) => Value::String(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluatorOptimizerAttributes {
    pub generator: String,
    pub evaluator: String,
    pub min_rating: MinRating,
    pub max_refinements: u64,
}

/// How an orchestrator plans its work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    /// Plan every step up front.
    #[default]
    Full,
    /// Plan one step at a time.
    Iterative,
}

impl PlanType {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanType::Full => "full",
            PlanType::Iterative => "iterative",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrchestratorAttributes {
    pub plan_type: PlanType,
    pub agents: Vec<String>,
}

/// An MCP server that agents attach to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerAttributes {
    pub name: String,
    pub transport: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// NodeAttributes
// ---------------------------------------------------------------------------

/// The attribute record of a node, one variant per [`NodeKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAttributes {
    Agent(AgentAttributes),
    Chain(ChainAttributes),
    Parallel(ParallelAttributes),
    Router(RouterAttributes),
    EvaluatorOptimizer(EvaluatorOptimizerAttributes),
    Orchestrator(OrchestratorAttributes),
    Server(ServerAttributes),
}

impl NodeAttributes {
    /// The kind these attributes belong to.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeAttributes::Agent(_) => NodeKind::Agent,
            NodeAttributes::Chain(_) => NodeKind::Chain,
            NodeAttributes::Parallel(_) => NodeKind::Parallel,
            NodeAttributes::Router(_) => NodeKind::Router,
            NodeAttributes::EvaluatorOptimizer(_) => NodeKind::EvaluatorOptimizer,
            NodeAttributes::Orchestrator(_) => NodeKind::Orchestrator,
            NodeAttributes::Server(_) => NodeKind::Server,
        }
    }

    /// Fully-populated, empty-valued attributes for `kind`.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Agent => NodeAttributes::Agent(AgentAttributes {
                instruction: String::new(),
                model: Some(String::new()),
                servers: Vec::new(),
            }),
            NodeKind::Chain => NodeAttributes::Chain(ChainAttributes {
                sequence: Vec::new(),
            }),
            NodeKind::Parallel => NodeAttributes::Parallel(ParallelAttributes {
                fan_out: Vec::new(),
                fan_in: Some(String::new()),
            }),
            NodeKind::Router => NodeAttributes::Router(RouterAttributes {
                agents: Vec::new(),
            }),
            NodeKind::EvaluatorOptimizer => {
                NodeAttributes::EvaluatorOptimizer(EvaluatorOptimizerAttributes {
                    generator: String::new(),
                    evaluator: String::new(),
                    min_rating: MinRating::default(),
                    max_refinements: 0,
                })
            }
            NodeKind::Orchestrator => NodeAttributes::Orchestrator(OrchestratorAttributes {
                plan_type: PlanType::Full,
                agents: Vec::new(),
            }),
            NodeKind::Server => NodeAttributes::Server(ServerAttributes {
                name: String::new(),
                transport: String::new(),
                url: Some(String::new()),
            }),
        }
    }

    /// Validate a raw record against `kind`'s schema and decode it.
    pub fn from_record(kind: NodeKind, record: &Value) -> Result<Self, SchemaError> {
        validate_attributes(kind, record)?;

        let decode_failed = |e: serde_json::Error| SchemaError::InvalidAttributes {
            kind,
            issues: vec![FieldIssue::Undecodable(e.to_string())],
        };
        let record = record.clone();

        let attributes = match kind {
            NodeKind::Agent => NodeAttributes::Agent(serde_json::from_value(record).map_err(decode_failed)?),
            NodeKind::Chain => NodeAttributes::Chain(serde_json::from_value(record).map_err(decode_failed)?),
            NodeKind::Parallel => {
                NodeAttributes::Parallel(serde_json::from_value(record).map_err(decode_failed)?)
            }
            NodeKind::Router => NodeAttributes::Router(serde_json::from_value(record).map_err(decode_failed)?),
            NodeKind::EvaluatorOptimizer => {
                NodeAttributes::EvaluatorOptimizer(serde_json::from_value(record).map_err(decode_failed)?)
            }
            NodeKind::Orchestrator => {
                NodeAttributes::Orchestrator(serde_json::from_value(record).map_err(decode_failed)?)
            }
            NodeKind::Server => NodeAttributes::Server(serde_json::from_value(record).map_err(decode_failed)?),
        };
        Ok(attributes)
    }

    /// Flat JSON record of these attributes.  Absent optionals are omitted.
    pub fn to_record(&self) -> Value {
        let mut map = Map::new();
        match self {
            NodeAttributes::Agent(a) => {
                map.insert("instruction".into(), a.instruction.clone().into());
                put_optional(&mut map, "model", &a.model);
                map.insert("servers".into(), a.servers.clone().into());
            }
            NodeAttributes::Chain(c) => {
                map.insert("sequence".into(), c.sequence.clone().into());
            }
            NodeAttributes::Parallel(p) => {
                map.insert("fan_out".into(), p.fan_out.clone().into());
                put_optional(&mut map, "fan_in", &p.fan_in);
            }
            NodeAttributes::Router(r) => {
                map.insert("agents".into(), r.agents.clone().into());
            }
            NodeAttributes::EvaluatorOptimizer(e) => {
                map.insert("generator".into(), e.generator.clone().into());
                map.insert("evaluator".into(), e.evaluator.clone().into());
                map.insert("min_rating".into(), e.min_rating.clone().into());
                map.insert("max_refinements".into(), e.max_refinements.into());
            }
            NodeAttributes::Orchestrator(o) => {
                map.insert("plan_type".into(), o.plan_type.as_str().into());
                map.insert("agents".into(), o.agents.clone().into());
            }
            NodeAttributes::Server(s) => {
                map.insert("name".into(), s.name.clone().into());
                map.insert("transport".into(), s.transport.clone().into());
                put_optional(&mut map, "url", &s.url);
            }
        }
        Value::Object(map)
    }

    /// Merge `patch` over these attributes and re-validate the result.
    ///
    /// A `null` in the patch clears an optional field; clearing a required
    /// field is reported as missing.  `self` is never modified.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<Self, SchemaError> {
        let mut record = match self.to_record() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (field, value) in patch {
            record.insert(field.clone(), value.clone());
        }
        NodeAttributes::from_record(self.kind(), &Value::Object(record))
    }

    /// Names of other agents this node coordinates, in declaration order.
    ///
    /// Blank entries name nothing and are left out.
    pub fn referenced_agents(&self) -> Vec<&str> {
        let names: Vec<&str> = match self {
            NodeAttributes::Agent(_) | NodeAttributes::Server(_) => Vec::new(),
            NodeAttributes::Chain(c) => c.sequence.iter().map(String::as_str).collect(),
            NodeAttributes::Parallel(p) => p
                .fan_out
                .iter()
                .chain(p.fan_in.iter())
                .map(String::as_str)
                .collect(),
            NodeAttributes::Router(r) => r.agents.iter().map(String::as_str).collect(),
            NodeAttributes::EvaluatorOptimizer(e) => vec![e.generator.as_str(), e.evaluator.as_str()],
            NodeAttributes::Orchestrator(o) => o.agents.iter().map(String::as_str).collect(),
        };
        names.into_iter().filter(|name| !name.trim().is_empty()).collect()
    }
}

fn put_optional(map: &mut Map<String, Value>, field: &str, value: &Option<String>) {
    if let Some(v) = value {
        map.insert(field.to_owned(), v.clone().into());
    }
}
