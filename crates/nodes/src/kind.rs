//! The closed set of workflow node kinds and their edge capabilities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SchemaError;

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// The category of a workflow node.
///
/// Serialised with the editor's spelling: `evaluatorOptimizer` is camel-case,
/// every other kind is a single lower-case word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// A single LLM agent with an instruction and attached servers.
    Agent,
    /// Runs a sequence of agents one after another.
    Chain,
    /// Fans work out to several agents and optionally fans the results in.
    Parallel,
    /// Routes a request to one of several agents.
    Router,
    /// Generator/evaluator refinement loop.
    EvaluatorOptimizer,
    /// Plans and delegates work across agents.
    Orchestrator,
    /// A tool/data provider (MCP server) that agents attach to.
    Server,
}

impl NodeKind {
    /// Every kind, in palette order.
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Agent,
        NodeKind::Chain,
        NodeKind::Parallel,
        NodeKind::Router,
        NodeKind::EvaluatorOptimizer,
        NodeKind::Orchestrator,
        NodeKind::Server,
    ];

    /// Wire spelling of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Agent => "agent",
            NodeKind::Chain => "chain",
            NodeKind::Parallel => "parallel",
            NodeKind::Router => "router",
            NodeKind::EvaluatorOptimizer => "evaluatorOptimizer",
            NodeKind::Orchestrator => "orchestrator",
            NodeKind::Server => "server",
        }
    }

    /// Whether an edge may start at a node of this kind.
    pub fn can_originate(self) -> bool {
        OUTGOING_CAPABLE.contains(&self)
    }

    /// Whether an edge may end at a node of this kind.
    pub fn can_receive(self) -> bool {
        INCOMING_CAPABLE.contains(&self)
    }

    /// The kind's role in the graph, derived from the capability sets.
    pub fn role(self) -> NodeRole {
        match (self.can_originate(), self.can_receive()) {
            (true, true) => NodeRole::PassThrough,
            (true, false) => NodeRole::SourceOnly,
            (false, true) => NodeRole::SinkOnly,
            // Every kind is in at least one capability set.
            (false, false) => NodeRole::Isolated,
        }
    }

    /// Kinds that coordinate other agents by name.
    pub fn is_workflow(self) -> bool {
        !matches!(self, NodeKind::Agent | NodeKind::Server)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownKind(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Capability sets
// ---------------------------------------------------------------------------

/// Kinds permitted to originate an edge.  `server` is absent.
pub const OUTGOING_CAPABLE: [NodeKind; 6] = [
    NodeKind::Agent,
    NodeKind::Chain,
    NodeKind::Parallel,
    NodeKind::Router,
    NodeKind::EvaluatorOptimizer,
    NodeKind::Orchestrator,
];

/// Kinds permitted to terminate an edge.  `agent` is absent.
pub const INCOMING_CAPABLE: [NodeKind; 6] = [
    NodeKind::Chain,
    NodeKind::Parallel,
    NodeKind::Router,
    NodeKind::EvaluatorOptimizer,
    NodeKind::Orchestrator,
    NodeKind::Server,
];

/// How a kind participates in edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// Only produces (agents).
    SourceOnly,
    /// Only consumes/configures (servers).
    SinkOnly,
    /// Both receives and originates edges (workflow kinds).
    PassThrough,
    /// Neither; unused by the current capability sets.
    Isolated,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SourceOnly => "source-only",
            Self::SinkOnly => "sink-only",
            Self::PassThrough => "pass-through",
            Self::Isolated => "isolated",
        };
        f.pad(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_their_wire_names() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.as_str().parse::<NodeKind>().unwrap(), kind);
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().into()));
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(matches!(
            "evaluator_optimizer".parse::<NodeKind>(),
            Err(SchemaError::UnknownKind(s)) if s == "evaluator_optimizer"
        ));
        assert!("Agent".parse::<NodeKind>().is_err());
    }

    #[test]
    fn roles_follow_capability_sets() {
        assert_eq!(NodeKind::Agent.role(), NodeRole::SourceOnly);
        assert_eq!(NodeKind::Server.role(), NodeRole::SinkOnly);
        for kind in [
            NodeKind::Chain,
            NodeKind::Parallel,
            NodeKind::Router,
            NodeKind::EvaluatorOptimizer,
            NodeKind::Orchestrator,
        ] {
            assert_eq!(kind.role(), NodeRole::PassThrough, "{kind}");
            assert!(kind.is_workflow());
        }
    }
}
