//! Execution-readiness check.
//!
//! A graph the store accepts is structurally sound, but the external agent
//! runtime also needs instructions, member lists and resolvable names.  This
//! module reports what is still missing without rejecting anything.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use nodes::{NodeAttributes, NodeKind};

use crate::dag::topological_order;
use crate::models::Node;
use crate::{GraphError, GraphStore};

/// How serious a readiness issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth fixing, but the runtime can still start.
    Warning,
    /// The runtime cannot execute the graph.
    Error,
}

/// What is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueKind {
    /// The graph has no nodes at all.
    EmptyGraph,
    /// A required text field is blank.
    BlankField { field: &'static str },
    /// A member list that needs at least one entry is empty.
    EmptyList { field: &'static str },
    /// A name list holds a blank entry.
    BlankEntry { field: &'static str },
    /// A referenced agent name matches no agent or workflow node.
    UnknownAgent { name: String },
    /// An agent lists a server that no server node provides.
    UnknownServer { name: String },
    /// The node has no edges although the graph has other nodes.
    Disconnected,
    /// The node lies on, or downstream of, a directed cycle.
    Cycle,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::EmptyGraph
            | IssueKind::BlankField { .. }
            | IssueKind::EmptyList { .. }
            | IssueKind::BlankEntry { .. }
            | IssueKind::Cycle => Severity::Error,
            IssueKind::UnknownAgent { .. }
            | IssueKind::UnknownServer { .. }
            | IssueKind::Disconnected => Severity::Warning,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGraph => write!(f, "the workflow has no nodes"),
            Self::BlankField { field } => write!(f, "'{field}' is blank"),
            Self::EmptyList { field } => write!(f, "'{field}' needs at least one entry"),
            Self::BlankEntry { field } => write!(f, "'{field}' contains a blank name"),
            Self::UnknownAgent { name } => write!(f, "no agent or workflow is named '{name}'"),
            Self::UnknownServer { name } => write!(f, "no server is named '{name}'"),
            Self::Disconnected => write!(f, "node is not connected to anything"),
            Self::Cycle => write!(f, "node is part of, or follows, a cycle"),
        }
    }
}

/// A single finding, optionally tied to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessIssue {
    pub node_id: Option<String>,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl ReadinessIssue {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for ReadinessIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity() {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.node_id {
            Some(id) => write!(f, "{severity}: node '{id}': {}", self.kind),
            None => write!(f, "{severity}: {}", self.kind),
        }
    }
}

/// Outcome of [`check_readiness`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadinessReport {
    pub issues: Vec<ReadinessIssue>,
    /// Topological order of node ids; `None` when the graph has a cycle.
    pub execution_order: Option<Vec<String>>,
}

impl ReadinessReport {
    /// No error-severity issues.
    pub fn is_ready(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ReadinessIssue> {
        self.issues.iter().filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ReadinessIssue> {
        self.issues.iter().filter(|i| i.severity() == Severity::Warning)
    }
}

/// Inspect a graph for everything the runtime would trip over.
pub fn check_readiness(graph: &GraphStore) -> ReadinessReport {
    let mut issues = Vec::new();

    if graph.is_empty() {
        issues.push(ReadinessIssue { node_id: None, kind: IssueKind::EmptyGraph });
        return ReadinessReport {
            issues,
            execution_order: Some(Vec::new()),
        };
    }

    // Agents and workflows are addressed by label; servers by their name.
    let agent_names: HashSet<&str> = graph
        .nodes()
        .iter()
        .filter(|n| n.kind() != NodeKind::Server)
        .map(|n| n.label.as_str())
        .collect();
    let server_names: HashSet<&str> = graph
        .nodes()
        .iter()
        .filter_map(|n| match &n.attributes {
            NodeAttributes::Server(s) if !s.name.trim().is_empty() => Some(s.name.as_str()),
            _ => None,
        })
        .collect();

    for node in graph.nodes() {
        let mut push = |kind: IssueKind| {
            issues.push(ReadinessIssue {
                node_id: Some(node.id.clone()),
                kind,
            })
        };

        for kind in field_issues(node) {
            push(kind);
        }

        for name in node.attributes.referenced_agents() {
            if !agent_names.contains(name) {
                push(IssueKind::UnknownAgent { name: name.to_owned() });
            }
        }

        if let NodeAttributes::Agent(agent) = &node.attributes {
            for server in agent.servers.iter().filter(|s| !s.trim().is_empty()) {
                if !server_names.contains(server.as_str()) {
                    push(IssueKind::UnknownServer { name: server.clone() });
                }
            }
        }

        if graph.node_count() > 1 && !graph.edges().iter().any(|e| e.touches(&node.id)) {
            push(IssueKind::Disconnected);
        }
    }

    let execution_order = match topological_order(graph) {
        Ok(order) => Some(order),
        Err(GraphError::CycleDetected { nodes }) => {
            issues.extend(nodes.into_iter().map(|id| ReadinessIssue {
                node_id: Some(id),
                kind: IssueKind::Cycle,
            }));
            None
        }
        Err(_) => None,
    };

    ReadinessReport {
        issues,
        execution_order,
    }
}

/// Blank required values for the node's kind.
fn field_issues(node: &Node) -> Vec<IssueKind> {
    let mut found = Vec::new();
    let mut blank = |field: &'static str, value: &str| {
        if value.trim().is_empty() {
            found.push(IssueKind::BlankField { field });
        }
    };

    match &node.attributes {
        NodeAttributes::Agent(a) => blank("instruction", &a.instruction),
        NodeAttributes::Server(s) => {
            blank("name", &s.name);
            blank("transport", &s.transport);
        }
        NodeAttributes::EvaluatorOptimizer(e) => {
            blank("generator", &e.generator);
            blank("evaluator", &e.evaluator);
        }
        NodeAttributes::Chain(_)
        | NodeAttributes::Parallel(_)
        | NodeAttributes::Router(_)
        | NodeAttributes::Orchestrator(_) => {}
    }

    let empty_list = match &node.attributes {
        NodeAttributes::Chain(c) if c.sequence.is_empty() => Some("sequence"),
        NodeAttributes::Parallel(p) if p.fan_out.is_empty() => Some("fan_out"),
        NodeAttributes::Router(r) if r.agents.is_empty() => Some("agents"),
        NodeAttributes::Orchestrator(o) if o.agents.is_empty() => Some("agents"),
        _ => None,
    };
    if let Some(field) = empty_list {
        found.push(IssueKind::EmptyList { field });
    }

    let name_list: Option<(&'static str, &[String])> = match &node.attributes {
        NodeAttributes::Agent(a) => Some(("servers", a.servers.as_slice())),
        NodeAttributes::Chain(c) => Some(("sequence", c.sequence.as_slice())),
        NodeAttributes::Parallel(p) => Some(("fan_out", p.fan_out.as_slice())),
        NodeAttributes::Router(r) => Some(("agents", r.agents.as_slice())),
        NodeAttributes::Orchestrator(o) => Some(("agents", o.agents.as_slice())),
        NodeAttributes::EvaluatorOptimizer(_) | NodeAttributes::Server(_) => None,
    };
    if let Some((field, names)) = name_list {
        if names.iter().any(|name| name.trim().is_empty()) {
            found.push(IssueKind::BlankEntry { field });
        }
    }

    found
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;
    use serde_json::json;

    fn patch(graph: &mut GraphStore, id: &str, value: serde_json::Value) {
        graph
            .update_node_attributes(id, value.as_object().unwrap())
            .unwrap();
    }

    fn kinds_for<'a>(report: &'a ReadinessReport, id: &str) -> Vec<&'a IssueKind> {
        report
            .issues
            .iter()
            .filter(|i| i.node_id.as_deref() == Some(id))
            .map(|i| &i.kind)
            .collect()
    }

    #[test]
    fn empty_graph_is_not_ready() {
        let report = check_readiness(&GraphStore::default());
        assert!(!report.is_ready());
        assert_eq!(report.issues[0].kind, IssueKind::EmptyGraph);
    }

    #[test]
    fn fresh_palette_nodes_report_blank_fields() {
        let mut graph = GraphStore::default();
        let agent = graph.add_node_from_palette(NodeKind::Agent, Position::default()).unwrap();
        let eo = graph.add_node_from_palette(NodeKind::EvaluatorOptimizer, Position::default()).unwrap();
        graph.add_edge(&agent, &eo).unwrap();

        let report = check_readiness(&graph);
        assert!(!report.is_ready());
        assert_eq!(
            kinds_for(&report, &agent),
            vec![&IssueKind::BlankField { field: "instruction" }]
        );
        assert_eq!(
            kinds_for(&report, &eo),
            vec![
                &IssueKind::BlankField { field: "generator" },
                &IssueKind::BlankField { field: "evaluator" },
            ]
        );
    }

    #[test]
    fn complete_chain_is_ready() {
        let mut graph = GraphStore::default();
        let agent = graph.add_node_from_palette(NodeKind::Agent, Position::default()).unwrap();
        let server = graph.add_node_from_palette(NodeKind::Server, Position::default()).unwrap();
        let chain = graph.add_node_from_palette(NodeKind::Chain, Position::default()).unwrap();
        patch(&mut graph, &agent, json!({ "instruction": "summarize", "servers": ["fetch"] }));
        patch(&mut graph, &server, json!({ "name": "fetch", "transport": "stdio" }));
        patch(&mut graph, &chain, json!({ "sequence": ["Basic Agent"] }));
        graph.add_edge(&agent, &chain).unwrap();
        graph.add_edge(&agent, &server).unwrap();

        let report = check_readiness(&graph);
        assert!(report.is_ready(), "{:?}", report.issues);
        assert_eq!(report.warnings().count(), 0);
        assert_eq!(report.execution_order, Some(vec![agent, chain, server]));
    }

    #[test]
    fn unresolved_names_are_warnings() {
        let mut graph = GraphStore::default();
        let agent = graph.add_node_from_palette(NodeKind::Agent, Position::default()).unwrap();
        let router = graph.add_node_from_palette(NodeKind::Router, Position::default()).unwrap();
        patch(&mut graph, &agent, json!({ "instruction": "hi", "servers": ["brave"] }));
        patch(&mut graph, &router, json!({ "agents": ["Basic Agent", "ghost"] }));
        graph.add_edge(&agent, &router).unwrap();

        let report = check_readiness(&graph);
        assert!(report.is_ready());
        assert_eq!(
            kinds_for(&report, &agent),
            vec![&IssueKind::UnknownServer { name: "brave".into() }]
        );
        assert_eq!(
            kinds_for(&report, &router),
            vec![&IssueKind::UnknownAgent { name: "ghost".into() }]
        );
    }

    #[test]
    fn blank_names_are_reported_once_as_blank_entries() {
        let mut graph = GraphStore::default();
        let agent = graph.add_node_from_palette(NodeKind::Agent, Position::default()).unwrap();
        let chain = graph.add_node_from_palette(NodeKind::Chain, Position::default()).unwrap();
        patch(&mut graph, &agent, json!({ "instruction": "hi", "servers": [" "] }));
        patch(&mut graph, &chain, json!({ "sequence": ["", "Basic Agent"] }));
        graph.add_edge(&agent, &chain).unwrap();

        let report = check_readiness(&graph);
        assert!(!report.is_ready());
        assert_eq!(
            kinds_for(&report, &agent),
            vec![&IssueKind::BlankEntry { field: "servers" }]
        );
        assert_eq!(
            kinds_for(&report, &chain),
            vec![&IssueKind::BlankEntry { field: "sequence" }]
        );
    }

    #[test]
    fn disconnected_and_cyclic_nodes_are_flagged() {
        let mut graph = GraphStore::default();
        let c1 = graph.add_node_from_palette(NodeKind::Chain, Position::default()).unwrap();
        let c2 = graph.add_node_from_palette(NodeKind::Chain, Position::default()).unwrap();
        let lone = graph.add_node_from_palette(NodeKind::Orchestrator, Position::default()).unwrap();
        graph.add_edge(&c1, &c2).unwrap();
        graph.add_edge(&c2, &c1).unwrap();

        let report = check_readiness(&graph);
        assert_eq!(report.execution_order, None);
        assert!(kinds_for(&report, &c1).contains(&&IssueKind::Cycle));
        assert!(kinds_for(&report, &lone).contains(&&IssueKind::Disconnected));
        assert!(kinds_for(&report, &lone).contains(&&IssueKind::EmptyList { field: "agents" }));
    }

    #[test]
    fn issues_render_with_severity_and_node() {
        let issue = ReadinessIssue {
            node_id: Some("n3".into()),
            kind: IssueKind::UnknownAgent { name: "ghost".into() },
        };
        assert_eq!(issue.to_string(), "warning: node 'n3': no agent or workflow is named 'ghost'");
    }
}
