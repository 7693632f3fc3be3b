//! The editor palette: one entry per node kind, grouped by tab.

use serde::Serialize;

use crate::{NodeAttributes, NodeKind};

/// Palette tab an entry is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteGroup {
    Agents,
    Workflows,
    Servers,
}

/// A node the user can add from the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub kind: NodeKind,
    pub group: PaletteGroup,
    /// Label given to a freshly added node.
    pub label: &'static str,
    pub description: &'static str,
}

impl PaletteEntry {
    /// Attributes a node added from this entry starts with.
    pub fn default_attributes(&self) -> NodeAttributes {
        NodeAttributes::default_for(self.kind)
    }
}

static CATALOG: [PaletteEntry; 7] = [
    PaletteEntry {
        kind: NodeKind::Agent,
        group: PaletteGroup::Agents,
        label: "Basic Agent",
        description: "A simple agent that responds to user queries",
    },
    PaletteEntry {
        kind: NodeKind::Chain,
        group: PaletteGroup::Workflows,
        label: "Chain Workflow",
        description: "Chain multiple agents together in sequence",
    },
    PaletteEntry {
        kind: NodeKind::Router,
        group: PaletteGroup::Workflows,
        label: "Router Workflow",
        description: "Route messages to different agents based on content",
    },
    PaletteEntry {
        kind: NodeKind::Parallel,
        group: PaletteGroup::Workflows,
        label: "Parallel Workflow",
        description: "Run multiple agents in parallel and combine results",
    },
    PaletteEntry {
        kind: NodeKind::EvaluatorOptimizer,
        group: PaletteGroup::Workflows,
        label: "Evaluator-Optimizer",
        description: "Generate and evaluate content with feedback loop",
    },
    PaletteEntry {
        kind: NodeKind::Orchestrator,
        group: PaletteGroup::Workflows,
        label: "Orchestrator",
        description: "Coordinate complex tasks across multiple agents",
    },
    PaletteEntry {
        kind: NodeKind::Server,
        group: PaletteGroup::Servers,
        label: "MCP Server",
        description: "Connect to an MCP server for additional capabilities",
    },
];

/// Every palette entry, in display order.
pub fn catalog() -> &'static [PaletteEntry] {
    &CATALOG
}

impl NodeKind {
    /// The palette entry for this kind.
    pub fn palette_entry(self) -> &'static PaletteEntry {
        let index = match self {
            NodeKind::Agent => 0,
            NodeKind::Chain => 1,
            NodeKind::Router => 2,
            NodeKind::Parallel => 3,
            NodeKind::EvaluatorOptimizer => 4,
            NodeKind::Orchestrator => 5,
            NodeKind::Server => 6,
        };
        &CATALOG[index]
    }
}
