//! Starter workflows offered when a new graph is opened.

use nodes::{AgentAttributes, ChainAttributes, NodeAttributes, NodeKind};

use crate::{GraphError, GraphStore, Position};

/// Names accepted by [`template`].
pub const TEMPLATE_NAMES: [&str; 3] = ["basic-agent", "agent-chain", "new"];

/// Build the starter graph called `name`.
///
/// - `basic-agent`: a single agent.
/// - `agent-chain`: two agents feeding a chain that runs them in order.
/// - `new`: a lone chain node to start from.
///
/// # Errors
/// [`GraphError::NotFound`] for an unknown template name.
pub fn template(name: &str) -> Result<GraphStore, GraphError> {
    let mut graph = GraphStore::default();

    match name {
        "basic-agent" => {
            graph.add_node_from_palette(NodeKind::Agent, Position::new(250.0, 100.0))?;
        }
        "agent-chain" => {
            let first = graph.add_labeled_node(
                NodeKind::Agent,
                "Agent 1",
                empty_agent(),
                Position::new(100.0, 100.0),
            )?;
            let second = graph.add_labeled_node(
                NodeKind::Agent,
                "Agent 2",
                empty_agent(),
                Position::new(400.0, 100.0),
            )?;
            let chain = graph.add_labeled_node(
                NodeKind::Chain,
                "Chain Workflow",
                NodeAttributes::Chain(ChainAttributes {
                    sequence: vec!["Agent 1".into(), "Agent 2".into()],
                }),
                Position::new(250.0, 300.0),
            )?;
            graph.add_edge(&first, &chain)?;
            graph.add_edge(&second, &chain)?;
        }
        "new" => {
            graph.add_labeled_node(
                NodeKind::Chain,
                "Start Here",
                NodeAttributes::default_for(NodeKind::Chain),
                Position::new(250.0, 100.0),
            )?;
        }
        other => {
            return Err(GraphError::NotFound {
                entity: "template",
                id: other.to_owned(),
            })
        }
    }

    Ok(graph)
}

fn empty_agent() -> NodeAttributes {
    NodeAttributes::Agent(AgentAttributes {
        instruction: String::new(),
        model: None,
        servers: Vec::new(),
    })
}
