//! Topological ordering of the workflow graph.
//!
//! The connection rules allow workflow kinds to feed one another, so a graph
//! accepted by the store may still contain a directed cycle.  Ordering fails
//! on such graphs; everything else gets an order in which every node comes
//! after all of its sources.

use std::collections::{HashMap, VecDeque};

use crate::{GraphError, GraphStore};

/// Return node ids in topological order (Kahn's algorithm).
///
/// Ties are broken by insertion order, so the result is deterministic.
///
/// # Errors
/// [`GraphError::CycleDetected`] naming the nodes that could not be ordered
/// (those on a cycle or downstream of one).
pub fn topological_order(graph: &GraphStore) -> Result<Vec<String>, GraphError> {
    // Build adjacency list and in-degree map.
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = HashMap::new();

    for node in graph.nodes() {
        adjacency.entry(node.id.as_str()).or_default();
        in_degree.entry(node.id.as_str()).or_insert(0);
    }

    for edge in graph.edges() {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
        *in_degree.entry(edge.target.as_str()).or_insert(0) += 1;
    }

    // Seed the queue with nodes that have no incoming edges.
    let mut queue: VecDeque<&str> = graph
        .nodes()
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| in_degree.get(id) == Some(&0))
        .collect();

    let mut sorted: Vec<String> = Vec::with_capacity(graph.node_count());

    while let Some(node_id) = queue.pop_front() {
        sorted.push(node_id.to_owned());

        if let Some(neighbours) = adjacency.get(node_id) {
            for &neighbour in neighbours {
                let deg = in_degree.entry(neighbour).or_insert(0);
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(neighbour);
                }
            }
        }
    }

    // If we didn't visit every node the graph contains a cycle.
    if sorted.len() != graph.node_count() {
        let nodes = graph
            .nodes()
            .iter()
            .filter(|n| in_degree.get(n.id.as_str()).is_some_and(|&d| d > 0))
            .map(|n| n.id.clone())
            .collect();
        return Err(GraphError::CycleDetected { nodes });
    }

    Ok(sorted)
}
