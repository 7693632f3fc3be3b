//! The graph store — single source of truth for one editing session.
//!
//! Every mutating method checks everything it needs before touching the
//! node or edge lists, so a rejected call leaves the store unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use nodes::{NodeAttributes, NodeKind, SchemaError};

use crate::connection::{check_connection, ConnectionRejection};
use crate::models::{Edge, Node, Position};
use crate::GraphError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Version of the [`StoreConfig`] layout.
pub const STORE_CONFIG_VERSION: u32 = 1;

/// Tuning knobs for a [`GraphStore`], passed by value at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub version: u32,
    /// Prefix of generated node ids (`n1`, `n2`, …).
    pub node_id_prefix: String,
    /// Prefix of generated edge ids (`e1`, `e2`, …).
    pub edge_id_prefix: String,
    /// Allow more than one edge between the same ordered pair of nodes.
    pub allow_parallel_edges: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            version: STORE_CONFIG_VERSION,
            node_id_prefix: "n".into(),
            edge_id_prefix: "e".into(),
            allow_parallel_edges: true,
        }
    }
}

// ---------------------------------------------------------------------------
// GraphStore
// ---------------------------------------------------------------------------

/// Holds the nodes and edges of a workflow and applies mutations to them.
///
/// Nodes and edges are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    config: StoreConfig,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Last issued numeric suffixes.  Only ever grow, so removed ids are
    /// never handed out again.
    node_counter: u64,
    edge_counter: u64,
}

impl GraphStore {
    /// Create an empty store.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            node_counter: 0,
            edge_counter: 0,
        }
    }

    /// Build a store around nodes and edges that already satisfy every
    /// invariant.  Id generation resumes past any imported id that uses the
    /// configured prefixes.
    pub(crate) fn from_validated(config: StoreConfig, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let node_counter = max_suffix(nodes.iter().map(|n| n.id.as_str()), &config.node_id_prefix);
        let edge_counter = max_suffix(edges.iter().map(|e| e.id.as_str()), &config.edge_id_prefix);
        Self {
            config,
            nodes,
            edges,
            node_counter,
            edge_counter,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Edges ending at `node_id`.
    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Edges starting at `node_id`.
    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -----------------------------------------------------------------------
    // Node mutations
    // -----------------------------------------------------------------------

    /// Add a node of `kind` labelled with its palette label.
    ///
    /// # Errors
    /// [`GraphError::Validation`] if `attributes` belong to another kind.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        attributes: NodeAttributes,
        position: Position,
    ) -> Result<String, GraphError> {
        self.add_labeled_node(kind, kind.palette_entry().label, attributes, position)
    }

    /// Add a node with an explicit label, as a palette or drop action
    /// supplies `(kind, label, attributes)`.
    ///
    /// # Errors
    /// - [`GraphError::Validation`] if `attributes` belong to another kind.
    /// - [`GraphError::InvalidPosition`] for a non-finite coordinate.
    pub fn add_labeled_node(
        &mut self,
        kind: NodeKind,
        label: impl Into<String>,
        attributes: NodeAttributes,
        position: Position,
    ) -> Result<String, GraphError> {
        if attributes.kind() != kind {
            warn!("rejected {} node with {} attributes", kind, attributes.kind());
            return Err(SchemaError::KindMismatch {
                expected: kind,
                found: attributes.kind(),
            }
            .into());
        }
        check_position(position)?;

        let id = self.fresh_node_id();
        let label = label.into();
        debug!("adding {} node '{}' ({})", kind, id, label);
        self.nodes.push(Node {
            id: id.clone(),
            label,
            attributes,
            position,
            extra: Map::new(),
        });
        Ok(id)
    }

    /// Add a node of `kind` with its default attributes and palette label.
    ///
    /// # Errors
    /// [`GraphError::InvalidPosition`] for a non-finite coordinate.
    pub fn add_node_from_palette(
        &mut self,
        kind: NodeKind,
        position: Position,
    ) -> Result<String, GraphError> {
        check_position(position)?;
        let entry = kind.palette_entry();
        let id = self.fresh_node_id();
        debug!("adding {} node '{}' from palette", kind, id);
        self.nodes.push(Node {
            id: id.clone(),
            label: entry.label.to_owned(),
            attributes: entry.default_attributes(),
            position,
            extra: Map::new(),
        });
        Ok(id)
    }

    /// Remove a node and every edge that references it.
    ///
    /// # Errors
    /// [`GraphError::NotFound`] if no node has this id.
    pub fn remove_node(&mut self, id: &str) -> Result<Node, GraphError> {
        let index = self.node_index(id)?;
        let node = self.nodes.remove(index);

        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        debug!(
            "removed node '{}' and {} incident edge(s)",
            id,
            before - self.edges.len()
        );
        Ok(node)
    }

    /// Merge `patch` into the node's attributes.
    ///
    /// The kind and id never change.  The merged record is validated first;
    /// on failure the node keeps its previous attributes.
    ///
    /// # Errors
    /// - [`GraphError::NotFound`] if no node has this id.
    /// - [`GraphError::Validation`] if the merged record breaks the schema.
    pub fn update_node_attributes(
        &mut self,
        id: &str,
        patch: &Map<String, Value>,
    ) -> Result<(), GraphError> {
        let index = self.node_index(id)?;
        let merged = self.nodes[index].attributes.merged(patch).map_err(|e| {
            warn!("rejected attribute update on '{}': {}", id, e);
            GraphError::Validation(e)
        })?;
        self.nodes[index].attributes = merged;
        debug!("updated {} field(s) on node '{}'", patch.len(), id);
        Ok(())
    }

    /// Change a node's display label.
    ///
    /// # Errors
    /// [`GraphError::NotFound`] if no node has this id.
    pub fn rename_node(&mut self, id: &str, label: impl Into<String>) -> Result<(), GraphError> {
        let index = self.node_index(id)?;
        self.nodes[index].label = label.into();
        Ok(())
    }

    /// Move a node on the canvas.
    ///
    /// # Errors
    /// - [`GraphError::NotFound`] if no node has this id.
    /// - [`GraphError::InvalidPosition`] for a non-finite coordinate.
    pub fn move_node(&mut self, id: &str, position: Position) -> Result<(), GraphError> {
        let index = self.node_index(id)?;
        check_position(position)?;
        self.nodes[index].position = position;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Edge mutations
    // -----------------------------------------------------------------------

    /// Connect `source` to `target`.
    ///
    /// # Errors
    /// - [`GraphError::NotFound`] if either endpoint is missing.
    /// - [`GraphError::InvalidConnection`] for a self-loop, a pair of kinds
    ///   the connection rules refuse, or a repeated pair when parallel edges
    ///   are disabled.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<String, GraphError> {
        let source_kind = self
            .node(source)
            .ok_or_else(|| GraphError::node_not_found(source))?
            .kind();
        let target_kind = self
            .node(target)
            .ok_or_else(|| GraphError::node_not_found(target))?
            .kind();

        let verdict = if source == target {
            Err(ConnectionRejection::SelfLoop)
        } else if !self.config.allow_parallel_edges
            && self.edges.iter().any(|e| e.source == source && e.target == target)
        {
            Err(ConnectionRejection::Duplicate)
        } else {
            check_connection(source_kind, target_kind)
        };

        if let Err(reason) = verdict {
            warn!("rejected edge '{}' -> '{}': {}", source, target, reason);
            return Err(GraphError::InvalidConnection {
                from: source.to_owned(),
                to: target.to_owned(),
                reason,
            });
        }

        let id = self.fresh_edge_id();
        debug!("connecting '{}' -> '{}' as '{}'", source, target, id);
        self.edges.push(Edge {
            id: id.clone(),
            source: source.to_owned(),
            target: target.to_owned(),
            extra: Map::new(),
        });
        Ok(id)
    }

    /// Remove a single edge.
    ///
    /// # Errors
    /// [`GraphError::NotFound`] if no edge has this id.
    pub fn remove_edge(&mut self, id: &str) -> Result<Edge, GraphError> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| GraphError::edge_not_found(id))?;
        debug!("removing edge '{}'", id);
        Ok(self.edges.remove(index))
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn node_index(&self, id: &str) -> Result<usize, GraphError> {
        self.nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| GraphError::node_not_found(id))
    }

    fn fresh_node_id(&mut self) -> String {
        let nodes = &self.nodes;
        next_free_id(&mut self.node_counter, &self.config.node_id_prefix, |id| {
            nodes.iter().any(|n| n.id == id)
        })
    }

    fn fresh_edge_id(&mut self) -> String {
        let edges = &self.edges;
        next_free_id(&mut self.edge_counter, &self.config.edge_id_prefix, |id| {
            edges.iter().any(|e| e.id == id)
        })
    }
}

fn check_position(position: Position) -> Result<(), GraphError> {
    if position.is_finite() {
        Ok(())
    } else {
        warn!("rejected non-finite position ({}, {})", position.x, position.y);
        Err(GraphError::InvalidPosition {
            x: position.x,
            y: position.y,
        })
    }
}

/// Advance `counter` to the next `{prefix}{N}` not in use.
///
/// An exhausted counter restarts at 1; ids still in use are skipped.
fn next_free_id(counter: &mut u64, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    loop {
        *counter = counter.checked_add(1).unwrap_or(1);
        let id = format!("{prefix}{counter}");
        if !taken(&id) {
            return id;
        }
    }
}

/// Largest `N` among ids of the form `{prefix}{N}`, or 0.
fn max_suffix<'a>(ids: impl Iterator<Item = &'a str>, prefix: &str) -> u64 {
    ids.filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}
