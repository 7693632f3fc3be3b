//! Export/import between a [`GraphStore`] and a [`PortableDocument`].
//!
//! Import re-checks every invariant the store enforces on mutation:
//! 1. Node and edge ids are unique.
//! 2. Every node kind is known and its attributes pass the kind's schema.
//! 3. Every edge references existing nodes.
//! 4. Every edge obeys the connection rules (no self-loops, legal kinds).
//!
//! The store is only built once the whole document has passed, so a
//! rejected document never yields a partial graph.

use std::collections::{HashMap, HashSet};

use nodes::{NodeAttributes, NodeKind};
use tracing::{debug, warn};

use crate::connection::check_connection;
use crate::models::{Edge, EdgeRecord, Node, NodeRecord, PortableDocument, FORMAT_VERSION};
use crate::{GraphError, GraphStore, StoreConfig};

/// Flatten the graph into its portable form.
pub fn serialize(graph: &GraphStore) -> PortableDocument {
    let nodes = graph
        .nodes()
        .iter()
        .map(|node| NodeRecord {
            id: node.id.clone(),
            kind: node.kind().as_str().to_owned(),
            label: node.label.clone(),
            attributes: node.attributes.to_record(),
            position: node.position,
            extra: node.extra.clone(),
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| EdgeRecord {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            extra: edge.extra.clone(),
        })
        .collect();

    PortableDocument {
        format_version: FORMAT_VERSION,
        nodes,
        edges,
    }
}

/// Rebuild a graph from its portable form using the default [`StoreConfig`].
///
/// # Errors
/// [`GraphError::MalformedDocument`] if the document breaks any invariant.
pub fn deserialize(doc: PortableDocument) -> Result<GraphStore, GraphError> {
    deserialize_with(doc, StoreConfig::default())
}

/// Rebuild a graph from its portable form with an explicit configuration.
///
/// # Errors
/// [`GraphError::MalformedDocument`] if the document breaks any invariant.
pub fn deserialize_with(doc: PortableDocument, config: StoreConfig) -> Result<GraphStore, GraphError> {
    if doc.format_version > FORMAT_VERSION {
        return Err(malformed(format!(
            "format version {} is newer than supported version {}",
            doc.format_version, FORMAT_VERSION
        )));
    }

    // -----------------------------------------------------------------------
    // 1 + 2. Nodes
    // -----------------------------------------------------------------------
    let mut kinds: HashMap<String, NodeKind> = HashMap::with_capacity(doc.nodes.len());
    let mut nodes = Vec::with_capacity(doc.nodes.len());

    for record in doc.nodes {
        let kind: NodeKind = record
            .kind
            .parse()
            .map_err(|e| malformed(format!("node '{}': {e}", record.id)))?;
        let attributes = NodeAttributes::from_record(kind, &record.attributes)
            .map_err(|e| malformed(format!("node '{}': {e}", record.id)))?;

        if kinds.insert(record.id.clone(), kind).is_some() {
            return Err(malformed(format!("duplicate node id '{}'", record.id)));
        }
        if !record.position.is_finite() {
            return Err(malformed(format!("node '{}' has a non-finite position", record.id)));
        }

        nodes.push(Node {
            id: record.id,
            label: record.label,
            attributes,
            position: record.position,
            extra: record.extra,
        });
    }

    // -----------------------------------------------------------------------
    // 3 + 4. Edges
    // -----------------------------------------------------------------------
    let mut edge_ids: HashSet<String> = HashSet::with_capacity(doc.edges.len());
    let mut pairs: HashSet<(String, String)> = HashSet::new();
    let mut edges = Vec::with_capacity(doc.edges.len());

    for record in doc.edges {
        if !edge_ids.insert(record.id.clone()) {
            return Err(malformed(format!("duplicate edge id '{}'", record.id)));
        }

        let source_kind = *kinds.get(&record.source).ok_or_else(|| {
            malformed(format!(
                "edge '{}' references unknown node '{}' (source side)",
                record.id, record.source
            ))
        })?;
        let target_kind = *kinds.get(&record.target).ok_or_else(|| {
            malformed(format!(
                "edge '{}' references unknown node '{}' (target side)",
                record.id, record.target
            ))
        })?;

        if record.source == record.target {
            return Err(malformed(format!("edge '{}' is a self-loop", record.id)));
        }
        check_connection(source_kind, target_kind)
            .map_err(|reason| malformed(format!("edge '{}': {reason}", record.id)))?;

        if !pairs.insert((record.source.clone(), record.target.clone())) && !config.allow_parallel_edges {
            return Err(malformed(format!(
                "edge '{}' repeats '{}' -> '{}'",
                record.id, record.source, record.target
            )));
        }

        edges.push(Edge {
            id: record.id,
            source: record.source,
            target: record.target,
            extra: record.extra,
        });
    }

    debug!("imported graph with {} node(s) and {} edge(s)", nodes.len(), edges.len());
    Ok(GraphStore::from_validated(config, nodes, edges))
}

/// Pretty-printed JSON text of the graph's portable form.
///
/// # Errors
/// [`GraphError::MalformedDocument`] if encoding fails.
pub fn to_json(graph: &GraphStore) -> Result<String, GraphError> {
    serde_json::to_string_pretty(&serialize(graph)).map_err(|e| malformed(e.to_string()))
}

/// Parse JSON text and rebuild the graph.
///
/// # Errors
/// [`GraphError::MalformedDocument`] for invalid JSON or a document that
/// breaks any invariant.
pub fn from_json(text: &str) -> Result<GraphStore, GraphError> {
    let doc: PortableDocument = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;
    deserialize(doc)
}

fn malformed(message: String) -> GraphError {
    warn!("rejected document: {}", message);
    GraphError::MalformedDocument(message)
}
