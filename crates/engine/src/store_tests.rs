//! Session-level tests for the graph store.
//!
//! These drive the store the way the editor does (add, connect, edit, move,
//! delete, export, import) and check that the structural invariants hold
//! after every step, including after rejected operations.

use serde_json::{json, Map, Value};

use nodes::{AgentAttributes, ChainAttributes, NodeAttributes, NodeKind, SchemaError};

use crate::connection::ConnectionRejection;
use crate::{deserialize, serialize, GraphError, GraphStore, Position, StoreConfig};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn agent(instruction: &str, model: &str) -> NodeAttributes {
    NodeAttributes::Agent(AgentAttributes {
        instruction: instruction.into(),
        model: Some(model.into()),
        servers: vec![],
    })
}

fn chain() -> NodeAttributes {
    NodeAttributes::Chain(ChainAttributes { sequence: vec![] })
}

/// Every edge endpoint exists and every edge is legal.
fn assert_invariants(graph: &GraphStore) {
    for edge in graph.edges() {
        let source = graph.node(&edge.source).expect("dangling source");
        let target = graph.node(&edge.target).expect("dangling target");
        assert_ne!(edge.source, edge.target, "self-loop {}", edge.id);
        assert!(
            crate::is_valid_connection(source.kind(), target.kind()),
            "illegal edge {}",
            edge.id
        );
    }
}

/// Build a graph that uses every kind, with a few edges and edits.
fn busy_graph() -> GraphStore {
    let mut graph = GraphStore::default();
    let ids: Vec<String> = NodeKind::ALL
        .into_iter()
        .enumerate()
        .map(|(i, kind)| graph.add_node_from_palette(kind, Position::new(i as f64 * 50.0, 10.5)).unwrap())
        .collect();
    // agent → chain → parallel → router → evaluatorOptimizer → orchestrator → server
    for pair in ids.windows(2) {
        graph.add_edge(&pair[0], &pair[1]).expect("legal edge");
    }
    graph
        .update_node_attributes(&ids[0], &object(json!({ "instruction": "plan", "model": "gpt-4.1" })))
        .unwrap();
    graph
        .update_node_attributes(&ids[4], &object(json!({ "min_rating": 3, "max_refinements": 2 })))
        .unwrap();
    graph.rename_node(&ids[6], "fetch").unwrap();
    graph
}

// ============================================================
// The documented editing scenario
// ============================================================

#[test]
fn agent_feeds_chain_but_not_the_reverse() {
    let mut graph = GraphStore::default();

    let n1 = graph
        .add_node(NodeKind::Agent, agent("summarize", "gpt-4.1"), Position::new(0.0, 0.0))
        .unwrap();
    let n2 = graph
        .add_node(NodeKind::Chain, chain(), Position::new(100.0, 0.0))
        .unwrap();
    assert_eq!(n1, "n1");
    assert_eq!(n2, "n2");

    graph.add_edge(&n1, &n2).expect("agent -> chain is legal");

    assert!(matches!(
        graph.add_edge(&n2, &n1),
        Err(GraphError::InvalidConnection {
            reason: ConnectionRejection::TargetCannotReceive(NodeKind::Agent),
            ..
        })
    ));
    assert_eq!(graph.edge_count(), 1);
}

// ============================================================
// Node operations
// ============================================================

#[test]
fn add_node_rejects_attributes_of_another_kind() {
    let mut graph = GraphStore::default();
    let result = graph.add_node(NodeKind::Server, chain(), Position::default());
    assert!(matches!(
        result,
        Err(GraphError::Validation(SchemaError::KindMismatch {
            expected: NodeKind::Server,
            found: NodeKind::Chain,
        }))
    ));
    assert!(graph.is_empty());
}

#[test]
fn ids_are_never_reissued_after_removal() {
    let mut graph = GraphStore::default();
    let a = graph.add_node_from_palette(NodeKind::Agent, Position::default()).unwrap();
    let b = graph.add_node_from_palette(NodeKind::Agent, Position::default()).unwrap();
    graph.remove_node(&b).unwrap();
    let c = graph.add_node_from_palette(NodeKind::Agent, Position::default()).unwrap();
    assert_eq!((a.as_str(), c.as_str()), ("n1", "n3"));
}

#[test]
fn exhausted_id_counters_restart_at_the_first_free_id() {
    let text = r#"{
        "nodes": [
            { "id": "n18446744073709551615", "kind": "agent",
              "attributes": { "instruction": "", "servers": [] } },
            { "id": "n1", "kind": "chain", "attributes": { "sequence": [] } }
        ],
        "edges": [
            { "id": "e18446744073709551615", "source": "n18446744073709551615", "target": "n1" }
        ]
    }"#;
    let mut graph = crate::from_json(text).unwrap();

    let added = graph.add_node_from_palette(NodeKind::Chain, Position::default()).unwrap();
    assert_eq!(added, "n2");
    let edge = graph.add_edge("n18446744073709551615", &added).unwrap();
    assert_eq!(edge, "e1");
    assert_eq!(graph.node_count(), 3);
    assert_invariants(&graph);
}

#[test]
fn custom_prefixes_are_used() {
    let config = StoreConfig {
        node_id_prefix: "node-".into(),
        edge_id_prefix: "edge-".into(),
        ..StoreConfig::default()
    };
    let mut graph = GraphStore::new(config);
    let a = graph.add_node_from_palette(NodeKind::Agent, Position::default()).unwrap();
    let c = graph.add_node_from_palette(NodeKind::Chain, Position::default()).unwrap();
    let e = graph.add_edge(&a, &c).unwrap();
    assert_eq!((a.as_str(), c.as_str(), e.as_str()), ("node-1", "node-2", "edge-1"));
}

#[test]
fn remove_node_cascades_incident_edges() {
    let mut graph = busy_graph();
    let before = graph.edge_count();

    // "n3" is the parallel node in the middle of the path.
    let removed = graph.remove_node("n3").unwrap();
    assert_eq!(removed.kind(), NodeKind::Parallel);
    assert_eq!(graph.edge_count(), before - 2);
    assert!(graph.edges().iter().all(|e| !e.touches("n3")));
    assert_invariants(&graph);
}

#[test]
fn missing_ids_are_not_found_and_change_nothing() {
    let mut graph = busy_graph();
    let snapshot = serialize(&graph);

    assert!(matches!(
        graph.remove_node("ghost"),
        Err(GraphError::NotFound { entity: "node", .. })
    ));
    assert!(matches!(
        graph.remove_edge("ghost"),
        Err(GraphError::NotFound { entity: "edge", .. })
    ));
    assert!(matches!(
        graph.move_node("ghost", Position::default()),
        Err(GraphError::NotFound { .. })
    ));
    assert!(matches!(
        graph.update_node_attributes("ghost", &Map::new()),
        Err(GraphError::NotFound { .. })
    ));
    assert!(matches!(
        graph.add_edge("n1", "ghost"),
        Err(GraphError::NotFound { id, .. }) if id == "ghost"
    ));

    assert_eq!(serialize(&graph), snapshot);
}

#[test]
fn rejected_attribute_update_leaves_node_untouched() {
    let mut graph = busy_graph();
    let before = graph.node("n5").unwrap().attributes.clone();

    let result = graph.update_node_attributes(
        "n5",
        &object(json!({ "generator": "writer", "max_refinements": -1 })),
    );
    assert!(matches!(result, Err(GraphError::Validation(_))));
    assert_eq!(graph.node("n5").unwrap().attributes, before);
}

#[test]
fn attribute_update_never_changes_kind_or_id() {
    let mut graph = busy_graph();
    graph
        .update_node_attributes("n6", &object(json!({ "plan_type": "iterative", "agents": ["a"] })))
        .unwrap();
    let node = graph.node("n6").unwrap();
    assert_eq!(node.id, "n6");
    assert_eq!(node.kind(), NodeKind::Orchestrator);

    // A patch cannot smuggle in a different kind.
    assert!(graph
        .update_node_attributes("n6", &object(json!({ "nodeType": "agent" })))
        .is_err());
}

#[test]
fn move_node_only_changes_position() {
    let mut graph = busy_graph();
    let before = graph.node("n2").unwrap().clone();
    graph.move_node("n2", Position::new(-40.0, 12.25)).unwrap();
    let after = graph.node("n2").unwrap();
    assert_eq!(after.position, Position::new(-40.0, 12.25));
    assert_eq!(after.attributes, before.attributes);
    assert_eq!(after.label, before.label);
}

#[test]
fn rename_changes_label_only() {
    let mut graph = busy_graph();
    let before = graph.node("n3").unwrap().clone();
    graph.rename_node("n3", "fan out").unwrap();
    let after = graph.node("n3").unwrap();
    assert_eq!(after.label, "fan out");
    assert_eq!(after.attributes, before.attributes);
    assert_eq!(after.position, before.position);
    assert!(matches!(
        graph.rename_node("ghost", "x"),
        Err(GraphError::NotFound { entity: "node", .. })
    ));
}

#[test]
fn non_finite_positions_are_rejected() {
    let mut graph = busy_graph();
    let snapshot = serialize(&graph);

    for position in [
        Position::new(f64::NAN, 0.0),
        Position::new(0.0, f64::INFINITY),
        Position::new(f64::NEG_INFINITY, f64::NAN),
    ] {
        assert!(matches!(
            graph.move_node("n1", position),
            Err(GraphError::InvalidPosition { .. })
        ));
        assert!(matches!(
            graph.add_node_from_palette(NodeKind::Agent, position),
            Err(GraphError::InvalidPosition { .. })
        ));
        assert!(matches!(
            graph.add_node(NodeKind::Chain, chain(), position),
            Err(GraphError::InvalidPosition { .. })
        ));
    }
    assert_eq!(serialize(&graph), snapshot);

    // What the store accepted still comes back from its own export.
    let text = crate::to_json(&graph).unwrap();
    assert!(crate::from_json(&text).is_ok());
}

// ============================================================
// Edge operations
// ============================================================

#[test]
fn self_loops_are_rejected_for_every_kind() {
    let mut graph = GraphStore::default();
    for kind in NodeKind::ALL {
        let id = graph.add_node_from_palette(kind, Position::default()).unwrap();
        assert!(
            matches!(
                graph.add_edge(&id, &id),
                Err(GraphError::InvalidConnection { reason: ConnectionRejection::SelfLoop, .. })
            ),
            "{kind}"
        );
    }
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn parallel_edges_follow_config() {
    let mut graph = GraphStore::default();
    let a = graph.add_node_from_palette(NodeKind::Agent, Position::default()).unwrap();
    let c = graph.add_node_from_palette(NodeKind::Chain, Position::default()).unwrap();
    let first = graph.add_edge(&a, &c).unwrap();
    let second = graph.add_edge(&a, &c).unwrap();
    assert_ne!(first, second);

    let mut strict = GraphStore::new(StoreConfig {
        allow_parallel_edges: false,
        ..StoreConfig::default()
    });
    let a = strict.add_node_from_palette(NodeKind::Agent, Position::default()).unwrap();
    let c = strict.add_node_from_palette(NodeKind::Chain, Position::default()).unwrap();
    strict.add_edge(&a, &c).unwrap();
    assert!(matches!(
        strict.add_edge(&a, &c),
        Err(GraphError::InvalidConnection { reason: ConnectionRejection::Duplicate, .. })
    ));
}

#[test]
fn server_cannot_originate_edges() {
    let mut graph = GraphStore::default();
    let s = graph.add_node_from_palette(NodeKind::Server, Position::default()).unwrap();
    let c = graph.add_node_from_palette(NodeKind::Chain, Position::default()).unwrap();
    assert!(matches!(
        graph.add_edge(&s, &c),
        Err(GraphError::InvalidConnection {
            reason: ConnectionRejection::SourceCannotOriginate(NodeKind::Server),
            ..
        })
    ));
}

#[test]
fn remove_edge_keeps_nodes() {
    let mut graph = busy_graph();
    let edge = graph.edges()[0].clone();
    let removed = graph.remove_edge(&edge.id).unwrap();
    assert_eq!(removed, edge);
    assert!(graph.node(&edge.source).is_some());
    assert!(graph.node(&edge.target).is_some());
    assert_eq!(graph.outgoing(&edge.source).count(), 0);
}

// ============================================================
// Export / import
// ============================================================

#[test]
fn serialize_then_deserialize_is_lossless() {
    let graph = busy_graph();
    let restored = deserialize(serialize(&graph)).expect("own export must import");

    assert_eq!(restored.nodes(), graph.nodes());
    assert_eq!(restored.edges(), graph.edges());
    assert_eq!(serialize(&restored), serialize(&graph));
}

#[test]
fn json_text_round_trip_is_lossless() {
    let graph = busy_graph();
    let text = crate::serializer::to_json(&graph).unwrap();
    let restored = crate::serializer::from_json(&text).unwrap();
    assert_eq!(restored.nodes(), graph.nodes());
    assert_eq!(restored.edges(), graph.edges());
}

#[test]
fn rejected_import_builds_nothing() {
    let mut doc = serialize(&busy_graph());
    doc.edges[3].target = "ghost".into();
    assert!(matches!(deserialize(doc), Err(GraphError::MalformedDocument(_))));
}
