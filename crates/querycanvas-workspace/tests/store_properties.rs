use proptest::prelude::*;
use querycanvas_core::{EdgeEntity, EdgeId, NodeEntity, NodeId, Position, WorkspaceId};
use querycanvas_workspace::WorkspaceStore;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    AddNode(u8),
    AddEdge(u8, u8, u8),
    RemoveNode(u8),
    RemoveEdge(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..12).prop_map(Op::AddNode),
        (0u8..16, 0u8..12, 0u8..12).prop_map(|(e, s, t)| Op::AddEdge(e, s, t)),
        (0u8..12).prop_map(Op::RemoveNode),
        (0u8..16).prop_map(Op::RemoveEdge),
    ]
}

fn node(i: u8) -> NodeEntity {
    NodeEntity::new(
        NodeId(format!("node_{i}")),
        "insan",
        "İnsan",
        "#2563eb",
        Position::default(),
    )
}

fn edge(i: u8, s: u8, t: u8) -> EdgeEntity {
    EdgeEntity::new(
        EdgeId(format!("edge_{i}")),
        NodeId(format!("node_{s}")),
        NodeId(format!("node_{t}")),
        "default",
        "Genel Bağlantı",
    )
}

fn apply(store: &mut WorkspaceStore, ws: &WorkspaceId, op: &Op) {
    match *op {
        Op::AddNode(i) => {
            store.add_node(ws, node(i));
        }
        Op::AddEdge(i, s, t) => {
            store.add_edge(ws, edge(i, s, t));
        }
        Op::RemoveNode(i) => {
            store.remove_node(ws, &NodeId(format!("node_{i}")));
        }
        Op::RemoveEdge(i) => {
            store.remove_edge(ws, &EdgeId(format!("edge_{i}")));
        }
    }
}

proptest! {
    /// No edge survives with an endpoint that is not a node of its workspace.
    #[test]
    fn prop_edges_never_dangle(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut store = WorkspaceStore::default();
        let ws = store.active_workspace_id().clone();
        for op in &ops {
            apply(&mut store, &ws, op);
            let workspace = store.workspace(&ws).unwrap();
            for e in workspace.edges() {
                prop_assert!(workspace.contains_node(&e.source), "dangling source {}", e.source);
                prop_assert!(workspace.contains_node(&e.target), "dangling target {}", e.target);
            }
        }
    }

    /// Node ids and edge ids stay unique within a workspace.
    #[test]
    fn prop_ids_unique(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut store = WorkspaceStore::default();
        let ws = store.active_workspace_id().clone();
        for op in &ops {
            apply(&mut store, &ws, op);
        }
        let workspace = store.workspace(&ws).unwrap();
        let nodes: HashSet<_> = workspace.nodes().iter().map(|n| &n.id).collect();
        let edges: HashSet<_> = workspace.edges().iter().map(|e| &e.id).collect();
        prop_assert_eq!(nodes.len(), workspace.nodes().len());
        prop_assert_eq!(edges.len(), workspace.edges().len());
    }

    /// Deleting whichever workspace is active never takes the count below one.
    #[test]
    fn prop_last_workspace_survives(extra in 0usize..5, deletes in 1usize..10) {
        let mut store = WorkspaceStore::default();
        for i in 0..extra {
            store.create_workspace(format!("ws {i}"));
        }
        for _ in 0..deletes {
            let active = store.active_workspace_id().clone();
            let before = store.len();
            let deleted = store.delete_workspace(&active);
            prop_assert_eq!(deleted, before > 1);
            prop_assert!(store.len() >= 1);
            prop_assert!(store.active_workspace().is_some());
        }
    }
}
