use chrono::{DateTime, Utc};
use querycanvas_core::{EdgeEntity, EdgeId, EdgePatch, NodeEntity, NodeId, NodePatch, WorkspaceId};
use serde::Serialize;
use std::collections::HashSet;

/// An isolated, named graph. Edges only ever reference nodes of the same
/// workspace; every mutation below keeps that true.
#[derive(Debug, Clone, Serialize)]
pub struct Workspace {
    id: WorkspaceId,
    name: String,
    nodes: Vec<NodeEntity>,
    edges: Vec<EdgeEntity>,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl Workspace {
    pub(crate) fn new(id: WorkspaceId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            nodes: Vec::new(),
            edges: Vec::new(),
            created_at: now,
            last_modified: now,
        }
    }

    pub fn id(&self) -> &WorkspaceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[NodeEntity] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeEntity] {
        &self.edges
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn node(&self, id: &NodeId) -> Option<&NodeEntity> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&EdgeEntity> {
        self.edges.iter().find(|e| &e.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
        self.touch();
    }

    pub(crate) fn add_node(&mut self, node: NodeEntity) -> bool {
        if self.contains_node(&node.id) {
            return false;
        }
        self.nodes.push(node);
        self.touch();
        true
    }

    pub(crate) fn remove_node(&mut self, id: &NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| &n.id != id);
        if self.nodes.len() == before {
            return false;
        }
        self.edges.retain(|e| !e.touches(id));
        self.touch();
        true
    }

    pub(crate) fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| &n.id == id) else {
            return false;
        };
        node.apply(patch);
        self.touch();
        true
    }

    /// Bulk replace. Duplicate ids keep their first occurrence and edges left
    /// without an endpoint are pruned.
    pub(crate) fn set_nodes(&mut self, nodes: Vec<NodeEntity>) {
        let mut seen = HashSet::new();
        self.nodes = nodes
            .into_iter()
            .filter(|n| seen.insert(n.id.clone()))
            .collect();
        let nodes = &self.nodes;
        self.edges.retain(|e| {
            nodes.iter().any(|n| n.id == e.source) && nodes.iter().any(|n| n.id == e.target)
        });
        self.touch();
    }

    pub(crate) fn add_edge(&mut self, edge: EdgeEntity) -> bool {
        if self.edge(&edge.id).is_some()
            || !self.contains_node(&edge.source)
            || !self.contains_node(&edge.target)
        {
            return false;
        }
        self.edges.push(edge);
        self.touch();
        true
    }

    pub(crate) fn remove_edge(&mut self, id: &EdgeId) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| &e.id != id);
        if self.edges.len() == before {
            return false;
        }
        self.touch();
        true
    }

    pub(crate) fn update_edge(&mut self, id: &EdgeId, patch: EdgePatch) -> bool {
        let Some(edge) = self.edges.iter_mut().find(|e| &e.id == id) else {
            return false;
        };
        edge.apply(patch);
        self.touch();
        true
    }

    /// Bulk replace. Edges with a dangling endpoint or a repeated id are dropped.
    pub(crate) fn set_edges(&mut self, edges: Vec<EdgeEntity>) {
        let mut seen = HashSet::new();
        let kept: Vec<EdgeEntity> = edges
            .into_iter()
            .filter(|e| self.contains_node(&e.source) && self.contains_node(&e.target))
            .filter(|e| seen.insert(e.id.clone()))
            .collect();
        self.edges = kept;
        self.touch();
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.touch();
    }
}
