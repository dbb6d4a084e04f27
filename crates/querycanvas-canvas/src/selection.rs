use querycanvas_core::{EdgeId, NodeId};
use querycanvas_events::FocusTarget;
use std::collections::BTreeSet;

/// Transient selection owned by the editor. Never captured in history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    nodes: BTreeSet<NodeId>,
    edges: BTreeSet<EdgeId>,
    focus: Option<FocusTarget>,
}

impl Selection {
    pub fn nodes(&self) -> &BTreeSet<NodeId> {
        &self.nodes
    }

    pub fn edges(&self) -> &BTreeSet<EdgeId> {
        &self.edges
    }

    pub fn focus(&self) -> Option<&FocusTarget> {
        self.focus.as_ref()
    }

    pub fn focused_node(&self) -> Option<&NodeId> {
        match &self.focus {
            Some(FocusTarget::Node(id)) => Some(id),
            _ => None,
        }
    }

    pub fn focused_edge(&self) -> Option<&EdgeId> {
        match &self.focus {
            Some(FocusTarget::Edge(id)) => Some(id),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Single-select a node and open it for editing. The edge panel closes.
    pub fn select_node(&mut self, id: NodeId) {
        self.nodes.clear();
        self.edges.clear();
        self.nodes.insert(id.clone());
        self.focus = Some(FocusTarget::Node(id));
    }

    pub fn select_edge(&mut self, id: EdgeId) {
        self.nodes.clear();
        self.edges.clear();
        self.edges.insert(id.clone());
        self.focus = Some(FocusTarget::Edge(id));
    }

    /// Multi-select toggle. Focus is left alone.
    pub fn toggle_node(&mut self, id: NodeId) {
        if !self.nodes.remove(&id) {
            self.nodes.insert(id);
        }
    }

    pub fn toggle_edge(&mut self, id: EdgeId) {
        if !self.edges.remove(&id) {
            self.edges.insert(id);
        }
    }

    pub fn set_focus(&mut self, focus: Option<FocusTarget>) {
        self.focus = focus;
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.focus = None;
    }

    /// Drops every id the predicates reject, focus included.
    pub fn retain(
        &mut self,
        node_exists: impl Fn(&NodeId) -> bool,
        edge_exists: impl Fn(&EdgeId) -> bool,
    ) {
        self.nodes.retain(|id| node_exists(id));
        self.edges.retain(|id| edge_exists(id));
        let keep_focus = match &self.focus {
            Some(FocusTarget::Node(id)) => node_exists(id),
            Some(FocusTarget::Edge(id)) => edge_exists(id),
            None => true,
        };
        if !keep_focus {
            self.focus = None;
        }
    }
}
