//! Authoritative in-memory container for every workspace and the
//! active-workspace pointer.
//!
//! All graph mutation goes through [`WorkspaceStore`] so that cascade
//! deletion and id uniqueness are enforced in one place. Operations addressed
//! to an unknown workspace, node or edge id change nothing and report `false`.

use querycanvas_core::{EdgeEntity, EdgeId, EdgePatch, NodeEntity, NodeId, NodePatch, WorkspaceId};
use tracing::debug;

mod workspace;

pub use workspace::Workspace;

pub const DEFAULT_WORKSPACE_NAME: &str = "Ana Çalışma Alanı";

#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    workspaces: Vec<Workspace>,
    active: WorkspaceId,
    next_workspace: u64,
}

impl Default for WorkspaceStore {
    fn default() -> Self {
        Self::new(DEFAULT_WORKSPACE_NAME)
    }
}

impl WorkspaceStore {
    /// A store always starts with one workspace, which is active.
    pub fn new(default_name: impl Into<String>) -> Self {
        let id = WorkspaceId("workspace-1".to_string());
        Self {
            workspaces: vec![Workspace::new(id.clone(), default_name.into())],
            active: id,
            next_workspace: 2,
        }
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    pub fn workspaces(&self) -> impl Iterator<Item = &Workspace> {
        self.workspaces.iter()
    }

    pub fn workspace(&self, id: &WorkspaceId) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.id() == id)
    }

    pub fn active_workspace_id(&self) -> &WorkspaceId {
        &self.active
    }

    pub fn active_workspace(&self) -> Option<&Workspace> {
        self.workspace(&self.active)
    }

    fn workspace_mut(&mut self, id: &WorkspaceId) -> Option<&mut Workspace> {
        let found = self.workspaces.iter_mut().find(|w| w.id() == id);
        if found.is_none() {
            debug!(workspace = %id, "Ignoring operation on unknown workspace");
        }
        found
    }

    pub fn create_workspace(&mut self, name: impl Into<String>) -> WorkspaceId {
        let id = WorkspaceId(format!("workspace-{}", self.next_workspace));
        self.next_workspace += 1;
        self.workspaces.push(Workspace::new(id.clone(), name.into()));
        self.active = id.clone();
        id
    }

    pub fn set_active_workspace(&mut self, id: &WorkspaceId) -> bool {
        if self.workspace(id).is_none() {
            debug!(workspace = %id, "Cannot activate unknown workspace");
            return false;
        }
        self.active = id.clone();
        true
    }

    /// Removes a workspace unless it is the last one. Deleting the active
    /// workspace hands activity to the first remaining one.
    pub fn delete_workspace(&mut self, id: &WorkspaceId) -> bool {
        if self.workspaces.len() <= 1 {
            debug!(workspace = %id, "Refusing to delete the last workspace");
            return false;
        }
        let before = self.workspaces.len();
        self.workspaces.retain(|w| w.id() != id);
        if self.workspaces.len() == before {
            return false;
        }
        if &self.active == id {
            self.active = self.workspaces[0].id().clone();
        }
        true
    }

    pub fn rename_workspace(&mut self, id: &WorkspaceId, name: impl Into<String>) -> bool {
        match self.workspace_mut(id) {
            Some(ws) => {
                ws.rename(name.into());
                true
            }
            None => false,
        }
    }

    pub fn add_node(&mut self, id: &WorkspaceId, node: NodeEntity) -> bool {
        self.workspace_mut(id).is_some_and(|ws| ws.add_node(node))
    }

    /// Removes the node and every edge that touches it.
    pub fn remove_node(&mut self, id: &WorkspaceId, node_id: &NodeId) -> bool {
        self.workspace_mut(id)
            .is_some_and(|ws| ws.remove_node(node_id))
    }

    pub fn set_nodes(&mut self, id: &WorkspaceId, nodes: Vec<NodeEntity>) -> bool {
        match self.workspace_mut(id) {
            Some(ws) => {
                ws.set_nodes(nodes);
                true
            }
            None => false,
        }
    }

    pub fn update_node(&mut self, id: &WorkspaceId, node_id: &NodeId, patch: NodePatch) -> bool {
        self.workspace_mut(id)
            .is_some_and(|ws| ws.update_node(node_id, patch))
    }

    pub fn add_edge(&mut self, id: &WorkspaceId, edge: EdgeEntity) -> bool {
        self.workspace_mut(id).is_some_and(|ws| ws.add_edge(edge))
    }

    pub fn remove_edge(&mut self, id: &WorkspaceId, edge_id: &EdgeId) -> bool {
        self.workspace_mut(id)
            .is_some_and(|ws| ws.remove_edge(edge_id))
    }

    pub fn set_edges(&mut self, id: &WorkspaceId, edges: Vec<EdgeEntity>) -> bool {
        match self.workspace_mut(id) {
            Some(ws) => {
                ws.set_edges(edges);
                true
            }
            None => false,
        }
    }

    pub fn update_edge(&mut self, id: &WorkspaceId, edge_id: &EdgeId, patch: EdgePatch) -> bool {
        self.workspace_mut(id)
            .is_some_and(|ws| ws.update_edge(edge_id, patch))
    }

    pub fn clear_workspace(&mut self, id: &WorkspaceId) -> bool {
        match self.workspace_mut(id) {
            Some(ws) => {
                ws.clear();
                true
            }
            None => false,
        }
    }
}
