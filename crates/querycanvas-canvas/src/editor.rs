use crate::connection::ConnectionState;
use crate::history::{DEFAULT_HISTORY_LIMIT, History, Snapshot};
use crate::selection::Selection;
use crate::shortcuts::{CanvasAction, KeyEvent, ShortcutScope, Shortcuts};
use crate::viewport::{DropPayload, Viewport};
use querycanvas_core::{
    Catalog, DEFAULT_NODE_COLOR, DEFAULT_RELATIONSHIP_TYPE, EdgeEntity, EdgeId, IdAllocator,
    NodeEntity, NodeId, NodePatch, Position, WorkspaceId,
};
use querycanvas_events::{Event, EventBus, FocusTarget};
use querycanvas_workspace::WorkspaceStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub history_limit: usize,
    pub default_relationship_type: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_relationship_type: DEFAULT_RELATIONSHIP_TYPE.to_string(),
        }
    }
}

/// Turns pointer and keyboard interaction into store operations.
///
/// The editor owns everything the store does not: selection, edit focus, the
/// pending connection and one undo history per workspace. The store itself is
/// passed into each call so a controller can own both side by side.
pub struct CanvasEditor {
    catalog: Arc<Catalog>,
    ids: Arc<IdAllocator>,
    events: EventBus,
    config: EditorConfig,
    selection: Selection,
    connection: ConnectionState,
    histories: HashMap<WorkspaceId, History>,
    viewport: Viewport,
    shortcuts: Shortcuts,
}

impl CanvasEditor {
    pub fn new(
        catalog: Arc<Catalog>,
        ids: Arc<IdAllocator>,
        events: EventBus,
        config: EditorConfig,
    ) -> Self {
        Self {
            catalog,
            ids,
            events,
            config,
            selection: Selection::default(),
            connection: ConnectionState::Idle,
            histories: HashMap::new(),
            viewport: Viewport::default(),
            shortcuts: Shortcuts::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn history(&self, workspace: &WorkspaceId) -> Option<&History> {
        self.histories.get(workspace)
    }

    pub fn can_undo(&self, workspace: &WorkspaceId) -> bool {
        self.history(workspace).is_some_and(History::can_undo)
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.events
    }

    fn history_mut(&mut self, workspace: &WorkspaceId) -> &mut History {
        let limit = self.config.history_limit;
        self.histories
            .entry(workspace.clone())
            .or_insert_with(|| History::new(limit))
    }

    /// Records the active workspace's graph before a mutation.
    fn push_history(&mut self, store: &WorkspaceStore) -> Option<WorkspaceId> {
        let workspace = store.active_workspace()?;
        let id = workspace.id().clone();
        let snapshot = Snapshot::new(workspace.nodes(), workspace.edges());
        self.history_mut(&id).push(snapshot);
        self.notify_history(&id);
        Some(id)
    }

    fn notify_history(&self, workspace: &WorkspaceId) {
        let (can_undo, depth) = self
            .histories
            .get(workspace)
            .map(|h| (h.can_undo(), h.depth()))
            .unwrap_or((false, 0));
        self.events.publish(Event::HistoryChanged {
            workspace: workspace.clone(),
            can_undo,
            depth,
        });
    }

    fn notify_selection(&self) {
        self.events.publish(Event::SelectionChanged {
            nodes: self.selection.nodes().iter().cloned().collect(),
            edges: self.selection.edges().iter().cloned().collect(),
        });
    }

    fn notify_focus(&self) {
        self.events.publish(Event::FocusChanged {
            focus: self.selection.focus().cloned(),
        });
    }

    fn reset_transient(&mut self) {
        let had_selection = !self.selection.is_empty() || self.selection.focus().is_some();
        self.selection.clear();
        if self.connection.release().is_some() {
            self.events.publish(Event::ConnectionCancelled);
        }
        if had_selection {
            self.notify_selection();
            self.notify_focus();
        }
    }

    // ------------------------------------------------------------------
    // Drag-and-drop creation
    // ------------------------------------------------------------------

    /// Creates a node from a palette drop.
    ///
    /// `client` is the pointer position and `bounds_origin` the canvas
    /// element's top-left corner, both in client coordinates.
    pub fn handle_drop(
        &mut self,
        store: &mut WorkspaceStore,
        payload: &DropPayload,
        client: Position,
        bounds_origin: Position,
    ) -> Option<NodeId> {
        let Some((entity_type, label)) = payload.required() else {
            debug!(?payload, "Ignoring drop without type or label");
            return None;
        };
        let color = payload
            .color()
            .or_else(|| self.catalog.entity_color(entity_type))
            .unwrap_or(DEFAULT_NODE_COLOR)
            .to_string();
        let position = self.viewport.project(client, bounds_origin);
        let node = NodeEntity::new(
            self.ids.next_node_id(),
            entity_type,
            label,
            color,
            position,
        );
        self.add_node(store, node)
    }

    /// Adds a fully formed node to the active workspace and focuses it.
    pub fn add_node(&mut self, store: &mut WorkspaceStore, node: NodeEntity) -> Option<NodeId> {
        let workspace = store.active_workspace_id().clone();
        if store
            .active_workspace()
            .is_none_or(|ws| ws.contains_node(&node.id))
        {
            debug!(node = %node.id, "Rejecting node with duplicate id");
            return None;
        }
        self.push_history(store);
        let id = node.id.clone();
        let entity_type = node.entity_type.clone();
        if !store.add_node(&workspace, node) {
            return None;
        }
        self.events.publish(Event::NodeCreated {
            workspace,
            id: id.clone(),
            entity_type,
        });
        self.selection.select_node(id.clone());
        self.notify_selection();
        self.notify_focus();
        Some(id)
    }

    /// Repositions a node after a drag. Not recorded in history.
    pub fn move_node(&mut self, store: &mut WorkspaceStore, id: &NodeId, position: Position) -> bool {
        let workspace = store.active_workspace_id().clone();
        if !store.update_node(&workspace, id, NodePatch::position(position)) {
            return false;
        }
        self.events.publish(Event::NodeMoved {
            workspace,
            id: id.clone(),
            x: position.x,
            y: position.y,
        });
        true
    }

    // ------------------------------------------------------------------
    // Connection handshake
    // ------------------------------------------------------------------

    pub fn begin_connection(&mut self, store: &WorkspaceStore, source: &NodeId) -> bool {
        if !store
            .active_workspace()
            .is_some_and(|ws| ws.contains_node(source))
        {
            debug!(node = %source, "Cannot start connection from unknown node");
            return false;
        }
        self.connection = ConnectionState::Dragging {
            source: source.clone(),
        };
        self.events.publish(Event::ConnectionStarted {
            source: source.clone(),
        });
        true
    }

    /// Finishes a drag. `target` is the node under the pointer, `None` when
    /// released over empty canvas.
    pub fn end_connection(
        &mut self,
        store: &mut WorkspaceStore,
        target: Option<&NodeId>,
    ) -> Option<EdgeId> {
        let source = self.connection.release()?;
        let valid_target = target.filter(|t| {
            *t != &source
                && store
                    .active_workspace()
                    .is_some_and(|ws| ws.contains_node(t) && ws.contains_node(&source))
        });
        let Some(target) = valid_target.cloned() else {
            debug!(source = %source, "Connection released without a valid target");
            self.events.publish(Event::ConnectionCancelled);
            return None;
        };

        let relationship_type = self.config.default_relationship_type.clone();
        let label = self
            .catalog
            .relationship_label(&relationship_type)
            .unwrap_or(&relationship_type)
            .to_string();
        let edge = EdgeEntity::new(
            self.ids.next_edge_id(),
            source,
            target,
            relationship_type,
            label,
        );
        self.add_edge(store, edge)
    }

    pub fn cancel_connection(&mut self) -> bool {
        if self.connection.release().is_none() {
            return false;
        }
        self.events.publish(Event::ConnectionCancelled);
        true
    }

    /// Adds a fully formed edge to the active workspace and focuses it.
    pub fn add_edge(&mut self, store: &mut WorkspaceStore, edge: EdgeEntity) -> Option<EdgeId> {
        let workspace = store.active_workspace_id().clone();
        let acceptable = store.active_workspace().is_some_and(|ws| {
            ws.edge(&edge.id).is_none()
                && ws.contains_node(&edge.source)
                && ws.contains_node(&edge.target)
        });
        if !acceptable {
            debug!(edge = %edge.id, "Rejecting edge with duplicate id or dangling endpoint");
            return None;
        }
        self.push_history(store);
        let id = edge.id.clone();
        let (source, target) = (edge.source.clone(), edge.target.clone());
        if !store.add_edge(&workspace, edge) {
            return None;
        }
        self.events.publish(Event::EdgeCreated {
            workspace,
            id: id.clone(),
            source,
            target,
        });
        self.selection.select_edge(id.clone());
        self.notify_selection();
        self.notify_focus();
        Some(id)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Plain click focuses the node; `modifier` (ctrl/cmd) toggles it in the
    /// multi-selection instead.
    pub fn click_node(&mut self, store: &WorkspaceStore, id: &NodeId, modifier: bool) -> bool {
        if !store.active_workspace().is_some_and(|ws| ws.contains_node(id)) {
            return false;
        }
        if modifier {
            self.selection.toggle_node(id.clone());
            self.notify_selection();
        } else {
            self.selection.select_node(id.clone());
            self.notify_selection();
            self.notify_focus();
        }
        true
    }

    pub fn click_edge(&mut self, store: &WorkspaceStore, id: &EdgeId, modifier: bool) -> bool {
        if !store.active_workspace().is_some_and(|ws| ws.edge(id).is_some()) {
            return false;
        }
        if modifier {
            self.selection.toggle_edge(id.clone());
            self.notify_selection();
        } else {
            self.selection.select_edge(id.clone());
            self.notify_selection();
            self.notify_focus();
        }
        true
    }

    pub fn click_background(&mut self) {
        self.selection.clear();
        self.notify_selection();
        self.notify_focus();
    }

    /// Closes whichever property panel is open without touching the selection.
    pub fn close_panel(&mut self) {
        if self.selection.focus().is_some() {
            self.selection.set_focus(None);
            self.notify_focus();
        }
    }

    // ------------------------------------------------------------------
    // History-recorded bulk operations
    // ------------------------------------------------------------------

    /// Deletes the multi-selection. Edges touching a deleted node go with it.
    pub fn delete_selected(&mut self, store: &mut WorkspaceStore) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let Some(workspace) = self.push_history(store) else {
            return false;
        };
        let nodes: Vec<NodeId> = self.selection.nodes().iter().cloned().collect();
        let edges: Vec<EdgeId> = self.selection.edges().iter().cloned().collect();
        for edge in &edges {
            store.remove_edge(&workspace, edge);
        }
        for node in &nodes {
            store.remove_node(&workspace, node);
        }
        info!(
            workspace = %workspace,
            nodes = nodes.len(),
            edges = edges.len(),
            "Deleted selection"
        );
        self.selection.clear();
        self.events.publish(Event::SelectionDeleted {
            workspace,
            nodes,
            edges,
        });
        self.notify_selection();
        self.notify_focus();
        true
    }

    /// Restores the active workspace to the snapshot before its last recorded
    /// mutation.
    pub fn undo(&mut self, store: &mut WorkspaceStore) -> bool {
        let workspace = store.active_workspace_id().clone();
        let Some(snapshot) = self
            .histories
            .get_mut(&workspace)
            .and_then(|h| h.undo())
            .cloned()
        else {
            debug!(workspace = %workspace, "Nothing to undo");
            return false;
        };
        store.set_nodes(&workspace, snapshot.nodes);
        store.set_edges(&workspace, snapshot.edges);

        if let Some(ws) = store.workspace(&workspace) {
            self.selection
                .retain(|n| ws.contains_node(n), |e| ws.edge(e).is_some());
        }
        self.connection = ConnectionState::Idle;
        self.events.publish(Event::Undo {
            workspace: workspace.clone(),
        });
        self.notify_history(&workspace);
        self.notify_selection();
        true
    }

    pub fn clear_canvas(&mut self, store: &mut WorkspaceStore) -> bool {
        if store.active_workspace().is_none_or(|ws| ws.is_empty()) {
            return false;
        }
        let Some(workspace) = self.push_history(store) else {
            return false;
        };
        store.clear_workspace(&workspace);
        self.reset_transient();
        self.events.publish(Event::WorkspaceCleared { id: workspace });
        true
    }

    /// Replaces the active graph with a saved query.
    pub fn load_template(
        &mut self,
        store: &mut WorkspaceStore,
        name: &str,
        nodes: Vec<NodeEntity>,
        edges: Vec<EdgeEntity>,
    ) -> bool {
        let Some(workspace) = self.push_history(store) else {
            return false;
        };
        store.set_nodes(&workspace, nodes);
        store.set_edges(&workspace, edges);
        self.reset_transient();
        info!(workspace = %workspace, template = name, "Loaded query template");
        self.events.publish(Event::TemplateLoaded {
            workspace,
            name: name.to_string(),
        });
        true
    }

    // ------------------------------------------------------------------
    // Workspace lifecycle
    // ------------------------------------------------------------------

    /// Drops selection, focus and any pending connection. Call after the
    /// active workspace changes.
    pub fn on_workspace_switch(&mut self) {
        self.reset_transient();
    }

    /// Releases the history of a deleted workspace.
    pub fn forget_workspace(&mut self, workspace: &WorkspaceId) {
        self.histories.remove(workspace);
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    pub fn mount_shortcuts(&self) -> ShortcutScope {
        self.shortcuts.mount()
    }

    pub fn shortcuts(&self) -> &Shortcuts {
        &self.shortcuts
    }

    /// Runs the action bound to `event`. Returns `false` when nothing is
    /// bound, the canvas is not mounted, or the action had no effect.
    pub fn handle_key(&mut self, store: &mut WorkspaceStore, event: &KeyEvent) -> bool {
        match self.shortcuts.resolve(event) {
            Some(action) => self.apply(store, action),
            None => false,
        }
    }

    pub fn apply(&mut self, store: &mut WorkspaceStore, action: CanvasAction) -> bool {
        match action {
            CanvasAction::Undo => self.undo(store),
            CanvasAction::DeleteSelection => self.delete_selected(store),
        }
    }

    pub fn focus(&self) -> Option<&FocusTarget> {
        self.selection.focus()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::Key;
    use querycanvas_core::PropertyValue;

    fn setup() -> (CanvasEditor, WorkspaceStore, EventBus) {
        let bus = EventBus::new();
        let editor = CanvasEditor::new(
            Arc::new(Catalog::builtin()),
            Arc::new(IdAllocator::new()),
            bus.clone(),
            EditorConfig::default(),
        );
        (editor, WorkspaceStore::default(), bus)
    }

    fn drop_person(editor: &mut CanvasEditor, store: &mut WorkspaceStore, x: f64, y: f64) -> NodeId {
        editor
            .handle_drop(
                store,
                &DropPayload::new("İnsan", "insan", "#2563eb"),
                Position::new(x, y),
                Position::default(),
            )
            .unwrap()
    }

    fn active_counts(store: &WorkspaceStore) -> (usize, usize) {
        let ws = store.active_workspace().unwrap();
        (ws.nodes().len(), ws.edges().len())
    }

    #[test]
    fn test_drop_creates_focused_node() {
        let (mut editor, mut store, _bus) = setup();
        let id = drop_person(&mut editor, &mut store, 120.0, 80.0);

        let ws = store.active_workspace().unwrap();
        let node = ws.node(&id).unwrap();
        assert_eq!(node.entity_type, "insan");
        assert_eq!(node.color, "#2563eb");
        assert_eq!(node.position, Position::new(120.0, 80.0));
        assert!(node.properties.is_empty());
        assert_eq!(editor.selection().focused_node(), Some(&id));
    }

    #[test]
    fn test_drop_projects_through_viewport() {
        let (mut editor, mut store, _bus) = setup();
        editor.set_viewport(Viewport {
            pan: Position::new(100.0, 50.0),
            zoom: 2.0,
        });
        let id = editor
            .handle_drop(
                &mut store,
                &DropPayload::new("Ev", "ev", "#22c55e"),
                Position::new(360.0, 230.0),
                Position::new(20.0, 20.0),
            )
            .unwrap();
        let node = store.active_workspace().unwrap().node(&id).unwrap().clone();
        assert_eq!(node.position, Position::new(120.0, 80.0));
    }

    #[test]
    fn test_malformed_drop_is_ignored() {
        let (mut editor, mut store, bus) = setup();
        let payload = DropPayload {
            label: Some("İnsan".to_string()),
            entity_type: None,
            color: Some("#2563eb".to_string()),
        };
        assert!(
            editor
                .handle_drop(&mut store, &payload, Position::default(), Position::default())
                .is_none()
        );
        assert_eq!(active_counts(&store), (0, 0));
        assert!(bus.drain().is_empty());
        assert!(!editor.can_undo(store.active_workspace_id()));
    }

    #[test]
    fn test_drop_color_falls_back_to_catalog() {
        let (mut editor, mut store, _bus) = setup();
        let payload = DropPayload {
            label: Some("Plaka".to_string()),
            entity_type: Some("plaka".to_string()),
            color: None,
        };
        let id = editor
            .handle_drop(&mut store, &payload, Position::default(), Position::default())
            .unwrap();
        let unknown = DropPayload {
            label: Some("Gemi".to_string()),
            entity_type: Some("gemi".to_string()),
            color: None,
        };
        let other = editor
            .handle_drop(&mut store, &unknown, Position::default(), Position::default())
            .unwrap();
        let ws = store.active_workspace().unwrap();
        assert_eq!(ws.node(&id).unwrap().color, "#f59e42");
        assert_eq!(ws.node(&other).unwrap().color, DEFAULT_NODE_COLOR);
    }

    #[test]
    fn test_connection_creates_focused_default_edge() {
        let (mut editor, mut store, _bus) = setup();
        let n1 = drop_person(&mut editor, &mut store, 0.0, 0.0);
        let n2 = drop_person(&mut editor, &mut store, 200.0, 0.0);

        assert!(editor.begin_connection(&store, &n1));
        let edge_id = editor.end_connection(&mut store, Some(&n2)).unwrap();

        let ws = store.active_workspace().unwrap();
        assert_eq!(ws.edges().len(), 1);
        let edge = ws.edge(&edge_id).unwrap();
        assert_eq!(edge.source, n1);
        assert_eq!(edge.target, n2);
        assert_eq!(edge.relationship_type, DEFAULT_RELATIONSHIP_TYPE);
        assert_eq!(edge.label, "Genel Bağlantı");
        assert!(edge.properties.is_empty());
        assert_eq!(editor.selection().focused_edge(), Some(&edge_id));
        assert!(!editor.connection().is_dragging());
    }

    #[test]
    fn test_release_over_canvas_or_source_creates_nothing() {
        let (mut editor, mut store, _bus) = setup();
        let n1 = drop_person(&mut editor, &mut store, 0.0, 0.0);

        editor.begin_connection(&store, &n1);
        assert!(editor.end_connection(&mut store, None).is_none());
        editor.begin_connection(&store, &n1);
        assert!(editor.end_connection(&mut store, Some(&n1)).is_none());
        editor.begin_connection(&store, &n1);
        assert!(
            editor
                .end_connection(&mut store, Some(&NodeId::from("ghost")))
                .is_none()
        );

        assert_eq!(active_counts(&store), (1, 0));
        assert_eq!(*editor.connection(), ConnectionState::Idle);
    }

    #[test]
    fn test_end_without_begin_is_noop() {
        let (mut editor, mut store, _bus) = setup();
        let n1 = drop_person(&mut editor, &mut store, 0.0, 0.0);
        assert!(editor.end_connection(&mut store, Some(&n1)).is_none());
        assert!(!editor.begin_connection(&store, &NodeId::from("ghost")));
    }

    #[test]
    fn test_multi_delete_cascades() {
        let (mut editor, mut store, _bus) = setup();
        let n1 = drop_person(&mut editor, &mut store, 0.0, 0.0);
        let n2 = drop_person(&mut editor, &mut store, 100.0, 0.0);
        let n3 = drop_person(&mut editor, &mut store, 0.0, 100.0);
        let n4 = drop_person(&mut editor, &mut store, 100.0, 100.0);
        editor.begin_connection(&store, &n1);
        let e1 = editor.end_connection(&mut store, Some(&n2)).unwrap();
        editor.begin_connection(&store, &n3);
        let e2 = editor.end_connection(&mut store, Some(&n4)).unwrap();

        editor.click_background();
        editor.click_node(&store, &n1, true);
        editor.click_node(&store, &n3, true);
        let _scope = editor.mount_shortcuts();
        assert!(editor.handle_key(&mut store, &KeyEvent::plain(Key::Delete)));

        let ws = store.active_workspace().unwrap();
        assert!(ws.contains_node(&n2));
        assert!(ws.contains_node(&n4));
        assert!(!ws.contains_node(&n1));
        assert!(!ws.contains_node(&n3));
        assert!(ws.edge(&e1).is_none());
        assert!(ws.edge(&e2).is_none());
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_delete_with_empty_selection_is_disabled() {
        let (mut editor, mut store, _bus) = setup();
        drop_person(&mut editor, &mut store, 0.0, 0.0);
        editor.click_background();
        let depth = editor.history(store.active_workspace_id()).unwrap().depth();
        assert!(!editor.delete_selected(&mut store));
        assert_eq!(
            editor.history(store.active_workspace_id()).unwrap().depth(),
            depth
        );
    }

    #[test]
    fn test_modifier_click_leaves_focus() {
        let (mut editor, mut store, _bus) = setup();
        let n1 = drop_person(&mut editor, &mut store, 0.0, 0.0);
        let n2 = drop_person(&mut editor, &mut store, 10.0, 0.0);
        editor.click_node(&store, &n1, false);
        editor.click_node(&store, &n2, true);
        assert_eq!(editor.selection().nodes().len(), 2);
        assert_eq!(editor.selection().focused_node(), Some(&n1));

        editor.click_background();
        assert!(editor.selection().is_empty());
        assert!(editor.focus().is_none());
    }

    #[test]
    fn test_undo_restores_previous_graph() {
        let (mut editor, mut store, _bus) = setup();
        let n1 = drop_person(&mut editor, &mut store, 0.0, 0.0);
        let n2 = drop_person(&mut editor, &mut store, 10.0, 0.0);
        let before = store.active_workspace().unwrap().clone();

        editor.begin_connection(&store, &n1);
        editor.end_connection(&mut store, Some(&n2)).unwrap();
        assert!(editor.undo(&mut store));

        let after = store.active_workspace().unwrap();
        assert_eq!(after.nodes(), before.nodes());
        assert_eq!(after.edges(), before.edges());
        // The focused edge no longer exists.
        assert!(editor.focus().is_none());
    }

    #[test]
    fn test_undo_via_shortcut_requires_mount() {
        let (mut editor, mut store, _bus) = setup();
        drop_person(&mut editor, &mut store, 0.0, 0.0);
        let undo = KeyEvent::command(Key::Char('z'));
        assert!(!editor.handle_key(&mut store, &undo));
        assert_eq!(active_counts(&store), (1, 0));

        let scope = editor.mount_shortcuts();
        assert!(editor.handle_key(&mut store, &undo));
        assert_eq!(active_counts(&store), (0, 0));
        drop(scope);
    }

    #[test]
    fn test_history_is_per_workspace() {
        let (mut editor, mut store, _bus) = setup();
        drop_person(&mut editor, &mut store, 0.0, 0.0);
        let first = store.active_workspace_id().clone();

        let second = store.create_workspace("İkinci");
        editor.on_workspace_switch();
        assert!(!editor.undo(&mut store));

        store.set_active_workspace(&first);
        editor.on_workspace_switch();
        assert!(editor.undo(&mut store));
        assert!(store.workspace(&first).unwrap().is_empty());
        assert!(store.workspace(&second).unwrap().is_empty());
    }

    #[test]
    fn test_workspace_switch_clears_transient_state() {
        let (mut editor, mut store, _bus) = setup();
        let n1 = drop_person(&mut editor, &mut store, 0.0, 0.0);
        editor.begin_connection(&store, &n1);
        store.create_workspace("B");
        editor.on_workspace_switch();
        assert!(editor.selection().is_empty());
        assert!(editor.focus().is_none());
        assert!(!editor.connection().is_dragging());
    }

    #[test]
    fn test_move_node_is_not_recorded() {
        let (mut editor, mut store, _bus) = setup();
        let n1 = drop_person(&mut editor, &mut store, 0.0, 0.0);
        let depth = editor.history(store.active_workspace_id()).unwrap().depth();
        assert!(editor.move_node(&mut store, &n1, Position::new(5.0, 6.0)));
        assert_eq!(
            editor.history(store.active_workspace_id()).unwrap().depth(),
            depth
        );
        let node = store.active_workspace().unwrap().node(&n1).unwrap().clone();
        assert_eq!(node.position, Position::new(5.0, 6.0));
    }

    #[test]
    fn test_clear_canvas_is_undoable() {
        let (mut editor, mut store, _bus) = setup();
        let n1 = drop_person(&mut editor, &mut store, 0.0, 0.0);
        assert!(editor.clear_canvas(&mut store));
        assert_eq!(active_counts(&store), (0, 0));
        assert!(!editor.clear_canvas(&mut store));
        assert!(editor.undo(&mut store));
        assert!(store.active_workspace().unwrap().contains_node(&n1));
    }

    #[test]
    fn test_load_template_replaces_graph() {
        let (mut editor, mut store, _bus) = setup();
        drop_person(&mut editor, &mut store, 0.0, 0.0);
        let mut a = NodeEntity::new(
            NodeId::from("t1"),
            "insan",
            "İnsan",
            "#2563eb",
            Position::default(),
        );
        a.properties
            .insert("isim".to_string(), PropertyValue::from("Ahmet"));
        let b = NodeEntity::new(
            NodeId::from("t2"),
            "plaka",
            "Plaka",
            "#f59e42",
            Position::new(200.0, 0.0),
        );
        let edge = EdgeEntity::new(
            EdgeId::from("te1"),
            NodeId::from("t1"),
            NodeId::from("t2"),
            "arac_sahibi",
            "Araç Sahibi",
        );
        assert!(editor.load_template(&mut store, "Araç sahipleri", vec![a, b], vec![edge]));
        assert_eq!(active_counts(&store), (2, 1));
        assert!(editor.undo(&mut store));
        assert_eq!(active_counts(&store), (1, 0));
    }

    #[test]
    fn test_events_published_for_creation() {
        let (mut editor, mut store, bus) = setup();
        drop_person(&mut editor, &mut store, 0.0, 0.0);
        let events = bus.drain();
        assert!(matches!(events[0], Event::HistoryChanged { depth: 1, .. }));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, Event::NodeCreated { entity_type, .. } if entity_type == "insan"))
        );
        assert!(
            events
                .iter()
                .any(|e| matches!(e, Event::FocusChanged { focus: Some(FocusTarget::Node(_)) }))
        );
    }
}
