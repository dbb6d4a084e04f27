use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use querycanvas_canvas::{
    CanvasEditor, DropPayload, EditorConfig, KeyEvent, PanelView, ShortcutScope, Viewport,
};
use querycanvas_core::{Catalog, EdgeId, IdAllocator, NodeId, Position, WorkspaceId};
use querycanvas_events::{Event, EventBus};
use querycanvas_query::{
    MockQueryBackend, QueryBackend, QueryError, QueryParams, QueryRequest, QueryResult,
    QuerySession, QueryTemplate, ResultTable, builtin_templates, find_template,
};
use querycanvas_workspace::{Workspace, WorkspaceStore};
use serde::Serialize;
use std::sync::Arc;

mod settings;

pub use settings::{AppSettings, SettingsError};

struct AppState {
    store: WorkspaceStore,
    editor: CanvasEditor,
    session: QuerySession,
    params: QueryParams,
    templates: Vec<QueryTemplate>,
}

/// Held across the backend await. If the submission future is dropped first
/// (timeout, `select!`, aborted task) the session goes back to `Idle`.
struct PendingQuery<'a> {
    state: &'a Mutex<AppState>,
    events: &'a EventBus,
    armed: bool,
}

impl PendingQuery<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingQuery<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.state.lock().session.abort();
        tracing::warn!("Query submission dropped before the backend answered");
        self.events.publish(Event::QueryRejected {
            reason: "submission cancelled".to_string(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceSummary {
    pub id: WorkspaceId,
    pub name: String,
    pub active: bool,
    pub node_count: usize,
    pub edge_count: usize,
}

/// Headless orchestrator for the query canvas.
///
/// Any shell (CLI, desktop, web bridge) drives the editor through this
/// controller and subscribes to [`Event`]s. State lives behind one mutex; no
/// lock is held across the query backend's await point.
pub struct AppController<B = MockQueryBackend> {
    state: Arc<Mutex<AppState>>,
    backend: Arc<B>,
    events: EventBus,
}

impl<B> Clone for AppController<B> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            backend: Arc::clone(&self.backend),
            events: self.events.clone(),
        }
    }
}

impl Default for AppController {
    fn default() -> Self {
        Self::new(&AppSettings::default())
    }
}

impl AppController {
    pub fn new(settings: &AppSettings) -> Self {
        Self::with_backend(
            settings,
            MockQueryBackend::new(settings.mock_query_delay()),
        )
    }
}

impl<B: QueryBackend> AppController<B> {
    pub fn with_backend(settings: &AppSettings, backend: B) -> Self {
        let events = EventBus::new();
        let editor = CanvasEditor::new(
            Arc::new(Catalog::builtin()),
            Arc::new(IdAllocator::new()),
            events.clone(),
            EditorConfig {
                history_limit: settings.history_limit,
                default_relationship_type: settings.default_relationship_type.clone(),
            },
        );
        let params = QueryParams::clamped(
            settings.default_result_limit.into(),
            settings.default_query_depth.into(),
        );
        Self {
            state: Arc::new(Mutex::new(AppState {
                store: WorkspaceStore::new(settings.default_workspace_name.clone()),
                editor,
                session: QuerySession::default(),
                params,
                templates: builtin_templates(),
            })),
            backend: Arc::new(backend),
            events,
        }
    }

    /// Subscribe to editor and workspace events.
    ///
    /// The bus is unbounded and every receiver shares one queue: the embedder
    /// must consume it (`recv`, [`Self::drain_events`] or
    /// [`EventBus::dispatch_to`]) or it grows with every edit.
    pub fn events(&self) -> Receiver<Event> {
        self.events.receiver()
    }

    /// Takes every pending event off the bus.
    pub fn drain_events(&self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    /// Read access to the store and editor under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&WorkspaceStore, &CanvasEditor) -> R) -> R {
        let s = self.state.lock();
        f(&s.store, &s.editor)
    }

    fn edit<R>(&self, f: impl FnOnce(&mut WorkspaceStore, &mut CanvasEditor) -> R) -> R {
        let mut s = self.state.lock();
        let AppState { store, editor, .. } = &mut *s;
        f(store, editor)
    }

    pub fn active_workspace(&self) -> Option<Workspace> {
        self.read(|store, _| store.active_workspace().cloned())
    }

    pub fn workspaces(&self) -> Vec<WorkspaceSummary> {
        self.read(|store, _| {
            let active = store.active_workspace_id();
            store
                .workspaces()
                .map(|ws| WorkspaceSummary {
                    id: ws.id().clone(),
                    name: ws.name().to_string(),
                    active: ws.id() == active,
                    node_count: ws.nodes().len(),
                    edge_count: ws.edges().len(),
                })
                .collect()
        })
    }

    // ------------------------------------------------------------------
    // Workspaces
    // ------------------------------------------------------------------

    pub fn create_workspace(&self, name: &str) -> WorkspaceId {
        let id = self.edit(|store, editor| {
            let id = store.create_workspace(name);
            editor.on_workspace_switch();
            id
        });
        tracing::info!(workspace = %id, name, "Created workspace");
        self.events.publish(Event::WorkspaceCreated {
            id: id.clone(),
            name: name.to_string(),
        });
        self.events.publish(Event::WorkspaceActivated { id: id.clone() });
        id
    }

    pub fn switch_workspace(&self, id: &WorkspaceId) -> bool {
        let switched = self.edit(|store, editor| {
            if store.active_workspace_id() == id {
                return false;
            }
            let switched = store.set_active_workspace(id);
            if switched {
                editor.on_workspace_switch();
            }
            switched
        });
        if switched {
            self.events.publish(Event::WorkspaceActivated { id: id.clone() });
        }
        switched
    }

    pub fn rename_workspace(&self, id: &WorkspaceId, name: &str) -> bool {
        let renamed = self.edit(|store, _| store.rename_workspace(id, name));
        if renamed {
            self.events.publish(Event::WorkspaceRenamed {
                id: id.clone(),
                name: name.to_string(),
            });
        }
        renamed
    }

    pub fn delete_workspace(&self, id: &WorkspaceId) -> bool {
        let outcome = self.edit(|store, editor| {
            let was_active = store.active_workspace_id() == id;
            if !store.delete_workspace(id) {
                return None;
            }
            editor.forget_workspace(id);
            if was_active {
                editor.on_workspace_switch();
                return Some(Some(store.active_workspace_id().clone()));
            }
            Some(None)
        });
        let Some(activated) = outcome else {
            return false;
        };
        tracing::info!(workspace = %id, "Deleted workspace");
        self.events.publish(Event::WorkspaceDeleted { id: id.clone() });
        if let Some(active) = activated {
            self.events.publish(Event::WorkspaceActivated { id: active });
        }
        true
    }

    // ------------------------------------------------------------------
    // Canvas
    // ------------------------------------------------------------------

    pub fn drop_entity(
        &self,
        payload: &DropPayload,
        client: Position,
        bounds_origin: Position,
    ) -> Option<NodeId> {
        self.edit(|store, editor| editor.handle_drop(store, payload, client, bounds_origin))
    }

    pub fn move_node(&self, id: &NodeId, position: Position) -> bool {
        self.edit(|store, editor| editor.move_node(store, id, position))
    }

    pub fn begin_connection(&self, source: &NodeId) -> bool {
        self.edit(|store, editor| editor.begin_connection(store, source))
    }

    pub fn end_connection(&self, target: Option<&NodeId>) -> Option<EdgeId> {
        self.edit(|store, editor| editor.end_connection(store, target))
    }

    pub fn connect(&self, source: &NodeId, target: &NodeId) -> Option<EdgeId> {
        self.edit(|store, editor| {
            if !editor.begin_connection(store, source) {
                return None;
            }
            editor.end_connection(store, Some(target))
        })
    }

    pub fn click_node(&self, id: &NodeId, modifier: bool) -> bool {
        self.edit(|store, editor| editor.click_node(store, id, modifier))
    }

    pub fn click_edge(&self, id: &EdgeId, modifier: bool) -> bool {
        self.edit(|store, editor| editor.click_edge(store, id, modifier))
    }

    pub fn click_background(&self) {
        self.edit(|_, editor| editor.click_background());
    }

    pub fn delete_selected(&self) -> bool {
        self.edit(|store, editor| editor.delete_selected(store))
    }

    pub fn undo(&self) -> bool {
        self.edit(|store, editor| editor.undo(store))
    }

    pub fn clear_canvas(&self) -> bool {
        self.edit(|store, editor| editor.clear_canvas(store))
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.edit(|_, editor| editor.set_viewport(viewport));
    }

    pub fn mount_shortcuts(&self) -> ShortcutScope {
        self.read(|_, editor| editor.mount_shortcuts())
    }

    pub fn handle_key(&self, event: &KeyEvent) -> bool {
        self.edit(|store, editor| editor.handle_key(store, event))
    }

    // ------------------------------------------------------------------
    // Property panels
    // ------------------------------------------------------------------

    pub fn focused_panel(&self) -> Option<PanelView> {
        self.read(|store, editor| editor.focused_panel(store))
    }

    pub fn edit_node_field(&self, id: &NodeId, key: &str, raw: &str) -> bool {
        self.edit(|store, editor| editor.edit_node_field(store, id, key, raw))
    }

    pub fn edit_edge_field(&self, id: &EdgeId, key: &str, raw: &str) -> bool {
        self.edit(|store, editor| editor.edit_edge_field(store, id, key, raw))
    }

    pub fn set_relationship_type(&self, id: &EdgeId, relationship_type: &str) -> bool {
        self.edit(|store, editor| editor.set_relationship_type(store, id, relationship_type))
    }

    // ------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------

    pub fn templates(&self) -> Vec<QueryTemplate> {
        self.state.lock().templates.clone()
    }

    pub fn load_template(&self, template_id: &str) -> Result<(), QueryError> {
        let mut s = self.state.lock();
        let template = find_template(&s.templates, template_id)?.clone();
        let AppState { store, editor, .. } = &mut *s;
        editor.load_template(store, &template.name, template.nodes, template.edges);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Query submission
    // ------------------------------------------------------------------

    pub fn query_params(&self) -> QueryParams {
        self.state.lock().params
    }

    pub fn set_query_params(&self, result_limit: i64, query_depth: i64) -> Result<(), QueryError> {
        let params = QueryParams::new(result_limit, query_depth)?;
        self.state.lock().params = params;
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().session.is_loading()
    }

    /// Submits the active workspace graph. Editing stays available while the
    /// query runs; a second submission is rejected until it completes.
    pub async fn submit_query(&self) -> Result<QueryResult, QueryError> {
        let request = {
            let mut s = self.state.lock();
            if let Err(err) = s.session.begin() {
                self.events.publish(Event::QueryRejected {
                    reason: err.to_string(),
                });
                return Err(err);
            }
            let workspace = s.store.active_workspace_id().clone();
            let request = match s.store.active_workspace() {
                Some(ws) => QueryRequest::new(ws.nodes(), ws.edges(), s.params),
                None => QueryRequest::new(&[], &[], s.params),
            };
            tracing::info!(
                workspace = %workspace,
                nodes = request.nodes.len(),
                edges = request.edges.len(),
                "Submitting query"
            );
            self.events.publish(Event::QuerySubmitted {
                workspace,
                node_count: request.nodes.len(),
                edge_count: request.edges.len(),
                result_limit: request.result_limit,
                query_depth: request.query_depth,
            });
            request
        };

        let pending = PendingQuery {
            state: &*self.state,
            events: &self.events,
            armed: true,
        };
        let outcome = self.backend.execute(&request).await;
        pending.disarm();

        let mut s = self.state.lock();
        match &outcome {
            Ok(result) => {
                s.session.complete(result.clone());
                self.events.publish(Event::QueryCompleted {
                    element_count: result.len(),
                });
            }
            Err(err) => {
                s.session.abort();
                self.events.publish(Event::QueryRejected {
                    reason: err.to_string(),
                });
            }
        }
        outcome
    }

    pub fn last_result(&self) -> Option<QueryResult> {
        self.state.lock().session.result().cloned()
    }

    pub fn result_table(&self) -> Option<ResultTable> {
        self.state
            .lock()
            .session
            .result()
            .map(ResultTable::from_result)
    }
}
