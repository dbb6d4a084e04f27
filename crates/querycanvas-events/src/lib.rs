use crossbeam_channel::{Receiver, Sender, unbounded};
use querycanvas_core::{EdgeId, NodeId, WorkspaceId};
use serde::{Deserialize, Serialize};

/// The single node or edge open for detailed property editing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusTarget {
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Workspaces
    WorkspaceCreated {
        id: WorkspaceId,
        name: String,
    },
    WorkspaceActivated {
        id: WorkspaceId,
    },
    WorkspaceRenamed {
        id: WorkspaceId,
        name: String,
    },
    WorkspaceDeleted {
        id: WorkspaceId,
    },
    WorkspaceCleared {
        id: WorkspaceId,
    },

    // Canvas graph
    NodeCreated {
        workspace: WorkspaceId,
        id: NodeId,
        entity_type: String,
    },
    NodeMoved {
        workspace: WorkspaceId,
        id: NodeId,
        x: f64,
        y: f64,
    },
    NodeUpdated {
        workspace: WorkspaceId,
        id: NodeId,
    },
    EdgeCreated {
        workspace: WorkspaceId,
        id: EdgeId,
        source: NodeId,
        target: NodeId,
    },
    EdgeUpdated {
        workspace: WorkspaceId,
        id: EdgeId,
    },
    SelectionDeleted {
        workspace: WorkspaceId,
        nodes: Vec<NodeId>,
        edges: Vec<EdgeId>,
    },
    TemplateLoaded {
        workspace: WorkspaceId,
        name: String,
    },

    // Connection handshake
    ConnectionStarted {
        source: NodeId,
    },
    ConnectionCancelled,

    // Selection
    SelectionChanged {
        nodes: Vec<NodeId>,
        edges: Vec<EdgeId>,
    },
    FocusChanged {
        focus: Option<FocusTarget>,
    },

    // ========================================================================
    // Undo History
    // ========================================================================
    Undo {
        workspace: WorkspaceId,
    },
    HistoryChanged {
        workspace: WorkspaceId,
        can_undo: bool,
        depth: usize,
    },

    // ========================================================================
    // Query Submission
    // ========================================================================
    QuerySubmitted {
        workspace: WorkspaceId,
        node_count: usize,
        edge_count: usize,
        result_limit: u32,
        query_depth: u32,
    },
    QueryCompleted {
        element_count: usize,
    },
    QueryRejected {
        reason: String,
    },
}

/// Unbounded multi-producer queue. Receivers are clones of one channel, so
/// each event is delivered once; nothing is dropped until someone drains it.
#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Drain every pending event without dispatching it.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }

    /// Dispatch all pending events to a listener.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Trait for components that respond to events.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
