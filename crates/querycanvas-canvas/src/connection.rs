use querycanvas_core::NodeId;

/// Progress of a drag from a node's connection handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Idle,
    Dragging { source: NodeId },
}

impl ConnectionState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, ConnectionState::Dragging { .. })
    }

    pub fn source(&self) -> Option<&NodeId> {
        match self {
            ConnectionState::Dragging { source } => Some(source),
            ConnectionState::Idle => None,
        }
    }

    /// Leaves `Idle` behind and hands back the drag source, if any.
    pub fn release(&mut self) -> Option<NodeId> {
        match std::mem::take(self) {
            ConnectionState::Dragging { source } => Some(source),
            ConnectionState::Idle => None,
        }
    }
}
