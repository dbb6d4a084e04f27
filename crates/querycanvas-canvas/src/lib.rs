//! Interactive editing model for the query canvas: drag-and-drop creation,
//! the connection handshake, selection, bounded undo and the property panels.

pub mod connection;
pub mod editor;
pub mod history;
pub mod panels;
pub mod selection;
pub mod shortcuts;
pub mod viewport;

pub use connection::ConnectionState;
pub use editor::{CanvasEditor, EditorConfig};
pub use history::{DEFAULT_HISTORY_LIMIT, History, Snapshot};
pub use panels::{
    EMPTY_STATE_MESSAGE, EndpointView, FieldView, PanelView, RELATIONSHIP_TYPE_FIELD,
    RelationshipOption, render_edge_panel, render_node_panel,
};
pub use selection::Selection;
pub use shortcuts::{CanvasAction, Key, KeyEvent, ShortcutScope, Shortcuts};
pub use viewport::{DRAG_COLOR_KEY, DRAG_LABEL_KEY, DRAG_TYPE_KEY, DropPayload, Viewport};
