//! Property side panels for the focused node or edge.

use crate::editor::CanvasEditor;
use querycanvas_core::{
    Catalog, EdgeEntity, EdgeId, EdgePatch, FieldKind, FieldSchema, NodeEntity, NodeId, NodePatch,
    PropertyMap, PropertyValue,
};
use querycanvas_events::{Event, FocusTarget};
use querycanvas_workspace::{Workspace, WorkspaceStore};
use serde::Serialize;
use tracing::debug;

/// Field key of the relationship-type selector on an edge panel.
pub const RELATIONSHIP_TYPE_FIELD: &str = "type";

pub const EMPTY_STATE_MESSAGE: &str = "Bu tür için tanımlı özellik yok";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Current value rendered as input text. Empty when unset.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointView {
    pub id: NodeId,
    pub label: String,
    pub entity_type: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum PanelView {
    Node {
        id: NodeId,
        title: String,
        entity_type: String,
        color: String,
        fields: Vec<FieldView>,
        empty_state: Option<&'static str>,
    },
    Edge {
        id: EdgeId,
        title: String,
        relationship_type: String,
        relationship_options: Vec<RelationshipOption>,
        source: Option<EndpointView>,
        target: Option<EndpointView>,
        fields: Vec<FieldView>,
        empty_state: Option<&'static str>,
    },
}

impl PanelView {
    pub fn fields(&self) -> &[FieldView] {
        match self {
            PanelView::Node { fields, .. } | PanelView::Edge { fields, .. } => fields,
        }
    }

    pub fn is_empty_state(&self) -> bool {
        match self {
            PanelView::Node { empty_state, .. } | PanelView::Edge { empty_state, .. } => {
                empty_state.is_some()
            }
        }
    }
}

fn field_views(schema: &[FieldSchema], values: &PropertyMap) -> Vec<FieldView> {
    schema
        .iter()
        .map(|field| FieldView {
            key: field.key.clone(),
            label: field.label.clone(),
            kind: field.kind,
            options: field.options.clone(),
            value: values
                .get(&field.key)
                .map(ToString::to_string)
                .unwrap_or_default(),
        })
        .collect()
}

fn empty_state(fields: &[FieldView]) -> Option<&'static str> {
    fields.is_empty().then_some(EMPTY_STATE_MESSAGE)
}

pub fn render_node_panel(node: &NodeEntity, catalog: &Catalog) -> PanelView {
    let fields = field_views(catalog.entity_fields(&node.entity_type), &node.properties);
    PanelView::Node {
        id: node.id.clone(),
        title: format!("{} Özellikleri", node.label),
        entity_type: node.entity_type.clone(),
        color: node.color.clone(),
        empty_state: empty_state(&fields),
        fields,
    }
}

/// Renders an edge panel. `workspace` supplies the endpoint nodes for the
/// connection summary.
pub fn render_edge_panel(edge: &EdgeEntity, workspace: &Workspace, catalog: &Catalog) -> PanelView {
    let endpoint = |id: &NodeId| {
        workspace.node(id).map(|n| EndpointView {
            id: n.id.clone(),
            label: n.label.clone(),
            entity_type: n.entity_type.clone(),
            color: n.color.clone(),
        })
    };
    let fields = field_views(
        catalog.relationship_fields(&edge.relationship_type),
        &edge.properties,
    );
    PanelView::Edge {
        id: edge.id.clone(),
        title: format!("{} Özellikleri", edge.label),
        relationship_type: edge.relationship_type.clone(),
        relationship_options: catalog
            .relationship_types()
            .iter()
            .map(|r| RelationshipOption {
                value: r.id.clone(),
                label: r.label.clone(),
            })
            .collect(),
        source: endpoint(&edge.source),
        target: endpoint(&edge.target),
        empty_state: empty_state(&fields),
        fields,
    }
}

/// Schema-driven coercion of one raw input. Keys outside the schema are kept
/// as text.
fn coerce_field(schema: &[FieldSchema], key: &str, raw: &str) -> Option<PropertyValue> {
    let kind = schema
        .iter()
        .find(|f| f.key == key)
        .map(|f| f.kind)
        .unwrap_or(FieldKind::Text);
    kind.coerce(raw)
}

impl CanvasEditor {
    /// The panel for whatever currently holds edit focus.
    pub fn focused_panel(&self, store: &WorkspaceStore) -> Option<PanelView> {
        let workspace = store.active_workspace()?;
        match self.focus()? {
            FocusTarget::Node(id) => workspace
                .node(id)
                .map(|node| render_node_panel(node, self.catalog())),
            FocusTarget::Edge(id) => workspace
                .edge(id)
                .map(|edge| render_edge_panel(edge, workspace, self.catalog())),
        }
    }

    /// Applies one form edit to a node in the active workspace. Numeric
    /// fields reject input that is not a number.
    pub fn edit_node_field(
        &mut self,
        store: &mut WorkspaceStore,
        id: &NodeId,
        key: &str,
        raw: &str,
    ) -> bool {
        let workspace = store.active_workspace_id().clone();
        let Some(node) = store.workspace(&workspace).and_then(|ws| ws.node(id)) else {
            return false;
        };
        let Some(value) = coerce_field(self.catalog().entity_fields(&node.entity_type), key, raw)
        else {
            debug!(node = %id, key, raw, "Rejecting non-numeric input");
            return false;
        };
        if !store.update_node(&workspace, id, NodePatch::property(key, value)) {
            return false;
        }
        self.events().publish(Event::NodeUpdated {
            workspace,
            id: id.clone(),
        });
        true
    }

    /// Applies one form edit to an edge. The relationship-type selector is
    /// routed through [`Self::set_relationship_type`].
    pub fn edit_edge_field(
        &mut self,
        store: &mut WorkspaceStore,
        id: &EdgeId,
        key: &str,
        raw: &str,
    ) -> bool {
        if key == RELATIONSHIP_TYPE_FIELD {
            return self.set_relationship_type(store, id, raw);
        }
        let workspace = store.active_workspace_id().clone();
        let Some(edge) = store.workspace(&workspace).and_then(|ws| ws.edge(id)) else {
            return false;
        };
        let schema = self.catalog().relationship_fields(&edge.relationship_type);
        let Some(value) = coerce_field(schema, key, raw) else {
            debug!(edge = %id, key, raw, "Rejecting non-numeric input");
            return false;
        };
        if !store.update_edge(&workspace, id, EdgePatch::property(key, value)) {
            return false;
        }
        self.events().publish(Event::EdgeUpdated {
            workspace,
            id: id.clone(),
        });
        true
    }

    /// Writes the relationship type and its catalog label in one update.
    /// Types the catalog does not know are ignored.
    pub fn set_relationship_type(
        &mut self,
        store: &mut WorkspaceStore,
        id: &EdgeId,
        relationship_type: &str,
    ) -> bool {
        let Some(label) = self.catalog().relationship_label(relationship_type) else {
            debug!(edge = %id, relationship_type, "Unknown relationship type");
            return false;
        };
        let patch = EdgePatch::relationship(relationship_type, label);
        let workspace = store.active_workspace_id().clone();
        if !store.update_edge(&workspace, id, patch) {
            return false;
        }
        self.events().publish(Event::EdgeUpdated {
            workspace,
            id: id.clone(),
        });
        true
    }

    /// Renames the focused node's display label.
    pub fn rename_node(&mut self, store: &mut WorkspaceStore, id: &NodeId, label: &str) -> bool {
        let workspace = store.active_workspace_id().clone();
        let patch = NodePatch {
            label: Some(label.to_string()),
            ..Default::default()
        };
        if !store.update_node(&workspace, id, patch) {
            return false;
        }
        self.events().publish(Event::NodeUpdated {
            workspace,
            id: id.clone(),
        });
        true
    }
}
