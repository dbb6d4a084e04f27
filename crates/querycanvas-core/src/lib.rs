use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub mod catalog;
pub mod property;

pub use catalog::{
    Catalog, DEFAULT_RELATIONSHIP_TYPE, EntityType, FieldKind, FieldSchema,
    RelationshipType,
};
pub use property::{PropertyMap, PropertyValue};

/// Fallback node color when neither the drop payload nor the catalog has one.
pub const DEFAULT_NODE_COLOR: &str = "#2563eb";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(pub String);

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkspaceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Hands out node and edge ids for the lifetime of a session.
///
/// Edges reference nodes by id, so an id is never handed out twice even after
/// the node it named has been deleted.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next_node: AtomicU64,
    next_edge: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_node_id(&self) -> NodeId {
        let n = self.next_node.fetch_add(1, Ordering::Relaxed);
        NodeId(format!("node_{n}"))
    }

    pub fn next_edge_id(&self) -> EdgeId {
        let n = self.next_edge.fetch_add(1, Ordering::Relaxed);
        EdgeId(format!("edge_{n}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntity {
    pub id: NodeId,
    pub entity_type: String,
    pub label: String,
    pub color: String,
    pub position: Position,
    #[serde(default)]
    pub properties: PropertyMap,
}

impl NodeEntity {
    pub fn new(
        id: NodeId,
        entity_type: impl Into<String>,
        label: impl Into<String>,
        color: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id,
            entity_type: entity_type.into(),
            label: label.into(),
            color: color.into(),
            position,
            properties: PropertyMap::new(),
        }
    }

    /// Shallow merge: scalar fields are replaced, properties merged key by key.
    pub fn apply(&mut self, patch: NodePatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(entity_type) = patch.entity_type {
            self.entity_type = entity_type;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        self.properties.extend(patch.properties);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeEntity {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub relationship_type: String,
    pub label: String,
    #[serde(default)]
    pub properties: PropertyMap,
}

impl EdgeEntity {
    pub fn new(
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        relationship_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source,
            target,
            relationship_type: relationship_type.into(),
            label: label.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    pub fn apply(&mut self, patch: EdgePatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(relationship_type) = patch.relationship_type {
            self.relationship_type = relationship_type;
        }
        self.properties.extend(patch.properties);
    }
}

/// Partial node update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePatch {
    pub label: Option<String>,
    pub color: Option<String>,
    pub entity_type: Option<String>,
    pub position: Option<Position>,
    pub properties: PropertyMap,
}

impl NodePatch {
    pub fn property(key: impl Into<String>, value: PropertyValue) -> Self {
        let mut properties = PropertyMap::new();
        properties.insert(key.into(), value);
        Self {
            properties,
            ..Default::default()
        }
    }

    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.color.is_none()
            && self.entity_type.is_none()
            && self.position.is_none()
            && self.properties.is_empty()
    }
}

/// Partial edge update. The relationship type and label travel together when
/// the type selector changes so the rendered label never drifts from the type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgePatch {
    pub label: Option<String>,
    pub relationship_type: Option<String>,
    pub properties: PropertyMap,
}

impl EdgePatch {
    pub fn property(key: impl Into<String>, value: PropertyValue) -> Self {
        let mut properties = PropertyMap::new();
        properties.insert(key.into(), value);
        Self {
            properties,
            ..Default::default()
        }
    }

    pub fn relationship(relationship_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            relationship_type: Some(relationship_type.into()),
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.relationship_type.is_none() && self.properties.is_empty()
    }
}
