use querycanvas_core::Position;
use serde::{Deserialize, Serialize};

pub const DRAG_LABEL_KEY: &str = "application/reactflow-label";
pub const DRAG_TYPE_KEY: &str = "application/reactflow-type";
pub const DRAG_COLOR_KEY: &str = "application/reactflow-color";

/// Pan and zoom of the canvas relative to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan: Position,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Position::default(),
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Maps a client-space point into canvas space.
    ///
    /// `bounds_origin` is the top-left corner of the canvas element in client
    /// coordinates. A non-positive or non-finite zoom is treated as 1.
    pub fn project(&self, client: Position, bounds_origin: Position) -> Position {
        let zoom = if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        };
        Position::new(
            (client.x - bounds_origin.x - self.pan.x) / zoom,
            (client.y - bounds_origin.y - self.pan.y) / zoom,
        )
    }
}

/// What the palette puts on the drag-data-transfer channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropPayload {
    pub label: Option<String>,
    pub entity_type: Option<String>,
    pub color: Option<String>,
}

impl DropPayload {
    pub fn new(label: &str, entity_type: &str, color: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            entity_type: Some(entity_type.to_string()),
            color: Some(color.to_string()),
        }
    }

    /// Reads the payload out of `(mime key, value)` pairs. Unknown keys are
    /// ignored.
    pub fn from_transfer<'a>(data: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut payload = Self::default();
        for (key, value) in data {
            let slot = match key {
                DRAG_LABEL_KEY => &mut payload.label,
                DRAG_TYPE_KEY => &mut payload.entity_type,
                DRAG_COLOR_KEY => &mut payload.color,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        payload
    }

    /// The `(type, label)` pair, or `None` when either is missing or blank.
    pub fn required(&self) -> Option<(&str, &str)> {
        let entity_type = non_blank(self.entity_type.as_deref())?;
        let label = non_blank(self.label.as_deref())?;
        Some((entity_type, label))
    }

    pub fn color(&self) -> Option<&str> {
        non_blank(self.color.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
