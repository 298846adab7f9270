use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// A point annotation on the map.
///
/// `x` and `y` are in map-native pixel space, independent of the current
/// pan offset and zoom scale. The interaction engine mutates positions in
/// place during a drag and persists them on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub description: String,
}

impl Marker {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }
}

/// Payload for persisting a marker's new position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerUpdate {
    pub x: f64,
    pub y: f64,
    /// Epoch milliseconds at the time the update was issued
    pub last_modified: u64,
}
