use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Raw input events consumed by the interaction engine
///
/// Positions are screen-space client coordinates relative to the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Mouse/pen button pressed
    PointerDown { position: Point, button: MouseButton },
    /// Mouse/pen moved
    PointerMove { position: Point },
    /// Mouse/pen button released
    PointerUp { position: Point },
    /// Scroll wheel; only the sign of `delta_y` matters
    Wheel { delta_y: f64, position: Point },
    /// Touch contact change; `touches` carries only the changed contacts
    Touch {
        phase: TouchPhase,
        touches: Vec<TouchPoint>,
    },
}

/// Phases of a touch contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Individual touch contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Point,
}

/// Mouse button discriminator; only the primary button starts a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

/// Which family of input device produced a gesture.
///
/// Tap reclassification uses a wider threshold for touch input, since a
/// finger contact is inherently less precise than a mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    Pointer,
    Touch,
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerDown { position, .. } => Some(*position),
            InputEvent::PointerMove { position } => Some(*position),
            InputEvent::PointerUp { position } => Some(*position),
            InputEvent::Wheel { position, .. } => Some(*position),
            InputEvent::Touch { touches, .. } => touches.first().map(|t| t.position),
        }
    }

    /// Checks if this is a mouse/pen event
    pub fn is_pointer_event(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerDown { .. }
                | InputEvent::PointerMove { .. }
                | InputEvent::PointerUp { .. }
                | InputEvent::Wheel { .. }
        )
    }

    /// Checks if this is a touch event
    pub fn is_touch_event(&self) -> bool {
        matches!(self, InputEvent::Touch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_event_position() {
        let down = InputEvent::PointerDown {
            position: Point::new(100.0, 200.0),
            button: MouseButton::Primary,
        };
        assert_eq!(down.position(), Some(Point::new(100.0, 200.0)));

        let touch = InputEvent::Touch {
            phase: TouchPhase::Start,
            touches: vec![TouchPoint {
                id: 7,
                position: Point::new(50.0, 75.0),
            }],
        };
        assert_eq!(touch.position(), Some(Point::new(50.0, 75.0)));

        let empty_touch = InputEvent::Touch {
            phase: TouchPhase::End,
            touches: vec![],
        };
        assert_eq!(empty_touch.position(), None);
    }

    #[test]
    fn test_event_type_checks() {
        let wheel = InputEvent::Wheel {
            delta_y: 120.0,
            position: Point::new(0.0, 0.0),
        };
        assert!(wheel.is_pointer_event());
        assert!(!wheel.is_touch_event());

        let touch = InputEvent::Touch {
            phase: TouchPhase::Move,
            touches: vec![],
        };
        assert!(!touch.is_pointer_event());
        assert!(touch.is_touch_event());
    }
}
