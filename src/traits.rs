//! Collaborator contracts consumed by the interaction engine
//!
//! The engine drives these seams but does not implement them: rendering,
//! persistence, and the user-facing notification surfaces all live in the
//! embedding application.

use crate::{
    core::{
        geo::Point,
        marker::{Marker, MarkerUpdate},
    },
    Result,
};

/// On-screen marker size as currently rendered; varies with zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerDisplaySize {
    pub radius: f64,
}

/// Rendering and coordinate-transform contract.
///
/// The renderer owns the pan offset and zoom scale; the interaction engine
/// only ever reads or nudges them through this interface. Transform queries
/// must reflect the live state on every call, since any pan or zoom moves
/// every marker on screen.
pub trait MapRenderer {
    /// Shift the view by a screen-space delta
    fn pan(&mut self, dx: f64, dy: f64) -> Result<()>;

    /// Scale the view by `factor` about a screen-space center point.
    ///
    /// When `absolute_scale` is given it overrides the multiplicative
    /// factor; pinch zoom uses it to set the target scale directly.
    fn zoom(&mut self, factor: f64, center: Point, absolute_scale: Option<f64>) -> Result<()>;

    /// Convert a map-space point to screen space, or `None` when no map is
    /// loaded
    fn map_to_screen(&self, map: Point) -> Option<Point>;

    /// Convert a screen-space displacement to a map-space displacement
    fn screen_vector_to_map_vector(&self, delta: Point) -> Point;

    /// Replace the marker set the renderer draws
    fn set_markers(&mut self, markers: &[Marker]);

    /// Redraw the canvas
    fn render(&mut self) -> Result<()>;

    /// Current on-screen marker size
    fn marker_display_size(&self) -> MarkerDisplaySize;

    /// Canvas bounding size in screen pixels
    fn canvas_size(&self) -> Point;

    /// Current zoom scale
    fn current_scale(&self) -> f64;

    /// Whether a map image is currently loaded
    fn has_map(&self) -> bool;
}

/// Persistence contract for marker records.
#[async_trait::async_trait]
pub trait MarkerStorage: Send + Sync {
    /// Persist a marker's new position; fails with a storage error on I/O
    /// failure.
    async fn update_marker(&self, id: &str, update: MarkerUpdate) -> Result<()>;
}

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// User-visible notification surface.
pub trait NotificationSink: Send + Sync {
    fn show_notification(&self, message: &str, level: NotificationLevel);
    fn show_error_message(&self, title: &str, message: &str);
}

/// Opens the marker details view when a marker is tapped or clicked.
pub trait MarkerDetailsPresenter: Send + Sync {
    fn show_marker_details(&self, marker_id: &str);
}

/// Application status line, fed by discrete commands like the zoom buttons.
pub trait StatusSink: Send + Sync {
    fn update_status(&self, message: &str);
}
