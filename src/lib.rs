//! # pinmap
//!
//! A pointer- and touch-driven interaction engine for annotating static
//! raster maps with point markers.
//!
//! The crate turns a single stream of mouse, touch, and wheel events into
//! mutually exclusive intents (pan the view, drag a marker, pinch-zoom,
//! tap a marker), with correct coordinate conversion between screen and
//! map-native pixel space and correct mid-gesture transitions. Rendering,
//! persistence, and the surrounding UI are collaborators reached through
//! the contracts in [`traits`].

pub mod core;
pub mod input;
pub mod prelude;
pub mod traits;
pub mod ui;

// Re-export public API
pub use crate::core::{
    geo::Point,
    map::{Map, MapOptions},
    marker::{Marker, MarkerUpdate},
    viewport::Viewport,
};

pub use crate::input::{
    classifier::{ClassifierConfig, GestureClassifier},
    controller::{Action, Gesture, InteractionController},
    events::InputEvent,
};

pub use crate::traits::{
    MapRenderer, MarkerDetailsPresenter, MarkerDisplaySize, MarkerStorage, NotificationLevel,
    NotificationSink, StatusSink,
};

pub use crate::ui::controls::ZoomControl;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Render error: {0}")]
    Render(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid marker: {0}")]
    InvalidMarker(String),
}

/// Error type alias for convenience
pub type Error = MapError;
