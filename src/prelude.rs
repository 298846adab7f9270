//! Prelude module for common pinmap types and traits
//!
//! Re-exports the most commonly used types, traits, and functions for easy
//! importing with `use pinmap::prelude::*;`

pub use crate::core::{
    geo::Point,
    map::{Map, MapOptions},
    marker::{Marker, MarkerUpdate},
    viewport::Viewport,
};

pub use crate::input::{
    classifier::{ClassifierConfig, GestureClassifier, TargetGesture},
    controller::{Action, Gesture, InteractionContext, InteractionController},
    events::{InputEvent, InputKind, MouseButton, TouchPhase, TouchPoint},
    hit_test::hit_test,
};

pub use crate::traits::{
    MapRenderer, MarkerDetailsPresenter, MarkerDisplaySize, MarkerStorage, NotificationLevel,
    NotificationSink, StatusSink,
};

pub use crate::ui::controls::ZoomControl;

pub use crate::{Error as MapError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
