pub mod classifier;
pub mod controller;
pub mod events;
pub mod hit_test;

pub use classifier::{ClassifierConfig, GestureClassifier, TargetGesture};
pub use controller::{Action, Gesture, InteractionContext, InteractionController};
pub use events::{InputEvent, InputKind, MouseButton, TouchPhase, TouchPoint};
pub use hit_test::hit_test;
