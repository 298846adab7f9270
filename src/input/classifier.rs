use crate::input::events::InputKind;

/// Configuration for gesture classification
///
/// The pointer and touch tap thresholds differ deliberately: touch contact
/// is less precise, so a touch gesture may wander further before it stops
/// counting as a tap.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Maximum total displacement (screen px) for a mouse gesture to count
    /// as a click
    pub pointer_tap_threshold: f64,
    /// Maximum total displacement (screen px) for a touch gesture to count
    /// as a tap
    pub touch_tap_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            pointer_tap_threshold: 5.0,
            touch_tap_threshold: 10.0,
        }
    }
}

/// The gesture family a fresh contact should start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetGesture {
    MarkerDrag,
    MapPan,
    PinchZoom,
}

/// Stateless gesture decisions; all mutable session data lives in the
/// controller.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Decides which gesture a fresh contact starts, from the number of
    /// active contacts, whether a marker was hit, and the global marker
    /// lock.
    pub fn classify_press(
        &self,
        active_contacts: usize,
        marker_hit: bool,
        markers_locked: bool,
    ) -> TargetGesture {
        if active_contacts >= 2 {
            TargetGesture::PinchZoom
        } else if marker_hit && !markers_locked {
            TargetGesture::MarkerDrag
        } else {
            TargetGesture::MapPan
        }
    }

    /// Whether a completed gesture with the given total displacement should
    /// be reinterpreted as a tap/click.
    pub fn is_tap(&self, distance_moved: f64, kind: InputKind) -> bool {
        distance_moved < self.tap_threshold(kind)
    }

    pub fn tap_threshold(&self, kind: InputKind) -> f64 {
        match kind {
            InputKind::Pointer => self.config.pointer_tap_threshold,
            InputKind::Touch => self.config.touch_tap_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_classification() {
        let classifier = GestureClassifier::new();

        assert_eq!(
            classifier.classify_press(1, true, false),
            TargetGesture::MarkerDrag
        );
        assert_eq!(
            classifier.classify_press(1, false, false),
            TargetGesture::MapPan
        );
        // Locked markers pan instead of dragging
        assert_eq!(
            classifier.classify_press(1, true, true),
            TargetGesture::MapPan
        );
        // Two or more contacts always pinch, marker hit or not
        assert_eq!(
            classifier.classify_press(2, true, false),
            TargetGesture::PinchZoom
        );
        assert_eq!(
            classifier.classify_press(3, false, false),
            TargetGesture::PinchZoom
        );
    }

    #[test]
    fn test_tap_thresholds_differ_by_input_kind() {
        let classifier = GestureClassifier::new();

        assert_eq!(classifier.tap_threshold(InputKind::Pointer), 5.0);
        assert_eq!(classifier.tap_threshold(InputKind::Touch), 10.0);

        assert!(classifier.is_tap(4.9, InputKind::Pointer));
        assert!(!classifier.is_tap(5.0, InputKind::Pointer));

        assert!(classifier.is_tap(7.0, InputKind::Touch));
        assert!(!classifier.is_tap(10.0, InputKind::Touch));
    }

    #[test]
    fn test_custom_config() {
        let classifier = GestureClassifier::with_config(ClassifierConfig {
            pointer_tap_threshold: 2.0,
            touch_tap_threshold: 20.0,
        });
        assert!(!classifier.is_tap(3.0, InputKind::Pointer));
        assert!(classifier.is_tap(19.0, InputKind::Touch));
    }
}
