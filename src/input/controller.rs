use crate::{
    core::{geo::Point, marker::Marker},
    input::{
        classifier::{GestureClassifier, TargetGesture},
        events::{InputEvent, InputKind, MouseButton, TouchPhase, TouchPoint},
        hit_test::hit_test,
    },
    traits::MapRenderer,
};
use fxhash::FxHashMap;

/// Zoom factor applied per wheel notch
const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Completion action produced when a gesture ends.
///
/// The controller finalizes all visual and state-machine effects
/// synchronously; actions carry the remaining work (persistence, opening
/// the details view) out to the owner.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Persist a marker's new map-space position
    SaveMarkerPosition { id: String, x: f64, y: f64 },
    /// A marker was tapped or clicked; show its details
    ActivateMarker { id: String },
}

/// Per-finger bookkeeping; one record per currently pressed contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchRecord {
    pub initial: Point,
    pub current: Point,
}

/// Session data for an active map pan.
///
/// `origin` anchors tap reclassification at release; `last` anchors the
/// incremental per-move pan delta.
#[derive(Debug, Clone, PartialEq)]
pub struct PanSession {
    pub origin: Point,
    pub last: Point,
    pub kind: InputKind,
}

/// Session data for an active marker drag.
///
/// The marker's map position at gesture start is the anchor for relative
/// displacement; every move writes `anchor + converted displacement` rather
/// than converting absolute positions, so panning or zooming mid-drag does
/// not distort the result and no rounding drift accumulates.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub marker_id: String,
    pub start_map: Point,
    pub origin_screen: Point,
    pub kind: InputKind,
}

/// Session data for an active two-finger pinch.
///
/// The two participating touch identifiers are pinned so a third finger
/// cannot re-pair the pinch mid-gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct PinchSession {
    pub touch_a: u64,
    pub touch_b: u64,
    pub initial_distance: f64,
    pub start_scale: f64,
}

/// The active gesture. Exactly one variant at a time; each carries only the
/// session data meaningful for that variant, so combinations like a drag
/// with two active touches cannot be represented.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    MapPan(PanSession),
    MarkerDrag(DragSession),
    PinchZoom(PinchSession),
}

/// Mutable interaction state threaded through every handler.
///
/// Owns the gesture, the per-finger touch records, and the global marker
/// lock. Never module state: the controller carries one context for its
/// whole lifetime.
#[derive(Debug, Default)]
pub struct InteractionContext {
    gesture: Gesture,
    touches: FxHashMap<u64, TouchRecord>,
    markers_locked: bool,
}

impl InteractionContext {
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn active_touch_count(&self) -> usize {
        self.touches.len()
    }

    pub fn markers_locked(&self) -> bool {
        self.markers_locked
    }

    pub fn set_markers_locked(&mut self, locked: bool) {
        self.markers_locked = locked;
    }
}

/// The state machine driving the gesture lifecycle.
///
/// One entry point per raw input event. Each call consumes the live marker
/// collection and the renderer contract, mutates marker positions and the
/// view optimistically, and returns completion [`Action`]s for the owner to
/// execute. Nothing here is allowed to panic or propagate an error out of
/// an event handler: renderer failures are logged and reset the gesture.
pub struct InteractionController {
    ctx: InteractionContext,
    classifier: GestureClassifier,
    pub pan_enabled: bool,
    pub wheel_zoom_enabled: bool,
    pub pinch_zoom_enabled: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::with_classifier(GestureClassifier::new())
    }

    pub fn with_classifier(classifier: GestureClassifier) -> Self {
        Self {
            ctx: InteractionContext::default(),
            classifier,
            pan_enabled: true,
            wheel_zoom_enabled: true,
            pinch_zoom_enabled: true,
        }
    }

    pub fn context(&self) -> &InteractionContext {
        &self.ctx
    }

    pub fn gesture(&self) -> &Gesture {
        &self.ctx.gesture
    }

    pub fn markers_locked(&self) -> bool {
        self.ctx.markers_locked
    }

    pub fn set_markers_locked(&mut self, locked: bool) {
        self.ctx.set_markers_locked(locked);
    }

    /// Unified dispatcher over the per-event entry points
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        markers: &mut Vec<Marker>,
        renderer: &mut dyn MapRenderer,
    ) -> Vec<Action> {
        match event {
            InputEvent::PointerDown { position, button } => {
                self.pointer_down(position, button, markers, renderer);
                Vec::new()
            }
            InputEvent::PointerMove { position } => {
                self.pointer_move(position, markers, renderer);
                Vec::new()
            }
            InputEvent::PointerUp { position } => self.pointer_up(position, markers, renderer),
            InputEvent::Wheel { delta_y, position } => {
                self.wheel(delta_y, position, renderer);
                Vec::new()
            }
            InputEvent::Touch { phase, touches } => match phase {
                TouchPhase::Start => {
                    self.touch_start(&touches, markers, renderer);
                    Vec::new()
                }
                TouchPhase::Move => {
                    self.touch_move(&touches, markers, renderer);
                    Vec::new()
                }
                TouchPhase::End => self.touch_end(&touches, markers, renderer),
                TouchPhase::Cancel => {
                    self.touch_cancel(&touches, renderer);
                    Vec::new()
                }
            },
        }
    }

    /// Mouse/pen button pressed. Only the primary button starts a gesture.
    pub fn pointer_down(
        &mut self,
        position: Point,
        button: MouseButton,
        markers: &[Marker],
        renderer: &dyn MapRenderer,
    ) {
        if button != MouseButton::Primary || !self.ctx.touches.is_empty() {
            return;
        }
        self.begin_press(position, InputKind::Pointer, markers, renderer);
    }

    pub fn pointer_move(
        &mut self,
        position: Point,
        markers: &mut [Marker],
        renderer: &mut dyn MapRenderer,
    ) {
        // A touch-owned gesture is driven by touch events alone; browsers
        // synthesize mouse events after touch and those must not steer it
        if !self.pointer_owns_gesture() {
            return;
        }
        match self.ctx.gesture {
            Gesture::MarkerDrag(_) => self.drag_move(position, markers, renderer),
            Gesture::MapPan(_) => self.pan_move(position, renderer),
            Gesture::PinchZoom(_) | Gesture::Idle => {}
        }
    }

    pub fn pointer_up(
        &mut self,
        position: Point,
        markers: &[Marker],
        renderer: &dyn MapRenderer,
    ) -> Vec<Action> {
        if !self.pointer_owns_gesture() {
            return Vec::new();
        }
        let gesture = std::mem::take(&mut self.ctx.gesture);
        self.finish_gesture(gesture, position, markers, renderer)
    }

    /// Wheel zoom is independent of the gesture state machine: applied
    /// immediately, centered at the cursor, no lifecycle.
    pub fn wheel(&mut self, delta_y: f64, position: Point, renderer: &mut dyn MapRenderer) {
        if !self.wheel_zoom_enabled {
            return;
        }
        let factor = if delta_y > 0.0 {
            1.0 / WHEEL_ZOOM_STEP
        } else {
            WHEEL_ZOOM_STEP
        };
        if let Err(err) = renderer
            .zoom(factor, position, None)
            .and_then(|_| renderer.render())
        {
            log::warn!("wheel zoom ignored: {err}");
            self.ctx.gesture = Gesture::Idle;
        }
    }

    pub fn touch_start(
        &mut self,
        touches: &[TouchPoint],
        markers: &[Marker],
        renderer: &dyn MapRenderer,
    ) {
        for touch in touches {
            self.ctx.touches.insert(
                touch.id,
                TouchRecord {
                    initial: touch.position,
                    current: touch.position,
                },
            );
        }

        let count = self.ctx.touches.len();
        if count >= 2 {
            // A second finger abandons whatever single-touch intent was
            // active, even a drag in progress.
            if self.pinch_zoom_enabled && !matches!(self.ctx.gesture, Gesture::PinchZoom(_)) {
                self.begin_pinch(renderer);
            }
        } else if let Some(touch) = touches.last() {
            self.begin_press(touch.position, InputKind::Touch, markers, renderer);
        }
    }

    pub fn touch_move(
        &mut self,
        touches: &[TouchPoint],
        markers: &mut [Marker],
        renderer: &mut dyn MapRenderer,
    ) {
        for touch in touches {
            // Untracked identifiers are ignored, never fatal
            if let Some(record) = self.ctx.touches.get_mut(&touch.id) {
                record.current = touch.position;
            }
        }

        match self.ctx.gesture {
            Gesture::MarkerDrag(_) => {
                if let Some(position) = self.sole_touch_position() {
                    self.drag_move(position, markers, renderer);
                }
            }
            Gesture::MapPan(_) => {
                if let Some(position) = self.sole_touch_position() {
                    self.pan_move(position, renderer);
                }
            }
            Gesture::PinchZoom(_) => self.pinch_move(renderer),
            Gesture::Idle => {}
        }
    }

    pub fn touch_end(
        &mut self,
        touches: &[TouchPoint],
        markers: &[Marker],
        renderer: &dyn MapRenderer,
    ) -> Vec<Action> {
        let mut ended_any = false;
        let mut release = None;
        for touch in touches {
            if self.ctx.touches.remove(&touch.id).is_some() {
                ended_any = true;
                release = Some(touch.position);
            } else {
                log::debug!("ignoring end for untracked touch {}", touch.id);
            }
        }
        if !ended_any {
            return Vec::new();
        }

        match self.ctx.gesture {
            Gesture::MarkerDrag(_) | Gesture::MapPan(_) => {
                if self.ctx.touches.is_empty() {
                    let gesture = std::mem::take(&mut self.ctx.gesture);
                    if let Some(release) = release {
                        return self.finish_gesture(gesture, release, markers, renderer);
                    }
                }
                Vec::new()
            }
            Gesture::PinchZoom(_) => {
                self.settle_pinch_after_release(renderer);
                Vec::new()
            }
            Gesture::Idle => Vec::new(),
        }
    }

    /// A cancelled contact abandons its gesture: records are cleared and
    /// the remaining-count transitions run, but no tap or persistence
    /// action is ever produced.
    pub fn touch_cancel(&mut self, touches: &[TouchPoint], renderer: &dyn MapRenderer) {
        let mut ended_any = false;
        for touch in touches {
            ended_any |= self.ctx.touches.remove(&touch.id).is_some();
        }
        if !ended_any {
            return;
        }

        match self.ctx.gesture {
            Gesture::PinchZoom(_) => self.settle_pinch_after_release(renderer),
            _ => {
                if self.ctx.touches.is_empty() {
                    self.ctx.gesture = Gesture::Idle;
                }
            }
        }
    }

    fn begin_press(
        &mut self,
        position: Point,
        kind: InputKind,
        markers: &[Marker],
        renderer: &dyn MapRenderer,
    ) {
        let hit = hit_test(markers, position, renderer);
        let contacts = self.ctx.touches.len().max(1);
        let target =
            self.classifier
                .classify_press(contacts, hit.is_some(), self.ctx.markers_locked);

        self.ctx.gesture = match target {
            TargetGesture::MarkerDrag => match hit {
                Some(marker) => {
                    log::debug!("drag start on marker {}", marker.id);
                    Gesture::MarkerDrag(DragSession {
                        marker_id: marker.id.clone(),
                        start_map: marker.position(),
                        origin_screen: position,
                        kind,
                    })
                }
                None => Gesture::MapPan(PanSession {
                    origin: position,
                    last: position,
                    kind,
                }),
            },
            TargetGesture::MapPan => Gesture::MapPan(PanSession {
                origin: position,
                last: position,
                kind,
            }),
            TargetGesture::PinchZoom => {
                self.begin_pinch(renderer);
                return;
            }
        };
    }

    fn begin_pinch(&mut self, renderer: &dyn MapRenderer) {
        let mut ids: Vec<u64> = self.ctx.touches.keys().copied().collect();
        if ids.len() < 2 {
            return;
        }
        ids.sort_unstable();
        let (a, b) = (ids[0], ids[1]);
        let (Some(record_a), Some(record_b)) =
            (self.ctx.touches.get(&a), self.ctx.touches.get(&b))
        else {
            return;
        };

        self.ctx.gesture = Gesture::PinchZoom(PinchSession {
            touch_a: a,
            touch_b: b,
            initial_distance: record_a.current.distance_to(&record_b.current),
            start_scale: renderer.current_scale(),
        });
    }

    fn drag_move(&mut self, position: Point, markers: &mut [Marker], renderer: &mut dyn MapRenderer) {
        let (marker_id, start_map, origin_screen) = match &self.ctx.gesture {
            Gesture::MarkerDrag(session) => (
                session.marker_id.clone(),
                session.start_map,
                session.origin_screen,
            ),
            _ => return,
        };

        let Some(marker) = markers.iter_mut().find(|m| m.id == marker_id) else {
            // Deleted out from under us (e.g. via a modal); abandon quietly
            log::debug!("dragged marker {marker_id} no longer exists, abandoning drag");
            self.ctx.gesture = Gesture::Idle;
            return;
        };

        let displacement = position.subtract(&origin_screen);
        let map_delta = renderer.screen_vector_to_map_vector(displacement);
        marker.set_position(start_map.add(&map_delta));

        renderer.set_markers(markers);
        if let Err(err) = renderer.render() {
            log::warn!("render failed during marker drag: {err}");
            self.ctx.gesture = Gesture::Idle;
        }
    }

    fn pan_move(&mut self, position: Point, renderer: &mut dyn MapRenderer) {
        if !self.pan_enabled {
            return;
        }
        let Gesture::MapPan(session) = &mut self.ctx.gesture else {
            return;
        };
        // Pan is incremental: delta from the previous move, not the origin
        let delta = position.subtract(&session.last);
        session.last = position;

        if let Err(err) = renderer
            .pan(delta.x, delta.y)
            .and_then(|_| renderer.render())
        {
            log::warn!("render failed during pan: {err}");
            self.ctx.gesture = Gesture::Idle;
        }
    }

    fn pinch_move(&mut self, renderer: &mut dyn MapRenderer) {
        let Gesture::PinchZoom(session) = &self.ctx.gesture else {
            return;
        };
        let (Some(record_a), Some(record_b)) = (
            self.ctx.touches.get(&session.touch_a),
            self.ctx.touches.get(&session.touch_b),
        ) else {
            return;
        };
        if session.initial_distance <= f64::EPSILON {
            return;
        }

        let current_distance = record_a.current.distance_to(&record_b.current);
        let target_scale = session.start_scale * (current_distance / session.initial_distance);
        let center = record_a.current.midpoint(&record_b.current);

        let current_scale = renderer.current_scale();
        let factor = if current_scale > 0.0 {
            target_scale / current_scale
        } else {
            1.0
        };

        if let Err(err) = renderer
            .zoom(factor, center, Some(target_scale))
            .and_then(|_| renderer.render())
        {
            log::warn!("render failed during pinch zoom: {err}");
            self.ctx.gesture = Gesture::Idle;
        }
    }

    /// After a pinch loses a finger: two or more survivors restart the
    /// pinch from their current positions and the current scale; exactly
    /// one hands off to a pan anchored where that finger is now, so the
    /// next move produces no jump; none ends the gesture.
    fn settle_pinch_after_release(&mut self, renderer: &dyn MapRenderer) {
        if self.ctx.touches.len() >= 2 {
            self.begin_pinch(renderer);
        } else if let Some(record) = self.ctx.touches.values().next().copied() {
            self.ctx.gesture = Gesture::MapPan(PanSession {
                origin: record.current,
                last: record.current,
                kind: InputKind::Touch,
            });
        } else {
            self.ctx.gesture = Gesture::Idle;
        }
    }

    fn finish_gesture(
        &mut self,
        gesture: Gesture,
        release: Point,
        markers: &[Marker],
        renderer: &dyn MapRenderer,
    ) -> Vec<Action> {
        match gesture {
            Gesture::MarkerDrag(session) => {
                let travelled = release.distance_to(&session.origin_screen);
                if self.classifier.is_tap(travelled, session.kind) {
                    // Position did not meaningfully change: a click, not a
                    // drag. Nothing to persist.
                    return vec![Action::ActivateMarker {
                        id: session.marker_id,
                    }];
                }
                match markers.iter().find(|m| m.id == session.marker_id) {
                    Some(marker) => vec![Action::SaveMarkerPosition {
                        id: marker.id.clone(),
                        x: marker.x,
                        y: marker.y,
                    }],
                    None => {
                        log::debug!(
                            "marker {} vanished before drag completion, nothing to save",
                            session.marker_id
                        );
                        Vec::new()
                    }
                }
            }
            Gesture::MapPan(session) => {
                let travelled = release.distance_to(&session.origin);
                if self.classifier.is_tap(travelled, session.kind) {
                    if let Some(marker) = hit_test(markers, release, renderer) {
                        return vec![Action::ActivateMarker {
                            id: marker.id.clone(),
                        }];
                    }
                }
                // The view was already panned incrementally; nothing else
                Vec::new()
            }
            Gesture::PinchZoom(_) | Gesture::Idle => Vec::new(),
        }
    }

    fn pointer_owns_gesture(&self) -> bool {
        match &self.ctx.gesture {
            Gesture::Idle => true,
            Gesture::MapPan(session) => session.kind == InputKind::Pointer,
            Gesture::MarkerDrag(session) => session.kind == InputKind::Pointer,
            Gesture::PinchZoom(_) => false,
        }
    }

    fn sole_touch_position(&self) -> Option<Point> {
        if self.ctx.touches.len() == 1 {
            self.ctx.touches.values().next().map(|r| r.current)
        } else {
            None
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}
