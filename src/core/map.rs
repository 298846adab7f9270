use crate::{
    core::marker::{Marker, MarkerUpdate},
    input::{
        controller::{Action, InteractionController},
        events::InputEvent,
    },
    traits::{
        MapRenderer, MarkerDetailsPresenter, MarkerStorage, NotificationLevel, NotificationSink,
        StatusSink,
    },
    ui::controls::ZoomControl,
    MapError, Result,
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;

/// Interaction switches, resolved once at construction
#[derive(Debug, Clone)]
pub struct MapOptions {
    pub dragging: bool,
    pub scroll_wheel_zoom: bool,
    pub touch_zoom: bool,
    pub markers_locked: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            dragging: true,
            scroll_wheel_zoom: true,
            touch_zoom: true,
            markers_locked: false,
        }
    }
}

/// Ties the interaction engine to its collaborators.
///
/// Owns the in-memory marker collection, the renderer, and the
/// storage/notification seams; dispatches raw input events through the
/// [`InteractionController`] and executes the completion actions it
/// returns. Gesture handling is fully synchronous; the only asynchrony is
/// marker persistence, spawned as a detached task per completed drag so a
/// save in flight never blocks the next gesture.
pub struct Map {
    markers: Vec<Marker>,
    renderer: Box<dyn MapRenderer>,
    storage: Arc<dyn MarkerStorage>,
    notifications: Arc<dyn NotificationSink>,
    details: Option<Arc<dyn MarkerDetailsPresenter>>,
    status: Option<Arc<dyn StatusSink>>,
    controller: InteractionController,
    zoom_control: ZoomControl,
    pending_saves: Vec<JoinHandle<()>>,
}

impl Map {
    pub fn new(
        renderer: Box<dyn MapRenderer>,
        storage: Arc<dyn MarkerStorage>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self::with_options(renderer, storage, notifications, MapOptions::default())
    }

    pub fn with_options(
        renderer: Box<dyn MapRenderer>,
        storage: Arc<dyn MarkerStorage>,
        notifications: Arc<dyn NotificationSink>,
        options: MapOptions,
    ) -> Self {
        let mut controller = InteractionController::new();
        controller.pan_enabled = options.dragging;
        controller.wheel_zoom_enabled = options.scroll_wheel_zoom;
        controller.pinch_zoom_enabled = options.touch_zoom;
        controller.set_markers_locked(options.markers_locked);

        Self {
            markers: Vec::new(),
            renderer,
            storage,
            notifications,
            details: None,
            status: None,
            controller,
            zoom_control: ZoomControl::new(),
            pending_saves: Vec::new(),
        }
    }

    /// Attach the marker details view, opened when a marker is tapped
    pub fn with_details_presenter(mut self, details: Arc<dyn MarkerDetailsPresenter>) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach the application status line
    pub fn with_status_sink(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = Some(status);
        self
    }

    /// Feed one raw input event through the interaction engine.
    ///
    /// Never panics and never blocks on persistence; completed saves are
    /// reaped opportunistically.
    pub fn handle_event(&mut self, event: InputEvent) {
        let actions =
            self.controller
                .handle_event(event, &mut self.markers, self.renderer.as_mut());
        for action in actions {
            self.apply_action(action);
        }
        self.pending_saves.retain(|handle| !handle.is_finished());
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::ActivateMarker { id } => {
                if let Some(details) = &self.details {
                    details.show_marker_details(&id);
                }
            }
            Action::SaveMarkerPosition { id, x, y } => self.spawn_save(id, x, y),
        }
    }

    fn spawn_save(&mut self, id: String, x: f64, y: f64) {
        let storage = Arc::clone(&self.storage);
        let notifications = Arc::clone(&self.notifications);
        let save = async move {
            let update = MarkerUpdate {
                x,
                y,
                last_modified: epoch_millis(),
            };
            match storage.update_marker(&id, update).await {
                Ok(()) => {
                    notifications.show_notification("Marker position saved", NotificationLevel::Info)
                }
                Err(err) => {
                    // The marker keeps its on-screen position even though the
                    // save failed; the user sees the error and decides.
                    log::error!("saving marker {id} failed: {err}");
                    notifications.show_error_message("Failed to save marker", &err.to_string());
                }
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => self.pending_saves.push(handle.spawn(save)),
            Err(_) => log::error!("no async runtime available, marker save dropped"),
        }
    }

    /// Await all saves currently in flight. Completion order is not the
    /// issue order and does not need to be; each save only touches its own
    /// marker's record.
    pub async fn flush_pending_saves(&mut self) {
        for handle in self.pending_saves.drain(..) {
            let _ = handle.await;
        }
    }

    /// Add a marker to the in-memory collection and the rendered set
    pub fn add_marker(&mut self, marker: Marker) -> Result<()> {
        if self.markers.iter().any(|m| m.id == marker.id) {
            return Err(MapError::InvalidMarker(format!(
                "duplicate marker id {}",
                marker.id
            )));
        }
        self.markers.push(marker);
        self.sync_renderer_markers();
        Ok(())
    }

    /// Remove a marker by id. Safe to call while that marker is being
    /// dragged; the drag is abandoned on the next move event.
    pub fn remove_marker(&mut self, id: &str) -> Option<Marker> {
        let index = self.markers.iter().position(|m| m.id == id)?;
        let removed = self.markers.remove(index);
        self.sync_renderer_markers();
        Some(removed)
    }

    fn sync_renderer_markers(&mut self) {
        self.renderer.set_markers(&self.markers);
        if let Err(err) = self.renderer.render() {
            log::warn!("render failed after marker change: {err}");
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom_control
            .zoom_in(self.renderer.as_mut(), self.status.as_deref());
    }

    pub fn zoom_out(&mut self) {
        self.zoom_control
            .zoom_out(self.renderer.as_mut(), self.status.as_deref());
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn set_markers_locked(&mut self, locked: bool) {
        self.controller.set_markers_locked(locked);
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn renderer(&self) -> &dyn MapRenderer {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> &mut dyn MapRenderer {
        self.renderer.as_mut()
    }

    pub fn pending_save_count(&self) -> usize {
        self.pending_saves.len()
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
