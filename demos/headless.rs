//! Headless demo: drives the interaction engine with a scripted event
//! stream, a logging renderer, and an in-memory storage backend.
//!
//! Run with `cargo run --example headless`.

use pinmap::prelude::*;

struct LogRenderer {
    viewport: Viewport,
    markers: Vec<Marker>,
}

impl LogRenderer {
    fn new() -> Self {
        let mut viewport = Viewport::new(Point::new(800.0, 600.0));
        viewport.load_map(Point::new(1600.0, 1200.0));
        Self {
            viewport,
            markers: Vec::new(),
        }
    }
}

impl MapRenderer for LogRenderer {
    fn pan(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.viewport.pan(dx, dy);
        Ok(())
    }

    fn zoom(&mut self, factor: f64, center: Point, absolute_scale: Option<f64>) -> Result<()> {
        self.viewport.zoom_about(factor, center, absolute_scale);
        Ok(())
    }

    fn map_to_screen(&self, map: Point) -> Option<Point> {
        self.viewport
            .has_map()
            .then(|| self.viewport.map_to_screen(map))
    }

    fn screen_vector_to_map_vector(&self, delta: Point) -> Point {
        self.viewport.screen_vector_to_map_vector(delta)
    }

    fn set_markers(&mut self, markers: &[Marker]) {
        self.markers = markers.to_vec();
    }

    fn render(&mut self) -> Result<()> {
        log::debug!(
            "render: scale {:.3}, offset ({:.1}, {:.1}), {} markers",
            self.viewport.scale,
            self.viewport.offset.x,
            self.viewport.offset.y,
            self.markers.len()
        );
        Ok(())
    }

    fn marker_display_size(&self) -> MarkerDisplaySize {
        MarkerDisplaySize {
            radius: 12.0 * self.viewport.scale,
        }
    }

    fn canvas_size(&self) -> Point {
        self.viewport.canvas_size
    }

    fn current_scale(&self) -> f64 {
        self.viewport.scale
    }

    fn has_map(&self) -> bool {
        self.viewport.has_map()
    }
}

struct ConsoleStorage;

#[async_trait::async_trait]
impl MarkerStorage for ConsoleStorage {
    async fn update_marker(&self, id: &str, update: MarkerUpdate) -> Result<()> {
        println!(
            "storage: marker {id} -> ({:.1}, {:.1}) at {}",
            update.x, update.y, update.last_modified
        );
        Ok(())
    }
}

struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn show_notification(&self, message: &str, level: NotificationLevel) {
        println!("notification [{level:?}]: {message}");
    }

    fn show_error_message(&self, title: &str, message: &str) {
        println!("error [{title}]: {message}");
    }
}

impl MarkerDetailsPresenter for ConsoleSink {
    fn show_marker_details(&self, marker_id: &str) {
        println!("details: opening marker {marker_id}");
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let sink = Arc::new(ConsoleSink);
    let mut map = Map::new(
        Box::new(LogRenderer::new()),
        Arc::new(ConsoleStorage),
        sink.clone(),
    )
    .with_details_presenter(sink);

    map.add_marker(Marker::new("gate", 120.0, 80.0).with_description("north gate"))
        .expect("fresh id");
    map.add_marker(Marker::new("well", 400.0, 300.0).with_description("old well"))
        .expect("fresh id");

    // Click the gate marker
    map.handle_event(InputEvent::PointerDown {
        position: Point::new(120.0, 80.0),
        button: MouseButton::Primary,
    });
    map.handle_event(InputEvent::PointerUp {
        position: Point::new(121.0, 80.0),
    });

    // Drag the well marker 60px right
    map.handle_event(InputEvent::PointerDown {
        position: Point::new(400.0, 300.0),
        button: MouseButton::Primary,
    });
    map.handle_event(InputEvent::PointerMove {
        position: Point::new(460.0, 300.0),
    });
    map.handle_event(InputEvent::PointerUp {
        position: Point::new(460.0, 300.0),
    });

    // Wheel-zoom in over the canvas center, then pan with a touch
    map.handle_event(InputEvent::Wheel {
        delta_y: -120.0,
        position: Point::new(400.0, 300.0),
    });
    map.handle_event(InputEvent::Touch {
        phase: TouchPhase::Start,
        touches: vec![TouchPoint {
            id: 1,
            position: Point::new(200.0, 200.0),
        }],
    });
    map.handle_event(InputEvent::Touch {
        phase: TouchPhase::Move,
        touches: vec![TouchPoint {
            id: 1,
            position: Point::new(260.0, 240.0),
        }],
    });
    map.handle_event(InputEvent::Touch {
        phase: TouchPhase::End,
        touches: vec![TouchPoint {
            id: 1,
            position: Point::new(260.0, 240.0),
        }],
    });

    map.flush_pending_saves().await;

    println!(
        "final markers: {}",
        serde_json::to_string_pretty(map.markers()).expect("markers serialize")
    );
}
