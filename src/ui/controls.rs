use crate::traits::{MapRenderer, StatusSink};

/// Fraction of the current scale added or removed per discrete zoom step
pub const ZOOM_STEP_FRACTION: f64 = 0.2;

/// Discrete zoom-in/zoom-out commands, as triggered by UI buttons.
///
/// Independent of the gesture state machine but sharing the renderer
/// contract: each step is a ±20% scale change centered on the canvas's
/// geometric center, not the cursor.
#[derive(Debug, Clone)]
pub struct ZoomControl {
    step_fraction: f64,
}

impl ZoomControl {
    pub fn new() -> Self {
        Self {
            step_fraction: ZOOM_STEP_FRACTION,
        }
    }

    pub fn with_step_fraction(step_fraction: f64) -> Self {
        Self { step_fraction }
    }

    pub fn zoom_in(&self, renderer: &mut dyn MapRenderer, status: Option<&dyn StatusSink>) {
        self.apply(1.0 + self.step_fraction, renderer, status);
    }

    pub fn zoom_out(&self, renderer: &mut dyn MapRenderer, status: Option<&dyn StatusSink>) {
        self.apply(1.0 - self.step_fraction, renderer, status);
    }

    fn apply(&self, factor: f64, renderer: &mut dyn MapRenderer, status: Option<&dyn StatusSink>) {
        if !renderer.has_map() {
            if let Some(status) = status {
                status.update_status("No map loaded, nothing to zoom");
            }
            return;
        }

        let center = renderer.canvas_size().multiply(0.5);
        match renderer
            .zoom(factor, center, None)
            .and_then(|_| renderer.render())
        {
            Ok(()) => {
                if let Some(status) = status {
                    status.update_status(if factor >= 1.0 {
                        "Zoomed in"
                    } else {
                        "Zoomed out"
                    });
                }
            }
            Err(err) => log::warn!("zoom command failed: {err}"),
        }
    }
}

impl Default for ZoomControl {
    fn default() -> Self {
        Self::new()
    }
}
