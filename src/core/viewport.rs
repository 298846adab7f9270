use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

const DEFAULT_MIN_SCALE: f64 = 0.1;
const DEFAULT_MAX_SCALE: f64 = 16.0;

/// Pan/zoom transform state for a raster map shown on a fixed-size canvas.
///
/// Screen space is the canvas pixel grid; map space is the pixel grid of the
/// underlying image. The two are related by a uniform scale and a pan offset:
/// `screen = map * scale + offset`. Renderers embed a `Viewport` to satisfy
/// the transform half of the [`MapRenderer`](crate::traits::MapRenderer)
/// contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen position of the map's (0,0) pixel
    pub offset: Point,
    /// Current zoom scale (1.0 = map pixel == screen pixel)
    pub scale: f64,
    /// The size of the canvas in pixels
    pub canvas_size: Point,
    /// Dimensions of the loaded map image, if any
    map_size: Option<Point>,
    /// The minimum allowed scale
    pub min_scale: f64,
    /// The maximum allowed scale
    pub max_scale: f64,
}

impl Viewport {
    /// Creates a viewport for a canvas of the given size, with no map loaded
    pub fn new(canvas_size: Point) -> Self {
        Self {
            offset: Point::default(),
            scale: 1.0,
            canvas_size,
            map_size: None,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
        }
    }

    /// Loads a map image of the given pixel dimensions, resetting the view
    pub fn load_map(&mut self, map_size: Point) {
        self.map_size = Some(map_size);
        self.offset = Point::default();
        self.scale = 1.0;
    }

    /// Unloads the current map
    pub fn clear_map(&mut self) {
        self.map_size = None;
    }

    pub fn has_map(&self) -> bool {
        self.map_size.is_some()
    }

    pub fn map_size(&self) -> Option<Point> {
        self.map_size
    }

    /// Sets the scale limits, clamping the current scale into the new range
    pub fn set_scale_limits(&mut self, min_scale: f64, max_scale: f64) {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self.scale = self.scale.clamp(min_scale, max_scale);
    }

    /// Converts a map-space point to screen space
    pub fn map_to_screen(&self, map: Point) -> Point {
        map.multiply(self.scale).add(&self.offset)
    }

    /// Converts a screen-space point to map space
    pub fn screen_to_map(&self, screen: Point) -> Point {
        screen.subtract(&self.offset).multiply(1.0 / self.scale)
    }

    /// Converts a screen-space displacement to a map-space displacement.
    ///
    /// Vector conversion only applies the scale, never the offset, so a
    /// displacement stays valid even if the view pans while it is measured.
    pub fn screen_vector_to_map_vector(&self, delta: Point) -> Point {
        delta.multiply(1.0 / self.scale)
    }

    /// Pans the view by a screen-space delta
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset.x += dx;
        self.offset.y += dy;
    }

    /// Scales the view about a screen-space focus point.
    ///
    /// The map pixel under `center` stays stationary on screen. When
    /// `absolute_scale` is given it becomes the target scale and `factor`
    /// is ignored.
    pub fn zoom_about(&mut self, factor: f64, center: Point, absolute_scale: Option<f64>) {
        let target = absolute_scale
            .unwrap_or(self.scale * factor)
            .clamp(self.min_scale, self.max_scale);
        if (target - self.scale).abs() < f64::EPSILON {
            return;
        }
        let ratio = target / self.scale;
        self.offset = Point::new(
            center.x - (center.x - self.offset.x) * ratio,
            center.y - (center.y - self.offset.y) * ratio,
        );
        self.scale = target;
    }

    /// Geometric center of the canvas in screen space
    pub fn canvas_center(&self) -> Point {
        self.canvas_size.multiply(0.5)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Point::new(800.0, 600.0))
    }
}
