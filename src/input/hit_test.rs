use crate::{core::geo::Point, core::marker::Marker, traits::MapRenderer};

/// Extra screen pixels around the rendered marker radius that still count
/// as a hit
pub const HIT_PADDING: f64 = 5.0;

/// Finds the topmost marker whose visual hit-circle contains the given
/// screen point.
///
/// Markers are checked in reverse insertion order so the most recently
/// added marker, which renders on top, wins on overlap. Positions are
/// converted through the live transform on every call; pan/zoom moves
/// every marker's screen position, so nothing here may be cached. Markers
/// with no screen position (no map loaded) are skipped.
pub fn hit_test<'a>(
    markers: &'a [Marker],
    screen_point: Point,
    renderer: &dyn MapRenderer,
) -> Option<&'a Marker> {
    let hit_radius = renderer.marker_display_size().radius + HIT_PADDING;
    markers.iter().rev().find(|marker| {
        renderer
            .map_to_screen(marker.position())
            .is_some_and(|screen| screen.distance_to(&screen_point) <= hit_radius)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::viewport::Viewport,
        traits::{MarkerDisplaySize, MapRenderer},
        Result,
    };

    struct StubRenderer {
        viewport: Viewport,
        radius: f64,
    }

    impl StubRenderer {
        fn new(radius: f64) -> Self {
            let mut viewport = Viewport::default();
            viewport.load_map(Point::new(1000.0, 1000.0));
            Self { viewport, radius }
        }
    }

    impl MapRenderer for StubRenderer {
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
        fn set_markers(&mut self, _markers: &[Marker]) {}
        fn render(&mut self) -> Result<()> {
            Ok(())
        }
        fn marker_display_size(&self) -> MarkerDisplaySize {
            MarkerDisplaySize {
                radius: self.radius,
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

    #[test]
    fn test_topmost_marker_wins_on_overlap() {
        let renderer = StubRenderer::new(10.0);
        let markers = vec![
            Marker::new("below", 100.0, 100.0),
            Marker::new("above", 104.0, 103.0),
        ];

        let hit = hit_test(&markers, Point::new(101.0, 101.0), &renderer);
        assert_eq!(hit.map(|m| m.id.as_str()), Some("above"));
    }

    #[test]
    fn test_padding_extends_hit_circle() {
        let renderer = StubRenderer::new(10.0);
        let markers = vec![Marker::new("m", 100.0, 100.0)];

        // 14px away: inside radius 10 + padding 5
        assert!(hit_test(&markers, Point::new(114.0, 100.0), &renderer).is_some());
        // 16px away: outside
        assert!(hit_test(&markers, Point::new(116.0, 100.0), &renderer).is_none());
    }

    #[test]
    fn test_hit_follows_live_transform() {
        let mut renderer = StubRenderer::new(10.0);
        let markers = vec![Marker::new("m", 100.0, 100.0)];

        assert!(hit_test(&markers, Point::new(100.0, 100.0), &renderer).is_some());

        renderer.pan(200.0, 0.0).unwrap();
        assert!(hit_test(&markers, Point::new(100.0, 100.0), &renderer).is_none());
        assert!(hit_test(&markers, Point::new(300.0, 100.0), &renderer).is_some());
    }

    #[test]
    fn test_no_map_no_hit() {
        let mut renderer = StubRenderer::new(10.0);
        renderer.viewport.clear_map();
        let markers = vec![Marker::new("m", 100.0, 100.0)];

        assert!(hit_test(&markers, Point::new(100.0, 100.0), &renderer).is_none());
    }
}
