use cgmath::*;

use crate::{
    constants::camera::{DEFAULT_VIEWPORT, FOCUS_INSET},
    util::clamp,
};

/// Follows the player across a level larger than the viewport. The camera produces the
/// offset added to world coordinates to get viewport coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub viewport: Vector2<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(vec2(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1))
    }
}

impl Camera {
    pub fn new(viewport: Vector2<f32>) -> Self {
        Self { viewport }
    }

    pub fn resize(&mut self, viewport: Vector2<f32>) {
        self.viewport = viewport;
    }

    /// Where in the viewport the camera tries to hold the player: a little left of center
    /// and low, so more of what's ahead and above is visible.
    pub fn focus(&self) -> Vector2<f32> {
        vec2(
            self.viewport.x / 2.0 - FOCUS_INSET,
            self.viewport.y * 3.0 / 4.0 - FOCUS_INSET,
        )
    }

    /// Offset for a level of `level_size` with the player at `target`. The view never
    /// scrolls past the level's edges.
    pub fn offset(&self, target: Point2<f32>, level_size: Vector2<f32>) -> Vector2<f32> {
        let offset = self.focus() - target.to_vec();
        vec2(
            clamp(offset.x, self.viewport.x - level_size.x, 0.0),
            clamp(offset.y, self.viewport.y - level_size.y, 0.0),
        )
    }
}

#[cfg(test)]
mod camera_tests {
    use super::*;

    #[test]
    fn offset_follows_player_within_level() {
        let camera = Camera::new(vec2(1280.0, 720.0));
        let level = vec2(2000.0, 1500.0);
        // focus is (540, 440)
        assert_eq!(camera.offset(point2(1000.0, 1000.0), level), vec2(-460.0, -560.0));
    }

    #[test]
    fn offset_clamps_to_level_edges() {
        let camera = Camera::new(vec2(1280.0, 720.0));
        let level = vec2(2000.0, 1500.0);
        assert_eq!(camera.offset(point2(10.0, 10.0), level), vec2(0.0, 0.0));
        assert_eq!(
            camera.offset(point2(1990.0, 1490.0), level),
            vec2(-720.0, -780.0)
        );
    }
}
