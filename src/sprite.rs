use cgmath::*;
use std::fmt::Display;

use crate::{geom::Bounds, util::rotate};

// ---------------------------------------------------------------------------------------------------------------------

/// Facing of a sprite's surface normal. The discriminants matter: portal transforms
/// are computed from the difference of two orientations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Orientation {
    /// Left and Right face along the x axis.
    pub fn is_horizontal(&self) -> bool {
        (*self as i32) % 2 == 1
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Up => write!(f, "Up"),
            Orientation::Right => write!(f, "Right"),
            Orientation::Down => write!(f, "Down"),
            Orientation::Left => write!(f, "Left"),
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// Sprite is the kinematic primitive shared by everything that moves or collides: the character,
/// projectiles, obstacles and portal apertures. Size is derived from an unscaled source size and
/// a scale, and `center` is the rotation pivot relative to the sprite's unrotated top-left.
#[derive(Clone, Copy, Debug)]
pub struct Sprite {
    pub position: Point2<f32>,
    pub initial_position: Point2<f32>,
    pub velocity: Vector2<f32>,
    /// Externally imposed drift, e.g. riding a platform. Integrated with velocity but never accumulated into it.
    pub frame_velocity: Vector2<f32>,
    pub acceleration: Vector2<f32>,
    pub angle: f32,
    pub center: Vector2<f32>,
    pub source_size: Vector2<f32>,
    pub scale: f32,
    pub orientation: Option<Orientation>,
    pub visible: bool,
    pub last_swap_time: f32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            position: point2(0.0, 0.0),
            initial_position: point2(0.0, 0.0),
            velocity: Vector2::zero(),
            frame_velocity: Vector2::zero(),
            acceleration: Vector2::zero(),
            angle: 0.0,
            center: Vector2::zero(),
            source_size: Vector2::zero(),
            scale: 1.0,
            orientation: None,
            visible: true,
            last_swap_time: 0.0,
        }
    }
}

impl Sprite {
    pub fn new(position: Point2<f32>, source_size: Vector2<f32>, center: Vector2<f32>) -> Self {
        Self {
            position,
            initial_position: position,
            source_size,
            center,
            ..Default::default()
        }
    }

    /// Size with scale applied, truncated to whole units.
    pub fn size(&self) -> Vector2<f32> {
        vec2(
            (self.source_size.x * self.scale).trunc(),
            (self.source_size.y * self.scale).trunc(),
        )
    }

    /// Sets both the current and initial position, the latter being where reset() returns to.
    pub fn set_initial_position(&mut self, position: Point2<f32>) {
        self.initial_position = position;
        self.position = position;
    }

    /// The axis-aligned rect enclosing this sprite's rotated footprint. This is recomputed from
    /// position, angle and size on every call and is the only shape used for hit testing.
    ///
    /// The trig is evaluated in f64 and truncated to whole units, which level geometry
    /// has been tuned against.
    pub fn collision_surface(&self) -> Bounds {
        let size = self.size();
        let abs_angle = (self.angle as f64).abs();
        let (sin, cos) = (abs_angle.sin(), abs_angle.cos());
        let (width, height) = (size.x as f64, size.y as f64);

        let surface_height = ((sin * width + cos * height) as i32).abs();
        let surface_width = ((sin * height + cos * width) as i32).abs();

        let to_center = rotate(size / 2.0 - self.center, self.angle);

        let x = (self.position.x - (surface_width / 2) as f32 + to_center.x) as i32;
        let y = (self.position.y - (surface_height / 2) as f32 + to_center.y) as i32;

        Bounds::from_xywh(
            x as f32,
            y as f32,
            surface_width as f32,
            surface_height as f32,
        )
    }

    /// Integrates acceleration into velocity and velocity plus drift into position.
    /// Invisible sprites don't move.
    pub fn update(&mut self, dt: f32) {
        if !self.visible {
            return;
        }
        self.velocity += self.acceleration * dt;
        self.position += (self.velocity + self.frame_velocity) * dt;
    }

    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.acceleration = Vector2::zero();
        self.velocity = Vector2::zero();
        self.frame_velocity = Vector2::zero();
        self.angle = 0.0;
        self.visible = true;
        self.last_swap_time = 0.0;
    }
}

#[cfg(test)]
mod sprite_tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn unrotated_surface_matches_size() {
        // pivot at the geometric center
        let sprite = Sprite::new(point2(100.0, 200.0), vec2(40.0, 20.0), vec2(20.0, 10.0));
        assert_eq!(
            sprite.collision_surface(),
            Bounds::from_xywh(80.0, 190.0, 40.0, 20.0)
        );

        // pivot at top-left; position is the rect's origin
        let sprite = Sprite::new(point2(100.0, 200.0), vec2(40.0, 20.0), vec2(0.0, 0.0));
        assert_eq!(
            sprite.collision_surface(),
            Bounds::from_xywh(100.0, 200.0, 40.0, 20.0)
        );
    }

    #[test]
    fn quarter_turn_swaps_extent() {
        let mut sprite = Sprite::new(point2(0.0, 0.0), vec2(10.0, 100.0), vec2(5.0, 50.0));
        sprite.angle = PI / 2.0;
        let surface = sprite.collision_surface();
        // cos(PI/2) isn't quite zero, and truncation can shave a unit
        assert!((surface.width() - 100.0).abs() <= 1.0);
        assert!((surface.height() - 10.0).abs() <= 1.0);
    }

    #[test]
    fn scale_affects_size() {
        let mut sprite = Sprite::new(point2(0.0, 0.0), vec2(200.0, 200.0), vec2(10.0, 10.0));
        sprite.scale = 0.1;
        assert_eq!(sprite.size(), vec2(20.0, 20.0));
        assert_eq!(sprite.collision_surface(), Bounds::from_xywh(-10.0, -10.0, 20.0, 20.0));
        sprite.scale *= 2.0;
        assert_eq!(sprite.size(), vec2(40.0, 40.0));
    }

    #[test]
    fn update_integrates_drift_separately() {
        let mut sprite = Sprite::new(point2(0.0, 0.0), vec2(1.0, 1.0), vec2(0.0, 0.0));
        sprite.velocity = vec2(10.0, 0.0);
        sprite.frame_velocity = vec2(0.0, 5.0);
        sprite.acceleration = vec2(2.0, 0.0);
        sprite.update(1.0);
        assert_eq!(sprite.velocity, vec2(12.0, 0.0));
        assert_eq!(sprite.position, point2(12.0, 5.0));

        sprite.visible = false;
        sprite.update(1.0);
        assert_eq!(sprite.position, point2(12.0, 5.0));
    }

    #[test]
    fn reset_restores_initial_position() {
        let mut sprite = Sprite::new(point2(3.0, 4.0), vec2(1.0, 1.0), vec2(0.0, 0.0));
        sprite.position = point2(30.0, 40.0);
        sprite.angle = 1.0;
        sprite.velocity = vec2(1.0, 1.0);
        sprite.visible = false;
        sprite.reset();
        assert_eq!(sprite.position, point2(3.0, 4.0));
        assert_eq!(sprite.angle, 0.0);
        assert_eq!(sprite.velocity, vec2(0.0, 0.0));
        assert!(sprite.visible);
    }

    proptest! {
        #[test]
        fn surface_is_never_negative(
            angle in -10.0f32..10.0,
            w in 1.0f32..500.0,
            h in 1.0f32..500.0,
        ) {
            let mut sprite = Sprite::new(point2(0.0, 0.0), vec2(w, h), vec2(w / 2.0, h / 2.0));
            sprite.angle = angle;
            let surface = sprite.collision_surface();
            prop_assert!(surface.width() >= 0.0);
            prop_assert!(surface.height() >= 0.0);
        }

        #[test]
        fn zero_angle_surface_is_unrotated_size(w in 1.0f32..500.0, h in 1.0f32..500.0) {
            let sprite = Sprite::new(point2(0.0, 0.0), vec2(w, h), vec2(0.0, 0.0));
            let surface = sprite.collision_surface();
            prop_assert_eq!(surface.width(), w.trunc());
            prop_assert_eq!(surface.height(), h.trunc());
        }
    }
}
