use anyhow::{bail, Result};
use cgmath::*;

/// A respawn location with a trigger region. The region is one quadrant of the plane
/// around `bound`; `quadrant` counts 1..=4 and picks which side of each axis counts as inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Checkpoint {
    pub location: Point2<f32>,
    pub bound: Point2<f32>,
    pub quadrant: u8,
}

impl Checkpoint {
    pub fn new(location: Point2<f32>, bound: Point2<f32>, quadrant: u8) -> Result<Self> {
        if !(1..=4).contains(&quadrant) {
            bail!("Checkpoint quadrant must be in 1..=4, got {}", quadrant);
        }
        Ok(Self {
            location,
            bound,
            quadrant,
        })
    }

    /// Per-axis sign applied to (bound - position) for the in-bounds test
    pub fn quadrant_sign(&self) -> Vector2<f32> {
        vec2(
            if self.quadrant % 3 == 1 { -1.0 } else { 1.0 },
            if self.quadrant > 2 { -1.0 } else { 1.0 },
        )
    }

    pub fn in_bounds(&self, position: Point2<f32>) -> bool {
        let sign = self.quadrant_sign();
        let d = self.bound - position;
        sign.x * d.x >= 0.0 && sign.y * d.y >= 0.0
    }
}
