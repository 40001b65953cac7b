use crate::{geom::Bounds, surface::Surface};

/// Static level geometry. Tiles are created with the level and never mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub bounds: Bounds,
    pub surface: Surface,
}

impl Tile {
    pub fn new(bounds: Bounds, surface: Surface) -> Self {
        Self { bounds, surface }
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32, surface: Surface) -> Self {
        Self::new(Bounds::from_xywh(x, y, width, height), surface)
    }

    pub fn friction(&self) -> f32 {
        self.surface.friction()
    }
}
