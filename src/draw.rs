use cgmath::*;

use crate::sprite::Sprite;

/// Draw passes, in the order a level emits them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Background,
    Obstacle,
    Character,
    Projectile,
    GunArm,
    PortalGhost,
    Foreground,
    Aperture,
}

/// One textured quad, positioned in viewport space. `frame` selects a cell of the
/// sprite's strip (switch state, projectile or aperture index).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub layer: Layer,
    pub position: Point2<f32>,
    pub size: Vector2<f32>,
    pub center: Vector2<f32>,
    pub angle: f32,
    pub frame: usize,
    pub flipped: bool,
}

impl DrawCommand {
    pub fn new(layer: Layer, sprite: &Sprite, offset: Vector2<f32>) -> Self {
        Self {
            layer,
            position: sprite.position + offset,
            size: sprite.size(),
            center: sprite.center,
            angle: sprite.angle,
            frame: 0,
            flipped: false,
        }
    }

    /// A full-level quad such as the background art
    pub fn level(layer: Layer, size: Vector2<f32>, offset: Vector2<f32>) -> Self {
        Self {
            layer,
            position: point2(0.0, 0.0) + offset,
            size,
            center: Vector2::zero(),
            angle: 0.0,
            frame: 0,
            flipped: false,
        }
    }

    /// Same sprite drawn at a different pose, for ghost images on the far side of a portal
    pub fn at(mut self, position: Point2<f32>, angle: f32, offset: Vector2<f32>) -> Self {
        self.position = position + offset;
        self.angle = angle;
        self
    }

    pub fn with_frame(mut self, frame: usize) -> Self {
        self.frame = frame;
        self
    }

    pub fn flipped(mut self, flipped: bool) -> Self {
        self.flipped = flipped;
        self
    }
}

/// Receives draw commands. Rendering is up to the implementor; a Vec collects them as a draw list.
pub trait Canvas {
    fn draw(&mut self, command: DrawCommand);
}

impl Canvas for Vec<DrawCommand> {
    fn draw(&mut self, command: DrawCommand) {
        self.push(command);
    }
}
