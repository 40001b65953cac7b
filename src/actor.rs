use cgmath::*;

use crate::sprite::Sprite;

/// Stable identifier for anything which can send or receive signals: obstacles and the player.
pub type EntityId = u32;

/// An Actor is a sprite which can pass through portals. While inside an aperture it
/// carries a second, "portal-side" pose describing where its ghost image appears
/// at the other aperture.
#[derive(Clone, Debug)]
pub struct Actor {
    pub id: EntityId,
    pub sprite: Sprite,
    pub portal_position: Point2<f32>,
    pub portal_angle: f32,
}

impl Actor {
    pub fn new(id: EntityId, sprite: Sprite) -> Self {
        Self {
            id,
            sprite,
            portal_position: point2(0.0, 0.0),
            portal_angle: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.sprite.reset();
        self.portal_position = point2(0.0, 0.0);
        self.portal_angle = 0.0;
    }
}
