use cgmath::*;
use log::trace;

use crate::{
    audio::Sounds,
    constants::{portal::*, projectile::*},
    event_dispatch::Dispatcher,
    geom::Bounds,
    level::FrameContext,
    sprite::{Orientation, Sprite},
    surface::Surface,
    util::clamp,
};

/// What happened the last time a projectile struck something
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Impact {
    OutOfBounds,
    Reflected,
    Absorbed,
    PortalOpened(Orientation),
    /// Neither axis could be trusted to place an aperture; the projectile keeps flying.
    Glanced,
}

/// A portal-gun bullet. Projectile `n` opens aperture `n` of the level's portal pair.
#[derive(Clone, Debug)]
pub struct Projectile {
    pub sprite: Sprite,
    portal_index: usize,
}

impl Projectile {
    pub fn new(portal_index: usize) -> Self {
        let mut sprite = Sprite::new(
            point2(0.0, 0.0),
            vec2(SOURCE_SIZE, SOURCE_SIZE),
            vec2(CENTER.0, CENTER.1),
        );
        sprite.scale = SCALE;
        sprite.visible = false;
        Self {
            sprite,
            portal_index,
        }
    }

    pub fn portal_index(&self) -> usize {
        self.portal_index
    }

    pub fn is_active(&self) -> bool {
        self.sprite.visible
    }

    pub fn fire(
        &mut self,
        start: Point2<f32>,
        direction: Vector2<f32>,
        acceleration: Vector2<f32>,
        dispatcher: &mut Dispatcher,
    ) {
        self.sprite.position = start;
        self.sprite.velocity = direction * SPEED;
        self.sprite.acceleration = acceleration;
        self.sprite.visible = true;
        dispatcher.play_sound(Sounds::PortalFire);
    }

    pub fn update(&mut self, dt: f32) {
        self.sprite.update(dt);
    }

    /// Tests the projectile against the level bounds, then tiles, then obstacles, stopping
    /// as soon as the projectile is spent. Returns the last impact, if any.
    pub fn check_collisions(&mut self, ctx: &mut FrameContext) -> Option<Impact> {
        let size = self.sprite.size();
        let position = self.sprite.position;
        let bounds = ctx.bounds;
        if position.x != clamp(position.x, bounds.left(), bounds.right() - size.x)
            || position.y != clamp(position.y, bounds.top(), bounds.bottom() - size.y)
        {
            self.sprite.visible = false;
            return Some(Impact::OutOfBounds);
        }

        let mut impact = None;

        for tile in ctx.tiles {
            if let Some(result) = tile.bounds.intersection(&self.sprite.collision_surface()) {
                impact = Some(self.handle_collision(
                    tile.surface,
                    tile.bounds,
                    result,
                    Vector2::zero(),
                    ctx,
                ));
                if !self.is_active() {
                    return impact;
                }
            }
        }

        for obstacle in ctx.obstacles {
            let target = obstacle.collision_surface();
            if let Some(result) = target.intersection(&self.sprite.collision_surface()) {
                impact = Some(self.handle_collision(
                    obstacle.contact(&result),
                    target,
                    result,
                    obstacle.velocity(),
                    ctx,
                ));
                if !self.is_active() {
                    return impact;
                }
            }
        }

        impact
    }

    pub fn reset(&mut self) {
        self.sprite.reset();
        self.sprite.visible = false;
        self.sprite.scale = SCALE;
    }

    fn handle_collision(
        &mut self,
        surface: Surface,
        target: Bounds,
        result: Bounds,
        target_velocity: Vector2<f32>,
        ctx: &mut FrameContext,
    ) -> Impact {
        trace!(
            "Projectile {} struck {} surface at {:?}",
            self.portal_index,
            surface,
            result
        );
        match surface {
            Surface::Amplifies => {
                // no real amplification yet, it's just bigger when it lands
                self.sprite.scale *= 2.0;
                self.act(target, result, target_velocity, ctx)
            }
            Surface::Normal => self.act(target, result, target_velocity, ctx),
            Surface::Reflects => self.reflect(result),
            _ => self.absorb(),
        }
    }

    fn absorb(&mut self) -> Impact {
        self.sprite.velocity = Vector2::zero();
        self.sprite.visible = false;
        Impact::Absorbed
    }

    /// Mirrors velocity across the shallower penetration axis and backs the projectile
    /// out of the penetrated area on that axis.
    fn reflect(&mut self, result: Bounds) -> Impact {
        let surface = self.sprite.collision_surface();
        let sprite = &mut self.sprite;
        if result.width() < result.height() {
            if surface.left() < result.left() {
                sprite.position.x -= surface.right() - result.left();
            } else {
                sprite.position.x += result.right() - surface.left();
            }
            sprite.velocity.x = -sprite.velocity.x;
        } else {
            if surface.top() < result.top() {
                sprite.position.y -= surface.bottom() - result.top();
            } else {
                sprite.position.y += result.bottom() - surface.top();
            }
            sprite.velocity.y = -sprite.velocity.y;
        }
        Impact::Reflected
    }

    /// Attempts to open this projectile's aperture on `target`. The axis is picked from the
    /// shape of the penetration and which side the projectile approached from; a target too
    /// thin for the approach speed accepts either side.
    fn act(
        &mut self,
        target: Bounds,
        result: Bounds,
        target_velocity: Vector2<f32>,
        ctx: &mut FrameContext,
    ) -> Impact {
        self.sprite.visible = false;
        let velocity = self.sprite.velocity;
        let result_center = result.center();
        let target_center = target.center();

        let valid_x = ((velocity.x > target_velocity.x) == (result_center.x < target_center.x))
            || (target.width() - velocity.x.abs() / DEPTH_FUDGE <= 0.0);
        let valid_y = ((velocity.y > target_velocity.y) == (result_center.y < target_center.y))
            || (target.height() - velocity.y.abs() / DEPTH_FUDGE <= 0.0);

        let (orientation, opening) = if result.width() < result.height() && valid_x {
            if PORTAL_HEIGHT > target.height() {
                return self.absorb();
            }
            let (orientation, x) = if velocity.x > target_velocity.x {
                (Orientation::Left, target.left() - 1.0)
            } else {
                (Orientation::Right, target.right() - PORTAL_WIDTH + 1.0)
            };
            let y = clamp(
                result_center.y,
                target.top() + PORTAL_HEIGHT / 2.0,
                target.bottom() - PORTAL_HEIGHT / 2.0,
            );
            (orientation, point2(x, y))
        } else if valid_y {
            if PORTAL_HEIGHT > target.width() {
                return self.absorb();
            }
            let (orientation, y) = if velocity.y > target_velocity.y {
                (Orientation::Up, target.top() - 1.0)
            } else {
                (Orientation::Down, target.bottom() - PORTAL_WIDTH + 1.0)
            };
            let x = clamp(
                result_center.x,
                target.left() + PORTAL_HEIGHT / 2.0,
                target.right() - PORTAL_HEIGHT / 2.0,
            );
            (orientation, point2(x, y))
        } else {
            self.sprite.visible = true;
            return Impact::Glanced;
        };

        self.sprite.velocity = Vector2::zero();
        ctx.portals
            .open(opening, orientation, self.portal_index, target_velocity);
        Impact::PortalOpened(orientation)
    }
}
