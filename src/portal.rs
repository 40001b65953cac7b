use cgmath::*;
use log::debug;
use std::f32::consts::FRAC_PI_2;

use crate::{
    actor::{Actor, EntityId},
    constants::portal::*,
    sprite::{Orientation, Sprite},
    util::{rotate, wrap_angle},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortalState {
    Closed,
    Open,
    InUse,
}

/// Two linked one-sided apertures. Apertures are thin sprites whose pivot sits at the middle
/// of their long edge; Up/Down-facing apertures are rotated a quarter turn to lie flat.
#[derive(Clone, Debug)]
pub struct PortalPair {
    apertures: [Sprite; 2],
    state: PortalState,
    occupants: [Vec<EntityId>; 2],
}

impl Default for PortalPair {
    fn default() -> Self {
        let make_aperture = || {
            let mut sprite = Sprite::new(
                point2(0.0, 0.0),
                vec2(PORTAL_WIDTH, PORTAL_HEIGHT),
                vec2(0.0, PORTAL_HEIGHT / 2.0),
            );
            sprite.visible = false;
            sprite
        };
        Self {
            apertures: [make_aperture(), make_aperture()],
            state: PortalState::Closed,
            occupants: [vec![], vec![]],
        }
    }
}

impl PortalPair {
    pub fn state(&self) -> PortalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PortalState::Closed
    }

    /// Apertures can't be closed (or re-fired) while something is passing through them.
    pub fn can_close(&self) -> bool {
        self.state != PortalState::InUse
    }

    pub fn aperture(&self, index: usize) -> &Sprite {
        &self.apertures[index]
    }

    pub fn occupants(&self, index: usize) -> &[EntityId] {
        &self.occupants[index]
    }

    /// Places aperture `index` at `position` facing `orientation`, drifting with `drift`.
    /// If this leaves both apertures open but overlapping, the new aperture is closed instead.
    pub fn open(
        &mut self,
        position: Point2<f32>,
        orientation: Orientation,
        index: usize,
        drift: Vector2<f32>,
    ) {
        {
            let aperture = &mut self.apertures[index];
            aperture.visible = true;
            aperture.angle = if orientation.is_horizontal() {
                0.0
            } else {
                FRAC_PI_2
            };
            aperture.position = position;
            aperture.orientation = Some(orientation);
            aperture.frame_velocity = drift;
        }

        if self.apertures[0].visible && self.apertures[1].visible {
            let a = self.apertures[0].collision_surface();
            let b = self.apertures[1].collision_surface();
            if a.intersects(&b) {
                debug!(
                    "PortalPair::open - aperture {} at {:?} overlaps its partner, closing",
                    index, position
                );
                self.close(index);
                return;
            }
            self.state = PortalState::Open;
        }
        debug!(
            "PortalPair::open - aperture {} at {:?} facing {}",
            index, position, orientation
        );
    }

    pub fn close(&mut self, index: usize) {
        let aperture = &mut self.apertures[index];
        aperture.angle = 0.0;
        aperture.visible = false;
        self.state = PortalState::Closed;
    }

    pub fn reset(&mut self) {
        for aperture in self.apertures.iter_mut() {
            aperture.reset();
            aperture.visible = false;
            aperture.orientation = None;
        }
        self.state = PortalState::Closed;
        self.clear_occupants();
    }

    /// Records that actor `id` is inside aperture `index` this frame.
    pub fn add_occupant(&mut self, index: usize, id: EntityId) {
        if !self.occupants[index].contains(&id) {
            self.occupants[index].push(id);
        }
        self.state = PortalState::InUse;
    }

    /// Occupancy is rebuilt every frame; the level clears it before anything moves.
    pub fn clear_occupants(&mut self) {
        for occupants in self.occupants.iter_mut() {
            occupants.clear();
        }
    }

    /// Advances aperture drift and computes the portal-side pose of every occupant,
    /// teleporting those which have crossed their aperture's plane.
    /// `time` is total simulated time, used for swap hysteresis.
    pub fn update(&mut self, dt: f32, time: f32, actors: &mut [&mut Actor]) {
        if self.occupants.iter().any(|o| !o.is_empty()) {
            self.state = PortalState::InUse;
        } else if self.state == PortalState::InUse {
            self.state = PortalState::Open;
        }

        for aperture in self.apertures.iter_mut() {
            aperture.update(dt);
        }

        for (in_index, out_index) in [(0, 1), (1, 0)].iter() {
            let portal_in = &self.apertures[*in_index];
            let portal_out = &self.apertures[*out_index];
            for id in self.occupants[*in_index].iter() {
                if let Some(actor) = actors.iter_mut().find(|a| a.id == *id) {
                    transform_occupant(actor, portal_in, portal_out, time);
                }
            }
        }
    }
}

/// Computes `actor`'s ghost pose at `portal_out` and swaps it into place once the actor has
/// crossed `portal_in`. Returns true if the actor was teleported.
fn transform_occupant(
    actor: &mut Actor,
    portal_in: &Sprite,
    portal_out: &Sprite,
    time: f32,
) -> bool {
    let (in_orientation, out_orientation) = match (portal_in.orientation, portal_out.orientation)
    {
        (Some(i), Some(o)) => (i, o),
        _ => return false,
    };

    let angle = wrap_angle(FRAC_PI_2 * (2 - (in_orientation as i32 - out_orientation as i32)) as f32);
    let in_center = portal_in.collision_surface().center();
    let out_center = portal_out.collision_surface().center();

    actor.portal_angle = angle;
    actor.portal_position = out_center + rotate(actor.sprite.position - in_center, angle);

    let actor_center = actor.sprite.collision_surface().center();
    let crossed = match in_orientation {
        Orientation::Up => in_center.y < actor_center.y,
        Orientation::Right => in_center.x > actor_center.x,
        Orientation::Down => in_center.y > actor_center.y,
        Orientation::Left => in_center.x < actor_center.x,
    };

    if crossed && time - actor.sprite.last_swap_time > SWAP_HYSTERESIS {
        let sprite = &mut actor.sprite;
        sprite.last_swap_time = time;

        std::mem::swap(&mut sprite.position, &mut actor.portal_position);
        std::mem::swap(&mut sprite.angle, &mut actor.portal_angle);
        sprite.velocity = rotate(sprite.velocity, angle);
        sprite.acceleration = rotate(sprite.acceleration, angle);
        if out_orientation == Orientation::Up {
            sprite.velocity += vec2(0.0, -UP_EXIT_BOOST);
        }

        debug!(
            "Actor {} swapped through portal {} -> {}, now at {:?}",
            actor.id, in_orientation, out_orientation, sprite.position
        );
        return true;
    }
    false
}
