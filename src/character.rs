use cgmath::*;
use log::trace;
use std::f32::consts::FRAC_PI_2;

use crate::{
    actor::{Actor, EntityId},
    constants::{character::*, METERS_TO_UNITS},
    events::Event,
    geom::Bounds,
    input::{Action, InputState},
    level::FrameContext,
    projectile::Projectile,
    sprite::{Orientation, Sprite},
    surface::Surface,
    util::{clamp, rotate, sign, wrap_angle},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharacterState {
    /// The level is over; the character no longer updates.
    Immobile,
    Ground,
    Air,
    /// Inside a Left/Right facing aperture
    Portal,
    /// Standing on a moving platform
    Platform,
    /// Inside an Up/Down facing aperture
    GravityPortal,
}

impl CharacterState {
    pub fn is_grounded(&self) -> bool {
        matches!(self, CharacterState::Ground | CharacterState::Platform)
    }

    pub fn is_in_portal(&self) -> bool {
        matches!(self, CharacterState::Portal | CharacterState::GravityPortal)
    }

    /// States in which walking and jumping use ground rules
    fn has_footing(&self) -> bool {
        matches!(
            self,
            CharacterState::Ground | CharacterState::Platform | CharacterState::Portal
        )
    }

    fn is_airborne(&self) -> bool {
        matches!(
            self,
            CharacterState::Air | CharacterState::GravityPortal | CharacterState::Portal
        )
    }
}

fn vec_from(v: (f32, f32)) -> Vector2<f32> {
    vec2(v.0, v.1)
}

/// Pivot at the middle of the rect, halving the way whole-unit sizes do
fn center_of(size: (f32, f32)) -> Vector2<f32> {
    vec2((size.0 / 2.0).floor(), (size.1 / 2.0).floor())
}

// ---------------------------------------------------------------------------------------------------------------------

/// The portal gun arm. It hangs off the character's shoulder, follows the body's lean,
/// and points at the aim point.
#[derive(Clone, Debug)]
pub struct GunArm {
    pub sprite: Sprite,
    pub portal_position: Point2<f32>,
    pub portal_angle: f32,
    facing_left: bool,
}

impl Default for GunArm {
    fn default() -> Self {
        Self {
            sprite: Sprite::new(point2(0.0, 0.0), vec2(ARM_LENGTH, 5.0), vec2(0.0, 3.0)),
            portal_position: point2(0.0, 0.0),
            portal_angle: 0.0,
            facing_left: false,
        }
    }
}

impl GunArm {
    fn anchor(ducking: bool) -> Vector2<f32> {
        vec_from(if ducking { ARM_ANCHOR_DUCKED } else { ARM_ANCHOR })
    }

    fn left_anchor(ducking: bool) -> Vector2<f32> {
        vec_from(if ducking {
            ARM_ANCHOR_DUCKED_LEFT
        } else {
            ARM_ANCHOR_LEFT
        })
    }

    pub fn is_facing_left(&self) -> bool {
        self.facing_left
    }

    pub fn update(&mut self, body: &Actor, ducking: bool, aim: Point2<f32>) {
        let body_angle = body.sprite.angle;
        let mut position = body.sprite.position + rotate(Self::anchor(ducking), body_angle);
        self.sprite.angle = (aim.y - position.y).atan2(aim.x - position.x);
        self.facing_left = aim.x < position.x;
        if self.facing_left {
            position += rotate(Self::left_anchor(ducking), body_angle);
        }
        self.sprite.position = position;
    }

    /// Places the arm's ghost alongside the body's ghost while the body is inside a portal.
    pub fn update_portal(&mut self, body: &Actor, ducking: bool) {
        let mut position = body.portal_position + rotate(Self::anchor(ducking), body.portal_angle);
        if wrap_angle(self.sprite.angle).abs() > FRAC_PI_2 {
            position += rotate(Self::left_anchor(ducking), body.portal_angle);
        }
        self.portal_position = position;
        self.portal_angle = self.sprite.angle + body.portal_angle;
    }

    pub fn direction(&self) -> Vector2<f32> {
        vec2(self.sprite.angle.cos(), self.sprite.angle.sin())
    }

    /// Where projectiles leave the gun
    pub fn muzzle(&self) -> Point2<f32> {
        self.sprite.position + self.direction() * ARM_LENGTH
    }

    pub fn reset(&mut self) {
        self.sprite.reset();
        self.portal_position = point2(0.0, 0.0);
        self.portal_angle = 0.0;
        self.facing_left = false;
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// The player. Resolves its own collisions against the level each frame, enters portals,
/// and carries the portal gun and its two projectiles.
#[derive(Clone, Debug)]
pub struct Character {
    actor: Actor,
    state: CharacterState,
    is_ducking: bool,
    forced_ducking: bool,
    current_friction: f32,
    contacts: [Option<Bounds>; 4],
    arm: GunArm,
    projectiles: [Projectile; 2],
}

impl Character {
    pub fn new(id: EntityId, position: Point2<f32>) -> Self {
        let sprite = Sprite::new(
            position,
            vec_from(STANDING_SIZE),
            center_of(STANDING_SIZE),
        );
        Self {
            actor: Actor::new(id, sprite),
            state: CharacterState::Ground,
            is_ducking: false,
            forced_ducking: false,
            current_friction: 0.0,
            contacts: [None; 4],
            arm: GunArm::default(),
            projectiles: [Projectile::new(0), Projectile::new(1)],
        }
    }

    pub fn id(&self) -> EntityId {
        self.actor.id
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    pub fn sprite(&self) -> &Sprite {
        &self.actor.sprite
    }

    pub fn position(&self) -> Point2<f32> {
        self.actor.sprite.position
    }

    pub fn collision_surface(&self) -> Bounds {
        self.actor.sprite.collision_surface()
    }

    pub fn state(&self) -> CharacterState {
        self.state
    }

    pub fn is_grounded(&self) -> bool {
        self.state.is_grounded()
    }

    pub fn is_ducking(&self) -> bool {
        self.is_ducking
    }

    pub fn arm(&self) -> &GunArm {
        &self.arm
    }

    pub fn projectiles(&self) -> &[Projectile; 2] {
        &self.projectiles
    }

    /// Freezes the character in place, e.g. once the level is complete.
    pub fn set_immobile(&mut self) {
        self.state = CharacterState::Immobile;
        self.actor.sprite.velocity = Vector2::zero();
        self.actor.sprite.acceleration = Vector2::zero();
        self.actor.sprite.frame_velocity = Vector2::zero();
    }

    pub fn update(&mut self, dt: f32, input: &InputState, ctx: &mut FrameContext) {
        if self.state == CharacterState::Immobile {
            return;
        }

        self.actor.sprite.acceleration = Vector2::zero();
        self.check_collisions(input, ctx);
        self.update_movement(input);
        self.update_jump(input);
        self.update_duck(input);

        self.actor.sprite.acceleration.y = if self.state.is_airborne() {
            ctx.gravity * METERS_TO_UNITS
        } else {
            0.0
        };

        // lean from portal traversal recovers back to upright
        let angle = self.actor.sprite.angle;
        let recovery = LEAN_RECOVERY_RATE * dt;
        self.actor.sprite.angle = if angle > 0.0 {
            (angle - recovery).max(0.0)
        } else if angle < 0.0 {
            (angle + recovery).min(0.0)
        } else {
            0.0
        };

        self.actor.sprite.update(dt);
        self.arm.update(&self.actor, self.is_ducking, input.aim);
        self.update_projectiles(dt, input, ctx);
    }

    /// Called after the portal pair has computed this frame's ghost pose.
    pub fn update_portal_dependents(&mut self) {
        self.arm.update_portal(&self.actor, self.is_ducking);
    }

    pub fn reset(&mut self) {
        self.stop_ducking();
        self.actor.reset();
        for projectile in self.projectiles.iter_mut() {
            projectile.reset();
        }
        self.arm.reset();
        self.state = CharacterState::Ground;
        self.forced_ducking = false;
        self.current_friction = 0.0;
        self.contacts = [None; 4];
    }

    /// Puts the character back on its feet at `position` after dying. State which would
    /// carry the death over (forced ducking, drift, contacts) is cleared.
    pub fn death_reset(&mut self, position: Point2<f32>) {
        self.forced_ducking = false;
        self.stop_ducking();
        self.actor.reset();
        self.contacts = [None; 4];
        self.actor.sprite.position = position;
    }

    // -----------------------------------------------------------------------------------------------------------------

    fn check_collisions(&mut self, input: &InputState, ctx: &mut FrameContext) {
        self.actor.sprite.frame_velocity = Vector2::zero();

        if ctx.portals.is_open()
            && (self.handle_portal_collision(0, ctx) || self.handle_portal_collision(1, ctx))
        {
            return;
        }

        if self.forced_ducking {
            self.stop_ducking();
        }
        self.state = CharacterState::Air;

        for obstacle in ctx.obstacles {
            let target = obstacle.collision_surface();
            if let Some(result) = target.intersection(&self.collision_surface()) {
                if self.handle_standard_collision(
                    result,
                    target,
                    obstacle.contact(&result),
                    obstacle.friction() * ctx.gravity,
                    obstacle.is_platform(),
                ) {
                    ctx.dispatcher.entity_to_global(self.id(), Event::PlayerDied);
                    return;
                }
                self.actor.sprite.frame_velocity = obstacle.velocity();
                if input.is_pressed(Action::Interact) {
                    ctx.dispatcher
                        .entity_to_entity(self.id(), obstacle.id, Event::Signal);
                }
            }
        }

        for tile in ctx.tiles {
            if let Some(result) = tile.bounds.intersection(&self.collision_surface()) {
                if self.handle_standard_collision(
                    result,
                    tile.bounds,
                    tile.surface,
                    tile.friction() * ctx.gravity,
                    false,
                ) {
                    ctx.dispatcher.entity_to_global(self.id(), Event::PlayerDied);
                    return;
                }
            }
        }

        let up = self.contacts[Orientation::Up.index()];
        let down = self.contacts[Orientation::Down.index()];
        if let (Some(up), Some(down)) = (up, down) {
            self.forced_ducking = true;
            self.duck();
            let surface = self.collision_surface();
            if down.intersects(&surface) && up.intersects(&surface) {
                trace!("Character {} crushed", self.id());
                ctx.dispatcher.entity_to_global(self.id(), Event::PlayerDied);
            }
        } else {
            self.forced_ducking = false;
        }

        self.contacts = [None; 4];
    }

    /// Tests for entry into aperture `index`. Returns true if the character is inside it,
    /// in which case no other collision handling happens this frame.
    fn handle_portal_collision(&mut self, index: usize, ctx: &mut FrameContext) -> bool {
        let aperture = ctx.portals.aperture(index);
        if !aperture.visible {
            return false;
        }
        let orientation = match aperture.orientation {
            Some(orientation) => orientation,
            None => return false,
        };
        let drift = aperture.frame_velocity;
        let portal = aperture.collision_surface();
        let surface = self.collision_surface();
        let result = match surface.intersection(&portal) {
            Some(result) => result,
            None => return false,
        };

        let in_portal = self.state.is_in_portal();
        let sprite = &mut self.actor.sprite;
        let center = sprite.center;

        if orientation.is_horizontal() {
            if result.height() >= surface.height() - PORTAL_HEIGHT_TOLERANCE || in_portal {
                self.state = CharacterState::Portal;
                ctx.portals.add_occupant(index, self.actor.id);
                sprite.frame_velocity = drift;

                // keep the body inside the aperture's span so it can't catch on the wall's edge
                let below = surface.top() >= portal.bottom() - surface.height();
                if below || portal.top() >= surface.top() {
                    if below {
                        sprite.velocity.y = sprite.velocity.y.min(0.0);
                    } else {
                        sprite.velocity.y = sprite.velocity.y.max(0.0);
                    }
                    sprite.position.y = clamp(
                        sprite.position.y,
                        portal.top() + center.y,
                        portal.bottom() - center.y,
                    );
                }
                return true;
            }
        } else if result.width() >= surface.width() - PORTAL_WIDTH_TOLERANCE || in_portal {
            self.state = CharacterState::GravityPortal;
            ctx.portals.add_occupant(index, self.actor.id);

            if surface.left() > portal.right() - surface.width() || portal.left() > surface.left() {
                sprite.position.x = clamp(
                    sprite.position.x,
                    portal.left() + center.x,
                    portal.right() - center.x,
                );
                sprite.velocity.x = 0.0;
            }
            return true;
        }
        false
    }

    /// Resolves a contact with the rect `target`, where `result` is the overlap. Contacts which
    /// are shallow, nearly as wide as the character, or wider than tall relative to the character
    /// are landings (or head bumps); everything else pushes the character out sideways.
    /// Returns true if the contact is lethal, in which case the character is left where it is.
    fn handle_standard_collision(
        &mut self,
        result: Bounds,
        target: Bounds,
        surface_type: Surface,
        friction: f32,
        riding: bool,
    ) -> bool {
        if surface_type == Surface::Death {
            return true;
        }

        let surface = self.collision_surface();
        let sprite = &mut self.actor.sprite;
        let center = sprite.center;

        if result.height() <= LANDING_TOLERANCE
            || result.width() >= surface.width() - 1.0
            || result.height() / surface.height() < result.width() / surface.width()
        {
            if surface.center().y < target.center().y {
                self.current_friction = friction * MASS;
                self.state = if riding {
                    CharacterState::Platform
                } else {
                    CharacterState::Ground
                };
                sprite.velocity.y = 0.0;
                sprite.position.y = target.top() - center.y + 1.0;
                self.contacts[Orientation::Down.index()] = Some(target);
            } else {
                sprite.velocity.y = sprite.velocity.y.min(0.0);
                sprite.position.y = target.bottom() + center.y + 1.0;
                self.contacts[Orientation::Up.index()] = Some(target);
            }
        } else {
            let from_left = sprite.position.x - result.left() < 0.0;
            if from_left {
                self.contacts[Orientation::Right.index()] = Some(target);
                sprite.position.x = result.left() - (surface.width() - center.x + 1.0);
            } else {
                self.contacts[Orientation::Left.index()] = Some(target);
                sprite.position.x = result.left() + result.width() + 1.0 + center.x;
            }
        }

        false
    }

    fn update_movement(&mut self, input: &InputState) {
        let sprite = &mut self.actor.sprite;
        let duck_factor = if self.is_ducking { 0.5 } else { 1.0 };
        let left = input.is_active(Action::MoveLeft);
        let right = input.is_active(Action::MoveRight);

        if self.state.has_footing() {
            if sprite.velocity.x.abs() <= STATIC_ACCEL_GND {
                sprite.acceleration.x = 0.0;
                sprite.velocity.x = 0.0;
            } else {
                sprite.acceleration.x = self.current_friction * -sign(sprite.velocity.x);
            }

            if left {
                sprite.velocity.x = -DEFAULT_SPEED * duck_factor;
            } else if right {
                sprite.velocity.x = DEFAULT_SPEED * duck_factor;
            }
        } else if matches!(
            self.state,
            CharacterState::Air | CharacterState::GravityPortal
        ) {
            if sprite.velocity.x.abs() <= STATIC_ACCEL_AIR {
                sprite.acceleration.x = 0.0;
                sprite.velocity.x = 0.0;
            } else {
                sprite.acceleration.x = DYNAMIC_ACCEL_AIR * -sign(sprite.velocity.x);
            }

            // in the air input only caps speed, it never sets it
            let air_speed = DEFAULT_SPEED / 2.0 * duck_factor;
            if left {
                sprite.velocity.x = sprite.velocity.x.min(-air_speed);
            } else if right {
                sprite.velocity.x = sprite.velocity.x.max(air_speed);
            }
        }
    }

    fn update_jump(&mut self, input: &InputState) {
        if self.state.has_footing()
            && self.actor.sprite.velocity.y == 0.0
            && input.is_pressed(Action::Jump)
        {
            self.state = CharacterState::Air;
            self.actor.sprite.velocity.y = -DEFAULT_SPEED;
        }
    }

    fn update_duck(&mut self, input: &InputState) {
        if input.is_active(Action::Duck) || self.forced_ducking {
            self.duck();
        } else {
            self.stop_ducking();
        }
    }

    fn duck(&mut self) {
        if !self.is_ducking {
            let sprite = &mut self.actor.sprite;
            sprite.position.y += DUCK_OFFSET;
            sprite.source_size = vec_from(DUCKING_SIZE);
            sprite.center = center_of(DUCKING_SIZE);
            self.is_ducking = true;
        }
    }

    fn stop_ducking(&mut self) {
        if self.is_ducking {
            let sprite = &mut self.actor.sprite;
            sprite.position.y -= DUCK_OFFSET;
            sprite.source_size = vec_from(STANDING_SIZE);
            sprite.center = center_of(STANDING_SIZE);
            self.is_ducking = false;
        }
    }

    /// Steps live projectiles, or fires idle ones on the rising edge of their fire action.
    /// Firing closes the projectile's aperture first, which isn't allowed while a portal is in use.
    fn update_projectiles(&mut self, dt: f32, input: &InputState, ctx: &mut FrameContext) {
        let triggers = [Action::FirePrimary, Action::FireSecondary];
        for (index, projectile) in self.projectiles.iter_mut().enumerate() {
            if projectile.is_active() {
                projectile.update(dt);
                projectile.check_collisions(ctx);
            } else if input.is_pressed(triggers[index]) && ctx.portals.can_close() {
                ctx.portals.close(index);
                projectile.fire(
                    self.arm.muzzle(),
                    self.arm.direction(),
                    Vector2::zero(),
                    ctx.dispatcher,
                );
                projectile.check_collisions(ctx);
            }
        }
    }
}

#[cfg(test)]
mod character_tests {
    use super::*;
    use crate::{
        event_dispatch::{Dispatcher, Message},
        obstacles::{Obstacle, PlatformState, Reaction},
        portal::{PortalPair, PortalState},
        tile::Tile,
    };

    const ID: EntityId = 0;

    struct Fixture {
        tiles: Vec<Tile>,
        obstacles: Vec<Obstacle>,
        portals: PortalPair,
        dispatcher: Dispatcher,
    }

    impl Fixture {
        /// A floor whose top is at y=760
        fn new(floor: Surface) -> Self {
            Self {
                tiles: vec![Tile::from_xywh(0.0, 760.0, 1000.0, 40.0, floor)],
                obstacles: vec![],
                portals: PortalPair::default(),
                dispatcher: Dispatcher::default(),
            }
        }

        fn context(&mut self) -> FrameContext {
            FrameContext {
                tiles: &self.tiles,
                obstacles: &self.obstacles,
                portals: &mut self.portals,
                dispatcher: &mut self.dispatcher,
                bounds: Bounds::from_xywh(0.0, 0.0, 1000.0, 800.0),
                gravity: 9.8,
            }
        }

        fn step(&mut self, character: &mut Character, dt: f32, input: &InputState) {
            let mut ctx = self.context();
            character.update(dt, input, &mut ctx);
        }
    }

    /// Standing on the fixture floor: the body's bottom edge sinks 2 units into it
    fn standing() -> Character {
        Character::new(ID, point2(100.0, 694.0))
    }

    fn pressed(action: Action) -> InputState {
        let mut input = InputState::default();
        input.process_action(action, true);
        input
    }

    #[test]
    fn jump_from_ground() {
        let mut fixture = Fixture::new(Surface::Normal);
        let mut character = standing();
        fixture.step(&mut character, 0.0, &pressed(Action::Jump));
        assert_eq!(character.state(), CharacterState::Air);
        assert_eq!(character.sprite().velocity.y, -DEFAULT_SPEED);
    }

    #[test]
    fn falling_character_lands_on_floor() {
        let mut fixture = Fixture::new(Surface::Normal);
        let mut character = Character::new(ID, point2(100.0, 700.0));
        character.actor_mut().sprite.velocity.y = 120.0;
        fixture.step(&mut character, 0.0, &InputState::default());
        assert_eq!(character.state(), CharacterState::Ground);
        assert_eq!(character.position(), point2(100.0, 694.0));
        assert_eq!(character.sprite().velocity.y, 0.0);
        assert!(fixture.dispatcher.is_empty());
    }

    #[test]
    fn lethal_floor_kills_without_snapping() {
        let mut fixture = Fixture::new(Surface::Death);
        let mut character = Character::new(ID, point2(100.0, 700.0));
        fixture.step(&mut character, 0.0, &InputState::default());

        assert_eq!(
            fixture.dispatcher.drain(),
            vec![Message {
                sender_entity_id: Some(ID),
                recipient_entity_id: None,
                event: Event::PlayerDied,
            }]
        );
        assert_eq!(character.position(), point2(100.0, 700.0));
    }

    #[test]
    fn wall_pushes_character_out_sideways() {
        let mut fixture = Fixture::new(Surface::Normal);
        fixture
            .tiles
            .insert(0, Tile::from_xywh(200.0, 500.0, 50.0, 300.0, Surface::Normal));
        let mut character = Character::new(ID, point2(170.0, 694.0));
        fixture.step(&mut character, 0.0, &InputState::default());
        assert_eq!(character.position(), point2(162.0, 694.0));
        assert_eq!(character.state(), CharacterState::Ground);
    }

    #[test]
    fn low_ceiling_forces_duck() {
        let mut fixture = Fixture::new(Surface::Normal);
        fixture
            .tiles
            .insert(0, Tile::from_xywh(0.0, 600.0, 1000.0, 30.0, Surface::Normal));
        let mut character = standing();
        fixture.step(&mut character, 0.0, &InputState::default());
        assert!(character.is_ducking());
        assert!(fixture.dispatcher.is_empty());
    }

    #[test]
    fn crushed_between_ceiling_and_floor() {
        let mut fixture = Fixture::new(Surface::Normal);
        fixture
            .tiles
            .insert(0, Tile::from_xywh(0.0, 600.0, 1000.0, 70.0, Surface::Normal));
        let mut character = standing();
        fixture.step(&mut character, 0.0, &InputState::default());

        let messages = fixture.dispatcher.drain();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].event, Event::PlayerDied);
    }

    #[test]
    fn duck_is_applied_once() {
        let mut fixture = Fixture::new(Surface::Normal);
        let mut character = standing();
        let mut input = pressed(Action::Duck);

        fixture.step(&mut character, 0.0, &input);
        input.update();
        fixture.step(&mut character, 0.0, &input);
        assert!(character.is_ducking());
        assert_eq!(character.position().y, 694.0 + DUCK_OFFSET);

        input.process_action(Action::Duck, false);
        fixture.step(&mut character, 0.0, &input);
        assert!(!character.is_ducking());
        assert_eq!(character.position().y, 694.0);
    }

    fn platform(state: PlatformState) -> Obstacle {
        Obstacle::platform(
            5,
            vec![point2(50.0, 760.0), point2(500.0, 760.0)],
            50.0,
            vec2(300.0, 40.0),
            state,
            vec![Reaction::new(ID, PlatformState::Stationary as i32)],
        )
        .unwrap()
    }

    #[test]
    fn interact_signals_contacted_obstacle_on_press_only() {
        let mut fixture = Fixture::new(Surface::Normal);
        fixture.tiles.clear();
        fixture.obstacles.push(platform(PlatformState::Stationary));
        let mut character = standing();
        let mut input = pressed(Action::Interact);

        fixture.step(&mut character, 0.0, &input);
        assert_eq!(character.state(), CharacterState::Platform);
        assert_eq!(
            fixture.dispatcher.drain(),
            vec![Message {
                sender_entity_id: Some(ID),
                recipient_entity_id: Some(5),
                event: Event::Signal,
            }]
        );

        input.update();
        fixture.step(&mut character, 0.0, &input);
        assert!(fixture.dispatcher.is_empty());
    }

    #[test]
    fn riding_platform_picks_up_its_drift() {
        let mut fixture = Fixture::new(Surface::Normal);
        fixture.tiles.clear();
        let mut moving = platform(PlatformState::Forward);
        moving.update(1.0 / 60.0);
        assert_eq!(moving.velocity(), vec2(50.0, 0.0));
        fixture.obstacles.push(moving);

        let mut character = standing();
        fixture.step(&mut character, 0.0, &InputState::default());
        assert_eq!(character.state(), CharacterState::Platform);
        assert_eq!(character.sprite().frame_velocity, vec2(50.0, 0.0));
    }

    #[test]
    fn entering_side_aperture() {
        let mut fixture = Fixture::new(Surface::Normal);
        fixture
            .portals
            .open(point2(130.0, 690.0), Orientation::Left, 0, Vector2::zero());
        fixture
            .portals
            .open(point2(800.0, 300.0), Orientation::Right, 1, Vector2::zero());
        assert_eq!(fixture.portals.state(), PortalState::Open);

        let mut character = standing();
        fixture.step(&mut character, 0.0, &InputState::default());
        assert_eq!(character.state(), CharacterState::Portal);
        assert_eq!(fixture.portals.occupants(0), &[ID]);
        assert_eq!(fixture.portals.state(), PortalState::InUse);
    }

    #[test]
    fn firing_opens_aperture_on_wall() {
        let mut fixture = Fixture::new(Surface::Normal);
        fixture
            .tiles
            .push(Tile::from_xywh(400.0, 0.0, 100.0, 760.0, Surface::Normal));
        let mut character = standing();
        let mut input = pressed(Action::FirePrimary);
        input.set_aim(point2(600.0, 686.0));

        fixture.step(&mut character, 1.0 / 60.0, &input);
        assert_eq!(character.arm().muzzle(), point2(133.0, 686.0));
        assert!(character.projectiles()[0].is_active());
        assert!(!character.projectiles()[1].is_active());
        assert_eq!(
            fixture.dispatcher.drain()[0].event,
            Event::PlaySound(crate::audio::Sounds::PortalFire)
        );

        input.update();
        for _ in 0..60 {
            fixture.step(&mut character, 1.0 / 60.0, &input);
            if !character.projectiles()[0].is_active() {
                break;
            }
        }
        assert!(!character.projectiles()[0].is_active());
        let aperture = fixture.portals.aperture(0);
        assert!(aperture.visible);
        assert_eq!(aperture.orientation, Some(Orientation::Left));
    }

    #[test]
    fn cannot_fire_while_portal_in_use() {
        let mut fixture = Fixture::new(Surface::Normal);
        fixture.portals.add_occupant(0, 99);
        let mut character = standing();
        fixture.step(&mut character, 0.0, &pressed(Action::FireSecondary));
        assert!(!character.projectiles()[1].is_active());
        assert!(fixture.dispatcher.is_empty());
    }

    #[test]
    fn immobile_character_ignores_input() {
        let mut fixture = Fixture::new(Surface::Normal);
        let mut character = standing();
        character.set_immobile();
        fixture.step(&mut character, 1.0 / 60.0, &pressed(Action::Jump));
        assert_eq!(character.state(), CharacterState::Immobile);
        assert_eq!(character.position(), point2(100.0, 694.0));
    }
}
