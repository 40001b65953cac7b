use anyhow::{Context, Result};
use cgmath::*;
use log::{debug, warn};
use std::convert::TryFrom;

use crate::{
    actor::EntityId,
    audio::Sounds,
    constants::obstacle::FRICTION,
    event_dispatch::Dispatcher,
    events::Event,
    geom::Bounds,
    sprite::Sprite,
    surface::Surface,
};

pub mod door;
pub mod platform;
pub mod switch;

pub use door::{Door, DoorState};
pub use platform::{Platform, PlatformState};
pub use switch::{Switch, SwitchState};

// ---------------------------------------------------------------------------------------------------------------------

/// When a signal from `source` reaches an obstacle, the obstacle adopts `state`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reaction {
    pub source: EntityId,
    pub state: i32,
}

impl Reaction {
    pub fn new(source: EntityId, state: i32) -> Self {
        Self { source, state }
    }
}

#[derive(Clone, Debug)]
pub enum ObstacleKind {
    Platform(Platform),
    Switch(Switch),
    Door(Door),
}

impl ObstacleKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::Platform(_) => "platform",
            ObstacleKind::Switch(_) => "switch",
            ObstacleKind::Door(_) => "door",
        }
    }

    fn state(&self) -> i32 {
        match self {
            ObstacleKind::Platform(p) => p.state as i32,
            ObstacleKind::Switch(s) => s.state as i32,
            ObstacleKind::Door(d) => d.state as i32,
        }
    }

    fn initial_state(&self) -> i32 {
        match self {
            ObstacleKind::Platform(p) => p.initial_state as i32,
            ObstacleKind::Switch(s) => s.initial_state as i32,
            ObstacleKind::Door(d) => d.initial_state as i32,
        }
    }

    /// Verifies `value` is a meaningful state for this kind of obstacle.
    pub fn validate_state(&self, value: i32) -> Result<()> {
        match self {
            ObstacleKind::Platform(_) => PlatformState::try_from(value).map(|_| ()),
            ObstacleKind::Switch(_) => SwitchState::try_from(value).map(|_| ()),
            ObstacleKind::Door(_) => DoorState::try_from(value).map(|_| ()),
        }
    }

    fn set_state(&mut self, value: i32) -> Result<()> {
        match self {
            ObstacleKind::Platform(p) => p.state = PlatformState::try_from(value)?,
            ObstacleKind::Switch(s) => s.state = SwitchState::try_from(value)?,
            ObstacleKind::Door(d) => d.state = DoorState::try_from(value)?,
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// A stateful piece of level geometry which reacts to signals. The sprite carries the
/// obstacle's kinematics; its position is the top-left corner of the obstacle.
#[derive(Clone, Debug)]
pub struct Obstacle {
    pub id: EntityId,
    pub sprite: Sprite,
    pub reactions: Vec<Reaction>,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn platform(
        id: EntityId,
        path: Vec<Point2<f32>>,
        speed: f32,
        size: Vector2<f32>,
        state: PlatformState,
        reactions: Vec<Reaction>,
    ) -> Result<Self> {
        let platform = Platform::new(path, speed, state)
            .with_context(|| format!("Unable to create platform {}", id))?;
        let sprite = Sprite::new(platform.path[0], size, Vector2::zero());
        Ok(Self {
            id,
            sprite,
            reactions,
            kind: ObstacleKind::Platform(platform),
        })
    }

    pub fn switch(
        id: EntityId,
        position: Point2<f32>,
        size: Vector2<f32>,
        state: SwitchState,
        reactions: Vec<Reaction>,
    ) -> Self {
        Self {
            id,
            sprite: Sprite::new(position, size, Vector2::zero()),
            reactions,
            kind: ObstacleKind::Switch(Switch::new(state)),
        }
    }

    pub fn door(
        id: EntityId,
        position: Point2<f32>,
        size: Vector2<f32>,
        state: DoorState,
        reactions: Vec<Reaction>,
    ) -> Self {
        Self {
            id,
            sprite: Sprite::new(position, size, Vector2::zero()),
            reactions,
            kind: ObstacleKind::Door(Door::new(state, size.y)),
        }
    }

    pub fn state(&self) -> i32 {
        self.kind.state()
    }

    pub fn initial_state(&self) -> i32 {
        self.kind.initial_state()
    }

    /// The obstacle's surface when not otherwise qualified by the contact area
    pub fn surface(&self) -> Surface {
        match self.kind {
            ObstacleKind::Platform(_) => Surface::Normal,
            ObstacleKind::Switch(_) | ObstacleKind::Door(_) => Surface::Absorbs,
        }
    }

    pub fn friction(&self) -> f32 {
        FRICTION
    }

    /// Classifies a contact against this obstacle. Platforms only accept portals on their
    /// broad faces: a contact area taller than wide is treated as absorbing.
    pub fn contact(&self, area: &Bounds) -> Surface {
        match self.kind {
            ObstacleKind::Platform(_) => {
                if area.width() > area.height() {
                    self.surface()
                } else {
                    Surface::Absorbs
                }
            }
            _ => self.surface(),
        }
    }

    pub fn collision_surface(&self) -> Bounds {
        self.sprite.collision_surface()
    }

    /// Drift imparted to whatever rests on or is attached to this obstacle
    pub fn velocity(&self) -> Vector2<f32> {
        match &self.kind {
            ObstacleKind::Platform(p) => p.velocity(&self.sprite),
            ObstacleKind::Door(d) => d.velocity(&self.sprite),
            ObstacleKind::Switch(_) => Vector2::zero(),
        }
    }

    pub fn is_platform(&self) -> bool {
        matches!(self.kind, ObstacleKind::Platform(_))
    }

    /// Looks up the first reaction rule for `source` and adopts its state. Returns true if a rule
    /// matched. A switch which ends up Pressed signals every other obstacle and requests its sound.
    pub fn react(&mut self, source: EntityId, dispatcher: &mut Dispatcher) -> bool {
        let reaction = match self.reactions.iter().find(|r| r.source == source) {
            Some(reaction) => *reaction,
            None => return false,
        };

        if let Err(e) = self.kind.set_state(reaction.state) {
            warn!(
                "{} {} ignoring reaction to {}: {}",
                self.kind.name(),
                self.id,
                source,
                e
            );
            return false;
        }

        debug!(
            "{} {} reacted to {}, state is now {}",
            self.kind.name(),
            self.id,
            source,
            self.state()
        );

        if let ObstacleKind::Switch(switch) = &self.kind {
            if switch.is_pressed() {
                dispatcher.entity_to_global(self.id, Event::Signal);
                dispatcher.play_sound(Sounds::Switch);
            }
        }
        true
    }

    pub fn update(&mut self, dt: f32) {
        match &mut self.kind {
            ObstacleKind::Platform(p) => p.update(&mut self.sprite, dt),
            ObstacleKind::Door(d) => d.update(&mut self.sprite, dt),
            ObstacleKind::Switch(_) => {}
        }
    }

    pub fn reset(&mut self) {
        match &mut self.kind {
            ObstacleKind::Platform(p) => p.reset(&mut self.sprite),
            ObstacleKind::Door(d) => d.reset(&mut self.sprite),
            ObstacleKind::Switch(s) => {
                s.reset();
                self.sprite.reset();
            }
        }
    }
}

#[cfg(test)]
mod obstacle_tests {
    use super::*;
    use crate::event_dispatch::Message;

    const PLAYER: EntityId = 1;

    fn make_switch(id: EntityId, state: SwitchState) -> Obstacle {
        Obstacle::switch(
            id,
            point2(0.0, 0.0),
            vec2(20.0, 100.0),
            state,
            vec![Reaction::new(PLAYER, SwitchState::Pressed as i32)],
        )
    }

    #[test]
    fn react_adopts_first_matching_rule() {
        let mut dispatcher = Dispatcher::default();
        let mut door = Obstacle::door(
            10,
            point2(0.0, 0.0),
            vec2(20.0, 200.0),
            DoorState::Stationary,
            vec![
                Reaction::new(5, DoorState::Opening as i32),
                Reaction::new(5, DoorState::Closing as i32),
                Reaction::new(6, DoorState::Closing as i32),
            ],
        );
        assert!(door.react(5, &mut dispatcher));
        assert_eq!(door.state(), DoorState::Opening as i32);
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn react_without_rule_is_a_noop() {
        let mut dispatcher = Dispatcher::default();
        let mut switch = make_switch(10, SwitchState::Active);
        assert!(!switch.react(99, &mut dispatcher));
        assert_eq!(switch.state(), SwitchState::Active as i32);
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn pressed_switch_broadcasts_and_plays_sound() {
        let mut dispatcher = Dispatcher::default();
        let mut switch = make_switch(10, SwitchState::Active);
        assert!(switch.react(PLAYER, &mut dispatcher));
        assert_eq!(switch.state(), SwitchState::Pressed as i32);

        let messages = dispatcher.drain();
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0],
            Message {
                sender_entity_id: Some(10),
                recipient_entity_id: None,
                event: Event::Signal,
            }
        );
        assert_eq!(messages[1].event, Event::PlaySound(Sounds::Switch));
    }

    #[test]
    fn switch_moving_to_other_states_stays_quiet() {
        let mut dispatcher = Dispatcher::default();
        let mut switch = Obstacle::switch(
            10,
            point2(0.0, 0.0),
            vec2(20.0, 100.0),
            SwitchState::Active,
            vec![Reaction::new(PLAYER, SwitchState::Inactive as i32)],
        );
        assert!(switch.react(PLAYER, &mut dispatcher));
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn invalid_reaction_state_is_ignored() {
        let mut dispatcher = Dispatcher::default();
        let mut switch = Obstacle::switch(
            10,
            point2(0.0, 0.0),
            vec2(20.0, 100.0),
            SwitchState::Active,
            vec![Reaction::new(PLAYER, 7)],
        );
        assert!(!switch.react(PLAYER, &mut dispatcher));
        assert_eq!(switch.state(), SwitchState::Active as i32);
    }

    #[test]
    fn platform_contact_depends_on_area_shape() {
        let platform = Obstacle::platform(
            3,
            vec![point2(0.0, 0.0), point2(100.0, 0.0)],
            50.0,
            vec2(160.0, 20.0),
            PlatformState::Forward,
            vec![Reaction::new(PLAYER, 0)],
        )
        .unwrap();
        assert_eq!(
            platform.contact(&Bounds::from_xywh(0.0, 0.0, 30.0, 5.0)),
            Surface::Normal
        );
        assert_eq!(
            platform.contact(&Bounds::from_xywh(0.0, 0.0, 5.0, 15.0)),
            Surface::Absorbs
        );
        assert_eq!(make_switch(4, SwitchState::Active).contact(&Bounds::from_xywh(0.0, 0.0, 30.0, 5.0)), Surface::Absorbs);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut dispatcher = Dispatcher::default();
        let mut switch = make_switch(10, SwitchState::Active);
        switch.react(PLAYER, &mut dispatcher);
        switch.reset();
        assert_eq!(switch.state(), SwitchState::Active as i32);
        assert_eq!(switch.initial_state(), SwitchState::Active as i32);
    }
}
