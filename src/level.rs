use anyhow::{bail, Context, Result};
use cgmath::*;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::convert::TryFrom;
use std::path::Path;

use crate::{
    actor::EntityId,
    audio::{SoundPlayer, Sounds},
    camera::Camera,
    character::Character,
    checkpoint::Checkpoint,
    constants::MAX_DISPATCH_ROUNDS,
    draw::{Canvas, DrawCommand, Layer},
    event_dispatch::{Dispatcher, Message, MessageHandler},
    events::Event,
    geom::Bounds,
    input::InputState,
    level_data::{LevelData, ObstacleData, ObstacleShape, ReactionSource},
    obstacles::{DoorState, Obstacle, ObstacleKind, PlatformState, Reaction, SwitchState},
    portal::PortalPair,
    tile::Tile,
};

/// Everything the character and its projectiles may read or poke at during their update.
/// Obstacles are read-only here; anything that should change an obstacle goes through the dispatcher.
pub struct FrameContext<'a> {
    pub tiles: &'a [Tile],
    pub obstacles: &'a [Obstacle],
    pub portals: &'a mut PortalPair,
    pub dispatcher: &'a mut Dispatcher,
    pub bounds: Bounds,
    pub gravity: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Statistics {
    pub time_elapsed: f32,
    pub deaths: u32,
}

impl Statistics {
    /// Whole seconds taken so far
    pub fn score(&self) -> u32 {
        self.time_elapsed as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelStatus {
    Playing,
    Complete,
}

// ---------------------------------------------------------------------------------------------------------------------

pub struct Level {
    id: u32,
    gravity: f32,
    size: Vector2<f32>,
    tiles: Vec<Tile>,
    obstacles: Vec<Obstacle>,
    checkpoints: Vec<Checkpoint>,
    checkpoint_index: usize,
    player: Character,
    portals: PortalPair,
    dispatcher: Dispatcher,
    camera: Camera,
    camera_offset: Vector2<f32>,
    statistics: Statistics,
    sounds: Box<dyn SoundPlayer>,
    status: LevelStatus,
}

impl Level {
    /// Builds a playable level from its document, binding the player to `player_id`.
    /// Any inconsistency in the document is an error; nothing is patched up.
    pub fn new(data: &LevelData, player_id: EntityId, sounds: Box<dyn SoundPlayer>) -> Result<Self> {
        if data.width <= 0.0 || data.height <= 0.0 {
            bail!(
                "Level {} has non-positive size {}x{}",
                data.id,
                data.width,
                data.height
            );
        }
        if data.checkpoints.len() < 2 {
            bail!(
                "Level {} needs a spawn and at least one more checkpoint, found {}",
                data.id,
                data.checkpoints.len()
            );
        }

        let mut ids = HashSet::new();
        for o in &data.obstacles {
            if o.id == player_id {
                bail!("Obstacle id {} collides with the player id", o.id);
            }
            if !ids.insert(o.id) {
                bail!("Duplicate obstacle id {}", o.id);
            }
        }

        let obstacles = data
            .obstacles
            .iter()
            .map(|o| {
                build_obstacle(o, player_id, &ids)
                    .with_context(|| format!("Unable to build obstacle {} of level {}", o.id, data.id))
            })
            .collect::<Result<Vec<_>>>()?;

        let spawn = data.checkpoints[0].location;

        info!(
            "Level {} loaded ({}x{}, gravity {}): {} tiles, {} obstacles, {} checkpoints",
            data.id,
            data.width,
            data.height,
            data.gravity,
            data.tiles.len(),
            obstacles.len(),
            data.checkpoints.len()
        );

        Ok(Self {
            id: data.id,
            gravity: data.gravity,
            size: vec2(data.width, data.height),
            tiles: data.tiles.clone(),
            obstacles,
            checkpoints: data.checkpoints.clone(),
            checkpoint_index: 1,
            player: Character::new(player_id, spawn),
            portals: PortalPair::default(),
            dispatcher: Dispatcher::default(),
            camera: Camera::default(),
            camera_offset: Vector2::zero(),
            statistics: Statistics::default(),
            sounds,
            status: LevelStatus::Playing,
        })
    }

    pub fn load(path: &Path, player_id: EntityId, sounds: Box<dyn SoundPlayer>) -> Result<Self> {
        let data = LevelData::from_file(path)?;
        Self::new(&data, player_id, sounds)
            .with_context(|| format!("Level document {} is inconsistent", path.display()))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn size(&self) -> Vector2<f32> {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(point2(0.0, 0.0), self.size)
    }

    pub fn player(&self) -> &Character {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacle(&self, id: EntityId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn portals(&self) -> &PortalPair {
        &self.portals
    }

    pub fn checkpoint_index(&self) -> usize {
        self.checkpoint_index
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn status(&self) -> LevelStatus {
        self.status
    }

    pub fn camera_offset(&self) -> Vector2<f32> {
        self.camera_offset
    }

    pub fn set_viewport(&mut self, viewport: Vector2<f32>) {
        self.camera.resize(viewport);
    }

    /// Advances the level one frame. Obstacles move first, then the player (and its projectiles)
    /// against the moved obstacles, then queued messages are delivered, then the portal pair
    /// carries occupants through.
    pub fn update(&mut self, dt: f32, input: &InputState) -> LevelStatus {
        if self.status == LevelStatus::Complete {
            return self.status;
        }

        self.statistics.time_elapsed += dt;
        self.portals.clear_occupants();

        for obstacle in self.obstacles.iter_mut() {
            obstacle.update(dt);
        }

        let bounds = self.bounds();
        {
            let mut ctx = FrameContext {
                tiles: &self.tiles,
                obstacles: &self.obstacles,
                portals: &mut self.portals,
                dispatcher: &mut self.dispatcher,
                bounds,
                gravity: self.gravity,
            };
            self.player.update(dt, input, &mut ctx);
        }

        self.dispatch_messages();

        self.portals.update(
            dt,
            self.statistics.time_elapsed,
            &mut [self.player.actor_mut()],
        );
        self.player.update_portal_dependents();

        self.camera_offset = self.camera.offset(self.player.position(), self.size);

        if self.player.is_grounded() {
            self.update_checkpoints();
        }

        self.status
    }

    pub fn reset(&mut self) {
        self.statistics = Statistics::default();
        self.portals.reset();
        for obstacle in self.obstacles.iter_mut() {
            obstacle.reset();
        }
        self.player.reset();
        self.dispatcher.drain();
        self.checkpoint_index = 1;
        self.status = LevelStatus::Playing;
        self.camera_offset = self.camera.offset(self.player.position(), self.size);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let offset = self.camera_offset;
        canvas.draw(DrawCommand::level(Layer::Background, self.size, offset));

        for obstacle in &self.obstacles {
            let frame = match &obstacle.kind {
                ObstacleKind::Switch(switch) => switch.frame(),
                _ => 0,
            };
            canvas.draw(DrawCommand::new(Layer::Obstacle, &obstacle.sprite, offset).with_frame(frame));
        }

        let arm = self.player.arm();
        let facing_left = arm.is_facing_left();
        canvas.draw(
            DrawCommand::new(Layer::Character, self.player.sprite(), offset).flipped(facing_left),
        );
        for projectile in self.player.projectiles().iter().filter(|p| p.is_active()) {
            canvas.draw(
                DrawCommand::new(Layer::Projectile, &projectile.sprite, offset)
                    .with_frame(projectile.portal_index()),
            );
        }
        canvas.draw(DrawCommand::new(Layer::GunArm, &arm.sprite, offset).flipped(facing_left));

        if self.player.state().is_in_portal() {
            let actor = self.player.actor();
            canvas.draw(
                DrawCommand::new(Layer::PortalGhost, &actor.sprite, offset)
                    .at(actor.portal_position, actor.portal_angle, offset)
                    .flipped(facing_left),
            );
            canvas.draw(
                DrawCommand::new(Layer::PortalGhost, &arm.sprite, offset)
                    .at(arm.portal_position, arm.portal_angle, offset)
                    .flipped(facing_left),
            );
        }

        canvas.draw(DrawCommand::level(Layer::Foreground, self.size, offset));

        for index in 0..2 {
            let aperture = self.portals.aperture(index);
            if aperture.visible {
                canvas.draw(DrawCommand::new(Layer::Aperture, aperture, offset).with_frame(index));
            }
        }
    }

    // -----------------------------------------------------------------------------------------------------------------

    /// Delivers queued messages. Handling a message may queue more, so this repeats until
    /// the queue is empty or MAX_DISPATCH_ROUNDS rounds have run.
    fn dispatch_messages(&mut self) {
        for _ in 0..MAX_DISPATCH_ROUNDS {
            if self.dispatcher.is_empty() {
                return;
            }
            let messages = self.dispatcher.drain();
            Dispatcher::dispatch(&messages, self);
        }

        if !self.dispatcher.is_empty() {
            let dropped = self.dispatcher.drain();
            warn!(
                "Level {} dropped {} messages after {} dispatch rounds, obstacles are signalling in a cycle",
                self.id,
                dropped.len(),
                MAX_DISPATCH_ROUNDS
            );
        }
    }

    fn update_checkpoints(&mut self) {
        while let Some(checkpoint) = self.checkpoints.get(self.checkpoint_index) {
            if !checkpoint.in_bounds(self.player.position()) {
                break;
            }
            self.checkpoint_index += 1;
            if self.checkpoint_index >= self.checkpoints.len() {
                self.complete();
            } else {
                info!(
                    "Level {} checkpoint {} reached at {:?}",
                    self.id,
                    self.checkpoint_index - 1,
                    self.player.position()
                );
                self.sounds.play_sound(Sounds::Checkpoint);
            }
        }
    }

    fn complete(&mut self) {
        self.sounds.play_sound(Sounds::ExitReached);
        self.player.set_immobile();
        self.status = LevelStatus::Complete;
        info!(
            "Level {} complete in {:.2}s with {} deaths",
            self.id, self.statistics.time_elapsed, self.statistics.deaths
        );
    }

    fn player_death(&mut self) {
        self.statistics.deaths += 1;
        let respawn = self
            .checkpoints
            .get(self.checkpoint_index - 1)
            .map(|c| c.location)
            .unwrap_or(self.checkpoints[0].location);
        info!(
            "Player died ({} deaths), respawning at {:?}",
            self.statistics.deaths, respawn
        );
        self.player.death_reset(respawn);
    }
}

impl MessageHandler for Level {
    fn handle_message(&mut self, message: &Message) {
        match message.event {
            Event::Signal => {
                let sender = match message.sender_entity_id {
                    Some(sender) => sender,
                    None => return,
                };
                match message.recipient_entity_id {
                    Some(recipient) => {
                        match self.obstacles.iter_mut().find(|o| o.id == recipient) {
                            Some(obstacle) => {
                                obstacle.react(sender, &mut self.dispatcher);
                            }
                            None => debug!("Signal from {} to unknown recipient {}", sender, recipient),
                        }
                    }
                    None => {
                        for obstacle in self.obstacles.iter_mut().filter(|o| o.id != sender) {
                            obstacle.react(sender, &mut self.dispatcher);
                        }
                    }
                }
            }
            Event::PlaySound(sound) => self.sounds.play_sound(sound),
            Event::PlayerDied => self.player_death(),
        }
    }
}

fn build_obstacle(
    data: &ObstacleData,
    player_id: EntityId,
    known_ids: &HashSet<EntityId>,
) -> Result<Obstacle> {
    if data.actions.is_empty() {
        bail!("Obstacle {} has no actions", data.id);
    }

    let reactions = data
        .actions
        .iter()
        .map(|action| {
            let source = match action.source {
                ReactionSource::Player => player_id,
                ReactionSource::Obstacle(id) if known_ids.contains(&id) => id,
                ReactionSource::Obstacle(id) => bail!("Action source {} is not an obstacle", id),
            };
            Ok(Reaction::new(source, action.state))
        })
        .collect::<Result<Vec<_>>>()?;

    let size = vec2(data.width, data.height);
    let obstacle = match &data.shape {
        ObstacleShape::Platform { speed, path } => Obstacle::platform(
            data.id,
            path.clone(),
            *speed,
            size,
            PlatformState::try_from(data.initial_state)?,
            reactions,
        )?,
        ObstacleShape::Switch { position } => Obstacle::switch(
            data.id,
            *position,
            size,
            SwitchState::try_from(data.initial_state)?,
            reactions,
        ),
        ObstacleShape::Door { position } => Obstacle::door(
            data.id,
            *position,
            size,
            DoorState::try_from(data.initial_state)?,
            reactions,
        ),
    };

    for reaction in &obstacle.reactions {
        obstacle
            .kind
            .validate_state(reaction.state)
            .with_context(|| format!("Action on source {} has an invalid state", reaction.source))?;
    }

    Ok(obstacle)
}
