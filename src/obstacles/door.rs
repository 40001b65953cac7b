use anyhow::{bail, Result};
use cgmath::*;
use std::convert::TryFrom;

use crate::{constants::obstacle::DOOR_SPEED, sprite::Sprite, util::clamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorState {
    Closing = -1,
    Stationary = 0,
    Opening = 1,
}

impl TryFrom<i32> for DoorState {
    type Error = anyhow::Error;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            -1 => DoorState::Closing,
            0 => DoorState::Stationary,
            1 => DoorState::Opening,
            _ => bail!("{} is not a valid door state", value),
        })
    }
}

/// A door slides open by shrinking toward its bottom edge. The sprite's source height is
/// the current opening height; the bottom edge stays put while the top edge travels.
#[derive(Clone, Debug)]
pub struct Door {
    pub state: DoorState,
    pub initial_state: DoorState,
    pub full_height: f32,
}

impl Door {
    pub fn new(state: DoorState, full_height: f32) -> Self {
        Self {
            state,
            initial_state: state,
            full_height,
        }
    }

    pub fn height(&self, sprite: &Sprite) -> f32 {
        sprite.source_size.y
    }

    pub fn update(&mut self, sprite: &mut Sprite, dt: f32) {
        let vy = (self.state as i32) as f32 * DOOR_SPEED;
        let height = sprite.source_size.y;
        let new_height = clamp(height - vy * dt, 0.0, self.full_height);

        sprite.position.y += height - new_height;
        sprite.source_size.y = new_height;
        sprite.velocity = vec2(0.0, vy);

        let stopped = match self.state {
            DoorState::Opening => new_height <= 0.0,
            DoorState::Closing => new_height >= self.full_height,
            DoorState::Stationary => false,
        };
        if stopped {
            self.state = DoorState::Stationary;
            sprite.velocity = Vector2::zero();
        }
    }

    pub fn velocity(&self, sprite: &Sprite) -> Vector2<f32> {
        sprite.velocity
    }

    pub fn reset(&mut self, sprite: &mut Sprite) {
        self.state = self.initial_state;
        sprite.reset();
        sprite.source_size.y = self.full_height;
    }
}

#[cfg(test)]
mod door_tests {
    use super::*;

    fn make(state: DoorState) -> (Door, Sprite) {
        let sprite = Sprite::new(point2(10.0, 100.0), vec2(20.0, 200.0), vec2(0.0, 0.0));
        (Door::new(state, 200.0), sprite)
    }

    #[test]
    fn opening_door_stops_at_zero_height() {
        let (mut door, mut sprite) = make(DoorState::Opening);
        let bottom = sprite.position.y + sprite.source_size.y;
        let mut frames = 0;
        while door.state == DoorState::Opening {
            door.update(&mut sprite, 0.1);
            let height = door.height(&sprite);
            assert!(height >= 0.0 && height <= 200.0);
            // bottom edge stays put
            assert!((sprite.position.y + height - bottom).abs() < 1e-3);
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(door.height(&sprite), 0.0);
        assert_eq!(door.state, DoorState::Stationary);
        assert_eq!(door.velocity(&sprite), vec2(0.0, 0.0));
    }

    #[test]
    fn closing_door_stops_at_full_height() {
        let (mut door, mut sprite) = make(DoorState::Stationary);
        sprite.source_size.y = 20.0;
        door.state = DoorState::Closing;
        for _ in 0..100 {
            door.update(&mut sprite, 0.5);
            assert!(door.height(&sprite) <= 200.0);
        }
        assert_eq!(door.height(&sprite), 200.0);
        assert_eq!(door.state, DoorState::Stationary);
    }

    #[test]
    fn huge_step_clamps_in_one_frame() {
        let (mut door, mut sprite) = make(DoorState::Opening);
        door.update(&mut sprite, 1000.0);
        assert_eq!(door.height(&sprite), 0.0);
        assert_eq!(door.state, DoorState::Stationary);
    }

    #[test]
    fn reset_restores_full_height() {
        let (mut door, mut sprite) = make(DoorState::Opening);
        door.update(&mut sprite, 1.0);
        door.reset(&mut sprite);
        assert_eq!(door.height(&sprite), 200.0);
        assert_eq!(sprite.position, point2(10.0, 100.0));
        assert_eq!(door.state, DoorState::Opening);
    }
}
