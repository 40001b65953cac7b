use anyhow::{bail, Result};
use cgmath::*;
use std::convert::TryFrom;

use crate::{sprite::Sprite, util::normalize_or_zero};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformState {
    Stationary = 0,
    Forward = 1,
    Reverse = 2,
    Circuit = 3,
    CircuitReverse = 4,
}

impl TryFrom<i32> for PlatformState {
    type Error = anyhow::Error;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => PlatformState::Stationary,
            1 => PlatformState::Forward,
            2 => PlatformState::Reverse,
            3 => PlatformState::Circuit,
            4 => PlatformState::CircuitReverse,
            _ => bail!("{} is not a valid platform state", value),
        })
    }
}

/// A platform travelling along a path of waypoints. The sprite's position is the
/// platform's top-left corner and sits exactly on a waypoint whenever one is reached.
#[derive(Clone, Debug)]
pub struct Platform {
    pub path: Vec<Point2<f32>>,
    pub speed: f32,
    pub state: PlatformState,
    pub initial_state: PlatformState,
    current_index: usize,
}

impl Platform {
    pub fn new(path: Vec<Point2<f32>>, speed: f32, state: PlatformState) -> Result<Self> {
        if path.len() < 2 {
            bail!(
                "A platform path needs at least two waypoints, got {}",
                path.len()
            );
        }
        Ok(Self {
            path,
            speed,
            state,
            initial_state: state,
            current_index: 0,
        })
    }

    /// Index of the waypoint the platform is currently heading toward
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn update(&mut self, sprite: &mut Sprite, dt: f32) {
        if self.state == PlatformState::Stationary {
            return;
        }

        sprite.update(dt);

        let target = self.path[self.current_index];
        if (target - sprite.position).dot(sprite.velocity) <= 0.0 {
            sprite.position = target;
            self.advance();
            sprite.velocity =
                normalize_or_zero(self.path[self.current_index] - sprite.position) * self.speed;
        }
    }

    fn advance(&mut self) {
        let count = self.path.len();
        match self.state {
            PlatformState::Circuit => {
                self.current_index = (self.current_index + 1) % count;
            }
            PlatformState::CircuitReverse => {
                self.current_index = (self.current_index + count - 1) % count;
            }
            PlatformState::Reverse => {
                if self.current_index == 0 {
                    self.current_index = 1;
                    self.state = PlatformState::Forward;
                } else {
                    self.current_index -= 1;
                }
            }
            PlatformState::Forward => {
                self.current_index += 1;
                if self.current_index >= count {
                    self.current_index -= 2;
                    self.state = PlatformState::Reverse;
                }
            }
            PlatformState::Stationary => {}
        }
    }

    /// A stopped platform keeps its heading for when it resumes, but imparts no drift.
    pub fn velocity(&self, sprite: &Sprite) -> Vector2<f32> {
        if self.state == PlatformState::Stationary {
            Vector2::zero()
        } else {
            sprite.velocity
        }
    }

    pub fn reset(&mut self, sprite: &mut Sprite) {
        self.state = self.initial_state;
        self.current_index = 0;
        sprite.reset();
        sprite.position = self.path[0];
    }
}

#[cfg(test)]
mod platform_tests {
    use super::*;

    fn make(path: Vec<Point2<f32>>, state: PlatformState) -> (Platform, Sprite) {
        let sprite = Sprite::new(path[0], vec2(160.0, 20.0), vec2(0.0, 0.0));
        (Platform::new(path, 50.0, state).unwrap(), sprite)
    }

    fn three_point_path() -> Vec<Point2<f32>> {
        vec![point2(0.0, 0.0), point2(100.0, 0.0), point2(100.0, 100.0)]
    }

    #[test]
    fn path_needs_two_waypoints() {
        assert!(Platform::new(vec![point2(0.0, 0.0)], 10.0, PlatformState::Forward).is_err());
    }

    #[test]
    fn forward_bounces_at_last_index() {
        let (mut platform, mut sprite) = make(three_point_path(), PlatformState::Forward);
        let mut saw_reverse_at = None;

        for frame in 0..2000 {
            let was_forward = platform.state == PlatformState::Forward;
            let previous_index = platform.current_index();
            platform.update(&mut sprite, 1.0 / 60.0);
            assert!(platform.current_index() < 3);

            if was_forward && platform.state == PlatformState::Reverse {
                // only flips after arriving at the final waypoint
                assert_eq!(previous_index, 2);
                assert_eq!(sprite.position, point2(100.0, 100.0));
                assert_eq!(platform.current_index(), 1);
                saw_reverse_at.get_or_insert(frame);
            }
        }
        assert!(saw_reverse_at.is_some());
    }

    #[test]
    fn reverse_bounces_to_forward_at_first_index() {
        let (mut platform, mut sprite) = make(three_point_path(), PlatformState::Reverse);
        // first update snaps to waypoint 0 and immediately bounces
        platform.update(&mut sprite, 1.0 / 60.0);
        assert_eq!(platform.state, PlatformState::Forward);
        assert_eq!(platform.current_index(), 1);
        assert_eq!(sprite.velocity, vec2(50.0, 0.0));
    }

    #[test]
    fn circuit_reverse_wraps_to_last_waypoint() {
        let (mut platform, mut sprite) = make(three_point_path(), PlatformState::CircuitReverse);
        platform.update(&mut sprite, 1.0 / 60.0);
        assert_eq!(platform.current_index(), 2);

        let (mut platform, mut sprite) = make(three_point_path(), PlatformState::Circuit);
        let mut visited = vec![];
        for _ in 0..2000 {
            platform.update(&mut sprite, 1.0 / 60.0);
            if visited.last() != Some(&platform.current_index()) {
                visited.push(platform.current_index());
            }
        }
        assert_eq!(&visited[0..5], &[1, 2, 0, 1, 2]);
    }

    #[test]
    fn stationary_platform_does_not_move_or_drift() {
        let (mut platform, mut sprite) = make(three_point_path(), PlatformState::Forward);
        for _ in 0..10 {
            platform.update(&mut sprite, 1.0 / 60.0);
        }
        let position = sprite.position;
        platform.state = PlatformState::Stationary;
        platform.update(&mut sprite, 1.0);
        assert_eq!(sprite.position, position);
        assert_eq!(platform.velocity(&sprite), vec2(0.0, 0.0));
    }

    #[test]
    fn reset_returns_to_first_waypoint() {
        let (mut platform, mut sprite) = make(three_point_path(), PlatformState::Forward);
        for _ in 0..100 {
            platform.update(&mut sprite, 1.0 / 60.0);
        }
        platform.state = PlatformState::Stationary;
        platform.reset(&mut sprite);
        assert_eq!(platform.state, PlatformState::Forward);
        assert_eq!(platform.current_index(), 0);
        assert_eq!(sprite.position, point2(0.0, 0.0));
    }
}
