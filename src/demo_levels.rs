use anyhow::{bail, Result};
use cgmath::*;

use crate::{
    checkpoint::Checkpoint,
    constants::{level::DEFAULT_GRAVITY, obstacle::*},
    level_data::{ActionData, LevelData, ObstacleData, ObstacleShape, ReactionSource},
    obstacles::{DoorState, PlatformState, SwitchState},
    surface::Surface,
    tile::Tile,
};

/// Number of built-in levels
pub const DEMO_LEVEL_COUNT: u32 = 2;

/// Character-height lift applied to checkpoint anchors so the player spawns just above the floor
const SPAWN_LIFT: f32 = 134.0;

/// Returns one of the built-in levels, suitable for play or export to a level document.
pub fn demo_level(index: u32) -> Result<LevelData> {
    match index {
        0 => Ok(level_0()),
        1 => Ok(level_1()),
        _ => bail!(
            "No built-in level {}, there are {}",
            index,
            DEMO_LEVEL_COUNT
        ),
    }
}

fn checkpoint(x: f32, y: f32, bound_x: f32, bound_y: f32, quadrant: u8) -> Checkpoint {
    Checkpoint {
        location: point2(x, y - SPAWN_LIFT),
        bound: point2(bound_x, bound_y),
        quadrant,
    }
}

fn tile(x: f32, y: f32, width: f32, height: f32, surface: Surface) -> Tile {
    Tile::from_xywh(x, y, width, height, surface)
}

/// Thin walls around the level: lethal floor, absorbing ceiling and sides.
fn boundaries(width: f32, height: f32) -> Vec<Tile> {
    vec![
        tile(0.0, height - 2.0, width, 2.0, Surface::Death),
        tile(0.0, 0.0, width, 2.0, Surface::Absorbs),
        tile(0.0, 0.0, 2.0, height, Surface::Absorbs),
        tile(width - 2.0, 0.0, 2.0, height, Surface::Absorbs),
    ]
}

/// The tutorial: a switch at the far right opens the door in the upper passage and stops
/// the lift that otherwise carries the player up to it.
fn level_0() -> LevelData {
    let (width, height) = (2000.0, 1500.0);
    let mut tiles = vec![
        tile(778.0, 0.0, 186.0, 281.0, Surface::Absorbs),
        tile(964.0, 0.0, 420.0, 195.0, Surface::Normal),
        tile(0.0, 473.0, 301.0, 151.0, Surface::Absorbs),
        tile(301.0, 473.0, 411.0, 151.0, Surface::Normal),
        tile(711.0, 473.0, 569.0, 151.0, Surface::Amplifies),
        tile(0.0, 1136.0, 216.0, 364.0, Surface::Absorbs),
        tile(216.0, 1136.0, 240.0, 364.0, Surface::Normal),
        tile(456.0, 1136.0, 216.0, 364.0, Surface::Absorbs),
        tile(672.0, 1136.0, 159.0, 364.0, Surface::Normal),
        tile(0.0, 966.0, 216.0, 170.0, Surface::Normal),
        tile(456.0, 966.0, 215.0, 170.0, Surface::Normal),
        tile(936.0, 1079.0, 485.0, 421.0, Surface::Reflects),
        tile(1718.0, 915.0, 282.0, 585.0, Surface::Absorbs),
    ];
    tiles.extend(boundaries(width, height));

    let switch_id = 1;
    let obstacles = vec![
        ObstacleData {
            id: switch_id,
            width: SWITCH_SIZE.0,
            height: SWITCH_SIZE.1,
            initial_state: SwitchState::Active as i32,
            actions: vec![ActionData {
                source: ReactionSource::Player,
                state: SwitchState::Pressed as i32,
            }],
            shape: ObstacleShape::Switch {
                position: point2(1980.0, 815.0),
            },
        },
        ObstacleData {
            id: 2,
            width: PLATFORM_SIZE.0,
            height: PLATFORM_SIZE.1,
            initial_state: PlatformState::Forward as i32,
            actions: vec![ActionData {
                source: ReactionSource::Obstacle(switch_id),
                state: PlatformState::Stationary as i32,
            }],
            shape: ObstacleShape::Platform {
                speed: 50.0,
                path: vec![
                    point2(1435.0, 1078.0),
                    point2(1607.0, 1078.0),
                    point2(1607.0, 473.0),
                    point2(1286.0, 473.0),
                ],
            },
        },
        ObstacleData {
            id: 3,
            width: DOOR_WIDTH,
            height: DOOR_HEIGHT,
            initial_state: DoorState::Stationary as i32,
            actions: vec![ActionData {
                source: ReactionSource::Obstacle(switch_id),
                state: DoorState::Opening as i32,
            }],
            shape: ObstacleShape::Door {
                position: point2(778.0, 282.0),
            },
        },
    ];

    LevelData {
        id: 0,
        gravity: DEFAULT_GRAVITY,
        width,
        height,
        checkpoints: vec![
            checkpoint(270.0, 1136.0, 0.0, 0.0, 4),
            checkpoint(680.0, 1136.0, 680.0, 1024.0, 1),
            checkpoint(1180.0, 1079.0, 1180.0, 1500.0, 1),
            checkpoint(1165.0, 473.0, 1275.0, 473.0, 2),
            checkpoint(75.0, 473.0, 100.0, 473.0, 2),
        ],
        tiles,
        obstacles,
    }
}

/// Portal practice: a pit between ledges, with an amplifying ceiling and a reflecting wall.
fn level_1() -> LevelData {
    let (width, height) = (1280.0, 1024.0);
    let mut tiles = vec![
        tile(0.0, 0.0, 301.0, 147.0, Surface::Absorbs),
        tile(301.0, 0.0, 361.0, 147.0, Surface::Normal),
        tile(662.0, 0.0, 49.0, 4.0, Surface::Death),
        tile(711.0, 0.0, 569.0, 147.0, Surface::Amplifies),
        tile(0.0, 490.0, 215.0, 174.0, Surface::Normal),
        tile(0.0, 664.0, 215.0, 363.0, Surface::Normal),
        tile(215.0, 661.0, 243.0, 363.0, Surface::Normal),
        tile(936.0, 603.0, 344.0, 421.0, Surface::Reflects),
        tile(458.0, 490.0, 215.0, 174.0, Surface::Normal),
        tile(458.0, 664.0, 215.0, 343.0, Surface::Normal),
        tile(673.0, 661.0, 157.0, 363.0, Surface::Normal),
    ];
    tiles.extend(boundaries(width, height));

    LevelData {
        id: 1,
        gravity: DEFAULT_GRAVITY,
        width,
        height,
        checkpoints: vec![
            checkpoint(270.0, 661.0, 0.0, 0.0, 4),
            checkpoint(680.0, 661.0, 680.0, 1024.0, 1),
            checkpoint(1180.0, 661.0, 1180.0, 602.0, 1),
        ],
        tiles,
        obstacles: vec![],
    }
}

#[cfg(test)]
mod demo_levels_tests {
    use super::*;
    use crate::{
        audio::SilentAudio,
        character::CharacterState,
        constants::level::PLAYER_ID,
        input::InputState,
        level::Level,
    };

    #[test]
    fn every_demo_level_builds() {
        for index in 0..DEMO_LEVEL_COUNT {
            let data = demo_level(index).unwrap();
            assert_eq!(data.id, index);
            assert!(Level::new(&data, PLAYER_ID, Box::new(SilentAudio)).is_ok());
        }
        assert!(demo_level(DEMO_LEVEL_COUNT).is_err());
    }

    #[test]
    fn demo_levels_survive_export() {
        for index in 0..DEMO_LEVEL_COUNT {
            let data = demo_level(index).unwrap();
            let mut buffer = vec![];
            data.write(&mut buffer).unwrap();
            assert_eq!(LevelData::parse(buffer.as_slice()).unwrap(), data);
        }
    }

    #[test]
    fn player_drops_onto_the_first_floor() {
        let data = demo_level(0).unwrap();
        let mut level = Level::new(&data, PLAYER_ID, Box::new(SilentAudio)).unwrap();
        let input = InputState::default();
        for _ in 0..120 {
            level.update(1.0 / 60.0, &input);
        }
        assert_eq!(level.player().state(), CharacterState::Ground);
        assert_eq!(level.player().position(), point2(270.0, 1136.0 - 67.0 + 1.0));
        assert_eq!(level.statistics().deaths, 0);
        assert_eq!(level.checkpoint_index(), 1);
    }
}
