pub mod actor;
pub mod audio;
pub mod camera;
pub mod character;
pub mod checkpoint;
pub mod constants;
pub mod demo_levels;
pub mod draw;
pub mod event_dispatch;
pub mod events;
pub mod geom;
pub mod input;
pub mod level;
pub mod level_data;
pub mod obstacles;
pub mod portal;
pub mod projectile;
pub mod sprite;
pub mod surface;
pub mod tile;
pub mod util;
