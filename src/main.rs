use anyhow::{Context, Result};
use cgmath::*;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;
use structopt::StructOpt;

use portal_platformer::{
    audio::LoggingAudio,
    constants::{camera::DEFAULT_VIEWPORT, level::PLAYER_ID},
    demo_levels,
    draw::DrawCommand,
    input::{Action, InputState},
    level::{Level, LevelStatus},
    level_data::LevelData,
};

// ---------------------------------------------------------------------------------------------------------------------

#[derive(StructOpt, Debug)]
#[structopt(name = "portal-platformer", about = "Headless portal platformer runner")]
struct Options {
    /// Level document to load. When absent a built-in level is used.
    #[structopt(short, long, parse(from_os_str))]
    level: Option<PathBuf>,

    /// Index of the built-in level to use when no level document is given
    #[structopt(short, long, default_value = "0")]
    demo: u32,

    /// Write the level document to this path and exit
    #[structopt(short, long, parse(from_os_str))]
    export: Option<PathBuf>,

    /// Simulated seconds to run
    #[structopt(short, long, default_value = "30")]
    seconds: f32,

    /// Fixed update rate
    #[structopt(long, default_value = "60")]
    steps_per_second: u32,

    /// Seed for the random input driver
    #[structopt(long, default_value = "0")]
    seed: u64,

    #[structopt(long, default_value = "1280")]
    viewport_width: f32,

    #[structopt(long, default_value = "720")]
    viewport_height: f32,
}

// ---------------------------------------------------------------------------------------------------------------------

/// Mashes buttons. Holds a walking direction for a while, and now and then jumps,
/// ducks, interacts or fires at a random spot in the level.
struct InputDriver {
    rng: StdRng,
    walk: Option<Action>,
    walk_steps: u32,
}

impl InputDriver {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            walk: None,
            walk_steps: 0,
        }
    }

    fn step(&mut self, input: &mut InputState, level_size: Vector2<f32>) {
        if self.walk_steps == 0 {
            self.walk = match self.rng.gen_range(0..3) {
                0 => Some(Action::MoveLeft),
                1 => Some(Action::MoveRight),
                _ => None,
            };
            self.walk_steps = self.rng.gen_range(30..180);
        }
        self.walk_steps -= 1;

        input.process_action(Action::MoveLeft, self.walk == Some(Action::MoveLeft));
        input.process_action(Action::MoveRight, self.walk == Some(Action::MoveRight));
        input.process_action(Action::Jump, self.rng.gen_bool(0.02));
        input.process_action(Action::Duck, self.rng.gen_bool(0.01));
        input.process_action(Action::Interact, self.rng.gen_bool(0.05));

        let fire_primary = self.rng.gen_bool(0.01);
        let fire_secondary = self.rng.gen_bool(0.01);
        if fire_primary || fire_secondary {
            input.set_aim(point2(
                self.rng.gen_range(0.0..level_size.x),
                self.rng.gen_range(0.0..level_size.y),
            ));
        }
        input.process_action(Action::FirePrimary, fire_primary);
        input.process_action(Action::FireSecondary, fire_secondary);
    }
}

// ---------------------------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Options::from_args();

    let data = match &opt.level {
        Some(path) => LevelData::from_file(path)?,
        None => demo_levels::demo_level(opt.demo)?,
    };

    if let Some(path) = &opt.export {
        data.save(path)
            .with_context(|| format!("Unable to export level {}", data.id))?;
        info!("Exported level {} to {}", data.id, path.display());
        return Ok(());
    }

    let mut level = Level::new(&data, PLAYER_ID, Box::new(LoggingAudio::default()))?;
    let viewport = if opt.viewport_width > 0.0 && opt.viewport_height > 0.0 {
        vec2(opt.viewport_width, opt.viewport_height)
    } else {
        vec2(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1)
    };
    level.set_viewport(viewport);

    let steps_per_second = opt.steps_per_second.max(1);
    let dt = 1.0 / steps_per_second as f32;
    let steps = (opt.seconds.max(0.0) * steps_per_second as f32) as u32;

    let mut input = InputState::default();
    let mut driver = InputDriver::new(opt.seed);
    let mut draw_list: Vec<DrawCommand> = vec![];

    for step in 0..steps {
        driver.step(&mut input, level.size());
        let status = level.update(dt, &input);
        input.update();

        if step % steps_per_second == 0 {
            draw_list.clear();
            level.draw(&mut draw_list);
            info!(
                "t={:.1}s player at {:?} ({:?}), portals {:?}, {} draw commands",
                level.statistics().time_elapsed,
                level.player().position(),
                level.player().state(),
                level.portals().state(),
                draw_list.len()
            );
        }

        if status == LevelStatus::Complete {
            break;
        }
    }

    let statistics = level.statistics();
    info!(
        "Finished level {} ({:?}): {:.2}s elapsed, score {}, {} deaths",
        level.id(),
        level.status(),
        statistics.time_elapsed,
        statistics.score(),
        statistics.deaths
    );

    Ok(())
}
