//! Pink Man -- headless driver for the platformer simulation.
//!
//! There is no window here. A recorded replay stands in for the keyboard and a
//! `DrawRecorder` stands in for the screen, so a run exercises the same frame
//! loop a windowed build would:
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed the accumulator
//!   2. `while should_step()` -- press the next replay keys, step the world
//!   3. Draw the world in paint order and present
//!   4. Sleep until the next fixed step is due
//!
//! Config, level, sprites and replay are all read once at startup. A missing
//! config or level falls back to the built-in defaults; a file that exists but
//! fails validation is fatal.

mod animation;
mod collision;
mod config;
mod controller;
mod fire;
mod level;
mod obstacle;
mod player;
mod render;
mod replay;
mod sprites;
mod world;

use std::path::{Path, PathBuf};

use config::{load_config_from_path, GameConfig};
use controller::ControllerInput;
use level::{default_level, load_level_from_path, LevelFile};
use pinkman_core::input::InputState;
use pinkman_core::time::TimeState;
use render::DrawRecorder;
use replay::{load_replay_from_path, press_keys};
use sprites::{SpritePaths, SpriteTables};
use world::World;

const CONFIG_PATH: &str = "assets/config.json";
const LEVEL_PATH: &str = "assets/levels/level1.json";
const DEFAULT_REPLAY_PATH: &str = "assets/replays/demo.json";
const PLAYER_SPRITE_DIR: &str = "assets/MainCharacters/PinkMan";
const PLAYER_SPRITE_MANIFEST: &str = "assets/sprites/player.json";
const FIRE_SPRITE_DIR: &str = "assets/Traps/Fire";
const FIRE_SPRITE_MANIFEST: &str = "assets/sprites/fire.json";

fn load_config(path: &Path) -> GameConfig {
    if !path.exists() {
        log::warn!("Config '{}' not found. Using defaults.", path.display());
        return GameConfig::default();
    }
    load_config_from_path(path)
        .unwrap_or_else(|err| panic!("Failed to load config '{}': {}", path.display(), err))
}

fn load_level(path: &Path) -> LevelFile {
    if !path.exists() {
        log::warn!("Level '{}' not found. Using the starter level.", path.display());
        return default_level();
    }
    load_level_from_path(path)
        .unwrap_or_else(|err| panic!("Failed to load level '{}': {}", path.display(), err))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Pink Man starting...");

    let replay_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPLAY_PATH));

    let config = load_config(Path::new(CONFIG_PATH));
    let level = load_level(Path::new(LEVEL_PATH));
    let sprites = SpriteTables::load(&SpritePaths {
        player_dir: Path::new(PLAYER_SPRITE_DIR),
        player_manifest: Path::new(PLAYER_SPRITE_MANIFEST),
        fire_dir: Path::new(FIRE_SPRITE_DIR),
        fire_manifest: Path::new(FIRE_SPRITE_MANIFEST),
    })
    .unwrap_or_else(|err| {
        log::error!("Failed to load sprites: {err}. Using built-in frames.");
        SpriteTables::builtin().unwrap_or_else(|err| panic!("Built-in sprites are invalid: {err}"))
    });
    let replay = load_replay_from_path(&replay_path).unwrap_or_else(|err| {
        panic!(
            "Failed to load replay '{}': {}",
            replay_path.display(),
            err
        )
    });

    let mut world = World::new(&level, &config, &sprites)
        .unwrap_or_else(|err| panic!("Failed to build level '{}': {}", level.level_id, err));
    let inputs: Vec<ControllerInput> = replay.expanded_inputs();
    log::info!(
        "Replaying {} frames from '{}' at {} fps",
        inputs.len(),
        replay_path.display(),
        config.fps
    );

    let mut time = TimeState::new(config.fps);
    let mut keys = InputState::new();
    let mut recorder = DrawRecorder::default();
    let mut next_input = inputs.iter();
    let mut hazard_frames = 0u64;

    'frames: loop {
        time.begin_frame();
        while time.should_step() {
            let Some(input) = next_input.next() else {
                break 'frames;
            };
            press_keys(*input, &mut keys);
            let report = world.step(ControllerInput::from_source(&keys), &sprites);
            keys.end_frame();
            if report.hazard_hit {
                hazard_frames += 1;
            }
        }
        world.draw(&mut recorder);
        std::thread::sleep(time.until_next_step());
    }

    log::info!(
        "Replay of '{}' finished after {} frames ({} presented): player at ({}, {}), scroll {}, {} hazard contacts",
        world.level_id,
        world.frame,
        recorder.frames_presented,
        world.player.rect.x,
        world.player.rect.y,
        world.scroll.offset_x,
        hazard_frames
    );
}
