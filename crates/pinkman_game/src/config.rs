use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::player::MotionConfig;

/// Tunables shared by the simulation and the view. Every field has a default,
/// so a config file only needs the values it overrides.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub fps: u32,
    pub player_speed: i32,
    pub gravity: f32,
    pub animation_delay: u32,
    pub fire_animation_delay: u32,
    pub viewport_width: i32,
    pub viewport_height: i32,
    pub scroll_area_width: i32,
    pub background_tile_width: i32,
    pub background_tile_height: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            player_speed: 5,
            gravity: 1.0,
            animation_delay: 3,
            fire_animation_delay: 3,
            viewport_width: 1000,
            viewport_height: 800,
            scroll_area_width: 200,
            background_tile_width: 64,
            background_tile_height: 64,
        }
    }
}

impl GameConfig {
    pub fn motion(&self) -> MotionConfig {
        MotionConfig {
            fps: self.fps,
            gravity: self.gravity,
            animation_delay: self.animation_delay,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.fps == 0 {
        return Err("Config validation failed: fps must be > 0".to_string());
    }
    if config.animation_delay == 0 || config.fire_animation_delay == 0 {
        return Err("Config validation failed: animation delays must be > 0".to_string());
    }
    if config.player_speed <= 0 {
        return Err("Config validation failed: player_speed must be > 0".to_string());
    }
    if config.gravity.is_nan() || config.gravity <= 0.0 {
        return Err("Config validation failed: gravity must be > 0".to_string());
    }
    if config.viewport_width <= 0 || config.viewport_height <= 0 {
        return Err("Config validation failed: viewport size must be > 0".to_string());
    }
    if config.background_tile_width <= 0 || config.background_tile_height <= 0 {
        return Err("Config validation failed: background tile size must be > 0".to_string());
    }
    if config.scroll_area_width < 0 || config.scroll_area_width * 2 > config.viewport_width {
        return Err(format!(
            "Config validation failed: scroll_area_width {} must fit twice inside viewport width {}",
            config.scroll_area_width, config.viewport_width
        ));
    }
    Ok(())
}
