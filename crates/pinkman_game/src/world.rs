use glam::IVec2;
use pinkman_core::rect::Rect;

use crate::collision::CollisionReport;
use crate::config::GameConfig;
use crate::controller::{step_player, ControllerInput};
use crate::fire::Fire;
use crate::level::{build_obstacles, fire_positions, LevelFile};
use crate::obstacle::{Collider, Obstacle};
use crate::player::Player;
use crate::render::{background_tiles, Renderer, ScrollView};
use crate::sprites::SpriteTables;

/// Everything one level needs between frames.
pub struct World {
    pub level_id: String,
    pub obstacles: Vec<Obstacle>,
    pub fires: Vec<Fire>,
    pub player: Player,
    pub scroll: ScrollView,
    pub background: Vec<IVec2>,
    pub player_speed: i32,
    pub frame: u64,
}

impl World {
    pub fn new(level: &LevelFile, config: &GameConfig, sprites: &SpriteTables) -> Result<Self, String> {
        sprites.validate()?;

        let obstacles = build_obstacles(level);
        let fires: Vec<Fire> = fire_positions(level)
            .into_iter()
            .map(|position| {
                let mut fire = Fire::new(position, config.fire_animation_delay);
                fire.on();
                fire
            })
            .collect();

        let start = level.player_start;
        let mut player = Player::new(
            Rect::new(start.x, start.y, start.width, start.height),
            config.motion(),
        );
        player.settle_sprite(&sprites.player);

        log::info!(
            "Level '{}' built: {} obstacles, {} fires, player at ({}, {})",
            level.level_id,
            obstacles.len(),
            fires.len(),
            start.x,
            start.y
        );

        Ok(Self {
            level_id: level.level_id.clone(),
            obstacles,
            fires,
            player,
            scroll: ScrollView::new(config.viewport_width, config.scroll_area_width),
            background: background_tiles(
                IVec2::new(config.viewport_width, config.viewport_height),
                IVec2::new(config.background_tile_width, config.background_tile_height),
            ),
            player_speed: config.player_speed,
            frame: 0,
        })
    }

    /// One logical frame: animate the fires, run the player pipeline against
    /// every obstacle and fire, then let the view follow.
    pub fn step(&mut self, input: ControllerInput, sprites: &SpriteTables) -> CollisionReport {
        for fire in &mut self.fires {
            fire.tick(&sprites.fire);
        }

        let colliders: Vec<&dyn Collider> = self
            .obstacles
            .iter()
            .map(|o| o as &dyn Collider)
            .chain(self.fires.iter().map(|f| f as &dyn Collider))
            .collect();
        let report = step_player(
            &mut self.player,
            input,
            self.player_speed,
            &colliders,
            &sprites.player,
        );

        self.scroll.follow(self.player.rect, self.player.vel_x);
        self.frame += 1;
        report
    }

    /// Paint order: background, obstacles, fires, player.
    pub fn draw(&self, renderer: &mut impl Renderer) {
        for tile in &self.background {
            renderer.draw_tile(*tile);
        }
        for obstacle in &self.obstacles {
            renderer.blit(&obstacle.sprite, self.scroll.to_screen(obstacle.rect.topleft()));
        }
        for fire in &self.fires {
            renderer.blit(&fire.sprite, self.scroll.to_screen(fire.rect.topleft()));
        }
        if let Some(sprite) = &self.player.sprite {
            renderer.blit(sprite, self.scroll.to_screen(self.player.rect.topleft()));
        }
        renderer.present();
    }
}
