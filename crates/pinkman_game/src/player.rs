//! The player entity and its motion rules.
//!
//! Motion is frame-stepped with no notion of seconds: velocities are pixels
//! per tick and gravity ramps with the number of ticks spent airborne. The
//! ramp is `min(1, fall_count / fps * gravity)` added to the vertical velocity
//! each tick, so the added acceleration tops out at one pixel per tick.
//!
//! Landing, head bumps and hits are driven from outside by the collision
//! resolver; this module only applies them.

use std::sync::Arc;

use pinkman_core::mask::Mask;
use pinkman_core::rect::Rect;
use pinkman_core::sprites::{frame_index, SpriteCatalog, SpriteRef};

use crate::animation::{select_animation, sheet_key, AnimationKind, MotionStatus};

/// Launch speed of a jump, in multiples of gravity.
pub const JUMP_MULTIPLIER: f32 = 8.0;
/// Ground jump plus one air jump.
pub const MAX_JUMPS: u8 = 2;
/// How long a hit lasts, in seconds worth of ticks.
pub const HIT_SECONDS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    pub fps: u32,
    pub gravity: f32,
    pub animation_delay: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            gravity: 1.0,
            animation_delay: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    pub vel_x: f32,
    pub vel_y: f32,
    pub facing: Facing,
    pub animation_count: u32,
    pub fall_count: u32,
    pub jump_count: u8,
    pub hit: bool,
    pub hit_count: u32,
    pub sprite: Option<SpriteRef>,
    mask: Arc<Mask>,
    pub config: MotionConfig,
}

impl Player {
    /// A player at rest, facing left, with a solid mask covering `rect` until
    /// the first sprite is selected.
    pub fn new(rect: Rect, config: MotionConfig) -> Self {
        Self {
            rect,
            vel_x: 0.0,
            vel_y: 0.0,
            facing: Facing::Left,
            animation_count: 0,
            fall_count: 0,
            jump_count: 0,
            hit: false,
            hit_count: 0,
            sprite: None,
            mask: Arc::new(Mask::full(rect.w as u32, rect.h as u32)),
            config,
        }
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.rect.translate(dx, dy);
    }

    pub fn move_left(&mut self, speed: f32) {
        self.vel_x = -speed;
        if self.facing != Facing::Left {
            self.facing = Facing::Left;
            self.animation_count = 0;
        }
    }

    pub fn move_right(&mut self, speed: f32) {
        self.vel_x = speed;
        if self.facing != Facing::Right {
            self.facing = Facing::Right;
            self.animation_count = 0;
        }
    }

    pub fn can_jump(&self) -> bool {
        self.jump_count < MAX_JUMPS
    }

    /// Launch upward. Only the first jump restarts the fall ramp, so an air
    /// jump keeps accumulating gravity where it left off. Returns false and
    /// changes nothing once both jumps are spent.
    pub fn jump(&mut self) -> bool {
        if !self.can_jump() {
            log::debug!("Jump refused: {} jumps already used", self.jump_count);
            return false;
        }
        self.vel_y = -self.config.gravity * JUMP_MULTIPLIER;
        self.animation_count = 0;
        self.jump_count += 1;
        if self.jump_count == 1 {
            self.fall_count = 0;
        }
        log::debug!("Jump {} at ({}, {})", self.jump_count, self.rect.x, self.rect.y);
        true
    }

    pub fn land(&mut self) {
        self.fall_count = 0;
        self.vel_y = 0.0;
        self.jump_count = 0;
    }

    pub fn hit_head(&mut self) {
        self.vel_y = -self.vel_y;
    }

    /// Enter (or restart) the hit state.
    pub fn make_hit(&mut self) {
        if !self.hit {
            log::info!("Player hit at ({}, {})", self.rect.x, self.rect.y);
        }
        self.hit = true;
        self.hit_count = 0;
    }

    pub fn hit_frames(&self) -> u32 {
        self.config.fps * HIT_SECONDS
    }

    /// The gravity increment for the current tick.
    pub fn gravity_step(&self) -> f32 {
        (self.fall_count as f32 / self.config.fps as f32 * self.config.gravity).min(1.0)
    }

    /// One tick of motion: ramped gravity, position integration, hit timer.
    /// Fractional pixels are dropped when the new position is stored.
    pub fn tick(&mut self) {
        self.vel_y += self.gravity_step();
        self.rect.x = (self.rect.x as f32 + self.vel_x) as i32;
        self.rect.y = (self.rect.y as f32 + self.vel_y) as i32;

        if self.hit {
            self.hit_count += 1;
            if self.hit_count > self.hit_frames() {
                self.hit = false;
                self.hit_count = 0;
                log::debug!("Hit state cleared");
            }
        }

        self.fall_count += 1;
    }

    pub fn status(&self) -> MotionStatus {
        MotionStatus {
            vel_x: self.vel_x,
            vel_y: self.vel_y,
            jump_count: self.jump_count,
            hit: self.hit,
        }
    }

    /// Take on the first idle frame before the first tick, so the spawn box
    /// already has its drawn size. The feet stay where they were placed and
    /// the animation counter does not advance.
    ///
    /// # Panics
    /// If the catalog lacks the idle sheet for the current facing.
    pub fn settle_sprite(&mut self, catalog: &SpriteCatalog) {
        let key = sheet_key(AnimationKind::Idle, self.facing);
        let Some((sheet, frames)) = catalog.sequence(&key) else {
            panic!("player sprite catalog has no sheet '{key}'");
        };
        self.sprite = Some(SpriteRef {
            sheet: sheet.clone(),
            frame: 0,
        });
        self.mask = frames[0].clone();
        let bottom = self.rect.bottom();
        self.rect
            .resize(self.mask.width() as i32, self.mask.height() as i32);
        self.rect.set_bottom(bottom);
    }

    /// Pick this tick's sprite and adopt its mask and size. The counter
    /// advances on every call.
    ///
    /// # Panics
    /// If the catalog lacks the selected sheet. Catalogs are checked against
    /// `animation::required_player_sheets` before a player is simulated.
    pub fn update_sprite(&mut self, catalog: &SpriteCatalog) {
        let kind = select_animation(self.status(), self.config.gravity);
        let key = sheet_key(kind, self.facing);
        let Some((sheet, frames)) = catalog.sequence(&key) else {
            panic!("player sprite catalog has no sheet '{key}'");
        };
        let index = frame_index(self.animation_count, self.config.animation_delay, frames.len());
        self.sprite = Some(SpriteRef {
            sheet: sheet.clone(),
            frame: index,
        });
        self.mask = frames[index].clone();
        self.rect
            .resize(self.mask.width() as i32, self.mask.height() as i32);
        self.animation_count += 1;
    }
}
