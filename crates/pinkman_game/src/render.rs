//! The seam between the simulation and whatever draws it.
//!
//! The game never touches pixels. Each frame it walks the world in paint order
//! (background tiles, obstacles, the player) and hands screen-space positions to
//! a `Renderer`. A windowed backend blits textures; `DrawRecorder` just keeps
//! the calls, which is what the headless driver and the tests use.

use glam::IVec2;
use pinkman_core::rect::Rect;
use pinkman_core::sprites::SpriteRef;

pub trait Renderer {
    fn draw_tile(&mut self, position: IVec2);
    fn blit(&mut self, sprite: &SpriteRef, position: IVec2);
    fn present(&mut self);
}

/// Top-left corners of background tiles covering the viewport, with one
/// extra row and column so partial tiles at the edges are filled.
pub fn background_tiles(viewport: IVec2, tile: IVec2) -> Vec<IVec2> {
    let mut tiles = Vec::new();
    for i in 0..=viewport.x / tile.x {
        for j in 0..=viewport.y / tile.y {
            tiles.push(IVec2::new(i * tile.x, j * tile.y));
        }
    }
    tiles
}

/// Horizontal camera. It only scrolls when the player pushes into a margin
/// of `scroll_area_width` pixels at either edge of the viewport, and then by
/// exactly the player's horizontal velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollView {
    pub offset_x: i32,
    pub viewport_width: i32,
    pub scroll_area_width: i32,
}

impl ScrollView {
    pub fn new(viewport_width: i32, scroll_area_width: i32) -> Self {
        Self {
            offset_x: 0,
            viewport_width,
            scroll_area_width,
        }
    }

    pub fn follow(&mut self, target: Rect, vel_x: f32) {
        let pushing_right = target.right() - self.offset_x
            >= self.viewport_width - self.scroll_area_width
            && vel_x > 0.0;
        let pushing_left = target.left() - self.offset_x <= self.scroll_area_width && vel_x < 0.0;
        if pushing_right || pushing_left {
            self.offset_x += vel_x as i32;
        }
    }

    pub fn to_screen(&self, world: IVec2) -> IVec2 {
        IVec2::new(world.x - self.offset_x, world.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Tile(IVec2),
    Sprite { sprite: SpriteRef, position: IVec2 },
}

/// Keeps the calls of the frame being built and of the last presented frame.
#[derive(Debug, Default)]
pub struct DrawRecorder {
    pending: Vec<DrawCall>,
    pub last_frame: Vec<DrawCall>,
    pub frames_presented: u64,
}

impl Renderer for DrawRecorder {
    fn draw_tile(&mut self, position: IVec2) {
        self.pending.push(DrawCall::Tile(position));
    }

    fn blit(&mut self, sprite: &SpriteRef, position: IVec2) {
        self.pending.push(DrawCall::Sprite {
            sprite: sprite.clone(),
            position,
        });
    }

    fn present(&mut self) {
        self.frames_presented += 1;
        log::trace!(
            "Frame {} presented with {} draw calls",
            self.frames_presented,
            self.pending.len()
        );
        self.last_frame = std::mem::take(&mut self.pending);
    }
}
