use std::sync::Arc;

use glam::IVec2;
use pinkman_core::mask::Mask;
use pinkman_core::rect::Rect;
use pinkman_core::sprites::{frame_index, SpriteCatalog, SpriteRef};

use crate::level::FIRE_SIZE;
use crate::obstacle::{Collider, ObstacleKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireState {
    On,
    Off,
}

impl FireState {
    pub fn sheet(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

pub const FIRE_SHEETS: &[&str] = &["on", "off"];

/// An animated hazard fixed in place. Its mask follows the current frame, so
/// the flames only hurt where they are drawn.
#[derive(Debug, Clone)]
pub struct Fire {
    pub rect: Rect,
    pub state: FireState,
    pub animation_count: u32,
    pub delay: u32,
    pub sprite: SpriteRef,
    mask: Arc<Mask>,
}

impl Fire {
    /// A fire starts switched off.
    pub fn new(position: IVec2, delay: u32) -> Self {
        Self {
            rect: Rect::new(position.x, position.y, FIRE_SIZE.0 as i32, FIRE_SIZE.1 as i32),
            state: FireState::Off,
            animation_count: 0,
            delay,
            sprite: SpriteRef::new(FireState::Off.sheet(), 0),
            mask: Arc::new(Mask::full(FIRE_SIZE.0, FIRE_SIZE.1)),
        }
    }

    pub fn on(&mut self) {
        self.state = FireState::On;
    }

    #[allow(dead_code)]
    pub fn off(&mut self) {
        self.state = FireState::Off;
    }

    /// Advance one tick. The counter wraps back to zero once `count / delay`
    /// passes the sequence length, which holds frame 0 for one extra logical
    /// frame at every wrap.
    ///
    /// # Panics
    /// If the catalog lacks the sheet for the current state; see `FIRE_SHEETS`.
    pub fn tick(&mut self, catalog: &SpriteCatalog) {
        let key = self.state.sheet();
        let Some((sheet, frames)) = catalog.sequence(key) else {
            panic!("fire sprite catalog has no sheet '{key}'");
        };
        let index = frame_index(self.animation_count, self.delay, frames.len());
        self.sprite = SpriteRef {
            sheet: sheet.clone(),
            frame: index,
        };
        self.mask = frames[index].clone();
        self.rect
            .resize(self.mask.width() as i32, self.mask.height() as i32);
        self.animation_count += 1;

        if (self.animation_count / self.delay) as usize > frames.len() {
            self.animation_count = 0;
        }
    }
}

impl Collider for Fire {
    fn bounding_box(&self) -> Rect {
        self.rect
    }

    fn mask(&self) -> &Mask {
        &self.mask
    }

    fn kind(&self) -> ObstacleKind {
        ObstacleKind::Hazard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SpriteCatalog {
        let mut catalog = SpriteCatalog::new();
        catalog.insert(
            "on",
            vec![Mask::full(32, 64), Mask::full(32, 64), Mask::full(32, 64)],
        );
        catalog.insert("off", vec![Mask::full(32, 64)]);
        catalog
    }

    #[test]
    fn fire_is_a_hazard() {
        let fire = Fire::new(IVec2::new(100, 640), 3);
        assert_eq!(fire.kind(), ObstacleKind::Hazard);
        assert_eq!(fire.bounding_box(), Rect::new(100, 640, 32, 64));
        assert_eq!(fire.state, FireState::Off);
    }

    #[test]
    fn on_sequence_holds_first_frame_an_extra_step_at_wrap() {
        let catalog = catalog();
        let mut fire = Fire::new(IVec2::ZERO, 3);
        fire.on();

        let frames: Vec<usize> = (0..24)
            .map(|_| {
                fire.tick(&catalog);
                fire.sprite.frame
            })
            .collect();
        assert_eq!(
            frames,
            vec![
                0, 0, 0, 1, 1, 1, 2, 2, 2, 0, 0, 0, // one full cycle plus a held frame 0
                0, 0, 0, 1, 1, 1, 2, 2, 2, 0, 0, 0,
            ]
        );
        assert_eq!(fire.animation_count, 0);
        assert_eq!(&*fire.sprite.sheet, "on");
    }

    #[test]
    fn switching_state_changes_sheet() {
        let catalog = catalog();
        let mut fire = Fire::new(IVec2::ZERO, 3);
        fire.on();
        fire.tick(&catalog);
        fire.off();
        fire.tick(&catalog);
        assert_eq!(&*fire.sprite.sheet, "off");
        assert_eq!(fire.sprite.frame, 0);
    }
}
