use std::sync::Arc;

use pinkman_core::mask::Mask;
use pinkman_core::rect::Rect;
use pinkman_core::sprites::SpriteRef;

/// What touching an obstacle means. Every obstacle blocks; hazards also hurt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Ground,
    Hazard,
}

/// Anything the player can collide with. The resolver only ever sees this
/// interface, so static blocks and animated fire are handled uniformly.
pub trait Collider {
    fn bounding_box(&self) -> Rect;
    fn mask(&self) -> &Mask;
    fn kind(&self) -> ObstacleKind;
}

/// A level piece that never moves once built.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub rect: Rect,
    pub mask: Arc<Mask>,
    pub kind: ObstacleKind,
    pub sprite: SpriteRef,
}

impl Obstacle {
    /// The box takes its size from the mask so the two always agree.
    pub fn new(x: i32, y: i32, mask: Arc<Mask>, kind: ObstacleKind, sprite: SpriteRef) -> Self {
        let rect = Rect::new(x, y, mask.width() as i32, mask.height() as i32);
        Self {
            rect,
            mask,
            kind,
            sprite,
        }
    }
}

impl Collider for Obstacle {
    fn bounding_box(&self) -> Rect {
        self.rect
    }

    fn mask(&self) -> &Mask {
        &self.mask
    }

    fn kind(&self) -> ObstacleKind {
        self.kind
    }
}
