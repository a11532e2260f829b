//! Animation state selection.
//!
//! Maps a snapshot of an entity's motion flags to the sprite sheet it should
//! show. Selection is recomputed every tick from scratch; the only state that
//! carries across ticks is the entity's own frame counter.

use crate::player::{Facing, MAX_JUMPS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Idle,
    Run,
    Jump,
    DoubleJump,
    Fall,
    Hit,
}

impl AnimationKind {
    pub const ALL: &'static [AnimationKind] = &[
        AnimationKind::Idle,
        AnimationKind::Run,
        AnimationKind::Jump,
        AnimationKind::DoubleJump,
        AnimationKind::Fall,
        AnimationKind::Hit,
    ];

    pub fn sheet_name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::DoubleJump => "double_jump",
            Self::Fall => "fall",
            Self::Hit => "hit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStatus {
    pub vel_x: f32,
    pub vel_y: f32,
    pub jump_count: u8,
    pub hit: bool,
}

/// Highest priority first: hit, rising (by jump number), falling faster than
/// twice gravity, running, idle. Rising without a matching jump number shows
/// idle rather than falling through to the lower checks.
pub fn select_animation(status: MotionStatus, gravity: f32) -> AnimationKind {
    if status.hit {
        AnimationKind::Hit
    } else if status.vel_y < 0.0 {
        match status.jump_count {
            1 => AnimationKind::Jump,
            MAX_JUMPS => AnimationKind::DoubleJump,
            _ => AnimationKind::Idle,
        }
    } else if status.vel_y > gravity * 2.0 {
        AnimationKind::Fall
    } else if status.vel_x != 0.0 {
        AnimationKind::Run
    } else {
        AnimationKind::Idle
    }
}

pub fn sheet_key(kind: AnimationKind, facing: Facing) -> String {
    format!("{}_{}", kind.sheet_name(), facing.label())
}

/// Every sheet a player catalog must hold.
pub fn required_player_sheets() -> Vec<String> {
    AnimationKind::ALL
        .iter()
        .flat_map(|&kind| [Facing::Left, Facing::Right].map(|facing| sheet_key(kind, facing)))
        .collect()
}
