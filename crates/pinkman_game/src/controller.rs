use pinkman_core::input::{InputSource, Key};
use pinkman_core::sprites::SpriteCatalog;

use crate::collision::{probe_sides, react_to_hazards, resolve_vertical, CollisionReport};
use crate::obstacle::Collider;
use crate::player::Player;

/// Intent for one tick, already reduced from raw keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump_pressed: bool,
}

impl ControllerInput {
    /// Arrows or A/D steer while held; Space, Up or W jump on the press edge.
    pub fn from_source(input: &impl InputSource) -> Self {
        Self {
            move_left: input.is_held(Key::Left) || input.is_held(Key::A),
            move_right: input.is_held(Key::Right) || input.is_held(Key::D),
            jump_pressed: input.is_just_pressed(Key::Space)
                || input.is_just_pressed(Key::Up)
                || input.is_just_pressed(Key::W),
        }
    }
}

/// Run one tick of the player pipeline: probe, gate intent, jump, move,
/// resolve vertically, react to hazards, pick the sprite.
pub fn step_player(
    player: &mut Player,
    input: ControllerInput,
    speed: i32,
    obstacles: &[&dyn Collider],
    catalog: &SpriteCatalog,
) -> CollisionReport {
    let probe = probe_sides(player, obstacles, speed);

    // Horizontal intent is only honored toward an unblocked side.
    player.vel_x = 0.0;
    if input.move_left && !probe.blocked_left() {
        player.move_left(speed as f32);
    }
    if input.move_right && !probe.blocked_right() {
        player.move_right(speed as f32);
    }

    if input.jump_pressed && player.can_jump() {
        player.jump();
    }

    player.tick();

    let dy = player.vel_y;
    let vertical = resolve_vertical(player, obstacles, dy);

    let mut report = CollisionReport {
        probe,
        vertical,
        hazard_hit: false,
    };
    report.hazard_hit = react_to_hazards(player, obstacles, report.touched());

    player.update_sprite(catalog);
    report
}
