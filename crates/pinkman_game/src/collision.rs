//! Player-versus-obstacle collision resolution.
//!
//! The algorithm is **axis-separated** and runs once per tick:
//!
//!  1. **Horizontal probe.** Before anything moves, the player is nudged
//!     `2 * speed` to each side, tested against every obstacle and put back.
//!     Probing at twice the walking speed catches a wall before the sprite
//!     reaches it. The probe never changes the committed position.
//!  2. **Vertical resolution.** After the real move, every obstacle the player
//!     overlaps is resolved by the sign of the vertical velocity: falling snaps
//!     the player's feet to the obstacle top and lands, rising snaps the head to
//!     the obstacle bottom and bounces.
//!  3. **Hazard reaction.** If any obstacle touched in either phase is a hazard
//!     the player is hit.
//!
//! Contact is decided by pixel masks. Boxes are only a cheap pre-check.

use glam::IVec2;
use pinkman_core::mask::Mask;
use pinkman_core::rect::Rect;

use crate::obstacle::{Collider, ObstacleKind};
use crate::player::Player;

/// Per-pixel contact between a placed mask and an obstacle.
pub fn collide_mask(rect: Rect, mask: &Mask, obstacle: &dyn Collider) -> bool {
    let other = obstacle.bounding_box();
    if !rect.intersects(&other) {
        return false;
    }
    let offset = IVec2::new(other.x - rect.x, other.y - rect.y);
    mask.overlaps(obstacle.mask(), offset)
}

/// Index of the first obstacle the player overlaps, in slice order.
pub fn first_contact(player: &Player, obstacles: &[&dyn Collider]) -> Option<usize> {
    obstacles
        .iter()
        .position(|obstacle| collide_mask(player.rect, player.mask(), *obstacle))
}

/// Move by `dx`, look for contact, move back.
pub fn probe_horizontal(player: &mut Player, obstacles: &[&dyn Collider], dx: i32) -> Option<usize> {
    player.move_by(dx, 0);
    let contact = first_contact(player, obstacles);
    player.move_by(-dx, 0);
    contact
}

/// Which side is blocked, and by which obstacle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeResult {
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl ProbeResult {
    pub fn blocked_left(&self) -> bool {
        self.left.is_some()
    }

    pub fn blocked_right(&self) -> bool {
        self.right.is_some()
    }
}

/// Probe both sides at twice `speed`.
pub fn probe_sides(player: &mut Player, obstacles: &[&dyn Collider], speed: i32) -> ProbeResult {
    ProbeResult {
        left: probe_horizontal(player, obstacles, -speed * 2),
        right: probe_horizontal(player, obstacles, speed * 2),
    }
}

/// Resolve every vertical overlap for a player that moved by `dy` this tick.
/// `dy` is captured before resolution starts, so landing on the first
/// obstacle does not change how later overlaps are treated. A `dy` of zero
/// only collects contacts. Returns the indices of every overlapped obstacle.
pub fn resolve_vertical(player: &mut Player, obstacles: &[&dyn Collider], dy: f32) -> Vec<usize> {
    let mut touched = Vec::new();
    for (index, obstacle) in obstacles.iter().enumerate() {
        if !collide_mask(player.rect, player.mask(), *obstacle) {
            continue;
        }
        let bounds = obstacle.bounding_box();
        if dy > 0.0 {
            player.rect.set_bottom(bounds.top());
            player.land();
            log::trace!("Landed on obstacle {} at y={}", index, bounds.top());
        } else if dy < 0.0 {
            player.rect.set_top(bounds.bottom());
            player.hit_head();
            log::trace!("Bumped head on obstacle {} at y={}", index, bounds.bottom());
        }
        touched.push(index);
    }
    touched
}

/// Hit the player if any touched obstacle is a hazard. Returns whether it did.
pub fn react_to_hazards(
    player: &mut Player,
    obstacles: &[&dyn Collider],
    touched: impl IntoIterator<Item = usize>,
) -> bool {
    let hazard = touched
        .into_iter()
        .any(|index| obstacles[index].kind() == ObstacleKind::Hazard);
    if hazard {
        player.make_hit();
    }
    hazard
}

/// What the resolver found during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub probe: ProbeResult,
    pub vertical: Vec<usize>,
    pub hazard_hit: bool,
}

impl CollisionReport {
    /// Probe contacts followed by vertical contacts.
    pub fn touched(&self) -> impl Iterator<Item = usize> + '_ {
        self.probe
            .left
            .into_iter()
            .chain(self.probe.right)
            .chain(self.vertical.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::spike_mask;
    use crate::obstacle::Obstacle;
    use crate::player::MotionConfig;
    use pinkman_core::sprites::SpriteRef;
    use std::sync::Arc;

    fn block(x: i32, y: i32, size: u32) -> Obstacle {
        Obstacle::new(
            x,
            y,
            Arc::new(Mask::full(size, size)),
            ObstacleKind::Ground,
            SpriteRef::new("block", 0),
        )
    }

    fn player_at(x: i32, y: i32) -> Player {
        Player::new(Rect::new(x, y, 64, 64), MotionConfig::default())
    }

    #[test]
    fn probe_never_moves_the_player() {
        let wall = block(170, 0, 96);
        let obstacles: Vec<&dyn Collider> = vec![&wall];

        let mut blocked = player_at(100, 0);
        let before = blocked.rect;
        let probe = probe_sides(&mut blocked, &obstacles, 5);
        assert_eq!(blocked.rect, before);
        assert!(probe.blocked_right());
        assert!(!probe.blocked_left());

        let mut free = player_at(-500, 0);
        let before = free.rect;
        let probe = probe_sides(&mut free, &obstacles, 5);
        assert_eq!(free.rect, before);
        assert_eq!(probe, ProbeResult::default());
    }

    #[test]
    fn probe_reports_first_obstacle_in_order() {
        let a = block(170, 0, 96);
        let b = block(168, 0, 96);
        let obstacles: Vec<&dyn Collider> = vec![&a, &b];
        let mut p = player_at(100, 0);
        assert_eq!(probe_horizontal(&mut p, &obstacles, 10), Some(0));
    }

    #[test]
    fn falling_player_lands_on_top() {
        let ground = block(0, 704, 96);
        let obstacles: Vec<&dyn Collider> = vec![&ground];
        let mut p = player_at(10, 643);
        p.jump_count = 2;
        p.vel_y = 3.0;
        let dy = p.vel_y;
        let touched = resolve_vertical(&mut p, &obstacles, dy);
        assert_eq!(touched, vec![0]);
        assert_eq!(p.rect.bottom(), 704);
        assert_eq!(p.vel_y, 0.0);
        assert_eq!(p.jump_count, 0);
    }

    #[test]
    fn rising_player_bumps_head() {
        let ceiling = block(0, 104, 96);
        let obstacles: Vec<&dyn Collider> = vec![&ceiling];
        let mut p = player_at(10, 197);
        p.vel_y = -8.0;
        let dy = p.vel_y;
        let touched = resolve_vertical(&mut p, &obstacles, dy);
        assert_eq!(touched, vec![0]);
        assert_eq!(p.rect.top(), 200);
        assert_eq!(p.vel_y, 8.0);
    }

    #[test]
    fn touching_edges_are_not_contact() {
        let ground = block(0, 704, 96);
        let obstacles: Vec<&dyn Collider> = vec![&ground];
        let mut p = player_at(10, 640);
        p.vel_y = 0.5;
        let dy = p.vel_y;
        assert!(resolve_vertical(&mut p, &obstacles, dy).is_empty());
        assert_eq!(p.vel_y, 0.5);
    }

    #[test]
    fn spike_box_overlap_without_mask_overlap_is_no_contact() {
        let spike = Obstacle::new(
            200,
            672,
            Arc::new(spike_mask(32, 32)),
            ObstacleKind::Hazard,
            SpriteRef::new("spike", 0),
        );
        // Player's bottom-right corner dips 4px into the spike's empty top-left corner.
        let p = player_at(140, 612);
        assert!(p.rect.intersects(&spike.rect));
        assert!(!collide_mask(p.rect, p.mask(), &spike));

        // Directly over the tip is contact.
        let over_tip = player_at(184, 612);
        assert!(collide_mask(over_tip.rect, over_tip.mask(), &spike));
    }

    #[test]
    fn hazard_contact_hits_player() {
        let ground = block(0, 704, 96);
        let spike = Obstacle::new(
            0,
            672,
            Arc::new(spike_mask(32, 32)),
            ObstacleKind::Hazard,
            SpriteRef::new("spike", 0),
        );
        let obstacles: Vec<&dyn Collider> = vec![&ground, &spike];
        let mut p = player_at(0, 0);

        assert!(!react_to_hazards(&mut p, &obstacles, [0]));
        assert!(!p.hit);
        assert!(react_to_hazards(&mut p, &obstacles, [0, 1]));
        assert!(p.hit);
    }

    #[test]
    fn report_lists_probe_then_vertical_contacts() {
        let report = CollisionReport {
            probe: ProbeResult {
                left: Some(4),
                right: None,
            },
            vertical: vec![1, 2],
            hazard_hit: false,
        };
        assert_eq!(report.touched().collect::<Vec<_>>(), vec![4, 1, 2]);
    }
}
