//! Collision detection between the player and enemies
//!
//! Plain axis-aligned boxes. Edges that merely touch count as a hit; the
//! hitbox inset on each entity is what gives the player some slack.

use super::enemy::Enemy;
use super::entity::Bounds;
use super::player::Player;

/// Inclusive AABB overlap test
#[inline]
pub fn overlap(a: &Bounds, b: &Bounds) -> bool {
    a.left <= b.right && a.right >= b.left && a.top <= b.bottom && a.bottom >= b.top
}

impl Bounds {
    pub fn overlaps(&self, other: &Bounds) -> bool {
        overlap(self, other)
    }
}

/// First enemy (in list order) touching the player, if any
pub fn check_player_vs_enemies<'a>(player: &Player, enemies: &'a [Enemy]) -> Option<&'a Enemy> {
    let player_bounds = player.bounds();
    enemies
        .iter()
        .find(|enemy| overlap(&player_bounds, &enemy.bounds()))
}
