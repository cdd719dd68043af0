//! Enemy wandering AI
//!
//! Enemies do not chase; they wander corridors, avoiding walls and avoiding
//! immediate U-turns so they don't jitter back and forth in narrow halls.

use glam::Vec2;

use super::entity::Direction;
use super::query::SpatialQuery;
use super::rng::RandomSource;
use crate::consts::AI_PROBE_DISTANCE;

/// Pick a new heading for an entity of `size` at `pos`.
///
/// Candidates are the four cardinals minus the reverse of `current`, kept
/// only if a short probe in that direction is walkable. With no walkable
/// candidate the choice falls back to any of the four directions, reverse
/// included; the movement step rejects it if it turns out to be blocked.
pub fn choose_new_direction(
    current: Direction,
    pos: Vec2,
    size: Vec2,
    query: &SpatialQuery,
    rng: &mut dyn RandomSource,
) -> Direction {
    let reverse = current.opposite();

    let walkable: Vec<Direction> = Direction::CARDINALS
        .iter()
        .copied()
        .filter(|&dir| dir != reverse)
        .filter(|&dir| query.is_valid_move(pos, size, dir.to_vec(), AI_PROBE_DISTANCE))
        .collect();

    if walkable.is_empty() {
        return Direction::CARDINALS[rng.next_index(Direction::CARDINALS.len())];
    }

    walkable[rng.next_index(walkable.len())]
}
