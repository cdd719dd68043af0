//! Entity placement on safe maze cells

use glam::Vec2;

use super::entity::Bounds;
use super::query::SpatialQuery;
use super::rng::RandomSource;
use crate::consts::PARKING_POSITION;

/// Off-screen spot for entities the maze has no room for
pub fn parking_position() -> Vec2 {
    Vec2::new(PARKING_POSITION.0, PARKING_POSITION.1)
}

/// Safe position closest to the canvas center (deterministic)
pub fn place_player(query: &SpatialQuery, size: Vec2, min_openness: u8) -> Option<Vec2> {
    nearest_safe_position(query, size, min_openness, query.canvas / 2.0)
}

/// Safe position closest to `near` (used to rescue a drifted player)
pub fn nearest_safe_position(
    query: &SpatialQuery,
    size: Vec2,
    min_openness: u8,
    near: Vec2,
) -> Option<Vec2> {
    query
        .list_safe_positions(size, min_openness)
        .into_iter()
        .min_by(|a, b| {
            let da = (*a + size / 2.0).distance_squared(near);
            let db = (*b + size / 2.0).distance_squared(near);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Center a box on the path cell under its own center, if it fits there.
///
/// Used after a resize leaves an entity on a path cell but overlapping a wall.
pub fn recenter_in_cell(query: &SpatialQuery, pos: Vec2, size: Vec2) -> Option<Vec2> {
    let maze = query.maze?;
    let (row, col) = maze.cell_at(pos + size / 2.0)?;
    if !maze.is_path(row, col) {
        return None;
    }
    let candidate = maze.cell_center(row, col) - size / 2.0;
    query
        .is_valid_move(candidate, size, Vec2::ZERO, 0.0)
        .then_some(candidate)
}

/// Random safe position for an enemy.
///
/// Prefers cells at least `min_distance` from `player_center` that don't
/// overlap any box in `occupied`; then any cell far enough from the player;
/// then any safe cell at all. `None` means the maze has no safe cell.
pub fn place_enemy(
    query: &SpatialQuery,
    size: Vec2,
    min_openness: u8,
    player_center: Vec2,
    min_distance: f32,
    occupied: &[Bounds],
    rng: &mut dyn RandomSource,
) -> Option<Vec2> {
    let candidates = query.list_safe_positions(size, min_openness);
    if candidates.is_empty() {
        return None;
    }

    let far: Vec<Vec2> = candidates
        .iter()
        .copied()
        .filter(|&pos| (pos + size / 2.0).distance(player_center) >= min_distance)
        .collect();

    let free: Vec<Vec2> = far
        .iter()
        .copied()
        .filter(|&pos| {
            let bounds = Bounds::from_rect(pos, size);
            !occupied.iter().any(|other| bounds.overlaps(other))
        })
        .collect();

    let pool = if !free.is_empty() {
        free
    } else if !far.is_empty() {
        far
    } else {
        candidates
    };

    Some(pool[rng.next_index(pool.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::MazeGrid;
    use crate::sim::rng::{ScriptedRandom, SimRng};

    #[test]
    fn test_player_goes_near_center() {
        let maze = MazeGrid::build(800.0, 600.0);
        let query = SpatialQuery::new(Some(&maze), maze.canvas);
        let size = Vec2::splat(32.0);
        let pos = place_player(&query, size, 3).unwrap();

        // Deterministic and on an open cell
        assert_eq!(place_player(&query, size, 3), Some(pos));
        assert!(query.is_valid_move(pos, size, Vec2::ZERO, 0.0));
        let (row, col) = maze.cell_at(pos + size / 2.0).unwrap();
        assert!(maze.path_neighbors(row, col) >= 3);
        assert!((pos + size / 2.0).distance(maze.canvas / 2.0) < maze.cell_size * 2.0);
    }

    #[test]
    fn test_enemy_keeps_distance_from_player() {
        let maze = MazeGrid::build(800.0, 600.0);
        let query = SpatialQuery::new(Some(&maze), maze.canvas);
        let size = Vec2::splat(32.0);
        let player_center = maze.canvas / 2.0;

        let mut rng = SimRng::new(3);
        for _ in 0..30 {
            let pos = place_enemy(&query, size, 3, player_center, 150.0, &[], &mut rng).unwrap();
            assert!((pos + size / 2.0).distance(player_center) >= 150.0);
        }
    }

    #[test]
    fn test_enemy_avoids_occupied_cells() {
        let maze = MazeGrid::build(800.0, 600.0);
        let query = SpatialQuery::new(Some(&maze), maze.canvas);
        let size = Vec2::splat(32.0);
        let player_center = maze.canvas / 2.0;

        let first = place_enemy(&query, size, 3, player_center, 150.0, &[], &mut ScriptedRandom::first())
            .unwrap();
        let occupied = [Bounds::from_rect(first, size)];
        let second = place_enemy(&query, size, 3, player_center, 150.0, &occupied, &mut ScriptedRandom::first())
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_distance_relaxed_when_impossible() {
        let maze = MazeGrid::build(800.0, 600.0);
        let query = SpatialQuery::new(Some(&maze), maze.canvas);
        let size = Vec2::splat(32.0);
        let pos = place_enemy(&query, size, 3, maze.canvas / 2.0, 10_000.0, &[], &mut ScriptedRandom::first());
        assert!(pos.is_some());
    }

    #[test]
    fn test_recenter_pulls_box_out_of_wall() {
        let maze = MazeGrid::build(800.0, 600.0);
        let query = SpatialQuery::new(Some(&maze), maze.canvas);
        let size = Vec2::splat(32.0);
        // Center on (1,1) but the left edge pokes into the border wall
        let pos = maze.cell_origin(1, 1) - Vec2::new(10.0, 0.0);
        assert!(!query.is_valid_move(pos, size, Vec2::ZERO, 0.0));

        let fixed = recenter_in_cell(&query, pos, size).unwrap();
        assert_eq!(fixed, maze.cell_origin(1, 1) + Vec2::splat(4.0));

        // Center over a wall: nothing to recenter on
        assert!(recenter_in_cell(&query, maze.cell_origin(0, 0), size).is_none());
    }

    #[test]
    fn test_no_safe_cells() {
        let maze = MazeGrid::from_layout(&["###", "###"], 300.0, 300.0);
        let query = SpatialQuery::new(Some(&maze), maze.canvas);
        let size = Vec2::splat(10.0);
        assert!(place_player(&query, size, 3).is_none());
        assert!(place_enemy(&query, size, 3, Vec2::ZERO, 0.0, &[], &mut ScriptedRandom::first()).is_none());
        assert!(parking_position().x < 0.0);
    }
}
