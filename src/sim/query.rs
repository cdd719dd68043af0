//! Spatial queries against the maze
//!
//! `SpatialQuery` is a cheap borrowed view: build one per tick from the
//! current maze and canvas size. Until a maze exists every query is
//! permissive so entities are never frozen during startup.

use glam::Vec2;

use super::maze::{Cell, MazeGrid};
use crate::consts::EDGE_EPSILON;

/// Read-only spatial queries over an (optional) maze
#[derive(Debug, Clone, Copy)]
pub struct SpatialQuery<'a> {
    pub maze: Option<&'a MazeGrid>,
    pub canvas: Vec2,
}

impl<'a> SpatialQuery<'a> {
    pub fn new(maze: Option<&'a MazeGrid>, canvas: Vec2) -> Self {
        Self { maze, canvas }
    }

    /// Is the pixel inside a wall cell? Pixels outside the grid are not walls;
    /// callers bound those with the canvas check.
    pub fn is_wall(&self, point: Vec2) -> bool {
        let Some(maze) = self.maze else {
            return false;
        };
        match maze.cell_at(point) {
            Some((row, col)) => maze.cell(row, col) == Some(Cell::Wall),
            None => false,
        }
    }

    /// Is the pixel on a path cell? Outside the grid is never on a path.
    pub fn is_on_path(&self, point: Vec2) -> bool {
        let Some(maze) = self.maze else {
            return true;
        };
        match maze.cell_at(point) {
            Some((row, col)) => maze.is_path(row, col),
            None => false,
        }
    }

    /// Can a box of `size` at `pos` move `distance` along `dir`?
    ///
    /// Samples the corners and edge midpoints of the destination box and
    /// rejects the move if any sample is a wall or the box leaves the canvas.
    pub fn is_valid_move(&self, pos: Vec2, size: Vec2, dir: Vec2, distance: f32) -> bool {
        if self.maze.is_none() {
            return true;
        }

        let next = pos + dir * distance;
        let size = size.max(Vec2::ZERO);

        if next.x < 0.0
            || next.y < 0.0
            || next.x + size.x > self.canvas.x
            || next.y + size.y > self.canvas.y
        {
            return false;
        }

        sample_points(next, size)
            .iter()
            .all(|&point| !self.is_wall(point))
    }

    /// Spawn candidates for an entity of `entity_size`, most open first.
    ///
    /// A path cell qualifies when at least `min_openness` of its four
    /// neighbors are paths. Positions center the entity in the cell, and
    /// cells where the centered box would touch a wall are never returned.
    /// When no cell qualifies, every path cell with at least one path
    /// neighbor is returned instead.
    pub fn list_safe_positions(&self, entity_size: Vec2, min_openness: u8) -> Vec<Vec2> {
        let Some(maze) = self.maze else {
            return Vec::new();
        };

        let mut scored: Vec<(u8, Vec2)> = maze
            .iter()
            .filter(|&(_, _, cell)| cell == Cell::Path)
            .map(|(row, col, _)| {
                let score = maze.path_neighbors(row, col);
                let pos = maze.cell_origin(row, col)
                    + (Vec2::splat(maze.cell_size) - entity_size) / 2.0;
                (score, pos)
            })
            .filter(|&(_, pos)| self.is_valid_move(pos, entity_size, Vec2::ZERO, 0.0))
            .collect();

        let strict: Vec<(u8, Vec2)> = scored
            .iter()
            .copied()
            .filter(|&(score, _)| score >= min_openness)
            .collect();

        if strict.is_empty() {
            scored.retain(|&(score, _)| score >= 1);
        } else {
            scored = strict;
        }

        // Stable sort keeps row-major order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, pos)| pos).collect()
    }
}

/// Four corners plus four edge midpoints of a box. Right/bottom samples sit
/// just inside the edge; a zero-size box collapses to its origin.
fn sample_points(pos: Vec2, size: Vec2) -> [Vec2; 8] {
    let right = pos.x + (size.x - EDGE_EPSILON).max(0.0);
    let bottom = pos.y + (size.y - EDGE_EPSILON).max(0.0);
    let mid_x = (pos.x + right) / 2.0;
    let mid_y = (pos.y + bottom) / 2.0;

    [
        Vec2::new(pos.x, pos.y),
        Vec2::new(right, pos.y),
        Vec2::new(pos.x, bottom),
        Vec2::new(right, bottom),
        Vec2::new(mid_x, pos.y),
        Vec2::new(mid_x, bottom),
        Vec2::new(pos.x, mid_y),
        Vec2::new(right, mid_y),
    ]
}
