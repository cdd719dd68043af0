//! Tile maze
//!
//! A fixed, hand-authored wall/path layout scaled to the canvas. The grid is
//! immutable once built; a canvas resize produces a fresh grid.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CELL_DIVISOR, MAZE_COLS, MAZE_ROWS};

/// One maze tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Path,
}

/// The standard level. `#` = wall, `.` = path.
pub const DEFAULT_LAYOUT: [&str; MAZE_ROWS] = [
    "###############",
    "#.............#",
    "#.###.#.#.###.#",
    "#.............#",
    "#.#.#.###.#.#.#",
    "#.............#",
    "###.#.#.#.#.###",
    "#.............#",
    "#.#.#.###.#.#.#",
    "#.............#",
    "#.###.#.#.###.#",
    "#.............#",
    "###############",
];

/// Wall/path grid positioned in canvas pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeGrid {
    pub rows: usize,
    pub cols: usize,
    /// Pixels per cell
    pub cell_size: f32,
    /// Top-left of the grid inside the canvas (whole pixels)
    pub offset: Vec2,
    /// Canvas dimensions this grid was laid out for
    pub canvas: Vec2,
    /// Row-major cells
    cells: Vec<Cell>,
}

impl MazeGrid {
    /// Build the standard level for a canvas
    pub fn build(canvas_width: f32, canvas_height: f32) -> Self {
        Self::from_layout(&DEFAULT_LAYOUT, canvas_width, canvas_height)
    }

    /// Build a grid from text rows (`#` wall, anything else path).
    ///
    /// Short rows are padded with walls and the border is always walled, so
    /// every grid is enclosed. An empty layout yields a 1x1 wall.
    pub fn from_layout(layout: &[&str], canvas_width: f32, canvas_height: f32) -> Self {
        let rows = layout.len().max(1);
        let cols = layout
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut cells = vec![Cell::Wall; rows * cols];
        for (r, line) in layout.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                let border = r == 0 || c == 0 || r == rows - 1 || c == cols - 1;
                if ch != '#' && !border {
                    cells[r * cols + c] = Cell::Path;
                }
            }
        }

        let canvas = Vec2::new(canvas_width.max(1.0), canvas_height.max(1.0));
        let cell_size = canvas.x.min(canvas.y) / CELL_DIVISOR;
        let offset = Vec2::new(
            ((canvas.x - cols as f32 * cell_size) / 2.0).floor(),
            ((canvas.y - rows as f32 * cell_size) / 2.0).floor(),
        );

        Self {
            rows,
            cols,
            cell_size,
            offset,
            canvas,
            cells,
        }
    }

    /// True when this grid was laid out for the given canvas size
    pub fn matches_canvas(&self, canvas: Vec2) -> bool {
        self.canvas == Vec2::new(canvas.x.max(1.0), canvas.y.max(1.0))
    }

    /// Cell at (row, col); out of range is `None`
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    pub fn is_path(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) == Some(Cell::Path)
    }

    /// Grid coordinates (row, col) containing a pixel, if inside the grid
    pub fn cell_at(&self, point: Vec2) -> Option<(usize, usize)> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let local = (point - self.offset) / self.cell_size;
        let col = local.x.floor();
        let row = local.y.floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f32 || row >= self.rows as f32 {
            return None;
        }
        Some((row as usize, col as usize))
    }

    /// Top-left pixel of a cell
    pub fn cell_origin(&self, row: usize, col: usize) -> Vec2 {
        self.offset + Vec2::new(col as f32, row as f32) * self.cell_size
    }

    /// Center pixel of a cell
    pub fn cell_center(&self, row: usize, col: usize) -> Vec2 {
        self.cell_origin(row, col) + Vec2::splat(self.cell_size / 2.0)
    }

    /// Number of orthogonal neighbors that are path (0-4)
    pub fn path_neighbors(&self, row: usize, col: usize) -> u8 {
        let mut count = 0;
        if row > 0 && self.is_path(row - 1, col) {
            count += 1;
        }
        if self.is_path(row + 1, col) {
            count += 1;
        }
        if col > 0 && self.is_path(row, col - 1) {
            count += 1;
        }
        if self.is_path(row, col + 1) {
            count += 1;
        }
        count
    }

    /// Carry a pixel from `other`'s layout to the same spot on this grid
    pub fn map_point_from(&self, other: &MazeGrid, point: Vec2) -> Vec2 {
        if other.cell_size <= 0.0 {
            return point;
        }
        self.offset + (point - other.offset) * (self.cell_size / other.cell_size)
    }

    /// Iterate (row, col, cell) in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (i / self.cols, i % self.cols, cell))
    }
}
