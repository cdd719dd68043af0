//! Maze Dash - A maze chase arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, movement, AI, collisions, game state)
//! - `engine`: Frame loop driving the simulation against platform collaborators
//! - `platform`: Canvas/input/presentation contracts and headless implementations
//! - `switcher`: Keeps exactly one game (maze or a minigame) active
//! - `tuning`: Data-driven game balance
//! - `settings`: Device profile (sprite scale, spawn strictness)

pub mod engine;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod switcher;
pub mod tuning;

pub use engine::{Engine, FrameStatus};
pub use settings::{DeviceProfile, Settings};
pub use tuning::Tuning;

/// Structural constants (not tunable at runtime)
pub mod consts {
    /// Maze layout dimensions
    pub const MAZE_ROWS: usize = 13;
    pub const MAZE_COLS: usize = 15;
    /// Cell size is min(canvas_w, canvas_h) / CELL_DIVISOR
    pub const CELL_DIVISOR: f32 = 15.0;

    /// Nominal sprite edge length before device scaling (pixels)
    pub const BASE_SPRITE_SIZE: f32 = 32.0;

    /// Largest entity edge as a fraction of the maze cell, so sprites always
    /// fit one-cell corridors
    pub const ENTITY_CELL_FRACTION: f32 = 0.8;

    /// Probe distance used by the AI to test walkability (pixels)
    pub const AI_PROBE_DISTANCE: f32 = 5.0;

    /// Right/bottom sample inset so a box flush with a cell edge stays on its own side
    pub const EDGE_EPSILON: f32 = 0.01;

    /// Movement smaller than this counts as "stuck" for enemies (pixels)
    pub const STUCK_EPSILON: f32 = 0.01;

    /// Where entities go when the maze offers no safe cell
    pub const PARKING_POSITION: (f32, f32) = (-1000.0, -1000.0);

    /// Scheduler fallback when no previous timestamp exists (ms)
    pub const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;
}
