//! Platform abstraction layer
//!
//! The engine talks to its host only through these traits:
//! - Canvas dimensions
//! - Held input direction
//! - Presentation of the current state
//! - Game-over notification
//!
//! The browser host lives in `main.rs`; `headless` has in-memory versions
//! used by the native binary and the tests.

pub mod headless;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{EnemyKind, GameState};

pub use headless::{FixedCanvas, LogGameOverSink, NullPresenter, ScriptedInput};

/// Source of the current drawing surface size (pixels)
pub trait CanvasProvider {
    fn dimensions(&self) -> Vec2;
}

/// Source of the held movement direction.
///
/// Axes are expected in {-1, 0, 1}; the core only looks at their signs.
pub trait InputProvider {
    fn direction(&mut self) -> Vec2;
}

/// Draws a frame. Called every frame whether or not the game is running.
pub trait Presenter {
    fn draw(&mut self, state: &GameState);
}

/// Receives the final result when the player is caught
pub trait GameOverSink {
    fn game_over(&mut self, report: &GameOverReport);
}

/// What the host needs to show a game-over screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverReport {
    pub score: u64,
    pub enemy_id: u32,
    pub enemy_kind: EnemyKind,
    pub difficulty_level: u32,
}

/// Everything the engine needs from its host
pub struct Platform {
    pub canvas: Box<dyn CanvasProvider>,
    pub input: Box<dyn InputProvider>,
    pub presenter: Box<dyn Presenter>,
    pub sink: Box<dyn GameOverSink>,
}

impl Platform {
    pub fn new(
        canvas: impl CanvasProvider + 'static,
        input: impl InputProvider + 'static,
        presenter: impl Presenter + 'static,
        sink: impl GameOverSink + 'static,
    ) -> Self {
        Self {
            canvas: Box::new(canvas),
            input: Box::new(input),
            presenter: Box::new(presenter),
            sink: Box::new(sink),
        }
    }

    /// Fixed-size canvas, no input, no drawing, logged game over
    pub fn headless(size: Vec2) -> Self {
        Self::new(
            FixedCanvas::new(size),
            ScriptedInput::idle(),
            NullPresenter::default(),
            LogGameOverSink::default(),
        )
    }
}
