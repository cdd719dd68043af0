//! In-memory platform pieces
//!
//! Clones share their state, so a caller can keep a handle to drive or
//! inspect a piece after giving it to the engine.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec2;

use super::{CanvasProvider, GameOverReport, GameOverSink, InputProvider, Presenter};
use crate::sim::GameState;

/// Canvas whose size only changes when told to
#[derive(Debug, Clone)]
pub struct FixedCanvas {
    size: Rc<Cell<Vec2>>,
}

impl FixedCanvas {
    pub fn new(size: Vec2) -> Self {
        Self {
            size: Rc::new(Cell::new(size)),
        }
    }

    pub fn set(&self, size: Vec2) {
        self.size.set(size);
    }
}

impl CanvasProvider for FixedCanvas {
    fn dimensions(&self) -> Vec2 {
        self.size.get()
    }
}

/// Plays back queued directions, then holds the last one
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: Rc<RefCell<VecDeque<Vec2>>>,
    held: Rc<Cell<Vec2>>,
}

impl ScriptedInput {
    /// No input at all
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn new(script: impl IntoIterator<Item = Vec2>) -> Self {
        let input = Self::default();
        input.queue.borrow_mut().extend(script);
        input
    }

    /// Hold `direction` once the script runs out
    pub fn hold(&self, direction: Vec2) {
        self.queue.borrow_mut().clear();
        self.held.set(direction);
    }
}

impl InputProvider for ScriptedInput {
    fn direction(&mut self) -> Vec2 {
        if let Some(next) = self.queue.borrow_mut().pop_front() {
            self.held.set(next);
        }
        self.held.get()
    }
}

/// Draws nothing; counts frames
#[derive(Debug, Clone, Default)]
pub struct NullPresenter {
    frames: Rc<Cell<u64>>,
}

impl NullPresenter {
    pub fn frames(&self) -> u64 {
        self.frames.get()
    }
}

impl Presenter for NullPresenter {
    fn draw(&mut self, _state: &GameState) {
        self.frames.set(self.frames.get() + 1);
    }
}

/// Logs each game over and keeps the reports
#[derive(Debug, Clone, Default)]
pub struct LogGameOverSink {
    reports: Rc<RefCell<Vec<GameOverReport>>>,
}

impl LogGameOverSink {
    pub fn reports(&self) -> Vec<GameOverReport> {
        self.reports.borrow().clone()
    }
}

impl GameOverSink for LogGameOverSink {
    fn game_over(&mut self, report: &GameOverReport) {
        log::info!(
            "GAME OVER: score {} (caught by {} #{}, level {})",
            report.score,
            report.enemy_kind.as_str(),
            report.enemy_id,
            report.difficulty_level
        );
        self.reports.borrow_mut().push(report.clone());
    }
}
