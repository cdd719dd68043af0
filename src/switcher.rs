//! Keeps exactly one game active at a time
//!
//! The switcher only flips games on and off. Frame scheduling belongs to the
//! host: after a switch it must (re)start its frame loop for the new game
//! and let the stopped one's loop wind down on `FrameStatus::Stopped`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Anything the switcher can start and stop
pub trait Minigame {
    fn name(&self) -> &str;
    /// Begin a fresh run. The host resumes frame scheduling afterwards.
    fn start(&mut self);
    /// Stop after the current frame; later frames report `Stopped`.
    fn stop(&mut self);
    fn is_active(&self) -> bool;
}

/// Selectable games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Maze,
    Shooter,
    Guess,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Maze => "maze",
            GameMode::Shooter => "shooter",
            GameMode::Guess => "guess",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "maze" => Some(GameMode::Maze),
            "shooter" => Some(GameMode::Shooter),
            "guess" => Some(GameMode::Guess),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct Switcher {
    games: HashMap<GameMode, Box<dyn Minigame>>,
    active: Option<GameMode>,
}

impl Switcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the game behind `mode`
    pub fn register(&mut self, mode: GameMode, game: Box<dyn Minigame>) {
        if self.active == Some(mode) {
            if let Some(old) = self.games.get_mut(&mode) {
                old.stop();
            }
            self.active = None;
        }
        self.games.insert(mode, game);
    }

    pub fn active(&self) -> Option<GameMode> {
        self.active
    }

    pub fn game(&self, mode: GameMode) -> Option<&dyn Minigame> {
        self.games.get(&mode).map(|g| g.as_ref())
    }

    /// Stop the active game and start `mode`. Returns false if nothing changed.
    pub fn switch_to(&mut self, mode: GameMode) -> bool {
        if self.active == Some(mode) {
            return false;
        }
        if !self.games.contains_key(&mode) {
            log::warn!("No game registered for mode '{}'", mode.as_str());
            return false;
        }

        if let Some(current) = self.active.take() {
            if let Some(game) = self.games.get_mut(&current) {
                game.stop();
            }
        }
        if let Some(game) = self.games.get_mut(&mode) {
            game.start();
            log::info!("Switched to {}", game.name());
        }
        self.active = Some(mode);
        true
    }

    /// Switch by name, as received from a UI control
    pub fn switch_to_named(&mut self, name: &str) -> bool {
        match GameMode::from_str(name) {
            Some(mode) => self.switch_to(mode),
            None => {
                log::warn!("Unknown game mode '{}'", name);
                false
            }
        }
    }

    /// Stop whatever is running
    pub fn stop_all(&mut self) {
        if let Some(current) = self.active.take() {
            if let Some(game) = self.games.get_mut(&current) {
                game.stop();
            }
        }
    }
}
