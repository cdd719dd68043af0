//! Frame loop
//!
//! `Engine` owns one game and drives it one scheduler callback at a time.
//! The host calls `frame` with its timestamp and reschedules while it gets
//! `FrameStatus::Continue` back.

use crate::consts::NOMINAL_FRAME_MS;
use crate::platform::{GameOverReport, Platform};
use crate::settings::Settings;
use crate::sim::{tick, Assets, GameEvent, GameState, RandomSource, SimRng, TickInput};
use crate::switcher::Minigame;
use crate::tuning::Tuning;

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stopped,
}

/// Everything needed to build an engine besides the platform
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub settings: Settings,
    pub tuning: Tuning,
    pub assets: Assets,
}

pub struct Engine {
    state: GameState,
    rng: Box<dyn RandomSource>,
    platform: Platform,
    last_timestamp: Option<f64>,
    stopped: bool,
    restart_requested: bool,
    frames: u64,
}

impl Engine {
    /// Build the maze for the current canvas and place a fresh game
    pub fn new(config: EngineConfig, platform: Platform, mut rng: Box<dyn RandomSource>) -> Self {
        let canvas = platform.canvas.dimensions();
        let state = GameState::start(
            canvas,
            config.settings.profile,
            config.tuning.sanitized(),
            config.assets,
            rng.as_mut(),
        );
        log::info!(
            "Game started on {}x{} canvas ({} profile, {} enemies)",
            canvas.x,
            canvas.y,
            state.profile.as_str(),
            state.enemies.len()
        );

        Self {
            state,
            rng,
            platform,
            last_timestamp: None,
            stopped: false,
            restart_requested: false,
            frames: 0,
        }
    }

    /// Engine backed by a seeded `SimRng`
    pub fn with_seed(config: EngineConfig, platform: Platform, seed: u64) -> Self {
        log::info!("Seed: {}", seed);
        Self::new(config, platform, Box::new(SimRng::new(seed)))
    }

    /// Run one frame at scheduler time `timestamp_ms`
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameStatus {
        if self.restart_requested {
            self.restart();
        }
        if self.stopped {
            return FrameStatus::Stopped;
        }

        let dt = match self.last_timestamp {
            Some(last) => ((timestamp_ms - last) as f32).clamp(0.0, self.state.tuning.max_frame_ms),
            None => NOMINAL_FRAME_MS,
        };
        self.last_timestamp = Some(timestamp_ms);

        let mut events = Vec::new();

        let canvas = self.platform.canvas.dimensions();
        if self.state.resize(canvas) {
            events.extend(self.state.validate_positions(self.rng.as_mut()));
        }

        let input = TickInput {
            direction: self.platform.input.direction(),
        };
        events.extend(tick(&mut self.state, &input, dt, self.rng.as_mut()));

        for event in &events {
            self.dispatch(event);
        }

        self.platform.presenter.draw(&self.state);
        self.frames += 1;

        if self.stopped {
            FrameStatus::Stopped
        } else {
            FrameStatus::Continue
        }
    }

    fn dispatch(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameOver {
                score,
                enemy_id,
                enemy_kind,
                difficulty_level,
            } => {
                let report = GameOverReport {
                    score: *score,
                    enemy_id: *enemy_id,
                    enemy_kind: *enemy_kind,
                    difficulty_level: *difficulty_level,
                };
                self.platform.sink.game_over(&report);
            }
            GameEvent::EnemySpawned { id, kind } => {
                log::debug!("Enemy {} ({}) joined", id, kind.as_str());
            }
            other => log::trace!("{:?}", other),
        }
    }

    /// Stop scheduling frames. A frame already running completes.
    pub fn stop(&mut self) {
        if !self.stopped {
            log::info!("Game stopped after {} frames", self.frames);
        }
        self.stopped = true;
    }

    /// Reset score, difficulty and entities and resume the loop
    pub fn restart(&mut self) {
        self.state.reset(self.rng.as_mut());
        self.stopped = false;
        self.restart_requested = false;
        self.last_timestamp = None;
        log::info!("Game restarted");
    }

    /// Restart at the start of the next frame (safe from input callbacks)
    pub fn request_restart(&mut self) {
        self.restart_requested = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Frames rendered since construction
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Minigame for Engine {
    fn name(&self) -> &str {
        "maze"
    }

    fn start(&mut self) {
        self.restart();
    }

    fn stop(&mut self) {
        Engine::stop(self);
    }

    fn is_active(&self) -> bool {
        !self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{FixedCanvas, LogGameOverSink, NullPresenter, ScriptedInput};
    use crate::sim::SpatialQuery;
    use glam::Vec2;

    struct Handles {
        canvas: FixedCanvas,
        input: ScriptedInput,
        presenter: NullPresenter,
        sink: LogGameOverSink,
    }

    fn engine(seed: u64) -> (Engine, Handles) {
        let handles = Handles {
            canvas: FixedCanvas::new(Vec2::new(800.0, 600.0)),
            input: ScriptedInput::idle(),
            presenter: NullPresenter::default(),
            sink: LogGameOverSink::default(),
        };
        let platform = Platform::new(
            handles.canvas.clone(),
            handles.input.clone(),
            handles.presenter.clone(),
            handles.sink.clone(),
        );
        (Engine::with_seed(EngineConfig::default(), platform, seed), handles)
    }

    /// Put the first enemy on the player with no grace left
    fn force_catch(engine: &mut Engine) -> u32 {
        let state = engine.state_mut();
        state.grace_period = 0.0;
        state.enemies[0].pos = state.player.pos;
        state.enemies[0].speed = 0.0;
        state.enemies[0].id
    }

    #[test]
    fn test_first_frame_uses_nominal_dt() {
        let (mut engine, _) = engine(1);
        assert_eq!(engine.frame(5000.0), FrameStatus::Continue);
        assert!((engine.state().elapsed_ms - NOMINAL_FRAME_MS).abs() < 1e-4);

        engine.frame(5020.0);
        assert!((engine.state().elapsed_ms - (NOMINAL_FRAME_MS + 20.0)).abs() < 1e-3);

        // Long stall is clamped
        engine.frame(9000.0);
        assert!((engine.state().elapsed_ms - (NOMINAL_FRAME_MS + 70.0)).abs() < 1e-3);
    }

    #[test]
    fn test_game_over_reported_once_and_drawing_continues() {
        let (mut engine, handles) = engine(2);
        engine.frame(0.0);
        let enemy_id = force_catch(&mut engine);
        let score = engine.state().score;

        engine.frame(16.0);
        engine.frame(32.0);
        engine.frame(48.0);

        assert!(engine.state().is_game_over());
        let reports = handles.sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].enemy_id, enemy_id);
        assert_eq!(reports[0].score, score);
        assert_eq!(reports[0].difficulty_level, 1);
        assert_eq!(engine.state().score, score);
        assert_eq!(handles.presenter.frames(), 4);
    }

    #[test]
    fn test_stop_halts_frames() {
        let (mut engine, handles) = engine(3);
        engine.frame(0.0);
        engine.stop();
        assert_eq!(engine.frame(16.0), FrameStatus::Stopped);
        assert_eq!(handles.presenter.frames(), 1);
        assert!(engine.is_stopped());
        assert!(!Minigame::is_active(&engine));
    }

    #[test]
    fn test_restart_resets_progress() {
        let (mut engine, _) = engine(4);
        {
            let state = engine.state_mut();
            state.score = 450;
            state.difficulty_level = 3;
            state.grace_period = 0.0;
            state.phase = crate::sim::GamePhase::GameOver;
        }
        engine.stop();

        engine.restart();

        let state = engine.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.difficulty_level, 1);
        assert_eq!(state.grace_period, state.tuning.grace_period_ms);
        assert!(state.is_running());
        assert_eq!(state.enemies.len(), state.tuning.initial_enemies);
        for enemy in &state.enemies {
            let gap = enemy.center().distance(state.player.center());
            assert!(gap >= state.tuning.min_spawn_distance, "enemy {} spawned {} px away", enemy.id, gap);
        }
        assert!(!engine.is_stopped());
    }

    #[test]
    fn test_requested_restart_applies_next_frame() {
        let (mut engine, handles) = engine(5);
        engine.frame(0.0);
        force_catch(&mut engine);
        engine.frame(16.0);
        assert!(engine.state().is_game_over());

        engine.request_restart();
        assert!(engine.state().is_game_over());
        engine.frame(32.0);

        assert!(engine.state().is_running());
        assert_eq!(engine.state().difficulty_level, 1);
        // Restart frame scored one idle frame
        assert_eq!(engine.state().score, 1);
        assert_eq!(handles.sink.reports().len(), 1);
    }

    #[test]
    fn test_resize_rebuilds_and_revalidates() {
        let (mut engine, handles) = engine(6);
        engine.frame(0.0);

        handles.canvas.set(Vec2::new(480.0, 800.0));
        engine.frame(16.0);

        let state = engine.state();
        let maze = state.maze.as_ref().unwrap();
        assert_eq!(maze.canvas, Vec2::new(480.0, 800.0));
        assert_eq!(maze.cell_size, 32.0);
        let query = SpatialQuery::new(Some(maze), state.canvas);
        assert!(query.is_on_path(state.player.center()));
        for enemy in &state.enemies {
            assert!(query.is_on_path(enemy.center()));
        }
    }

    #[test]
    fn test_input_moves_player() {
        let (mut engine, handles) = engine(7);
        engine.frame(0.0);
        let start = engine.state().player.pos;
        handles.input.hold(Vec2::new(-1.0, 0.0));
        engine.frame(16.0);
        engine.frame(32.0);
        assert!(engine.state().player.is_moving());
        assert_ne!(engine.state().player.pos, start);
    }

    #[test]
    fn test_requested_restart_resumes_stopped_engine() {
        let (mut engine, handles) = engine(9);
        engine.frame(0.0);
        engine.stop();
        assert_eq!(engine.frame(16.0), FrameStatus::Stopped);

        engine.request_restart();
        assert_eq!(engine.frame(32.0), FrameStatus::Continue);
        assert!(!engine.is_stopped());
        assert_eq!(handles.presenter.frames(), 2);
    }

    #[test]
    fn test_minigame_start_restarts() {
        let (mut engine, _) = engine(8);
        Minigame::stop(&mut engine);
        engine.state_mut().score = 99;
        Minigame::start(&mut engine);
        assert!(Minigame::is_active(&engine));
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.name(), "maze");
    }
}
