//! Maze Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use maze_dash::engine::{Engine, EngineConfig};
    use maze_dash::platform::{
        CanvasProvider, GameOverReport, GameOverSink, InputProvider, Platform, Presenter,
    };
    use maze_dash::sim::{Cell, EnemyKind, GameState};
    use maze_dash::{DeviceProfile, FrameStatus, Settings};

    /// Held arrow/WASD keys plus the latest touch steer
    #[derive(Default)]
    struct HeldKeys {
        left: bool,
        right: bool,
        up: bool,
        down: bool,
        touch: Option<Vec2>,
    }

    impl HeldKeys {
        fn set(&mut self, key: &str, down: bool) -> bool {
            match key {
                "ArrowLeft" | "a" | "A" => self.left = down,
                "ArrowRight" | "d" | "D" => self.right = down,
                "ArrowUp" | "w" | "W" => self.up = down,
                "ArrowDown" | "s" | "S" => self.down = down,
                _ => return false,
            }
            true
        }

        fn direction(&self) -> Vec2 {
            if let Some(touch) = self.touch {
                return touch;
            }
            let axis = |neg: bool, pos: bool| match (neg, pos) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            };
            Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
        }
    }

    struct KeyboardInput(Rc<RefCell<HeldKeys>>);

    impl InputProvider for KeyboardInput {
        fn direction(&mut self) -> Vec2 {
            self.0.borrow().direction()
        }
    }

    /// Canvas backing store tracks its CSS size every frame
    struct BrowserCanvas(HtmlCanvasElement);

    impl CanvasProvider for BrowserCanvas {
        fn dimensions(&self) -> Vec2 {
            let (w, h) = (self.0.client_width().max(1), self.0.client_height().max(1));
            if self.0.width() != w as u32 || self.0.height() != h as u32 {
                self.0.set_width(w as u32);
                self.0.set_height(h as u32);
            }
            Vec2::new(w as f32, h as f32)
        }
    }

    struct CanvasPresenter {
        ctx: CanvasRenderingContext2d,
        score_el: Option<web_sys::Element>,
        level_el: Option<web_sys::Element>,
    }

    fn enemy_color(kind: EnemyKind) -> &'static str {
        match kind {
            EnemyKind::Blob => "#e74c3c",
            EnemyKind::Spiky => "#9b59b6",
            EnemyKind::Phantom => "#5dade2",
            EnemyKind::Robot => "#95a5a6",
        }
    }

    impl Presenter for CanvasPresenter {
        fn draw(&mut self, state: &GameState) {
            let ctx = &self.ctx;
            ctx.set_fill_style_str("#0b0b1e");
            ctx.fill_rect(0.0, 0.0, state.canvas.x as f64, state.canvas.y as f64);

            if let Some(maze) = &state.maze {
                ctx.set_fill_style_str("#1f3fbf");
                let size = maze.cell_size as f64;
                for (row, col, cell) in maze.iter() {
                    if cell == Cell::Wall {
                        let origin = maze.cell_origin(row, col);
                        ctx.fill_rect(origin.x as f64, origin.y as f64, size, size);
                    }
                }
            }

            for enemy in &state.enemies {
                ctx.set_fill_style_str(enemy_color(enemy.kind));
                ctx.fill_rect(
                    enemy.pos.x as f64,
                    enemy.pos.y as f64,
                    enemy.size.x as f64,
                    enemy.size.y as f64,
                );
            }

            // Blink while invulnerable
            let blink = state.grace_period > 0.0 && (state.grace_period / 150.0) as u32 % 2 == 1;
            if !blink {
                let player = &state.player;
                let color = if player.mouth_open { "#f1c40f" } else { "#f39c12" };
                ctx.set_fill_style_str(color);
                ctx.fill_rect(
                    player.pos.x as f64,
                    player.pos.y as f64,
                    player.size.x as f64,
                    player.size.y as f64,
                );
            }

            if let Some(el) = &self.score_el {
                el.set_text_content(Some(&state.score.to_string()));
            }
            if let Some(el) = &self.level_el {
                el.set_text_content(Some(&state.difficulty_level.to_string()));
            }
        }
    }

    struct OverlaySink;

    impl GameOverSink for OverlaySink {
        fn game_over(&mut self, report: &GameOverReport) {
            log::info!(
                "Game over: score {} (caught by {})",
                report.score,
                report.enemy_kind.as_str()
            );
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&report.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("final-level") {
                el.set_text_content(Some(&report.difficulty_level.to_string()));
            }
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", "");
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Maze Dash starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        // Narrow screens get the compact profile
        let inner_width = window.inner_width()?.as_f64().unwrap_or(1024.0);
        let profile = if inner_width < 768.0 {
            DeviceProfile::Compact
        } else {
            DeviceProfile::Desktop
        };
        let seed = js_sys::Date::now() as u64;

        let keys = Rc::new(RefCell::new(HeldKeys::default()));
        let platform = Platform::new(
            BrowserCanvas(canvas.clone()),
            KeyboardInput(keys.clone()),
            CanvasPresenter {
                ctx,
                score_el: document.get_element_by_id("score"),
                level_el: document.get_element_by_id("level"),
            },
            OverlaySink,
        );
        let config = EngineConfig {
            settings: Settings::from_profile(profile),
            ..EngineConfig::default()
        };
        let engine = Rc::new(RefCell::new(Engine::with_seed(config, platform, seed)));

        setup_keyboard(keys.clone())?;
        setup_touch(&canvas, keys)?;
        setup_restart_button(engine.clone());

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        request_animation_frame(engine);

        log::info!("Maze Dash running!");
        Ok(())
    }

    fn setup_keyboard(keys: Rc<RefCell<HeldKeys>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        for (event_name, down) in [("keydown", true), ("keyup", false)] {
            let keys = keys.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut held = keys.borrow_mut();
                if held.set(&event.key(), down) {
                    held.touch = None;
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Steer toward the touch point relative to the canvas center, along
    /// the dominant axis
    fn setup_touch(canvas: &HtmlCanvasElement, keys: Rc<RefCell<HeldKeys>>) -> Result<(), JsValue> {
        for event_name in ["touchstart", "touchmove"] {
            let keys = keys.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let dx = touch.client_x() as f32 - (rect.left() + rect.width() / 2.0) as f32;
                    let dy = touch.client_y() as f32 - (rect.top() + rect.height() / 2.0) as f32;
                    let dir = if dx.abs() > dy.abs() {
                        Vec2::new(dx.signum(), 0.0)
                    } else {
                        Vec2::new(0.0, dy.signum())
                    };
                    keys.borrow_mut().touch = Some(dir);
                }
            });
            canvas.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
            keys.borrow_mut().touch = None;
        });
        canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_restart_button(engine: Rc<RefCell<Engine>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                // Applied at the start of the next frame
                engine.borrow_mut().request_restart();
                if let Some(el) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("game-over"))
                {
                    let _ = el.set_attribute("class", "hidden");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(engine: Rc<RefCell<Engine>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(engine, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(engine: Rc<RefCell<Engine>>, time: f64) {
        let status = engine.borrow_mut().frame(time);
        if status == FrameStatus::Stopped {
            log::info!("Frame loop ended");
            return;
        }
        request_animation_frame(engine);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Maze Dash (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the playable version");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a scripted run against the headless platform and log the outcome.
///
/// Optional first argument: path to a tuning JSON file.
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use glam::Vec2;
    use maze_dash::engine::{Engine, EngineConfig};
    use maze_dash::platform::{
        FixedCanvas, LogGameOverSink, NullPresenter, Platform, ScriptedInput,
    };
    use maze_dash::{FrameStatus, Settings, Tuning};

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Bad tuning file {}: {}; using defaults", path, e);
                Tuning::default()
            }),
            Err(e) => {
                log::warn!("Can't read {}: {}; using defaults", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let settings = Settings::default();
    let seed = settings.seed.unwrap_or(0x5eed);

    // Sweep around the maze: right, down, left, up, a couple of seconds each
    let lap: Vec<Vec2> = [Vec2::X, Vec2::Y, Vec2::NEG_X, Vec2::NEG_Y]
        .into_iter()
        .flat_map(|dir| std::iter::repeat_n(dir, 120))
        .collect();
    let input = ScriptedInput::new(lap.iter().copied().cycle().take(lap.len() * 20));
    let presenter = NullPresenter::default();
    let sink = LogGameOverSink::default();

    let platform = Platform::new(
        FixedCanvas::new(Vec2::new(800.0, 600.0)),
        input,
        presenter.clone(),
        sink.clone(),
    );
    let config = EngineConfig {
        settings,
        tuning,
        ..EngineConfig::default()
    };
    let mut engine = Engine::with_seed(config, platform, seed);

    let frame_ms = 1000.0 / 60.0;
    let max_frames = 60 * 120;
    let mut time = 0.0;
    for _ in 0..max_frames {
        if engine.frame(time) == FrameStatus::Stopped || engine.state().is_game_over() {
            break;
        }
        time += frame_ms;
    }

    let state = engine.state();
    log::info!(
        "Demo finished after {} frames: score {}, level {}, {} enemies{}",
        presenter.frames(),
        state.score,
        state.difficulty_level,
        state.enemies.len(),
        if sink.reports().is_empty() { "" } else { " (caught)" }
    );
}
