//! Game state and core simulation types
//!
//! One `GameState` per simulation. Nothing here is global, so independent
//! games (and tests) never interfere.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use super::entity::{Bounds, SpriteHandle};
use super::maze::MazeGrid;
use super::player::Player;
use super::query::SpatialQuery;
use super::rng::RandomSource;
use super::spawn::{
    nearest_safe_position, parking_position, place_enemy, place_player, recenter_in_cell,
};
use crate::consts::{BASE_SPRITE_SIZE, ENTITY_CELL_FRACTION};
use crate::settings::DeviceProfile;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Player was caught; frozen until restart
    GameOver,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameOver {
        score: u64,
        enemy_id: u32,
        enemy_kind: EnemyKind,
        difficulty_level: u32,
    },
    DifficultyUp {
        level: u32,
    },
    EnemySpawned {
        id: u32,
        kind: EnemyKind,
    },
    PlayerRecovered,
    EnemyRecovered {
        id: u32,
    },
}

/// Sprite handles supplied by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assets {
    pub player: SpriteHandle,
    /// Indexed by `EnemyKind::index()`
    pub enemies: [SpriteHandle; EnemyKind::COUNT],
}

impl Default for Assets {
    fn default() -> Self {
        let placeholder = |id| SpriteHandle::new(id, BASE_SPRITE_SIZE, BASE_SPRITE_SIZE);
        Self {
            player: placeholder(0),
            enemies: [placeholder(1), placeholder(2), placeholder(3), placeholder(4)],
        }
    }
}

impl Assets {
    pub fn enemy(&self, kind: EnemyKind) -> SpriteHandle {
        self.enemies[kind.index()]
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    /// Starts at 1
    pub difficulty_level: u32,
    /// Time since the last escalation (ms)
    pub difficulty_timer: f32,
    /// Remaining collision immunity (ms)
    pub grace_period: f32,
    /// Time since the last drift check (ms)
    pub validation_timer: f32,
    /// Total simulated time this run (ms)
    pub elapsed_ms: f32,
    pub player: Player,
    /// Updated in list order every tick
    pub enemies: Vec<Enemy>,
    pub maze: Option<MazeGrid>,
    pub canvas: Vec2,
    pub profile: DeviceProfile,
    pub tuning: Tuning,
    pub assets: Assets,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a state with no maze and no entities placed yet
    pub fn new(profile: DeviceProfile, tuning: Tuning, assets: Assets) -> Self {
        let player = Player::new(assets.player, profile.sprite_scale(), &tuning);
        Self {
            phase: GamePhase::Running,
            score: 0,
            difficulty_level: 1,
            difficulty_timer: 0.0,
            grace_period: tuning.grace_period_ms,
            validation_timer: 0.0,
            elapsed_ms: 0.0,
            player,
            enemies: Vec::new(),
            maze: None,
            canvas: Vec2::ZERO,
            profile,
            tuning,
            assets,
            next_id: 1,
        }
    }

    /// Build the maze for `canvas` and place everything for a fresh run
    pub fn start(
        canvas: Vec2,
        profile: DeviceProfile,
        tuning: Tuning,
        assets: Assets,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let mut state = Self::new(profile, tuning, assets);
        state.resize(canvas);
        state.reset(rng);
        state
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn min_openness(&self) -> u8 {
        self.profile.spawn_openness()
    }

    /// Sprite size after device scaling, shrunk to fit a maze cell
    fn fitted_size(&self, sprite: SpriteHandle) -> Vec2 {
        let scaled = sprite.size() * self.profile.sprite_scale();
        match &self.maze {
            Some(maze) => fit_to_cell(scaled, maze.cell_size),
            None => scaled,
        }
    }

    /// Rebuild the maze if the canvas changed. Returns true if rebuilt.
    ///
    /// Entities are resized for the new cells and carried to the same spot
    /// on the new grid; `validate_positions` cleans up whatever still
    /// doesn't fit.
    pub fn resize(&mut self, canvas: Vec2) -> bool {
        self.canvas = canvas;
        let stale = match &self.maze {
            Some(maze) => !maze.matches_canvas(canvas),
            None => true,
        };
        if stale {
            let maze = MazeGrid::build(canvas.x, canvas.y);
            log::debug!(
                "Maze built for {}x{} (cell {:.1}px)",
                canvas.x,
                canvas.y,
                maze.cell_size
            );
            let previous = self.maze.replace(maze);
            self.refit_entities(previous.as_ref());
        }
        stale
    }

    fn refit_entities(&mut self, previous: Option<&MazeGrid>) {
        let Some(maze) = self.maze.as_ref() else {
            return;
        };
        let scale = self.profile.sprite_scale();
        let reseat = |pos: Vec2, old_size: Vec2, size: Vec2| {
            if pos == parking_position() {
                return pos;
            }
            let center = pos + old_size / 2.0;
            let center = match previous {
                Some(old) => maze.map_point_from(old, center),
                None => center,
            };
            center - size / 2.0
        };

        let size = fit_to_cell(self.player.sprite.size() * scale, maze.cell_size);
        self.player.pos = reseat(self.player.pos, self.player.size, size);
        self.player.size = size;

        for enemy in &mut self.enemies {
            let size = fit_to_cell(enemy.sprite.size() * scale, maze.cell_size);
            enemy.pos = reseat(enemy.pos, enemy.size, size);
            enemy.size = size;
        }
    }

    /// Reset score, difficulty and timers and re-place every entity.
    /// The maze is kept.
    pub fn reset(&mut self, rng: &mut dyn RandomSource) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.difficulty_level = 1;
        self.difficulty_timer = 0.0;
        self.grace_period = self.tuning.grace_period_ms;
        self.validation_timer = 0.0;
        self.elapsed_ms = 0.0;

        self.player = Player::new(self.assets.player, self.profile.sprite_scale(), &self.tuning);
        self.player.size = self.fitted_size(self.assets.player);
        self.place_player();

        self.enemies.clear();
        for _ in 0..self.tuning.initial_enemies {
            self.spawn_enemy(rng);
        }
    }

    fn place_player(&mut self) {
        let query = SpatialQuery::new(self.maze.as_ref(), self.canvas);
        let centered = (self.canvas - self.player.size) / 2.0;
        self.player.pos = match self.maze {
            Some(_) => place_player(&query, self.player.size, self.min_openness()).unwrap_or_else(|| {
                log::warn!("No safe cell for the player; parking off-screen");
                parking_position()
            }),
            None => centered,
        };
    }

    /// Add one enemy if below the cap. Returns its ID.
    pub fn spawn_enemy(&mut self, rng: &mut dyn RandomSource) -> Option<u32> {
        if self.enemies.len() >= self.tuning.max_enemies {
            return None;
        }

        let id = self.next_entity_id();
        let kind = EnemyKind::from_index(self.enemies.len());
        let mut enemy = Enemy::new(
            id,
            kind,
            self.assets.enemy(kind),
            self.profile.sprite_scale(),
            &self.tuning,
        );
        enemy.size = self.fitted_size(enemy.sprite);
        enemy.apply_difficulty(self.difficulty_level, &self.tuning);

        let query = SpatialQuery::new(self.maze.as_ref(), self.canvas);
        enemy.pos = self.enemy_spawn_point(&query, enemy.size, rng);
        enemy.change_direction(&query, rng);

        self.enemies.push(enemy);
        Some(id)
    }

    fn enemy_spawn_point(&self, query: &SpatialQuery, size: Vec2, rng: &mut dyn RandomSource) -> Vec2 {
        let occupied: Vec<Bounds> = self
            .enemies
            .iter()
            .map(|e| Bounds::from_rect(e.pos, e.size))
            .collect();
        let spot = place_enemy(
            query,
            size,
            self.min_openness(),
            self.player.center(),
            self.tuning.min_spawn_distance,
            &occupied,
            rng,
        );
        spot.unwrap_or_else(|| {
            log::warn!("No safe cell for an enemy; parking off-screen");
            parking_position()
        })
    }

    /// Level up: faster enemies, maybe one more of them, and a short grace
    pub fn escalate(&mut self, rng: &mut dyn RandomSource) -> Vec<GameEvent> {
        self.difficulty_level += 1;
        let level = self.difficulty_level;

        for enemy in &mut self.enemies {
            enemy.apply_difficulty(level, &self.tuning);
        }

        let mut events = vec![GameEvent::DifficultyUp { level }];
        if let Some(id) = self.spawn_enemy(rng) {
            let kind = self
                .enemies
                .last()
                .map(|e| e.kind)
                .unwrap_or(EnemyKind::Blob);
            events.push(GameEvent::EnemySpawned { id, kind });
        }

        self.grace_period = self.grace_period.max(self.tuning.escalation_grace_ms);
        log::info!(
            "Difficulty {} ({} enemies)",
            level,
            self.enemies.len()
        );
        events
    }

    /// Move any entity that left the paths, or whose box overlaps a wall,
    /// back onto a safe cell. A box whose center is still on a path is first
    /// re-centered in that cell.
    pub fn validate_positions(&mut self, rng: &mut dyn RandomSource) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.maze.is_none() {
            return events;
        }

        let openness = self.min_openness();

        let query = SpatialQuery::new(self.maze.as_ref(), self.canvas);
        let fits = |pos: Vec2, size: Vec2| {
            query.is_on_path(pos + size / 2.0) && query.is_valid_move(pos, size, Vec2::ZERO, 0.0)
        };

        if !fits(self.player.pos, self.player.size) {
            let (pos, size, center) = (self.player.pos, self.player.size, self.player.center());
            let rescue = recenter_in_cell(&query, pos, size)
                .or_else(|| nearest_safe_position(&query, size, openness, center));
            if let Some(pos) = rescue {
                log::debug!("Player drifted off the maze; moved to {:?}", pos);
                self.player.pos = pos;
                events.push(GameEvent::PlayerRecovered);
            }
        }

        for index in 0..self.enemies.len() {
            let (pos, size) = (self.enemies[index].pos, self.enemies[index].size);
            if fits(pos, size) {
                continue;
            }
            if let Some(fixed) = recenter_in_cell(&query, pos, size) {
                let enemy = &mut self.enemies[index];
                log::debug!("Enemy {} overlapped a wall; re-centered at {:?}", enemy.id, fixed);
                enemy.pos = fixed;
                enemy.change_direction(&query, rng);
                events.push(GameEvent::EnemyRecovered { id: enemy.id });
                continue;
            }

            let occupied: Vec<Bounds> = self
                .enemies
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != index)
                .map(|(_, e)| Bounds::from_rect(e.pos, e.size))
                .collect();
            let spot = place_enemy(
                &query,
                size,
                openness,
                self.player.center(),
                self.tuning.min_spawn_distance,
                &occupied,
                rng,
            );

            let enemy = &mut self.enemies[index];
            match spot {
                Some(pos) => {
                    log::debug!("Enemy {} drifted off the maze; moved to {:?}", enemy.id, pos);
                    enemy.pos = pos;
                    enemy.change_direction(&query, rng);
                    events.push(GameEvent::EnemyRecovered { id: enemy.id });
                }
                None => {
                    if enemy.pos != parking_position() {
                        log::warn!("No safe cell for enemy {}; parking off-screen", enemy.id);
                        enemy.pos = parking_position();
                    }
                }
            }
        }

        events
    }
}

/// Scale `size` down uniformly so its longest edge fits the cell
fn fit_to_cell(size: Vec2, cell_size: f32) -> Vec2 {
    let cap = cell_size * ENTITY_CELL_FRACTION;
    let longest = size.max_element();
    if longest > cap && longest > 0.0 {
        size * (cap / longest)
    } else {
        size
    }
}
