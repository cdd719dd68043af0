//! Data-driven game balance
//!
//! Every gameplay number that designers may want to tweak lives here. Values
//! load from JSON with per-field defaults, so partial overrides are fine.

use serde::{Deserialize, Serialize};

/// Gameplay tuning knobs (times in milliseconds, speeds in pixels/second)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Largest delta time fed into a single update
    pub max_frame_ms: f32,

    // === Player ===
    pub player_speed: f32,
    /// Mouth toggle period (cosmetic)
    pub player_animation_ms: f32,

    // === Enemies ===
    pub enemy_base_speed: f32,
    pub initial_enemies: usize,
    pub max_enemies: usize,
    /// Base time before an enemy picks a fresh direction
    pub direction_interval_ms: f32,
    /// Random extra added on top of the interval (0..jitter)
    pub direction_jitter_ms: f32,
    /// Interval shrink per difficulty level
    pub interval_step_ms: f32,
    pub min_direction_interval_ms: f32,
    /// Preferred spawn distance from the player
    pub min_spawn_distance: f32,

    // === Collision ===
    /// Hitbox inset per side
    pub hitbox_shrink: f32,
    /// Grace period after (re)start
    pub grace_period_ms: f32,
    /// Grace period granted after each escalation
    pub escalation_grace_ms: f32,

    // === Difficulty ===
    pub difficulty_interval_ms: f32,
    pub speed_per_level: f32,

    // === Scoring (per frame, multiplied by difficulty level) ===
    pub score_moving: u64,
    pub score_idle: u64,

    /// How often entities are checked for drifting into walls
    pub validation_interval_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_frame_ms: 50.0,

            player_speed: 200.0,
            player_animation_ms: 150.0,

            enemy_base_speed: 100.0,
            initial_enemies: 3,
            max_enemies: 8,
            direction_interval_ms: 2000.0,
            direction_jitter_ms: 2000.0,
            interval_step_ms: 150.0,
            min_direction_interval_ms: 600.0,
            min_spawn_distance: 150.0,

            hitbox_shrink: 4.0,
            grace_period_ms: 3000.0,
            escalation_grace_ms: 1000.0,

            difficulty_interval_ms: 15000.0,
            speed_per_level: 15.0,

            score_moving: 2,
            score_idle: 1,

            validation_interval_ms: 1000.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Clamp values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.max_frame_ms <= 0.0 {
            self.max_frame_ms = defaults.max_frame_ms;
        }
        if self.player_animation_ms <= 0.0 {
            self.player_animation_ms = defaults.player_animation_ms;
        }
        if self.difficulty_interval_ms <= 0.0 {
            self.difficulty_interval_ms = defaults.difficulty_interval_ms;
        }
        if self.validation_interval_ms <= 0.0 {
            self.validation_interval_ms = defaults.validation_interval_ms;
        }
        self.player_speed = self.player_speed.max(0.0);
        self.enemy_base_speed = self.enemy_base_speed.max(0.0);
        self.direction_jitter_ms = self.direction_jitter_ms.max(0.0);
        self.min_direction_interval_ms = self.min_direction_interval_ms.max(1.0);
        self.direction_interval_ms = self
            .direction_interval_ms
            .max(self.min_direction_interval_ms);
        self.hitbox_shrink = self.hitbox_shrink.max(0.0);
        self.grace_period_ms = self.grace_period_ms.max(0.0);
        self.escalation_grace_ms = self.escalation_grace_ms.max(0.0);
        self.max_enemies = self.max_enemies.max(self.initial_enemies);

        self
    }

    /// Enemy speed for a given difficulty level
    pub fn enemy_speed_at(&self, base_speed: f32, level: u32) -> f32 {
        base_speed + level.saturating_sub(1) as f32 * self.speed_per_level
    }

    /// Direction-change interval for a given difficulty level
    pub fn direction_interval_at(&self, base_interval: f32, level: u32) -> f32 {
        let shrink = level.saturating_sub(1) as f32 * self.interval_step_ms;
        (base_interval - shrink).max(self.min_direction_interval_ms)
    }
}
