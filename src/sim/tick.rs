//! Per-frame simulation step
//!
//! Order matters and is fixed: player, enemies (list order), grace/collision,
//! difficulty, score, drift validation.

use glam::Vec2;

use super::collision::check_player_vs_enemies;
use super::query::SpatialQuery;
use super::rng::RandomSource;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction, each axis in {-1, 0, 1}
    pub direction: Vec2,
}

/// Advance the game state by one frame of `dt_ms` milliseconds
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    dt_ms: f32,
    rng: &mut dyn RandomSource,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Frozen until restart
    if state.phase == GamePhase::GameOver {
        return events;
    }

    let dt = dt_ms.clamp(0.0, state.tuning.max_frame_ms);
    state.elapsed_ms += dt;

    {
        let query = SpatialQuery::new(state.maze.as_ref(), state.canvas);
        state.player.update(input.direction, dt, &query);
        for enemy in &mut state.enemies {
            enemy.update(dt, &query, rng);
        }
    }

    if state.grace_period > 0.0 {
        state.grace_period = (state.grace_period - dt).max(0.0);
    } else if let Some(enemy) = check_player_vs_enemies(&state.player, &state.enemies) {
        let event = GameEvent::GameOver {
            score: state.score,
            enemy_id: enemy.id,
            enemy_kind: enemy.kind,
            difficulty_level: state.difficulty_level,
        };
        log::info!(
            "Caught by {} #{} at level {} (score {})",
            enemy.kind.as_str(),
            enemy.id,
            state.difficulty_level,
            state.score
        );
        state.phase = GamePhase::GameOver;
        events.push(event);
        return events;
    }

    state.difficulty_timer += dt;
    if state.difficulty_timer >= state.tuning.difficulty_interval_ms {
        state.difficulty_timer = 0.0;
        events.extend(state.escalate(rng));
    }

    let per_frame = if state.player.is_moving() {
        state.tuning.score_moving
    } else {
        state.tuning.score_idle
    };
    state.score += per_frame * u64::from(state.difficulty_level);

    state.validation_timer += dt;
    if state.validation_timer >= state.tuning.validation_interval_ms {
        state.validation_timer = 0.0;
        events.extend(state.validate_positions(rng));
    }

    events
}
