//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame delta, clamped
//! - Randomness only through a `RandomSource`
//! - Stable iteration order (enemy list order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod enemy;
pub mod entity;
pub mod maze;
pub mod player;
pub mod query;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use ai::choose_new_direction;
pub use collision::{check_player_vs_enemies, overlap};
pub use enemy::{Enemy, EnemyKind, MoveProposal};
pub use entity::{Bounds, Direction, SpriteHandle};
pub use maze::{Cell, MazeGrid, DEFAULT_LAYOUT};
pub use player::Player;
pub use query::SpatialQuery;
pub use rng::{RandomSource, ScriptedRandom, SimRng};
pub use spawn::{nearest_safe_position, parking_position, place_enemy, place_player};
pub use state::{Assets, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
