//! Roaming enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::choose_new_direction;
use super::entity::{Bounds, Direction, SpriteHandle};
use super::query::SpatialQuery;
use super::rng::RandomSource;
use crate::consts::STUCK_EPSILON;
use crate::tuning::Tuning;

/// Enemy skins. Each tweaks speed and restlessness slightly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Blob,
    Spiky,
    Phantom,
    Robot,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Blob,
        EnemyKind::Spiky,
        EnemyKind::Phantom,
        EnemyKind::Robot,
    ];
    pub const COUNT: usize = Self::ALL.len();

    /// Kinds cycle in spawn order
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    pub fn index(self) -> usize {
        match self {
            EnemyKind::Blob => 0,
            EnemyKind::Spiky => 1,
            EnemyKind::Phantom => 2,
            EnemyKind::Robot => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Blob => "blob",
            EnemyKind::Spiky => "spiky",
            EnemyKind::Phantom => "phantom",
            EnemyKind::Robot => "robot",
        }
    }

    /// Multiplier on the tuned enemy base speed
    pub fn speed_factor(self) -> f32 {
        match self {
            EnemyKind::Blob => 1.0,
            EnemyKind::Spiky => 1.2,
            EnemyKind::Phantom => 0.9,
            EnemyKind::Robot => 1.0,
        }
    }

    /// Multiplier on the tuned direction-change interval
    pub fn interval_factor(self) -> f32 {
        match self {
            EnemyKind::Blob => 1.0,
            EnemyKind::Spiky => 0.8,
            EnemyKind::Phantom => 0.7,
            EnemyKind::Robot => 1.5,
        }
    }
}

/// A candidate move, checked before it is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveProposal {
    pub from: Vec2,
    pub to: Vec2,
    pub dir: Vec2,
    pub distance: f32,
}

/// A wandering enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Top-left corner (pixels)
    pub pos: Vec2,
    pub size: Vec2,
    /// Current pixels per second (grows with difficulty)
    pub speed: f32,
    pub base_speed: f32,
    pub direction: Direction,
    /// Time since the last direction change (ms)
    pub direction_timer: f32,
    /// Current change interval (shrinks with difficulty)
    pub direction_change_interval: f32,
    pub base_interval: f32,
    /// Interval plus this heading's random jitter
    pub direction_threshold: f32,
    pub jitter_ms: f32,
    pub sprite: SpriteHandle,
    pub hitbox_shrink: f32,
    pub max_frame_ms: f32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, sprite: SpriteHandle, scale: f32, tuning: &Tuning) -> Self {
        let base_speed = tuning.enemy_base_speed * kind.speed_factor();
        let base_interval = tuning.direction_interval_ms * kind.interval_factor();
        Self {
            id,
            kind,
            pos: Vec2::ZERO,
            size: sprite.size() * scale,
            speed: base_speed,
            base_speed,
            direction: Direction::None,
            direction_timer: 0.0,
            direction_change_interval: base_interval,
            base_interval,
            direction_threshold: base_interval,
            jitter_ms: tuning.direction_jitter_ms,
            sprite,
            hitbox_shrink: tuning.hitbox_shrink,
            max_frame_ms: tuning.max_frame_ms,
        }
    }

    /// Advance one frame: try the current heading, then re-plan if blocked,
    /// stuck, or the heading has run its course.
    pub fn update(&mut self, dt_ms: f32, query: &SpatialQuery, rng: &mut dyn RandomSource) {
        let dt = dt_ms.clamp(0.0, self.max_frame_ms);
        self.direction_timer += dt;

        let distance = self.speed * dt / 1000.0;
        let proposal = self.propose_move(distance);
        let committed = self.validate_move(&proposal, query);
        if committed {
            self.pos = proposal.to;
        }

        let stuck = distance > 0.0 && (!committed || proposal.from.distance(proposal.to) < STUCK_EPSILON);
        if stuck || self.direction_timer > self.direction_threshold {
            self.change_direction(query, rng);
        }
    }

    /// Where the current heading would take us
    pub fn propose_move(&self, distance: f32) -> MoveProposal {
        let dir = self.direction.to_vec();
        MoveProposal {
            from: self.pos,
            to: self.pos + dir * distance,
            dir,
            distance,
        }
    }

    /// A proposal is accepted only if the box stays clear of walls and the
    /// resulting center still sits on a path cell.
    pub fn validate_move(&self, proposal: &MoveProposal, query: &SpatialQuery) -> bool {
        if self.direction == Direction::None {
            return false;
        }
        query.is_valid_move(proposal.from, self.size, proposal.dir, proposal.distance)
            && query.is_on_path(proposal.to + self.size / 2.0)
    }

    /// Pick a fresh heading and roll the next change threshold
    pub fn change_direction(&mut self, query: &SpatialQuery, rng: &mut dyn RandomSource) {
        self.direction = choose_new_direction(self.direction, self.pos, self.size, query, rng);
        self.direction_timer = 0.0;
        self.direction_threshold = self.direction_change_interval + rng.next_unit() * self.jitter_ms;
    }

    /// Apply difficulty scaling to speed and restlessness
    pub fn apply_difficulty(&mut self, level: u32, tuning: &Tuning) {
        self.speed = tuning.enemy_speed_at(self.base_speed, level);
        self.direction_change_interval = tuning.direction_interval_at(self.base_interval, level);
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Collision box (inset from the sprite)
    pub fn bounds(&self) -> Bounds {
        Bounds::from_rect(self.pos, self.size).inset(self.hitbox_shrink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::MazeGrid;
    use crate::sim::rng::ScriptedRandom;

    // 600x600 -> 40px cells, offset (160, 240); row 1 is a corridor
    const CORRIDOR: [&str; 3] = ["#######", "#.....#", "#######"];

    fn enemy(kind: EnemyKind) -> Enemy {
        Enemy::new(7, kind, SpriteHandle::new(1, 32.0, 32.0), 1.0, &Tuning::default())
    }

    #[test]
    fn test_kind_factors() {
        let tuning = Tuning::default();
        let spiky = enemy(EnemyKind::Spiky);
        assert!((spiky.base_speed - tuning.enemy_base_speed * 1.2).abs() < 1e-4);
        assert_eq!(EnemyKind::from_index(5), EnemyKind::Spiky);
        for kind in EnemyKind::ALL {
            assert_eq!(EnemyKind::from_index(kind.index()), kind);
        }
    }

    #[test]
    fn test_moves_along_heading() {
        let maze = MazeGrid::from_layout(&CORRIDOR, 600.0, 600.0);
        let query = SpatialQuery::new(Some(&maze), maze.canvas);
        let mut rng = ScriptedRandom::first();
        let mut e = enemy(EnemyKind::Blob);
        e.pos = maze.cell_origin(1, 2) + Vec2::splat(4.0);
        e.direction = Direction::Right;

        let start = e.pos;
        e.update(20.0, &query, &mut rng);
        assert!((e.pos.x - (start.x + 2.0)).abs() < 1e-4);
        assert_eq!(e.direction, Direction::Right);
    }

    #[test]
    fn test_blocked_move_is_discarded_and_replanned() {
        let maze = MazeGrid::from_layout(&CORRIDOR, 600.0, 600.0);
        let query = SpatialQuery::new(Some(&maze), maze.canvas);
        let mut rng = ScriptedRandom::first();
        let mut e = enemy(EnemyKind::Blob);
        // Flush against the east wall, heading into it
        e.pos = maze.cell_origin(1, 5) + Vec2::new(8.0, 4.0);
        e.direction = Direction::Right;
        e.direction_timer = 500.0;

        let start = e.pos;
        e.update(16.0, &query, &mut rng);

        assert_eq!(e.pos, start);
        assert_eq!(e.direction_timer, 0.0);
        // Boxed in except for the reverse: fallback picks cardinal index 0
        assert_eq!(e.direction, Direction::Right);
    }

    #[test]
    fn test_validate_rejects_center_off_path() {
        // Box fits between walls but its center would land outside the grid
        let maze = MazeGrid::from_layout(&CORRIDOR, 600.0, 600.0);
        let query = SpatialQuery::new(Some(&maze), maze.canvas);
        let mut e = enemy(EnemyKind::Blob);
        e.pos = Vec2::new(10.0, 10.0);
        e.direction = Direction::Down;
        let proposal = e.propose_move(5.0);
        assert!(query.is_valid_move(proposal.from, e.size, proposal.dir, proposal.distance));
        assert!(!e.validate_move(&proposal, &query));
    }

    #[test]
    fn test_validate_without_heading_fails() {
        let query = SpatialQuery::new(None, Vec2::new(800.0, 600.0));
        let e = enemy(EnemyKind::Robot);
        let proposal = e.propose_move(3.0);
        assert_eq!(proposal.from, proposal.to);
        assert!(!e.validate_move(&proposal, &query));
    }

    #[test]
    fn test_timer_expiry_triggers_new_heading() {
        let query = SpatialQuery::new(None, Vec2::new(800.0, 600.0));
        // Pick index 2 of [Right, Down, Up] (Left excluded): Up; jitter 0.5
        let mut rng = ScriptedRandom::new(vec![2], vec![0.5]);
        let mut e = enemy(EnemyKind::Blob);
        e.pos = Vec2::new(300.0, 300.0);
        e.direction = Direction::Right;
        e.direction_threshold = 100.0;
        e.direction_timer = 90.0;

        e.update(16.0, &query, &mut rng);

        assert_eq!(e.direction, Direction::Up);
        assert_eq!(e.direction_timer, 0.0);
        assert!((e.direction_threshold - (2000.0 + 1000.0)).abs() < 1e-3);
    }

    #[test]
    fn test_apply_difficulty() {
        let tuning = Tuning::default();
        let mut e = enemy(EnemyKind::Blob);
        e.apply_difficulty(3, &tuning);
        assert_eq!(e.speed, 130.0);
        assert_eq!(e.direction_change_interval, 1700.0);
    }
}
