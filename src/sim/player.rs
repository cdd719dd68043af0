//! The player avatar

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Bounds, SpriteHandle};
use super::query::SpatialQuery;
use crate::tuning::Tuning;

/// Player-controlled avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner (pixels)
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per second
    pub speed: f32,
    /// Last input direction, each axis in {-1, 0, 1}
    pub direction: Vec2,
    pub sprite: SpriteHandle,
    /// Cosmetic chomp state
    pub mouth_open: bool,
    pub animation_timer: f32,
    pub animation_interval: f32,
    pub hitbox_shrink: f32,
    pub max_frame_ms: f32,
}

impl Player {
    pub fn new(sprite: SpriteHandle, scale: f32, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            size: sprite.size() * scale,
            speed: tuning.player_speed,
            direction: Vec2::ZERO,
            sprite,
            mouth_open: true,
            animation_timer: 0.0,
            animation_interval: tuning.player_animation_ms,
            hitbox_shrink: tuning.hitbox_shrink,
            max_frame_ms: tuning.max_frame_ms,
        }
    }

    /// Move along `direction` for `dt_ms`, one axis at a time so the player
    /// slides along walls instead of sticking to them.
    pub fn update(&mut self, direction: Vec2, dt_ms: f32, query: &SpatialQuery) {
        let dt = dt_ms.clamp(0.0, self.max_frame_ms);
        self.direction = axis_signs(direction);
        let distance = self.speed * dt / 1000.0;

        if self.direction.x != 0.0 {
            let step = Vec2::new(self.direction.x, 0.0);
            if query.is_valid_move(self.pos, self.size, step, distance) {
                self.pos += step * distance;
            }
        }
        if self.direction.y != 0.0 {
            let step = Vec2::new(0.0, self.direction.y);
            if query.is_valid_move(self.pos, self.size, step, distance) {
                self.pos += step * distance;
            }
        }

        self.clamp_to_canvas(query.canvas);

        self.animation_timer += dt;
        if self.animation_timer >= self.animation_interval {
            self.animation_timer -= self.animation_interval;
            self.mouth_open = !self.mouth_open;
        }
    }

    /// Keep the whole sprite on the canvas
    pub fn clamp_to_canvas(&mut self, canvas: Vec2) {
        let max = (canvas - self.size).max(Vec2::ZERO);
        self.pos = self.pos.clamp(Vec2::ZERO, max);
    }

    pub fn is_moving(&self) -> bool {
        self.direction != Vec2::ZERO
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Collision box (inset from the sprite)
    pub fn bounds(&self) -> Bounds {
        Bounds::from_rect(self.pos, self.size).inset(self.hitbox_shrink)
    }
}

/// Snap each axis to -1, 0 or 1
fn axis_signs(v: Vec2) -> Vec2 {
    let sign = |a: f32| {
        if a > 0.0 {
            1.0
        } else if a < 0.0 {
            -1.0
        } else {
            0.0
        }
    };
    Vec2::new(sign(v.x), sign(v.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::MazeGrid;

    const OPEN: [&str; 7] = [
        "#######",
        "#.....#",
        "#.....#",
        "#.....#",
        "#.....#",
        "#.....#",
        "#######",
    ];

    fn player_at(pos: Vec2) -> Player {
        let mut player = Player::new(SpriteHandle::new(0, 32.0, 32.0), 1.0, &Tuning::default());
        player.pos = pos;
        player
    }

    #[test]
    fn test_moves_right_by_speed_times_dt() {
        // 600x600 -> 40px cells, 7x7 grid offset (160, 160)
        let maze = MazeGrid::from_layout(&OPEN, 600.0, 600.0);
        let query = SpatialQuery::new(Some(&maze), maze.canvas);
        let start = maze.cell_origin(3, 3) + Vec2::splat(4.0);
        let mut player = player_at(start);

        player.update(Vec2::new(1.0, 0.0), 16.0, &query);

        assert!((player.pos.x - (start.x + 3.2)).abs() < 1e-4);
        assert_eq!(player.pos.y, start.y);
        assert!(player.is_moving());
    }

    #[test]
    fn test_delta_time_is_clamped() {
        let maze = MazeGrid::from_layout(&OPEN, 600.0, 600.0);
        let query = SpatialQuery::new(Some(&maze), maze.canvas);
        let start = maze.cell_origin(3, 3) + Vec2::splat(4.0);
        let mut player = player_at(start);

        // 1 second hitch moves only as far as 50 ms would
        player.update(Vec2::new(0.0, -1.0), 1000.0, &query);
        assert!((player.pos.y - (start.y - 10.0)).abs() < 1e-4);
    }

    #[test]
    fn test_slides_along_wall_when_moving_diagonally() {
        let maze = MazeGrid::from_layout(&OPEN, 600.0, 600.0);
        let query = SpatialQuery::new(Some(&maze), maze.canvas);
        // Flush against the top wall
        let start = maze.cell_origin(1, 3);
        let mut player = player_at(start);

        player.update(Vec2::new(1.0, -1.0), 20.0, &query);

        assert!((player.pos.x - (start.x + 4.0)).abs() < 1e-4);
        assert_eq!(player.pos.y, start.y);
    }

    #[test]
    fn test_input_is_snapped_to_axis_signs() {
        let query = SpatialQuery::new(None, Vec2::new(800.0, 600.0));
        let mut player = player_at(Vec2::new(100.0, 100.0));
        player.update(Vec2::new(0.3, -7.0), 10.0, &query);
        assert_eq!(player.direction, Vec2::new(1.0, -1.0));

        player.update(Vec2::ZERO, 10.0, &query);
        assert!(!player.is_moving());
    }

    #[test]
    fn test_clamped_into_canvas() {
        let query = SpatialQuery::new(None, Vec2::new(200.0, 200.0));
        let mut player = player_at(Vec2::new(180.0, -5.0));
        player.update(Vec2::new(1.0, 0.0), 16.0, &query);
        assert_eq!(player.pos, Vec2::new(168.0, 0.0));
    }

    #[test]
    fn test_mouth_toggles_every_interval() {
        let query = SpatialQuery::new(None, Vec2::new(800.0, 600.0));
        let mut player = player_at(Vec2::new(100.0, 100.0));
        assert!(player.mouth_open);
        for _ in 0..3 {
            player.update(Vec2::ZERO, 50.0, &query);
        }
        assert!(!player.mouth_open);
        for _ in 0..3 {
            player.update(Vec2::ZERO, 50.0, &query);
        }
        assert!(player.mouth_open);
    }

    #[test]
    fn test_bounds_are_inset() {
        let player = player_at(Vec2::new(10.0, 20.0));
        let b = player.bounds();
        assert_eq!(b.left, 14.0);
        assert_eq!(b.top, 24.0);
        assert_eq!(b.right, 38.0);
        assert_eq!(b.bottom, 48.0);
    }
}
