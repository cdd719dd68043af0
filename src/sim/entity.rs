//! Shared entity geometry: directions, bounds, sprite handles

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Cardinal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
    #[default]
    None,
}

impl Direction {
    /// Candidate order used by the AI
    pub const CARDINALS: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Unit vector (screen space, +y is down)
    pub fn to_vec(self) -> Vec2 {
        match self {
            Direction::Right => Vec2::X,
            Direction::Left => Vec2::NEG_X,
            Direction::Down => Vec2::Y,
            Direction::Up => Vec2::NEG_Y,
            Direction::None => Vec2::ZERO,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::None => Direction::None,
        }
    }
}

/// Opaque drawable handed in by the host. The core only reads its size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteHandle {
    pub id: u32,
    pub width: f32,
    pub height: f32,
}

impl SpriteHandle {
    pub fn new(id: u32, width: f32, height: f32) -> Self {
        Self { id, width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Axis-aligned bounding box (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_rect(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, pos.x + size.x, pos.y + size.y)
    }

    /// Shrink every side by `amount`, never past the box center
    pub fn inset(self, amount: f32) -> Self {
        let dx = amount.min((self.right - self.left) / 2.0).max(0.0);
        let dy = amount.min((self.bottom - self.top) / 2.0).max(0.0);
        Self::new(
            self.left + dx,
            self.top + dy,
            self.right - dx,
            self.bottom - dy,
        )
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites() {
        for dir in Direction::CARDINALS {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.to_vec() + dir.opposite().to_vec(), Vec2::ZERO);
        }
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn test_inset_never_inverts() {
        let b = Bounds::from_rect(Vec2::new(10.0, 10.0), Vec2::new(6.0, 20.0));
        let shrunk = b.inset(4.0);
        assert_eq!(shrunk.left, 13.0);
        assert_eq!(shrunk.right, 13.0);
        assert_eq!(shrunk.top, 14.0);
        assert_eq!(shrunk.bottom, 26.0);
        assert_eq!(shrunk.center(), b.center());
    }
}
