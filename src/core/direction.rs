//! Cardinal Directions
//!
//! Direction indices double as neighbour slots in a maze node, so the order
//! (Up, Right, Down, Left) is part of the data layout.

use serde::{Deserialize, Serialize};

/// A move on the maze grid. `Neutral` means "stay" and is also what any
/// out-of-range direction index maps to.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Direction {
    /// Towards smaller y
    Up = 0,
    /// Towards larger x
    Right = 1,
    /// Towards larger y
    Down = 2,
    /// Towards smaller x
    Left = 3,
    /// No movement
    #[default]
    Neutral = 4,
}

impl Direction {
    /// The four moving directions in neighbour-slot order.
    pub const ARROWS: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Get direction from index. Anything outside 0..=3 is `Neutral`.
    pub fn from_index(index: i32) -> Direction {
        match index {
            0 => Direction::Up,
            1 => Direction::Right,
            2 => Direction::Down,
            3 => Direction::Left,
            _ => Direction::Neutral,
        }
    }

    /// Neighbour slot for this direction, `None` for `Neutral`.
    #[inline]
    pub fn slot(self) -> Option<usize> {
        match self {
            Direction::Neutral => None,
            other => Some(other as usize),
        }
    }

    /// The opposite direction. `Neutral` reverses to itself.
    #[inline]
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Neutral => Direction::Neutral,
        }
    }

    /// Is this one of the four moving directions?
    #[inline]
    pub fn is_arrow(self) -> bool {
        self != Direction::Neutral
    }

    /// Unit step `(dx, dy)` on screen coordinates (y grows downwards).
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Neutral => (0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_is_involution() {
        for dir in Direction::ARROWS {
            assert_ne!(dir, dir.reverse());
            assert_eq!(dir, dir.reverse().reverse());
        }
        assert_eq!(Direction::Neutral.reverse(), Direction::Neutral);
    }

    #[test]
    fn test_from_index_out_of_range() {
        assert_eq!(Direction::from_index(2), Direction::Down);
        assert_eq!(Direction::from_index(4), Direction::Neutral);
        assert_eq!(Direction::from_index(-1), Direction::Neutral);
        assert_eq!(Direction::from_index(99), Direction::Neutral);
        assert_eq!(Direction::default(), Direction::Neutral);
    }

    #[test]
    fn test_slots_follow_arrow_order() {
        for (i, dir) in Direction::ARROWS.iter().enumerate() {
            assert_eq!(dir.slot(), Some(i));
        }
        assert_eq!(Direction::Neutral.slot(), None);
    }
}
