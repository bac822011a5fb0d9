//! Directions and pixel-space rectangles.
//!
//! All positions are integer pixels ([`IVec2`]) with `x` growing to the right
//! and `y` growing downwards, matching the grid's row/column order.

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// One of the four cardinal directions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Up (decreasing row / y).
    North,
    /// Right (increasing column / x).
    East,
    /// Down (increasing row / y).
    South,
    /// Left (decreasing column / x).
    West,
}

impl Direction {
    /// All directions, in the order the AI picks from.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::West,
        Direction::South,
        Direction::East,
    ];

    /// Unit step in pixel space.
    #[must_use]
    pub const fn delta(self) -> IVec2 {
        match self {
            Self::North => IVec2::new(0, -1),
            Self::East => IVec2::new(1, 0),
            Self::South => IVec2::new(0, 1),
            Self::West => IVec2::new(-1, 0),
        }
    }

    /// Unit step as `(row, col)` offsets.
    #[must_use]
    pub const fn cell_delta(self) -> (i64, i64) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Column of this facing in a `N W S E` sprite strip.
    #[must_use]
    pub const fn sprite_index(self) -> u8 {
        match self {
            Self::North => 0,
            Self::West => 1,
            Self::South => 2,
            Self::East => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::North => "N",
            Self::East => "E",
            Self::South => "S",
            Self::West => "W",
        };
        f.write_str(s)
    }
}

/// Half-open axis-aligned rectangle in pixels: `min` is inside, `max` is not.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner (inclusive).
    pub min: IVec2,
    /// Bottom-right corner (exclusive).
    pub max: IVec2,
}

impl Rect {
    /// Creates a rectangle spanning `x0..x1` and `y0..y1`.
    #[must_use]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: IVec2::new(x0, y0),
            max: IVec2::new(x1, y1),
        }
    }

    /// Creates a `size`-sized rectangle with its top-left corner at `origin`.
    #[must_use]
    pub fn at(origin: IVec2, size: IVec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Returns this rectangle shifted by `offset`.
    #[must_use]
    pub fn translate(self, offset: IVec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Last pixel column inside the rectangle.
    #[must_use]
    pub const fn last_x(&self) -> i32 {
        self.max.x - 1
    }

    /// Last pixel row inside the rectangle.
    #[must_use]
    pub const fn last_y(&self) -> i32 {
        self.max.y - 1
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Returns `true` if `point` lies inside.
    #[must_use]
    pub fn contains(&self, point: IVec2) -> bool {
        (self.min.x..self.max.x).contains(&point.x) && (self.min.y..self.max.y).contains(&point.y)
    }

    /// Returns `true` if the two rectangles share at least one pixel.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod direction_tests {
        use super::*;

        #[test]
        fn reverse_is_involution() {
            for dir in Direction::ALL {
                assert_eq!(dir.reverse().reverse(), dir);
                assert_ne!(dir.reverse(), dir);
            }
        }

        #[test]
        fn delta_matches_cell_delta() {
            for dir in Direction::ALL {
                let (dr, dc) = dir.cell_delta();
                let d = dir.delta();
                assert_eq!(i64::from(d.x), dc);
                assert_eq!(i64::from(d.y), dr);
            }
        }

        #[test]
        fn sprite_strip_order() {
            assert_eq!(Direction::North.sprite_index(), 0);
            assert_eq!(Direction::West.sprite_index(), 1);
            assert_eq!(Direction::South.sprite_index(), 2);
            assert_eq!(Direction::East.sprite_index(), 3);
        }
    }

    mod rect_tests {
        use super::*;

        #[test]
        fn contains_is_half_open() {
            let r = Rect::new(0, 0, 8, 8);
            assert!(r.contains(IVec2::new(0, 0)));
            assert!(r.contains(IVec2::new(7, 7)));
            assert!(!r.contains(IVec2::new(8, 0)));
            assert!(!r.contains(IVec2::new(0, 8)));
        }

        #[test]
        fn touching_edges_do_not_overlap() {
            let a = Rect::new(0, 0, 8, 8);
            let b = Rect::new(8, 0, 16, 8);
            assert!(!a.overlaps(&b));
            let c = Rect::new(7, 7, 9, 9);
            assert!(a.overlaps(&c));
            assert!(c.overlaps(&a));
        }

        #[test]
        fn translate_moves_both_corners() {
            let r = Rect::new(5, 5, 10, 10).translate(IVec2::new(16, -4));
            assert_eq!(r, Rect::new(21, 1, 26, 6));
            assert_eq!(r.last_x(), 25);
            assert_eq!(r.last_y(), 5);
        }

        #[test]
        fn empty_rect_overlaps_nothing() {
            let empty = Rect::new(4, 4, 4, 10);
            assert!(empty.is_empty());
            assert!(!empty.overlaps(&Rect::new(0, 0, 16, 16)));
        }
    }
}
