//! Hex geometry with cube coordinates
//!
//! Coordinates are stored in the compact axial form `(q, r)`; the third cube
//! component `s` is always derived as `-q - r`, so `q + r + s == 0` holds by
//! construction. Derived quantities are computed in `i16` since `s` of an
//! arbitrary `(q, r)` does not fit in `i8`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cube hex coordinate, stored as `(q, r)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i8,
    pub r: i8,
}

/// Unit direction vectors in cube coordinates (dq, dr, ds)
pub const CUBE_DIRECTIONS: [(i8, i8, i8); 6] = [
    (1, -1, 0),
    (1, 0, -1),
    (0, 1, -1),
    (-1, 1, 0),
    (-1, 0, 1),
    (0, -1, 1),
];

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    /// Build from a full cube triple, rejecting triples off the `q + r + s = 0` plane
    pub fn from_cube(q: i8, r: i8, s: i8) -> Option<Self> {
        if q as i16 + r as i16 + s as i16 == 0 {
            Some(Self::new(q, r))
        } else {
            None
        }
    }

    /// Derived third cube component
    pub fn s(&self) -> i16 {
        -i16::from(self.q) - i16::from(self.r)
    }

    pub fn cube(&self) -> (i16, i16, i16) {
        (i16::from(self.q), i16::from(self.r), self.s())
    }

    /// Distance between two hexes: max(|dq|, |dr|, |ds|)
    pub fn distance_to(&self, other: Hex) -> i16 {
        let (q1, r1, s1) = self.cube();
        let (q2, r2, s2) = other.cube();
        (q1 - q2).abs().max((r1 - r2).abs()).max((s1 - s2).abs())
    }

    pub fn distance_to_center(&self) -> i16 {
        self.distance_to(Hex::ORIGIN)
    }

    /// Neighbor in direction (0-5). Wraps at the `i8` edge, far outside any board.
    pub fn neighbor(&self, direction: usize) -> Hex {
        let (dq, dr, _) = CUBE_DIRECTIONS[direction % 6];
        Hex::new(self.q.wrapping_add(dq), self.r.wrapping_add(dr))
    }

    /// All six unit-distance neighbors, in `CUBE_DIRECTIONS` order
    pub fn neighbors(&self) -> [Hex; 6] {
        std::array::from_fn(|d| self.neighbor(d))
    }
}

impl From<(i8, i8)> for Hex {
    fn from((q, r): (i8, i8)) -> Self {
        Hex::new(q, r)
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s())
    }
}
