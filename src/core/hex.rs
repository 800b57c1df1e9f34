//! Offset-Column Hex Geometry
//!
//! Board cells are addressed by integer `(column, row)` pairs. Every other
//! column is shifted half a cell vertically, so the six neighbours of a
//! cell depend on which column class it sits in. The class is decided by
//! one board-wide flag, `zero_is_odd_column`.
//!
//! All math is integer math. Distances are compared squared so that no
//! floating point ever enters the simulation.

use serde::{Serialize, Deserialize};
use std::fmt;

/// A cell address on the board.
///
/// Implements Ord (column first, then row) so sets of positions iterate
/// in a deterministic order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TilePos {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl TilePos {
    /// Origin cell.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a position.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise offset.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// Squared straight-line distance between two cell addresses.
    ///
    /// Uses the raw column/row coordinates, not hex steps.
    #[inline]
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = self.x as i64 - other.x as i64;
        let dy = self.y as i64 - other.y as i64;
        dx * dx + dy * dy
    }
}

impl From<(i32, i32)> for TilePos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// =============================================================================
// ADJACENCY
// =============================================================================

/// Neighbour offsets for a column that is not shifted.
///
/// Order: lower left, upper left, below, above, lower right, upper right.
const UNSHIFTED_OFFSETS: [(i32, i32); 6] = [
    (-1, -1),
    (-1, 0),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
];

/// Neighbour offsets for a shifted column. Same order as above.
const SHIFTED_OFFSETS: [(i32, i32); 6] = [
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, 0),
    (1, 1),
];

/// Is `x` a shifted column under the given polarity?
///
/// Uses truncating remainder, so negative columns (always off-board) are
/// treated as shifted regardless of polarity.
#[inline]
pub fn is_shifted_column(x: i32, zero_is_odd_column: bool) -> bool {
    let polarity = if zero_is_odd_column { 1 } else { 0 };
    x % 2 != polarity
}

/// The six hex neighbours of `pos`.
///
/// Positions are not bounds-checked; callers filter against the board.
pub fn hex_neighbors(pos: TilePos, zero_is_odd_column: bool) -> [TilePos; 6] {
    let offsets = if is_shifted_column(pos.x, zero_is_odd_column) {
        &SHIFTED_OFFSETS
    } else {
        &UNSHIFTED_OFFSETS
    };

    let mut result = [TilePos::ZERO; 6];
    for (slot, (dx, dy)) in result.iter_mut().zip(offsets.iter()) {
        *slot = pos.offset(*dx, *dy);
    }
    result
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unshifted_column_neighbors() {
        // zero_is_odd_column = false: even columns are unshifted
        let n = hex_neighbors(TilePos::new(2, 2), false);
        assert_eq!(
            n,
            [
                TilePos::new(1, 1),
                TilePos::new(1, 2),
                TilePos::new(2, 1),
                TilePos::new(2, 3),
                TilePos::new(3, 1),
                TilePos::new(3, 2),
            ]
        );
    }

    #[test]
    fn test_shifted_column_neighbors() {
        let n = hex_neighbors(TilePos::new(3, 2), false);
        assert_eq!(
            n,
            [
                TilePos::new(2, 2),
                TilePos::new(2, 3),
                TilePos::new(3, 1),
                TilePos::new(3, 3),
                TilePos::new(4, 2),
                TilePos::new(4, 3),
            ]
        );
    }

    #[test]
    fn test_polarity_flips_column_class() {
        assert!(!is_shifted_column(0, false));
        assert!(is_shifted_column(0, true));
        assert!(is_shifted_column(1, false));
        assert!(!is_shifted_column(1, true));

        let even = hex_neighbors(TilePos::new(4, 4), false);
        let odd_flag = hex_neighbors(TilePos::new(4, 4), true);
        assert_ne!(even, odd_flag);
    }

    #[test]
    fn test_negative_column_is_shifted() {
        assert!(is_shifted_column(-1, false));
        assert!(is_shifted_column(-1, true));
        assert!(is_shifted_column(-3, true));
    }

    #[test]
    fn test_distance_squared() {
        assert_eq!(TilePos::new(0, 0).distance_squared(TilePos::new(3, 4)), 25);
        assert_eq!(TilePos::new(-1, 2).distance_squared(TilePos::new(-1, 2)), 0);
    }

    proptest! {
        #[test]
        fn prop_adjacency_is_symmetric(
            x in 0i32..64,
            y in 0i32..64,
            zero_is_odd in any::<bool>(),
        ) {
            let p = TilePos::new(x, y);
            for q in hex_neighbors(p, zero_is_odd) {
                // Only in-bounds pairs carry the guarantee
                if q.x < 0 || q.y < 0 {
                    continue;
                }
                let back = hex_neighbors(q, zero_is_odd);
                prop_assert!(back.contains(&p), "{} -> {} not mirrored", p, q);
            }
        }

        #[test]
        fn prop_neighbors_are_distinct_and_adjacent(
            x in 0i32..64,
            y in 0i32..64,
            zero_is_odd in any::<bool>(),
        ) {
            let p = TilePos::new(x, y);
            let n = hex_neighbors(p, zero_is_odd);
            for (i, a) in n.iter().enumerate() {
                prop_assert_ne!(*a, p);
                prop_assert!(a.distance_squared(p) <= 2);
                for b in &n[i + 1..] {
                    prop_assert_ne!(a, b);
                }
            }
        }
    }
}
