//! Board Storage
//!
//! Fixed-size grid of tiles plus the column polarity flag that the hex
//! adjacency rule depends on. The board is passive; every rule lives in
//! the engine.

use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};

use crate::core::hex::{TilePos, hex_neighbors};
use crate::game::error::MapError;
use crate::game::tile::{Tile, PlayerId, AboveType, GroundType};

/// Width x height grid of tiles, column-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: i32,
    height: i32,
    zero_is_odd_column: bool,
    tiles: Vec<Tile>,
}

impl Board {
    /// Create a board filled with `fill`.
    ///
    /// Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32, zero_is_odd_column: bool, fill: Tile) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            zero_is_odd_column,
            tiles: vec![fill; (width as usize) * (height as usize)],
        }
    }

    /// Board width in columns.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Board height in rows.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Column polarity used by adjacency.
    #[inline]
    pub fn zero_is_odd_column(&self) -> bool {
        self.zero_is_odd_column
    }

    /// Is `pos` on the board?
    #[inline]
    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: TilePos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.x as usize * self.height as usize + pos.y as usize)
        } else {
            None
        }
    }

    /// Tile at `pos`, if on the board.
    #[inline]
    pub fn get(&self, pos: TilePos) -> Option<&Tile> {
        self.index(pos).and_then(|i| self.tiles.get(i))
    }

    /// Mutable tile at `pos`, if on the board.
    #[inline]
    pub fn get_mut(&mut self, pos: TilePos) -> Option<&mut Tile> {
        match self.index(pos) {
            Some(i) => self.tiles.get_mut(i),
            None => None,
        }
    }

    /// Overwrite the tile at `pos`. Returns false when off the board.
    pub fn set(&mut self, pos: TilePos, tile: Tile) -> bool {
        match self.get_mut(pos) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    /// Every position on the board, column by column.
    pub fn positions(&self) -> impl Iterator<Item = TilePos> {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |y| TilePos::new(x, y)))
    }

    /// Every position with its tile, column by column.
    pub fn iter(&self) -> impl Iterator<Item = (TilePos, &Tile)> + '_ {
        self.positions().zip(self.tiles.iter())
    }

    /// The six hex neighbours of `pos`, unfiltered.
    #[inline]
    pub fn neighbors(&self, pos: TilePos) -> [TilePos; 6] {
        hex_neighbors(pos, self.zero_is_odd_column)
    }

    /// Neighbours of `pos` that lie on the board.
    pub fn neighbors_in_bounds(&self, pos: TilePos) -> impl Iterator<Item = TilePos> + '_ {
        self.neighbors(pos).into_iter().filter(move |n| self.contains(*n))
    }

    /// Position of `player`'s tree, if it still stands.
    pub fn tree_position(&self, player: PlayerId) -> Option<TilePos> {
        self.iter()
            .find(|(_, tile)| tile.is_tree_of(player))
            .map(|(pos, _)| pos)
    }

    /// First cell whose surface occupant is `above`.
    pub fn find_above(&self, above: AboveType) -> Option<TilePos> {
        self.iter()
            .find(|(_, tile)| tile.above == above)
            .map(|(pos, _)| pos)
    }

    /// Number of cells owned by `player`.
    pub fn owned_count(&self, player: PlayerId) -> u32 {
        self.tiles.iter().filter(|t| t.is_owned_by(player)).count() as u32
    }

    /// Check ownership against a match with `num_players` seats.
    ///
    /// Owners must be seated, trees and roots must be owned, owned cells
    /// must be a tree or roots on real ground, and no seat may have two
    /// trees. A seat with no tree is allowed; its turns are skipped.
    pub fn check_seats(&self, num_players: u8) -> Result<(), MapError> {
        let mut trees = BTreeSet::new();
        for (pos, tile) in self.iter() {
            let ownable = matches!(tile.above, AboveType::Tree | AboveType::TreeRoots);
            let Some(owner) = tile.owner else {
                if ownable {
                    return Err(MapError::MissingOwner(pos));
                }
                continue;
            };

            if owner.0 >= num_players {
                return Err(MapError::UnseatedOwner { owner, pos });
            }
            if !ownable || tile.ground == GroundType::None {
                return Err(MapError::BadOwnership(pos));
            }
            if tile.above == AboveType::Tree && !trees.insert(owner) {
                return Err(MapError::DuplicateTree { player: owner, pos });
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
