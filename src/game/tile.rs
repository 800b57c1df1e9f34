//! Tile Model
//!
//! One cell of the board: who owns it, what terrain it is, and what
//! stands on it.

use serde::{Serialize, Deserialize};
use std::fmt;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Seat index of a player, `0..num_players`.
///
/// Implements Ord for deterministic ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Seat index as usize, for indexing the player table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Signed wire form: `-1` for "nobody", else the seat index.
    #[inline]
    pub fn to_wire(owner: Option<PlayerId>) -> i8 {
        owner.map_or(-1, |p| p.0 as i8)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

// =============================================================================
// GROUND
// =============================================================================

/// Terrain kind of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GroundType {
    /// Outside the playable map
    #[default]
    None = 0,
    /// Plain terrain
    Desert = 1,
    /// Plain terrain
    Grass = 2,
    /// Plain terrain
    MesaDark = 3,
    /// Plain terrain
    MesaLight = 4,
    /// Impassable
    Mountain = 5,
    /// Resource
    RichSoil = 6,
    /// Resource
    Water = 7,
    /// Resource that enrages the rabbit
    Carrot = 8,
}

impl GroundType {
    /// Can roots or the rabbit ever enter this cell?
    #[inline]
    pub fn is_traversable(self) -> bool {
        !matches!(self, GroundType::None | GroundType::Mountain)
    }

    /// Water and rich soil grant one extra move per turn while owned.
    #[inline]
    pub fn is_resource(self) -> bool {
        matches!(self, GroundType::Water | GroundType::RichSoil)
    }

    /// Any ground that grants a move while owned, carrot included.
    #[inline]
    pub fn grants_move(self) -> bool {
        self.is_resource() || self == GroundType::Carrot
    }

    /// Single-character map code.
    pub fn code(self) -> char {
        match self {
            GroundType::None => '_',
            GroundType::Desert => 'D',
            GroundType::Grass => 'G',
            GroundType::MesaDark => 'K',
            GroundType::MesaLight => 'L',
            GroundType::Mountain => 'M',
            GroundType::RichSoil => 'R',
            GroundType::Water => 'W',
            GroundType::Carrot => 'C',
        }
    }

    /// Parse a single-character map code.
    pub fn from_code(c: char) -> Option<Self> {
        match c {
            '_' => Some(GroundType::None),
            'D' => Some(GroundType::Desert),
            'G' => Some(GroundType::Grass),
            'K' => Some(GroundType::MesaDark),
            'L' => Some(GroundType::MesaLight),
            'M' => Some(GroundType::Mountain),
            'R' => Some(GroundType::RichSoil),
            'W' => Some(GroundType::Water),
            'C' => Some(GroundType::Carrot),
            _ => None,
        }
    }
}

// =============================================================================
// ABOVE
// =============================================================================

/// What occupies the surface of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AboveType {
    /// Nothing on the cell
    #[default]
    None = 0,
    /// A player's home base
    Tree = 1,
    /// Live roots
    TreeRoots = 2,
    /// Roots cut off from their tree; always unowned
    TreeRootsDead = 3,
    /// The hazard
    Rabbit = 4,
}

impl AboveType {
    /// Single-character map code, `None` has no code.
    pub fn code(self) -> Option<char> {
        match self {
            AboveType::None => None,
            AboveType::Tree => Some('T'),
            AboveType::TreeRoots => Some('r'),
            AboveType::TreeRootsDead => Some('x'),
            AboveType::Rabbit => Some('B'),
        }
    }

    /// Parse a single-character map code.
    pub fn from_code(c: char) -> Option<Self> {
        match c {
            'T' => Some(AboveType::Tree),
            'r' => Some(AboveType::TreeRoots),
            'x' => Some(AboveType::TreeRootsDead),
            'B' => Some(AboveType::Rabbit),
            _ => None,
        }
    }
}

// =============================================================================
// TILE
// =============================================================================

/// State of a single board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Owning player, `None` when unowned
    pub owner: Option<PlayerId>,
    /// Terrain
    pub ground: GroundType,
    /// Surface occupant
    pub above: AboveType,
}

impl Tile {
    /// Unowned cell with nothing on it.
    pub const fn bare(ground: GroundType) -> Self {
        Self {
            owner: None,
            ground,
            above: AboveType::None,
        }
    }

    /// A player's tree on the given ground.
    pub const fn tree(ground: GroundType, owner: PlayerId) -> Self {
        Self {
            owner: Some(owner),
            ground,
            above: AboveType::Tree,
        }
    }

    /// Live roots of a player.
    pub const fn roots(ground: GroundType, owner: PlayerId) -> Self {
        Self {
            owner: Some(owner),
            ground,
            above: AboveType::TreeRoots,
        }
    }

    /// Is this cell owned by `player`?
    #[inline]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    /// Is this `player`'s tree?
    #[inline]
    pub fn is_tree_of(&self, player: PlayerId) -> bool {
        self.above == AboveType::Tree && self.is_owned_by(player)
    }

    /// Strip ownership and surface occupant.
    #[inline]
    pub fn clear(&mut self) {
        self.owner = None;
        self.above = AboveType::None;
    }
}

// =============================================================================
// TESTS
// =============================================================================
