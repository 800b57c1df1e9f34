//! Engine Errors

use crate::core::hex::TilePos;
use crate::game::tile::PlayerId;

/// Why an engine call was refused.
///
/// A refused call never leaves partial changes behind, except
/// `NoPlayersRemaining`, which is reported after the action itself
/// was applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// Target is not in the acting player's growth frontier.
    #[error("Invalid move at {0}")]
    InvalidMove(TilePos),

    /// A winner already exists.
    #[error("Game is over")]
    GameOver,

    /// Player id outside the configured seat range.
    #[error("Player {0} is not seated in this game")]
    PlayerOutOfRange(PlayerId),

    /// Nobody has a tree left, so no turn can start.
    #[error("No player has a tree left")]
    NoPlayersRemaining,

    /// Parameters rejected at construction.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] ParamsError),

    /// Starting board does not fit the seats.
    #[error("Invalid starting board: {0}")]
    InvalidBoard(#[from] MapError),
}

/// Map text could not be turned into a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// Map has no rows.
    #[error("Map is empty")]
    Empty,

    /// Row length differs from the first row.
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Row index
        row: usize,
        /// Cells found
        found: usize,
        /// Cells in the first row
        expected: usize,
    },

    /// Token could not be parsed.
    #[error("Bad tile token '{token}' at {pos}")]
    BadToken {
        /// The token text
        token: String,
        /// Where it appeared
        pos: TilePos,
    },

    /// Trees and roots must name their owner.
    #[error("Tile at {0} needs an owner")]
    MissingOwner(TilePos),

    /// No built-in map with this name.
    #[error("Unknown map '{0}'")]
    UnknownMap(String),

    /// Start position outside the generated board.
    #[error("Start position {0} is off the board")]
    StartOffBoard(TilePos),

    /// A seat has a second tree.
    #[error("{player} has a second tree at {pos}")]
    DuplicateTree {
        /// Seat with two trees
        player: PlayerId,
        /// The extra tree
        pos: TilePos,
    },

    /// Cell owned by a seat that is not in the match.
    #[error("Tile at {pos} is owned by unseated {owner}")]
    UnseatedOwner {
        /// The owner named on the map
        owner: PlayerId,
        /// Where it appeared
        pos: TilePos,
    },

    /// Owned cell that is not a tree or roots on real ground.
    #[error("Tile at {0} cannot be owned")]
    BadOwnership(TilePos),
}

/// Parameter set could not be decoded or is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    /// Encoded with a schema this build does not speak.
    #[error("Parameter schema version {found}, expected {expected}")]
    VersionMismatch {
        /// Version in the payload
        found: u16,
        /// Version this build writes
        expected: u16,
    },

    /// Wrong number of fields.
    #[error("Expected {expected} parameter fields, found {found}")]
    FieldCount {
        /// Fields in the schema
        expected: usize,
        /// Fields provided
        found: usize,
    },

    /// Field present with the wrong type.
    #[error("Parameter field '{0}' has the wrong type")]
    FieldType(&'static str),

    /// Field value out of range.
    #[error("Parameter field '{field}' is invalid: {reason}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// What is wrong
        reason: &'static str,
    },

    /// Binary or JSON payload could not be decoded.
    #[error("Malformed parameter payload: {0}")]
    Malformed(String),
}
