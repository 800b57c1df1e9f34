//! Game Logic Module
//!
//! All rules code. Given the same board, parameters, seed and action
//! order, every function here produces the same result.
//!
//! ## Module Structure
//!
//! - `tile`: Player ids, ground and occupant kinds, one board cell
//! - `board`: Grid storage and adjacency lookups
//! - `map`: Text maps, built-in maps, random boards
//! - `params`: Match parameters and their positional encoding
//! - `connectivity`: Frontier, root connectivity, fog of war
//! - `rabbit`: Hazard movement
//! - `engine`: Turn and action engine
//! - `events`: Game events for rendering and replay
//! - `error`: Error types

pub mod tile;
pub mod board;
pub mod map;
pub mod params;
pub mod connectivity;
pub mod rabbit;
pub mod engine;
pub mod events;
pub mod error;

// Re-export key types
pub use tile::{PlayerId, GroundType, AboveType, Tile};
pub use board::Board;
pub use map::{builtin_map, parse_board, generate_board};
pub use params::GameParameters;
pub use engine::{GameLogic, PlayerAction, ActionOutcome, Player, PlayerView, replay_actions};
pub use events::{GameEvent, GameEventData};
pub use error::{ActionError, MapError, ParamsError};
