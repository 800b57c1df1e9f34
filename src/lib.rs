//! # Root Wars
//!
//! Turn-based territory engine for a hex board: players grow roots out
//! from their tree, cut rival roots, and race for territory while a
//! rabbit roams the field.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ROOT WARS                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── hex.rs        - Offset-column hex adjacency             │
//! │  ├── rng.rs        - Deterministic Xorshift128+ PRNG         │
//! │  └── hash.rs       - State hashing for verification          │
//! │                                                              │
//! │  game/             - Rules (deterministic)                   │
//! │  ├── tile.rs       - Cells, ground and occupants             │
//! │  ├── board.rs      - Grid storage                            │
//! │  ├── map.rs        - Map text, built-in maps, generator      │
//! │  ├── params.rs     - Match parameters                        │
//! │  ├── connectivity.rs - Frontier, connectivity, fog           │
//! │  ├── rabbit.rs     - Rabbit hazard                           │
//! │  ├── engine.rs     - Turn and action engine                  │
//! │  └── events.rs     - Game events                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! - No floating-point arithmetic in rules code
//! - No HashMap (BTreeSet/BTreeMap for sorted iteration)
//! - No system time dependencies
//! - All randomness from seeded Xorshift128+
//!
//! Peers that apply the same actions in the same order end with the same
//! state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::hex::TilePos;
pub use core::rng::DeterministicRng;
pub use game::board::Board;
pub use game::engine::{GameLogic, PlayerAction, ActionOutcome};
pub use game::params::GameParameters;
pub use game::tile::{PlayerId, GroundType, AboveType, Tile};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Turns the demo runner plays before giving up on a result.
pub const DEMO_TURN_LIMIT: u32 = 200;
