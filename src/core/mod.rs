//! Core deterministic primitives.
//!
//! Board geometry, seeded randomness and state hashing. Nothing here
//! knows about game rules.

pub mod hex;
pub mod rng;
pub mod hash;

// Re-export core types
pub use hex::{TilePos, hex_neighbors};
pub use rng::{DeterministicRng, RandomSource};
pub use hash::{StateHash, StateHasher, compute_state_hash};
