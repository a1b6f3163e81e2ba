//! Core deterministic primitives.
//!
//! Everything here is plain data with value semantics, so a game state built
//! from these types can be cloned into an independent branch.

pub mod bits;
pub mod direction;
pub mod hash;
pub mod rng;

// Re-export core types
pub use bits::SlotSet;
pub use direction::Direction;
pub use hash::{compute_state_hash, StateHash};
pub use rng::DeterministicRng;
