//! # Maze Chase
//!
//! Deterministic maze-chase simulation engine: a runner clears pills from a
//! maze while four hunters chase it. Game states are cheap to clone, so
//! search agents can fork the live match and play branches forward.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        MAZE CHASE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  ├── hash.rs     - State hashing for verification            │
//! │  ├── direction.rs- Moves and their grid deltas               │
//! │  └── bits.rs     - Fixed-size bit set for consumables        │
//! │                                                              │
//! │  maze/           - Immutable maze graphs                     │
//! │  ├── mod.rs      - Layout parsing, nodes, edges              │
//! │  ├── distance.rs - All-pairs shortest path table             │
//! │  └── cache.rs    - Process-wide maze store                   │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── state.rs    - Match, runner, hunter and fruit state     │
//! │  ├── tick.rs     - The simulation step                       │
//! │  ├── movement.rs - Direction resolution and lair animation   │
//! │  ├── collision.rs- Runner-vs-hunter contact                  │
//! │  ├── fruit.rs    - Bonus fruit                               │
//! │  ├── query.rs    - Read-only queries for agents              │
//! │  ├── policy.rs   - Hunter and runner policies                │
//! │  └── driver.rs   - Forkable state plus hunter policy         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Given the same seed, config and per-tick direction intents, the
//! simulation produces identical states and identical state hashes:
//! - All randomness comes from the seeded Xorshift128+ in the state
//! - Level scaling is computed by repeated multiplication, never `powf`
//! - No system time dependencies
//! - Mazes are immutable and shared; only indices live in the state

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod maze;

// Re-export commonly used types
pub use core::direction::Direction;
pub use core::rng::DeterministicRng;
pub use game::driver::Game;
pub use game::state::{GameState, GameSummary};
pub use game::tick::{advance, TickResult};
pub use maze::{Maze, NodeIndex};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
