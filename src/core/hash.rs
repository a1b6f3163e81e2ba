//! State Hashing for Verification
//!
//! Provides deterministic hashing of game state for:
//! - Checking that forked branches really diverge (or don't)
//! - Replay validation across runs and platforms

use sha2::{Digest, Sha256};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for game state.
///
/// Wraps SHA-256 with helpers for the primitive fields a state is made of.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for game state.
    pub fn for_game_state() -> Self {
        Self::new(b"MAZE_CHASE_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a node index, widened so hashes match across pointer widths.
    #[inline]
    pub fn update_index(&mut self, value: usize) {
        self.update_u64(value as u64);
    }

    /// Update with an optional node index (`u64::MAX` marks absence).
    #[inline]
    pub fn update_opt_index(&mut self, value: Option<usize>) {
        self.update_u64(value.map_or(u64::MAX, |v| v as u64));
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for determinism checks.
///
/// This function is called by `GameState::compute_hash()`.
/// The closure adds state-specific data after the clock and generator state.
pub fn compute_state_hash<F>(tick: u32, rng_state: [u64; 2], add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_game_state();

    // Always hash clock and generator first
    hasher.update_u32(tick);
    hasher.update_u64(rng_state[0]);
    hasher.update_u64(rng_state[1]);

    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
