//! Match Configuration
//!
//! Settings that stay fixed for the lifetime of a match. Every field has a
//! default, so a partial document deserializes into a usable config.

use serde::{Deserialize, Serialize};

use crate::game::rules::NUM_LIVES;

/// How pause timers are resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PauseMode {
    /// Pauses count down one tick per `advance`, as a live match shows them.
    Interactive,
    /// Pauses resolve inside the tick that starts them.
    #[default]
    Simulation,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Pill fraction must lie in `[0, 1]`.
    #[error("pill fraction {0} is outside [0, 1]")]
    PillFraction(f64),

    /// A match cannot start without lives.
    #[error("a match needs at least one life")]
    NoLives,

    /// `levels_to_play` of zero would end the match before it starts.
    #[error("levels_to_play must be at least 1")]
    ZeroLevels,
}

/// Configuration for a match.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Pause resolution mode
    pub pause_mode: PauseMode,

    /// Place power pills on new boards
    pub power_pills_enabled: bool,

    /// Fraction of pills placed on a new board
    pub pill_fraction: f64,

    /// End the match after this many levels
    pub levels_to_play: Option<u32>,

    /// Lives at the start of the match
    pub lives: u32,

    /// Collect events during `advance`. Search branches can turn this off.
    pub record_events: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pause_mode: PauseMode::Simulation,
            power_pills_enabled: true,
            pill_fraction: 1.0,
            levels_to_play: None,
            lives: NUM_LIVES,
            record_events: true,
        }
    }
}

impl GameConfig {
    /// Default settings with pauses played out tick by tick.
    pub fn interactive() -> Self {
        Self {
            pause_mode: PauseMode::Interactive,
            ..Self::default()
        }
    }

    /// Check for settings no match can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.pill_fraction) {
            return Err(ConfigError::PillFraction(self.pill_fraction));
        }
        if self.lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.levels_to_play == Some(0) {
            return Err(ConfigError::ZeroLevels);
        }
        Ok(())
    }
}
