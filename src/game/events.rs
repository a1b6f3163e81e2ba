//! Game Events
//!
//! Events generated during simulation for telemetry and replay checks.

use serde::{Deserialize, Serialize};

use crate::game::fruit::FruitKind;
use crate::maze::NodeIndex;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Runner ate a pill
    PillEaten {
        /// Where
        node: NodeIndex,
        /// Points awarded
        points: u32,
    },

    /// Runner ate a power pill
    PowerPillEaten {
        /// Where
        node: NodeIndex,
        /// Edible ticks granted to every hunter
        edible_ticks: u32,
    },

    /// Every active hunter turned around
    HuntersReversed,

    /// Runner ate an edible hunter
    HunterEaten {
        /// Hunter index
        hunter: usize,
        /// Points awarded
        points: u32,
    },

    /// A hunter caught the runner
    RunnerCaught {
        /// Hunter index
        hunter: usize,
    },

    /// Fruit entered the maze
    FruitSpawned {
        /// Spawn node
        node: NodeIndex,
        /// Kind
        kind: FruitKind,
    },

    /// Runner ate the fruit
    FruitEaten {
        /// Where
        node: NodeIndex,
        /// Kind
        kind: FruitKind,
        /// Points awarded
        points: u32,
    },

    /// Fruit left through a tunnel
    FruitEscaped {
        /// Exit node
        node: NodeIndex,
    },

    /// The one extra life was granted
    ExtraLife {
        /// Score at the time
        score: u32,
    },

    /// A life was deducted
    LifeLost {
        /// Lives left afterwards
        lives_remaining: u32,
        /// True if the level clock ran out, false for a capture
        timed_out: bool,
    },

    /// All consumables on the level are gone
    LevelCleared {
        /// The level that was cleared
        level: u32,
    },

    /// Match ended
    GameOver {
        /// Final score
        score: u32,
        /// Level reached
        level: u32,
    },
}

/// A game event stamped with the total tick it happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Total tick when the event occurred
    pub tick: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create pill eaten event.
    pub fn pill_eaten(tick: u32, node: NodeIndex, points: u32) -> Self {
        Self::new(tick, GameEventData::PillEaten { node, points })
    }

    /// Create power pill eaten event.
    pub fn power_pill_eaten(tick: u32, node: NodeIndex, edible_ticks: u32) -> Self {
        Self::new(tick, GameEventData::PowerPillEaten { node, edible_ticks })
    }

    /// Create hunters reversed event.
    pub fn hunters_reversed(tick: u32) -> Self {
        Self::new(tick, GameEventData::HuntersReversed)
    }

    /// Create hunter eaten event.
    pub fn hunter_eaten(tick: u32, hunter: usize, points: u32) -> Self {
        Self::new(tick, GameEventData::HunterEaten { hunter, points })
    }

    /// Create runner caught event.
    pub fn runner_caught(tick: u32, hunter: usize) -> Self {
        Self::new(tick, GameEventData::RunnerCaught { hunter })
    }

    /// Create fruit spawned event.
    pub fn fruit_spawned(tick: u32, node: NodeIndex, kind: FruitKind) -> Self {
        Self::new(tick, GameEventData::FruitSpawned { node, kind })
    }

    /// Create fruit eaten event.
    pub fn fruit_eaten(tick: u32, node: NodeIndex, kind: FruitKind, points: u32) -> Self {
        Self::new(tick, GameEventData::FruitEaten { node, kind, points })
    }

    /// Create fruit escaped event.
    pub fn fruit_escaped(tick: u32, node: NodeIndex) -> Self {
        Self::new(tick, GameEventData::FruitEscaped { node })
    }

    /// Create extra life event.
    pub fn extra_life(tick: u32, score: u32) -> Self {
        Self::new(tick, GameEventData::ExtraLife { score })
    }

    /// Create life lost event.
    pub fn life_lost(tick: u32, lives_remaining: u32, timed_out: bool) -> Self {
        Self::new(tick, GameEventData::LifeLost { lives_remaining, timed_out })
    }

    /// Create level cleared event.
    pub fn level_cleared(tick: u32, level: u32) -> Self {
        Self::new(tick, GameEventData::LevelCleared { level })
    }

    /// Create game over event.
    pub fn game_over(tick: u32, score: u32, level: u32) -> Self {
        Self::new(tick, GameEventData::GameOver { score, level })
    }

    /// Points this event added to the score, if any.
    pub fn points(&self) -> u32 {
        match self.data {
            GameEventData::PillEaten { points, .. }
            | GameEventData::HunterEaten { points, .. }
            | GameEventData::FruitEaten { points, .. } => points,
            GameEventData::PowerPillEaten { .. } => crate::game::rules::POWER_PILL_SCORE,
            _ => 0,
        }
    }
}
