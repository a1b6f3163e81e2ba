//! Match Driver
//!
//! Couples a [`GameState`] with the hunter policy that steers it, so one
//! call advances a whole tick and one call forks a whole branch.

use tracing::debug;

use crate::core::direction::Direction;
use crate::game::policy::{HunterPolicy, RunnerPolicy};
use crate::game::state::{GameState, GameSummary};
use crate::game::tick::{advance, TickResult};

/// A match in progress: state plus hunter policy.
pub struct Game {
    state: GameState,
    hunters: Box<dyn HunterPolicy>,
}

impl Game {
    /// Start from `state` with `hunters` steering.
    pub fn new(state: GameState, hunters: Box<dyn HunterPolicy>) -> Self {
        Self { state, hunters }
    }

    /// Current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Give up the driver and keep the state.
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Ask the hunter policy, run one tick, and tell the policy when the
    /// level changed.
    pub fn advance(&mut self, runner_dir: Direction) -> TickResult {
        let hunter_dirs = self.hunters.decide(&self.state);
        let result = advance(&mut self.state, runner_dir, &hunter_dirs);
        if result.level_changed && !result.game_over {
            self.hunters.on_next_level(&self.state);
        }
        result
    }

    /// Independent copy of state and hunter policy.
    pub fn fork(&self) -> Game {
        Game {
            state: self.state.clone(),
            hunters: self.hunters.clone_box(),
        }
    }

    /// Drive the match with `runner` until it ends or `max_ticks` calls have
    /// been made.
    pub fn play(&mut self, runner: &mut dyn RunnerPolicy, max_ticks: u32) -> GameSummary {
        for _ in 0..max_ticks {
            if self.state.game_over {
                break;
            }
            let dir = runner.decide(&self.state);
            self.advance(dir);
        }
        let summary = self.state.summary();
        debug!(
            "Play finished: score {}, level {}, ticks {}",
            summary.score, summary.level, summary.total_time
        );
        summary
    }
}

impl Clone for Game {
    fn clone(&self) -> Self {
        self.fork()
    }
}
