//! Collision Detection
//!
//! Runner-versus-hunter resolution ("feast"). Contact is measured by path
//! distance, so a hunter at home (no edges) never touches the runner.

use crate::game::events::GameEvent;
use crate::game::rules::{DYING_PAUSE_TICKS, EATING_PAUSE_TICKS, EAT_DISTANCE};
use crate::game::state::GameState;

/// Result of a runner-vs-hunter contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeastOutcome {
    /// The runner ate an edible hunter
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
}

/// First hunter in contact with the runner, if any.
///
/// Hunters are checked in index order; only the first contact counts.
pub fn check_feast(state: &GameState) -> Option<FeastOutcome> {
    let maze = state.maze();
    let runner = state.runner.node;

    state
        .hunters
        .iter()
        .enumerate()
        .find(|(_, h)| maze.path_distance(runner, h.node) <= EAT_DISTANCE)
        .map(|(i, h)| {
            if h.is_edible() {
                FeastOutcome::HunterEaten {
                    hunter: i,
                    points: state.next_edible_hunter_score(),
                }
            } else {
                FeastOutcome::RunnerCaught { hunter: i }
            }
        })
}

/// Apply the feast for this tick, then tick down every edible timer.
pub(crate) fn resolve_feast(state: &mut GameState) -> Option<FeastOutcome> {
    let outcome = check_feast(state);

    match outcome {
        Some(FeastOutcome::HunterEaten { hunter, points }) => {
            state.score = state.score.saturating_add(points);
            state.eating_score = points;
            state.eating_hunter = Some(hunter);
            state.eat_multiplier = state.eat_multiplier.saturating_mul(2);
            state.eating_ticks = EATING_PAUSE_TICKS;
            state.push_event(GameEvent::hunter_eaten(state.total_time, hunter, points));
        }
        Some(FeastOutcome::RunnerCaught { hunter }) => {
            state.dying_ticks = DYING_PAUSE_TICKS;
            state.push_event(GameEvent::runner_caught(state.total_time, hunter));
        }
        None => {}
    }

    for hunter in &mut state.hunters {
        if hunter.edible_ticks > 0 {
            hunter.edible_ticks -= 1;
        }
    }

    outcome
}
