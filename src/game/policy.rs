//! Decision Policies
//!
//! The engine never decides anything itself: hunters and runner are steered
//! by policies behind these traits. Policies may carry state, so each one
//! can clone itself into a box for search branches.

use crate::core::direction::Direction;
use crate::core::rng::DeterministicRng;
use crate::game::query::DistanceMetric;
use crate::game::rules::NUM_HUNTERS;
use crate::game::state::GameState;

/// Produces every hunter's intended direction for the next tick.
pub trait HunterPolicy: Send {
    /// Intended directions. `Neutral` means "keep going".
    fn decide(&mut self, state: &GameState) -> [Direction; NUM_HUNTERS];

    /// Called once after the level number changes.
    fn on_next_level(&mut self, _state: &GameState) {}

    /// Independent copy for a search branch.
    fn clone_box(&self) -> Box<dyn HunterPolicy>;
}

impl Clone for Box<dyn HunterPolicy> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Produces the runner's intended direction for the next tick.
pub trait RunnerPolicy: Send {
    /// Intended direction.
    fn decide(&mut self, state: &GameState) -> Direction;

    /// Independent copy for a search branch.
    fn clone_box(&self) -> Box<dyn RunnerPolicy>;
}

impl Clone for Box<dyn RunnerPolicy> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

fn random_move(state: &GameState, i: usize, rng: &mut DeterministicRng) -> Direction {
    let moves = state.legal_hunter_moves(i);
    rng.choose(moves.as_slice()).copied().unwrap_or(Direction::Neutral)
}

// =============================================================================
// HUNTERS
// =============================================================================

/// Picks a random exit at every junction.
#[derive(Clone, Debug)]
pub struct RandomHunters {
    rng: DeterministicRng,
}

impl RandomHunters {
    /// Create with its own generator.
    pub fn new(seed: u64) -> Self {
        Self { rng: DeterministicRng::new(seed) }
    }
}

impl HunterPolicy for RandomHunters {
    fn decide(&mut self, state: &GameState) -> [Direction; NUM_HUNTERS] {
        let mut dirs = [Direction::Neutral; NUM_HUNTERS];
        for (i, dir) in dirs.iter_mut().enumerate() {
            if state.hunter_requires_action(i) {
                *dir = random_move(state, i, &mut self.rng);
            }
        }
        dirs
    }

    fn clone_box(&self) -> Box<dyn HunterPolicy> {
        Box::new(self.clone())
    }
}

/// Chases the runner by path distance, flees while edible, and takes a
/// random exit with probability `randomness`.
#[derive(Clone, Debug)]
pub struct PursuitHunters {
    rng: DeterministicRng,
    randomness: f64,
}

impl PursuitHunters {
    /// Per-level factor applied to `randomness`.
    pub const LEVEL_FOCUS: f64 = 0.9;

    /// Create with its own generator. `randomness` is clamped to `[0, 1]`.
    pub fn new(seed: u64, randomness: f64) -> Self {
        Self {
            rng: DeterministicRng::new(seed),
            randomness: randomness.clamp(0.0, 1.0),
        }
    }

    /// Current chance of a random move at a junction.
    pub fn randomness(&self) -> f64 {
        self.randomness
    }
}

impl HunterPolicy for PursuitHunters {
    fn decide(&mut self, state: &GameState) -> [Direction; NUM_HUNTERS] {
        let mut dirs = [Direction::Neutral; NUM_HUNTERS];
        let runner = state.runner.node;

        for (i, dir) in dirs.iter_mut().enumerate() {
            if !state.hunter_requires_action(i) {
                continue;
            }
            *dir = if self.rng.next_f64() < self.randomness {
                random_move(state, i, &mut self.rng)
            } else {
                let chase = !state.hunters[i].is_edible();
                state.next_hunter_dir(i, runner, chase, DistanceMetric::Path)
            };
        }
        dirs
    }

    fn on_next_level(&mut self, _state: &GameState) {
        self.randomness *= Self::LEVEL_FOCUS;
    }

    fn clone_box(&self) -> Box<dyn HunterPolicy> {
        Box::new(self.clone())
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Heads for the nearest pill and backs away from hunters that get within
/// `danger_distance`.
#[derive(Clone, Debug)]
pub struct NearestPillRunner {
    danger_distance: u32,
}

impl NearestPillRunner {
    /// Create with a danger radius in path steps.
    pub fn new(danger_distance: u32) -> Self {
        Self { danger_distance }
    }
}

impl Default for NearestPillRunner {
    fn default() -> Self {
        Self::new(4)
    }
}

impl RunnerPolicy for NearestPillRunner {
    fn decide(&mut self, state: &GameState) -> Direction {
        let runner = state.runner.node;

        let threat = state
            .hunters
            .iter()
            .filter(|h| !h.is_edible())
            .map(|h| (h.node, state.path_distance(runner, h.node)))
            .filter(|(_, d)| *d <= self.danger_distance)
            .min_by_key(|(_, d)| *d);
        if let Some((hunter, _)) = threat {
            return state.next_runner_dir(hunter, false, DistanceMetric::Path);
        }

        let mut targets = state.active_pill_nodes();
        targets.extend(state.active_power_pill_nodes());
        match state.nearest_of(runner, &targets, DistanceMetric::Path) {
            Some(target) => state.next_runner_dir(target, true, DistanceMetric::Path),
            None => state.runner.dir,
        }
    }

    fn clone_box(&self) -> Box<dyn RunnerPolicy> {
        Box::new(self.clone())
    }
}
