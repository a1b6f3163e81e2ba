//! Game State Definitions
//!
//! All mutable match data. A [`GameState`] owns every piece of it by value
//! (the maze is referenced by id through the process-wide cache), so
//! `clone()` is the deep copy a search uses to branch.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::bits::SlotSet;
use crate::core::direction::Direction;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::game::config::{ConfigError, GameConfig};
use crate::game::events::GameEvent;
use crate::game::fruit::FruitKind;
use crate::game::rules::{
    eaten_lair_time, lair_time, FRUITS_PER_LEVEL, HUNTER_EAT_SCORE, INITIAL_HUNTER_DIRS,
    INITIAL_RUNNER_DIR, LAIR_SLOT_SPACING, LAIR_START_DROP, NUM_HUNTERS,
};
use crate::maze::{maze, maze_for_level, Maze, NodeIndex};

// =============================================================================
// ENTITIES
// =============================================================================

/// The runner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunnerState {
    /// Current node
    pub node: NodeIndex,
    /// Last direction taken
    pub dir: Direction,
}

/// One hunter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HunterState {
    /// Current node (the home node while confined)
    pub node: NodeIndex,

    /// Last direction taken
    pub dir: Direction,

    /// Remaining edible ticks; > 0 means vulnerable and slow
    pub edible_ticks: u32,

    /// Remaining confinement ticks before it may leave home
    pub lair_ticks: u32,

    /// Horizontal offset, only meaningful while at home
    pub lair_x: i32,

    /// Vertical offset, only meaningful while at home
    pub lair_y: i32,
}

impl HunterState {
    /// Is this hunter currently edible?
    #[inline]
    pub fn is_edible(&self) -> bool {
        self.edible_ticks > 0
    }
}

/// Bonus fruit bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FruitState {
    /// Current node, `None` while no fruit is in the maze
    pub node: Option<NodeIndex>,

    /// Kind of the current fruit
    pub kind: FruitKind,

    /// Travel direction
    pub dir: Direction,

    /// Fruit still to come this level
    pub remaining: u32,

    /// Ticks left on the "recently eaten" display
    pub eaten_ticks: u32,

    /// Where the last fruit was eaten
    pub eaten_node: Option<NodeIndex>,

    /// Kind of the last fruit eaten
    pub eaten_kind: FruitKind,
}

/// Coarse play phase derived from the pause timers.
///
/// The timers themselves live on [`GameState`]; at most one is ever non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayPhase {
    /// Normal play
    Running,
    /// Frozen after a hunter was eaten
    EatingPause {
        /// Pause ticks left
        ticks_remaining: u32,
    },
    /// Frozen after the runner was caught
    DyingPause {
        /// Pause ticks left
        ticks_remaining: u32,
    },
    /// Match ended
    GameOver,
}

/// Telemetry snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Score
    pub score: u32,
    /// Current level (1-based)
    pub level: u32,
    /// Lives left
    pub lives: u32,
    /// Ticks since the match started (pause ticks excluded)
    pub total_time: u32,
    /// Ticks since the level started
    pub level_time: u32,
    /// Active maze id
    pub maze_id: usize,
    /// Pills plus power pills still on the board
    pub consumables_left: usize,
    /// Has the match ended?
    pub game_over: bool,
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete state of a match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// Match settings
    pub config: GameConfig,

    /// RNG seed (for replay)
    pub seed: u64,

    /// Deterministic RNG state
    pub rng: DeterministicRng,

    /// Active maze id
    pub maze_id: usize,

    /// Current level (1-based)
    pub level: u32,

    /// Level transitions left before the match ends, if limited
    pub levels_remaining: Option<u32>,

    /// Ticks since the level (or the current life on it) started
    pub level_time: u32,

    /// Ticks since the match started
    pub total_time: u32,

    /// Score
    pub score: u32,

    /// Lives left
    pub lives: u32,

    /// Multiplier for the next hunter eaten in this edible window
    pub eat_multiplier: u32,

    /// Has the extra life been granted?
    pub extra_life_awarded: bool,

    /// Has the match ended?
    pub game_over: bool,

    /// Pill slots still on the board
    pub pills: SlotSet,

    /// Power-pill slots still on the board
    pub power_pills: SlotSet,

    /// The runner
    pub runner: RunnerState,

    /// The hunters
    pub hunters: [HunterState; NUM_HUNTERS],

    /// Bonus fruit
    pub fruit: FruitState,

    /// Eating pause ticks left
    pub eating_ticks: u32,

    /// Hunter being eaten during the eating pause
    pub eating_hunter: Option<usize>,

    /// Points awarded for the last hunter eaten
    pub eating_score: u32,

    /// Dying pause ticks left
    pub dying_ticks: u32,

    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl GameState {
    /// Create a match with the default configuration.
    pub fn new(seed: u64) -> Self {
        Self::build(GameConfig::default(), seed)
    }

    /// Create a match with a custom configuration.
    pub fn with_config(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: GameConfig, seed: u64) -> Self {
        let maze_id = maze_for_level(1);
        let mut state = Self {
            config,
            seed,
            rng: DeterministicRng::new(seed),
            maze_id,
            level: 1,
            levels_remaining: config.levels_to_play,
            level_time: 0,
            total_time: 0,
            score: 0,
            lives: config.lives,
            eat_multiplier: 1,
            extra_life_awarded: false,
            game_over: false,
            pills: SlotSet::default(),
            power_pills: SlotSet::default(),
            runner: RunnerState::default(),
            hunters: [HunterState::default(); NUM_HUNTERS],
            fruit: FruitState::default(),
            eating_ticks: 0,
            eating_hunter: None,
            eating_score: 0,
            dying_ticks: 0,
            pending_events: Vec::new(),
        };
        state.new_board();
        state.reset_positions();
        debug!("New match (seed {}) on maze {}", seed, state.maze().name());
        state
    }

    /// The active maze.
    #[inline]
    pub fn maze(&self) -> &'static Maze {
        maze(self.maze_id)
    }

    /// Current phase, derived from the pause timers.
    pub fn phase(&self) -> PlayPhase {
        if self.game_over {
            PlayPhase::GameOver
        } else if self.eating_ticks > 0 {
            PlayPhase::EatingPause { ticks_remaining: self.eating_ticks }
        } else if self.dying_ticks > 0 {
            PlayPhase::DyingPause { ticks_remaining: self.dying_ticks }
        } else {
            PlayPhase::Running
        }
    }

    /// Is play frozen by a pause timer?
    #[inline]
    pub fn is_suspended(&self) -> bool {
        self.eating_ticks > 0 || self.dying_ticks > 0
    }

    /// Is hunter `i` confined to the home node?
    pub fn is_in_lair(&self, i: usize) -> bool {
        self.hunters.get(i).is_some_and(|h| h.node == self.maze().lair())
    }

    /// Points for the next hunter eaten in the current window.
    pub fn next_edible_hunter_score(&self) -> u32 {
        HUNTER_EAT_SCORE.saturating_mul(self.eat_multiplier)
    }

    /// Telemetry snapshot.
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score,
            level: self.level,
            lives: self.lives,
            total_time: self.total_time,
            level_time: self.level_time,
            maze_id: self.maze_id,
            consumables_left: self.pills.count() + self.power_pills.count(),
            game_over: self.game_over,
        }
    }

    // =========================================================================
    // LEVEL LIFECYCLE
    // =========================================================================

    /// Reset positions and timers, and on `new_level` move on to the next
    /// level with a fresh board.
    pub(crate) fn reset(&mut self, new_level: bool) {
        if new_level {
            if let Some(left) = self.levels_remaining.as_mut() {
                *left = left.saturating_sub(1);
                if *left == 0 {
                    self.finish();
                    return;
                }
            }
            self.level += 1;
            self.maze_id = maze_for_level(self.level);
            self.new_board();
            debug!("Level {} on maze {}", self.level, self.maze().name());
        }
        self.reset_positions();
    }

    /// Refill consumables for the active maze.
    fn new_board(&mut self) {
        let maze = self.maze();
        self.level_time = 0;
        self.pills = SlotSet::full(maze.pill_nodes().len());
        self.power_pills = if self.config.power_pills_enabled {
            SlotSet::full(maze.power_pill_nodes().len())
        } else {
            SlotSet::new(maze.power_pill_nodes().len())
        };

        if self.config.pill_fraction < 1.0 {
            let total = self.pills.len() as f64;
            let remove = (total * (1.0 - self.config.pill_fraction)).ceil() as usize;
            self.decimate_pills(remove);
        }

        self.fruit.remaining = FRUITS_PER_LEVEL;
    }

    /// Remove `count` pills in corridor clusters: pick a random pill node and
    /// clear outwards through two-way nodes until the count is met or the
    /// cluster runs out.
    fn decimate_pills(&mut self, mut count: usize) {
        let maze = self.maze();
        if count >= self.pills.len() {
            self.pills.clear_all();
            return;
        }

        let mut candidates: Vec<NodeIndex> = maze.pill_nodes().to_vec();
        let mut closed = vec![false; maze.num_nodes()];
        let mut open = VecDeque::new();

        while count > 0 && !candidates.is_empty() {
            let pick = self.rng.next_int(candidates.len() as u32) as usize;
            open.clear();
            open.push_back(candidates[pick]);

            while count > 0 {
                let Some(index) = open.pop_front() else {
                    break;
                };
                candidates.retain(|n| *n != index);
                closed[index] = true;

                let node = &maze.nodes()[index];
                if let Some(slot) = node.pill {
                    if self.pills.get(slot) {
                        self.pills.clear(slot);
                        count -= 1;
                    }
                }
                if node.num_neighbours == 2 {
                    for next in node.neighbours.iter().flatten() {
                        if !closed[*next] {
                            open.push_back(*next);
                        }
                    }
                }
            }
        }
    }

    /// Runner and hunters back to their starting places, timers cleared.
    fn reset_positions(&mut self) {
        let maze = self.maze();

        self.runner = RunnerState {
            node: maze.runner_start(),
            dir: INITIAL_RUNNER_DIR,
        };

        self.hunters[0] = HunterState {
            node: maze.hunter_start(),
            dir: INITIAL_HUNTER_DIRS[0],
            ..HunterState::default()
        };
        for i in 1..NUM_HUNTERS {
            self.hunters[i].edible_ticks = 0;
            self.hunters[i].lair_ticks = lair_time(i, self.level);
            self.place_in_lair(i);
        }

        self.eat_multiplier = 1;
        self.eating_ticks = 0;
        self.eating_hunter = None;
        self.dying_ticks = 0;
        self.fruit.node = None;
        self.fruit.eaten_ticks = 0;
        self.fruit.eaten_node = None;
    }

    /// Put hunter `i` in its waiting slot at home.
    pub(crate) fn place_in_lair(&mut self, i: usize) {
        let maze = self.maze();
        let lair = &maze.nodes()[maze.lair()];
        let offset = match i {
            2 => 0,
            3 => 2,
            _ => 1,
        };

        let hunter = &mut self.hunters[i];
        hunter.node = lair.index;
        hunter.lair_x = lair.x + LAIR_SLOT_SPACING * offset;
        hunter.lair_y = lair.y + LAIR_START_DROP;
        hunter.dir = if offset == 1 { Direction::Up } else { Direction::Down };
    }

    // =========================================================================
    // PAUSE EFFECTS
    // =========================================================================

    /// End of an eating pause: the eaten hunter goes home.
    pub(crate) fn send_eaten_hunter_home(&mut self) {
        let Some(i) = self.eating_hunter.take() else {
            return;
        };
        self.hunters[i].edible_ticks = 0;
        self.hunters[i].lair_ticks = eaten_lair_time(self.level);
        self.place_in_lair(i);
        trace!("Hunter {} sent home at tick {}", i, self.total_time);
    }

    /// End of a dying pause: lose a life, then restart the level or end.
    pub(crate) fn respawn_after_capture(&mut self) {
        self.lose_life(false);
        if self.lives == 0 {
            self.finish();
        } else {
            self.reset(false);
        }
        trace!("Capture resolved at tick {}", self.total_time);
    }

    pub(crate) fn lose_life(&mut self, timed_out: bool) {
        self.lives = self.lives.saturating_sub(1);
        debug!(
            "Life lost on level {} at tick {} ({} left)",
            self.level, self.total_time, self.lives
        );
        self.push_event(GameEvent::life_lost(self.total_time, self.lives, timed_out));
    }

    pub(crate) fn finish(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        debug!("Game over on level {} with score {}", self.level, self.score);
        self.push_event(GameEvent::game_over(self.total_time, self.score, self.level));
    }

    // =========================================================================
    // EVENTS & HASHING
    // =========================================================================

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.total_time, self.rng.state(), |hasher| {
            hasher.update_index(self.maze_id);
            hasher.update_u32(self.level);
            hasher.update_u32(self.levels_remaining.unwrap_or(u32::MAX));
            hasher.update_u32(self.level_time);
            hasher.update_u32(self.score);
            hasher.update_u32(self.lives);
            hasher.update_u32(self.eat_multiplier);
            hasher.update_bool(self.extra_life_awarded);
            hasher.update_bool(self.game_over);

            for word in self.pills.words() {
                hasher.update_u64(*word);
            }
            for word in self.power_pills.words() {
                hasher.update_u64(*word);
            }

            hasher.update_index(self.runner.node);
            hasher.update_u8(self.runner.dir as u8);

            for hunter in &self.hunters {
                hasher.update_index(hunter.node);
                hasher.update_u8(hunter.dir as u8);
                hasher.update_u32(hunter.edible_ticks);
                hasher.update_u32(hunter.lair_ticks);
                hasher.update_i32(hunter.lair_x);
                hasher.update_i32(hunter.lair_y);
            }

            hasher.update_opt_index(self.fruit.node);
            hasher.update_u8(self.fruit.kind as u8);
            hasher.update_u8(self.fruit.dir as u8);
            hasher.update_u32(self.fruit.remaining);
            hasher.update_u32(self.fruit.eaten_ticks);
            hasher.update_opt_index(self.fruit.eaten_node);
            hasher.update_u8(self.fruit.eaten_kind as u8);

            hasher.update_u32(self.eating_ticks);
            hasher.update_opt_index(self.eating_hunter);
            hasher.update_u32(self.eating_score);
            hasher.update_u32(self.dying_ticks);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event, unless event recording is switched off.
    pub fn push_event(&mut self, event: GameEvent) {
        if self.config.record_events {
            self.pending_events.push(event);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
