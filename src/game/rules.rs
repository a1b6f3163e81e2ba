//! Gameplay Constants
//!
//! Scores, timers and geometry shared by the transition function and the
//! query helpers. Level scaling uses repeated multiplication rather than
//! `powi` so the result is identical on every platform.

use crate::core::direction::Direction;

/// Number of hunters in every match.
pub const NUM_HUNTERS: usize = 4;

/// Lives at the start of a match (unless configured otherwise).
pub const NUM_LIVES: u32 = 3;

// =============================================================================
// SCORING
// =============================================================================

/// Points per pill.
pub const PILL_SCORE: u32 = 10;

/// Points per power pill.
pub const POWER_PILL_SCORE: u32 = 50;

/// Points for the first hunter eaten in an edible window; doubles each time.
pub const HUNTER_EAT_SCORE: u32 = 200;

/// Score at which the single extra life is granted.
pub const EXTRA_LIFE_SCORE: u32 = 10_000;

// =============================================================================
// TIMERS
// =============================================================================

/// Edible ticks granted by a power pill on level 1.
pub const EDIBLE_TIME: u32 = 200;

/// Per-level shrink factor for the edible window.
pub const EDIBLE_TIME_REDUCTION: f64 = 0.9;

/// The edible window never gets shorter than this.
pub const MIN_EDIBLE_TIME: u32 = 30;

/// Per-level shrink factor for confinement.
pub const LAIR_REDUCTION: f64 = 0.9;

/// Confinement per hunter after a reset, on level 1.
pub const LAIR_TIMES: [u32; NUM_HUNTERS] = [40, 60, 160, 260];

/// Confinement for a hunter sent home after being eaten, on level 1.
pub const COMMON_LAIR_TIME: u32 = 40;

/// Ticks a level may run before it costs a life.
pub const LEVEL_LIMIT: u32 = 3000;

/// The match ends after this level.
pub const MAX_LEVELS: u32 = 16;

/// Freeze after a hunter is eaten.
pub const EATING_PAUSE_TICKS: u32 = 12;

/// Freeze after the runner is caught.
pub const DYING_PAUSE_TICKS: u32 = 20;

/// How long an eaten fruit stays on display.
pub const FRUIT_DISPLAY_TICKS: u32 = 20;

// =============================================================================
// MOVEMENT
// =============================================================================

/// Chance per tick that every active hunter reverses.
pub const HUNTER_REVERSAL_CHANCE: f64 = 0.0015;

/// Edible hunters skip ticks where `edible_ticks % HUNTER_SPEED_REDUCTION == 0`.
pub const HUNTER_SPEED_REDUCTION: u32 = 2;

/// Path distance at or below which runner and hunter (or fruit) collide.
pub const EAT_DISTANCE: u32 = 1;

/// Runner heading after every reset.
pub const INITIAL_RUNNER_DIR: Direction = Direction::Left;

/// Heading of each hunter as it leaves the home.
pub const INITIAL_HUNTER_DIRS: [Direction; NUM_HUNTERS] = [
    Direction::Left,
    Direction::Right,
    Direction::Left,
    Direction::Right,
];

// =============================================================================
// HOME ANIMATION (offset units, unrelated to node spacing)
// =============================================================================

/// Horizontal spacing between the three waiting slots.
pub const LAIR_SLOT_SPACING: i32 = 8;

/// Waiting hunters start this far below the home node.
pub const LAIR_START_DROP: i32 = 2;

/// Lowest point of the waiting bounce.
pub const LAIR_BOUNCE_DEPTH: i32 = 4;

/// Horizontal offset of the home door.
pub const LAIR_DOOR_OFFSET: i32 = 8;

/// Rise above the home node at which a hunter is out.
pub const LAIR_EXIT_RISE: i32 = 11;

// =============================================================================
// FRUIT
// =============================================================================

/// Fruit per level.
pub const FRUITS_PER_LEVEL: u32 = 2;

/// The first fruit appears when exactly this many pills are gone.
pub const FIRST_FRUIT_PILLS_EATEN: usize = 64;

/// The second fruit appears when exactly this many pills remain.
pub const SECOND_FRUIT_PILLS_LEFT: usize = 66;

// =============================================================================
// LEVEL SCALING
// =============================================================================

/// `base * reduction^(level - 1)`, truncated.
pub fn level_scaled(base: u32, reduction: f64, level: u32) -> u32 {
    let mut factor = 1.0;
    for _ in 1..level {
        factor *= reduction;
    }
    (base as f64 * factor) as u32
}

/// Edible window for a power pill eaten on `level`.
pub fn edible_time(level: u32) -> u32 {
    level_scaled(EDIBLE_TIME, EDIBLE_TIME_REDUCTION, level).max(MIN_EDIBLE_TIME)
}

/// Confinement of hunter `hunter` after a reset on `level`.
pub fn lair_time(hunter: usize, level: u32) -> u32 {
    match LAIR_TIMES.get(hunter) {
        Some(base) => level_scaled(*base, LAIR_REDUCTION, level),
        None => 0,
    }
}

/// Confinement of a hunter sent home after being eaten on `level`.
pub fn eaten_lair_time(level: u32) -> u32 {
    level_scaled(COMMON_LAIR_TIME, LAIR_REDUCTION, level)
}
