//! Game Logic Module
//!
//! All game simulation code. Deterministic given the seed and the direction
//! intents fed to each tick.
//!
//! ## Module Structure
//!
//! - `rules`: Fixed rule constants and level scaling
//! - `config`: Per-match configuration
//! - `state`: Match state, runner, hunters, fruit
//! - `movement`: Direction resolution and per-tick movement
//! - `collision`: Runner-vs-hunter contact
//! - `fruit`: Bonus fruit spawning and wandering
//! - `tick`: The simulation step
//! - `query`: Read-only geometry and consumable queries
//! - `policy`: Hunter and runner decision traits plus stock policies
//! - `driver`: State plus hunter policy, forkable as one unit
//! - `events`: Game events for observers and replays

pub mod collision;
pub mod config;
pub mod driver;
pub mod events;
pub mod fruit;
pub mod movement;
pub mod policy;
pub mod query;
pub mod rules;
pub mod state;
pub mod tick;

// Re-export key types
pub use collision::{check_feast, FeastOutcome};
pub use config::{ConfigError, GameConfig, PauseMode};
pub use driver::Game;
pub use events::{GameEvent, GameEventData};
pub use fruit::FruitKind;
pub use policy::{HunterPolicy, NearestPillRunner, PursuitHunters, RandomHunters, RunnerPolicy};
pub use query::DistanceMetric;
pub use state::{FruitState, GameState, GameSummary, HunterState, PlayPhase, RunnerState};
pub use tick::{advance, TickResult};
