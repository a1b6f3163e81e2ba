//! Maze Chase demo runner
//!
//! Plays one headless match with the stock policies, then replays the
//! recorded runner moves and checks that both runs end on the same hash.
//!
//! Usage: `maze-chase [SEED] [CONFIG.json]`

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use maze_chase::{
    game::{
        config::GameConfig,
        events::GameEventData,
        policy::{NearestPillRunner, PursuitHunters, RunnerPolicy},
    },
    Direction, Game, GameState, VERSION,
};

/// Default seed when none is given
const DEFAULT_SEED: u64 = 12345;

/// Hard stop for the demo loop
const MAX_DEMO_TICKS: u32 = 200_000;

/// Progress report interval
const REPORT_EVERY: u32 = 1_000;

/// Hunter randomness for the demo
const HUNTER_RANDOMNESS: f64 = 0.2;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Maze Chase v{}", VERSION);

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>().with_context(|| format!("invalid seed {raw:?}"))?,
        None => DEFAULT_SEED,
    };
    let config = match args.next() {
        Some(path) => load_config(&path)?,
        None => GameConfig::default(),
    };

    demo_match(config, seed)
}

fn load_config(path: &str) -> anyhow::Result<GameConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let config: GameConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    config.validate()?;
    Ok(config)
}

fn new_game(config: GameConfig, seed: u64) -> anyhow::Result<Game> {
    let state = GameState::with_config(config, seed)?;
    Ok(Game::new(state, Box::new(PursuitHunters::new(seed, HUNTER_RANDOMNESS))))
}

/// Play a match, then replay its runner moves for a determinism check.
fn demo_match(config: GameConfig, seed: u64) -> anyhow::Result<()> {
    info!("=== Starting Demo Match ===");
    info!("Seed: {}", seed);

    let mut game = new_game(config, seed)?;
    let mut runner = NearestPillRunner::default();
    let mut moves: Vec<Direction> = Vec::new();
    let mut total_events = 0;

    for t in 0..MAX_DEMO_TICKS {
        let dir = runner.decide(game.state());
        moves.push(dir);
        let result = game.advance(dir);
        total_events += result.events.len();

        if t % REPORT_EVERY == 0 {
            let state = game.state();
            info!(
                "Tick {}: level {}, score {}, lives {}, {} pills left",
                t,
                state.level,
                state.score,
                state.lives,
                state.pills.count() + state.power_pills.count()
            );
        }

        // Log important events
        for event in &result.events {
            match &event.data {
                GameEventData::LevelCleared { level } => {
                    info!("Level {} cleared at tick {}", level, event.tick);
                }
                GameEventData::LifeLost { lives_remaining, timed_out } => {
                    info!(
                        "Life lost at tick {} ({} left{})",
                        event.tick,
                        lives_remaining,
                        if *timed_out { ", out of time" } else { "" }
                    );
                }
                GameEventData::ExtraLife { score } => {
                    info!("Extra life at score {}", score);
                }
                _ => {}
            }
        }

        if result.game_over {
            info!("Match ended at tick {}", t);
            break;
        }
    }

    // Print final results
    info!("=== Match Results ===");
    let hash = game.state().compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Total events: {}", total_events);
    let summary = serde_json::to_string_pretty(&game.state().summary())?;
    info!("Summary:\n{}", summary);

    // Verify determinism by replaying the recorded runner moves
    info!("=== Verifying Determinism ===");
    let mut replay = new_game(config, seed)?;
    for dir in &moves {
        replay.advance(*dir);
    }
    let replay_hash = replay.state().compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }
    Ok(())
}
