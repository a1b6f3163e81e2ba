//! Authoritative Simulation Tick
//!
//! The per-tick state transition. Given the same state and the same
//! directions it always produces the same successor: all randomness comes
//! from `state.rng`, and every phase runs in a fixed order.

#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::direction::Direction;
use crate::game::collision::resolve_feast;
use crate::game::config::PauseMode;
use crate::game::events::GameEvent;
use crate::game::fruit::update_fruit;
use crate::game::movement::{move_hunters, move_runner};
use crate::game::rules::{
    edible_time, EXTRA_LIFE_SCORE, HUNTER_REVERSAL_CHANCE, LEVEL_LIMIT, MAX_LEVELS, NUM_HUNTERS,
    PILL_SCORE, POWER_PILL_SCORE,
};
use crate::game::state::GameState;

/// Result of a tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// The level number changed this tick
    pub level_changed: bool,
    /// The match is over (ended this tick or earlier)
    pub game_over: bool,
}

/// Run one simulation tick.
///
/// # Arguments
///
/// * `state` - The game state (will be mutated)
/// * `runner_dir` - Requested runner direction; illegal requests are normalised
/// * `hunter_dirs` - Requested direction per hunter, from the hunter policy
///
/// A finished match is left untouched.
pub fn advance(
    state: &mut GameState,
    runner_dir: Direction,
    hunter_dirs: &[Direction; NUM_HUNTERS],
) -> TickResult {
    let mut result = TickResult::default();
    if state.game_over {
        result.game_over = true;
        return result;
    }
    let level_before = state.level;

    // 1. Pause countdown; nothing moves during a pause tick
    if tick_pauses(state) {
        return finish_tick(state, level_before, result);
    }

    // 2. Runner
    move_runner(state, runner_dir);

    // 3. Pill
    eat_pill(state);

    // 4. Power pill and reversals
    let reverse = eat_power_pill(state);

    // 5. Hunters
    move_hunters(state, hunter_dirs, reverse);

    // 6. Runner vs hunters
    resolve_feast(state);

    // 7. Confinement countdown
    for hunter in &mut state.hunters {
        hunter.lair_ticks = hunter.lair_ticks.saturating_sub(1);
    }

    // 8. Fruit
    update_fruit(state);

    // 9. Extra life
    award_extra_life(state);

    // 10. Clocks
    state.total_time += 1;
    state.level_time += 1;

    // 11. Level / game end
    check_level_state(state);

    // 12. Pauses resolve immediately in simulation mode
    if state.config.pause_mode == PauseMode::Simulation {
        resolve_pauses_now(state);
    }

    #[cfg(feature = "debug-tracing")]
    trace!(
        "Tick {}: runner {} {:?}, score {}, lives {}",
        state.total_time,
        state.runner.node,
        state.runner.dir,
        state.score,
        state.lives
    );

    finish_tick(state, level_before, result)
}

fn finish_tick(state: &mut GameState, level_before: u32, mut result: TickResult) -> TickResult {
    result.level_changed = state.level != level_before;
    result.game_over = state.game_over;
    result.events = state.take_events();
    result
}

/// Count down an active pause. Returns true if this tick was a pause tick.
fn tick_pauses(state: &mut GameState) -> bool {
    if state.eating_ticks > 0 {
        state.eating_ticks -= 1;
        if state.eating_ticks == 0 {
            state.send_eaten_hunter_home();
        }
        return true;
    }
    if state.dying_ticks > 0 {
        state.dying_ticks -= 1;
        if state.dying_ticks == 0 {
            state.respawn_after_capture();
        }
        return true;
    }
    false
}

fn resolve_pauses_now(state: &mut GameState) {
    if state.eating_ticks > 0 {
        state.eating_ticks = 0;
        state.send_eaten_hunter_home();
    }
    if state.dying_ticks > 0 {
        state.dying_ticks = 0;
        state.respawn_after_capture();
    }
}

fn eat_pill(state: &mut GameState) {
    let node = state.runner.node;
    let Some(slot) = state.maze().node(node).and_then(|n| n.pill) else {
        return;
    };
    if state.pills.get(slot) {
        state.pills.clear(slot);
        state.score = state.score.saturating_add(PILL_SCORE);
        state.push_event(GameEvent::pill_eaten(state.total_time, node, PILL_SCORE));
    }
}

/// Returns true if the hunters reverse this tick.
fn eat_power_pill(state: &mut GameState) -> bool {
    let node = state.runner.node;
    let slot = state.maze().node(node).and_then(|n| n.power_pill);

    let reverse = match slot {
        Some(slot) if state.power_pills.get(slot) => {
            state.power_pills.clear(slot);
            state.eat_multiplier = 1;
            state.score = state.score.saturating_add(POWER_PILL_SCORE);

            let edible = edible_time(state.level);
            for hunter in &mut state.hunters {
                hunter.edible_ticks = edible;
            }
            state.push_event(GameEvent::power_pill_eaten(state.total_time, node, edible));
            true
        }
        // Random reversal, never in the first tick of a life
        _ => state.level_time > 1 && state.rng.next_f64() < HUNTER_REVERSAL_CHANCE,
    };

    if reverse {
        state.push_event(GameEvent::hunters_reversed(state.total_time));
    }
    reverse
}

fn award_extra_life(state: &mut GameState) {
    if !state.extra_life_awarded && state.score >= EXTRA_LIFE_SCORE {
        state.extra_life_awarded = true;
        state.lives += 1;
        state.push_event(GameEvent::extra_life(state.total_time, state.score));
    }
}

/// Level cleared or out of time.
fn check_level_state(state: &mut GameState) {
    let cleared = state.pills.none() && state.power_pills.none();
    let timed_out = state.level_time >= LEVEL_LIMIT;
    if !cleared && !timed_out {
        return;
    }

    if cleared {
        state.push_event(GameEvent::level_cleared(state.total_time, state.level));
    } else {
        state.lose_life(true);
    }

    if state.lives == 0 || state.level >= MAX_LEVELS {
        state.finish();
    } else if cleared {
        state.reset(true);
    } else {
        // Same level, same board, fresh clock
        state.reset(false);
        state.level_time = 0;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameConfig;
    use crate::game::events::GameEventData;
    use crate::game::movement::resolve_runner_dir;
    use crate::game::rules::{
        eaten_lair_time, DYING_PAUSE_TICKS, EATING_PAUSE_TICKS, HUNTER_EAT_SCORE, NUM_LIVES,
    };
    use crate::game::state::PlayPhase;

    const HOLD: [Direction; NUM_HUNTERS] = [Direction::Neutral; NUM_HUNTERS];

    fn interactive(seed: u64) -> GameState {
        GameState::with_config(GameConfig::interactive(), seed).unwrap()
    }

    /// Put hunter 0 on the runner, heading the way the runner will go.
    fn hunter_on_runner(state: &mut GameState) -> (Direction, [Direction; NUM_HUNTERS]) {
        let maze = state.maze();
        let dir = resolve_runner_dir(maze, state.runner.node, Direction::Left, state.runner.dir);
        state.hunters[0].node = state.runner.node;
        state.hunters[0].dir = dir;
        (dir, [dir; NUM_HUNTERS])
    }

    /// Runner one step from the power pill at slot 0.
    fn beside_power_pill(state: &mut GameState) -> Direction {
        let maze = state.maze();
        let pill = maze.power_pill_nodes()[0];
        for dir in Direction::ARROWS {
            if let Some(from) = maze.neighbour(pill, dir.reverse()) {
                if maze.neighbour(from, dir) == Some(pill) {
                    state.runner.node = from;
                    state.runner.dir = dir;
                    return dir;
                }
            }
        }
        panic!("power pill has no neighbour");
    }

    #[test]
    fn test_runner_eats_pill() {
        let mut state = GameState::new(1);
        let maze = state.maze();
        let start = state.runner.node;
        let (dir, next) = Direction::ARROWS
            .iter()
            .filter_map(|d| maze.neighbour(start, *d).map(|n| (*d, n)))
            .find(|(_, n)| maze.node(*n).unwrap().pill.is_some())
            .unwrap();

        let result = advance(&mut state, dir, &HOLD);
        assert_eq!(state.runner.node, next);
        assert_eq!(state.score, PILL_SCORE);
        assert_eq!(state.total_time, 1);
        assert_eq!(state.level_time, 1);
        assert!(matches!(result.events[0].data, GameEventData::PillEaten { .. }));
    }

    #[test]
    fn test_power_pill_makes_hunters_edible() {
        let mut state = GameState::new(2);
        state.eat_multiplier = 8;
        let dir = beside_power_pill(&mut state);

        let result = advance(&mut state, dir, &HOLD);
        assert!(!state.power_pills.get(0));
        assert_eq!(state.eat_multiplier, 1);
        assert!(state.score >= POWER_PILL_SCORE);
        // The feast phase already ticked the timers once
        for hunter in &state.hunters {
            assert_eq!(hunter.edible_ticks, edible_time(1) - 1);
        }
        assert!(result
            .events
            .iter()
            .any(|e| e.data == GameEventData::HuntersReversed));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut state = GameState::new(3);
        let snapshot = state.clone();
        let before = snapshot.compute_hash();

        for _ in 0..10 {
            advance(&mut state, Direction::Left, &HOLD);
        }
        assert_eq!(snapshot.compute_hash(), before);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.pills.count(), snapshot.pills.len());
        assert_ne!(state.compute_hash(), before);
    }

    #[test]
    fn test_same_inputs_same_outcome() {
        let mut a = GameState::new(77);
        let mut b = a.clone();
        let script = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
        for t in 0..600 {
            let dir = script[(t / 15) % script.len()];
            let ra = advance(&mut a, dir, &HOLD);
            let rb = advance(&mut b, dir, &HOLD);
            assert_eq!(ra, rb);
        }
        assert_eq!(a.compute_hash(), b.compute_hash());
        assert_eq!(a.fruit, b.fruit);
    }

    #[test]
    fn test_dying_pause_interactive() {
        let mut state = interactive(4);
        let runner_start = state.runner.node;
        // Runner steps away, hunter follows onto it
        let (dir, intents) = hunter_on_runner(&mut state);
        let result = advance(&mut state, dir, &intents);
        assert!(result.events.iter().any(|e| matches!(e.data, GameEventData::RunnerCaught { .. })));
        assert_eq!(state.phase(), PlayPhase::DyingPause { ticks_remaining: DYING_PAUSE_TICKS });

        let frozen = state.runner.node;
        for _ in 0..DYING_PAUSE_TICKS - 1 {
            advance(&mut state, Direction::Right, &HOLD);
            assert_eq!(state.runner.node, frozen);
            assert_eq!(state.lives, NUM_LIVES);
        }
        let result = advance(&mut state, Direction::Right, &HOLD);
        assert_eq!(state.lives, NUM_LIVES - 1);
        assert_eq!(state.runner.node, runner_start);
        assert_eq!(state.phase(), PlayPhase::Running);
        assert!(result.events.iter().any(|e| matches!(
            e.data,
            GameEventData::LifeLost { timed_out: false, .. }
        )));
    }

    #[test]
    fn test_eating_pause_interactive() {
        let mut state = interactive(5);
        let (dir, intents) = hunter_on_runner(&mut state);
        // Odd, so the edible hunter is not in a slowed tick
        state.hunters[0].edible_ticks = 51;
        let score_before = state.score;

        let result = advance(&mut state, dir, &intents);
        let eaten = result
            .events
            .iter()
            .find_map(|e| match e.data {
                GameEventData::HunterEaten { hunter, points } => Some((hunter, points)),
                _ => None,
            })
            .expect("hunter should be eaten");
        assert_eq!(eaten, (0, HUNTER_EAT_SCORE));
        assert!(state.score >= score_before + HUNTER_EAT_SCORE);
        assert_eq!(state.phase(), PlayPhase::EatingPause { ticks_remaining: EATING_PAUSE_TICKS });
        assert_eq!(state.eating_hunter, Some(0));

        for _ in 0..EATING_PAUSE_TICKS {
            advance(&mut state, Direction::Left, &HOLD);
        }
        assert_eq!(state.phase(), PlayPhase::Running);
        assert!(state.is_in_lair(0));
        assert_eq!(state.hunters[0].lair_ticks, eaten_lair_time(1));
        assert_eq!(state.hunters[0].edible_ticks, 0);
    }

    #[test]
    fn test_simulation_mode_resolves_capture_in_same_tick() {
        let mut state = GameState::new(4);
        let (dir, intents) = hunter_on_runner(&mut state);
        let result = advance(&mut state, dir, &intents);
        assert_eq!(state.phase(), PlayPhase::Running);
        assert_eq!(state.lives, NUM_LIVES - 1);
        assert_eq!(state.runner.node, state.maze().runner_start());
        assert!(!result.game_over);
    }

    #[test]
    fn test_last_pill_clears_level() {
        let mut state = GameState::new(6);
        state.pills.clear_all();
        state.power_pills.clear_all();
        let dir = beside_power_pill(&mut state);
        state.power_pills.set(0);

        let result = advance(&mut state, dir, &HOLD);
        assert!(result.level_changed);
        assert_eq!(state.level, 2);
        assert_eq!(state.lives, NUM_LIVES);
        assert_eq!(state.level_time, 0);
        assert_eq!(state.pills.count(), state.pills.len());
        assert!(result.events.iter().any(|e| e.data == GameEventData::LevelCleared { level: 1 }));
    }

    #[test]
    fn test_time_limit_costs_a_life_not_the_level() {
        let mut state = GameState::new(6);
        state.level_time = LEVEL_LIMIT - 1;
        // Keep the hunters out of the way
        state.hunters[0].node = state.maze().lair();
        let pills_before = state.pills.count();

        let result = advance(&mut state, Direction::Neutral, &HOLD);
        assert!(!result.level_changed);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, NUM_LIVES - 1);
        assert_eq!(state.level_time, 0);
        assert!(state.pills.count() + 1 >= pills_before);
        assert!(result.events.iter().any(|e| matches!(
            e.data,
            GameEventData::LifeLost { timed_out: true, .. }
        )));
    }

    #[test]
    fn test_clearing_final_level_ends_match() {
        let mut state = GameState::new(6);
        state.level = MAX_LEVELS;
        state.hunters[0].node = state.maze().lair();
        state.pills.clear_all();
        state.power_pills.clear_all();
        let dir = beside_power_pill(&mut state);
        state.power_pills.set(0);

        let result = advance(&mut state, dir, &HOLD);
        assert!(result.game_over);
        assert!(!result.level_changed);
        assert_eq!(state.level, MAX_LEVELS);
        assert_eq!(state.lives, NUM_LIVES);
        assert_eq!(state.phase(), PlayPhase::GameOver);
        assert!(result
            .events
            .iter()
            .any(|e| e.data == GameEventData::LevelCleared { level: MAX_LEVELS }));
        assert!(result.events.iter().any(|e| matches!(e.data, GameEventData::GameOver { .. })));
    }

    #[test]
    fn test_time_limit_on_final_level_ends_match() {
        let mut state = GameState::new(6);
        state.level = MAX_LEVELS;
        state.level_time = LEVEL_LIMIT - 1;
        state.hunters[0].node = state.maze().lair();

        let result = advance(&mut state, Direction::Neutral, &HOLD);
        assert!(result.game_over);
        assert!(!result.level_changed);
        // Lives remain, the level cap ends it
        assert_eq!(state.lives, NUM_LIVES - 1);
        assert_eq!(state.phase(), PlayPhase::GameOver);
        assert!(result.events.iter().any(|e| matches!(
            e.data,
            GameEventData::LifeLost { timed_out: true, .. }
        )));
    }

    #[test]
    fn test_last_life_ends_match() {
        let mut state = GameState::new(6);
        state.lives = 1;
        state.level_time = LEVEL_LIMIT - 1;
        state.hunters[0].node = state.maze().lair();

        let result = advance(&mut state, Direction::Neutral, &HOLD);
        assert!(result.game_over);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase(), PlayPhase::GameOver);

        // Finished matches are frozen
        let hash = state.compute_hash();
        let result = advance(&mut state, Direction::Up, &HOLD);
        assert!(result.events.is_empty());
        assert!(result.game_over);
        assert_eq!(state.compute_hash(), hash);
    }

    #[test]
    fn test_extra_life_once() {
        let mut state = GameState::new(8);
        state.hunters[0].node = state.maze().lair();
        state.score = EXTRA_LIFE_SCORE;
        advance(&mut state, Direction::Neutral, &HOLD);
        assert_eq!(state.lives, NUM_LIVES + 1);
        assert!(state.extra_life_awarded);

        state.score += EXTRA_LIFE_SCORE;
        advance(&mut state, Direction::Neutral, &HOLD);
        assert_eq!(state.lives, NUM_LIVES + 1);
    }

    #[test]
    fn test_confined_hunters_leave_home() {
        let mut state = GameState::new(9);
        let lair = state.maze().lair();
        state.place_in_lair(0);
        state.hunters[0].lair_ticks = 10_000;
        for hunter in &mut state.hunters[1..] {
            hunter.lair_ticks = 0;
        }

        let mut left = [false; NUM_HUNTERS];
        for _ in 0..200 {
            advance(&mut state, Direction::Neutral, &HOLD);
            for (i, hunter) in state.hunters.iter().enumerate() {
                left[i] |= hunter.node != lair;
            }
        }
        assert!(left[1..].iter().all(|l| *l), "hunters never left home: {:?}", state.hunters);
    }
}
