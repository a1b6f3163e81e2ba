//! Movement Rules
//!
//! Legal-move enumeration, direction normalisation and the per-tick moves of
//! the runner and hunters. The helpers that only need the graph take a
//! [`Maze`] so they work on any layout, not just the built-in ones.

use smallvec::SmallVec;

use crate::core::direction::Direction;
use crate::game::rules::{
    HUNTER_SPEED_REDUCTION, INITIAL_HUNTER_DIRS, LAIR_BOUNCE_DEPTH, LAIR_DOOR_OFFSET,
    LAIR_EXIT_RISE, NUM_HUNTERS,
};
use crate::game::state::{GameState, HunterState};
use crate::maze::{Maze, NodeIndex};

/// Directions available from `node` after moving in `last`.
///
/// Without `include_reverse` the reversal of `last` is dropped, unless that
/// would leave nothing (a dead end), in which case every exit is returned.
pub fn possible_dirs(
    maze: &Maze,
    node: NodeIndex,
    last: Direction,
    include_reverse: bool,
) -> SmallVec<[Direction; 4]> {
    let exits = maze.exits(node);
    if include_reverse || !last.is_arrow() {
        return exits;
    }

    let reverse = last.reverse();
    let forward: SmallVec<[Direction; 4]> =
        exits.iter().copied().filter(|d| *d != reverse).collect();
    if forward.is_empty() {
        exits
    } else {
        forward
    }
}

#[inline]
fn is_open(maze: &Maze, node: NodeIndex, dir: Direction) -> bool {
    dir.is_arrow() && maze.neighbour(node, dir).is_some()
}

/// Normalise a runner request: requested, else last, else the first legal
/// exit (reversal included), else hold.
pub fn resolve_runner_dir(
    maze: &Maze,
    node: NodeIndex,
    requested: Direction,
    last: Direction,
) -> Direction {
    if is_open(maze, node, requested) {
        return requested;
    }
    if is_open(maze, node, last) {
        return last;
    }
    possible_dirs(maze, node, last, true)
        .first()
        .copied()
        .unwrap_or(Direction::Neutral)
}

/// Normalise a hunter request. Same chain as the runner, except the reversal
/// of `last` counts as blocked and is only taken at a dead end.
pub fn resolve_hunter_dir(
    maze: &Maze,
    node: NodeIndex,
    requested: Direction,
    last: Direction,
) -> Direction {
    let reverse = if last.is_arrow() { last.reverse() } else { Direction::Neutral };
    if requested != reverse && is_open(maze, node, requested) {
        return requested;
    }
    if is_open(maze, node, last) {
        return last;
    }
    possible_dirs(maze, node, last, false)
        .first()
        .copied()
        .unwrap_or(Direction::Neutral)
}

/// Move the runner one step.
pub(crate) fn move_runner(state: &mut GameState, requested: Direction) {
    let maze = state.maze();
    let runner = &mut state.runner;
    let dir = resolve_runner_dir(maze, runner.node, requested, runner.dir);
    if let Some(next) = maze.neighbour(runner.node, dir) {
        runner.node = next;
    }
    if dir.is_arrow() {
        runner.dir = dir;
    }
}

/// Move every hunter one step (or one animation step while at home).
pub(crate) fn move_hunters(
    state: &mut GameState,
    intents: &[Direction; NUM_HUNTERS],
    reverse: bool,
) {
    let maze = state.maze();
    let lair = maze.lair();
    let (home_x, home_y) = maze.node(lair).map_or((0, 0), |n| (n.x, n.y));
    let animate = state.total_time % 2 == 0;

    for (i, hunter) in state.hunters.iter_mut().enumerate() {
        if hunter.node == lair {
            if animate {
                let exit_dir = INITIAL_HUNTER_DIRS[i];
                animate_in_lair(hunter, exit_dir, maze.hunter_start(), home_x, home_y);
            }
        } else if reverse {
            let back = hunter.dir.reverse();
            if let Some(next) = maze.neighbour(hunter.node, back) {
                hunter.node = next;
                hunter.dir = back;
            }
        } else if !hunter.is_edible() || hunter.edible_ticks % HUNTER_SPEED_REDUCTION != 0 {
            let dir = resolve_hunter_dir(maze, hunter.node, intents[i], hunter.dir);
            if let Some(next) = maze.neighbour(hunter.node, dir) {
                hunter.node = next;
            }
            if dir.is_arrow() {
                hunter.dir = dir;
            }
        }
    }
}

/// One step of the scripted shuffle at home.
///
/// Offsets are in animation units. A confined hunter bounces between the
/// home row and `LAIR_BOUNCE_DEPTH` below it; once free it lines up with the
/// door, rises, and is placed on the hunter start.
fn animate_in_lair(
    hunter: &mut HunterState,
    exit_dir: Direction,
    hunter_start: NodeIndex,
    home_x: i32,
    home_y: i32,
) {
    let (dx, dy) = hunter.dir.delta();
    hunter.lair_x += dx;
    hunter.lair_y += dy;

    if hunter.lair_y <= home_y - LAIR_EXIT_RISE {
        hunter.node = hunter_start;
        hunter.dir = exit_dir;
    } else if hunter.lair_ticks > 0 {
        if hunter.lair_y == home_y + LAIR_BOUNCE_DEPTH {
            hunter.dir = Direction::Up;
        } else if hunter.lair_y == home_y {
            hunter.dir = Direction::Down;
        }
    } else {
        let door = home_x + LAIR_DOOR_OFFSET;
        hunter.dir = if hunter.lair_x < door {
            Direction::Right
        } else if hunter.lair_x > door {
            Direction::Left
        } else {
            Direction::Up
        };
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// A loop with a dead-end spur on the left column.
    const SPUR: &str = "\
#######
#P...G#
#.###.#
 .o.. .
#.###.#
#.#L###
#.#####
";

    fn spur_maze() -> (Maze, NodeIndex) {
        let maze = Maze::parse("spur", SPUR).unwrap();
        let end = maze.nodes().iter().find(|n| n.x == 1 && n.y == 6).unwrap().index;
        (maze, end)
    }

    #[test]
    fn test_possible_dirs_drops_reverse() {
        let (maze, _) = spur_maze();
        let corner = maze.runner_start();
        // Corner at (1, 1): exits Right and Down
        let all = possible_dirs(&maze, corner, Direction::Up, true);
        assert_eq!(all.as_slice(), &[Direction::Right, Direction::Down]);
        let forward = possible_dirs(&maze, corner, Direction::Left, false);
        assert_eq!(forward.as_slice(), &[Direction::Down]);
    }

    #[test]
    fn test_dead_end_keeps_reverse() {
        let (maze, end) = spur_maze();
        let dirs = possible_dirs(&maze, end, Direction::Down, false);
        assert_eq!(dirs.as_slice(), &[Direction::Up]);

        // An illegal request at the dead end still turns the runner around
        let turned = resolve_runner_dir(&maze, end, Direction::Left, Direction::Down);
        assert_eq!(turned, Direction::Up);
        let turned = resolve_runner_dir(&maze, end, Direction::Neutral, Direction::Down);
        assert_eq!(turned, Direction::Up);
        // Hunters too, but only there
        let turned = resolve_hunter_dir(&maze, end, Direction::Up, Direction::Down);
        assert_eq!(turned, Direction::Up);
    }

    #[test]
    fn test_runner_fallback_chain() {
        let (maze, _) = spur_maze();
        let corridor = maze.nodes().iter().find(|n| n.x == 3 && n.y == 1).unwrap().index;

        let dir = resolve_runner_dir(&maze, corridor, Direction::Left, Direction::Right);
        assert_eq!(dir, Direction::Left);
        // Blocked request falls back to the last direction
        let dir = resolve_runner_dir(&maze, corridor, Direction::Up, Direction::Right);
        assert_eq!(dir, Direction::Right);
        let dir = resolve_runner_dir(&maze, corridor, Direction::from_index(9), Direction::Left);
        assert_eq!(dir, Direction::Left);
    }

    #[test]
    fn test_hunter_never_reverses_in_corridor() {
        let (maze, _) = spur_maze();
        let corridor = maze.nodes().iter().find(|n| n.x == 3 && n.y == 1).unwrap().index;
        let dir = resolve_hunter_dir(&maze, corridor, Direction::Left, Direction::Right);
        assert_eq!(dir, Direction::Right);
        let dir = resolve_hunter_dir(&maze, corridor, Direction::Right, Direction::Right);
        assert_eq!(dir, Direction::Right);
    }

    #[test]
    fn test_hunter_turns_corner() {
        let (maze, _) = spur_maze();
        // Top right corner at (5, 1): came in moving Right, only Down is forward
        let corner = maze.hunter_start();
        let dir = resolve_hunter_dir(&maze, corner, Direction::Neutral, Direction::Right);
        assert_eq!(dir, Direction::Down);
        let dir = resolve_hunter_dir(&maze, corner, Direction::Left, Direction::Right);
        assert_eq!(dir, Direction::Down);
    }

    #[test]
    fn test_isolated_node_holds() {
        let (maze, _) = spur_maze();
        let lair = maze.lair();
        let dir = resolve_runner_dir(&maze, lair, Direction::Up, Direction::Left);
        assert_eq!(dir, Direction::Neutral);
        let dir = resolve_hunter_dir(&maze, lair, Direction::Up, Direction::Left);
        assert_eq!(dir, Direction::Neutral);
    }

    const HOLD: [Direction; NUM_HUNTERS] = [Direction::Neutral; NUM_HUNTERS];

    /// Hunter 0 on a horizontal corridor node of the first maze, heading Right.
    fn hunter_in_corridor() -> GameState {
        let mut state = GameState::new(12);
        let maze = state.maze();
        let corridor = maze
            .nodes()
            .iter()
            .find(|n| maze.exits(n.index).as_slice() == [Direction::Right, Direction::Left])
            .unwrap()
            .index;
        state.hunters[0].node = corridor;
        state.hunters[0].dir = Direction::Right;
        state
    }

    #[test]
    fn test_reversal_steps_hunters_back() {
        let mut state = hunter_in_corridor();
        let start = state.hunters[0].node;
        let behind = state.neighbour(start, Direction::Left).unwrap();

        // The reversal overrides the requested direction
        let intents = [Direction::Right; NUM_HUNTERS];
        move_hunters(&mut state, &intents, true);
        assert_eq!(state.hunters[0].node, behind);
        assert_eq!(state.hunters[0].dir, Direction::Left);
    }

    #[test]
    fn test_edible_hunter_skips_even_ticks() {
        let mut state = hunter_in_corridor();
        let start = state.hunters[0].node;

        state.hunters[0].edible_ticks = 50;
        move_hunters(&mut state, &HOLD, false);
        assert_eq!(state.hunters[0].node, start);
        assert_eq!(state.hunters[0].dir, Direction::Right);

        state.hunters[0].edible_ticks = 51;
        move_hunters(&mut state, &HOLD, false);
        assert_eq!(state.hunters[0].node, state.neighbour(start, Direction::Right).unwrap());
        assert_eq!(state.hunters[0].dir, Direction::Right);
    }

    #[test]
    fn test_confined_hunter_bounces() {
        let mut hunter = HunterState {
            node: 0,
            dir: Direction::Up,
            lair_ticks: 100,
            lair_x: 18,
            lair_y: 12,
            ..HunterState::default()
        };
        // Home node at (10, 10)
        animate_in_lair(&mut hunter, Direction::Left, 5, 10, 10);
        assert_eq!((hunter.lair_y, hunter.dir), (11, Direction::Up));
        animate_in_lair(&mut hunter, Direction::Left, 5, 10, 10);
        assert_eq!((hunter.lair_y, hunter.dir), (10, Direction::Down));
        for _ in 0..4 {
            animate_in_lair(&mut hunter, Direction::Left, 5, 10, 10);
        }
        assert_eq!((hunter.lair_y, hunter.dir), (14, Direction::Up));
        assert_eq!(hunter.node, 0);
    }

    #[test]
    fn test_free_hunter_walks_to_door_and_leaves() {
        let mut hunter = HunterState {
            node: 0,
            dir: Direction::Down,
            lair_x: 10,
            lair_y: 12,
            ..HunterState::default()
        };
        let mut steps = 0;
        while hunter.node == 0 {
            animate_in_lair(&mut hunter, Direction::Right, 5, 10, 10);
            steps += 1;
            assert!(steps < 100);
        }
        assert_eq!(hunter.node, 5);
        assert_eq!(hunter.dir, Direction::Right);
        assert_eq!(hunter.lair_x, 18);
    }
}
