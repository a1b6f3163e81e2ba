//! Bonus Fruit
//!
//! Up to two fruit per level enter through a tunnel, wander at half speed
//! and leave through the first edge node they reach.

use serde::{Deserialize, Serialize};

use crate::core::direction::Direction;
use crate::core::rng::DeterministicRng;
use crate::game::events::GameEvent;
use crate::game::movement::possible_dirs;
use crate::game::rules::{
    EAT_DISTANCE, FIRST_FRUIT_PILLS_EATEN, FRUITS_PER_LEVEL, FRUIT_DISPLAY_TICKS,
    SECOND_FRUIT_PILLS_LEFT,
};
use crate::game::state::GameState;

/// Kind of bonus fruit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum FruitKind {
    /// 100 points
    #[default]
    Cherry = 0,
    /// 200 points
    Strawberry = 1,
    /// 500 points
    Orange = 2,
    /// 700 points
    Apple = 3,
    /// 1000 points
    Melon = 4,
    /// 2000 points
    Galaxian = 5,
    /// 5000 points
    Bell = 6,
}

impl FruitKind {
    /// Number of kinds.
    pub const COUNT: u32 = 7;

    /// Get point value for this fruit.
    pub fn value(self) -> u32 {
        match self {
            FruitKind::Cherry => 100,
            FruitKind::Strawberry => 200,
            FruitKind::Orange => 500,
            FruitKind::Apple => 700,
            FruitKind::Melon => 1000,
            FruitKind::Galaxian => 2000,
            FruitKind::Bell => 5000,
        }
    }

    /// Get from index.
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(FruitKind::Cherry),
            1 => Some(FruitKind::Strawberry),
            2 => Some(FruitKind::Orange),
            3 => Some(FruitKind::Apple),
            4 => Some(FruitKind::Melon),
            5 => Some(FruitKind::Galaxian),
            6 => Some(FruitKind::Bell),
            _ => None,
        }
    }

    /// Kind for a fruit spawned on `level`: fixed through level 7, random after.
    pub fn for_level(level: u32, rng: &mut DeterministicRng) -> Self {
        let index = if level <= Self::COUNT {
            level.saturating_sub(1)
        } else {
            rng.next_int(Self::COUNT)
        };
        Self::from_index(index).unwrap_or_default()
    }
}

/// Run the fruit phase of a tick.
pub(crate) fn update_fruit(state: &mut GameState) {
    if state.fruit.eaten_ticks > 0 {
        state.fruit.eaten_ticks -= 1;
    }

    let Some(mut node) = state.fruit.node else {
        let active = state.pills.count();
        let eaten = state.pills.len() - active;
        let first = eaten == FIRST_FRUIT_PILLS_EATEN && state.fruit.remaining == FRUITS_PER_LEVEL;
        let second = active == SECOND_FRUIT_PILLS_LEFT && state.fruit.remaining > 0;
        if first || second {
            spawn_fruit(state);
        }
        return;
    };

    let maze = state.maze();

    // Half speed
    if state.level_time % 2 == 0 {
        let options = possible_dirs(maze, node, state.fruit.dir, false);
        if let Some(dir) = state.rng.choose(options.as_slice()).copied() {
            state.fruit.dir = dir;
            node = maze.neighbour(node, dir).unwrap_or(node);
            state.fruit.node = Some(node);
        }

        if maze.is_edge(node) {
            state.fruit.node = None;
            state.push_event(GameEvent::fruit_escaped(state.total_time, node));
            return;
        }
    }

    if maze.path_distance(state.runner.node, node) <= EAT_DISTANCE {
        let kind = state.fruit.kind;
        let points = kind.value();
        state.score = state.score.saturating_add(points);
        state.fruit.eaten_ticks = FRUIT_DISPLAY_TICKS;
        state.fruit.eaten_node = Some(node);
        state.fruit.eaten_kind = kind;
        state.fruit.node = None;
        state.push_event(GameEvent::fruit_eaten(state.total_time, node, kind, points));
    }
}

fn spawn_fruit(state: &mut GameState) {
    let maze = state.maze();
    let node = match state.rng.choose(maze.tunnels()) {
        Some(node) => *node,
        None => panic!("maze {} has no tunnel node to spawn fruit from", maze.name()),
    };
    let kind = FruitKind::for_level(state.level, &mut state.rng);
    let at_left_edge = maze.node(node).is_some_and(|n| n.x == 0);

    state.fruit.node = Some(node);
    state.fruit.kind = kind;
    state.fruit.dir = if at_left_edge { Direction::Right } else { Direction::Left };
    state.fruit.remaining = state.fruit.remaining.saturating_sub(1);
    state.push_event(GameEvent::fruit_spawned(state.total_time, node, kind));
}
