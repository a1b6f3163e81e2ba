//! Process-wide cache of the built-in mazes.
//!
//! Each maze is parsed on first use and then shared read-only by every game
//! state for the rest of the process.

use std::sync::OnceLock;

use super::Maze;

/// Number of built-in maze variants.
pub const NUM_MAZES: usize = 4;

const LAYOUTS: [(&str, &str); NUM_MAZES] = [
    ("A", include_str!("layouts/a.txt")),
    ("B", include_str!("layouts/b.txt")),
    ("C", include_str!("layouts/c.txt")),
    ("D", include_str!("layouts/d.txt")),
];

static MAZES: [OnceLock<Maze>; NUM_MAZES] = [
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
];

/// Built-in maze by id, parsed on first access.
///
/// # Panics
///
/// Panics if `id >= NUM_MAZES`, or if a built-in layout fails validation,
/// which means the shipped layout data is corrupt.
pub fn maze(id: usize) -> &'static Maze {
    let (name, layout) = LAYOUTS[id];
    MAZES[id].get_or_init(|| match Maze::parse(name, layout) {
        Ok(maze) => maze,
        Err(err) => panic!("built-in maze {name} is invalid: {err}"),
    })
}

/// Maze id used for a (1-based) level number.
///
/// Levels 1-2 use the first maze, 3-5 the second, and from level 6 on the
/// last two alternate every four levels.
pub fn maze_for_level(level: u32) -> usize {
    match level {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2 + ((level - 6) / 4) as usize % 2,
    }
}
