//! Maze Graphs
//!
//! A maze is parsed once from an ASCII layout into an immutable graph with a
//! precomputed distance table. Game states refer to mazes by id through the
//! process-wide [`cache`].
//!
//! ## Layout tiles
//!
//! | tile | meaning                                          |
//! |------|--------------------------------------------------|
//! | `#`  | wall or void                                     |
//! | `.`  | corridor with a pill                             |
//! | `o`  | corridor with a power pill                       |
//! | ` `  | empty corridor                                   |
//! | `P`  | runner spawn                                     |
//! | `G`  | hunter start, the first node outside the home    |
//! | `L`  | hunter home; a node with no edges                |
//!
//! Rows that are open on both the first and last column wrap around
//! horizontally. Nodes on either edge column are tunnel nodes.

pub mod cache;
pub mod distance;

use std::collections::VecDeque;

use smallvec::SmallVec;
use tracing::debug;

use crate::core::direction::Direction;
pub use cache::{maze, maze_for_level, NUM_MAZES};
pub use distance::{DistanceTable, FAR_DISTANCE};

/// Index of a node inside its maze.
pub type NodeIndex = usize;

/// Errors raised while building a maze from a layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    /// The layout has no rows.
    #[error("layout is empty")]
    EmptyLayout,

    /// A row is wider or narrower than the first one.
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        /// Offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },

    /// A character that is not a known tile.
    #[error("unknown tile {tile:?} at ({x}, {y})")]
    UnknownTile {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
        /// The character found.
        tile: char,
    },

    /// A required marker (`P`, `G` or `L`) is absent.
    #[error("layout has no {0:?} marker")]
    MissingMarker(char),

    /// A marker that must be unique appears twice.
    #[error("marker {marker:?} appears at {first:?} and {second:?}")]
    DuplicateMarker {
        /// The marker.
        marker: char,
        /// First occurrence.
        first: (i32, i32),
        /// Second occurrence.
        second: (i32, i32),
    },

    /// No walkable node on the left or right edge, so fruit can never spawn.
    #[error("layout has no tunnel node on its left or right edge")]
    NoTunnels,

    /// A walkable node is cut off from the runner spawn.
    #[error("node ({x}, {y}) is not reachable from the runner spawn")]
    Unreachable {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },
}

/// A maze graph vertex. Never mutated after the maze is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    /// Position in the maze's node list
    pub index: NodeIndex,
    /// Column
    pub x: i32,
    /// Row (grows downwards)
    pub y: i32,
    /// Neighbour per direction slot (Up, Right, Down, Left)
    pub neighbours: [Option<NodeIndex>; 4],
    /// Pill slot, if a pill is placed here
    pub pill: Option<usize>,
    /// Power-pill slot, if a power pill is placed here
    pub power_pill: Option<usize>,
    /// Count of present neighbours
    pub num_neighbours: u8,
}

impl Node {
    /// Neighbour in `dir`. `Neutral` yields the node itself.
    #[inline]
    pub fn neighbour(&self, dir: Direction) -> Option<NodeIndex> {
        match dir.slot() {
            Some(slot) => self.neighbours[slot],
            None => Some(self.index),
        }
    }

    /// More than two exits.
    #[inline]
    pub fn is_junction(&self) -> bool {
        self.num_neighbours > 2
    }
}

/// Immutable maze graph with its distance table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    name: String,
    width: i32,
    height: i32,
    nodes: Vec<Node>,
    pill_nodes: Vec<NodeIndex>,
    power_pill_nodes: Vec<NodeIndex>,
    junctions: Vec<NodeIndex>,
    tunnels: Vec<NodeIndex>,
    runner_start: NodeIndex,
    hunter_start: NodeIndex,
    lair: NodeIndex,
    distances: DistanceTable,
}

impl Maze {
    /// Build a maze from an ASCII layout.
    ///
    /// Pill and power-pill slots are numbered in row-major order. The layout
    /// is validated: exactly one of each marker, at least one tunnel node, and
    /// every walkable node reachable from the runner spawn.
    pub fn parse(name: &str, layout: &str) -> Result<Self, MazeError> {
        let mut rows: Vec<&str> = layout.lines().map(|l| l.trim_end_matches('\r')).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        if rows.is_empty() {
            return Err(MazeError::EmptyLayout);
        }

        let width = rows[0].chars().count();
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MazeError::RaggedRow { row, expected: width, found });
            }
        }
        let height = rows.len();

        let mut grid: Vec<Option<NodeIndex>> = vec![None; width * height];
        let mut nodes: Vec<Node> = Vec::new();
        let mut pill_nodes = Vec::new();
        let mut power_pill_nodes = Vec::new();
        let mut markers: [Option<(NodeIndex, (i32, i32))>; 3] = [None; 3];

        for (y, line) in rows.iter().enumerate() {
            for (x, tile) in line.chars().enumerate() {
                let pos = (x as i32, y as i32);
                let marker = match tile {
                    '#' => continue,
                    '.' | 'o' | ' ' => None,
                    'P' => Some(0),
                    'G' => Some(1),
                    'L' => Some(2),
                    other => {
                        return Err(MazeError::UnknownTile { x: pos.0, y: pos.1, tile: other });
                    }
                };

                let index = nodes.len();
                let mut node = Node {
                    index,
                    x: pos.0,
                    y: pos.1,
                    neighbours: [None; 4],
                    pill: None,
                    power_pill: None,
                    num_neighbours: 0,
                };
                if tile == '.' {
                    node.pill = Some(pill_nodes.len());
                    pill_nodes.push(index);
                } else if tile == 'o' {
                    node.power_pill = Some(power_pill_nodes.len());
                    power_pill_nodes.push(index);
                }

                if let Some(m) = marker {
                    if let Some((_, first)) = markers[m] {
                        return Err(MazeError::DuplicateMarker { marker: tile, first, second: pos });
                    }
                    markers[m] = Some((index, pos));
                }

                grid[y * width + x] = Some(index);
                nodes.push(node);
            }
        }

        let [runner, hunter, lair] = markers;
        let runner_start = runner.ok_or(MazeError::MissingMarker('P'))?.0;
        let hunter_start = hunter.ok_or(MazeError::MissingMarker('G'))?.0;
        let lair = lair.ok_or(MazeError::MissingMarker('L'))?.0;

        link_neighbours(&mut nodes, &grid, width as i32, height as i32, lair);

        let tunnels: Vec<NodeIndex> = nodes
            .iter()
            .filter(|n| n.index != lair && (n.x == 0 || n.x == width as i32 - 1))
            .map(|n| n.index)
            .collect();
        if tunnels.is_empty() {
            return Err(MazeError::NoTunnels);
        }

        check_reachable(&nodes, runner_start, lair)?;

        let junctions = nodes.iter().filter(|n| n.is_junction()).map(|n| n.index).collect();
        let adjacency: Vec<[Option<NodeIndex>; 4]> = nodes.iter().map(|n| n.neighbours).collect();
        let distances = DistanceTable::build(&adjacency);

        debug!(
            "Built maze {}: {} nodes, {} pills, {} power pills",
            name,
            nodes.len(),
            pill_nodes.len(),
            power_pill_nodes.len()
        );

        Ok(Self {
            name: name.to_string(),
            width: width as i32,
            height: height as i32,
            nodes,
            pill_nodes,
            power_pill_nodes,
            junctions,
            tunnels,
            runner_start,
            hunter_start,
            lair,
            distances,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layout width in tiles.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Layout height in tiles.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// All nodes in index order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node by index, `None` if out of range.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Node index per pill slot.
    pub fn pill_nodes(&self) -> &[NodeIndex] {
        &self.pill_nodes
    }

    /// Node index per power-pill slot.
    pub fn power_pill_nodes(&self) -> &[NodeIndex] {
        &self.power_pill_nodes
    }

    /// Nodes with more than two neighbours.
    pub fn junctions(&self) -> &[NodeIndex] {
        &self.junctions
    }

    /// Nodes on the left or right edge.
    pub fn tunnels(&self) -> &[NodeIndex] {
        &self.tunnels
    }

    /// Where the runner starts each life.
    pub fn runner_start(&self) -> NodeIndex {
        self.runner_start
    }

    /// First node outside the home.
    pub fn hunter_start(&self) -> NodeIndex {
        self.hunter_start
    }

    /// The home node. It has no edges.
    pub fn lair(&self) -> NodeIndex {
        self.lair
    }

    /// Is `index` on the left or right edge?
    #[inline]
    pub fn is_edge(&self, index: NodeIndex) -> bool {
        self.nodes
            .get(index)
            .is_some_and(|n| n.x == 0 || n.x == self.width - 1)
    }

    /// Neighbour of `index` in `dir`; `Neutral` returns `index`.
    #[inline]
    pub fn neighbour(&self, index: NodeIndex, dir: Direction) -> Option<NodeIndex> {
        self.nodes.get(index).and_then(|n| n.neighbour(dir))
    }

    /// Neighbour slots of `index`, all `None` if out of range.
    #[inline]
    pub fn neighbours(&self, index: NodeIndex) -> [Option<NodeIndex>; 4] {
        self.nodes.get(index).map_or([None; 4], |n| n.neighbours)
    }

    /// Directions with an edge out of `index`, in slot order.
    pub fn exits(&self, index: NodeIndex) -> SmallVec<[Direction; 4]> {
        let neighbours = self.neighbours(index);
        Direction::ARROWS
            .iter()
            .copied()
            .filter(|d| d.slot().is_some_and(|s| neighbours[s].is_some()))
            .collect()
    }

    /// Junction predicate; out-of-range nodes are not junctions.
    #[inline]
    pub fn is_junction(&self, index: NodeIndex) -> bool {
        self.nodes.get(index).is_some_and(Node::is_junction)
    }

    /// Shortest path length, [`FAR_DISTANCE`] if unreachable or out of range.
    #[inline]
    pub fn path_distance(&self, a: NodeIndex, b: NodeIndex) -> u32 {
        self.distances.get(a, b)
    }

    /// Straight-line distance between node coordinates.
    pub fn euclidean_distance(&self, a: NodeIndex, b: NodeIndex) -> f64 {
        match (self.nodes.get(a), self.nodes.get(b)) {
            (Some(na), Some(nb)) => {
                let dx = (na.x - nb.x) as f64;
                let dy = (na.y - nb.y) as f64;
                (dx * dx + dy * dy).sqrt()
            }
            _ => FAR_DISTANCE as f64,
        }
    }

    /// Taxicab distance between node coordinates.
    pub fn manhattan_distance(&self, a: NodeIndex, b: NodeIndex) -> u32 {
        match (self.nodes.get(a), self.nodes.get(b)) {
            (Some(na), Some(nb)) => na.x.abs_diff(nb.x) + na.y.abs_diff(nb.y),
            _ => FAR_DISTANCE,
        }
    }
}

/// Fill in neighbour slots. The home node stays isolated.
fn link_neighbours(
    nodes: &mut [Node],
    grid: &[Option<NodeIndex>],
    width: i32,
    height: i32,
    lair: NodeIndex,
) {
    let lookup = |x: i32, y: i32| -> Option<NodeIndex> {
        if y < 0 || y >= height {
            return None;
        }
        // Horizontal wrap for tunnel rows
        let x = x.rem_euclid(width);
        grid[(y * width + x) as usize]
    };

    for i in 0..nodes.len() {
        if i == lair {
            continue;
        }
        let (x, y) = (nodes[i].x, nodes[i].y);
        let mut count = 0;
        for dir in Direction::ARROWS {
            let (dx, dy) = dir.delta();
            let next = lookup(x + dx, y + dy).filter(|j| *j != lair && *j != i);
            if let (Some(slot), Some(_)) = (dir.slot(), next) {
                nodes[i].neighbours[slot] = next;
                count += 1;
            }
        }
        nodes[i].num_neighbours = count;
    }
}

fn check_reachable(nodes: &[Node], start: NodeIndex, lair: NodeIndex) -> Result<(), MazeError> {
    let mut seen = vec![false; nodes.len()];
    let mut queue = VecDeque::new();
    seen[start] = true;
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        for next in nodes[node].neighbours.iter().flatten() {
            if !seen[*next] {
                seen[*next] = true;
                queue.push_back(*next);
            }
        }
    }

    match nodes.iter().find(|n| n.index != lair && !seen[n.index]) {
        Some(n) => Err(MazeError::Unreachable { x: n.x, y: n.y }),
        None => Ok(()),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A loop with a spur, one tunnel row and a detached home.
    const SMALL: &str = "\
#######
#P...G#
#.###.#
 .o.. .
#.###.#
#.#L###
#.#####
";

    #[test]
    fn test_parse_small_layout() {
        let maze = Maze::parse("small", SMALL).unwrap();
        assert_eq!(maze.width(), 7);
        assert_eq!(maze.height(), 7);
        assert_eq!(maze.power_pill_nodes().len(), 1);
        assert_eq!(maze.tunnels().len(), 2);

        let lair = maze.node(maze.lair()).unwrap();
        assert_eq!(lair.num_neighbours, 0);
        assert_eq!(maze.path_distance(maze.lair(), maze.runner_start()), FAR_DISTANCE);
    }

    #[test]
    fn test_tunnel_row_wraps() {
        let maze = Maze::parse("small", SMALL).unwrap();
        let left = maze.nodes().iter().find(|n| n.x == 0).unwrap();
        let right = maze.nodes().iter().find(|n| n.x == 6).unwrap();
        assert_eq!(left.neighbour(Direction::Left), Some(right.index));
        assert_eq!(right.neighbour(Direction::Right), Some(left.index));
        assert_eq!(maze.path_distance(left.index, right.index), 1);
    }

    #[test]
    fn test_dead_end_spur() {
        let maze = Maze::parse("small", SMALL).unwrap();
        // Bottom of the left column only leads back up
        let spur = maze.nodes().iter().find(|n| n.x == 1 && n.y == 6).unwrap();
        assert_eq!(spur.num_neighbours, 1);
        assert_eq!(maze.exits(spur.index).as_slice(), &[Direction::Up]);
    }

    #[test]
    fn test_slots_row_major() {
        let maze = Maze::parse("small", SMALL).unwrap();
        let coords: Vec<(i32, i32)> = maze
            .pill_nodes()
            .iter()
            .map(|i| (maze.nodes()[*i].x, maze.nodes()[*i].y))
            .collect();
        let mut sorted = coords.clone();
        sorted.sort_by_key(|(x, y)| (*y, *x));
        assert_eq!(coords, sorted);
        for (slot, node) in maze.pill_nodes().iter().enumerate() {
            assert_eq!(maze.nodes()[*node].pill, Some(slot));
        }
    }

    #[test]
    fn test_out_of_range_queries_are_far() {
        let maze = Maze::parse("small", SMALL).unwrap();
        let bogus = maze.num_nodes() + 5;
        assert_eq!(maze.path_distance(0, bogus), FAR_DISTANCE);
        assert_eq!(maze.manhattan_distance(bogus, 0), FAR_DISTANCE);
        assert_eq!(maze.euclidean_distance(0, bogus), FAR_DISTANCE as f64);
        assert_eq!(maze.neighbour(bogus, Direction::Up), None);
        assert!(!maze.is_junction(bogus));
    }

    #[test]
    fn test_layout_errors() {
        assert_eq!(Maze::parse("e", "\n\n"), Err(MazeError::EmptyLayout));
        assert!(matches!(
            Maze::parse("r", "###\n##\n"),
            Err(MazeError::RaggedRow { row: 1, expected: 3, found: 2 })
        ));
        assert!(matches!(
            Maze::parse("u", "#x#\n"),
            Err(MazeError::UnknownTile { x: 1, y: 0, tile: 'x' })
        ));
        assert_eq!(Maze::parse("m", "P G\n"), Err(MazeError::MissingMarker('L')));
        assert!(matches!(
            Maze::parse("d", "PP GL\n"),
            Err(MazeError::DuplicateMarker { marker: 'P', .. })
        ));
        assert_eq!(Maze::parse("t", "#PGL#\n"), Err(MazeError::NoTunnels));
        assert_eq!(
            Maze::parse("x", " PG#.#\n###L##\n"),
            Err(MazeError::Unreachable { x: 4, y: 0 })
        );
    }

    proptest! {
        #[test]
        fn distance_is_symmetric_with_zero_diagonal(
            id in 0usize..NUM_MAZES,
            a in 0usize..400,
            b in 0usize..400,
        ) {
            let maze = maze(id);
            let n = maze.num_nodes();
            let (a, b) = (a % n, b % n);
            prop_assert_eq!(maze.path_distance(a, a), 0);
            prop_assert_eq!(maze.path_distance(a, b), maze.path_distance(b, a));
        }

        #[test]
        fn distance_obeys_triangle_inequality(
            a in 0usize..300,
            b in 0usize..300,
            c in 0usize..300,
        ) {
            let maze = maze(0);
            let n = maze.num_nodes();
            let (a, b, c) = (a % n, b % n, c % n);
            prop_assert!(
                maze.path_distance(a, c) <= maze.path_distance(a, b) + maze.path_distance(b, c)
            );
        }

        #[test]
        fn neighbours_are_one_step_apart(id in 0usize..NUM_MAZES, a in 0usize..400) {
            let maze = maze(id);
            let a = a % maze.num_nodes();
            for next in maze.neighbours(a).iter().flatten() {
                prop_assert_eq!(maze.path_distance(a, *next), 1);
            }
        }
    }
}
