//! Read-only Queries
//!
//! Distances, legal moves and target selection over a [`GameState`]. These
//! are what search-based agents call thousands of times per decision, so
//! they lean on the precomputed distance table and never allocate on the
//! common paths.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::direction::Direction;
use crate::game::fruit::FruitKind;
use crate::game::movement::possible_dirs;
use crate::game::rules::HUNTER_SPEED_REDUCTION;
use crate::game::state::GameState;
use crate::maze::{NodeIndex, FAR_DISTANCE};

/// How to measure the distance between two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Shortest path through the maze
    #[default]
    Path,
    /// Straight line between coordinates
    Euclid,
    /// Taxicab distance between coordinates
    Manhattan,
}

impl GameState {
    // =========================================================================
    // GEOMETRY
    // =========================================================================

    /// Neighbour of `node` in `dir`; `Neutral` returns `node`.
    #[inline]
    pub fn neighbour(&self, node: NodeIndex, dir: Direction) -> Option<NodeIndex> {
        self.maze().neighbour(node, dir)
    }

    /// Does `node` have more than two exits?
    #[inline]
    pub fn is_junction(&self, node: NodeIndex) -> bool {
        self.maze().is_junction(node)
    }

    /// Shortest path length; [`FAR_DISTANCE`] for bogus or disconnected nodes.
    #[inline]
    pub fn path_distance(&self, a: NodeIndex, b: NodeIndex) -> u32 {
        self.maze().path_distance(a, b)
    }

    /// Straight-line distance between node coordinates.
    #[inline]
    pub fn euclidean_distance(&self, a: NodeIndex, b: NodeIndex) -> f64 {
        self.maze().euclidean_distance(a, b)
    }

    /// Taxicab distance between node coordinates.
    #[inline]
    pub fn manhattan_distance(&self, a: NodeIndex, b: NodeIndex) -> u32 {
        self.maze().manhattan_distance(a, b)
    }

    /// Distance under `metric`.
    pub fn distance(&self, a: NodeIndex, b: NodeIndex, metric: DistanceMetric) -> f64 {
        match metric {
            DistanceMetric::Path => self.path_distance(a, b) as f64,
            DistanceMetric::Euclid => self.euclidean_distance(a, b),
            DistanceMetric::Manhattan => self.manhattan_distance(a, b) as f64,
        }
    }

    // =========================================================================
    // LEGAL MOVES
    // =========================================================================

    /// Directions the runner can take from where it stands.
    pub fn legal_runner_moves(&self, include_reverse: bool) -> SmallVec<[Direction; 4]> {
        possible_dirs(self.maze(), self.runner.node, self.runner.dir, include_reverse)
    }

    /// Directions hunter `i` can take; empty while it is at home.
    pub fn legal_hunter_moves(&self, i: usize) -> SmallVec<[Direction; 4]> {
        match self.hunters.get(i) {
            Some(h) => possible_dirs(self.maze(), h.node, h.dir, false),
            None => SmallVec::new(),
        }
    }

    /// Will hunter `i` face a real choice on the next tick?
    pub fn hunter_requires_action(&self, i: usize) -> bool {
        self.hunters.get(i).is_some_and(|h| {
            self.is_junction(h.node)
                && (!h.is_edible() || h.edible_ticks % HUNTER_SPEED_REDUCTION != 0)
        })
    }

    // =========================================================================
    // DIRECTIONS & TARGETS
    // =========================================================================

    /// Runner direction that gets closest to (or, with `closer == false`,
    /// farthest from) `to`. Reversal is allowed.
    pub fn next_runner_dir(
        &self,
        to: NodeIndex,
        closer: bool,
        metric: DistanceMetric,
    ) -> Direction {
        let options = possible_dirs(self.maze(), self.runner.node, self.runner.dir, true);
        self.best_dir(self.runner.node, &options, to, closer, metric)
    }

    /// Like [`next_runner_dir`](Self::next_runner_dir) for hunter `i`, which
    /// may not reverse.
    pub fn next_hunter_dir(
        &self,
        i: usize,
        to: NodeIndex,
        closer: bool,
        metric: DistanceMetric,
    ) -> Direction {
        let Some(hunter) = self.hunters.get(i) else {
            return Direction::Neutral;
        };
        let options = self.legal_hunter_moves(i);
        self.best_dir(hunter.node, &options, to, closer, metric)
    }

    /// Best of `options` from `from`; ties go to the earliest option.
    fn best_dir(
        &self,
        from: NodeIndex,
        options: &[Direction],
        to: NodeIndex,
        closer: bool,
        metric: DistanceMetric,
    ) -> Direction {
        let mut best = Direction::Neutral;
        let mut best_distance = if closer { f64::INFINITY } else { f64::NEG_INFINITY };

        for dir in options {
            let Some(next) = self.neighbour(from, *dir) else {
                continue;
            };
            let d = self.distance(next, to, metric);
            if (closer && d < best_distance) || (!closer && d > best_distance) {
                best = *dir;
                best_distance = d;
            }
        }
        best
    }

    /// Nearest (or farthest) of `targets` from `from`; `None` if empty.
    pub fn target(
        &self,
        from: NodeIndex,
        targets: &[NodeIndex],
        nearest: bool,
        metric: DistanceMetric,
    ) -> Option<NodeIndex> {
        let mut best: Option<(NodeIndex, f64)> = None;
        for target in targets {
            let d = self.distance(from, *target, metric);
            let better = match best {
                None => true,
                Some((_, best_d)) => (nearest && d < best_d) || (!nearest && d > best_d),
            };
            if better {
                best = Some((*target, d));
            }
        }
        best.map(|(node, _)| node)
    }

    /// Nearest of `targets` from `from`.
    pub fn nearest_of(
        &self,
        from: NodeIndex,
        targets: &[NodeIndex],
        metric: DistanceMetric,
    ) -> Option<NodeIndex> {
        self.target(from, targets, true, metric)
    }

    /// Farthest of `targets` from `from`.
    pub fn farthest_of(
        &self,
        from: NodeIndex,
        targets: &[NodeIndex],
        metric: DistanceMetric,
    ) -> Option<NodeIndex> {
        self.target(from, targets, false, metric)
    }

    /// Nearest (or farthest) of `targets` for hunter `i`, measured along the
    /// hunter's no-reverse path.
    pub fn hunter_target(
        &self,
        i: usize,
        targets: &[NodeIndex],
        nearest: bool,
    ) -> Option<NodeIndex> {
        let mut best: Option<(NodeIndex, u32)> = None;
        for target in targets {
            let d = self.hunter_path_distance(i, *target);
            let better = match best {
                None => true,
                Some((_, best_d)) => (nearest && d < best_d) || (!nearest && d > best_d),
            };
            if better {
                best = Some((*target, d));
            }
        }
        best.map(|(node, _)| node)
    }

    // =========================================================================
    // PATHS
    // =========================================================================

    /// A shortest path from `from` to `to`, both ends included.
    ///
    /// Empty if the nodes are disconnected or out of range.
    pub fn path(&self, from: NodeIndex, to: NodeIndex) -> Vec<NodeIndex> {
        let maze = self.maze();
        let total = maze.path_distance(from, to);
        if total >= FAR_DISTANCE {
            return Vec::new();
        }

        let mut path = Vec::with_capacity(total as usize + 1);
        let mut node = from;
        path.push(node);
        while node != to {
            let remaining = maze.path_distance(node, to);
            let step = maze
                .neighbours(node)
                .into_iter()
                .flatten()
                .find(|n| maze.path_distance(*n, to) < remaining);
            match step {
                Some(next) => {
                    node = next;
                    path.push(node);
                }
                None => return Vec::new(),
            }
        }
        path
    }

    /// The path hunter `i` would follow to `to` by greedily taking the
    /// closest non-reversing exit, both ends included.
    ///
    /// Empty if the hunter cannot get there (for instance while at home).
    pub fn hunter_path(&self, i: usize, to: NodeIndex) -> Vec<NodeIndex> {
        let maze = self.maze();
        let Some(hunter) = self.hunters.get(i) else {
            return Vec::new();
        };
        if maze.path_distance(hunter.node, to) >= FAR_DISTANCE {
            return Vec::new();
        }

        let mut node = hunter.node;
        let mut last = hunter.dir;
        let mut path = vec![node];
        // Greedy no-reverse walks can circle; cap them
        let limit = maze.num_nodes() * 2;

        while node != to {
            if path.len() > limit {
                return Vec::new();
            }
            let step = possible_dirs(maze, node, last, false)
                .into_iter()
                .filter_map(|d| maze.neighbour(node, d).map(|n| (d, n)))
                .min_by_key(|(_, n)| maze.path_distance(*n, to));
            match step {
                Some((dir, next)) => {
                    last = dir;
                    node = next;
                    path.push(node);
                }
                None => return Vec::new(),
            }
        }
        path
    }

    /// Steps along [`hunter_path`](Self::hunter_path); [`FAR_DISTANCE`] if
    /// there is no such path.
    pub fn hunter_path_distance(&self, i: usize, to: NodeIndex) -> u32 {
        match self.hunter_path(i, to).len() {
            0 => FAR_DISTANCE,
            n => (n - 1) as u32,
        }
    }

    // =========================================================================
    // CONSUMABLES
    // =========================================================================

    /// Nodes whose pill is still on the board.
    pub fn active_pill_nodes(&self) -> Vec<NodeIndex> {
        let nodes = self.maze().pill_nodes();
        self.pills.iter_set().map(|slot| nodes[slot]).collect()
    }

    /// Nodes whose power pill is still on the board.
    pub fn active_power_pill_nodes(&self) -> Vec<NodeIndex> {
        let nodes = self.maze().power_pill_nodes();
        self.power_pills.iter_set().map(|slot| nodes[slot]).collect()
    }

    /// Is there an uneaten pill or power pill on `node`?
    pub fn has_consumable(&self, node: NodeIndex) -> bool {
        self.maze().node(node).is_some_and(|n| {
            n.pill.is_some_and(|s| self.pills.get(s))
                || n.power_pill.is_some_and(|s| self.power_pills.get(s))
        })
    }

    /// Path distance from the runner to the closest pill or power pill.
    ///
    /// `None` once the board is empty.
    pub fn distance_to_nearest_pill(&self) -> Option<u32> {
        let maze = self.maze();
        let start = self.runner.node;
        if self.pills.none() && self.power_pills.none() {
            return None;
        }

        let mut dist = vec![u32::MAX; maze.num_nodes()];
        let mut queue = VecDeque::new();
        dist[start] = 0;
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            if self.has_consumable(node) {
                return Some(dist[node]);
            }
            for next in maze.neighbours(node).into_iter().flatten() {
                if dist[next] == u32::MAX {
                    dist[next] = dist[node] + 1;
                    queue.push_back(next);
                }
            }
        }
        None
    }

    // =========================================================================
    // FRUIT
    // =========================================================================

    /// Node of the fruit in the maze, if any.
    pub fn fruit_node(&self) -> Option<NodeIndex> {
        self.fruit.node
    }

    /// Kind of the fruit in the maze, if any.
    pub fn fruit_kind(&self) -> Option<FruitKind> {
        self.fruit.node.map(|_| self.fruit.kind)
    }

    /// Points for the fruit in the maze; 0 when there is none.
    pub fn fruit_value(&self) -> u32 {
        self.fruit_kind().map_or(0, FruitKind::value)
    }
}

// =============================================================================
// TESTS
// =============================================================================
