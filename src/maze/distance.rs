//! All-pairs shortest path distances.
//!
//! Mazes are small unweighted graphs, so one breadth-first search per node is
//! enough. Only the lower triangle is stored: the entry for `(a, b)` with
//! `a <= b` lives at `b * (b + 1) / 2 + a`.

use std::collections::VecDeque;

/// Distance reported for unreachable pairs and for node indices outside the
/// graph. Large enough that heuristics treat it as "never".
pub const FAR_DISTANCE: u32 = 100_000;

/// Symmetric distance table in triangular storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceTable {
    node_count: usize,
    cells: Vec<u32>,
}

impl DistanceTable {
    /// Run a BFS from every node over the given adjacency.
    ///
    /// `adjacency[i]` lists the neighbour slots of node `i`; the graph must be
    /// undirected for the table to be meaningful.
    pub fn build(adjacency: &[[Option<usize>; 4]]) -> Self {
        let node_count = adjacency.len();
        let mut cells = vec![FAR_DISTANCE; node_count * (node_count + 1) / 2];

        let mut dist = vec![u32::MAX; node_count];
        let mut queue = VecDeque::with_capacity(node_count);

        for source in 0..node_count {
            dist.fill(u32::MAX);
            dist[source] = 0;
            queue.push_back(source);

            while let Some(node) = queue.pop_front() {
                for next in adjacency[node].iter().flatten() {
                    if dist[*next] == u32::MAX {
                        dist[*next] = dist[node] + 1;
                        queue.push_back(*next);
                    }
                }
            }

            // Row `source` of the triangle holds every target <= source
            for (target, d) in dist.iter().enumerate().take(source + 1) {
                if *d != u32::MAX {
                    cells[slot(source, target)] = *d;
                }
            }
        }

        Self { node_count, cells }
    }

    /// Number of nodes covered by the table.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Shortest path length between `a` and `b`.
    ///
    /// Returns [`FAR_DISTANCE`] if either index is out of range or the pair
    /// is disconnected.
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> u32 {
        if a >= self.node_count || b >= self.node_count {
            return FAR_DISTANCE;
        }
        self.cells[slot(a, b)]
    }
}

#[inline]
fn slot(a: usize, b: usize) -> usize {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    hi * (hi + 1) / 2 + lo
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 - 1 - 2   3 (isolated)
    fn line_with_island() -> Vec<[Option<usize>; 4]> {
        vec![
            [None, Some(1), None, None],
            [None, Some(2), None, Some(0)],
            [None, None, None, Some(1)],
            [None, None, None, None],
        ]
    }

    #[test]
    fn test_line_distances() {
        let table = DistanceTable::build(&line_with_island());
        assert_eq!(table.get(0, 0), 0);
        assert_eq!(table.get(0, 2), 2);
        assert_eq!(table.get(2, 0), 2);
        assert_eq!(table.get(1, 2), 1);
    }

    #[test]
    fn test_disconnected_and_out_of_range() {
        let table = DistanceTable::build(&line_with_island());
        assert_eq!(table.get(0, 3), FAR_DISTANCE);
        assert_eq!(table.get(3, 3), 0);
        assert_eq!(table.get(0, 99), FAR_DISTANCE);
        assert_eq!(table.get(99, 99), FAR_DISTANCE);
    }

    #[test]
    fn test_triangular_slots_are_unique() {
        let n = 20;
        let mut seen = vec![false; n * (n + 1) / 2];
        for b in 0..n {
            for a in 0..=b {
                let s = slot(a, b);
                assert!(!seen[s], "slot {} reused", s);
                seen[s] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }
}
