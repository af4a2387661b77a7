//! A* search over the coarse occupancy grid.
//!
//! Constraints of this variant:
//! - 8-connected moves, every move costs 1 (diagonals are not charged sqrt(2)).
//! - A cell is finalized the first time it is popped and is never reopened.
//!   Paths are shortest in hop count only with a consistent heuristic for the
//!   uniform cost, which here is `Heuristic::Chebyshev`. The other heuristics
//!   overestimate and trade optimality for fewer expansions; their paths are
//!   still valid (adjacent, collision-free).
//! - The frontier pops the lowest f, then the lowest h, then the oldest entry.

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use crate::error::{Endpoint, NavError, Result};
use crate::grid::{Grid, Position};

/// Cost-to-go estimate used by the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// dx² + dy²
    #[default]
    SquaredEuclidean,
    /// sqrt(dx² + dy²)
    Euclidean,
    /// max(|dx|, |dy|), exact on an empty 8-connected grid with unit cost
    Chebyshev,
}

impl Heuristic {
    pub fn estimate(&self, from: &Position, to: &Position) -> f64 {
        match self {
            Heuristic::SquaredEuclidean => from.distance_squared(to) as f64,
            Heuristic::Euclidean => from.distance(to),
            Heuristic::Chebyshev => from.chebyshev(to) as f64,
        }
    }
}

/// A node in the search graph; `parent` indexes the node it was reached from
#[derive(Debug, Clone, Copy)]
pub struct SearchNode {
    pub position: Position,
    pub g: u32,
    pub h: f64,
    pub f: f64,
    pub parent: Option<usize>,
}

/// Frontier entry; `index` doubles as the insertion sequence number
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f: f64,
    h: f64,
    index: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Counters from one search invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub nodes_pushed: usize,
}

/// A* pathfinder bound to one coarse grid
pub struct AStar<'a> {
    grid: &'a Grid,
    heuristic: Heuristic,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> AStar<'a> {
    pub fn new(grid: &'a Grid, heuristic: Heuristic) -> Self {
        AStar {
            grid,
            heuristic,
            cancel: None,
        }
    }

    /// Abort with `NavError::Cancelled` once `flag` is set
    pub fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Find a path from `start` to `goal`, both inclusive.
    ///
    /// An occupied (or off-grid) endpoint fails with `BlockedCell` before any
    /// search. An exhausted frontier returns an empty path.
    pub fn find_path(&self, start: Position, goal: Position) -> Result<Vec<Position>> {
        self.search(start, goal).map(|(path, _)| path)
    }

    /// `find_path` plus search counters
    pub fn search(&self, start: Position, goal: Position) -> Result<(Vec<Position>, SearchStats)> {
        trace!(
            "[AStar] search: start=({},{}) goal=({},{}) heuristic={:?}",
            start.x,
            start.y,
            goal.x,
            goal.y,
            self.heuristic
        );

        if self.grid.is_blocked_at(start) {
            debug!("[AStar] start ({},{}) is blocked", start.x, start.y);
            return Err(NavError::BlockedCell {
                endpoint: Endpoint::Start,
                cell: start,
            });
        }
        if self.grid.is_blocked_at(goal) {
            debug!("[AStar] goal ({},{}) is blocked", goal.x, goal.y);
            return Err(NavError::BlockedCell {
                endpoint: Endpoint::Goal,
                cell: goal,
            });
        }

        let cell_count = self.grid.cells.len();
        let mut nodes: Vec<SearchNode> = Vec::new();
        let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::new();
        let mut closed = vec![false; cell_count];
        let mut best_g = vec![u32::MAX; cell_count];
        let mut stats = SearchStats::default();

        let h = self.heuristic.estimate(&start, &goal);
        self.push(&mut nodes, &mut frontier, &mut stats, start, 0, h, None);
        best_g[self.grid.get_id(start.x, start.y) as usize] = 0;

        while let Some(entry) = frontier.pop() {
            if self.is_cancelled() {
                debug!("[AStar] cancelled after {} expansions", stats.nodes_expanded);
                return Err(NavError::Cancelled);
            }

            let node = nodes[entry.index];
            let id = self.grid.get_id(node.position.x, node.position.y) as usize;
            if closed[id] {
                continue;
            }
            closed[id] = true;
            stats.nodes_expanded += 1;

            if node.position == goal {
                let path = reconstruct(&nodes, entry.index);
                trace!(
                    "[AStar] SUCCESS: {} cells, {} expanded, {} pushed",
                    path.len(),
                    stats.nodes_expanded,
                    stats.nodes_pushed
                );
                return Ok((path, stats));
            }

            for neighbor in node.position.neighbors_8() {
                if self.grid.is_blocked_at(neighbor) {
                    continue;
                }
                let neighbor_id = self.grid.get_id(neighbor.x, neighbor.y) as usize;
                if closed[neighbor_id] {
                    continue;
                }

                let g = node.g + 1;
                if g >= best_g[neighbor_id] {
                    continue;
                }
                best_g[neighbor_id] = g;

                let h = self.heuristic.estimate(&neighbor, &goal);
                self.push(&mut nodes, &mut frontier, &mut stats, neighbor, g, h, Some(entry.index));
            }
        }

        debug!(
            "[AStar] NoPath after expanding {} nodes",
            stats.nodes_expanded
        );
        Ok((Vec::new(), stats))
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &self,
        nodes: &mut Vec<SearchNode>,
        frontier: &mut BinaryHeap<FrontierEntry>,
        stats: &mut SearchStats,
        position: Position,
        g: u32,
        h: f64,
        parent: Option<usize>,
    ) {
        let f = g as f64 + h;
        let index = nodes.len();
        nodes.push(SearchNode {
            position,
            g,
            h,
            f,
            parent,
        });
        frontier.push(FrontierEntry { f, h, index });
        stats.nodes_pushed += 1;
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .map(|flag| flag.load(AtomicOrdering::Relaxed))
            .unwrap_or(false)
    }
}

/// Walk parent links back to the start and return the start-to-goal sequence
fn reconstruct(nodes: &[SearchNode], goal_index: usize) -> Vec<Position> {
    let mut path = Vec::new();
    let mut current = Some(goal_index);

    while let Some(index) = current {
        path.push(nodes[index].position);
        current = nodes[index].parent;
    }

    path.reverse();
    path
}

/// Format path for display
pub fn format_path(path: &[Position]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    path.iter()
        .map(|p| format!("({},{})", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontier_orders_by_f_then_h_then_insertion() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry { f: 5.0, h: 3.0, index: 0 });
        heap.push(FrontierEntry { f: 4.0, h: 3.0, index: 1 });
        heap.push(FrontierEntry { f: 4.0, h: 1.0, index: 2 });
        heap.push(FrontierEntry { f: 4.0, h: 1.0, index: 3 });

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.index)).collect();
        assert_eq!(order, vec![2, 3, 1, 0]);
    }

    #[test]
    fn test_open_cell_with_lower_g_is_not_pushed_again() {
        let grid = Grid::new(2, 3);
        let (path, stats) = AStar::new(&grid, Heuristic::Chebyshev)
            .search(Position::new(0, 0), Position::new(2, 0))
            .unwrap();

        assert_eq!(path, vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)]);
        // (0,1) and (1,1) are already queued at g = 1 when (1,0) reaches them at g = 2
        assert_eq!(
            stats,
            SearchStats {
                nodes_expanded: 3,
                nodes_pushed: 6,
            }
        );
    }

    #[test]
    fn test_cancel_flag_aborts() {
        let grid = Grid::new(10, 10);
        let flag = AtomicBool::new(true);
        let result = AStar::new(&grid, Heuristic::default())
            .with_cancel_flag(&flag)
            .find_path(Position::new(0, 0), Position::new(9, 9));
        assert!(matches!(result, Err(NavError::Cancelled)));
    }

    #[test]
    fn test_chebyshev_finds_fewest_hops_around_wall() {
        let mut grid = Grid::new(12, 12);
        grid.fill_rect(5, 0, 5, 9);

        let start = Position::new(0, 0);
        let goal = Position::new(11, 0);
        let path = AStar::new(&grid, Heuristic::Chebyshev).find_path(start, goal).unwrap();

        // (5,10) is the nearest gap cell: 10 hops there, 10 hops on to the goal
        assert_eq!(path.len() - 1, 20);
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[]), "No path");
        assert_eq!(
            format_path(&[Position::new(0, 0), Position::new(1, 1)]),
            "(0,0) -> (1,1)"
        );
    }
}
