#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic 4-directional A* search over a passability predicate.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, HashSet},
};

use ananas_core::CellCoord;

/// Reusable A* search workspace.
///
/// The finder keeps no results between calls; its collections are only
/// retained to avoid reallocating on every turn.
#[derive(Debug, Default)]
pub struct PathFinder {
    open: BinaryHeap<OpenNode>,
    came_from: HashMap<CellCoord, CellCoord>,
    best_cost: HashMap<CellCoord, u32>,
    closed: HashSet<CellCoord>,
    sequence: u64,
}

impl PathFinder {
    /// Creates an empty search workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a shortest orthogonal path from `start` to `goal`.
    ///
    /// The returned path begins with `start` and ends with `goal`. A single
    /// element is returned when both coordinates match and an empty vector
    /// when the goal cannot be reached. The start cell is never tested for
    /// passability; every other cell on the path is.
    ///
    /// Steps cost 1 and the heuristic is the Manhattan distance. Nodes with
    /// equal estimated cost are expanded in the order they were queued, so
    /// identical inputs always produce identical paths.
    pub fn find_path<F>(&mut self, start: CellCoord, goal: CellCoord, is_passable: F) -> Vec<CellCoord>
    where
        F: Fn(CellCoord) -> bool,
    {
        if start == goal {
            return vec![start];
        }

        if !is_passable(goal) {
            return Vec::new();
        }

        self.reset();
        let _ = self.best_cost.insert(start, 0);
        self.push(start, 0, goal);

        while let Some(node) = self.open.pop() {
            if node.cell == goal {
                return self.reconstruct(start, goal);
            }

            if !self.closed.insert(node.cell) {
                continue;
            }

            let next_cost = node.cost + 1;
            for neighbor in node.cell.neighbors4() {
                if self.closed.contains(&neighbor) || !is_passable(neighbor) {
                    continue;
                }

                let improved = self
                    .best_cost
                    .get(&neighbor)
                    .map_or(true, |&known| next_cost < known);
                if !improved {
                    continue;
                }

                let _ = self.best_cost.insert(neighbor, next_cost);
                let _ = self.came_from.insert(neighbor, node.cell);
                self.push(neighbor, next_cost, goal);
            }
        }

        Vec::new()
    }

    fn reset(&mut self) {
        self.open.clear();
        self.came_from.clear();
        self.best_cost.clear();
        self.closed.clear();
        self.sequence = 0;
    }

    fn push(&mut self, cell: CellCoord, cost: u32, goal: CellCoord) {
        let estimate = cost + cell.manhattan_distance(goal);
        self.open.push(OpenNode {
            cell,
            cost,
            estimate,
            sequence: self.sequence,
        });
        self.sequence += 1;
    }

    fn reconstruct(&self, start: CellCoord, goal: CellCoord) -> Vec<CellCoord> {
        let mut path = vec![goal];
        let mut current = goal;
        while current != start {
            let Some(&previous) = self.came_from.get(&current) else {
                return Vec::new();
            };
            path.push(previous);
            current = previous;
        }
        path.reverse();
        path
    }
}

/// Frontier entry ordered so the heap pops the lowest estimate first and,
/// among equal estimates, the entry queued earliest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenNode {
    cell: CellCoord,
    cost: u32,
    estimate: u32,
    sequence: u64,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
