//! Weighted A* over the four-connected grid.

use crate::config::AStarConfig;
use crate::planner::{Path, PathPlanner, PlanRequest, Strategy};
use robomaze_data::{Coord, Grid};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Frontier entry. Ordered so the max-heap pops the lowest `f`, then the
/// lowest coordinate.
#[derive(Debug, Clone, Copy)]
struct Node {
    f: f64,
    g: f64,
    coord: Coord,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

/// Cost of entering `c`: 1 on open floor, `spike_cost` on a hazard.
#[inline]
fn step_cost(grid: &Grid, c: Coord, spike_cost: f64) -> f64 {
    if grid.is_hazard(c) {
        spike_cost
    } else {
        1.0
    }
}

/// Shortest path from `start` to `goal`, both included.
///
/// Returns an empty path when either endpoint is outside the grid or walled,
/// or when the goal cannot be reached. `start == goal` yields `[start]`.
pub fn find_path(
    grid: &Grid,
    start: Coord,
    goal: Coord,
    spike_cost: f64,
    distance_weight: f64,
    use_goal_heuristic: bool,
) -> Path {
    if grid.is_wall(start) || grid.is_wall(goal) {
        return Vec::new();
    }
    if start == goal {
        return vec![start];
    }

    let heuristic = |c: Coord| {
        if use_goal_heuristic {
            c.euclidean(goal) * distance_weight
        } else {
            0.0
        }
    };
    let index = |c: Coord| c.row * grid.cols() + c.col;

    let mut g_score = vec![f64::INFINITY; grid.area()];
    let mut came_from: Vec<Option<Coord>> = vec![None; grid.area()];
    let mut open = BinaryHeap::new();

    g_score[index(start)] = 0.0;
    open.push(Node {
        f: heuristic(start),
        g: 0.0,
        coord: start,
    });

    while let Some(Node { g, coord, .. }) = open.pop() {
        // Superseded by a cheaper push of the same cell.
        if g > g_score[index(coord)] {
            continue;
        }
        if coord == goal {
            return reconstruct(&came_from, grid.cols(), goal);
        }
        for next in grid.neighbors(coord) {
            let tentative = g + step_cost(grid, next, spike_cost);
            let idx = index(next);
            if tentative < g_score[idx] {
                g_score[idx] = tentative;
                came_from[idx] = Some(coord);
                open.push(Node {
                    f: tentative + heuristic(next),
                    g: tentative,
                    coord: next,
                });
            }
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &[Option<Coord>], cols: usize, goal: Coord) -> Path {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(prev) = came_from[current.row * cols + current.col] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Traversal cost of `path`, counting every cell after the first.
#[must_use]
pub fn path_cost(grid: &Grid, path: &[Coord], spike_cost: f64) -> f64 {
    path.iter()
        .skip(1)
        .map(|&c| step_cost(grid, c, spike_cost))
        .sum()
}

/// Configured A* planner.
#[derive(Debug, Clone, Default)]
pub struct AStar {
    config: AStarConfig,
}

impl AStar {
    #[must_use]
    pub fn new(config: AStarConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AStarConfig {
        &self.config
    }

    #[must_use]
    pub fn find_path(&self, grid: &Grid, start: Coord, goal: Coord) -> Path {
        find_path(
            grid,
            start,
            goal,
            self.config.spike_cost,
            self.config.distance_weight,
            self.config.use_goal_heuristic,
        )
    }
}

impl PathPlanner for AStar {
    fn strategy(&self) -> Strategy {
        Strategy::AStar
    }

    fn plan(&mut self, request: &PlanRequest<'_>) -> Path {
        let path = self.find_path(request.maze.grid(), request.from, request.goal);
        tracing::debug!(
            from = ?request.from,
            goal = ?request.goal,
            len = path.len(),
            "A* plan"
        );
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robomaze_data::Cell;

    fn grid(rows: &[&str]) -> Grid {
        let codes: Vec<Vec<u8>> = rows
            .iter()
            .map(|r| {
                r.chars()
                    .map(|ch| match ch {
                        '#' => 1,
                        '^' => 2,
                        _ => 0,
                    })
                    .collect()
            })
            .collect();
        Grid::from_rows(&codes).unwrap()
    }

    #[test]
    fn test_start_equals_goal() {
        let g = grid(&["..", ".."]);
        let c = Coord::new(1, 0);
        assert_eq!(find_path(&g, c, c, 2.0, 0.8, true), vec![c]);
    }

    #[test]
    fn test_walled_endpoint_is_empty() {
        let g = grid(&[".#", ".."]);
        assert!(find_path(&g, Coord::new(0, 0), Coord::new(0, 1), 2.0, 0.8, true).is_empty());
        assert!(find_path(&g, Coord::new(0, 0), Coord::new(9, 9), 2.0, 0.8, true).is_empty());
    }

    #[test]
    fn test_detours_around_expensive_hazard() {
        let g = grid(&["...", ".^.", "..."]);
        let start = Coord::new(1, 0);
        let goal = Coord::new(1, 2);

        let through = find_path(&g, start, goal, 1.0, 0.8, true);
        assert_eq!(through.len(), 3);

        let around = find_path(&g, start, goal, 10.0, 0.8, true);
        assert_eq!(around.len(), 5);
        assert!(!around.iter().any(|c| g.get(*c) == Some(Cell::Hazard)));
        assert_eq!(path_cost(&g, &around, 10.0), 4.0);
    }

    #[test]
    fn test_uniform_cost_matches_heuristic_cost() {
        let g = grid(&["....#", ".##.#", "....."]);
        let start = Coord::new(0, 0);
        let goal = Coord::new(2, 4);
        let informed = find_path(&g, start, goal, 2.0, 0.8, true);
        let uniform = find_path(&g, start, goal, 2.0, 0.8, false);
        assert_eq!(path_cost(&g, &informed, 2.0), path_cost(&g, &uniform, 2.0));
        assert_eq!(informed.first(), Some(&start));
        assert_eq!(informed.last(), Some(&goal));
    }

    #[test]
    fn test_ties_broken_by_lower_coord() {
        let g = grid(&["..", ".."]);
        let a = find_path(&g, Coord::new(0, 0), Coord::new(1, 1), 2.0, 0.0, false);
        let b = find_path(&g, Coord::new(0, 0), Coord::new(1, 1), 2.0, 0.0, false);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }
}
