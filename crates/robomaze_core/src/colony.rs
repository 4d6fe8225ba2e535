//! Ant colony optimisation over the grid.
//!
//! Each iteration releases `num_ants` independent walkers on rayon workers.
//! Walkers only read the grid and the pheromone field; their walks come back
//! by value and the field is updated afterwards in one serial pass:
//! evaporation first, then a `1 / length` deposit on every cell of every
//! walk that reached the goal.

use crate::config::ColonyConfig;
use crate::pheromone::PheromoneField;
use crate::planner::{Path, PathPlanner, PlanRequest, Strategy};
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use robomaze_data::{Coord, Grid};

const SEED_MIX: u64 = 0x517CC1B727220A95;

/// One ant's walk, returned as walked (no loop erasure).
#[derive(Debug, Clone, PartialEq)]
pub struct AntWalk {
    pub path: Path,
    /// Sum of Euclidean step lengths.
    pub length: f64,
    pub reached: bool,
}

/// Result of a full optimisation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColonyOutcome {
    /// Shortest walk that reached the goal, if any did.
    pub best: Option<AntWalk>,
    /// Walks that reached the goal across all iterations.
    pub completed_walks: usize,
    pub iterations: usize,
}

impl ColonyOutcome {
    #[must_use]
    pub fn path(&self) -> Path {
        self.best.as_ref().map(|w| w.path.clone()).unwrap_or_default()
    }
}

fn ant_seed(seed: u64, call: u64, iteration: usize, ant: usize) -> u64 {
    let mut s = seed.wrapping_add(call).wrapping_mul(SEED_MIX);
    s ^= iteration as u64;
    s = s.wrapping_mul(SEED_MIX);
    s ^ ant as u64
}

/// Walks one ant from `start` until it reaches `goal` or takes `max_steps` steps.
pub fn walk_ant<R: Rng>(
    grid: &Grid,
    field: &PheromoneField,
    start: Coord,
    goal: Coord,
    max_steps: usize,
    use_goal_heuristic: bool,
    rng: &mut R,
) -> AntWalk {
    let mut path = vec![start];
    let mut current = start;
    let mut length = 0.0;

    for _ in 0..max_steps {
        if current == goal {
            break;
        }
        let candidates: Vec<Coord> = grid.neighbors(current).collect();
        if candidates.is_empty() {
            // Boxed in: the ant would stay put for every remaining step.
            break;
        }
        let next = if candidates.contains(&goal) {
            goal
        } else {
            choose_next(&candidates, field, goal, use_goal_heuristic, rng)
        };
        length += current.euclidean(next);
        path.push(next);
        current = next;
    }

    AntWalk {
        reached: current == goal,
        path,
        length,
    }
}

/// Roulette choice proportional to `pheromone * heuristic`; uniform when
/// every weight is zero.
fn choose_next<R: Rng>(
    candidates: &[Coord],
    field: &PheromoneField,
    goal: Coord,
    use_goal_heuristic: bool,
    rng: &mut R,
) -> Coord {
    let weights = candidates.iter().map(|&c| {
        let heuristic = if use_goal_heuristic {
            1.0 / c.euclidean(goal)
        } else {
            1.0
        };
        field.get(c) * heuristic
    });
    match WeightedIndex::new(weights) {
        Ok(dist) => candidates[dist.sample(rng)],
        Err(_) => candidates[rng.gen_range(0..candidates.len())],
    }
}

/// Colony optimizer owning its pheromone field.
#[derive(Debug, Clone)]
pub struct ColonyOptimizer {
    config: ColonyConfig,
    seed: u64,
    calls: u64,
    pheromone: Option<PheromoneField>,
}

impl ColonyOptimizer {
    #[must_use]
    pub fn new(config: ColonyConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            calls: 0,
            pheromone: None,
        }
    }

    /// Optimizer seeded from the configuration, or from entropy when unset.
    #[must_use]
    pub fn from_config(config: ColonyConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::new(config, seed)
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// Field left behind by the most recent call.
    pub fn pheromone(&self) -> Option<&PheromoneField> {
        self.pheromone.as_ref()
    }

    #[must_use]
    pub fn find_path(&mut self, grid: &Grid, start: Coord, goal: Coord) -> Path {
        self.solve(grid, start, goal).path()
    }

    pub fn solve(&mut self, grid: &Grid, start: Coord, goal: Coord) -> ColonyOutcome {
        if grid.is_wall(start) || grid.is_wall(goal) {
            return ColonyOutcome::default();
        }
        if start == goal {
            return ColonyOutcome {
                best: Some(AntWalk {
                    path: vec![start],
                    length: 0.0,
                    reached: true,
                }),
                ..Default::default()
            };
        }

        let cfg = &self.config;
        let mut field = match self.pheromone.take() {
            Some(f) if cfg.reuse_pheromone && f.same_shape(grid) => f,
            _ => PheromoneField::for_grid(grid, cfg.initial_pheromone),
        };
        let call = self.calls;
        self.calls += 1;

        let mut outcome = ColonyOutcome {
            iterations: cfg.max_iterations,
            ..Default::default()
        };

        for iteration in 0..cfg.max_iterations {
            let walks: Vec<AntWalk> = {
                let field = &field;
                (0..cfg.num_ants)
                    .into_par_iter()
                    .map(|ant| {
                        let mut rng =
                            ChaCha8Rng::seed_from_u64(ant_seed(self.seed, call, iteration, ant));
                        walk_ant(
                            grid,
                            field,
                            start,
                            goal,
                            cfg.max_steps,
                            cfg.use_goal_heuristic,
                            &mut rng,
                        )
                    })
                    .collect()
            };

            field.evaporate(cfg.evaporation_rate);
            for walk in walks {
                if !walk.reached || walk.length <= 0.0 {
                    continue;
                }
                field.deposit_path(&walk.path, 1.0 / walk.length);
                outcome.completed_walks += 1;
                let better = outcome
                    .best
                    .as_ref()
                    .is_none_or(|best| walk.length < best.length);
                if better {
                    outcome.best = Some(walk);
                }
            }

            tracing::debug!(
                iteration,
                completed = outcome.completed_walks,
                best = outcome.best.as_ref().map(|w| w.length),
                "Colony iteration"
            );
        }

        self.pheromone = Some(field);
        outcome
    }
}

impl PathPlanner for ColonyOptimizer {
    fn strategy(&self) -> Strategy {
        Strategy::Colony
    }

    fn plan(&mut self, request: &PlanRequest<'_>) -> Path {
        self.find_path(request.maze.grid(), request.from, request.goal)
    }
}

/// One-shot colony search with an entropy seed and a fresh field.
#[allow(clippy::too_many_arguments)]
pub fn find_path(
    grid: &Grid,
    start: Coord,
    goal: Coord,
    evaporation_rate: f64,
    initial_pheromone: f64,
    max_iterations: usize,
    num_ants: usize,
    use_goal_heuristic: bool,
) -> Path {
    let config = ColonyConfig {
        evaporation_rate,
        initial_pheromone,
        max_iterations,
        num_ants,
        use_goal_heuristic,
        ..Default::default()
    };
    ColonyOptimizer::from_config(config).find_path(grid, start, goal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> ColonyConfig {
        ColonyConfig {
            max_iterations: 10,
            num_ants: 8,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_neighbor_goal_taken_immediately() {
        let grid = Grid::new(1, 2).unwrap();
        let field = PheromoneField::for_grid(&grid, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let walk = walk_ant(
            &grid,
            &field,
            Coord::new(0, 0),
            Coord::new(0, 1),
            1000,
            true,
            &mut rng,
        );
        assert!(walk.reached);
        assert_eq!(walk.path.len(), 2);
        assert_eq!(walk.length, 1.0);
    }

    #[test]
    fn test_boxed_in_ant_never_reaches() {
        let grid = Grid::from_rows(&[vec![0, 1, 0]]).unwrap();
        let field = PheromoneField::for_grid(&grid, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let walk = walk_ant(
            &grid,
            &field,
            Coord::new(0, 0),
            Coord::new(0, 2),
            1000,
            true,
            &mut rng,
        );
        assert!(!walk.reached);
        assert_eq!(walk.path, vec![Coord::new(0, 0)]);
    }

    #[test]
    fn test_zero_pheromone_falls_back_to_uniform() {
        let grid = Grid::new(3, 3).unwrap();
        let field = PheromoneField::for_grid(&grid, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let walk = walk_ant(
            &grid,
            &field,
            Coord::new(0, 0),
            Coord::new(2, 2),
            1000,
            true,
            &mut rng,
        );
        assert!(walk.reached);
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let grid = Grid::new(6, 6).unwrap();
        let a = ColonyOptimizer::new(config(11), 11).solve(&grid, grid.start(), grid.goal());
        let b = ColonyOptimizer::new(config(11), 11).solve(&grid, grid.start(), grid.goal());
        assert_eq!(a, b);
        let best = a.best.unwrap();
        assert_eq!(best.path.first(), Some(&grid.start()));
        assert_eq!(best.path.last(), Some(&grid.goal()));
    }

    #[test]
    fn test_blocked_goal_is_empty() {
        let grid = Grid::from_rows(&[vec![0, 1], vec![1, 0]]).unwrap();
        let mut aco = ColonyOptimizer::new(config(5), 5);
        assert!(aco
            .find_path(&grid, Coord::new(0, 0), Coord::new(1, 1))
            .is_empty());
        assert!(aco.pheromone().unwrap().min() >= 0.0);
    }

    #[test]
    fn test_reuse_pheromone_keeps_field() {
        let grid = Grid::new(4, 4).unwrap();
        let mut cfg = config(2);
        cfg.reuse_pheromone = true;
        let mut aco = ColonyOptimizer::new(cfg, 2);
        aco.find_path(&grid, grid.start(), grid.goal());
        let first = aco.pheromone().unwrap().sum();
        aco.find_path(&grid, grid.start(), grid.goal());
        let second = aco.pheromone().unwrap().sum();
        assert_ne!(first, second);
    }
}
