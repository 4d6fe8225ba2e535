//! Reactive fuzzy decision engine.
//!
//! Candidate cells are scored from normalised local signals. The engine
//! keeps no state between calls; the oscillation memory and visited set are
//! handed in by the caller.

use crate::config::{AgentConfig, FuzzyConfig, FuzzyWeights};
use crate::planner::{Path, PathPlanner, PlanRequest, Strategy};
use robomaze_data::{Coord, FieldLayer, Grid, Maze};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Cells inspected by the density signals, counted even when clipped.
const NEIGHBORHOOD_CELLS: f64 = 9.0;

/// Bounded FIFO of recently entered cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscillationMemory {
    capacity: usize,
    cells: VecDeque<Coord>,
}

impl OscillationMemory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            cells: VecDeque::with_capacity(capacity),
        }
    }

    /// Records `c`, evicting the oldest entry when full.
    pub fn push(&mut self, c: Coord) {
        if self.capacity == 0 {
            return;
        }
        if self.cells.len() == self.capacity {
            self.cells.pop_front();
        }
        self.cells.push_back(c);
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.cells.contains(&c)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coord> {
        self.cells.iter()
    }
}

pub fn distance_membership(distance: f64) -> f64 {
    1.0 / (1.0 + distance)
}

pub fn speed_membership(speed: f64) -> f64 {
    if speed < 1.0 {
        0.1
    } else if speed < 3.0 {
        0.5
    } else {
        1.0
    }
}

/// `angle` in degrees; normalised before classification.
pub fn direction_membership(angle: f64) -> f64 {
    let angle = angle.rem_euclid(360.0);
    if !(45.0..=315.0).contains(&angle) {
        0.9
    } else if angle < 135.0 {
        0.5
    } else {
        0.1
    }
}

pub fn energy_membership(energy: f64) -> f64 {
    if energy < 20.0 {
        0.1
    } else if energy < 50.0 {
        0.5
    } else {
        1.0
    }
}

/// Walls in the in-bounds 3x3 block around `c`, over nine.
pub fn obstacle_density(grid: &Grid, c: Coord) -> f64 {
    let walls = grid.neighborhood(c).filter(|n| grid.is_wall(*n)).count();
    walls as f64 / NEIGHBORHOOD_CELLS
}

/// Flagged cells of `layer` in the 3x3 block around `c`, over nine.
pub fn layer_density(layer: &FieldLayer, c: Coord) -> f64 {
    layer.count_around(c) as f64 / NEIGHBORHOOD_CELLS
}

/// Position, speed and energy the engine scores from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub position: Coord,
    pub speed: f64,
    pub energy: f64,
}

/// Environment shared by every candidate of one decision.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext<'a> {
    pub grid: &'a Grid,
    pub danger: &'a FieldLayer,
    pub safety: &'a FieldLayer,
    pub goal: Coord,
    pub visited: &'a HashSet<Coord>,
    pub memory: &'a OscillationMemory,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Signals {
    pub distance: f64,
    pub obstacle_density: f64,
    pub speed: f64,
    pub direction: f64,
    pub energy: f64,
    pub danger: f64,
    pub safety: f64,
    /// 0 for a visited or remembered candidate, else 1.
    pub oscillation: f64,
}

impl Signals {
    /// Weighted sum, heading taken from `direction`.
    fn weighted(&self, w: &FuzzyWeights, direction: f64) -> f64 {
        w.distance * self.distance
            + w.obstacle_density * self.obstacle_density
            + w.speed * self.speed
            + w.direction * direction
            + w.energy * self.energy
            + w.danger * self.danger
            + w.safety * self.safety
    }
}

/// Full breakdown of one candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub signals: Signals,
    /// Weighted sum before confidence and oscillation.
    pub base: f64,
    /// 1.0, or 0.5 when forward, left and right all score poorly.
    pub confidence: f64,
    pub score: f64,
}

/// Speed after one step under the threshold rule.
pub fn adjust_speed(speed: f64, signals: &Signals, agent: &AgentConfig) -> f64 {
    let accelerate = signals.distance > 0.5
        && signals.obstacle_density < 0.5
        && signals.energy > 0.5
        && signals.danger < 0.5
        && signals.safety > 0.5;
    if accelerate {
        (speed + agent.speed_step).min(agent.max_speed)
    } else {
        (speed - agent.speed_step).max(agent.min_speed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FuzzyEngine {
    config: FuzzyConfig,
    agent: AgentConfig,
}

impl FuzzyEngine {
    #[must_use]
    pub fn new(config: FuzzyConfig, agent: AgentConfig) -> Self {
        Self { config, agent }
    }

    pub fn config(&self) -> &FuzzyConfig {
        &self.config
    }

    /// Raw sub-signals of moving from `motion.position` into `candidate`.
    pub fn signals(&self, candidate: Coord, motion: &Motion, ctx: &ScoreContext<'_>) -> Signals {
        let distance = if self.config.use_goal_heuristic {
            distance_membership(candidate.euclidean(ctx.goal))
        } else {
            0.0
        };
        let repeated = ctx.visited.contains(&candidate) || ctx.memory.contains(candidate);
        Signals {
            distance,
            obstacle_density: obstacle_density(ctx.grid, candidate),
            speed: speed_membership(motion.speed),
            direction: direction_membership(motion.position.heading_to(candidate)),
            energy: energy_membership(motion.energy),
            danger: layer_density(ctx.danger, candidate),
            safety: layer_density(ctx.safety, candidate),
            oscillation: if repeated { 0.0 } else { 1.0 },
        }
    }

    pub fn assess(&self, candidate: Coord, motion: &Motion, ctx: &ScoreContext<'_>) -> Assessment {
        let signals = self.signals(candidate, motion, ctx);
        let weights = &self.config.weights;
        let base = signals.weighted(weights, signals.direction);

        let heading = motion.position.heading_to(candidate);
        let threshold = self.config.confidence_threshold;
        let all_weak = [heading, heading + 90.0, heading - 90.0]
            .iter()
            .all(|h| signals.weighted(weights, direction_membership(*h)) < threshold);
        let confidence = if all_weak { 0.5 } else { 1.0 };

        let applied = if self.config.apply_confidence {
            confidence
        } else {
            1.0
        };
        Assessment {
            signals,
            base,
            confidence,
            score: base * applied * signals.oscillation,
        }
    }

    /// Combined score in `[0, weights.total()]`.
    pub fn score(&self, candidate: Coord, motion: &Motion, ctx: &ScoreContext<'_>) -> f64 {
        self.assess(candidate, motion, ctx).score
    }

    /// Greedy depth-first walk with backtracking, capped at one iteration
    /// per cell. The result ends at `goal` or is partial.
    pub fn walk(
        &self,
        maze: &Maze,
        start: Coord,
        goal: Coord,
        speed: f64,
        energy: f64,
        memory: &OscillationMemory,
    ) -> Path {
        let grid = maze.grid();
        let mut path = vec![start];
        let mut visited = HashSet::from([start]);
        let mut memory = memory.clone();
        let mut speed = speed;

        for _ in 0..grid.area() {
            let Some(&current) = path.last() else {
                break;
            };
            if current == goal {
                break;
            }

            let legal: Vec<Coord> = grid
                .neighbors(current)
                .filter(|n| !visited.contains(n))
                .collect();
            let safe: Vec<Coord> = legal
                .iter()
                .copied()
                .filter(|n| !grid.is_hazard(*n))
                .collect();
            let pool = if safe.is_empty() || energy < self.config.low_energy_threshold {
                legal
            } else {
                safe
            };

            let ctx = ScoreContext {
                grid,
                danger: maze.danger(),
                safety: maze.safety(),
                goal,
                visited: &visited,
                memory: &memory,
            };
            let motion = Motion {
                position: current,
                speed,
                energy,
            };
            let mut best: Option<(Coord, Assessment)> = None;
            for candidate in pool {
                let assessment = self.assess(candidate, &motion, &ctx);
                if best.is_none_or(|(_, b)| assessment.score > b.score) {
                    best = Some((candidate, assessment));
                }
            }

            match best {
                Some((next, assessment)) => {
                    speed = adjust_speed(speed, &assessment.signals, &self.agent);
                    path.push(next);
                    visited.insert(next);
                    memory.push(next);
                }
                None if path.len() > 1 => {
                    path.pop();
                }
                None => break,
            }
        }

        path
    }
}

impl PathPlanner for FuzzyEngine {
    fn strategy(&self) -> Strategy {
        Strategy::Fuzzy
    }

    fn plan(&mut self, request: &PlanRequest<'_>) -> Path {
        self.walk(
            request.maze,
            request.from,
            request.goal,
            request.speed,
            request.energy,
            request.memory,
        )
    }
}
