//! Per-agent state advanced by the simulation loop.

use crate::config::AgentConfig;
use crate::fuzzy::OscillationMemory;
use crate::planner::{Path, Strategy};
use robomaze_data::Coord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopReason {
    ReachedGoal,
    OutOfEnergy,
    Unreachable,
}

impl StopReason {
    /// Short identifier used in counter names.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            StopReason::ReachedGoal => "reached_goal",
            StopReason::OutOfEnergy => "out_of_energy",
            StopReason::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::ReachedGoal => "reached goal",
            StopReason::OutOfEnergy => "out of energy",
            StopReason::Unreachable => "goal unreachable",
        };
        f.write_str(s)
    }
}

/// Lifecycle: `Idle -> Planning -> Advancing <-> Replanning -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AgentPhase {
    #[default]
    Idle,
    Planning,
    Advancing,
    Replanning,
    Stopped(StopReason),
}

impl AgentPhase {
    #[must_use]
    pub fn is_stopped(self) -> bool {
        matches!(self, AgentPhase::Stopped(_))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub steps_taken: u64,
    pub energy_consumed: f64,
    /// Euclidean distance covered.
    pub distance_traveled: f64,
    pub hazard_collisions: u64,
    pub direction_changes: u64,
    pub replans: u64,
    /// Simulated time, one tick interval per step.
    pub time_elapsed: Duration,
}

impl AgentMetrics {
    pub fn record_step(&mut self, energy: f64, distance: f64, time: Duration) {
        self.steps_taken += 1;
        self.energy_consumed += energy;
        self.distance_traveled += distance;
        self.time_elapsed += time;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub id: usize,
    pub strategy: Strategy,
    pub position: Coord,
    /// Degrees of the last move, `None` before the first one.
    pub heading: Option<f64>,
    pub speed: f64,
    pub energy: f64,
    pub memory: OscillationMemory,
    /// Cells entered during the current path attempt.
    pub visited: HashSet<Coord>,
    pub path: Path,
    /// Index of `position` within `path`.
    pub cursor: usize,
    pub phase: AgentPhase,
    pub metrics: AgentMetrics,
}

impl AgentState {
    #[must_use]
    pub fn new(
        id: usize,
        strategy: Strategy,
        start: Coord,
        config: &AgentConfig,
        memory_capacity: usize,
    ) -> Self {
        Self {
            id,
            strategy,
            position: start,
            heading: None,
            speed: config.initial_speed,
            energy: config.initial_energy,
            memory: OscillationMemory::new(memory_capacity),
            visited: HashSet::from([start]),
            path: Vec::new(),
            cursor: 0,
            phase: AgentPhase::Idle,
            metrics: AgentMetrics::default(),
        }
    }

    /// Back to `start` with full energy, fresh metrics and no plan.
    pub fn reset(&mut self, start: Coord, config: &AgentConfig) {
        *self = Self::new(
            self.id,
            self.strategy,
            start,
            config,
            self.memory.capacity(),
        );
    }

    pub fn restore_energy(&mut self, config: &AgentConfig) {
        self.energy = config.initial_energy;
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.phase, AgentPhase::Idle | AgentPhase::Stopped(_))
    }

    /// Installs a fresh plan starting at the current position.
    pub fn set_plan(&mut self, path: Path) {
        self.path = path;
        self.cursor = 0;
        self.visited.clear();
        self.visited.insert(self.position);
    }

    /// Next cell on the plan, if any remain.
    pub fn next_cell(&self) -> Option<Coord> {
        self.path.get(self.cursor + 1).copied()
    }

    pub fn remaining_steps(&self) -> usize {
        self.path.len().saturating_sub(self.cursor + 1)
    }

    /// Deducts `cost`, clamping at zero. Returns true when depleted.
    pub fn drain(&mut self, cost: f64) -> bool {
        self.energy = (self.energy - cost).max(0.0);
        self.energy <= 0.0
    }

    /// Moves one step along the plan and records heading changes.
    pub fn advance_to(&mut self, next: Coord) {
        let heading = self.position.heading_to(next);
        if self.heading.is_some_and(|h| (h - heading).abs() > f64::EPSILON) {
            self.metrics.direction_changes += 1;
        }
        self.heading = Some(heading);
        self.position = next;
        self.cursor += 1;
        self.visited.insert(next);
        self.memory.push(next);
    }
}
