//! Configuration management for maze generation, the three engines and the
//! simulation loop.
//!
//! Every tunable lives here and is passed explicitly to the component that
//! uses it; nothing reads process-wide switches.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults, missing keys fall back)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [maze]
//! width = 21
//! height = 21
//! seed = 7
//!
//! [astar]
//! spike_cost = 5.0
//!
//! [colony]
//! num_ants = 32
//! max_iterations = 80
//!
//! [simulation]
//! tick_interval_ms = 250
//! strategies = ["astar", "colony", "fuzzy"]
//! ```

use crate::planner::Strategy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Procedural maze parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MazeConfig {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    pub seed: u64,
    /// Lattice step of the noise overlay per cell.
    pub noise_frequency: f64,
    /// Noise above this turns a cell into a wall.
    pub wall_threshold: f64,
    /// Chance for a surviving open cell to become a hazard.
    pub hazard_chance: f64,
    /// Regeneration attempts when start and goal end up disconnected.
    pub max_attempts: u32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            seed: 42,
            noise_frequency: 0.1,
            wall_threshold: 0.5,
            hazard_chance: 0.1,
            max_attempts: 16,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AStarConfig {
    /// Traversal cost of a hazard cell (open cells cost 1).
    pub spike_cost: f64,
    /// Multiplier on the Euclidean goal estimate.
    pub distance_weight: f64,
    /// `false` degrades the search to uniform-cost.
    pub use_goal_heuristic: bool,
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self {
            spike_cost: 2.0,
            distance_weight: 0.8,
            use_goal_heuristic: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ColonyConfig {
    pub evaporation_rate: f64,
    pub initial_pheromone: f64,
    pub max_iterations: usize,
    pub num_ants: usize,
    /// Hop cap for a single ant walk.
    pub max_steps: usize,
    pub use_goal_heuristic: bool,
    /// Fixed seed for reproducible colonies; drawn from the simulation RNG when unset.
    pub seed: Option<u64>,
    /// Keep the pheromone field between calls on the same optimizer.
    pub reuse_pheromone: bool,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            evaporation_rate: 0.1,
            initial_pheromone: 1.0,
            max_iterations: 50,
            num_ants: 20,
            max_steps: 1000,
            use_goal_heuristic: true,
            seed: None,
            reuse_pheromone: false,
        }
    }
}

/// Weights of the fuzzy sub-signals in the combined score.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FuzzyWeights {
    pub distance: f64,
    pub obstacle_density: f64,
    pub speed: f64,
    pub direction: f64,
    pub energy: f64,
    pub danger: f64,
    pub safety: f64,
}

impl Default for FuzzyWeights {
    fn default() -> Self {
        Self {
            distance: 0.8,
            obstacle_density: 0.7,
            speed: 0.2,
            direction: 0.4,
            energy: 0.2,
            danger: 0.4,
            safety: 0.1,
        }
    }
}

impl FuzzyWeights {
    /// Upper bound of a score built from these weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.distance
            + self.obstacle_density
            + self.speed
            + self.direction
            + self.energy
            + self.danger
            + self.safety
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FuzzyConfig {
    pub weights: FuzzyWeights,
    /// Forward, left and right all scoring below this halves confidence.
    pub confidence_threshold: f64,
    /// Below this energy hazard cells are considered alongside safe ones.
    pub low_energy_threshold: f64,
    /// Capacity of the oscillation memory.
    pub memory_capacity: usize,
    pub use_goal_heuristic: bool,
    /// Multiply scores by the confidence factor.
    pub apply_confidence: bool,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            weights: FuzzyWeights::default(),
            confidence_threshold: 0.5,
            low_energy_threshold: 50.0,
            memory_capacity: 8,
            use_goal_heuristic: true,
            apply_confidence: false,
        }
    }
}

/// Energy and speed model shared by every agent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    pub initial_energy: f64,
    pub step_cost: f64,
    pub hazard_cost: f64,
    pub initial_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub speed_step: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            initial_energy: 100.0,
            step_cost: 1.0,
            hazard_cost: 50.0,
            initial_speed: 1.0,
            min_speed: 0.1,
            max_speed: 3.0,
            speed_step: 0.1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_interval_ms: u64,
    /// Quiet period after a grid mutation before agents replan.
    pub replan_debounce_ms: u64,
    /// Per-tick chance of a random hazard appearing.
    pub hazard_injection_chance: f64,
    /// One agent per entry.
    pub strategies: Vec<Strategy>,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 500,
            replan_debounce_ms: 1000,
            hazard_injection_chance: 0.02,
            strategies: Strategy::ALL.to_vec(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Debounce delay expressed in whole ticks, at least one.
    #[must_use]
    pub fn debounce_ticks(&self) -> u64 {
        if self.tick_interval_ms == 0 {
            return 1;
        }
        self.replan_debounce_ms
            .div_ceil(self.tick_interval_ms)
            .max(1)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub maze: MazeConfig,
    pub astar: AStarConfig,
    pub colony: ColonyConfig,
    pub fuzzy: FuzzyConfig,
    pub agent: AgentConfig,
    pub simulation: SimulationConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // Maze
        anyhow::ensure!(self.maze.width > 0, "Maze width must be positive");
        anyhow::ensure!(self.maze.height > 0, "Maze height must be positive");
        anyhow::ensure!(
            self.maze.width <= 1000 && self.maze.height <= 1000,
            "Maze too large (max 1000x1000)"
        );
        anyhow::ensure!(
            self.maze.noise_frequency > 0.0,
            "Noise frequency must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.maze.hazard_chance),
            "Hazard chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(self.maze.max_attempts > 0, "Max attempts must be positive");

        // A*
        anyhow::ensure!(
            self.astar.spike_cost >= 1.0,
            "Spike cost must be at least the open-cell cost (1.0)"
        );
        anyhow::ensure!(
            self.astar.distance_weight >= 0.0,
            "Distance weight must be non-negative"
        );

        // Colony
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.colony.evaporation_rate),
            "Evaporation rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.colony.initial_pheromone > 0.0,
            "Initial pheromone must be positive"
        );
        anyhow::ensure!(self.colony.num_ants > 0, "Ant count must be positive");
        anyhow::ensure!(
            self.colony.max_iterations > 0,
            "Iteration count must be positive"
        );
        anyhow::ensure!(self.colony.max_steps > 0, "Ant step cap must be positive");

        // Fuzzy
        let w = &self.fuzzy.weights;
        anyhow::ensure!(
            [
                w.distance,
                w.obstacle_density,
                w.speed,
                w.direction,
                w.energy,
                w.danger,
                w.safety
            ]
            .iter()
            .all(|v| *v >= 0.0),
            "Fuzzy weights must be non-negative"
        );
        anyhow::ensure!(
            self.fuzzy.memory_capacity > 0,
            "Oscillation memory capacity must be positive"
        );

        // Agent
        anyhow::ensure!(
            self.agent.initial_energy > 0.0,
            "Initial energy must be positive"
        );
        anyhow::ensure!(
            self.agent.step_cost >= 0.0 && self.agent.hazard_cost >= 0.0,
            "Energy costs must be non-negative"
        );
        anyhow::ensure!(
            self.agent.min_speed > 0.0 && self.agent.min_speed <= self.agent.max_speed,
            "Speed range must satisfy 0 < min_speed <= max_speed"
        );
        anyhow::ensure!(
            (self.agent.min_speed..=self.agent.max_speed).contains(&self.agent.initial_speed),
            "Initial speed must lie within the speed range"
        );

        // Simulation
        anyhow::ensure!(
            self.simulation.tick_interval_ms > 0,
            "Tick interval must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.simulation.hazard_injection_chance),
            "Hazard injection chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            !self.simulation.strategies.is_empty(),
            "At least one agent strategy is required"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Stable hash of the engine parameters, recorded with run reports.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.astar).as_bytes());
        hasher.update(format!("{:?}", self.colony).as_bytes());
        hasher.update(format!("{:?}", self.fuzzy).as_bytes());
        hasher.update(format!("{:?}", self.agent).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_maze_width() {
        let config = AppConfig {
            maze: MazeConfig {
                width: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_evaporation_rate() {
        let config = AppConfig {
            colony: ColonyConfig {
                evaporation_rate: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_speed_out_of_range() {
        let config = AppConfig {
            agent: AgentConfig {
                initial_speed: 5.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_strategies_rejected() {
        let config = AppConfig {
            simulation: SimulationConfig {
                strategies: Vec::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [maze]
            width = 21

            [simulation]
            strategies = ["fuzzy"]
            "#,
        )
        .unwrap();
        assert_eq!(config.maze.width, 21);
        assert_eq!(config.maze.height, 10);
        assert_eq!(config.simulation.strategies, vec![Strategy::Fuzzy]);
        assert_eq!(config.astar, AStarConfig::default());
    }

    #[test]
    fn test_debounce_ticks_rounds_up() {
        let sim = SimulationConfig {
            tick_interval_ms: 300,
            replan_debounce_ms: 1000,
            ..Default::default()
        };
        assert_eq!(sim.debounce_ticks(), 4);
        let sim = SimulationConfig {
            replan_debounce_ms: 0,
            ..Default::default()
        };
        assert_eq!(sim.debounce_ticks(), 1);
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = AppConfig::default();
        let mut config2 = AppConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());
        config2.astar.spike_cost = 9.0;
        assert_ne!(config1.fingerprint(), config2.fingerprint());
    }
}
