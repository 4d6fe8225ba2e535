//! # RoboMaze Core
//!
//! Decision engines and the simulation loop for agents crossing a mutable
//! obstacle grid.
//!
//! This crate contains:
//! - Procedural maze generation (Prim carve plus gradient-noise overlay)
//! - Weighted A* search
//! - Ant colony optimisation with a rayon-parallel ant phase
//! - A reactive fuzzy scoring engine
//! - The tick-driven simulation with energy, speed and debounced replanning
//! - Configuration, run metrics and structured logging
//!
//! ## Example
//!
//! ```
//! use robomaze_core::astar;
//! use robomaze_core::maze::MazeGenerator;
//!
//! let maze = MazeGenerator::default().generate(9, 9, 42).unwrap();
//! let path = astar::find_path(maze.grid(), maze.start(), maze.goal(), 2.0, 0.8, true);
//! assert!(path.is_empty() || path[0] == maze.start());
//! ```

/// Per-agent state, phases and metrics
pub mod agent;
/// Weighted A* search
pub mod astar;
/// Ant colony optimisation
pub mod colony;
/// Configuration management for every engine and the loop
pub mod config;
/// Error types
pub mod error;
/// Simulation events
pub mod events;
/// Fuzzy decision engine and reactive walk
pub mod fuzzy;
/// Maze generation
pub mod maze;
/// Run counters and logging setup
pub mod metrics;
/// Pheromone field
pub mod pheromone;
/// Planner trait and strategy selection
pub mod planner;
/// Tick-driven simulation loop
pub mod simulation;

pub use agent::{AgentMetrics, AgentPhase, AgentState, StopReason};
pub use astar::AStar;
pub use colony::{AntWalk, ColonyOptimizer, ColonyOutcome};
pub use config::AppConfig;
pub use error::{CoreError, Result};
pub use events::SimEvent;
pub use fuzzy::{Assessment, FuzzyEngine, OscillationMemory};
pub use maze::MazeGenerator;
pub use metrics::{init_logging, RunMetrics};
pub use pheromone::PheromoneField;
pub use planner::{planner_for, Path, PathPlanner, PlanRequest, Strategy};
pub use robomaze_data::{Cell, Coord, Grid, Maze, MazeSnapshot};
pub use simulation::Simulation;
