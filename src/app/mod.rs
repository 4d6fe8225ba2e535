//! Application layer: maze preparation and the tick drivers behind the CLI.

pub mod report;
pub mod shutdown;

pub use report::{AgentReport, CompareReport, EngineResult, RunReport};
pub use shutdown::ShutdownFlag;

use anyhow::{Context, Result};
use robomaze_core::config::{AppConfig, MazeConfig};
use robomaze_core::{astar, planner_for, MazeGenerator, OscillationMemory, PlanRequest, Simulation};
use robomaze_data::{Coord, Maze};
use std::sync::mpsc::Receiver;
use std::time::Instant;

/// A maze whose start and goal are open and connected.
#[derive(Debug, Clone)]
pub struct PreparedMaze {
    pub maze: Maze,
    /// Seed that produced `maze`.
    pub seed: u64,
    pub attempts: u32,
}

/// Generates a maze, moves start and goal to the open cells nearest the
/// top-left and bottom-right corners, and retries with `seed + attempt`
/// until A* connects them.
pub fn prepare_maze(config: &AppConfig) -> Result<PreparedMaze> {
    let maze_cfg: &MazeConfig = &config.maze;
    let generator = MazeGenerator::new(maze_cfg.clone());

    for attempt in 0..maze_cfg.max_attempts {
        let seed = maze_cfg.seed.wrapping_add(u64::from(attempt));
        let mut maze = generator.generate(maze_cfg.width, maze_cfg.height, seed)?;
        let corner = Coord::new(maze.grid().rows() - 1, maze.grid().cols() - 1);

        let (Some(start), Some(goal)) = (
            maze.nearest_open(Coord::new(0, 0)),
            maze.nearest_open(corner),
        ) else {
            tracing::warn!(seed, "No open cells, regenerating");
            continue;
        };
        if start == goal {
            continue;
        }
        maze.set_start(start)?;
        maze.set_goal(goal)?;

        let path = astar::find_path(
            maze.grid(),
            start,
            goal,
            config.astar.spike_cost,
            config.astar.distance_weight,
            config.astar.use_goal_heuristic,
        );
        if !path.is_empty() {
            tracing::info!(seed, attempt, start = ?start, goal = ?goal, "Maze prepared");
            return Ok(PreparedMaze {
                maze,
                seed,
                attempts: attempt + 1,
            });
        }
        tracing::warn!(seed, "Start and goal disconnected, regenerating");
    }

    anyhow::bail!(
        "no connected {}x{} maze within {} attempts from seed {}",
        maze_cfg.width,
        maze_cfg.height,
        maze_cfg.max_attempts,
        maze_cfg.seed
    )
}

/// Runs every engine once from the maze start.
pub fn compare(maze: &Maze, config: &AppConfig, seed: u64) -> CompareReport {
    let memory = OscillationMemory::new(config.fuzzy.memory_capacity);
    let request = PlanRequest {
        maze,
        from: maze.start(),
        goal: maze.goal(),
        energy: config.agent.initial_energy,
        speed: config.agent.initial_speed,
        memory: &memory,
    };

    let results = config
        .simulation
        .strategies
        .iter()
        .map(|&strategy| {
            let mut planner = planner_for(strategy, config, seed);
            let started = Instant::now();
            let path = planner.plan(&request);
            let elapsed_us = started.elapsed().as_micros() as u64;
            EngineResult {
                strategy,
                reached: path.last() == Some(&maze.goal()),
                steps: path.len().saturating_sub(1),
                cost: astar::path_cost(maze.grid(), &path, config.astar.spike_cost),
                hazards_on_path: path.iter().filter(|c| maze.grid().is_hazard(**c)).count(),
                elapsed_us,
                path,
            }
        })
        .collect();

    CompareReport {
        seed,
        rows: maze.grid().rows(),
        cols: maze.grid().cols(),
        start: maze.start(),
        goal: maze.goal(),
        config_fingerprint: config.fingerprint(),
        results,
    }
}

fn drain(events: &Receiver<robomaze_core::SimEvent>) -> usize {
    events.try_iter().count()
}

/// Starts `maze` and ticks as fast as possible for up to `max_ticks`.
pub fn run_headless(config: AppConfig, maze: Maze, max_ticks: u64) -> Result<RunReport> {
    let mut sim = Simulation::new(config, maze).context("building simulation")?;
    let events = sim.subscribe();
    sim.start().context("starting simulation")?;

    let mut seen = drain(&events);
    let mut ticks = 0;
    while ticks < max_ticks && !sim.is_finished() {
        sim.tick();
        seen += drain(&events);
        ticks += 1;
    }
    tracing::info!(ticks, finished = sim.is_finished(), "Headless run complete");
    Ok(RunReport::from_simulation(&sim, seen))
}

/// Like [`run_headless`] but paced by the configured tick interval. Stops
/// early on Ctrl+C.
pub async fn run_realtime(config: AppConfig, maze: Maze, max_ticks: u64) -> Result<RunReport> {
    let interval = config.simulation.tick_interval();
    let mut sim = Simulation::new(config, maze).context("building simulation")?;
    let events = sim.subscribe();
    sim.start().context("starting simulation")?;

    let shutdown = ShutdownFlag::new();
    shutdown.listen_for_ctrl_c();

    let mut timer = tokio::time::interval(interval);
    let mut seen = drain(&events);
    let mut ticks = 0;
    while ticks < max_ticks && !sim.is_finished() && !shutdown.is_requested() {
        timer.tick().await;
        let running = sim.tick();
        seen += drain(&events);
        ticks += 1;
        tracing::debug!(tick = sim.tick_count(), running, "Tick");
    }
    tracing::info!(
        ticks,
        interrupted = shutdown.is_requested(),
        "Real-time run complete"
    );
    Ok(RunReport::from_simulation(&sim, seen))
}
