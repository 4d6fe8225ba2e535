use robomaze_core::config::{AppConfig, SimulationConfig};
use robomaze_core::{Simulation, Strategy};
use robomaze_data::{Cell, Coord, Grid, Maze};

/// Fluent construction of small test mazes and simulations.
#[allow(dead_code)]
pub struct MazeBuilder {
    rows: usize,
    cols: usize,
    cells: Vec<(Coord, Cell)>,
    start: Option<Coord>,
    goal: Option<Coord>,
    config: AppConfig,
}

#[allow(dead_code)]
impl MazeBuilder {
    pub fn new(rows: usize, cols: usize) -> Self {
        let config = AppConfig {
            simulation: SimulationConfig {
                hazard_injection_chance: 0.0,
                seed: Some(42),
                ..Default::default()
            },
            ..Default::default()
        };
        Self {
            rows,
            cols,
            cells: Vec::new(),
            start: None,
            goal: None,
            config,
        }
    }

    /// `#` wall, `^` hazard, `S` start, `G` goal, anything else open.
    pub fn from_ascii(lines: &[&str]) -> Self {
        let cols = lines.first().map_or(0, |l| l.len());
        let mut builder = Self::new(lines.len(), cols);
        for (r, line) in lines.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                let at = Coord::new(r, c);
                builder = match ch {
                    '#' => builder.with_wall(at),
                    '^' => builder.with_hazard(at),
                    'S' => builder.with_start(at),
                    'G' => builder.with_goal(at),
                    _ => builder,
                };
            }
        }
        builder
    }

    pub fn with_wall(mut self, at: Coord) -> Self {
        self.cells.push((at, Cell::Wall));
        self
    }

    pub fn with_hazard(mut self, at: Coord) -> Self {
        self.cells.push((at, Cell::Hazard));
        self
    }

    pub fn with_start(mut self, at: Coord) -> Self {
        self.start = Some(at);
        self
    }

    pub fn with_goal(mut self, at: Coord) -> Self {
        self.goal = Some(at);
        self
    }

    pub fn with_strategies(mut self, strategies: &[Strategy]) -> Self {
        self.config.simulation.strategies = strategies.to_vec();
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn build_grid(&self) -> Grid {
        self.build_maze().grid().clone()
    }

    pub fn build_maze(&self) -> Maze {
        let mut maze = Maze::new(self.rows, self.cols).expect("valid dimensions");
        for &(at, cell) in &self.cells {
            maze.set_cell(at, cell).expect("cell in bounds");
        }
        if let Some(start) = self.start {
            maze.set_start(start).expect("start in bounds");
        }
        if let Some(goal) = self.goal {
            maze.set_goal(goal).expect("goal in bounds");
        }
        maze
    }

    pub fn build_simulation(self) -> Simulation {
        let maze = self.build_maze();
        Simulation::new(self.config, maze).expect("valid configuration")
    }
}
