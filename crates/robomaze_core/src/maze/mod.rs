//! Procedural maze generation: a Prim carve perturbed by gradient noise.

pub mod noise;
pub mod prim;

use crate::config::MazeConfig;
use crate::error::Result;
use noise::PerlinNoise;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use robomaze_data::{Cell, Grid, Maze};

/// Builds mazes from a seed. Equal seeds and parameters give equal mazes.
#[derive(Debug, Clone, Default)]
pub struct MazeGenerator {
    config: MazeConfig,
    noise: PerlinNoise,
}

impl MazeGenerator {
    #[must_use]
    pub fn new(config: MazeConfig) -> Self {
        Self {
            config,
            noise: PerlinNoise::new(),
        }
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// `width` is the column count, `height` the row count. Start and goal
    /// sit in opposite corners and may end up blocked or disconnected.
    pub fn generate(&self, width: usize, height: usize, seed: u64) -> Result<Maze> {
        let mut grid = Grid::filled(height, width, Cell::Wall)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        prim::carve(&mut grid, &mut rng)?;
        self.overlay_noise(&mut grid, &mut rng)?;

        tracing::debug!(
            width,
            height,
            seed,
            walls = grid.count(Cell::Wall),
            hazards = grid.count(Cell::Hazard),
            "Generated maze"
        );
        Ok(Maze::from_grid(grid))
    }

    fn overlay_noise<R: Rng>(&self, grid: &mut Grid, rng: &mut R) -> Result<()> {
        let f = self.config.noise_frequency;
        let coords: Vec<_> = grid.coords().collect();
        for c in coords {
            let value = self.noise.sample(c.row as f64 * f, c.col as f64 * f);
            if value > self.config.wall_threshold {
                grid.set(c, Cell::Wall)?;
            } else if grid.is_open(c) && rng.gen::<f64>() < self.config.hazard_chance {
                grid.set(c, Cell::Hazard)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robomaze_data::Coord;

    #[test]
    fn test_same_seed_same_maze() {
        let gen = MazeGenerator::default();
        let a = gen.generate(10, 10, 42).unwrap();
        let b = gen.generate(10, 10, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_width_is_columns() {
        let maze = MazeGenerator::default().generate(7, 4, 1).unwrap();
        assert_eq!(maze.grid().rows(), 4);
        assert_eq!(maze.grid().cols(), 7);
        assert_eq!(maze.start(), Coord::new(0, 0));
        assert_eq!(maze.goal(), Coord::new(3, 6));
    }

    #[test]
    fn test_layers_match_hazards() {
        let maze = MazeGenerator::default().generate(15, 15, 9).unwrap();
        assert_eq!(maze.danger().total(), maze.grid().count(Cell::Hazard));
        assert_eq!(maze.safety().total(), 15 * 15 - maze.danger().total());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(MazeGenerator::default().generate(0, 5, 1).is_err());
    }
}
