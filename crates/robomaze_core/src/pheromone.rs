//! Pheromone trail field owned by a colony optimizer.

use robomaze_data::{Coord, Grid};
use serde::{Deserialize, Serialize};

/// Dense `f64` trail intensities, one per cell.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PheromoneField {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl PheromoneField {
    #[must_use]
    pub fn new(rows: usize, cols: usize, initial: f64) -> Self {
        Self {
            rows,
            cols,
            values: vec![initial; rows * cols],
        }
    }

    pub fn for_grid(grid: &Grid, initial: f64) -> Self {
        Self::new(grid.rows(), grid.cols(), initial)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn same_shape(&self, grid: &Grid) -> bool {
        self.rows == grid.rows() && self.cols == grid.cols()
    }

    /// 0 outside the field.
    #[inline]
    pub fn get(&self, c: Coord) -> f64 {
        if c.row < self.rows && c.col < self.cols {
            self.values[c.row * self.cols + c.col]
        } else {
            0.0
        }
    }

    /// Scales every cell by `1 - rate`.
    pub fn evaporate(&mut self, rate: f64) {
        let keep = (1.0 - rate).clamp(0.0, 1.0);
        for v in &mut self.values {
            *v *= keep;
        }
    }

    pub fn deposit(&mut self, c: Coord, amount: f64) {
        if c.row < self.rows && c.col < self.cols && amount > 0.0 {
            self.values[c.row * self.cols + c.col] += amount;
        }
    }

    /// Deposits `amount` once per visit along `path`.
    pub fn deposit_path(&mut self, path: &[Coord], amount: f64) {
        for &c in path {
            self.deposit(c, amount);
        }
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }
}
