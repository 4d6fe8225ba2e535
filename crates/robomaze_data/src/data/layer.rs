use crate::data::grid::{Coord, Grid};
use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// Auxiliary `0/1` layer with the same shape as a [`Grid`].
///
/// Used for the danger field (1 on hazards) and the safety field (its
/// complement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayer {
    rows: usize,
    cols: usize,
    values: Vec<u8>,
}

impl FieldLayer {
    #[must_use]
    pub fn new(rows: usize, cols: usize, fill: u8) -> Self {
        Self {
            rows,
            cols,
            values: vec![fill; rows * cols],
        }
    }

    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(height * width);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::malformed(format!(
                    "layer row {r} has {} cells, expected {width}",
                    row.len()
                )));
            }
            if let Some(bad) = row.iter().find(|&&v| v > 1) {
                return Err(GridError::malformed(format!(
                    "layer value {bad} in row {r} is not 0 or 1"
                )));
            }
            values.extend_from_slice(row);
        }
        Ok(Self {
            rows: height,
            cols: width,
            values,
        })
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        if self.cols == 0 {
            return Vec::new();
        }
        self.values.chunks(self.cols).map(<[u8]>::to_vec).collect()
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

    /// 0 outside the layer.
    pub fn get(&self, c: Coord) -> u8 {
        if c.row < self.rows && c.col < self.cols {
            self.values[c.row * self.cols + c.col]
        } else {
            0
        }
    }

    pub fn set(&mut self, c: Coord, value: u8) {
        if c.row < self.rows && c.col < self.cols {
            self.values[c.row * self.cols + c.col] = value;
        }
    }

    /// Number of flagged cells in the in-bounds 3x3 block around `c`.
    pub fn count_around(&self, c: Coord) -> usize {
        (-1isize..=1)
            .flat_map(|dr| (-1isize..=1).filter_map(move |dc| c.offset(dr, dc)))
            .filter(|n| self.get(*n) == 1)
            .count()
    }

    pub fn total(&self) -> usize {
        self.values.iter().map(|&v| v as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_around_clips_edges() {
        let mut layer = FieldLayer::new(3, 3, 0);
        layer.set(Coord::new(0, 0), 1);
        layer.set(Coord::new(2, 2), 1);
        assert_eq!(layer.count_around(Coord::new(1, 1)), 2);
        assert_eq!(layer.count_around(Coord::new(0, 0)), 1);
    }

    #[test]
    fn test_from_rows_rejects_non_binary() {
        assert!(FieldLayer::from_rows(&[vec![0, 2]]).is_err());
        let layer = FieldLayer::from_rows(&[vec![0, 1], vec![1, 1]]).unwrap();
        assert_eq!(layer.total(), 3);
    }
}
