//! Randomised Prim carve on a wall-filled grid.

use rand::Rng;
use robomaze_data::{Cell, Coord, Grid, GridError};

/// Two-cell jumps; the cell in between is opened with the target.
const JUMPS: [(isize, isize); 4] = [(2, 0), (-2, 0), (0, 2), (0, -2)];

/// Carves a spanning tree of passages from a random seed cell. Every cell
/// opened here belongs to one connected component.
pub fn carve<R: Rng>(grid: &mut Grid, rng: &mut R) -> Result<(), GridError> {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut visited = vec![false; rows * cols];

    let seed = Coord::new(rng.gen_range(0..rows), rng.gen_range(0..cols));
    visited[seed.row * cols + seed.col] = true;
    grid.set(seed, Cell::Open)?;

    let mut frontier = vec![seed];
    while !frontier.is_empty() {
        let current = frontier.swap_remove(rng.gen_range(0..frontier.len()));
        for (dr, dc) in JUMPS {
            let Some(next) = current.offset(dr, dc).filter(|n| grid.in_bounds(*n)) else {
                continue;
            };
            let idx = next.row * cols + next.col;
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            frontier.push(next);
            let between = Coord::new((current.row + next.row) / 2, (current.col + next.col) / 2);
            grid.set(next, Cell::Open)?;
            grid.set(between, Cell::Open)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::VecDeque;

    #[test]
    fn test_carved_cells_are_connected() {
        let mut grid = Grid::filled(9, 11, Cell::Wall).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        carve(&mut grid, &mut rng).unwrap();

        let open: Vec<Coord> = grid.coords().filter(|c| grid.is_open(*c)).collect();
        assert!(open.len() > 1);

        let mut seen = vec![open[0]];
        let mut queue = VecDeque::from([open[0]]);
        while let Some(c) = queue.pop_front() {
            for n in grid.neighbors(c) {
                if !seen.contains(&n) {
                    seen.push(n);
                    queue.push_back(n);
                }
            }
        }
        assert_eq!(seen.len(), open.len());
    }

    #[test]
    fn test_single_cell_grid() {
        let mut grid = Grid::filled(1, 1, Cell::Wall).unwrap();
        carve(&mut grid, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        assert!(grid.is_open(Coord::new(0, 0)));
    }
}
