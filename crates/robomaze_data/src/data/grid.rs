use crate::error::{Endpoint, GridError};
use serde::{Deserialize, Serialize};

/// Four-connected move offsets as `(d_row, d_col)`: east, south, west, north.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Grid coordinate. Ordering is row-major, which the search engines rely on
/// for deterministic tie-breaking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub fn euclidean(self, other: Coord) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }

    #[must_use]
    pub fn manhattan(self, other: Coord) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Shifts by a signed delta. `None` when either axis would go negative.
    #[must_use]
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Coord> {
        Some(Coord {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// Heading from `self` towards `to` in degrees, normalized to `[0, 360)`.
    /// Row growth is 0°, column growth is 90°.
    #[must_use]
    pub fn heading_to(self, to: Coord) -> f64 {
        let d_row = to.row as f64 - self.row as f64;
        let d_col = to.col as f64 - self.col as f64;
        let angle = d_col.atan2(d_row).to_degrees();
        if angle < 0.0 {
            angle + 360.0
        } else {
            angle
        }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<Coord> for (usize, usize) {
    fn from(c: Coord) -> Self {
        (c.row, c.col)
    }
}

/// Content of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    /// Free floor.
    #[default]
    Open = 0,
    /// Impassable.
    Wall = 1,
    /// Passable, but expensive in search cost and energy.
    Hazard = 2,
}

impl Cell {
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Cell::Wall)
    }

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Cell::Open => '.',
            Cell::Wall => '#',
            Cell::Hazard => '^',
        }
    }
}

impl TryFrom<u8> for Cell {
    type Error = GridError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Cell::Open),
            1 => Ok(Cell::Wall),
            2 => Ok(Cell::Hazard),
            other => Err(GridError::UnknownCell(other)),
        }
    }
}

/// Row-major obstacle field with a start and a goal.
///
/// Coordinates handed to the mutators are bounds-checked; start and goal are
/// always inside the grid but may sit on blocked cells until a run validates
/// them with [`Grid::validate_endpoints`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    start: Coord,
    goal: Coord,
}

impl Grid {
    /// Creates an all-open grid with the start in the top-left corner and the
    /// goal in the bottom-right one.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        Self::filled(rows, cols, Cell::Open)
    }

    pub fn filled(rows: usize, cols: usize, cell: Cell) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![cell; rows * cols],
            start: Coord::new(0, 0),
            goal: Coord::new(rows - 1, cols - 1),
        })
    }

    /// Builds a grid from nested row arrays of cell codes.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut grid = Self::new(height, width)?;
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::malformed(format!(
                    "row {r} has {} cells, expected {width}",
                    row.len()
                )));
            }
            for (c, &code) in row.iter().enumerate() {
                let idx = grid.index(Coord::new(r, c));
                grid.cells[idx] = Cell::try_from(code)?;
            }
        }
        Ok(grid)
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn goal(&self) -> Coord {
        self.goal
    }

    #[inline(always)]
    fn index(&self, c: Coord) -> usize {
        c.row * self.cols + c.col
    }

    #[inline]
    pub fn in_bounds(&self, c: Coord) -> bool {
        c.row < self.rows && c.col < self.cols
    }

    fn check(&self, c: Coord) -> Result<(), GridError> {
        if self.in_bounds(c) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                row: c.row,
                col: c.col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub fn get(&self, c: Coord) -> Option<Cell> {
        self.in_bounds(c).then(|| self.cells[self.index(c)])
    }

    /// Out-of-bounds counts as wall.
    pub fn is_wall(&self, c: Coord) -> bool {
        self.get(c).is_none_or(|cell| cell == Cell::Wall)
    }

    pub fn is_open(&self, c: Coord) -> bool {
        self.get(c) == Some(Cell::Open)
    }

    pub fn is_hazard(&self, c: Coord) -> bool {
        self.get(c) == Some(Cell::Hazard)
    }

    pub fn set(&mut self, c: Coord, cell: Cell) -> Result<(), GridError> {
        self.check(c)?;
        let idx = self.index(c);
        self.cells[idx] = cell;
        Ok(())
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.iter_mut().for_each(|c| *c = cell);
    }

    pub fn set_start(&mut self, c: Coord) -> Result<(), GridError> {
        self.check(c)?;
        self.start = c;
        Ok(())
    }

    pub fn set_goal(&mut self, c: Coord) -> Result<(), GridError> {
        self.check(c)?;
        self.goal = c;
        Ok(())
    }

    /// Start and goal must both be open before a run.
    pub fn validate_endpoints(&self) -> Result<(), GridError> {
        for (which, c) in [(Endpoint::Start, self.start), (Endpoint::Goal, self.goal)] {
            self.check(c)?;
            if !self.is_open(c) {
                return Err(GridError::Blocked {
                    which,
                    row: c.row,
                    col: c.col,
                });
            }
        }
        Ok(())
    }

    /// In-bounds four-connected neighbours, walls included, in [`DIRECTIONS`] order.
    pub fn adjacent(&self, c: Coord) -> impl Iterator<Item = Coord> + '_ {
        DIRECTIONS
            .iter()
            .filter_map(move |&(dr, dc)| c.offset(dr, dc))
            .filter(move |n| self.in_bounds(*n))
    }

    /// Passable four-connected neighbours in [`DIRECTIONS`] order.
    pub fn neighbors(&self, c: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.adjacent(c).filter(move |n| !self.is_wall(*n))
    }

    /// In-bounds cells of the 3x3 block centred on `c`, `c` included.
    pub fn neighborhood(&self, c: Coord) -> impl Iterator<Item = Coord> + '_ {
        (-1isize..=1)
            .flat_map(move |dr| (-1isize..=1).filter_map(move |dc| c.offset(dr, dc)))
            .filter(move |n| self.in_bounds(*n))
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| Coord::new(r, c)))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Text rendering, one line per row.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for (r, row) in self.cells.chunks(self.cols).enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let here = Coord::new(r, c);
                let ch = if here == self.start {
                    'S'
                } else if here == self.goal {
                    'G'
                } else {
                    cell.symbol()
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_defaults() {
        let grid = Grid::new(3, 4).unwrap();
        assert_eq!(grid.area(), 12);
        assert_eq!(grid.start(), Coord::new(0, 0));
        assert_eq!(grid.goal(), Coord::new(2, 3));
        assert_eq!(grid.count(Cell::Open), 12);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(GridError::InvalidDimensions { rows: 0, cols: 5 })
        ));
    }

    #[test]
    fn test_render_marks_endpoints_and_cells() {
        let mut grid = Grid::from_rows(&[vec![0, 1, 0], vec![2, 0, 0]]).unwrap();
        grid.set_goal(Coord::new(0, 2)).unwrap();
        assert_eq!(grid.render(), "S#G\n^..\n");
    }

    #[test]
    fn test_from_rows_round_trip() {
        let rows = vec![vec![0, 1, 2], vec![2, 1, 0]];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.get(Coord::new(0, 2)), Some(Cell::Hazard));
        assert_eq!(grid.to_rows(), rows);
    }

    #[test]
    fn test_from_rows_rejects_ragged_and_unknown() {
        assert!(Grid::from_rows(&[vec![0, 0], vec![0]]).is_err());
        assert_eq!(
            Grid::from_rows(&[vec![0, 7]]),
            Err(GridError::UnknownCell(7))
        );
    }

    #[test]
    fn test_neighbors_skip_walls_and_edges() {
        let grid = Grid::from_rows(&[vec![0, 1], vec![0, 0]]).unwrap();
        let n: Vec<_> = grid.neighbors(Coord::new(0, 0)).collect();
        assert_eq!(n, vec![Coord::new(1, 0)]);
    }

    #[test]
    fn test_neighborhood_clipped_at_corner() {
        let grid = Grid::new(5, 5).unwrap();
        assert_eq!(grid.neighborhood(Coord::new(0, 0)).count(), 4);
        assert_eq!(grid.neighborhood(Coord::new(2, 2)).count(), 9);
    }

    #[test]
    fn test_validate_endpoints() {
        let mut grid = Grid::new(2, 2).unwrap();
        assert!(grid.validate_endpoints().is_ok());
        grid.set(Coord::new(1, 1), Cell::Hazard).unwrap();
        assert_eq!(
            grid.validate_endpoints(),
            Err(GridError::Blocked {
                which: Endpoint::Goal,
                row: 1,
                col: 1
            })
        );
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut grid = Grid::new(2, 2).unwrap();
        assert!(grid.set(Coord::new(2, 0), Cell::Wall).is_err());
        assert!(grid.set_start(Coord::new(0, 9)).is_err());
    }

    #[test]
    fn test_heading() {
        let origin = Coord::new(5, 5);
        assert_eq!(origin.heading_to(Coord::new(6, 5)), 0.0);
        assert_eq!(origin.heading_to(Coord::new(5, 6)), 90.0);
        assert_eq!(origin.heading_to(Coord::new(4, 5)), 180.0);
        assert_eq!(origin.heading_to(Coord::new(5, 4)), 270.0);
    }

    #[test]
    fn test_offset_underflow() {
        assert_eq!(Coord::new(0, 3).offset(-1, 0), None);
        assert_eq!(Coord::new(0, 3).offset(1, -1), Some(Coord::new(1, 2)));
    }
}
