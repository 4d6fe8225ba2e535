use crate::data::grid::{Cell, Coord, Grid};
use crate::data::layer::FieldLayer;
use crate::data::snapshot::MazeSnapshot;
use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// The obstacle grid together with its danger and safety layers.
///
/// All mutation goes through this type so the two layers never drift from
/// the hazard cells they mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    grid: Grid,
    danger: FieldLayer,
    safety: FieldLayer,
}

impl Maze {
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        Ok(Self::from_grid(Grid::new(rows, cols)?))
    }

    #[must_use]
    pub fn from_grid(grid: Grid) -> Self {
        let mut maze = Self {
            danger: FieldLayer::new(grid.rows(), grid.cols(), 0),
            safety: FieldLayer::new(grid.rows(), grid.cols(), 1),
            grid,
        };
        maze.rederive_layers();
        maze
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn danger(&self) -> &FieldLayer {
        &self.danger
    }

    pub fn safety(&self) -> &FieldLayer {
        &self.safety
    }

    pub fn start(&self) -> Coord {
        self.grid.start()
    }

    pub fn goal(&self) -> Coord {
        self.grid.goal()
    }

    /// Recomputes both layers from the whole grid.
    pub fn rederive_layers(&mut self) {
        let coords: Vec<Coord> = self.grid.coords().collect();
        for c in coords {
            self.sync_layers_at(c);
        }
    }

    fn sync_layers_at(&mut self, c: Coord) {
        let hazard = u8::from(self.grid.is_hazard(c));
        self.danger.set(c, hazard);
        self.safety.set(c, 1 - hazard);
    }

    /// Writes a cell and updates the layers at that coordinate.
    pub fn set_cell(&mut self, c: Coord, cell: Cell) -> Result<(), GridError> {
        self.grid.set(c, cell)?;
        self.sync_layers_at(c);
        Ok(())
    }

    /// Wall becomes open, anything else becomes wall. Returns the new cell.
    pub fn toggle_wall(&mut self, c: Coord) -> Result<Cell, GridError> {
        let next = match self.grid.get(c) {
            Some(Cell::Wall) => Cell::Open,
            _ => Cell::Wall,
        };
        self.set_cell(c, next)?;
        Ok(next)
    }

    /// Hazard becomes open, anything else becomes hazard. Returns the new cell.
    pub fn toggle_hazard(&mut self, c: Coord) -> Result<Cell, GridError> {
        let next = match self.grid.get(c) {
            Some(Cell::Hazard) => Cell::Open,
            _ => Cell::Hazard,
        };
        self.set_cell(c, next)?;
        Ok(next)
    }

    pub fn set_start(&mut self, c: Coord) -> Result<(), GridError> {
        self.grid.set_start(c)
    }

    pub fn set_goal(&mut self, c: Coord) -> Result<(), GridError> {
        self.grid.set_goal(c)
    }

    /// Opens every cell; start and goal are kept.
    pub fn clear(&mut self) {
        self.grid.fill(Cell::Open);
        self.rederive_layers();
    }

    /// Open cell closest (Manhattan, then row-major) to `target`.
    pub fn nearest_open(&self, target: Coord) -> Option<Coord> {
        self.grid
            .coords()
            .filter(|c| self.grid.is_open(*c))
            .min_by_key(|c| (c.manhattan(target), *c))
    }

    #[must_use]
    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            field: self.grid.to_rows(),
            danger_field: self.danger.to_rows(),
            safety_field: self.safety.to_rows(),
            start: self.grid.start().into(),
            goal: self.grid.goal().into(),
        }
    }

    /// Rebuilds a maze from a snapshot. Stored layers must agree with the
    /// hazard cells of the field.
    pub fn from_snapshot(snapshot: &MazeSnapshot) -> Result<Self, GridError> {
        let mut grid = Grid::from_rows(&snapshot.field)?;
        grid.set_start(snapshot.start.into())?;
        grid.set_goal(snapshot.goal.into())?;
        let danger = FieldLayer::from_rows(&snapshot.danger_field)?;
        let safety = FieldLayer::from_rows(&snapshot.safety_field)?;
        if !danger.same_shape(&grid) || !safety.same_shape(&grid) {
            return Err(GridError::malformed(
                "danger/safety layers do not match the field shape",
            ));
        }
        let maze = Self::from_grid(grid);
        for (name, stored, derived) in [
            ("danger", &danger, &maze.danger),
            ("safety", &safety, &maze.safety),
        ] {
            if let Some(c) = maze.grid.coords().find(|&c| stored.get(c) != derived.get(c)) {
                return Err(GridError::malformed(format!(
                    "{name} layer disagrees with the field at ({}, {})",
                    c.row, c.col
                )));
            }
        }
        Ok(maze)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_hazard_updates_layers() {
        let mut maze = Maze::new(3, 3).unwrap();
        let c = Coord::new(1, 1);
        assert_eq!(maze.toggle_hazard(c).unwrap(), Cell::Hazard);
        assert_eq!(maze.danger().get(c), 1);
        assert_eq!(maze.safety().get(c), 0);

        assert_eq!(maze.toggle_hazard(c).unwrap(), Cell::Open);
        assert_eq!(maze.danger().get(c), 0);
        assert_eq!(maze.safety().get(c), 1);
    }

    #[test]
    fn test_wall_over_hazard_clears_danger() {
        let mut maze = Maze::new(2, 2).unwrap();
        let c = Coord::new(0, 1);
        maze.toggle_hazard(c).unwrap();
        assert_eq!(maze.toggle_wall(c).unwrap(), Cell::Wall);
        assert_eq!(maze.danger().get(c), 0);
        assert_eq!(maze.safety().get(c), 1);
        assert_eq!(maze.toggle_wall(c).unwrap(), Cell::Open);
    }

    #[test]
    fn test_clear_resets_layers() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.toggle_hazard(Coord::new(0, 0)).unwrap();
        maze.toggle_wall(Coord::new(1, 0)).unwrap();
        maze.clear();
        assert_eq!(maze.grid().count(Cell::Open), 4);
        assert_eq!(maze.danger().total(), 0);
        assert_eq!(maze.safety().total(), 4);
    }

    #[test]
    fn test_snapshot_with_phantom_danger_is_rejected() {
        let maze = Maze::new(2, 2).unwrap();
        let mut snapshot = maze.snapshot();
        snapshot.danger_field[0][1] = 1;
        assert!(matches!(
            Maze::from_snapshot(&snapshot),
            Err(GridError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_nearest_open() {
        let grid = Grid::from_rows(&[vec![1, 1, 0], vec![1, 0, 0]]).unwrap();
        let maze = Maze::from_grid(grid);
        assert_eq!(maze.nearest_open(Coord::new(0, 0)), Some(Coord::new(1, 1)));
    }

    #[test]
    fn test_mutation_out_of_bounds() {
        let mut maze = Maze::new(2, 2).unwrap();
        assert!(maze.toggle_wall(Coord::new(5, 5)).is_err());
        assert!(maze.set_goal(Coord::new(2, 0)).is_err());
    }
}
