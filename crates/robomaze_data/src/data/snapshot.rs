use serde::{Deserialize, Serialize};

/// Row-major nested-array form of a maze, used at the persistence boundary.
///
/// `start` and `goal` serialize as `[row, col]` pairs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MazeSnapshot {
    pub field: Vec<Vec<u8>>,
    pub danger_field: Vec<Vec<u8>>,
    pub safety_field: Vec<Vec<u8>>,
    pub start: (usize, usize),
    pub goal: (usize, usize),
}

#[cfg(test)]
mod tests {
    use crate::data::grid::{Cell, Coord};
    use crate::data::maze::Maze;

    #[test]
    fn test_snapshot_json_round_trip() {
        let mut maze = Maze::new(3, 4).unwrap();
        maze.toggle_wall(Coord::new(1, 1)).unwrap();
        maze.toggle_hazard(Coord::new(2, 0)).unwrap();
        maze.set_start(Coord::new(0, 3)).unwrap();

        let json = serde_json::to_string(&maze.snapshot()).unwrap();
        let parsed: super::MazeSnapshot = serde_json::from_str(&json).unwrap();
        let restored = Maze::from_snapshot(&parsed).unwrap();

        assert_eq!(restored, maze);
        assert_eq!(restored.grid().get(Coord::new(2, 0)), Some(Cell::Hazard));
        assert!(json.contains("\"start\":[0,3]"));
    }

    #[test]
    fn test_snapshot_shape_mismatch() {
        let maze = Maze::new(2, 2).unwrap();
        let mut snapshot = maze.snapshot();
        snapshot.danger_field.pop();
        assert!(Maze::from_snapshot(&snapshot).is_err());
    }
}
