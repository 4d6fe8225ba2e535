//! Maze snapshot persistence.

use crate::error::{IoError, Result};
use crate::serialization::{read_json_file, write_json_file};
use robomaze_data::{Maze, MazeSnapshot};
use std::path::Path;

pub fn save_snapshot<P: AsRef<Path>>(snapshot: &MazeSnapshot, path: P) -> Result<()> {
    write_json_file(snapshot, &path)?;
    tracing::debug!(path = ?path.as_ref(), rows = snapshot.field.len(), "Saved maze snapshot");
    Ok(())
}

pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<MazeSnapshot> {
    let snapshot: MazeSnapshot = read_json_file(&path)?;
    if snapshot.field.is_empty() {
        return Err(IoError::validation("snapshot has an empty field")
            .with_context(format!("loading {:?}", path.as_ref())));
    }
    Ok(snapshot)
}

pub fn save_maze<P: AsRef<Path>>(maze: &Maze, path: P) -> Result<()> {
    save_snapshot(&maze.snapshot(), path)
}

/// Loads a snapshot and rebuilds the maze, rejecting malformed fields.
pub fn load_maze<P: AsRef<Path>>(path: P) -> Result<Maze> {
    let snapshot = load_snapshot(&path)?;
    Maze::from_snapshot(&snapshot)
        .map_err(|e| IoError::from(e).with_context(format!("loading {:?}", path.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use robomaze_data::Coord;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("robomaze_persist_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_maze_file_round_trip() {
        let mut maze = Maze::new(4, 5).unwrap();
        maze.toggle_wall(Coord::new(1, 1)).unwrap();
        maze.toggle_hazard(Coord::new(2, 3)).unwrap();
        maze.set_goal(Coord::new(3, 0)).unwrap();

        for name in ["maze.json", "maze.json.gz"] {
            let path = temp_path(name);
            save_maze(&maze, &path).unwrap();
            assert_eq!(load_maze(&path).unwrap(), maze);
            std::fs::remove_file(&path).ok();
        }
    }

    #[test]
    fn test_malformed_snapshot_rejected() {
        let mut snapshot = Maze::new(2, 2).unwrap().snapshot();
        snapshot.field[1] = vec![0, 9];
        let path = temp_path("bad.json");
        save_snapshot(&snapshot, &path).unwrap();
        assert!(load_maze(&path).is_err());
        std::fs::remove_file(&path).ok();
    }
}
