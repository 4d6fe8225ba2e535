//! # RoboMaze IO
//!
//! Persistence layer for mazes and run reports.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - JSON serialization with transparent gzip for `.gz` paths
//! - Maze snapshot save and load

/// Error types and result aliases for I/O operations
pub mod error;
/// Maze snapshot persistence
pub mod persistence;
/// Validated JSON helpers
pub mod serialization;

pub use error::{IoError, Result};
pub use persistence::{load_maze, load_snapshot, save_maze, save_snapshot};
pub use serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file};
