//! Core data structures for the RoboMaze simulation.

pub mod grid;
pub mod layer;
pub mod maze;
pub mod snapshot;
