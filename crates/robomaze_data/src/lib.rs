//! # RoboMaze Data
//!
//! Plain data model shared by every RoboMaze crate: coordinates, cell kinds,
//! the obstacle grid, the danger/safety layers derived from it and the
//! row-major snapshot used at the persistence boundary.
//!
//! Nothing in here knows about search engines or agents.

pub mod data;
pub mod error;

pub use data::grid::{Cell, Coord, Grid, DIRECTIONS};
pub use data::layer::FieldLayer;
pub use data::maze::Maze;
pub use data::snapshot::MazeSnapshot;
pub use error::{Endpoint, GridError};
