//! Error types for grid construction and mutation.

use std::fmt;
use thiserror::Error;

/// Which end of a route a coordinate refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => f.write_str("Start"),
            Endpoint::Goal => f.write_str("Goal"),
        }
    }
}

/// Errors raised by the grid data model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Zero rows or zero columns
    #[error("Invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// Coordinate outside the grid
    #[error("Coordinate ({row}, {col}) out of bounds for {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Start or goal sits on a non-open cell
    #[error("{which} position ({row}, {col}) is blocked")]
    Blocked {
        which: Endpoint,
        row: usize,
        col: usize,
    },

    /// Cell code other than 0, 1 or 2
    #[error("Unknown cell code: {0}")]
    UnknownCell(u8),

    /// Snapshot arrays with inconsistent shape or values
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

impl GridError {
    #[must_use]
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedSnapshot(msg.into())
    }
}
