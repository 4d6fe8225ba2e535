//! Error types for robomaze_core.
//!
//! Search failures are not errors: an unreachable goal is an empty path and
//! an exhausted agent is a stopped agent. What remains here are the faults a
//! caller has to fix before a run can proceed.

use robomaze_data::GridError;
use thiserror::Error;

/// Main error type for robomaze_core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Bad dimensions, blocked endpoints or out-of-range parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Grid mutation errors
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Agent index that does not exist
    #[error("Unknown agent: {0}")]
    UnknownAgent(usize),
}

/// Result type alias for robomaze_core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    #[must_use]
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
