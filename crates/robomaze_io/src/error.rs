//! Error types for robomaze_io crate.
//!
//! Covers reading and writing maze snapshots and run reports.

use robomaze_data::GridError;
use thiserror::Error;

/// Main error type for robomaze_io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Compression errors
    #[error("Compression error: {0}")]
    Compression(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Snapshot that parses but does not describe a valid maze
    #[error("Invalid maze: {0}")]
    Maze(#[from] GridError),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

/// Result type alias for robomaze_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    #[must_use]
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    #[must_use]
    pub fn compression<S: Into<String>>(msg: S) -> Self {
        Self::Compression(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IoError::validation("empty file");
        assert_eq!(err.to_string(), "Validation error: empty file");
    }

    #[test]
    fn test_error_context() {
        let err = IoError::compression("truncated stream").with_context("loading maze.json.gz");
        let text = err.to_string();
        assert!(text.starts_with("loading maze.json.gz"));
        assert!(text.contains("truncated stream"));
    }

    #[test]
    fn test_from_grid_error() {
        let err: IoError = GridError::UnknownCell(4).into();
        assert!(matches!(err, IoError::Maze(GridError::UnknownCell(4))));
    }
}
