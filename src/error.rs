//! Error types for grid construction, editing and search invocation.

use grid_util::point::Point;
use thiserror::Error;

/// Why a start/end pair was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointError {
    #[error("start or end cell has not been placed")]
    Missing,
    #[error("start and end are the same cell {0}")]
    Equal(Point),
    #[error("{0} lies outside the grid")]
    OutOfBounds(Point),
    #[error("{0} is an obstacle")]
    Obstacle(Point),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid grid size {size}")]
    InvalidSize { size: usize },

    #[error("invalid endpoints: {0}")]
    InvalidEndpoints(#[from] EndpointError),

    #[error("{0} lies outside the grid")]
    OutOfBounds(Point),

    #[error("map parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
