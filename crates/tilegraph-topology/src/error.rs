//! Error types for tilegraph-topology.

use thiserror::Error;

use crate::LatticeCoord;

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by coordinate-system operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A hex coordinate that breaks the cube constraint.
    #[error("invalid hex coordinate {0}: x + y + z must be 0")]
    InvalidHexCoord(LatticeCoord),

    /// A square coordinate with a non-zero third axis.
    #[error("invalid square coordinate {0}: z must be 0")]
    InvalidSquareCoord(LatticeCoord),

    /// Neighbor index past the end of the direction table.
    #[error("direction index {index} out of range for {sides} sides")]
    DirectionIndexOutOfRange { index: usize, sides: usize },

    /// A vector that is not one of the topology's unit neighbor steps.
    #[error("{0} is not a neighbor direction")]
    NotANeighborDirection(LatticeCoord),

    /// Text that does not parse as `x,y,z`.
    #[error("malformed coordinate: {0:?}")]
    MalformedCoord(String),
}
