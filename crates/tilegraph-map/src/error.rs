//! Error types for tilegraph-map.

use thiserror::Error;
use tilegraph_topology::LatticeCoord;

/// Result type for map operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or editing a map.
#[derive(Debug, Error)]
pub enum Error {
    /// No tile record backs the coordinate
    #[error("no tile at {0}")]
    MissingTile(LatticeCoord),

    /// Side-height array length disagrees with the topology
    #[error("tile {coord} has {actual} side heights, topology needs {expected}")]
    SideCountMismatch {
        coord: LatticeCoord,
        expected: usize,
        actual: usize,
    },

    /// Configuration values out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Coordinate-system error
    #[error("topology error: {0}")]
    Topology(#[from] tilegraph_topology::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
