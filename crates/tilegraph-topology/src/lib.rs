//! Tile Lattice Topology
//!
//! Coordinate systems for tile maps built on hexagonal or square lattices.
//!
//! # Coordinates
//!
//! Every tile is addressed by an integer [`LatticeCoord`]:
//! - hex maps use cube coordinates with the invariant `x + y + z = 0`
//! - square maps use `(x, y)` and keep `z = 0`
//!
//! World space is the XZ plane with Y up. A map scales the unit tile by its
//! edge length.
//!
//! # Metrics
//!
//! Hex distance is the cube (Chebyshev) metric; square distance is Euclidean
//! between lattice points, so a diagonal step costs `√2` even though squares
//! only connect orthogonally.

mod error;
mod lattice;
mod topology;

pub mod hex;
pub mod layout;
pub mod square;

pub use error::{Error, Result};
pub use lattice::LatticeCoord;
pub use topology::GridTopology;

/// Neighbor count on a hex lattice.
pub const HEX_SIDES: usize = 6;

/// Neighbor count on a square lattice.
pub const SQUARE_SIDES: usize = 4;

/// Largest side count of any supported topology.
pub const MAX_SIDES: usize = HEX_SIDES;

/// Widest radius, in cells, that area and reset-window enumeration will walk.
pub const MAX_AREA_RADIUS: i32 = 1024;

/// Whole-cell radius for an already rounded range, clamped to
/// `0..=MAX_AREA_RADIUS`. Non-finite ranges have no radius.
pub(crate) fn cell_radius(rounded: f32) -> Option<i32> {
    rounded
        .is_finite()
        .then(|| (rounded.max(0.0) as i32).min(MAX_AREA_RADIUS))
}

const _: () = assert!(HEX_SIDES == hex::DIRECTIONS.len());
const _: () = assert!(SQUARE_SIDES == square::DIRECTIONS.len());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_constants_match_tables() {
        assert_eq!(GridTopology::Hex.side_count(), HEX_SIDES);
        assert_eq!(GridTopology::Square.side_count(), SQUARE_SIDES);
        assert!(MAX_SIDES >= SQUARE_SIDES);
    }

    #[test]
    fn cell_radius_is_bounded() {
        assert_eq!(cell_radius(3.0), Some(3));
        assert_eq!(cell_radius(-2.0), Some(0));
        assert_eq!(cell_radius(1e12), Some(MAX_AREA_RADIUS));
        assert_eq!(cell_radius(f32::INFINITY), None);
        assert_eq!(cell_radius(f32::NAN), None);
    }
}
