//! Square geometry on a planar integer lattice.
//!
//! Lattice `(x, y)` maps to world `(x, 0, y) * edge`; the third lattice axis
//! stays zero. Distances are Euclidean between lattice points.

use glam::Vec3;

use crate::{cell_radius, LatticeCoord};

/// Distance between the centers of two adjacent unit squares.
pub const CENTER_SPACING: f32 = 1.0;

/// Nudge applied to world positions before line casts.
pub const EPSILON: Vec3 = Vec3::new(1e-6, 1e-6, 1e-6);

/// The four neighbor directions, clockwise starting from +Z.
pub const DIRECTIONS: [LatticeCoord; 4] = [
    LatticeCoord { x: 0, y: 1, z: 0 },  // North
    LatticeCoord { x: 1, y: 0, z: 0 },  // East
    LatticeCoord { x: 0, y: -1, z: 0 }, // South
    LatticeCoord { x: -1, y: 0, z: 0 }, // West
];

/// Corners of a unit square, clockwise from the northeast corner.
pub const VERTICES: [Vec3; 4] = [
    Vec3::new(0.5, 0.0, 0.5),
    Vec3::new(0.5, 0.0, -0.5),
    Vec3::new(-0.5, 0.0, -0.5),
    Vec3::new(-0.5, 0.0, 0.5),
];

/// Cell containing a world position.
pub fn world_to_lattice(position: Vec3, edge: f32) -> LatticeCoord {
    LatticeCoord::planar(
        (position.x / edge).round_ties_even() as i32,
        (position.z / edge).round_ties_even() as i32,
    )
}

/// World position of a cell's center.
pub fn lattice_to_world(coord: LatticeCoord, edge: f32) -> Vec3 {
    Vec3::new(coord.x as f32 * edge, 0.0, coord.y as f32 * edge)
}

/// Euclidean distance between lattice points.
pub fn distance(a: LatticeCoord, b: LatticeCoord) -> f32 {
    a.euclidean_distance(&b)
}

/// Cells whose squared distance from `origin` is at most `range²`.
///
/// A non-positive range yields just the origin and a non-finite one yields
/// nothing. The scan never leaves the [`MAX_AREA_RADIUS`](crate::MAX_AREA_RADIUS) box.
pub fn area(origin: LatticeCoord, range: f32) -> Vec<LatticeCoord> {
    if range <= 0.0 {
        return vec![origin];
    }
    let Some(border) = cell_radius(range.ceil()) else {
        return Vec::new();
    };
    let range_sq = range * range;
    let mut cells = Vec::new();
    for x in -border..=border {
        for y in -border..=border {
            let offset = LatticeCoord::planar(x, y);
            if offset.length_squared() as f32 <= range_sq {
                cells.push(origin + offset);
            }
        }
    }
    cells
}

/// Cells cleared by a bounded search reset: the `ceil(range)` box.
pub fn reset_region(origin: LatticeCoord, range: f32) -> Vec<LatticeCoord> {
    let Some(border) = cell_radius(range.ceil()) else {
        return Vec::new();
    };
    let side = (2 * border + 1) as usize;
    let mut cells = Vec::with_capacity(side * side);
    for x in -border..=border {
        for y in -border..=border {
            cells.push(origin + LatticeCoord::planar(x, y));
        }
    }
    cells
}

/// Neighbor index whose 90 degree sector contains `direction`.
pub fn neighbor_index_at_direction(direction: Vec3) -> usize {
    crate::topology::sector_index(VERTICES[3], direction, DIRECTIONS.len())
}

/// The other three `(cell, vertex)` pairs naming the corner `vertex` of `coord`.
pub fn vertex_aliases(coord: LatticeCoord, vertex: usize) -> [(LatticeCoord, usize); 3] {
    let n = DIRECTIONS.len();
    let a = DIRECTIONS[vertex % n];
    let b = DIRECTIONS[(vertex + 1) % n];
    [
        (coord + a, (vertex + 1) % n),
        (coord + b, (vertex + 3) % n),
        (coord + a + b, (vertex + 2) % n),
    ]
}
