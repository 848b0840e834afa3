//! Hexagonal geometry in cube coordinates.
//!
//! Tiles are flat-topped hexagons lying in the XZ plane. A cube coordinate
//! `(x, y, z)` always satisfies `x + y + z = 0`; world space is derived from
//! the first two axes with a fixed linear basis scaled by the edge length.

use glam::Vec3;

use crate::{cell_radius, LatticeCoord};

/// Square root of 3.
pub const SQRT_3: f32 = 1.732_050_8;

/// Cosine of 30 degrees.
pub const COS_30: f32 = SQRT_3 / 2.0;

/// Cosine of 60 degrees.
pub const COS_60: f32 = 0.5;

/// Distance between the centers of two adjacent unit hexes.
pub const CENTER_SPACING: f32 = SQRT_3;

/// Nudge applied to world positions before line casts, so a cast running
/// exactly along an edge resolves to the same side every time.
pub const EPSILON: Vec3 = Vec3::new(1e-6, 2e-6, -3e-6);

/// The six neighbor directions, clockwise starting from +Z.
pub const DIRECTIONS: [LatticeCoord; 6] = [
    LatticeCoord { x: 0, y: 1, z: -1 },  // North
    LatticeCoord { x: 1, y: 0, z: -1 },  // Northeast
    LatticeCoord { x: 1, y: -1, z: 0 },  // Southeast
    LatticeCoord { x: 0, y: -1, z: 1 },  // South
    LatticeCoord { x: -1, y: 0, z: 1 },  // Southwest
    LatticeCoord { x: -1, y: 1, z: 0 },  // Northwest
];

/// Corners of a unit hex, clockwise. Vertex `i` sits between side `i` and
/// side `i + 1`.
pub const VERTICES: [Vec3; 6] = [
    Vec3::new(COS_60, 0.0, COS_30),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(COS_60, 0.0, -COS_30),
    Vec3::new(-COS_60, 0.0, -COS_30),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(-COS_60, 0.0, COS_30),
];

// Lattice -> world basis.
const TO_WORLD_XX: f32 = 1.5;
const TO_WORLD_ZX: f32 = COS_30;
const TO_WORLD_ZY: f32 = SQRT_3;

// World -> fractional lattice basis.
const TO_CUBE_XX: f32 = 2.0 / 3.0;
const TO_CUBE_YX: f32 = -1.0 / 3.0;
const TO_CUBE_YZ: f32 = SQRT_3 / 3.0;

/// Project a world position into fractional cube space.
pub fn fractional(position: Vec3, edge: f32) -> Vec3 {
    let x = TO_CUBE_XX * position.x / edge;
    let y = (TO_CUBE_YX * position.x + TO_CUBE_YZ * position.z) / edge;
    Vec3::new(x, y, -x - y)
}

/// Round a fractional cube position to the nearest cell.
///
/// The axis with the largest rounding error is recomputed from the other two,
/// so the result satisfies the cube constraint exactly.
pub fn round(fractional: Vec3) -> LatticeCoord {
    let mut x = fractional.x.round_ties_even();
    let mut y = fractional.y.round_ties_even();
    let mut z = fractional.z.round_ties_even();

    let dx = (x - fractional.x).abs();
    let dy = (y - fractional.y).abs();
    let dz = (z - fractional.z).abs();

    if dx > dy && dx > dz {
        x = -y - z;
    } else if dy > dz {
        y = -x - z;
    } else {
        z = -x - y;
    }
    LatticeCoord::new(x as i32, y as i32, z as i32)
}

/// Cell containing a world position.
pub fn world_to_lattice(position: Vec3, edge: f32) -> LatticeCoord {
    round(fractional(position, edge))
}

/// World position of a cell's center.
pub fn lattice_to_world(coord: LatticeCoord, edge: f32) -> Vec3 {
    let x = TO_WORLD_XX * coord.x as f32 * edge;
    let z = (TO_WORLD_ZX * coord.x as f32 + TO_WORLD_ZY * coord.y as f32) * edge;
    Vec3::new(x, 0.0, z)
}

/// Cube (Chebyshev) distance in cells.
pub fn distance(a: LatticeCoord, b: LatticeCoord) -> f32 {
    a.chebyshev_distance(&b) as f32
}

/// All cells within `floor(range)` steps of `origin`, up to
/// [`MAX_AREA_RADIUS`](crate::MAX_AREA_RADIUS). Negative and non-finite
/// ranges are empty.
pub fn area(origin: LatticeCoord, range: f32) -> Vec<LatticeCoord> {
    if range < 0.0 {
        return Vec::new();
    }
    match cell_radius(range.floor()) {
        Some(radius) => diamond(origin, radius),
        None => Vec::new(),
    }
}

/// Cells cleared by a bounded search reset: the `ceil(range)` diamond.
pub fn reset_region(origin: LatticeCoord, range: f32) -> Vec<LatticeCoord> {
    match cell_radius(range.ceil()) {
        Some(radius) => diamond(origin, radius),
        None => Vec::new(),
    }
}

fn diamond(origin: LatticeCoord, radius: i32) -> Vec<LatticeCoord> {
    let r = i64::from(radius);
    let mut cells = Vec::with_capacity((3 * r * (r + 1) + 1) as usize);
    for x in -radius..=radius {
        let y_min = (-radius).max(-x - radius);
        let y_max = radius.min(-x + radius);
        for y in y_min..=y_max {
            cells.push(origin + LatticeCoord::cube(x, y));
        }
    }
    cells
}

/// Neighbor index whose 60 degree sector contains `direction`.
///
/// Sectors are measured clockwise from the northwest corner, so sector `i`
/// is the one facing side `i`. Only the XZ components are used.
pub fn neighbor_index_at_direction(direction: Vec3) -> usize {
    crate::topology::sector_index(VERTICES[5], direction, DIRECTIONS.len())
}

/// The other two `(cell, vertex)` pairs naming the corner `vertex` of `coord`.
pub fn vertex_aliases(coord: LatticeCoord, vertex: usize) -> [(LatticeCoord, usize); 2] {
    let n = DIRECTIONS.len();
    [
        (coord + DIRECTIONS[vertex % n], (vertex + 2) % n),
        (coord + DIRECTIONS[(vertex + 1) % n], (vertex + 4) % n),
    ]
}
