//! Runtime topology selection.
//!
//! A map picks its topology once at construction; every geometric query then
//! goes through [`GridTopology`], which dispatches on a two-variant enum over
//! precomputed direction and vertex tables.

use glam::Vec3;

use crate::{hex, layout, square, Error, LatticeCoord, Result};

/// The adjacency and geometry rule set of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GridTopology {
    /// Flat-topped hexagons in cube coordinates (6 sides).
    #[default]
    Hex,
    /// Axis-aligned squares in planar coordinates (4 sides).
    Square,
}

impl GridTopology {
    /// Neighbor directions, clockwise from north. Side `i` faces direction `i`.
    pub const fn directions(self) -> &'static [LatticeCoord] {
        match self {
            Self::Hex => &hex::DIRECTIONS,
            Self::Square => &square::DIRECTIONS,
        }
    }

    /// Number of sides (and neighbors) per tile.
    pub const fn side_count(self) -> usize {
        self.directions().len()
    }

    /// Corners of the unit tile polygon, clockwise.
    pub const fn vertices(self) -> &'static [Vec3] {
        match self {
            Self::Hex => &hex::VERTICES,
            Self::Square => &square::VERTICES,
        }
    }

    /// Nudge applied to world positions before line casts.
    pub const fn epsilon(self) -> Vec3 {
        match self {
            Self::Hex => hex::EPSILON,
            Self::Square => square::EPSILON,
        }
    }

    /// Distance between adjacent tile centers for a unit edge.
    pub const fn center_spacing(self) -> f32 {
        match self {
            Self::Hex => hex::CENTER_SPACING,
            Self::Square => square::CENTER_SPACING,
        }
    }

    /// Whether `coord` is a well-formed address for this topology.
    pub fn validate(self, coord: LatticeCoord) -> Result<LatticeCoord> {
        match self {
            Self::Hex if !coord.is_cube() => Err(Error::InvalidHexCoord(coord)),
            Self::Square if coord.z != 0 => Err(Error::InvalidSquareCoord(coord)),
            _ => Ok(coord),
        }
    }

    /// Cell containing a world position.
    pub fn world_to_lattice(self, position: Vec3, edge: f32) -> LatticeCoord {
        match self {
            Self::Hex => hex::world_to_lattice(position, edge),
            Self::Square => square::world_to_lattice(position, edge),
        }
    }

    /// World position of a cell's center.
    pub fn lattice_to_world(self, coord: LatticeCoord, edge: f32) -> Vec3 {
        match self {
            Self::Hex => hex::lattice_to_world(coord, edge),
            Self::Square => square::lattice_to_world(coord, edge),
        }
    }

    /// Center of the cell containing `position`.
    pub fn tile_center(self, position: Vec3, edge: f32) -> Vec3 {
        self.lattice_to_world(self.world_to_lattice(position, edge), edge)
    }

    /// Inter-cell distance: cube metric for hex, Euclidean for square.
    pub fn distance(self, a: LatticeCoord, b: LatticeCoord) -> f32 {
        match self {
            Self::Hex => hex::distance(a, b),
            Self::Square => square::distance(a, b),
        }
    }

    /// Cells within `range` of `origin`.
    pub fn area(self, origin: LatticeCoord, range: f32) -> Vec<LatticeCoord> {
        match self {
            Self::Hex => hex::area(origin, range),
            Self::Square => square::area(origin, range),
        }
    }

    /// Superset of [`area`](Self::area) cleared before a bounded search.
    pub fn reset_region(self, origin: LatticeCoord, range: f32) -> Vec<LatticeCoord> {
        match self {
            Self::Hex => hex::reset_region(origin, range),
            Self::Square => square::reset_region(origin, range),
        }
    }

    /// Discrete neighbor index for a continuous world-space direction.
    pub fn neighbor_index_at_direction(self, direction: Vec3) -> usize {
        match self {
            Self::Hex => hex::neighbor_index_at_direction(direction),
            Self::Square => square::neighbor_index_at_direction(direction),
        }
    }

    /// Direction vector for side `index`.
    pub fn direction_at(self, index: usize) -> Result<LatticeCoord> {
        self.directions()
            .get(index)
            .copied()
            .ok_or(Error::DirectionIndexOutOfRange {
                index,
                sides: self.side_count(),
            })
    }

    /// Side index of a unit direction vector.
    pub fn index_of_direction(self, direction: LatticeCoord) -> Result<usize> {
        self.directions()
            .iter()
            .position(|d| *d == direction)
            .ok_or(Error::NotANeighborDirection(direction))
    }

    /// Side facing back along side `index`.
    pub const fn opposite_side(self, index: usize) -> usize {
        let n = self.side_count();
        (index + n / 2) % n
    }

    /// Vertex at the left end of side `index` (seen from inside the tile).
    pub const fn left_vertex(self, index: usize) -> usize {
        let n = self.side_count();
        (index + n - 1) % n
    }

    /// Vertex at the right end of side `index`.
    pub const fn right_vertex(self, index: usize) -> usize {
        index % self.side_count()
    }

    /// After stepping along side `index`, the direction one step clockwise
    /// from the way back.
    pub const fn turn_left_index(self, index: usize) -> usize {
        (self.opposite_side(index) + 1) % self.side_count()
    }

    /// After stepping along side `index`, the direction one step
    /// counter-clockwise from the way back.
    pub const fn turn_right_index(self, index: usize) -> usize {
        let n = self.side_count();
        (self.opposite_side(index) + n - 1) % n
    }

    /// [`turn_left_index`](Self::turn_left_index) on direction vectors.
    pub fn turn_left(self, direction: LatticeCoord) -> Result<LatticeCoord> {
        let index = self.index_of_direction(direction)?;
        self.direction_at(self.turn_left_index(index))
    }

    /// [`turn_right_index`](Self::turn_right_index) on direction vectors.
    pub fn turn_right(self, direction: LatticeCoord) -> Result<LatticeCoord> {
        let index = self.index_of_direction(direction)?;
        self.direction_at(self.turn_right_index(index))
    }

    /// Other `(cell, vertex)` pairs naming the same polygon corner.
    pub fn vertex_aliases(self, coord: LatticeCoord, vertex: usize) -> Vec<(LatticeCoord, usize)> {
        match self {
            Self::Hex => hex::vertex_aliases(coord, vertex).to_vec(),
            Self::Square => square::vertex_aliases(coord, vertex).to_vec(),
        }
    }

    /// World position of corner `vertex` of `coord`.
    pub fn vertex_position(self, coord: LatticeCoord, vertex: usize, edge: f32) -> Vec3 {
        let corners = self.vertices();
        self.lattice_to_world(coord, edge) + corners[vertex % corners.len()] * edge
    }

    /// Coordinate that is maximal on this topology's "north" axis, ties broken
    /// on the remaining axes. Used to pick a boundary-walk start cell.
    pub fn northmost<'a, I>(self, cells: I) -> Option<LatticeCoord>
    where
        I: IntoIterator<Item = &'a LatticeCoord>,
    {
        let key = |c: &LatticeCoord| match self {
            // North in cube space is the direction of decreasing z.
            Self::Hex => (-c.z, c.x, c.y),
            Self::Square => (c.y, c.x, c.z),
        };
        cells.into_iter().copied().max_by_key(key)
    }

    /// A `rows` x `columns` block of cells centred on the origin.
    pub fn rectangle(self, rows: u32, columns: u32) -> Vec<LatticeCoord> {
        layout::rectangle(self, rows, columns)
    }
}

impl std::fmt::Display for GridTopology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hex => f.write_str("hex"),
            Self::Square => f.write_str("square"),
        }
    }
}

/// Sector of `direction` measured clockwise (in the XZ plane) from `reference`,
/// for `sectors` equal slices of the full turn.
pub(crate) fn sector_index(reference: Vec3, direction: Vec3, sectors: usize) -> usize {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() <= f32::EPSILON {
        return 0;
    }
    let mut angle = reference.angle_between(flat).to_degrees();
    if reference.cross(flat).y < 0.0 {
        angle = 360.0 - angle;
    }
    let width = 360.0 / sectors as f32;
    ((angle / width).floor() as usize) % sectors
}
