//! Wall-following boundary trace around a set of tiles.

use glam::Vec3;
use indexmap::IndexSet;
use serde::Serialize;
use tracing::{error, trace};

use tilegraph_topology::{GridTopology, LatticeCoord};

use crate::search::Completion;

/// Default step budget for a border walk.
pub const DEFAULT_BORDER_BUDGET: usize = 10_000;

/// A corner of a tile: vertex `vertex` of `tile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BorderPoint {
    pub tile: LatticeCoord,
    pub vertex: usize,
}

impl BorderPoint {
    pub fn new(tile: LatticeCoord, vertex: usize) -> Self {
        Self { tile, vertex }
    }

    pub fn position(&self, topology: GridTopology, edge: f32) -> Vec3 {
        topology.vertex_position(self.tile, self.vertex, edge)
    }
}

/// Corners along a region's outer boundary, in walk order.
///
/// Each physical corner appears once, named by the smallest inside tile
/// that owns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Border {
    pub points: IndexSet<BorderPoint>,
    pub completion: Completion,
}

impl Border {
    fn empty() -> Self {
        Self {
            points: IndexSet::new(),
            completion: Completion::Complete,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// World positions of the corners.
    pub fn positions(&self, topology: GridTopology, edge: f32) -> Vec<Vec3> {
        self.points
            .iter()
            .map(|p| p.position(topology, edge))
            .collect()
    }
}

/// Walks the outer boundary of `inside`, keeping it on the right-hand side.
///
/// The walk starts at the northmost inside tile facing its first outside
/// neighbor and stops on returning to that tile and heading. When `budget`
/// steps pass first, the points found so far are returned.
pub fn trace_border(
    topology: GridTopology,
    inside: &IndexSet<LatticeCoord>,
    budget: usize,
) -> Border {
    let Some(start) = topology.northmost(inside) else {
        return Border::empty();
    };
    let directions = topology.directions();
    let Some(finish) = (0..directions.len()).find(|i| !inside.contains(&(start + directions[*i])))
    else {
        return Border::empty();
    };

    let mut points = IndexSet::new();
    let mut emit = |tile: LatticeCoord, vertex: usize| {
        points.insert(canonical(topology, inside, tile, vertex));
    };
    emit(start, topology.left_vertex(finish));
    emit(start, topology.right_vertex(finish));

    let mut heading = finish;
    let mut previous = start;
    let mut current = start + directions[heading];
    let mut steps = 0;
    let completion = loop {
        if steps >= budget {
            error!(%start, steps, "border walk exceeded its step budget");
            break Completion::BudgetExceeded { budget };
        }
        steps += 1;

        let left = topology.left_vertex(heading);
        let right = topology.right_vertex(heading);
        let was_inside = inside.contains(&previous);
        let is_inside = inside.contains(&current);

        heading = if is_inside {
            topology.turn_left_index(heading)
        } else {
            topology.turn_right_index(heading)
        };
        if !was_inside && is_inside {
            emit(previous, left);
        }
        if was_inside && !is_inside {
            emit(previous, right);
        }

        previous = current;
        current = current + directions[heading];
        if previous == start && heading == finish {
            break Completion::Complete;
        }
    };

    trace!(%start, steps, points = points.len(), "border traced");
    Border { points, completion }
}

/// Name of a corner shared by up to three (hex) or four (square) tiles,
/// chosen among the tiles inside the region.
fn canonical(
    topology: GridTopology,
    inside: &IndexSet<LatticeCoord>,
    tile: LatticeCoord,
    vertex: usize,
) -> BorderPoint {
    let own = BorderPoint::new(tile, vertex);
    topology
        .vertex_aliases(tile, vertex)
        .into_iter()
        .map(|(t, v)| BorderPoint::new(t, v))
        .chain(std::iter::once(own))
        .filter(|p| inside.contains(&p.tile))
        .min()
        .unwrap_or(own)
}
