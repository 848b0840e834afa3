//! Tile graph: tiles keyed by lattice coordinate with one-sided adjacency.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use tilegraph_topology::{GridTopology, LatticeCoord};

use crate::error::{Error, Result};
use crate::rules::{AnyTile, VacancyPolicy};
use crate::search::SearchContext;
use crate::tile::{Tile, TileRecord};

/// Tiles of one map together with the topology and the vacancy policy.
///
/// Iteration follows the order records were supplied in; region labeling
/// depends on it.
#[derive(Clone)]
pub struct TileGraph {
    topology: GridTopology,
    tiles: IndexMap<LatticeCoord, Tile>,
    policy: Arc<dyn VacancyPolicy>,
}

impl fmt::Debug for TileGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileGraph")
            .field("topology", &self.topology)
            .field("tiles", &self.tiles.len())
            .finish_non_exhaustive()
    }
}

impl TileGraph {
    /// Graph with no tiles that admits every tile type.
    pub fn new(topology: GridTopology) -> Self {
        Self {
            topology,
            tiles: IndexMap::new(),
            policy: Arc::new(AnyTile),
        }
    }

    /// Builds a graph from persisted records.
    ///
    /// Records with a coordinate already seen replace the earlier tile.
    pub fn from_records<I>(topology: GridTopology, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = TileRecord>,
    {
        let mut graph = Self::new(topology);
        for record in records {
            graph.insert(record)?;
        }
        debug!(topology = %topology, tiles = graph.len(), "built tile graph");
        Ok(graph)
    }

    /// Replaces the vacancy policy.
    pub fn with_policy(mut self, policy: impl VacancyPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn set_policy(&mut self, policy: impl VacancyPolicy + 'static) {
        self.policy = Arc::new(policy);
    }

    /// Adds or replaces a tile.
    pub fn insert(&mut self, record: TileRecord) -> Result<()> {
        let coord = self.topology.validate(record.coordinate)?;
        let sides = self.topology.side_count();
        if !record.side_heights.is_empty() && record.side_heights.len() != sides {
            return Err(Error::SideCountMismatch {
                coord,
                expected: sides,
                actual: record.side_heights.len(),
            });
        }
        if self.tiles.insert(coord, Tile::from_record(record, sides)).is_some() {
            debug!(%coord, "tile record replaced an earlier one");
        }
        Ok(())
    }

    pub fn topology(&self) -> GridTopology {
        self.topology
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, coord: LatticeCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    pub fn tile(&self, coord: LatticeCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    /// Tiles in persisted order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn coords(&self) -> impl Iterator<Item = LatticeCoord> + '_ {
        self.tiles.keys().copied()
    }

    /// Existing tiles adjacent to `coord`, in direction order.
    pub fn neighbors(&self, coord: LatticeCoord) -> impl Iterator<Item = &Tile> + '_ {
        self.topology
            .directions()
            .iter()
            .filter_map(move |d| self.tiles.get(&(coord + *d)))
    }

    /// Existing neighbors reachable through an open side of `coord`.
    ///
    /// Only the origin tile's sides are consulted, so adjacency may be
    /// one-way. A missing origin has no movable neighbors.
    pub fn movable_neighbors(&self, coord: LatticeCoord) -> impl Iterator<Item = &Tile> + '_ {
        let origin = self.tiles.get(&coord);
        self.topology
            .directions()
            .iter()
            .enumerate()
            .filter(move |(i, _)| origin.is_some_and(|t| t.side_open(*i)))
            .filter_map(move |(_, d)| self.tiles.get(&(coord + *d)))
    }

    /// Whether the tile passes the vacancy policy and carries no obstacle.
    pub fn vacant(&self, tile: &Tile) -> bool {
        tile.obstacles() == 0 && self.policy.is_met(tile)
    }

    /// [`vacant`](Self::vacant) by coordinate; missing tiles are never vacant.
    pub fn is_vacant(&self, coord: LatticeCoord) -> bool {
        self.tiles.get(&coord).is_some_and(|t| self.vacant(t))
    }

    /// Lattice distance under the graph's topology.
    pub fn distance(&self, a: LatticeCoord, b: LatticeCoord) -> f32 {
        self.topology.distance(a, b)
    }

    /// Clears search marks for every tile.
    pub fn reset(&self, ctx: &mut SearchContext) {
        ctx.clear();
        for coord in self.tiles.keys() {
            ctx.reset_marks(*coord);
        }
    }

    /// Clears search marks for tiles a search of `range` from `origin` can touch.
    ///
    /// Falls back to a full reset when the window holds more cells than the graph.
    pub fn reset_within(&self, ctx: &mut SearchContext, origin: LatticeCoord, range: f32) {
        let radius = f64::from(range.max(0.0).ceil());
        let window = match self.topology {
            GridTopology::Hex => 3.0 * radius * (radius + 1.0) + 1.0,
            GridTopology::Square => (2.0 * radius + 1.0).powi(2),
        };
        if window >= self.tiles.len() as f64 {
            self.reset(ctx);
            return;
        }
        ctx.clear();
        for coord in self.topology.reset_region(origin, range) {
            if self.tiles.contains_key(&coord) {
                ctx.reset_marks(coord);
            }
        }
    }

    /// Sets the obstruction height of one side of one tile.
    pub fn set_side(&mut self, coord: LatticeCoord, index: usize, height: f32) -> Result<()> {
        self.topology.direction_at(index)?;
        let tile = self.tiles.get_mut(&coord).ok_or(Error::MissingTile(coord))?;
        tile.set_side(index, height);
        Ok(())
    }

    /// Sets a shared edge: side `index` of `coord` and the facing side of its
    /// neighbor, when that neighbor exists.
    pub fn set_edge(&mut self, coord: LatticeCoord, index: usize, height: f32) -> Result<()> {
        let direction = self.topology.direction_at(index)?;
        self.set_side(coord, index, height)?;
        let neighbor = coord + direction;
        match self.tiles.get_mut(&neighbor) {
            Some(tile) => tile.set_side(self.topology.opposite_side(index), height),
            None => debug!(%coord, %neighbor, "edge faces the map boundary"),
        }
        Ok(())
    }

    /// Places an obstacle; returns the tile's new obstacle count.
    pub fn add_obstacle(&mut self, coord: LatticeCoord) -> Result<u32> {
        self.tiles
            .get_mut(&coord)
            .map(Tile::add_obstacle)
            .ok_or(Error::MissingTile(coord))
    }

    /// Removes an obstacle; the count never drops below zero.
    pub fn remove_obstacle(&mut self, coord: LatticeCoord) -> Result<u32> {
        self.tiles
            .get_mut(&coord)
            .map(Tile::remove_obstacle)
            .ok_or(Error::MissingTile(coord))
    }

    pub(crate) fn set_region(&mut self, coord: LatticeCoord, region: u32) {
        match self.tiles.get_mut(&coord) {
            Some(tile) => tile.set_region(region),
            None => warn!(%coord, "label for a missing tile dropped"),
        }
    }

    /// Persisted form of every tile, in order.
    pub fn records(&self) -> Vec<TileRecord> {
        self.tiles.values().map(Tile::to_record).collect()
    }
}
