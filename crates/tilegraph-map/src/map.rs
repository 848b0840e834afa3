//! World-space facade over a tile graph.
//!
//! [`TileMap`] binds a topology and edge length to a [`TileGraph`] and
//! answers queries in world positions, converting at the boundary and
//! delegating to the [`Pathfinder`] and [`trace_border`].

use glam::Vec3;
use indexmap::IndexSet;
use tracing::{debug, info};

use tilegraph_topology::{GridTopology, LatticeCoord};

use crate::border::{trace_border, Border};
use crate::config::{MapConfig, MapDocument};
use crate::error::Result;
use crate::graph::TileGraph;
use crate::pathfinder::{PathOutcome, Pathfinder, RegionLabels};
use crate::rules::{PresetRules, VacancyPolicy};
use crate::search::Traversal;
use crate::tile::{Tile, TileRecord};

/// Segments shorter than this sample a single point.
const MIN_CAST_LENGTH: f32 = 0.001;

/// Upper bound on samples taken by one cast.
const MAX_CAST_SAMPLES: f32 = 100_000.0;

/// A tile graph placed in world space.
#[derive(Debug, Clone)]
pub struct TileMap {
    config: MapConfig,
    graph: TileGraph,
    pathfinder: Pathfinder,
}

impl TileMap {
    /// Map admitting every tile type; obstacles still block.
    pub fn new<I>(config: MapConfig, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = TileRecord>,
    {
        config.validate()?;
        let graph = TileGraph::from_records(config.topology, records)?;
        let pathfinder = Pathfinder::new(config.flood_budget, config.reach_budget);
        Ok(Self {
            config,
            graph,
            pathfinder,
        })
    }

    /// Map whose vacancy follows the document's preset rules.
    pub fn from_document(document: MapDocument) -> Result<Self> {
        let policy = PresetRules::new(document.presets, document.rules);
        let map = Self::new(document.config, document.tiles)?.with_policy(policy);
        info!(
            topology = %map.topology(),
            tiles = map.graph.len(),
            "map loaded"
        );
        Ok(map)
    }

    pub fn with_policy(mut self, policy: impl VacancyPolicy + 'static) -> Self {
        self.graph.set_policy(policy);
        self
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn topology(&self) -> GridTopology {
        self.config.topology
    }

    pub fn edge(&self) -> f32 {
        self.config.edge
    }

    pub fn graph(&self) -> &TileGraph {
        &self.graph
    }

    /// Mutable graph access for obstruction and obstacle edits.
    pub fn graph_mut(&mut self) -> &mut TileGraph {
        &mut self.graph
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    /// Persisted records, including the current region labels.
    pub fn records(&self) -> Vec<TileRecord> {
        self.graph.records()
    }

    // --- Coordinates ---

    pub fn lattice_at(&self, position: Vec3) -> LatticeCoord {
        self.topology().world_to_lattice(position, self.edge())
    }

    /// Tile containing a world position.
    pub fn tile_at(&self, position: Vec3) -> Option<&Tile> {
        self.graph.tile(self.lattice_at(position))
    }

    pub fn tile(&self, coord: LatticeCoord) -> Option<&Tile> {
        self.graph.tile(coord)
    }

    /// World position of a tile center.
    pub fn world_position(&self, coord: LatticeCoord) -> Vec3 {
        self.topology().lattice_to_world(coord, self.edge())
    }

    /// Center of the cell containing `position`.
    pub fn tile_center(&self, position: Vec3) -> Vec3 {
        self.topology().tile_center(position, self.edge())
    }

    /// Scales `direction` to the distance between adjacent tile centers.
    pub fn normalize(&self, direction: Vec3) -> Vec3 {
        direction.normalize_or_zero() * self.edge() * self.topology().center_spacing()
    }

    pub fn tile_distance(&self, a: LatticeCoord, b: LatticeCoord) -> f32 {
        self.graph.distance(a, b)
    }

    /// Lattice distance between the cells containing two positions.
    pub fn distance_between(&self, a: Vec3, b: Vec3) -> f32 {
        self.tile_distance(self.lattice_at(a), self.lattice_at(b))
    }

    /// Whether both positions fall on the same existing tile.
    pub fn is_same_tile(&self, a: Vec3, b: Vec3) -> bool {
        match (self.tile_at(a), self.tile_at(b)) {
            (Some(x), Some(y)) => x.coord() == y.coord(),
            _ => false,
        }
    }

    /// Cells in world space within `range` of the cell containing `position`.
    /// Cells without tiles are included; a non-finite range yields none.
    pub fn area(&self, position: Vec3, range: f32) -> Vec<Vec3> {
        self.topology()
            .area(self.lattice_at(position), range)
            .into_iter()
            .map(|c| self.world_position(c))
            .collect()
    }

    // --- Line casts ---

    /// Points spaced one cell apart from `start` toward `finish`, `count + 1` in all.
    fn samples(&self, start: Vec3, finish: Vec3, count: f32) -> impl Iterator<Item = Vec3> {
        let length = self.distance_between(start, finish);
        let step = if length < MIN_CAST_LENGTH {
            Vec3::ZERO
        } else {
            (finish - start) / length
        };
        let count = count.clamp(0.0, MAX_CAST_SAMPLES).floor() as usize;
        (0..=count).map(move |i| start + step * i as f32)
    }

    /// Tile reached by walking from `start` toward `finish` until `range` runs out.
    ///
    /// Returns `None` when the last sample inside range falls off the map.
    pub fn line_cast(&self, start: Vec3, finish: Vec3, range: f32) -> Option<LatticeCoord> {
        let eps = self.topology().epsilon();
        let (start, finish) = (start + eps, finish + eps);
        let mut reached = None;
        for point in self.samples(start, finish, self.distance_between(start, finish)) {
            let tile = self.tile_at(point);
            if let Some(tile) = tile {
                if self.distance_between(start, self.world_position(tile.coord())) > range {
                    break;
                }
            }
            reached = tile.map(Tile::coord);
        }
        reached
    }

    /// Tiles along the ray from `start` through `finish` while `condition`
    /// holds, out to at least `range` cells.
    ///
    /// The first tile failing `condition` ends the cast and is kept only if
    /// `include_last` accepts it.
    pub fn line_cast_while<C, L>(
        &self,
        start: Vec3,
        finish: Vec3,
        range: f32,
        condition: C,
        include_last: L,
    ) -> Vec<LatticeCoord>
    where
        C: Fn(&Tile) -> bool,
        L: Fn(&Tile) -> bool,
    {
        let eps = self.topology().epsilon();
        let start = self.tile_center(start + eps) + eps;
        let finish = self.tile_center(finish + eps) + eps;
        let count = self.distance_between(start, finish).max(range);

        let mut tiles: Vec<LatticeCoord> = Vec::new();
        for point in self.samples(start, finish, count) {
            let Some(tile) = self.tile_at(point) else {
                continue;
            };
            if self.distance_between(start, self.world_position(tile.coord())) > range {
                break;
            }
            if !condition(tile) {
                if include_last(tile) {
                    tiles.push(tile.coord());
                }
                break;
            }
            if tiles.last() != Some(&tile.coord()) {
                tiles.push(tile.coord());
            }
        }
        tiles
    }

    /// Distinct existing tiles sampled along the segment `a`-`b`.
    pub fn line_tile_positions(&self, a: Vec3, b: Vec3) -> IndexSet<LatticeCoord> {
        let eps = self.topology().epsilon();
        let (a, b) = (a + eps, b + eps);
        self.samples(a, b, self.distance_between(a, b))
            .filter_map(|p| self.tile_at(p).map(Tile::coord))
            .collect()
    }

    /// Neighbor of `coord` meeting `condition` with the smallest `order_by` key.
    /// Ties keep direction order.
    pub fn nearest_neighbor<C, O>(
        &self,
        coord: LatticeCoord,
        condition: C,
        order_by: O,
    ) -> Option<LatticeCoord>
    where
        C: Fn(&Tile) -> bool,
        O: Fn(&Tile) -> f32,
    {
        let mut best: Option<(f32, LatticeCoord)> = None;
        for tile in self.graph.neighbors(coord).filter(|t| condition(*t)) {
            let key = order_by(tile);
            if best.map_or(true, |(k, _)| key < k) {
                best = Some((key, tile.coord()));
            }
        }
        best.map(|(_, c)| c)
    }

    // --- Search ---

    pub fn path(&self, start: LatticeCoord, finish: LatticeCoord) -> PathOutcome {
        self.pathfinder.shortest_path(&self.graph, start, finish)
    }

    pub fn path_within(&self, start: LatticeCoord, finish: LatticeCoord, range: f32) -> PathOutcome {
        self.pathfinder
            .shortest_path_within(&self.graph, start, finish, range)
    }

    /// Range-trimmed path between the tiles under two positions; empty when
    /// there is none.
    pub fn path_tiles(&self, from: Vec3, to: Vec3, range: f32) -> Vec<LatticeCoord> {
        let (start, finish) = (self.lattice_at(from), self.lattice_at(to));
        let path = self.path_within(start, finish, range).into_path();
        if path.is_none() {
            debug!(%start, %finish, "no path");
        }
        path.unwrap_or_default()
    }

    /// [`path_tiles`](Self::path_tiles) as tile-center positions.
    pub fn path_points(&self, from: Vec3, to: Vec3, range: f32) -> Vec<Vec3> {
        self.path_tiles(from, to, range)
            .into_iter()
            .map(|c| self.world_position(c))
            .collect()
    }

    /// Vacant tiles within `range` path distance of `origin`.
    pub fn walkable_tiles(&self, origin: LatticeCoord, range: f32) -> Traversal {
        self.pathfinder.reachable_set(&self.graph, origin, range)
    }

    pub fn connected_region(&self, origin: LatticeCoord) -> Traversal {
        self.pathfinder.connected_region(&self.graph, origin)
    }

    /// Boundary corners of an arbitrary tile set.
    pub fn border(&self, inside: &IndexSet<LatticeCoord>) -> Border {
        trace_border(self.topology(), inside, self.config.border_budget)
    }

    /// Boundary of the tiles walkable from `origin` within `range`.
    pub fn walkable_border(&self, origin: LatticeCoord, range: f32) -> Border {
        self.border(&self.walkable_tiles(origin, range).tiles)
    }

    /// Boundary of the connected region containing `origin`.
    pub fn region_border(&self, origin: LatticeCoord) -> Border {
        self.border(&self.connected_region(origin).tiles)
    }

    /// World-space polyline of a border.
    pub fn border_positions(&self, border: &Border) -> Vec<Vec3> {
        border.positions(self.topology(), self.edge())
    }

    /// Recomputes and stores region labels for every tile.
    pub fn label_regions(&mut self) -> RegionLabels {
        self.pathfinder.label_regions(&mut self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_map(width: i32, height: i32) -> TileMap {
        let mut records = Vec::new();
        for y in 0..height {
            for x in 0..width {
                records.push(TileRecord::open(LatticeCoord::planar(x, y), "floor"));
            }
        }
        TileMap::new(MapConfig::square(2.0), records).unwrap()
    }

    fn hex_map(radius: f32) -> TileMap {
        let records = GridTopology::Hex
            .area(LatticeCoord::ORIGIN, radius)
            .into_iter()
            .map(|c| TileRecord::open(c, "floor"));
        TileMap::new(MapConfig::hex(1.0), records).unwrap()
    }

    #[test]
    fn tile_lookup_by_position() {
        let map = square_map(3, 3);
        let tile = map.tile_at(Vec3::new(2.3, 0.0, 3.9)).unwrap();
        assert_eq!(tile.coord(), LatticeCoord::planar(1, 2));
        assert!(map.tile_at(Vec3::new(-5.0, 0.0, 0.0)).is_none());
        assert_eq!(map.world_position(LatticeCoord::planar(1, 2)), Vec3::new(2.0, 0.0, 4.0));
        assert_eq!(map.tile_center(Vec3::new(2.3, 0.0, 3.9)), Vec3::new(2.0, 0.0, 4.0));
    }

    #[test]
    fn same_tile_needs_a_tile() {
        let map = square_map(2, 2);
        assert!(map.is_same_tile(Vec3::new(0.1, 0.0, 0.2), Vec3::new(-0.3, 0.0, 0.4)));
        assert!(!map.is_same_tile(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)));
        let off = Vec3::new(-10.0, 0.0, 0.0);
        assert!(!map.is_same_tile(off, off));
    }

    #[test]
    fn normalize_spans_one_tile() {
        let hex = hex_map(1.0);
        let step = hex.normalize(Vec3::new(0.0, 0.0, 5.0));
        assert!((step.length() - 3f32.sqrt()).abs() < 1e-5);
        let square = square_map(1, 1);
        assert_eq!(square.normalize(Vec3::new(3.0, 0.0, 0.0)), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(square.normalize(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn distances_follow_topology() {
        let square = square_map(5, 5);
        assert_eq!(
            square.distance_between(Vec3::ZERO, Vec3::new(6.0, 0.0, 8.0)),
            5.0
        );
        let hex = hex_map(3.0);
        assert_eq!(
            hex.tile_distance(LatticeCoord::ORIGIN, LatticeCoord::cube(2, -1)),
            2.0
        );
    }

    #[test]
    fn area_includes_empty_cells() {
        let map = square_map(1, 1);
        let cells = map.area(Vec3::ZERO, 1.0);
        assert_eq!(cells.len(), 5);
        assert!(cells.contains(&Vec3::new(-2.0, 0.0, 0.0)));
    }

    #[test]
    fn unbounded_area_is_empty() {
        assert!(hex_map(2.0).area(Vec3::ZERO, f32::INFINITY).is_empty());
        assert!(square_map(3, 3).area(Vec3::ZERO, f32::INFINITY).is_empty());
    }

    #[test]
    fn line_cast_stops_at_range() {
        let map = square_map(10, 1);
        let end = Vec3::new(18.0, 0.0, 0.0);
        assert_eq!(map.line_cast(Vec3::ZERO, end, 3.0), Some(LatticeCoord::planar(3, 0)));
        assert_eq!(map.line_cast(Vec3::ZERO, end, 100.0), Some(LatticeCoord::planar(9, 0)));
    }

    #[test]
    fn line_cast_off_the_map() {
        let map = square_map(3, 1);
        assert_eq!(map.line_cast(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 100.0), None);
    }

    #[test]
    fn line_tiles_along_a_row() {
        let map = square_map(6, 2);
        let tiles = map.line_tile_positions(Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0));
        let expected: IndexSet<_> = (0..=4).map(|x| LatticeCoord::planar(x, 0)).collect();
        assert_eq!(tiles, expected);
    }

    #[test]
    fn cast_while_condition_holds() {
        let map = square_map(8, 1);
        let wall = LatticeCoord::planar(4, 0);
        let open = |t: &Tile| t.coord() != wall;

        let kept = map.line_cast_while(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 10.0, open, |_| true);
        assert_eq!(kept.last(), Some(&wall));
        assert_eq!(kept.len(), 5);

        let dropped = map.line_cast_while(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 10.0, open, |_| false);
        assert_eq!(dropped.len(), 4);

        let short = map.line_cast_while(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 2.0, |_| true, |_| true);
        assert_eq!(
            short,
            vec![
                LatticeCoord::planar(0, 0),
                LatticeCoord::planar(1, 0),
                LatticeCoord::planar(2, 0)
            ]
        );
    }

    #[test]
    fn nearest_neighbor_by_key() {
        let map = hex_map(1.0);
        let target = map.world_position(LatticeCoord::cube(1, 0));
        let nearest = map.nearest_neighbor(
            LatticeCoord::ORIGIN,
            |_| true,
            |t| map.world_position(t.coord()).distance(target + Vec3::new(0.0, 0.0, 0.1)),
        );
        assert_eq!(nearest, Some(LatticeCoord::cube(1, 0)));
        assert_eq!(map.nearest_neighbor(LatticeCoord::ORIGIN, |_| false, |_| 0.0), None);
    }

    #[test]
    fn world_path() {
        let map = square_map(4, 1);
        let points = map.path_points(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), f32::INFINITY);
        assert_eq!(points.len(), 4);
        assert_eq!(points[3], Vec3::new(6.0, 0.0, 0.0));

        let trimmed = map.path_tiles(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), 1.0);
        assert_eq!(trimmed.len(), 2);

        assert!(map.path_tiles(Vec3::ZERO, Vec3::new(40.0, 0.0, 0.0), 5.0).is_empty());
    }

    #[test]
    fn borders_in_world_space() {
        let map = hex_map(2.0);
        let border = map.walkable_border(LatticeCoord::ORIGIN, 0.0);
        assert_eq!(border.len(), 6);
        for corner in map.border_positions(&border) {
            assert!((corner.length() - 1.0).abs() < 1e-5);
            assert_eq!(corner.y, 0.0);
        }
        assert_eq!(map.region_border(LatticeCoord::ORIGIN).len(), 30);
    }

    #[test]
    fn labels_and_obstacles() {
        let mut map = square_map(3, 1);
        map.graph_mut().add_obstacle(LatticeCoord::planar(1, 0)).unwrap();
        let labels = map.label_regions();
        assert_eq!(labels.region_count(), 2);
        assert_eq!(map.records()[1].region, 0);
        assert!(map
            .path_tiles(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), 10.0)
            .is_empty());
    }
}
