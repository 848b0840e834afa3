//! Property tests for coordinate conversion, search and region labeling.

use std::collections::HashSet;

use glam::Vec3;
use proptest::prelude::*;
use tilegraph_map::{
    GridTopology, LatticeCoord, MapConfig, Pathfinder, Tile, TileGraph, TileMap, TileRecord,
};

/// A `width` x `height` square room; cells flagged in `blocked` are walls.
fn room(width: i32, height: i32, blocked: &[u8]) -> TileGraph {
    let mut records = Vec::new();
    let mut walls = HashSet::new();
    for y in 0..height {
        for x in 0..width {
            let coord = LatticeCoord::planar(x, y);
            let i = (y * width + x) as usize;
            if blocked.get(i).is_some_and(|b| *b < 3) {
                walls.insert(coord);
            }
            records.push(TileRecord::open(coord, "floor"));
        }
    }
    TileGraph::from_records(GridTopology::Square, records)
        .unwrap()
        .with_policy(move |t: &Tile| !walls.contains(&t.coord()))
}

fn hex_disc(radius: f32) -> TileGraph {
    let records = GridTopology::Hex
        .area(LatticeCoord::ORIGIN, radius)
        .into_iter()
        .map(|c| TileRecord::open(c, "floor"));
    TileGraph::from_records(GridTopology::Hex, records).unwrap()
}

fn room_strategy() -> impl Strategy<Value = (i32, i32, Vec<u8>)> {
    (2..8i32, 2..8i32, prop::collection::vec(0..10u8, 64))
}

proptest! {
    #[test]
    fn tile_center_is_stable(
        x in -500.0f32..500.0,
        z in -500.0f32..500.0,
        edge in 0.25f32..8.0,
    ) {
        for topology in [GridTopology::Hex, GridTopology::Square] {
            let position = Vec3::new(x, 0.0, z);
            let center = topology.tile_center(position, edge);
            let again = topology.tile_center(center, edge);
            prop_assert_eq!(center, again);
            prop_assert_eq!(
                topology.world_to_lattice(center, edge),
                topology.world_to_lattice(position, edge)
            );
        }
    }

    #[test]
    fn zero_range_reaches_only_origin(radius in 0u32..5, q in -4i32..=4, r in -4i32..=4) {
        let graph = hex_disc(radius as f32);
        let origin = LatticeCoord::cube(q, r);
        prop_assume!(graph.contains(origin));
        let reach = Pathfinder::default().reachable_set(&graph, origin, 0.0);
        prop_assert_eq!(reach.tiles.into_iter().collect::<Vec<_>>(), vec![origin]);
    }

    #[test]
    fn labels_partition_vacant_tiles((width, height, blocked) in room_strategy()) {
        let mut graph = room(width, height, &blocked);
        let pathfinder = Pathfinder::default();
        let labels = pathfinder.label_regions(&mut graph);

        let vacant: HashSet<LatticeCoord> =
            graph.tiles().filter(|t| graph.vacant(t)).map(Tile::coord).collect();
        let labeled: HashSet<LatticeCoord> =
            labels.iter().filter(|(_, l)| *l > 0).map(|(c, _)| c).collect();
        prop_assert_eq!(&labeled, &vacant);

        for label in 1..=labels.region_count() {
            let members: Vec<LatticeCoord> =
                labels.iter().filter(|(_, l)| *l == label).map(|(c, _)| c).collect();
            prop_assert!(!members.is_empty());
            let region = pathfinder.connected_region(&graph, members[0]);
            let flooded: HashSet<LatticeCoord> = region.tiles.into_iter().collect();
            prop_assert_eq!(flooded, members.into_iter().collect::<HashSet<_>>());
        }

        let again = pathfinder.label_regions(&mut graph);
        prop_assert_eq!(again, labels);
    }

    #[test]
    fn same_region_paths_connect((width, height, blocked) in room_strategy(), a in 0usize..64, b in 0usize..64) {
        let mut graph = room(width, height, &blocked);
        let pathfinder = Pathfinder::default();
        pathfinder.label_regions(&mut graph);

        let coords: Vec<LatticeCoord> = graph.coords().collect();
        let start = coords[a % coords.len()];
        let finish = coords[b % coords.len()];
        let (from, to) = (graph.tile(start).unwrap(), graph.tile(finish).unwrap());
        let same_region = from.region() == to.region();
        let finish_vacant = graph.vacant(to);

        let path = pathfinder.shortest_path(&graph, start, finish).into_path();
        if !same_region {
            prop_assert!(path.is_none());
        } else if finish_vacant {
            let path = path.unwrap_or_default();
            prop_assert!(!path.is_empty());
            prop_assert_eq!(path[0], start);
            prop_assert_eq!(*path.last().unwrap(), finish);
            for pair in path.windows(2) {
                prop_assert_eq!(graph.distance(pair[0], pair[1]), 1.0);
            }
        } else {
            prop_assert_eq!(path, Some(Vec::new()));
        }
    }

    #[test]
    fn trimmed_paths_are_prefixes(width in 2..8i32, height in 2..8i32, range in 0.0f32..10.0) {
        let records = GridTopology::Square.rectangle(height as u32, width as u32)
            .into_iter()
            .map(|c| TileRecord::open(c, "floor"));
        let map = TileMap::new(MapConfig::square(1.0), records).unwrap();
        let coords: Vec<LatticeCoord> = map.graph().coords().collect();
        let start = coords[0];
        let finish = coords[coords.len() - 1];

        let full = map.path(start, finish).into_path().unwrap_or_default();
        prop_assert!(!full.is_empty());
        let trimmed = map.path_within(start, finish, range).into_path().unwrap_or_default();
        prop_assert!(trimmed.len() <= full.len());
        prop_assert_eq!(&full[..trimmed.len()], &trimmed[..]);
        let cost: f32 = trimmed.windows(2).map(|p| map.tile_distance(p[0], p[1])).sum();
        prop_assert!(cost <= range);
    }
}
