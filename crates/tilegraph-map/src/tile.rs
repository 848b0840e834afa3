//! Tile records and live tile state.

use serde::{Deserialize, Serialize};
use tilegraph_topology::LatticeCoord;

/// Persisted shape of a tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Lattice address
    pub coordinate: LatticeCoord,
    /// Opaque preset/type identifier
    pub preset_id: String,
    /// Per-side obstruction heights; empty means all sides open
    #[serde(default)]
    pub side_heights: Vec<f32>,
    /// Connectivity region from the last labeling pass (0 = not vacant)
    #[serde(default)]
    pub region: u32,
}

impl TileRecord {
    /// Record with every side open.
    pub fn open(coordinate: LatticeCoord, preset_id: impl Into<String>) -> Self {
        Self {
            coordinate,
            preset_id: preset_id.into(),
            side_heights: Vec::new(),
            region: 0,
        }
    }
}

/// A tile as held by the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    coord: LatticeCoord,
    preset_id: String,
    side_heights: Vec<f32>,
    region: u32,
    obstacles: u32,
}

impl Tile {
    pub(crate) fn from_record(record: TileRecord, sides: usize) -> Self {
        let side_heights = if record.side_heights.is_empty() {
            vec![0.0; sides]
        } else {
            record.side_heights
        };
        Self {
            coord: record.coordinate,
            preset_id: record.preset_id,
            side_heights,
            region: record.region,
            obstacles: 0,
        }
    }

    /// Lattice address.
    pub fn coord(&self) -> LatticeCoord {
        self.coord
    }

    /// Preset identifier.
    pub fn preset_id(&self) -> &str {
        &self.preset_id
    }

    /// Obstruction height on every side, indexed like the topology's directions.
    pub fn side_heights(&self) -> &[f32] {
        &self.side_heights
    }

    /// Whether movement out of this tile through side `index` is allowed.
    ///
    /// Only this tile's own side counts; the neighbor's facing side is not consulted.
    pub fn side_open(&self, index: usize) -> bool {
        self.side_heights.get(index).is_some_and(|h| *h <= 0.0)
    }

    /// Region label from the last labeling pass.
    pub fn region(&self) -> u32 {
        self.region
    }

    /// Number of obstacles standing on the tile.
    pub fn obstacles(&self) -> u32 {
        self.obstacles
    }

    pub(crate) fn set_side(&mut self, index: usize, height: f32) {
        if let Some(side) = self.side_heights.get_mut(index) {
            *side = height;
        }
    }

    pub(crate) fn set_region(&mut self, region: u32) {
        self.region = region;
    }

    pub(crate) fn add_obstacle(&mut self) -> u32 {
        self.obstacles += 1;
        self.obstacles
    }

    pub(crate) fn remove_obstacle(&mut self) -> u32 {
        self.obstacles = self.obstacles.saturating_sub(1);
        self.obstacles
    }

    /// Persisted form of the tile, including its current label.
    pub fn to_record(&self) -> TileRecord {
        TileRecord {
            coordinate: self.coord,
            preset_id: self.preset_id.clone(),
            side_heights: self.side_heights.clone(),
            region: self.region,
        }
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] region {}", self.coord, self.preset_id, self.region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sides_become_open() {
        let tile = Tile::from_record(TileRecord::open(LatticeCoord::ORIGIN, "grass"), 6);
        assert_eq!(tile.side_heights(), &[0.0; 6]);
        assert!((0..6).all(|i| tile.side_open(i)));
        assert!(!tile.side_open(6));
    }

    #[test]
    fn raised_side_blocks() {
        let mut tile = Tile::from_record(TileRecord::open(LatticeCoord::ORIGIN, "grass"), 4);
        tile.set_side(1, 0.5);
        assert!(!tile.side_open(1));
        assert!(tile.side_open(0));
    }

    #[test]
    fn obstacle_count_saturates() {
        let mut tile = Tile::from_record(TileRecord::open(LatticeCoord::ORIGIN, "grass"), 4);
        assert_eq!(tile.remove_obstacle(), 0);
        assert_eq!(tile.add_obstacle(), 1);
        assert_eq!(tile.add_obstacle(), 2);
        assert_eq!(tile.remove_obstacle(), 1);
    }

    #[test]
    fn record_round_trip_keeps_label() {
        let mut tile = Tile::from_record(TileRecord::open(LatticeCoord::cube(1, -1), "rock"), 6);
        tile.set_region(3);
        let record = tile.to_record();
        assert_eq!(record.region, 3);
        assert_eq!(record.side_heights.len(), 6);
        assert_eq!(Tile::from_record(record, 6), tile);
    }

    #[test]
    fn record_deserializes_without_optional_fields() {
        let json = r#"{"coordinate":{"x":0,"y":1,"z":-1},"preset_id":"grass"}"#;
        let record: TileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.coordinate, LatticeCoord::cube(0, 1));
        assert!(record.side_heights.is_empty());
        assert_eq!(record.region, 0);
    }
}
