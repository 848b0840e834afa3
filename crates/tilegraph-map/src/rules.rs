//! Vacancy policies: which tiles may be entered.
//!
//! A tile is vacant when the active [`VacancyPolicy`] accepts it and no
//! obstacle stands on it. The policy is supplied by the caller, either as a
//! closure or as data-driven [`PresetRules`] loaded with the map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tile::Tile;

/// Caller-supplied predicate deciding whether a tile's type allows movement.
pub trait VacancyPolicy: Send + Sync {
    /// Whether the tile passes the policy. Obstacles are checked separately.
    fn is_met(&self, tile: &Tile) -> bool;
}

impl<F> VacancyPolicy for F
where
    F: Fn(&Tile) -> bool + Send + Sync,
{
    fn is_met(&self, tile: &Tile) -> bool {
        self(tile)
    }
}

/// Policy that accepts every tile.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyTile;

impl VacancyPolicy for AnyTile {
    fn is_met(&self, _tile: &Tile) -> bool {
        true
    }
}

/// Tile type descriptor referenced by [`Tile::preset_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePreset {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TilePreset {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Boolean expression over a preset's tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileCondition {
    HasTag { tag: String },
    Not { condition: Box<TileCondition> },
    All { conditions: Vec<TileCondition> },
    Any { conditions: Vec<TileCondition> },
}

impl TileCondition {
    pub fn has_tag(tag: impl Into<String>) -> Self {
        Self::HasTag { tag: tag.into() }
    }

    pub fn negate(self) -> Self {
        Self::Not {
            condition: Box::new(self),
        }
    }

    pub fn is_met(&self, preset: &TilePreset) -> bool {
        match self {
            Self::HasTag { tag } => preset.has_tag(tag),
            Self::Not { condition } => !condition.is_met(preset),
            Self::All { conditions } => conditions.iter().all(|c| c.is_met(preset)),
            Self::Any { conditions } => conditions.iter().any(|c| c.is_met(preset)),
        }
    }
}

/// Movement rules stored alongside a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRules {
    /// Condition a tile's preset must meet to be enterable. `None` admits all.
    #[serde(default)]
    pub movable: Option<TileCondition>,
}

/// [`MapRules`] bound to a preset table.
#[derive(Debug, Clone, Default)]
pub struct PresetRules {
    presets: HashMap<String, TilePreset>,
    rules: MapRules,
}

impl PresetRules {
    pub fn new(presets: impl IntoIterator<Item = TilePreset>, rules: MapRules) -> Self {
        Self {
            presets: presets.into_iter().map(|p| (p.id.clone(), p)).collect(),
            rules,
        }
    }

    pub fn preset(&self, id: &str) -> Option<&TilePreset> {
        self.presets.get(id)
    }
}

impl VacancyPolicy for PresetRules {
    fn is_met(&self, tile: &Tile) -> bool {
        match &self.rules.movable {
            None => true,
            // An unknown preset cannot satisfy any condition.
            Some(condition) => self
                .presets
                .get(tile.preset_id())
                .is_some_and(|preset| condition.is_met(preset)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileRecord;
    use tilegraph_topology::LatticeCoord;

    fn tile(preset: &str) -> Tile {
        Tile::from_record(TileRecord::open(LatticeCoord::ORIGIN, preset), 6)
    }

    fn presets() -> Vec<TilePreset> {
        vec![
            TilePreset::new("grass", "ground").with_tag("walkable"),
            TilePreset::new("water", "liquid").with_tag("swimmable"),
            TilePreset::new("bridge", "ground")
                .with_tag("walkable")
                .with_tag("wooden"),
        ]
    }

    #[test]
    fn no_condition_admits_everything() {
        let rules = PresetRules::new(presets(), MapRules::default());
        assert!(rules.is_met(&tile("grass")));
        assert!(rules.is_met(&tile("unknown")));
    }

    #[test]
    fn tag_condition() {
        let rules = PresetRules::new(
            presets(),
            MapRules {
                movable: Some(TileCondition::has_tag("walkable")),
            },
        );
        assert!(rules.is_met(&tile("grass")));
        assert!(!rules.is_met(&tile("water")));
        assert!(!rules.is_met(&tile("unknown")));
    }

    #[test]
    fn composite_conditions() {
        let condition = TileCondition::All {
            conditions: vec![
                TileCondition::has_tag("walkable"),
                TileCondition::has_tag("wooden").negate(),
            ],
        };
        let rules = PresetRules::new(
            presets(),
            MapRules {
                movable: Some(condition),
            },
        );
        assert!(rules.is_met(&tile("grass")));
        assert!(!rules.is_met(&tile("bridge")));

        let any = TileCondition::Any {
            conditions: vec![
                TileCondition::has_tag("swimmable"),
                TileCondition::has_tag("wooden"),
            ],
        };
        let preset = TilePreset::new("water", "liquid").with_tag("swimmable");
        assert!(any.is_met(&preset));
    }

    #[test]
    fn closures_are_policies() {
        let policy = |t: &Tile| t.preset_id() != "lava";
        assert!(policy.is_met(&tile("grass")));
        assert!(!policy.is_met(&tile("lava")));
    }

    #[test]
    fn condition_json_shape() {
        let json = r#"{"kind":"not","condition":{"kind":"has_tag","tag":"blocked"}}"#;
        let condition: TileCondition = serde_json::from_str(json).unwrap();
        assert_eq!(condition, TileCondition::has_tag("blocked").negate());
    }
}
