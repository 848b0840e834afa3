//! Map configuration and the persisted map document.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tilegraph_topology::GridTopology;

use crate::border::DEFAULT_BORDER_BUDGET;
use crate::error::{Error, Result};
use crate::pathfinder::DEFAULT_FLOOD_BUDGET;
use crate::rules::{MapRules, TilePreset};
use crate::tile::TileRecord;

/// Geometry and search limits for one map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Coordinate system of the map
    pub topology: GridTopology,

    /// Tile edge length in world units
    pub edge: f32,

    /// Step budget for region floods
    pub flood_budget: usize,

    /// Step budget for reachability searches
    pub reach_budget: usize,

    /// Step budget for border walks
    pub border_budget: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            topology: GridTopology::Hex,
            edge: 1.0,
            flood_budget: DEFAULT_FLOOD_BUDGET,
            reach_budget: DEFAULT_FLOOD_BUDGET,
            border_budget: DEFAULT_BORDER_BUDGET,
        }
    }
}

impl MapConfig {
    pub fn hex(edge: f32) -> Self {
        Self {
            topology: GridTopology::Hex,
            edge,
            ..Self::default()
        }
    }

    pub fn square(edge: f32) -> Self {
        Self {
            topology: GridTopology::Square,
            edge,
            ..Self::default()
        }
    }

    /// Applies `TILEGRAPH_*` environment overrides for the search budgets.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Applies budget overrides from `lookup`, keyed by `TILEGRAPH_*` name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        override_budget(&mut self.flood_budget, "TILEGRAPH_FLOOD_BUDGET", &lookup);
        override_budget(&mut self.reach_budget, "TILEGRAPH_REACH_BUDGET", &lookup);
        override_budget(&mut self.border_budget, "TILEGRAPH_BORDER_BUDGET", &lookup);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.edge.is_finite() || self.edge <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "edge must be a positive length, got {}",
                self.edge
            )));
        }
        for (name, budget) in [
            ("flood_budget", self.flood_budget),
            ("reach_budget", self.reach_budget),
            ("border_budget", self.border_budget),
        ] {
            if budget == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be non-zero")));
            }
        }
        Ok(())
    }
}

fn override_budget(slot: &mut usize, var: &str, lookup: &impl Fn(&str) -> Option<String>) {
    let Some(raw) = lookup(var) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => {
            debug!(var, value, "budget override");
            *slot = value;
        }
        Err(_) => warn!(var, %raw, "ignoring unparseable budget override"),
    }
}

/// A map as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(default)]
    pub config: MapConfig,
    #[serde(default)]
    pub presets: Vec<TilePreset>,
    #[serde(default)]
    pub rules: MapRules,
    #[serde(default)]
    pub tiles: Vec<TileRecord>,
}

impl MapDocument {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let document = Self::from_json(&text)?;
        debug!(path = %path.display(), tiles = document.tiles.len(), "loaded map document");
        Ok(document)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(text)?;
        document.config.validate()?;
        Ok(document)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
