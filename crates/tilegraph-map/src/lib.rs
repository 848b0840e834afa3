//! Tile Graph Engine
//!
//! Tiles on a hex or square lattice, with search and region analysis.
//!
//! # Layers
//!
//! - [`TileGraph`]: tiles keyed by [`LatticeCoord`], one-sided side
//!   obstruction and a caller-supplied [`VacancyPolicy`]
//! - [`Pathfinder`]: A* shortest paths, range-bounded reachability, flood
//!   fill and bulk region labeling, all with step budgets
//! - [`trace_border`]: wall-following outline of a tile set
//! - [`TileMap`]: the above in world space
//!
//! # Search state
//!
//! Every query allocates its own [`SearchContext`]; tiles never carry search
//! marks, so independent queries cannot disturb each other. Region labels are
//! the exception: they live on the tiles and go stale after obstruction edits
//! until [`TileMap::label_regions`] runs again.

mod border;
mod config;
mod error;
mod graph;
mod map;
mod pathfinder;
mod rules;
mod search;
mod tile;

pub use border::{trace_border, Border, BorderPoint, DEFAULT_BORDER_BUDGET};
pub use config::{MapConfig, MapDocument};
pub use error::{Error, Result};
pub use graph::TileGraph;
pub use map::TileMap;
pub use pathfinder::{PathOutcome, Pathfinder, RegionLabels, DEFAULT_FLOOD_BUDGET};
pub use rules::{AnyTile, MapRules, PresetRules, TileCondition, TilePreset, VacancyPolicy};
pub use search::{Completion, SearchContext, SearchMarks, Traversal};
pub use tile::{Tile, TileRecord};

pub use tilegraph_topology::{GridTopology, LatticeCoord};
