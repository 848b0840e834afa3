//! tilegraph CLI
//!
//! Runs one query against a map document and prints the result as JSON.
//!
//! Usage:
//!   tilegraph <map.json> label
//!   tilegraph <map.json> path --from 0,0,0 --to 3,-1,-2 [--range 4]
//!   tilegraph <map.json> reach --origin 0,0,0 --range 3
//!   tilegraph <map.json> border --origin 0,0,0 [--range 3]
//!
//! Logs go to stderr; set `RUST_LOG` to adjust verbosity.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glam::Vec3;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tilegraph_map::{
    Border, BorderPoint, Completion, MapDocument, PathOutcome, RegionLabels, TileMap,
};
use tilegraph_topology::LatticeCoord;

#[derive(Parser, Debug)]
#[command(name = "tilegraph")]
#[command(version, about = "Query paths, regions and borders on a tile map")]
struct Cli {
    /// Map document (JSON)
    #[arg(value_name = "MAP")]
    map: PathBuf,

    /// Keep the region labels stored in the document instead of recomputing them
    #[arg(long)]
    stored_labels: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Label connected regions and print `{ "x,y,z": label }`
    Label,
    /// Shortest path between two tiles
    Path {
        #[arg(long, allow_hyphen_values = true)]
        from: LatticeCoord,
        #[arg(long, allow_hyphen_values = true)]
        to: LatticeCoord,
        /// Trim the path to this travel distance
        #[arg(long)]
        range: Option<f32>,
    },
    /// Tiles reachable within a travel distance
    Reach {
        #[arg(long, allow_hyphen_values = true)]
        origin: LatticeCoord,
        #[arg(long)]
        range: f32,
    },
    /// Outline of the reachable area, or of the whole region without --range
    Border {
        #[arg(long, allow_hyphen_values = true)]
        origin: LatticeCoord,
        #[arg(long)]
        range: Option<f32>,
    },
}

#[derive(Serialize)]
struct PathReport {
    status: &'static str,
    tiles: Vec<LatticeCoord>,
    points: Vec<Vec3>,
}

#[derive(Serialize)]
struct ReachReport {
    completion: Completion,
    tiles: Vec<LatticeCoord>,
}

#[derive(Serialize)]
struct BorderReport {
    completion: Completion,
    points: Vec<BorderPoint>,
    positions: Vec<Vec3>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tilegraph=info,tilegraph_map=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut document = MapDocument::load(&cli.map)?;
    document.config = document.config.with_env_overrides();

    let mut map = TileMap::from_document(document)?;
    let labels: Option<RegionLabels> = if cli.stored_labels {
        None
    } else {
        Some(map.label_regions())
    };

    let output = match cli.command {
        Command::Label => {
            let labels = labels.unwrap_or_else(|| RegionLabels::from_graph(map.graph()));
            serde_json::to_string_pretty(&labels)?
        }
        Command::Path { from, to, range } => {
            let outcome = match range {
                Some(range) => map.path_within(from, to, range),
                None => map.path(from, to),
            };
            serde_json::to_string_pretty(&path_report(&map, outcome))?
        }
        Command::Reach { origin, range } => {
            let reach = map.walkable_tiles(origin, range);
            serde_json::to_string_pretty(&ReachReport {
                completion: reach.completion,
                tiles: reach.tiles.into_iter().collect(),
            })?
        }
        Command::Border { origin, range } => {
            let border = match range {
                Some(range) => map.walkable_border(origin, range),
                None => map.region_border(origin),
            };
            serde_json::to_string_pretty(&border_report(&map, border))?
        }
    };

    println!("{output}");
    Ok(())
}

fn path_report(map: &TileMap, outcome: PathOutcome) -> PathReport {
    let (status, tiles) = match outcome {
        PathOutcome::Found(tiles) => ("found", tiles),
        PathOutcome::FinishBlocked => ("finish_blocked", Vec::new()),
        PathOutcome::CrossRegion => ("cross_region", Vec::new()),
        PathOutcome::Unreachable => ("unreachable", Vec::new()),
        PathOutcome::MissingTile(coord) => {
            tracing::warn!(%coord, "no tile at path endpoint");
            ("missing_tile", Vec::new())
        }
    };
    let points = tiles.iter().map(|c| map.world_position(*c)).collect();
    PathReport {
        status,
        tiles,
        points,
    }
}

fn border_report(map: &TileMap, border: Border) -> BorderReport {
    let positions = map.border_positions(&border);
    BorderReport {
        completion: border.completion,
        points: border.points.into_iter().collect(),
        positions,
    }
}
