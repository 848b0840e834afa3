//! Shortest paths, reachability, flood fill and region labeling.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, error, info};

use tilegraph_topology::LatticeCoord;

use crate::graph::TileGraph;
use crate::search::{Completion, OpenEntry, SearchContext, Traversal};

/// Default step budget for floods and reachability searches.
pub const DEFAULT_FLOOD_BUDGET: usize = 100_000;

/// Result of a shortest-path query.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    /// Tiles from start to finish inclusive.
    Found(Vec<LatticeCoord>),
    /// Start and finish carry different region labels; no search was run.
    CrossRegion,
    /// The finish tile is not vacant.
    FinishBlocked,
    /// The search exhausted its open list without reaching the finish.
    ///
    /// Seen with stale region labels or one-way sides. This reports no path
    /// at all rather than a start-only `[start]` path, which would read as
    /// already being at the finish.
    Unreachable,
    /// Start or finish has no tile.
    MissingTile(LatticeCoord),
}

impl PathOutcome {
    /// Collapses the outcome to "some path", "empty path" or "no path".
    ///
    /// A blocked finish yields an empty path rather than none.
    pub fn into_path(self) -> Option<Vec<LatticeCoord>> {
        match self {
            Self::Found(path) => Some(path),
            Self::FinishBlocked => Some(Vec::new()),
            Self::CrossRegion | Self::Unreachable | Self::MissingTile(_) => None,
        }
    }
}

/// Region label per tile, in persisted tile order. Label 0 marks non-vacant tiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionLabels {
    labels: IndexMap<LatticeCoord, u32>,
    regions: u32,
}

impl RegionLabels {
    /// Labels currently stored on the graph's tiles.
    pub fn from_graph(graph: &TileGraph) -> Self {
        let labels: IndexMap<LatticeCoord, u32> =
            graph.tiles().map(|t| (t.coord(), t.region())).collect();
        let regions = labels.values().copied().max().unwrap_or(0);
        Self { labels, regions }
    }

    pub fn get(&self, coord: LatticeCoord) -> Option<u32> {
        self.labels.get(&coord).copied()
    }

    /// Number of regions found (labels run 1..=count).
    pub fn region_count(&self) -> u32 {
        self.regions
    }

    pub fn iter(&self) -> impl Iterator<Item = (LatticeCoord, u32)> + '_ {
        self.labels.iter().map(|(c, l)| (*c, *l))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Serialize for RegionLabels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.labels.len()))?;
        for (coord, label) in &self.labels {
            let (x, y, z) = coord.to_tuple();
            map.serialize_entry(&format!("{x},{y},{z}"), label)?;
        }
        map.end()
    }
}

/// Search algorithms over a [`TileGraph`], with their step budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pathfinder {
    flood_budget: usize,
    reach_budget: usize,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(DEFAULT_FLOOD_BUDGET, DEFAULT_FLOOD_BUDGET)
    }
}

impl Pathfinder {
    pub fn new(flood_budget: usize, reach_budget: usize) -> Self {
        Self {
            flood_budget,
            reach_budget,
        }
    }

    pub fn flood_budget(&self) -> usize {
        self.flood_budget
    }

    pub fn reach_budget(&self) -> usize {
        self.reach_budget
    }

    /// A* from `start` to `finish` over vacant movable neighbors.
    ///
    /// Ties on estimated cost go to the tile discovered first.
    pub fn shortest_path(
        &self,
        graph: &TileGraph,
        start: LatticeCoord,
        finish: LatticeCoord,
    ) -> PathOutcome {
        let (Some(from), Some(to)) = (graph.tile(start), graph.tile(finish)) else {
            let missing = if graph.contains(start) { finish } else { start };
            debug!(%start, %finish, %missing, "path endpoint has no tile");
            return PathOutcome::MissingTile(missing);
        };
        if from.region() != to.region() {
            debug!(%start, %finish, "endpoints lie in different regions");
            return PathOutcome::CrossRegion;
        }
        if !graph.vacant(to) {
            return PathOutcome::FinishBlocked;
        }

        let mut ctx = SearchContext::new();
        match astar(graph, &mut ctx, start, finish) {
            Some(path) => PathOutcome::Found(path),
            None => {
                debug!(%start, %finish, "open list exhausted");
                PathOutcome::Unreachable
            }
        }
    }

    /// [`shortest_path`](Self::shortest_path), cut to the longest prefix whose
    /// summed step distance stays within `range`.
    pub fn shortest_path_within(
        &self,
        graph: &TileGraph,
        start: LatticeCoord,
        finish: LatticeCoord,
        range: f32,
    ) -> PathOutcome {
        match self.shortest_path(graph, start, finish) {
            PathOutcome::Found(mut path) => {
                let mut travelled = 0.0;
                let mut keep = path.len();
                for (i, pair) in path.windows(2).enumerate() {
                    travelled += graph.distance(pair[0], pair[1]);
                    if travelled > range {
                        keep = i + 1;
                        break;
                    }
                }
                path.truncate(keep);
                PathOutcome::Found(path)
            }
            other => other,
        }
    }

    /// Vacant tiles within `range` path distance of `origin`, breadth first.
    pub fn reachable_set(&self, graph: &TileGraph, origin: LatticeCoord, range: f32) -> Traversal {
        if !graph.contains(origin) {
            debug!(%origin, "reachability origin has no tile");
            return Traversal::empty();
        }

        let mut ctx = SearchContext::new();
        graph.reset_within(&mut ctx, origin, range);
        ctx.marks_mut(origin).depth = 0.0;

        let mut open = VecDeque::from([origin]);
        let mut steps = 0;
        while steps < self.reach_budget {
            let Some(current) = open.pop_front() else {
                break;
            };
            ctx.marks_mut(current).considered = true;
            let depth = ctx.marks(current).depth;
            for neighbor in graph.movable_neighbors(current) {
                let coord = neighbor.coord();
                let next = depth + graph.distance(current, coord);
                if graph.vacant(neighbor) && !ctx.marks(coord).considered && next <= range {
                    let marks = ctx.marks_mut(coord);
                    marks.considered = true;
                    marks.depth = next;
                    open.push_back(coord);
                    steps += 1;
                }
            }
            ctx.marks_mut(current).visited = true;
            ctx.closed.insert(current);
        }

        let completion = finish_flood(open.len(), steps, self.reach_budget, origin);
        Traversal {
            tiles: std::mem::take(&mut ctx.closed),
            completion,
        }
    }

    /// Every tile reachable from `origin` through vacant tiles, with no range
    /// limit. The origin is included whether or not it is vacant.
    pub fn connected_region(&self, graph: &TileGraph, origin: LatticeCoord) -> Traversal {
        if !graph.contains(origin) {
            debug!(%origin, "flood origin has no tile");
            return Traversal::empty();
        }

        // Marks start empty; unmarked tiles read as reset.
        let mut ctx = SearchContext::new();

        let mut open = VecDeque::from([origin]);
        let mut steps = 0;
        while steps < self.flood_budget {
            let Some(current) = open.pop_front() else {
                break;
            };
            ctx.marks_mut(current).considered = true;
            for neighbor in graph.movable_neighbors(current) {
                let coord = neighbor.coord();
                if graph.vacant(neighbor) && !ctx.marks(coord).considered {
                    ctx.marks_mut(coord).considered = true;
                    open.push_back(coord);
                    steps += 1;
                }
            }
            ctx.marks_mut(current).visited = true;
            ctx.closed.insert(current);
        }

        let completion = finish_flood(open.len(), steps, self.flood_budget, origin);
        Traversal {
            tiles: std::mem::take(&mut ctx.closed),
            completion,
        }
    }

    /// Labels connected vacant regions 1, 2, ... and non-vacant tiles 0.
    ///
    /// Seeds are taken in persisted tile order. With one-way edges a later
    /// flood can reach tiles an earlier one labeled; the later label wins.
    pub fn label_regions(&self, graph: &mut TileGraph) -> RegionLabels {
        let mut labels: IndexMap<LatticeCoord, u32> =
            graph.coords().map(|coord| (coord, 0)).collect();
        let mut marked = HashSet::new();
        let mut next = 0;

        let seeds: Vec<LatticeCoord> = graph
            .tiles()
            .filter(|t| graph.vacant(t))
            .map(|t| t.coord())
            .collect();
        for seed in seeds {
            if marked.contains(&seed) {
                continue;
            }
            next += 1;
            let region = self.connected_region(graph, seed);
            if !region.completion.is_complete() {
                error!(%seed, label = next, "region flood ran out of budget; labels are partial");
            }
            for coord in region.tiles {
                labels.insert(coord, next);
                marked.insert(coord);
            }
        }

        for (coord, label) in &labels {
            graph.set_region(*coord, *label);
        }
        info!(tiles = labels.len(), regions = next, "labeled regions");
        RegionLabels {
            labels,
            regions: next,
        }
    }
}

fn finish_flood(pending: usize, steps: usize, budget: usize, origin: LatticeCoord) -> Completion {
    if pending == 0 {
        Completion::Complete
    } else {
        error!(%origin, steps, budget, "search step budget exceeded");
        Completion::BudgetExceeded { budget }
    }
}

fn astar(
    graph: &TileGraph,
    ctx: &mut SearchContext,
    start: LatticeCoord,
    finish: LatticeCoord,
) -> Option<Vec<LatticeCoord>> {
    let estimate = graph.distance(start, finish);
    ctx.g_score.insert(start, 0.0);
    ctx.f_score.insert(start, estimate);
    ctx.open.push(OpenEntry {
        estimate,
        rank: 0,
        coord: start,
    });

    while let Some(entry) = ctx.open.pop() {
        let current = entry.coord;
        let superseded = ctx
            .f_score
            .get(&current)
            .is_some_and(|best| entry.estimate > *best);
        if superseded || ctx.closed.contains(&current) {
            continue;
        }
        if current == finish {
            return Some(trace_back(ctx, finish));
        }
        ctx.closed.insert(current);
        ctx.marks_mut(current).visited = true;

        let base = ctx.g_score.get(&current).copied().unwrap_or(f32::INFINITY);
        for neighbor in graph.movable_neighbors(current) {
            if !graph.vacant(neighbor) {
                continue;
            }
            let coord = neighbor.coord();
            let tentative = base + graph.distance(current, coord);
            if ctx.g_score.get(&coord).is_some_and(|g| tentative >= *g) {
                continue;
            }
            let estimate = tentative + graph.distance(coord, finish);
            // A tile keeps its first discovery rank when its score improves.
            let (rank, _) = ctx.g_score.insert_full(coord, tentative);
            ctx.f_score.insert(coord, estimate);
            ctx.came_from.insert(coord, current);
            // Closed tiles keep their place; only their scores improve.
            if !ctx.closed.contains(&coord) {
                ctx.open.push(OpenEntry {
                    estimate,
                    rank,
                    coord,
                });
                ctx.marks_mut(coord).considered = true;
            }
        }
    }
    None
}

fn trace_back(ctx: &SearchContext, finish: LatticeCoord) -> Vec<LatticeCoord> {
    let mut path = vec![finish];
    let mut cursor = finish;
    while let Some(previous) = ctx.came_from.get(&cursor) {
        cursor = *previous;
        path.push(cursor);
    }
    path.reverse();
    path
}
