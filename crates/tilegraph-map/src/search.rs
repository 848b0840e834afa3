//! Per-query search bookkeeping.
//!
//! Searches never write into tiles. Each query owns a [`SearchContext`]
//! holding the visited/considered/depth marks and the A* open list, so a
//! map can be searched again (or cloned and searched elsewhere) without
//! stale state leaking between queries.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tilegraph_topology::LatticeCoord;

/// Transient marks attached to a tile during one search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchMarks {
    pub visited: bool,
    pub considered: bool,
    pub depth: f32,
}

impl Default for SearchMarks {
    fn default() -> Self {
        Self {
            visited: false,
            considered: false,
            depth: f32::INFINITY,
        }
    }
}

/// A* open-list entry.
///
/// The heap pops the lowest estimate first and, among equal estimates, the
/// tile with the lowest discovery rank.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenEntry {
    pub(crate) estimate: f32,
    pub(crate) rank: usize,
    pub(crate) coord: LatticeCoord,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys for a min-heap.
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

/// Scratch state for one search over a tile graph.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    marks: HashMap<LatticeCoord, SearchMarks>,
    pub(crate) open: BinaryHeap<OpenEntry>,
    pub(crate) closed: IndexSet<LatticeCoord>,
    pub(crate) came_from: HashMap<LatticeCoord, LatticeCoord>,
    /// Best known cost per tile, in discovery order.
    pub(crate) g_score: IndexMap<LatticeCoord, f32>,
    pub(crate) f_score: HashMap<LatticeCoord, f32>,
}

impl SearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks for `coord`; unmarked tiles read as freshly reset.
    pub fn marks(&self, coord: LatticeCoord) -> SearchMarks {
        self.marks.get(&coord).copied().unwrap_or_default()
    }

    pub fn marks_mut(&mut self, coord: LatticeCoord) -> &mut SearchMarks {
        self.marks.entry(coord).or_default()
    }

    pub(crate) fn reset_marks(&mut self, coord: LatticeCoord) {
        self.marks.insert(coord, SearchMarks::default());
    }

    /// Number of tiles carrying explicit marks.
    pub fn marked(&self) -> usize {
        self.marks.len()
    }

    /// Drops all marks and A* state.
    pub fn clear(&mut self) {
        self.marks.clear();
        self.open.clear();
        self.closed.clear();
        self.came_from.clear();
        self.g_score.clear();
        self.f_score.clear();
    }
}

/// How a budgeted search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Completion {
    Complete,
    /// The step budget ran out; results are partial.
    BudgetExceeded { budget: usize },
}

impl Completion {
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Tiles collected by a flood or reachability search, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Traversal {
    pub tiles: IndexSet<LatticeCoord>,
    pub completion: Completion,
}

impl Traversal {
    pub(crate) fn empty() -> Self {
        Self {
            tiles: IndexSet::new(),
            completion: Completion::Complete,
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, coord: &LatticeCoord) -> bool {
        self.tiles.contains(coord)
    }
}
