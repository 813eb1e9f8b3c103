//! The A* search engine.
//!
//! [AstarSearch] owns the bookkeeping of a single search (cost tables, predecessors and the
//! frontier) and borrows the [Grid] it runs on for its whole lifetime, so the layout cannot change
//! underneath it. It can be driven one frontier iteration at a time with
//! [step](AstarSearch::step), e.g. once per rendered frame, or to completion with
//! [run](AstarSearch::run). [search] is the one-call form of the latter.
use fxhash::{FxBuildHasher, FxHashSet};
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::cell::SearchStatus;
use crate::error::{EndpointError, Result};
use crate::grid::Grid;
use crate::heuristic::manhattan;
use crate::observer::{Flow, Observer};
use crate::STEP_COST;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Frontier entry. `sequence` is handed out in insertion order and breaks ties between equal
/// estimated costs first-in first-out, which keeps the returned path reproducible.
struct SmallestCostHolder {
    estimated_cost: u32,
    sequence: u64,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost == other.estimated_cost && self.sequence == other.sequence
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys since BinaryHeap pops the maximum
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

/// Best known route to a cell. Cells without a record have infinite cost.
#[derive(Clone, Copy, Debug)]
struct Node {
    parent: usize,
    g: u32,
    f: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Cells from start to end, both included.
    Found(Vec<Point>),
    /// The frontier ran dry or the search was cancelled.
    NotFound,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
    pub fn path(&self) -> Option<&[Point]> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NotFound => None,
        }
    }
    pub fn into_path(self) -> Option<Vec<Point>> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NotFound => None,
        }
    }
    /// Number of moves along the path.
    pub fn cost(&self) -> Option<usize> {
        self.path().map(|p| p.len() - 1)
    }
}

/// A single A* search from `start` to `end` on a borrowed [Grid].
///
/// Every cell that enters the frontier is marked [SearchStatus::Open], every expanded cell other
/// than the start is marked [SearchStatus::Closed] and, once the end is reached, the cells leading
/// to it are marked [SearchStatus::Path]. Each of these changes is reported to the observer as it
/// happens. Nothing is rolled back when the search fails or is cancelled.
pub struct AstarSearch<'a, O: Observer + ?Sized> {
    grid: &'a mut Grid,
    observer: &'a mut O,
    start: Point,
    end: Point,
    nodes: FxIndexMap<Point, Node>,
    frontier: BinaryHeap<SmallestCostHolder>,
    // Node indices with an entry in the frontier; each cell is queued at most once
    in_frontier: FxHashSet<usize>,
    next_sequence: u64,
    cancelled: bool,
    expansions: usize,
    outcome: Option<SearchOutcome>,
}

impl<'a, O: Observer + ?Sized> AstarSearch<'a, O> {
    /// Prepares a search. Fails without touching the grid if either endpoint is outside the grid
    /// or an obstacle, or if both are the same cell.
    pub fn new(grid: &'a mut Grid, start: Point, end: Point, observer: &'a mut O) -> Result<Self> {
        grid.validate_endpoints(start, end)?;
        let estimated_cost = manhattan(&start, &end);
        let mut nodes = FxIndexMap::default();
        nodes.insert(
            start,
            Node {
                parent: usize::MAX,
                g: 0,
                f: estimated_cost,
            },
        );
        let mut frontier = BinaryHeap::new();
        frontier.push(SmallestCostHolder {
            estimated_cost,
            sequence: 0,
            index: 0,
        });
        let mut in_frontier = FxHashSet::default();
        in_frontier.insert(0);
        info!("Searching for a path from {} to {}", start, end);
        Ok(AstarSearch {
            grid,
            observer,
            start,
            end,
            nodes,
            frontier,
            in_frontier,
            next_sequence: 1,
            cancelled: false,
            expansions: 0,
            outcome: None,
        })
    }

    pub fn start(&self) -> Point {
        self.start
    }
    pub fn end(&self) -> Point {
        self.end
    }
    pub fn grid(&self) -> &Grid {
        self.grid
    }
    /// Number of cells taken off the frontier so far.
    pub fn expansions(&self) -> usize {
        self.expansions
    }
    /// Number of cells currently waiting in the frontier.
    pub fn frontier_len(&self) -> usize {
        self.in_frontier.len()
    }
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
    /// Cost of the cheapest route to `point` found so far, [None] if it has not been reached.
    pub fn g_score(&self, point: &Point) -> Option<u32> {
        self.nodes.get(point).map(|n| n.g)
    }
    /// [g_score](Self::g_score) plus the estimate from `point` to the end.
    pub fn f_score(&self, point: &Point) -> Option<u32> {
        self.nodes.get(point).map(|n| n.f)
    }
    /// The cell `point` is reached from on the cheapest route found so far.
    pub fn came_from(&self, point: &Point) -> Option<Point> {
        let parent = self.nodes.get(point)?.parent;
        self.nodes.get_index(parent).map(|(p, _)| *p)
    }

    /// Runs one frontier iteration. Returns [None] while the search is still going and the
    /// outcome once it has finished; further calls keep returning that outcome.
    pub fn step(&mut self) -> Option<SearchOutcome> {
        if let Some(outcome) = &self.outcome {
            return Some(outcome.clone());
        }
        if self.cancelled || self.observer.cancel_requested() {
            warn!(
                "Search from {} to {} cancelled after {} expansions",
                self.start, self.end, self.expansions
            );
            return Some(self.finish(SearchOutcome::NotFound));
        }
        let Some(holder) = self.frontier.pop() else {
            info!(
                "{} is not reachable from {} ({} expansions)",
                self.end, self.start, self.expansions
            );
            return Some(self.finish(SearchOutcome::NotFound));
        };
        let index = holder.index;
        self.in_frontier.remove(&index);
        self.expansions += 1;
        let (current, node) = match self.nodes.get_index(index) {
            Some((&point, &node)) => (point, node),
            None => return Some(self.finish(SearchOutcome::NotFound)),
        };
        debug!("Expanding {} (g = {}, f = {})", current, node.g, node.f);

        if current == self.end {
            let path = self.reconstruct_path(index);
            info!(
                "Found a path of cost {} from {} to {} ({} expansions)",
                node.g, self.start, self.end, self.expansions
            );
            return Some(self.finish(SearchOutcome::Found(path)));
        }

        let tentative = node.g + STEP_COST;
        for neighbor in self.grid.neighbors(current) {
            let relaxed = Node {
                parent: index,
                g: tentative,
                f: tentative + manhattan(&neighbor, &self.end),
            };
            let n = match self.nodes.entry(neighbor) {
                Vacant(e) => {
                    let n = e.index();
                    e.insert(relaxed);
                    n
                }
                Occupied(mut e) => {
                    if tentative < e.get().g {
                        e.insert(relaxed);
                        e.index()
                    } else {
                        continue;
                    }
                }
            };
            // A queued cell keeps its entry and the priority it was queued with
            if self.in_frontier.insert(n) {
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                self.frontier.push(SmallestCostHolder {
                    estimated_cost: relaxed.f,
                    sequence,
                    index: n,
                });
                self.mark(neighbor, SearchStatus::Open);
            }
        }
        if current != self.start {
            self.mark(current, SearchStatus::Closed);
        }
        None
    }

    /// Steps until the search has finished.
    pub fn run(&mut self) -> SearchOutcome {
        loop {
            if let Some(outcome) = self.step() {
                return outcome;
            }
        }
    }

    fn finish(&mut self, outcome: SearchOutcome) -> SearchOutcome {
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn mark(&mut self, point: Point, status: SearchStatus) {
        self.grid.set_status(point, status);
        if self.observer.observe(&*self.grid, point, status) == Flow::Cancel {
            self.cancelled = true;
        }
    }

    /// Follows the predecessors back from `end_index`, marking every cell before the end as part
    /// of the path. Cancellation requests made while marking are ignored.
    fn reconstruct_path(&mut self, end_index: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let mut index = end_index;
        while let Some((point, node)) = self.nodes.get_index(index) {
            path.push(*point);
            index = node.parent;
        }
        for &point in path.iter().skip(1) {
            self.mark(point, SearchStatus::Path);
        }
        path.reverse();
        path
    }
}

/// Finds a shortest path from `start` to `end`, reporting progress to `observer`.
pub fn search<O: Observer + ?Sized>(
    grid: &mut Grid,
    start: Point,
    end: Point,
    observer: &mut O,
) -> Result<SearchOutcome> {
    Ok(AstarSearch::new(grid, start, end, observer)?.run())
}

/// Like [search], between the grid's own start and end cells.
pub fn search_marked<O: Observer + ?Sized>(
    grid: &mut Grid,
    observer: &mut O,
) -> Result<SearchOutcome> {
    let (start, end) = grid
        .start()
        .zip(grid.end())
        .ok_or(EndpointError::Missing)?;
    search(grid, start, end, observer)
}
