use std::cmp::Ordering;
use std::fmt;

use navgrid_core::{Point, Range};

use crate::distance::euclidean;
use crate::neighbors::Neighbors;
use crate::traits::CostModel;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Reason a search produced no path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathFailure {
    /// The start coordinate lies outside the grid.
    InvalidStart,
    /// The frontier was exhausted before the goal was reached.
    NoPath,
    /// A bounded search was given a zero capacity.
    InvalidLimit,
    /// The grid has no cells.
    MalformedGrid,
}

impl fmt::Display for PathFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStart => write!(f, "start coordinate is outside the grid"),
            Self::NoPath => write!(f, "goal is unreachable from start"),
            Self::InvalidLimit => write!(f, "node limit must be at least 1"),
            Self::MalformedGrid => write!(f, "grid has no cells"),
        }
    }
}

impl std::error::Error for PathFailure {}

/// Outcome of a single-path search.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Path from start to goal, both inclusive. Empty on failure.
    pub path: Vec<Point>,
    /// Accumulated cost of the path (`+∞` on failure).
    pub cost: f64,
    /// Number of cells expanded (moved to the closed set).
    pub nodes_expanded: usize,
    /// Largest frontier + closed size observed during the search.
    pub peak_nodes: usize,
    /// Why no path was produced, if so.
    pub failure: Option<PathFailure>,
}

impl PathResult {
    pub(crate) fn found(path: Vec<Point>, cost: f64, nodes_expanded: usize, peak_nodes: usize) -> Self {
        Self {
            path,
            cost,
            nodes_expanded,
            peak_nodes,
            failure: None,
        }
    }

    pub(crate) fn failed(reason: PathFailure, nodes_expanded: usize, peak_nodes: usize) -> Self {
        Self {
            path: Vec::new(),
            cost: f64::INFINITY,
            nodes_expanded,
            peak_nodes,
            failure: Some(reason),
        }
    }

    /// Whether a path was found.
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }

    /// The path as a `Result`.
    pub fn into_result(self) -> Result<Vec<Point>, PathFailure> {
        match self.failure {
            None => Ok(self.path),
            Some(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Frontier keys
// ---------------------------------------------------------------------------

/// Priority of a frontier entry: score first, then insertion order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FrontierKey {
    pub(crate) score: f64,
    pub(crate) seq: u64,
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierKey {}

/// Reference into the node tables, ordered by key for use in `BinaryHeap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) key: FrontierKey,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest key first.
        other.key.cmp(&self.key)
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Hands out increasing sequence numbers for frontier keys.
#[derive(Debug, Default)]
pub(crate) struct SeqCounter(u64);

impl SeqCounter {
    #[inline]
    pub(crate) fn key(&mut self, score: f64) -> FrontierKey {
        let seq = self.0;
        self.0 += 1;
        FrontierKey { score, seq }
    }
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

/// Entry point for every search over a [`CostModel`].
///
/// A `Navigator` only borrows the cost model; all search tables are
/// allocated per call and dropped when it returns.
pub struct Navigator<'a, C: CostModel + ?Sized> {
    pub(crate) costs: &'a C,
    pub(crate) rng: Range,
}

impl<'a, C: CostModel + ?Sized> Navigator<'a, C> {
    /// Create a navigator over `costs`.
    pub fn new(costs: &'a C) -> Self {
        Self {
            costs,
            rng: costs.bounds(),
        }
    }

    /// The grid rectangle searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// The cost model searched.
    #[inline]
    pub fn costs(&self) -> &'a C {
        self.costs
    }

    /// Admissible estimate of the cost from `p` to `goal`.
    #[inline]
    pub fn heuristic(&self, p: Point, goal: Point) -> f64 {
        euclidean(p, goal) * self.costs.min_step_cost()
    }

    // -----------------------------------------------------------------------
    // Helpers shared by the searches
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        self.rng.index_of(p)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        self.rng.point_at(idx)
    }

    /// Validate the start coordinate and return its index.
    pub(crate) fn start_index(&self, from: Point) -> Result<usize, PathFailure> {
        if self.rng.is_empty() {
            return Err(PathFailure::MalformedGrid);
        }
        self.idx(from).ok_or(PathFailure::InvalidStart)
    }

    /// Passable cardinal neighbours of `p`.
    #[inline]
    pub(crate) fn neighbors<'n>(&self, p: Point, nbuf: &'n mut Neighbors) -> &'n [Point] {
        nbuf.cardinal(p, |n| self.rng.contains(n) && self.costs.passable(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navgrid_core::TileGrid;
    use std::collections::BinaryHeap;

    #[test]
    fn heap_pops_lowest_score_then_oldest() {
        let mut seq = SeqCounter::default();
        let mut heap = BinaryHeap::new();
        heap.push(NodeRef { idx: 0, key: seq.key(3.0) });
        heap.push(NodeRef { idx: 1, key: seq.key(1.0) });
        heap.push(NodeRef { idx: 2, key: seq.key(1.0) });
        heap.push(NodeRef { idx: 3, key: seq.key(2.0) });
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|n| n.idx)).collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
    }

    #[test]
    fn start_validation() {
        let g = TileGrid::new(3, 3);
        let nav = Navigator::new(&g);
        assert_eq!(nav.start_index(Point::new(1, 1)), Ok(4));
        assert_eq!(nav.start_index(Point::INVALID), Err(PathFailure::InvalidStart));
        let empty = TileGrid::new(0, 0);
        assert_eq!(
            Navigator::new(&empty).start_index(Point::ZERO),
            Err(PathFailure::MalformedGrid)
        );
    }

    #[test]
    fn neighbours_skip_walls_and_edges() {
        let g = TileGrid::parse(".#\n..").unwrap();
        let nav = Navigator::new(&g);
        let mut nb = Neighbors::new();
        assert_eq!(nav.neighbors(Point::new(0, 0), &mut nb), &[Point::new(0, 1)]);
    }

    #[test]
    fn failure_messages() {
        assert_eq!(
            PathFailure::InvalidStart.to_string(),
            "start coordinate is outside the grid"
        );
        let r = PathResult::failed(PathFailure::NoPath, 3, 5);
        assert!(!r.success());
        assert_eq!(r.into_result(), Err(PathFailure::NoPath));
    }
}
