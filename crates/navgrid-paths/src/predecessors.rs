use log::warn;
use navgrid_core::{Point, Range};

/// Sentinel parent index meaning "no predecessor".
pub const NO_PARENT: usize = usize::MAX;

/// Predecessor table: for every cell, the cell it was reached from on the
/// best-known path.
///
/// Searches only ever record a parent on a strict g-score improvement, so the
/// table they build is acyclic.
#[derive(Debug, Clone)]
pub struct Predecessors {
    rng: Range,
    parents: Vec<usize>,
}

impl Predecessors {
    /// An empty table covering `rng`.
    pub fn new(rng: Range) -> Self {
        Self {
            rng,
            parents: vec![NO_PARENT; rng.len()],
        }
    }

    /// Record `parent` as the predecessor of `child`. Ignored if either point
    /// is out of range.
    pub fn set(&mut self, child: Point, parent: Point) {
        if let (Some(ci), Some(pi)) = (self.rng.index_of(child), self.rng.index_of(parent)) {
            self.parents[ci] = pi;
        }
    }

    #[inline]
    pub(crate) fn set_idx(&mut self, child: usize, parent: usize) {
        self.parents[child] = parent;
    }

    /// Predecessor of `p`, if any.
    pub fn parent(&self, p: Point) -> Option<Point> {
        let i = self.rng.index_of(p)?;
        match self.parents[i] {
            NO_PARENT => None,
            pi => Some(self.rng.point_at(pi)),
        }
    }

    /// Walk predecessors back from `goal` and return the path from the root
    /// to `goal`, both inclusive.
    ///
    /// A goal without a predecessor yields the single-element path
    /// `[goal]`. An out-of-range goal, or a table containing a cycle, yields
    /// an empty path.
    pub fn reconstruct(&self, goal: Point) -> Vec<Point> {
        let Some(mut ci) = self.rng.index_of(goal) else {
            return Vec::new();
        };
        let mut path = vec![goal];
        while self.parents[ci] != NO_PARENT {
            ci = self.parents[ci];
            path.push(self.rng.point_at(ci));
            if path.len() > self.parents.len() {
                warn!("predecessor cycle while reconstructing path to {goal}");
                return Vec::new();
            }
        }
        path.reverse();
        path
    }
}
