use std::collections::BTreeMap;

use log::{debug, trace};
use navgrid_core::Point;

use crate::navigator::{FrontierKey, Navigator, PathFailure, PathResult, SeqCounter};
use crate::neighbors::Neighbors;
use crate::predecessors::Predecessors;
use crate::traits::CostModel;

/// Frontier that keeps each node at most once and exposes both ends.
struct Frontier {
    entries: BTreeMap<FrontierKey, usize>,
    keys: Vec<Option<FrontierKey>>,
}

impl Frontier {
    fn new(len: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            keys: vec![None; len],
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Insert `idx`, replacing its previous key if it is already present.
    fn upsert(&mut self, idx: usize, key: FrontierKey) {
        if let Some(old) = self.keys[idx].replace(key) {
            self.entries.remove(&old);
        }
        self.entries.insert(key, idx);
    }

    fn pop_min(&mut self) -> Option<usize> {
        let (_, idx) = self.entries.pop_first()?;
        self.keys[idx] = None;
        Some(idx)
    }

    fn pop_max(&mut self) -> Option<(usize, FrontierKey)> {
        let (key, idx) = self.entries.pop_last()?;
        self.keys[idx] = None;
        Some((idx, key))
    }
}

impl<C: CostModel + ?Sized> Navigator<'_, C> {
    /// A* with a cap on the number of cells held in memory.
    ///
    /// Whenever frontier plus closed set would exceed `limit`, the frontier
    /// entry with the worst f-score is dropped (latest insertion first among
    /// ties). Dropped cells keep their g-score and predecessor, so they only
    /// come back on a strictly cheaper route. The search is complete and
    /// optimal whenever `limit` is at least the number of reachable cells,
    /// and returns exactly what [`astar`](Self::astar) returns in that case.
    /// Smaller limits may yield a costlier path or [`PathFailure::NoPath`].
    pub fn bounded_astar<F: FnMut(Point, f64)>(
        &self,
        from: Point,
        to: Point,
        limit: usize,
        mut visit: F,
    ) -> PathResult {
        if limit == 0 {
            return PathResult::failed(PathFailure::InvalidLimit, 0, 0);
        }
        let start = match self.start_index(from) {
            Ok(i) => i,
            Err(e) => {
                debug!("bounded {from} -> {to}: {e}");
                return PathResult::failed(e, 0, 0);
            }
        };
        let goal = self.idx(to);

        let len = self.rng.len();
        let mut g = vec![f64::INFINITY; len];
        let mut closed = vec![false; len];
        let mut parents = Predecessors::new(self.rng);
        let mut frontier = Frontier::new(len);
        let mut seq = SeqCounter::default();

        g[start] = 0.0;
        frontier.upsert(start, seq.key(self.heuristic(from, to)));

        let mut closed_count = 0usize;
        let mut evicted = 0usize;
        let mut peak = 1usize;
        let mut nbuf = Neighbors::new();

        while let Some(ci) = frontier.pop_min() {
            if Some(ci) == goal {
                let path = parents.reconstruct(to);
                debug!(
                    "bounded {from} -> {to}: cost {} in {closed_count} expansions, \
                     {evicted} evicted, peak {peak}/{limit}",
                    g[ci]
                );
                return PathResult::found(path, g[ci], closed_count, peak);
            }

            closed[ci] = true;
            closed_count += 1;
            let current_g = g[ci];
            let current_point = self.point(ci);
            visit(current_point, current_g);

            for &np in self.neighbors(current_point, &mut nbuf) {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if closed[ni] {
                    continue;
                }
                let tentative_g = current_g + self.costs.step_cost(np);
                if tentative_g >= g[ni] {
                    continue;
                }

                g[ni] = tentative_g;
                parents.set_idx(ni, ci);
                frontier.upsert(ni, seq.key(tentative_g + self.heuristic(np, to)));

                if frontier.len() + closed_count > limit {
                    if let Some((ei, key)) = frontier.pop_max() {
                        evicted += 1;
                        trace!("bounded: evict {} (f = {})", self.point(ei), key.score);
                    }
                }
                peak = peak.max(frontier.len() + closed_count);
            }
        }

        debug!("bounded {from} -> {to}: no path after {closed_count} expansions, {evicted} evicted");
        PathResult::failed(PathFailure::NoPath, closed_count, peak)
    }
}
