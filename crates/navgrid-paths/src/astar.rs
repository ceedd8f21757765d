use std::collections::BinaryHeap;

use log::debug;
use navgrid_core::Point;

use crate::navigator::{Navigator, NodeRef, PathFailure, PathResult, SeqCounter};
use crate::neighbors::Neighbors;
use crate::predecessors::Predecessors;
use crate::traits::CostModel;

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    New,
    Open,
    Closed,
}

impl<C: CostModel + ?Sized> Navigator<'_, C> {
    /// Compute the shortest path from `from` to `to` using A*.
    ///
    /// `visit` is called with every expanded cell and its final g-score. The
    /// returned path includes both endpoints; it is empty (with
    /// [`PathResult::failure`] set) if `from` is outside the grid or `to` is
    /// unreachable.
    pub fn astar<F: FnMut(Point, f64)>(&self, from: Point, to: Point, mut visit: F) -> PathResult {
        let start = match self.start_index(from) {
            Ok(i) => i,
            Err(e) => {
                debug!("astar {from} -> {to}: {e}");
                return PathResult::failed(e, 0, 0);
            }
        };
        // An out-of-range goal is never enqueued, so the search just exhausts.
        let goal = self.idx(to);

        let len = self.rng.len();
        let mut g = vec![f64::INFINITY; len];
        let mut live_seq = vec![0u64; len];
        let mut state = vec![State::New; len];
        let mut parents = Predecessors::new(self.rng);

        let mut seq = SeqCounter::default();
        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        g[start] = 0.0;
        let key = seq.key(self.heuristic(from, to));
        live_seq[start] = key.seq;
        state[start] = State::Open;
        open.push(NodeRef { idx: start, key });

        let mut open_count = 1usize;
        let mut closed_count = 0usize;
        let mut peak = 1usize;
        let mut nbuf = Neighbors::new();

        while let Some(current) = open.pop() {
            let ci = current.idx;

            // Skip superseded duplicates.
            if state[ci] != State::Open || live_seq[ci] != current.key.seq {
                continue;
            }

            if Some(ci) == goal {
                let path = parents.reconstruct(to);
                debug!(
                    "astar {from} -> {to}: cost {} in {closed_count} expansions",
                    g[ci]
                );
                return PathResult::found(path, g[ci], closed_count, peak);
            }

            state[ci] = State::Closed;
            open_count -= 1;
            closed_count += 1;
            let current_g = g[ci];
            let current_point = self.point(ci);
            visit(current_point, current_g);

            for &np in self.neighbors(current_point, &mut nbuf) {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if state[ni] == State::Closed {
                    continue;
                }
                let tentative_g = current_g + self.costs.step_cost(np);
                if tentative_g >= g[ni] {
                    continue;
                }

                g[ni] = tentative_g;
                parents.set_idx(ni, ci);
                if state[ni] == State::New {
                    state[ni] = State::Open;
                    open_count += 1;
                }
                let key = seq.key(tentative_g + self.heuristic(np, to));
                live_seq[ni] = key.seq;
                open.push(NodeRef { idx: ni, key });
                peak = peak.max(open_count + closed_count);
            }
        }

        debug!("astar {from} -> {to}: no path after {closed_count} expansions");
        PathResult::failed(PathFailure::NoPath, closed_count, peak)
    }
}
