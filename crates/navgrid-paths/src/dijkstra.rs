use std::collections::BinaryHeap;

use navgrid_core::{Point, Range};

use crate::navigator::{Navigator, NodeRef, SeqCounter};
use crate::neighbors::Neighbors;
use crate::traits::CostModel;

/// Exhaustive cost-to-reach map produced by [`Navigator::cost_map`].
#[derive(Debug, Clone, PartialEq)]
pub struct CostMap {
    rng: Range,
    costs: Vec<f64>,
}

impl CostMap {
    /// Cheapest cost from any source to `p`; `+∞` if unreachable or out of
    /// range.
    pub fn at(&self, p: Point) -> f64 {
        match self.rng.index_of(p) {
            Some(i) => self.costs[i],
            None => f64::INFINITY,
        }
    }

    /// Whether `p` can be reached from a source.
    pub fn is_reachable(&self, p: Point) -> bool {
        self.at(p).is_finite()
    }

    /// Iterate over every reachable cell with its cost.
    pub fn reachable(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.rng
            .iter()
            .zip(self.costs.iter().copied())
            .filter(|(_, c)| c.is_finite())
    }
}

impl<C: CostModel + ?Sized> Navigator<'_, C> {
    /// Compute a multi-source Dijkstra cost map.
    ///
    /// Every in-range source starts at cost 0; the whole reachable area is
    /// expanded. Entering a cell costs [`CostModel::step_cost`] of that cell,
    /// exactly as in the path searches.
    pub fn cost_map(&self, sources: &[Point]) -> CostMap {
        let mut costs = vec![f64::INFINITY; self.rng.len()];
        let mut done = vec![false; costs.len()];
        let mut seq = SeqCounter::default();
        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();

        for &src in sources {
            if let Some(si) = self.idx(src) {
                costs[si] = 0.0;
                open.push(NodeRef {
                    idx: si,
                    key: seq.key(0.0),
                });
            }
        }

        let mut nbuf = Neighbors::new();

        while let Some(current) = open.pop() {
            let ci = current.idx;
            if done[ci] || current.key.score > costs[ci] {
                continue;
            }
            done[ci] = true;
            let current_cost = costs[ci];
            let cp = self.point(ci);

            for &np in self.neighbors(cp, &mut nbuf) {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                let tentative = current_cost + self.costs.step_cost(np);
                if tentative >= costs[ni] {
                    continue;
                }
                costs[ni] = tentative;
                open.push(NodeRef {
                    idx: ni,
                    key: seq.key(tentative),
                });
            }
        }

        CostMap {
            rng: self.rng,
            costs,
        }
    }
}
