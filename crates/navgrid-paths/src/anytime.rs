//! Anytime repairing search.
//!
//! The search runs a weighted A* with an inflated heuristic `g + ε·h`, emits
//! the path it finds, then lowers `ε` and repairs the previous search instead
//! of starting over. Every emitted path is at most `bound` times the optimal
//! cost, and the last one is optimal unless the search was stopped early by
//! [`AnytimeConfig::min_epsilon`].

use std::collections::BinaryHeap;

use log::debug;
use navgrid_core::Point;

use crate::navigator::{Navigator, NodeRef, SeqCounter};
use crate::neighbors::Neighbors;
use crate::predecessors::Predecessors;
use crate::traits::CostModel;

/// Inflation schedule for [`Navigator::anytime`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnytimeConfig {
    /// Heuristic inflation of the first search.
    pub initial_epsilon: f64,
    /// Factor applied to `ε` between searches, in `(0, 1)`.
    pub decay: f64,
    /// Smallest `ε` ever used. Values below 1 are treated as 1.
    pub min_epsilon: f64,
}

impl Default for AnytimeConfig {
    fn default() -> Self {
        Self {
            initial_epsilon: 15.0,
            decay: 0.8,
            min_epsilon: 1.0,
        }
    }
}

impl AnytimeConfig {
    /// A copy with out-of-range values replaced by usable ones.
    ///
    /// `min_epsilon` is raised to 1, `initial_epsilon` to `min_epsilon`, and
    /// a `decay` outside `(0, 1)` falls back to the default.
    pub fn sanitized(&self) -> Self {
        let min_epsilon = if self.min_epsilon.is_finite() {
            self.min_epsilon.max(1.0)
        } else {
            1.0
        };
        let initial_epsilon = if self.initial_epsilon.is_finite() {
            self.initial_epsilon.max(min_epsilon)
        } else {
            Self::default().initial_epsilon.max(min_epsilon)
        };
        let decay = if self.decay > 0.0 && self.decay < 1.0 {
            self.decay
        } else {
            Self::default().decay
        };
        Self {
            initial_epsilon,
            decay,
            min_epsilon,
        }
    }
}

/// One path emitted by [`Navigator::anytime`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Path from start to goal, both inclusive.
    pub path: Vec<Point>,
    /// Accumulated cost of `path`.
    pub cost: f64,
    /// Inflation the path was found with.
    pub epsilon: f64,
    /// Proven suboptimality bound of `path` (`cost <= bound * optimal`).
    pub bound: f64,
    /// Cells expanded during the search that produced this path.
    pub nodes_expanded: usize,
}

/// Every path emitted by [`Navigator::anytime`], oldest first.
///
/// Costs are non-increasing. The sequence is empty if the start lies outside
/// the grid or the goal cannot be reached.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnytimeResult {
    /// Emitted paths, one per completed inflation level.
    pub solutions: Vec<Solution>,
}

impl AnytimeResult {
    /// Whether no path was found at all.
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Number of emitted paths.
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// The first, fastest found path.
    pub fn first(&self) -> Option<&Solution> {
        self.solutions.first()
    }

    /// The last, cheapest path.
    pub fn best(&self) -> Option<&Solution> {
        self.solutions.last()
    }

    /// Iterate over the solutions, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Solution> {
        self.solutions.iter()
    }

    /// Total cells expanded over all searches.
    pub fn total_expanded(&self) -> usize {
        self.solutions.iter().map(|s| s.nodes_expanded).sum()
    }

    /// Drop the statistics and keep only the paths.
    pub fn into_paths(self) -> Vec<Vec<Point>> {
        self.solutions.into_iter().map(|s| s.path).collect()
    }
}

impl<'r> IntoIterator for &'r AnytimeResult {
    type Item = &'r Solution;
    type IntoIter = std::slice::Iter<'r, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}

/// Search state shared by every level of an anytime run.
struct Session<'n, 'a, C: CostModel + ?Sized> {
    nav: &'n Navigator<'a, C>,
    goal: Point,
    goal_idx: usize,
    epsilon: f64,
    g: Vec<f64>,
    parents: Predecessors,
    open: BinaryHeap<NodeRef>,
    live_seq: Vec<u64>,
    in_open: Vec<bool>,
    closed: Vec<bool>,
    incons: Vec<usize>,
    in_incons: Vec<bool>,
    seq: SeqCounter,
    nbuf: Neighbors,
}

impl<'n, 'a, C: CostModel + ?Sized> Session<'n, 'a, C> {
    fn new(nav: &'n Navigator<'a, C>, start: usize, goal: Point, goal_idx: usize, epsilon: f64) -> Self {
        let len = nav.rng.len();
        let mut s = Self {
            nav,
            goal,
            goal_idx,
            epsilon,
            g: vec![f64::INFINITY; len],
            parents: Predecessors::new(nav.rng),
            open: BinaryHeap::new(),
            live_seq: vec![0; len],
            in_open: vec![false; len],
            closed: vec![false; len],
            incons: Vec::new(),
            in_incons: vec![false; len],
            seq: SeqCounter::default(),
            nbuf: Neighbors::new(),
        };
        s.g[start] = 0.0;
        s.push_open(start);
        s
    }

    #[inline]
    fn f_value(&self, idx: usize) -> f64 {
        self.g[idx] + self.nav.heuristic(self.nav.point(idx), self.goal)
    }

    #[inline]
    fn inflated(&self, idx: usize) -> f64 {
        self.g[idx] + self.epsilon * self.nav.heuristic(self.nav.point(idx), self.goal)
    }

    fn push_open(&mut self, idx: usize) {
        let key = self.seq.key(self.inflated(idx));
        self.live_seq[idx] = key.seq;
        self.in_open[idx] = true;
        self.open.push(NodeRef { idx, key });
    }

    /// Expand cells until the goal has the smallest inflated key. Returns the
    /// number of expansions, or `None` if the frontier ran dry first.
    fn improve_path<F: FnMut(Point, f64)>(&mut self, visit: &mut F) -> Option<usize> {
        let mut expanded = 0usize;
        while let Some(current) = self.open.pop() {
            let ci = current.idx;
            if !self.in_open[ci] || self.live_seq[ci] != current.key.seq {
                continue;
            }
            if ci == self.goal_idx {
                // The goal stays queued so the next level starts from it.
                self.open.push(current);
                return Some(expanded);
            }

            self.in_open[ci] = false;
            self.closed[ci] = true;
            expanded += 1;
            let current_g = self.g[ci];
            let cp = self.nav.point(ci);
            visit(cp, current_g);

            let mut nbuf = std::mem::take(&mut self.nbuf);
            for &np in self.nav.neighbors(cp, &mut nbuf) {
                let Some(ni) = self.nav.idx(np) else {
                    continue;
                };
                let tentative_g = current_g + self.nav.costs.step_cost(np);
                if tentative_g >= self.g[ni] {
                    continue;
                }
                self.g[ni] = tentative_g;
                self.parents.set_idx(ni, ci);
                if self.closed[ni] {
                    if !self.in_incons[ni] {
                        self.in_incons[ni] = true;
                        self.incons.push(ni);
                    }
                } else {
                    self.push_open(ni);
                }
            }
            self.nbuf = nbuf;
        }
        None
    }

    /// Suboptimality bound of the current goal cost.
    fn bound(&self) -> f64 {
        let lower = (0..self.g.len())
            .filter(|&i| self.in_open[i] || self.in_incons[i])
            .map(|i| self.f_value(i))
            .fold(f64::INFINITY, f64::min);
        if !lower.is_finite() || lower <= 0.0 {
            return 1.0;
        }
        self.epsilon.min(self.g[self.goal_idx] / lower)
    }

    /// Lower `ε` and prepare the frontier for the next level.
    fn next_level(&mut self, decay: f64, min_epsilon: f64) {
        self.epsilon = (self.epsilon * decay).max(min_epsilon);
        for idx in self.incons.drain(..) {
            self.in_incons[idx] = false;
            self.in_open[idx] = true;
        }
        self.closed.fill(false);
        self.open.clear();
        for idx in 0..self.in_open.len() {
            if self.in_open[idx] {
                self.push_open(idx);
            }
        }
    }

    fn solution(&self, bound: f64, nodes_expanded: usize) -> Solution {
        Solution {
            path: self.parents.reconstruct(self.goal),
            cost: self.g[self.goal_idx],
            epsilon: self.epsilon,
            bound,
            nodes_expanded,
        }
    }
}

impl<C: CostModel + ?Sized> Navigator<'_, C> {
    /// Anytime search from `from` to `to`.
    ///
    /// Runs a sequence of weighted searches with decreasing inflation and
    /// returns every path found, each at least as cheap as the one before.
    /// `visit` is called for every expansion of every level.
    pub fn anytime<F: FnMut(Point, f64)>(
        &self,
        from: Point,
        to: Point,
        config: &AnytimeConfig,
        mut visit: F,
    ) -> AnytimeResult {
        let config = config.sanitized();
        let start = match self.start_index(from) {
            Ok(i) => i,
            Err(e) => {
                debug!("anytime {from} -> {to}: {e}");
                return AnytimeResult::default();
            }
        };
        let Some(goal_idx) = self.idx(to) else {
            debug!("anytime {from} -> {to}: goal is outside the grid");
            return AnytimeResult::default();
        };
        if start == goal_idx {
            return AnytimeResult {
                solutions: vec![Solution {
                    path: vec![from],
                    cost: 0.0,
                    epsilon: config.initial_epsilon,
                    bound: 1.0,
                    nodes_expanded: 0,
                }],
            };
        }

        let mut session = Session::new(self, start, to, goal_idx, config.initial_epsilon);
        let mut solutions = Vec::new();

        let Some(expanded) = session.improve_path(&mut visit) else {
            debug!("anytime {from} -> {to}: no path");
            return AnytimeResult::default();
        };
        let mut bound = session.bound();
        debug!(
            "anytime {from} -> {to}: ε = {}, cost {}, bound {bound}, {expanded} expansions",
            session.epsilon, session.g[goal_idx]
        );
        solutions.push(session.solution(bound, expanded));

        while bound > 1.0 && session.epsilon > config.min_epsilon {
            session.next_level(config.decay, config.min_epsilon);
            let Some(expanded) = session.improve_path(&mut visit) else {
                break;
            };
            bound = session.bound();
            debug!(
                "anytime {from} -> {to}: ε = {}, cost {}, bound {bound}, {expanded} expansions",
                session.epsilon, session.g[goal_idx]
            );
            solutions.push(session.solution(bound, expanded));
        }

        AnytimeResult { solutions }
    }
}
