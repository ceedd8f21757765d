//! Path searches over 2D tile grids.
//!
//! Three strategies share one cost model and one frontier key ordering:
//!
//! - **A\*** optimal search ([`Navigator::astar`])
//! - **Memory-bounded A\*** that evicts the worst frontier entries once
//!   frontier + closed exceed a cap ([`Navigator::bounded_astar`])
//! - **Anytime repairing A\*** producing progressively better paths under a
//!   shrinking heuristic inflation ([`Navigator::anytime`])
//!
//! plus an exhaustive Dijkstra cost map ([`Navigator::cost_map`]) used as a
//! reference for optimality.
//!
//! A [`Navigator`] borrows a [`CostModel`] read-only and keeps no state
//! between calls; every search allocates its own tables, so several searches
//! may run in parallel over the same grid. Each search accepts an observer
//! `FnMut(Point, f64)` that receives every expanded cell and its g-score.
//!
//! # Frontier ordering
//!
//! Frontier entries are ordered by score, then by insertion sequence: among
//! equal scores the entry inserted first is expanded first.

mod anytime;
mod astar;
mod bounded;
mod costs;
mod dijkstra;
mod distance;
mod navigator;
mod neighbors;
mod predecessors;
mod traits;

pub use anytime::{AnytimeConfig, AnytimeResult, Solution};
pub use costs::{TerrainCosts, TileCosts};
pub use dijkstra::CostMap;
pub use distance::{euclidean, manhattan};
pub use navigator::{Navigator, PathFailure, PathResult};
pub use neighbors::Neighbors;
pub use predecessors::{NO_PARENT, Predecessors};
pub use traits::CostModel;

use navgrid_core::Point;

/// Optimal path from `start` to `goal`, or an empty path if there is none.
pub fn find_path<C: CostModel + ?Sized>(costs: &C, start: Point, goal: Point) -> Vec<Point> {
    Navigator::new(costs).astar(start, goal, |_, _| {}).path
}

/// Memory-bounded path from `start` to `goal` keeping at most `limit`
/// frontier + closed entries, or an empty path if none was found.
pub fn find_path_bounded<C: CostModel + ?Sized>(
    costs: &C,
    start: Point,
    goal: Point,
    limit: usize,
) -> Vec<Point> {
    Navigator::new(costs)
        .bounded_astar(start, goal, limit, |_, _| {})
        .path
}

/// Sequence of improving paths from `start` to `goal`, one per inflation
/// level, with default [`AnytimeConfig`]. Empty if the goal is unreachable.
pub fn find_paths_anytime<C: CostModel + ?Sized>(
    costs: &C,
    start: Point,
    goal: Point,
) -> Vec<Vec<Point>> {
    Navigator::new(costs)
        .anytime(start, goal, &AnytimeConfig::default(), |_, _| {})
        .into_paths()
}

#[cfg(test)]
mod testing;
