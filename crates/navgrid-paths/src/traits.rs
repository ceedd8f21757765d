use navgrid_core::{Point, Range};

/// Read-only view of a map as seen by the searches.
///
/// Implementations must stay consistent for the duration of a search.
pub trait CostModel {
    /// The rectangle of valid coordinates.
    fn bounds(&self) -> Range;

    /// Whether `p` can be entered. Must be `false` outside [`bounds`](Self::bounds).
    fn passable(&self, p: Point) -> bool;

    /// Cost of stepping onto passable cell `p`. Must be > 0.
    fn step_cost(&self, p: Point) -> f64;

    /// Lower bound on any [`step_cost`](Self::step_cost). The straight-line
    /// heuristic is scaled by it to stay admissible.
    fn min_step_cost(&self) -> f64 {
        1.0
    }
}
