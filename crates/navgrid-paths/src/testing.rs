//! Map builders and path checks shared by the search tests.

use navgrid_core::{Point, Tile, TileGrid};
use rand::{Rng, RngExt};

use crate::traits::CostModel;

/// A `width × height` map with roughly 25% walls and 15% difficult terrain.
/// The origin is always open.
pub(crate) fn random_grid(rng: &mut impl Rng, width: i32, height: i32) -> TileGrid {
    let mut g = TileGrid::new(width, height);
    g.fill_fn(|_| match rng.random_range(0..20u32) {
        0..5 => Tile::Wall,
        5..8 => Tile::Difficult,
        _ => Tile::Open,
    });
    g.set(Point::ZERO, Tile::Open);
    g
}

/// Sum of step costs along `path`, excluding the start cell.
pub(crate) fn path_cost(grid: &TileGrid, path: &[Point]) -> f64 {
    path.iter().skip(1).map(|&p| grid.step_cost(p)).sum()
}

/// `path` starts at `from`, ends at `to` and moves one passable cardinal
/// step at a time.
pub(crate) fn assert_well_formed(grid: &TileGrid, path: &[Point], from: Point, to: Point) {
    assert_eq!(path.first(), Some(&from));
    assert_eq!(path.last(), Some(&to));
    for w in path.windows(2) {
        assert!(w[0].is_adjacent_4(w[1]), "{} -> {} is not a step", w[0], w[1]);
        assert!(grid.is_passable(w[1]), "{} is not passable", w[1]);
    }
}
