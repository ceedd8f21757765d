use navgrid_core::{Point, Range, Tile, TileGrid};

use crate::traits::CostModel;

/// Step costs per passable tile kind.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainCosts {
    /// Cost of entering [`Tile::Open`].
    pub open: f64,
    /// Cost of entering [`Tile::Difficult`].
    pub difficult: f64,
}

impl Default for TerrainCosts {
    fn default() -> Self {
        Self {
            open: Tile::OPEN_COST,
            difficult: Tile::DIFFICULT_COST,
        }
    }
}

impl TerrainCosts {
    /// Cost of entering `tile`, `None` for walls.
    #[inline]
    pub fn cost_of(&self, tile: Tile) -> Option<f64> {
        match tile {
            Tile::Open => Some(self.open),
            Tile::Difficult => Some(self.difficult),
            Tile::Wall => None,
        }
    }
}

/// A [`TileGrid`] paired with configurable terrain costs.
#[derive(Debug, Clone, Copy)]
pub struct TileCosts<'a> {
    grid: &'a TileGrid,
    terrain: TerrainCosts,
}

impl<'a> TileCosts<'a> {
    /// Wrap `grid` with the default costs (1 for open, 10 for difficult).
    pub fn new(grid: &'a TileGrid) -> Self {
        Self {
            grid,
            terrain: TerrainCosts::default(),
        }
    }

    /// Replace the terrain costs.
    ///
    /// # Panics
    ///
    /// If either cost is not a positive, finite number.
    pub fn with_terrain(mut self, terrain: TerrainCosts) -> Self {
        assert!(
            terrain.open > 0.0 && terrain.open.is_finite(),
            "open cost must be positive and finite, got {}",
            terrain.open
        );
        assert!(
            terrain.difficult > 0.0 && terrain.difficult.is_finite(),
            "difficult cost must be positive and finite, got {}",
            terrain.difficult
        );
        self.terrain = terrain;
        self
    }

    /// Shorthand for [`with_terrain`](Self::with_terrain).
    pub fn with_costs(self, open: f64, difficult: f64) -> Self {
        self.with_terrain(TerrainCosts { open, difficult })
    }

    /// The wrapped grid.
    pub fn grid(&self) -> &'a TileGrid {
        self.grid
    }

    /// The terrain costs in use.
    pub fn terrain(&self) -> TerrainCosts {
        self.terrain
    }
}

impl CostModel for TileCosts<'_> {
    fn bounds(&self) -> Range {
        self.grid.bounds()
    }

    fn passable(&self, p: Point) -> bool {
        self.grid.is_passable(p)
    }

    fn step_cost(&self, p: Point) -> f64 {
        self.grid
            .at(p)
            .and_then(|t| self.terrain.cost_of(t))
            .unwrap_or(f64::INFINITY)
    }

    fn min_step_cost(&self) -> f64 {
        self.terrain.open.min(self.terrain.difficult)
    }
}

impl CostModel for TileGrid {
    fn bounds(&self) -> Range {
        TileGrid::bounds(self)
    }

    fn passable(&self, p: Point) -> bool {
        self.is_passable(p)
    }

    fn step_cost(&self, p: Point) -> f64 {
        self.at(p)
            .and_then(Tile::step_cost)
            .unwrap_or(f64::INFINITY)
    }
}
