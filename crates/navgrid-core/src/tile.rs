//! The three tile kinds a map is made of.

use std::fmt;

/// Kind of a single map tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    /// Open floor.
    #[default]
    Open,
    /// Passable but expensive terrain (water, rubble, ...).
    Difficult,
    /// Impassable.
    Wall,
}

impl Tile {
    /// Default cost of stepping onto an open tile.
    pub const OPEN_COST: f64 = 1.0;
    /// Default cost of stepping onto difficult terrain.
    pub const DIFFICULT_COST: f64 = 10.0;

    /// Whether the tile can be entered.
    #[inline]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    /// Default cost of entering this tile, `None` for walls.
    #[inline]
    pub const fn step_cost(self) -> Option<f64> {
        match self {
            Tile::Open => Some(Self::OPEN_COST),
            Tile::Difficult => Some(Self::DIFFICULT_COST),
            Tile::Wall => None,
        }
    }

    /// ASCII glyph used by [`TileGrid`](crate::TileGrid) text conversion.
    #[inline]
    pub const fn glyph(self) -> char {
        match self {
            Tile::Open => '.',
            Tile::Difficult => 'o',
            Tile::Wall => '#',
        }
    }

    /// Parse a glyph. Both `'.'` and `' '` denote open floor.
    #[inline]
    pub const fn from_glyph(ch: char) -> Option<Tile> {
        match ch {
            '.' | ' ' => Some(Tile::Open),
            'o' | '~' => Some(Tile::Difficult),
            '#' => Some(Tile::Wall),
            _ => None,
        }
    }

    /// Cycle open → wall → difficult → open, as a map editor toggles tiles.
    #[inline]
    pub const fn cycled(self) -> Tile {
        match self {
            Tile::Open => Tile::Wall,
            Tile::Wall => Tile::Difficult,
            Tile::Difficult => Tile::Open,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}
