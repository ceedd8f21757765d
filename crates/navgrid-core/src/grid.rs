//! An owned, dense tile grid.
//!
//! [`TileGrid`] stores one [`Tile`] per cell in a row-major buffer indexed by
//! `y * width + x`. Every accessor is bounds-checked: out-of-range reads
//! return `None` and out-of-range writes are ignored. The grid is owned by
//! whoever drives the searches and is only ever borrowed by them.

use std::fmt;
use std::str::FromStr;

use crate::geom::{Point, Range};
use crate::tile::Tile;

/// A dense `width × height` grid of tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Vec<Tile>,
    bounds: Range,
}

impl TileGrid {
    /// Create a grid filled with [`Tile::Open`].
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, Tile::Open)
    }

    /// Create a grid filled with `tile`.
    ///
    /// Non-positive dimensions give an empty grid in which every coordinate
    /// is out of bounds.
    pub fn filled(width: i32, height: i32, tile: Tile) -> Self {
        let bounds = Range::with_size(width, height);
        Self {
            tiles: vec![tile; bounds.len()],
            bounds,
        }
    }

    /// Parse a grid from ASCII art, one line per row.
    ///
    /// `'.'` or `' '` is open floor, `'o'` or `'~'` difficult terrain and `'#'`
    /// a wall. Leading and trailing blank lines are ignored; every remaining
    /// line must have the same width.
    pub fn parse(s: &str) -> Result<Self, GridError> {
        let s = s.trim_matches(|c| c == '\n' || c == '\r');
        if s.is_empty() {
            return Ok(Self::new(0, 0));
        }
        let mut tiles = Vec::new();
        let mut width: Option<usize> = None;
        let mut height = 0;
        for (y, line) in s.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            let mut w = 0;
            for (x, ch) in line.chars().enumerate() {
                let tile = Tile::from_glyph(ch).ok_or(GridError::InvalidGlyph {
                    ch,
                    pos: Point::new(x as i32, y as i32),
                })?;
                tiles.push(tile);
                w += 1;
            }
            match width {
                None => width = Some(w),
                Some(expected) if expected != w => {
                    return Err(GridError::InconsistentWidth {
                        row: y as i32,
                        expected: expected as i32,
                        found: w as i32,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }
        let width = width.unwrap_or(0) as i32;
        let bounds = Range::with_size(width, height);
        if bounds.is_empty() {
            tiles.clear();
        }
        Ok(Self { tiles, bounds })
    }

    /// Returns the bounding range of this grid.
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Returns the size as a Point (width = x, height = y).
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    /// Width of the grid.
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height of the grid.
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether the grid contains the given point.
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Get the tile at a point, or `None` if out of bounds.
    pub fn at(&self, p: Point) -> Option<Tile> {
        self.bounds.index_of(p).map(|i| self.tiles[i])
    }

    /// Set the tile at a point. Returns `false` (and does nothing) if out of
    /// bounds.
    pub fn set(&mut self, p: Point, tile: Tile) -> bool {
        match self.bounds.index_of(p) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Cycle the tile at `p` through open, wall and difficult terrain.
    ///
    /// Returns the new tile, or `None` if `p` is out of bounds.
    pub fn toggle(&mut self, p: Point) -> Option<Tile> {
        let i = self.bounds.index_of(p)?;
        self.tiles[i] = self.tiles[i].cycled();
        Some(self.tiles[i])
    }

    /// Whether `p` is inside the grid and not a wall.
    pub fn is_passable(&self, p: Point) -> bool {
        self.at(p).is_some_and(Tile::is_passable)
    }

    /// Fill the whole grid with the given tile.
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Fill the grid using a function of each point.
    pub fn fill_fn(&mut self, mut f: impl FnMut(Point) -> Tile) {
        for (i, p) in self.bounds.iter().enumerate() {
            self.tiles[i] = f(p);
        }
    }

    /// Count how many cells hold the given tile.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Raw row-major tile buffer.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Iterate over `(Point, Tile)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Tile)> + '_ {
        self.bounds.iter().zip(self.tiles.iter().copied())
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.width().max(0) as usize;
        if w == 0 {
            return Ok(());
        }
        for (y, row) in self.tiles.chunks(w).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for t in row {
                write!(f, "{}", t.glyph())?;
            }
        }
        Ok(())
    }
}

impl FromStr for TileGrid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Errors that can occur when parsing a grid from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A row does not have the width of the first row.
    InconsistentWidth { row: i32, expected: i32, found: i32 },
    /// A character that is not a tile glyph was found.
    InvalidGlyph { ch: char, pos: Point },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentWidth {
                row,
                expected,
                found,
            } => write!(f, "grid: row {row} is {found} wide, expected {expected}"),
            Self::InvalidGlyph { ch, pos } => {
                write!(f, "grid contains invalid glyph \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for GridError {}

// Grids serialize as their ASCII rows so the buffer length can never disagree
// with the stored dimensions.
#[cfg(feature = "serde")]
impl serde::Serialize for TileGrid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.to_string();
        let rows: Vec<&str> = if text.is_empty() {
            Vec::new()
        } else {
            text.lines().collect()
        };
        rows.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TileGrid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<String>::deserialize(deserializer)?;
        TileGrid::parse(&rows.join("\n")).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "\
#####
#..o#
#.#.#
#####";

    #[test]
    fn test_new_and_size() {
        let g = TileGrid::new(10, 5);
        assert_eq!(g.size(), Point::new(10, 5));
        assert_eq!(g.width(), 10);
        assert_eq!(g.height(), 5);
        assert_eq!(g.len(), 50);
        assert_eq!(g.count(Tile::Open), 50);
    }

    #[test]
    fn degenerate_dimensions_give_empty_grid() {
        for (w, h) in [(0, 0), (0, 4), (4, 0), (-3, 2)] {
            let g = TileGrid::new(w, h);
            assert!(g.is_empty());
            assert_eq!(g.at(Point::ZERO), None);
            assert!(!g.is_passable(Point::ZERO));
        }
    }

    #[test]
    fn test_set_and_at() {
        let mut g = TileGrid::new(4, 4);
        let p = Point::new(2, 3);
        assert!(g.set(p, Tile::Wall));
        assert_eq!(g.at(p), Some(Tile::Wall));
        assert_eq!(g.at(Point::new(0, 0)), Some(Tile::Open));
        assert_eq!(g.at(Point::new(10, 10)), None);
        assert!(!g.set(Point::new(-1, 0), Tile::Wall));
        assert!(!g.is_passable(p));
    }

    #[test]
    fn toggle_cycles_tile_kinds() {
        let mut g = TileGrid::new(2, 2);
        let p = Point::new(1, 1);
        assert_eq!(g.toggle(p), Some(Tile::Wall));
        assert_eq!(g.toggle(p), Some(Tile::Difficult));
        assert_eq!(g.toggle(p), Some(Tile::Open));
        assert_eq!(g.toggle(Point::new(2, 0)), None);
    }

    #[test]
    fn parse_and_display() {
        let g = TileGrid::parse(ROOM).unwrap();
        assert_eq!(g.size(), Point::new(5, 4));
        assert_eq!(g.at(Point::new(1, 1)), Some(Tile::Open));
        assert_eq!(g.at(Point::new(3, 1)), Some(Tile::Difficult));
        assert_eq!(g.at(Point::new(2, 2)), Some(Tile::Wall));
        assert_eq!(g.to_string(), ROOM);
        let again: TileGrid = g.to_string().parse().unwrap();
        assert_eq!(again, g);
    }

    #[test]
    fn parse_keeps_leading_spaces_as_floor() {
        let g = TileGrid::parse("\n  #\n # \n").unwrap();
        assert_eq!(g.size(), Point::new(3, 2));
        assert_eq!(g.at(Point::new(0, 0)), Some(Tile::Open));
        assert_eq!(g.at(Point::new(2, 0)), Some(Tile::Wall));
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let err = TileGrid::parse("...\n..").unwrap_err();
        assert_eq!(
            err,
            GridError::InconsistentWidth {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_glyphs() {
        let err = TileGrid::parse("..\n.x").unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidGlyph {
                ch: 'x',
                pos: Point::new(1, 1)
            }
        );
        assert!(err.to_string().contains("(1, 1)"));
    }

    #[test]
    fn test_iter_and_fill_fn() {
        let mut g = TileGrid::new(3, 2);
        g.fill_fn(|p| if p.x == 1 { Tile::Wall } else { Tile::Open });
        let items: Vec<_> = g.iter().collect();
        assert_eq!(items.len(), 6);
        assert_eq!(items[1], (Point::new(1, 0), Tile::Wall));
        assert_eq!(g.count(Tile::Wall), 2);
        g.fill(Tile::Difficult);
        assert_eq!(g.count(Tile::Difficult), 6);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_round_trip() {
        let g = TileGrid::parse("#.o\n..#").unwrap();
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, r##"["#.o","..#"]"##);
        let back: TileGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn ragged_rows_fail_to_deserialize() {
        let res: Result<TileGrid, _> = serde_json::from_str(r#"["...",".."]"#);
        assert!(res.is_err());
    }
}
