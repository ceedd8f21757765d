//! Drunk-walk dungeon generation.
//!
//! A dungeon starts as solid rock. Random walks carve open floor out of it,
//! and shorter walks then spill water (difficult terrain) over some of the
//! floor. Water never replaces rock, so spilling cannot disconnect the map.

use log::debug;
use navgrid_core::{Point, Tile, TileGrid};
use rand::{Rng, RngExt};

/// Trait for choosing a random neighbor during a random walk.
pub trait RandomWalker {
    /// Given a position `p`, return a random neighbor using `rng`.
    fn neighbor(&self, p: Point, rng: &mut impl Rng) -> Point;
}

/// A simple 4-directional random walker.
#[derive(Debug, Clone, Copy, Default)]
pub struct FourDirectionWalker;

impl RandomWalker for FourDirectionWalker {
    fn neighbor(&self, p: Point, rng: &mut impl Rng) -> Point {
        let dirs = p.neighbors_4();
        dirs[rng.random_range(0..dirs.len())]
    }
}

/// Parameters of [`MapGen::generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DungeonConfig {
    /// Number of carving walks.
    pub walks: usize,
    /// Steps per carving walk.
    pub steps: usize,
    /// Number of water spills.
    pub spills: usize,
    /// Steps per water spill.
    pub spill_steps: usize,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            walks: 24,
            steps: 100,
            spills: 8,
            spill_steps: 10,
        }
    }
}

/// What [`MapGen::generate`] did to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DungeonStats {
    /// Tiles turned from rock into floor.
    pub carved: usize,
    /// Tiles turned from floor into water.
    pub flooded: usize,
}

/// Map generator operating on a [`TileGrid`].
pub struct MapGen<R: Rng> {
    pub rng: R,
    pub grid: TileGrid,
}

impl<R: Rng> MapGen<R> {
    /// Create a generator over an all-open `width × height` grid.
    pub fn new(width: i32, height: i32, rng: R) -> Self {
        Self::with_grid(TileGrid::new(width, height), rng)
    }

    /// Create a generator over an existing grid.
    pub fn with_grid(grid: TileGrid, rng: R) -> Self {
        Self { rng, grid }
    }

    /// Give back the generated grid.
    pub fn into_grid(self) -> TileGrid {
        self.grid
    }

    /// Carve a dungeon then spill water over it.
    pub fn generate(&mut self, config: &DungeonConfig) -> DungeonStats {
        let walker = FourDirectionWalker;
        let carved = self.carve_drunk_dungeon(&walker, config.walks, config.steps);
        let flooded = self.spill_water(&walker, config.spills, config.spill_steps);
        debug!(
            "mapgen: {}x{} dungeon, {carved} carved, {flooded} flooded",
            self.grid.width(),
            self.grid.height()
        );
        DungeonStats { carved, flooded }
    }

    /// Fill the grid with walls, then carve open floor with `walks` random
    /// walks of `steps` steps each.
    ///
    /// The first walk starts at the centre of the grid, later ones at a
    /// random tile carved earlier, so the floor is always connected. Returns
    /// the number of tiles carved.
    pub fn carve_drunk_dungeon(&mut self, walker: &impl RandomWalker, walks: usize, steps: usize) -> usize {
        self.grid.fill(Tile::Wall);
        let bounds = self.grid.bounds();
        if bounds.is_empty() || walks == 0 {
            return 0;
        }
        let centre = Point::new(
            bounds.min.x + bounds.width() / 2,
            bounds.min.y + bounds.height() / 2,
        );
        let mut carved = 0usize;

        for walk in 0..walks {
            let mut pos = if walk == 0 {
                centre
            } else {
                self.random_matching(|t| t == Tile::Open).unwrap_or(centre)
            };
            for step in 0..=steps {
                if step > 0 {
                    let next = walker.neighbor(pos, &mut self.rng);
                    if !bounds.contains(next) {
                        continue;
                    }
                    pos = next;
                }
                if self.grid.at(pos) != Some(Tile::Open) {
                    self.grid.set(pos, Tile::Open);
                    carved += 1;
                }
            }
        }

        carved
    }

    /// Turn open floor into difficult terrain with `spills` random walks of
    /// `steps` steps each, starting from random open tiles.
    ///
    /// The walks stay on passable tiles. Returns the number of tiles
    /// converted.
    pub fn spill_water(&mut self, walker: &impl RandomWalker, spills: usize, steps: usize) -> usize {
        let mut flooded = 0usize;
        for _ in 0..spills {
            let Some(mut pos) = self.random_matching(|t| t == Tile::Open) else {
                break;
            };
            for step in 0..=steps {
                if step > 0 {
                    let next = walker.neighbor(pos, &mut self.rng);
                    if !self.grid.is_passable(next) {
                        continue;
                    }
                    pos = next;
                }
                if self.grid.at(pos) == Some(Tile::Open) {
                    self.grid.set(pos, Tile::Difficult);
                    flooded += 1;
                }
            }
        }
        flooded
    }

    /// A random passable tile, or `None` if the grid has none.
    pub fn random_walkable(&mut self) -> Option<Point> {
        self.random_matching(Tile::is_passable)
    }

    /// Sample random tiles for a while, then fall back to a scan so sparse
    /// maps still find a match.
    fn random_matching(&mut self, pred: impl Fn(Tile) -> bool) -> Option<Point> {
        let bounds = self.grid.bounds();
        if bounds.is_empty() {
            return None;
        }
        for _ in 0..self.grid.len() {
            let p = bounds.point_at(self.rng.random_range(0..bounds.len()));
            if self.grid.at(p).is_some_and(&pred) {
                return Some(p);
            }
        }
        self.grid.iter().find(|&(_, t)| pred(t)).map(|(p, _)| p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// Every passable tile can reach every other one.
    fn connected(grid: &TileGrid) -> bool {
        let Some((start, _)) = grid.iter().find(|&(_, t)| t.is_passable()) else {
            return true;
        };
        let mut seen = vec![false; grid.len()];
        let mut stack = vec![start];
        let mut reached = 0;
        while let Some(p) = stack.pop() {
            let Some(i) = grid.bounds().index_of(p) else {
                continue;
            };
            if seen[i] || !grid.is_passable(p) {
                continue;
            }
            seen[i] = true;
            reached += 1;
            stack.extend(p.neighbors_4());
        }
        reached == grid.iter().filter(|&(_, t)| t.is_passable()).count()
    }

    #[test]
    fn walker_steps_to_a_neighbour() {
        let mut rng = seeded(1);
        let p = Point::new(4, 4);
        for _ in 0..50 {
            assert!(FourDirectionWalker.neighbor(p, &mut rng).is_adjacent_4(p));
        }
    }

    #[test]
    fn drunk_dungeon_is_connected() {
        let mut mg = MapGen::new(40, 25, seeded(42));
        let carved = mg.carve_drunk_dungeon(&FourDirectionWalker, 24, 100);
        assert!(carved > 0);
        assert_eq!(mg.grid.count(Tile::Open), carved);
        assert_eq!(mg.grid.at(Point::new(20, 12)), Some(Tile::Open));
        assert!(connected(&mg.grid));
    }

    #[test]
    fn carving_is_bounded_by_steps() {
        let mut mg = MapGen::new(30, 30, seeded(7));
        let carved = mg.carve_drunk_dungeon(&FourDirectionWalker, 3, 10);
        assert!(carved >= 1 && carved <= 3 * 11);
    }

    #[test]
    fn water_only_replaces_floor() {
        let mut mg = MapGen::new(40, 25, seeded(3));
        mg.carve_drunk_dungeon(&FourDirectionWalker, 24, 100);
        let walls = mg.grid.count(Tile::Wall);
        let open = mg.grid.count(Tile::Open);
        let flooded = mg.spill_water(&FourDirectionWalker, 8, 10);
        assert!(flooded > 0);
        assert_eq!(mg.grid.count(Tile::Wall), walls);
        assert_eq!(mg.grid.count(Tile::Difficult), flooded);
        assert_eq!(mg.grid.count(Tile::Open), open - flooded);
        assert!(connected(&mg.grid));
    }

    #[test]
    fn generate_is_deterministic_per_seed() {
        let config = DungeonConfig::default();
        let mut a = MapGen::new(32, 20, seeded(9));
        let mut b = MapGen::new(32, 20, seeded(9));
        assert_eq!(a.generate(&config), b.generate(&config));
        assert_eq!(a.grid, b.grid);
    }

    #[test]
    fn random_walkable_finds_the_only_floor() {
        let mut grid = TileGrid::filled(8, 8, Tile::Wall);
        grid.set(Point::new(5, 6), Tile::Difficult);
        let mut mg = MapGen::with_grid(grid, seeded(0));
        assert_eq!(mg.random_walkable(), Some(Point::new(5, 6)));
        mg.grid.fill(Tile::Wall);
        assert_eq!(mg.random_walkable(), None);
    }

    #[test]
    fn empty_grid_generates_nothing() {
        let mut mg = MapGen::new(0, 0, seeded(0));
        assert_eq!(mg.generate(&DungeonConfig::default()), DungeonStats::default());
        assert_eq!(mg.random_walkable(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_fills_missing_fields() {
        let c: DungeonConfig = serde_json::from_str(r#"{"walks": 3}"#).unwrap();
        assert_eq!(c.walks, 3);
        assert_eq!(c.steps, 100);
    }
}
