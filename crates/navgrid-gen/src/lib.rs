//! Random map generation for navgrid: drunk-walk dungeons with pools of
//! difficult terrain.

pub mod mapgen;

pub use mapgen::{DungeonConfig, DungeonStats, FourDirectionWalker, MapGen, RandomWalker};
