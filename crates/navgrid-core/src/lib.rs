//! **navgrid-core**: tile grid and geometry types.
//!
//! This crate provides the foundational types shared across the *navgrid*
//! workspace: integer geometry primitives, the three tile kinds and an owned,
//! bounds-checked tile grid that searches borrow read-only.

pub mod geom;
pub mod grid;
pub mod tile;

pub use geom::{Point, Range};
pub use grid::{GridError, TileGrid};
pub use tile::Tile;
