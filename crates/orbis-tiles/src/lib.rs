//! Tile addressing and the lazily subdivided ground quadtree.
//!
//! Slippy-map tile coordinates, the equirectangular geo-to-world projection,
//! arena-backed quadtree cells with depth/breadth-first traversal, and the
//! selection of root tiles that seed one quadtree each.

mod earth;
mod projection;
mod quadtree;
mod scheme;
mod tile_coord;
mod traversal;

pub use earth::{EarthRoots, earth_bounds, sane_earth, tiles_at_zoom};
pub use projection::{EARTH_RADIUS_KM, EQUATOR_M, GroundRect, lon_lat_to_world, world_to_lon_lat};
pub use quadtree::{Cell, CellId, QUADRANT_OFFSETS, Quadtree};
pub use scheme::{TilingScheme, WebMercator};
pub use tile_coord::{GeoBounds, TileCoord};
pub use traversal::{BfsControl, DfsControl};
