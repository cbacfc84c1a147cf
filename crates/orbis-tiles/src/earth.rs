//! Choice of top-level tiles that seed the quadtrees.

use std::collections::VecDeque;

use crate::{GeoBounds, GroundRect, TileCoord};

/// Root tiles at the start level, split by how they are used.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EarthRoots {
    /// Tiles with a near-square world footprint; each seeds a quadtree.
    pub divisible: Vec<TileCoord>,
    /// Thin northern tiles drawn as-is and never subdivided.
    pub static_tiles: Vec<TileCoord>,
}

/// Every tile at `zoom`, in breadth-first order from the world tile.
#[must_use]
pub fn tiles_at_zoom(zoom: u8) -> Vec<TileCoord> {
    let mut out = Vec::new();
    let mut queue = VecDeque::from([TileCoord::new(0, 0, 0)]);
    while let Some(tile) = queue.pop_front() {
        if tile.zoom == zoom {
            out.push(tile);
            continue;
        }
        queue.extend(tile.children());
    }
    out
}

/// Partition the tiles at `start_level` into quadtree roots and static tiles.
///
/// A tile whose longitude extent is less than twice its latitude extent on
/// the ground is divisible. Thinner tiles are kept as static tiles if they
/// lie in the northern hemisphere; the southern polar row carries no data
/// and is dropped.
#[must_use]
pub fn sane_earth(start_level: u8) -> EarthRoots {
    let mut roots = EarthRoots::default();
    for tile in tiles_at_zoom(start_level) {
        let rect = GroundRect::from_geo_bounds(&tile.bounds());
        let aspect = rect.depth / rect.width;
        if aspect < 2.0 {
            roots.divisible.push(tile);
        } else if rect.origin_x > 0.0 {
            roots.static_tiles.push(tile);
        }
    }
    roots
}

/// Geographic extent covered by all roots, `None` if there are none.
#[must_use]
pub fn earth_bounds(roots: &EarthRoots) -> Option<GeoBounds> {
    roots
        .divisible
        .iter()
        .chain(&roots.static_tiles)
        .map(TileCoord::bounds)
        .reduce(|a, b| a.union(&b))
}
