//! Tiling schemes: how a tile splits and where it lies on the ground.

use crate::{GeoBounds, GroundRect, TileCoord};

/// Maps tile coordinates to children and to ground placement.
pub trait TilingScheme: std::fmt::Debug + Send + Sync {
    /// The four child coordinates in quadrant order (see [`crate::QUADRANT_OFFSETS`]).
    fn split(&self, coord: &TileCoord) -> [TileCoord; 4];

    /// Geographic extent of a tile.
    fn bounds(&self, coord: &TileCoord) -> GeoBounds;

    /// Ground-plane rectangle of a tile.
    fn world_rect(&self, coord: &TileCoord) -> GroundRect {
        GroundRect::from_geo_bounds(&self.bounds(coord))
    }
}

/// The slippy-map Web-Mercator pyramid.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebMercator;

impl TilingScheme for WebMercator {
    fn split(&self, coord: &TileCoord) -> [TileCoord; 4] {
        // +X is north and +Z is east on the ground plane.
        let [nw, ne, se, sw] = coord.children();
        [sw, nw, ne, se]
    }

    fn bounds(&self, coord: &TileCoord) -> GeoBounds {
        coord.bounds()
    }
}
