//! Slippy-map tile coordinates.

use std::f64::consts::PI;

/// Geographic bounding box in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    /// Western longitude.
    pub west: f64,
    /// Southern latitude.
    pub south: f64,
    /// Eastern longitude.
    pub east: f64,
    /// Northern latitude.
    pub north: f64,
}

impl GeoBounds {
    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &GeoBounds) -> GeoBounds {
        GeoBounds {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }
}

/// Identifies one square image tile of the Web-Mercator pyramid.
///
/// At zoom `z` the world is a `2^z × 2^z` grid; `x` grows eastward from the
/// antimeridian and `y` grows southward from the northern Mercator limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Column, west to east.
    pub x: u32,
    /// Row, north to south.
    pub y: u32,
    /// Zoom level.
    pub zoom: u8,
}

impl TileCoord {
    /// Deepest zoom level whose grid still fits in a `u32`.
    pub const MAX_ZOOM: u8 = 30;

    /// Number of tiles along one axis at the given zoom.
    ///
    /// # Panics
    ///
    /// Panics if `zoom` exceeds [`Self::MAX_ZOOM`].
    #[must_use]
    pub fn grid_size(zoom: u8) -> u32 {
        assert!(
            zoom <= Self::MAX_ZOOM,
            "zoom {zoom} exceeds MAX_ZOOM {}",
            Self::MAX_ZOOM
        );
        1 << zoom
    }

    /// Construct a coordinate, validating `x`/`y` against the zoom grid.
    ///
    /// # Panics
    ///
    /// Panics if `zoom` exceeds [`Self::MAX_ZOOM`] or `x`/`y` are out of range.
    #[must_use]
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        let size = Self::grid_size(zoom);
        assert!(x < size, "x={x} out of range for zoom {zoom} (max {size})");
        assert!(y < size, "y={y} out of range for zoom {zoom} (max {size})");
        Self { x, y, zoom }
    }

    /// String identity key, `"x:y:zoom"`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.x, self.y, self.zoom)
    }

    /// The tile one zoom level up containing this one, `None` at zoom 0.
    #[must_use]
    pub fn parent(&self) -> Option<TileCoord> {
        if self.zoom == 0 {
            return None;
        }
        Some(TileCoord {
            x: self.x / 2,
            y: self.y / 2,
            zoom: self.zoom - 1,
        })
    }

    /// The four tiles one zoom level down, ordered `[NW, NE, SE, SW]`.
    ///
    /// # Panics
    ///
    /// Panics if this tile is already at [`Self::MAX_ZOOM`].
    #[must_use]
    pub fn children(&self) -> [TileCoord; 4] {
        let zoom = self.zoom + 1;
        let cx = self.x * 2;
        let cy = self.y * 2;
        [
            TileCoord::new(cx, cy, zoom),
            TileCoord::new(cx + 1, cy, zoom),
            TileCoord::new(cx + 1, cy + 1, zoom),
            TileCoord::new(cx, cy + 1, zoom),
        ]
    }

    /// Geographic extent of this tile.
    #[must_use]
    pub fn bounds(&self) -> GeoBounds {
        GeoBounds {
            west: tile_to_lon(self.x, self.zoom),
            south: tile_to_lat(self.y + 1, self.zoom),
            east: tile_to_lon(self.x + 1, self.zoom),
            north: tile_to_lat(self.y, self.zoom),
        }
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.x, self.y, self.zoom)
    }
}

fn tile_to_lon(x: u32, zoom: u8) -> f64 {
    x as f64 / (1u64 << zoom) as f64 * 360.0 - 180.0
}

fn tile_to_lat(y: u32, zoom: u8) -> f64 {
    let n = PI - 2.0 * PI * y as f64 / (1u64 << zoom) as f64;
    n.sinh().atan().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_coord_equality_requires_all_fields() {
        let a = TileCoord::new(1, 2, 3);
        assert_eq!(a, TileCoord::new(1, 2, 3));
        assert_ne!(a, TileCoord::new(1, 2, 4));
        assert_ne!(a, TileCoord::new(2, 1, 3));
    }

    #[test]
    fn test_key_format() {
        let coord = TileCoord::new(5, 7, 4);
        assert_eq!(coord.key(), "5:7:4");
        assert_eq!(format!("{coord}"), "5:7:4");
    }

    #[test]
    fn test_hashing_consistency() {
        let mut set = HashSet::new();
        set.insert(TileCoord::new(3, 1, 2));
        set.insert(TileCoord::new(3, 1, 2));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_children_and_parent_roundtrip() {
        let coord = TileCoord::new(1, 2, 2);
        for child in coord.children() {
            assert_eq!(child.zoom, 3);
            assert_eq!(child.parent(), Some(coord));
        }
        assert!(TileCoord::new(0, 0, 0).parent().is_none());
    }

    #[test]
    fn test_children_order_is_nw_ne_se_sw() {
        let [nw, ne, se, sw] = TileCoord::new(1, 1, 1).children();
        assert_eq!(nw, TileCoord::new(2, 2, 2));
        assert_eq!(ne, TileCoord::new(3, 2, 2));
        assert_eq!(se, TileCoord::new(3, 3, 2));
        assert_eq!(sw, TileCoord::new(2, 3, 2));
    }

    #[test]
    fn test_world_tile_bounds() {
        let b = TileCoord::new(0, 0, 0).bounds();
        assert!((b.west + 180.0).abs() < 1e-9);
        assert!((b.east - 180.0).abs() < 1e-9);
        assert!((b.north - 85.051_128_779_806_6).abs() < 1e-6);
        assert!((b.south + 85.051_128_779_806_6).abs() < 1e-6);
    }

    #[test]
    fn test_children_bounds_cover_parent() {
        let parent = TileCoord::new(2, 1, 2);
        let pb = parent.bounds();
        let union = parent
            .children()
            .iter()
            .map(TileCoord::bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap();
        assert!((union.west - pb.west).abs() < 1e-9);
        assert!((union.east - pb.east).abs() < 1e-9);
        assert!((union.north - pb.north).abs() < 1e-9);
        assert!((union.south - pb.south).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_invalid_coordinates_panic() {
        let _ = TileCoord::new(4, 0, 2);
    }
}
