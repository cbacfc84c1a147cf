//! Equirectangular geo-to-world projection and ground rectangles.
//!
//! World space is in kilometers with the ground at `y = 0`. Latitude maps to
//! the X axis and longitude to the Z axis.

use glam::DVec3;

use crate::GeoBounds;

/// Equatorial circumference in meters.
pub const EQUATOR_M: f64 = 40_075_016.686;

/// Earth radius in kilometers derived from [`EQUATOR_M`].
pub const EARTH_RADIUS_KM: f64 = EQUATOR_M / std::f64::consts::PI / 2.0 / 1000.0;

/// Project a longitude/latitude pair (degrees) onto the ground plane.
#[must_use]
pub fn lon_lat_to_world(lon: f64, lat: f64) -> DVec3 {
    DVec3::new(
        lat.to_radians() * EARTH_RADIUS_KM,
        0.0,
        lon.to_radians() * EARTH_RADIUS_KM,
    )
}

/// Inverse of [`lon_lat_to_world`]; returns `(lon, lat)` in degrees.
#[must_use]
pub fn world_to_lon_lat(point: DVec3) -> (f64, f64) {
    (
        (point.z / EARTH_RADIUS_KM).to_degrees(),
        (point.x / EARTH_RADIUS_KM).to_degrees(),
    )
}

/// Axis-aligned rectangle on the ground plane.
///
/// Covers `[origin_x, origin_x + width) × [origin_z, origin_z + depth)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundRect {
    /// Minimum X (southern edge).
    pub origin_x: f64,
    /// Minimum Z (western edge).
    pub origin_z: f64,
    /// Extent along X.
    pub width: f64,
    /// Extent along Z.
    pub depth: f64,
}

impl GroundRect {
    /// Create a rectangle from its origin and extents.
    #[must_use]
    pub fn new(origin_x: f64, origin_z: f64, width: f64, depth: f64) -> Self {
        Self {
            origin_x,
            origin_z,
            width,
            depth,
        }
    }

    /// Project a geographic box onto the ground plane.
    #[must_use]
    pub fn from_geo_bounds(bounds: &GeoBounds) -> Self {
        let min = lon_lat_to_world(bounds.west, bounds.south);
        let max = lon_lat_to_world(bounds.east, bounds.north);
        let size = max - min;
        Self::new(min.x, min.z, size.x, size.z)
    }

    /// Center point on the ground plane.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        DVec3::new(
            self.origin_x + self.width * 0.5,
            0.0,
            self.origin_z + self.depth * 0.5,
        )
    }

    /// Corners in winding order: `(-X,-Z)`, `(+X,-Z)`, `(+X,+Z)`, `(-X,+Z)`.
    #[must_use]
    pub fn corners(&self) -> [DVec3; 4] {
        let x1 = self.origin_x + self.width;
        let z1 = self.origin_z + self.depth;
        [
            DVec3::new(self.origin_x, 0.0, self.origin_z),
            DVec3::new(x1, 0.0, self.origin_z),
            DVec3::new(x1, 0.0, z1),
            DVec3::new(self.origin_x, 0.0, z1),
        ]
    }

    /// Half-open containment test on the X/Z coordinates of `point`.
    #[must_use]
    pub fn contains(&self, point: DVec3) -> bool {
        let h = point.x >= self.origin_x && point.x < self.origin_x + self.width;
        let v = point.z >= self.origin_z && point.z < self.origin_z + self.depth;
        h && v
    }

    /// The larger of the two extents.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        self.width.max(self.depth)
    }

    /// The quarter of this rectangle at the given `(x, z)` half-step offset.
    #[must_use]
    pub fn quarter(&self, offset: (f64, f64)) -> Self {
        let half_w = self.width * 0.5;
        let half_d = self.depth * 0.5;
        Self::new(
            self.origin_x + offset.0 * half_w,
            self.origin_z + offset.1 * half_d,
            half_w,
            half_d,
        )
    }
}
