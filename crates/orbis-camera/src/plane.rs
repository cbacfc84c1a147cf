use glam::DVec3;

/// A plane in world space.
///
/// The plane equation is `normal.dot(point) + distance`; a non-negative value
/// means "inside".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: DVec3,
    pub distance: f64,
}

impl Plane {
    /// Create a new plane from a normal vector and distance.
    pub fn new(normal: DVec3, distance: f64) -> Self {
        Self { normal, distance }
    }

    /// Plane through `point` with the given (normalized) `normal`.
    pub fn from_normal_and_point(normal: DVec3, point: DVec3) -> Self {
        let normal = normal.normalize();
        Self::new(normal, -normal.dot(point))
    }

    /// Positive if inside, negative if outside, zero on the plane.
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) + self.distance
    }

    /// Returns true if the point is on the inside half-space or on the plane.
    pub fn contains_point(&self, point: DVec3) -> bool {
        self.signed_distance(point) >= 0.0
    }

    /// Point where the segment `a..=b` crosses the plane.
    ///
    /// `None` when both endpoints lie strictly on the same side.
    pub fn intersect_segment(&self, a: DVec3, b: DVec3) -> Option<DVec3> {
        let da = self.signed_distance(a);
        let db = self.signed_distance(b);
        if da == 0.0 {
            return Some(a);
        }
        if db == 0.0 {
            return Some(b);
        }
        if (da > 0.0) == (db > 0.0) {
            return None;
        }
        let t = da / (da - db);
        Some(a + (b - a) * t)
    }
}
