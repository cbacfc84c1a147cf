//! Side-plane frustum clipped against ground rectangles.
//!
//! Near and far planes are not modeled. The intersector only estimates which
//! parts of a rectangle are in view; it does not clip polygons exactly.

use glam::DVec3;
use orbis_tiles::GroundRect;

use crate::Plane;

/// Capacity of the caller-supplied intersection buffer.
pub const MAX_INTERSECTIONS: usize = 16;

/// The camera's view volume reduced to four side planes and four corner rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundFrustum {
    /// Side planes ordered bottom, right, top, left. Normals point inward.
    pub planes: [Plane; 4],
    /// Camera position; every side plane passes through it.
    pub origin: DVec3,
    /// World-space directions through the screen corners, ordered
    /// bottom-left, bottom-right, top-right, top-left. Not normalized.
    pub corner_rays: [DVec3; 4],
}

impl GroundFrustum {
    /// Build the frustum from the camera position, its view direction and
    /// the four corner rays.
    ///
    /// Plane `i` contains rays `i` and `i + 1`, so planes `i ± 1` are the two
    /// planes adjacent to it.
    pub fn new(origin: DVec3, forward: DVec3, corner_rays: [DVec3; 4]) -> Self {
        let planes = std::array::from_fn(|i| {
            let mut normal = corner_rays[i].cross(corner_rays[(i + 1) % 4]);
            if normal.dot(forward) < 0.0 {
                normal = -normal;
            }
            Plane::from_normal_and_point(normal, origin)
        });
        Self {
            planes,
            origin,
            corner_rays,
        }
    }

    /// True if `point` is inside all four side planes.
    pub fn contains_point(&self, point: DVec3) -> bool {
        self.planes.iter().all(|plane| plane.contains_point(point))
    }

    /// Where a ray from the camera along `direction` meets the ground plane.
    pub fn ground_hit(&self, direction: DVec3) -> Option<DVec3> {
        if direction.y >= 0.0 {
            return None;
        }
        let t = -self.origin.y / direction.y;
        if t < 0.0 {
            return None;
        }
        Some(self.origin + direction * t)
    }

    /// Collect points of `rect` that the camera can see into `out`.
    ///
    /// Rectangle corners inside the frustum come first; if all four are
    /// inside, only they are returned. Otherwise edge crossings with each
    /// side plane are added when they also lie inside both adjacent planes,
    /// followed by ground hits of the corner rays that land inside `rect`.
    /// Points beyond the buffer capacity are dropped. Returns the number of
    /// points written.
    pub fn intersect_rect(&self, rect: &GroundRect, out: &mut [DVec3; MAX_INTERSECTIONS]) -> usize {
        let mut count = 0;
        let mut push = |point: DVec3, count: &mut usize| {
            if *count < MAX_INTERSECTIONS {
                out[*count] = point;
                *count += 1;
            }
        };

        let corners = rect.corners();
        let inside = corners.map(|corner| self.contains_point(corner));
        for (corner, _) in corners.iter().zip(inside).filter(|(_, inside)| *inside) {
            push(*corner, &mut count);
        }
        if count == 4 {
            return count;
        }

        for i in 0..4 {
            let j = (i + 1) % 4;
            if inside[i] && inside[j] {
                continue;
            }
            for (p, plane) in self.planes.iter().enumerate() {
                let Some(hit) = plane.intersect_segment(corners[i], corners[j]) else {
                    continue;
                };
                let next = &self.planes[(p + 1) % 4];
                let prev = &self.planes[(p + 3) % 4];
                if next.contains_point(hit) && prev.contains_point(hit) {
                    push(hit, &mut count);
                }
            }
        }

        for ray in self.corner_rays {
            if let Some(hit) = self.ground_hit(ray).filter(|hit| rect.contains(*hit)) {
                push(hit, &mut count);
            }
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Camera `height` above the origin looking straight down, north (+X) up,
    /// east (+Z) right, with a square field of view of half-angle `atan(tan)`.
    fn looking_down(height: f64, tan: f64) -> GroundFrustum {
        let forward = DVec3::NEG_Y;
        let right = DVec3::Z;
        let up = DVec3::X;
        let rays = [
            forward - right * tan - up * tan,
            forward + right * tan - up * tan,
            forward + right * tan + up * tan,
            forward - right * tan + up * tan,
        ];
        GroundFrustum::new(DVec3::new(0.0, height, 0.0), forward, rays)
    }

    fn buffer() -> [DVec3; MAX_INTERSECTIONS] {
        [DVec3::ZERO; MAX_INTERSECTIONS]
    }

    #[test]
    fn test_planes_point_inward() {
        let frustum = looking_down(10.0, 1.0);
        assert!(frustum.contains_point(DVec3::ZERO));
        assert!(frustum.contains_point(DVec3::new(9.9, 0.0, -9.9)));
        assert!(!frustum.contains_point(DVec3::new(10.1, 0.0, 0.0)));
        assert!(!frustum.contains_point(DVec3::new(0.0, 20.0, 0.0)));
    }

    /// A rectangle fully in view yields exactly its four corners.
    #[test]
    fn test_full_containment_returns_corners() {
        let frustum = looking_down(10.0, 1.0);
        let rect = GroundRect::new(-1.0, -1.0, 2.0, 2.0);
        let mut out = buffer();
        assert_eq!(frustum.intersect_rect(&rect, &mut out), 4);
        assert_eq!(&out[..4], &rect.corners());
    }

    #[test]
    fn test_rect_outside_returns_nothing() {
        let frustum = looking_down(10.0, 1.0);
        let rect = GroundRect::new(100.0, 100.0, 5.0, 5.0);
        let mut out = buffer();
        assert_eq!(frustum.intersect_rect(&rect, &mut out), 0);
    }

    /// A rectangle surrounding the whole view is found through the corner rays.
    #[test]
    fn test_surrounding_rect_returns_ray_hits() {
        let frustum = looking_down(10.0, 1.0);
        let rect = GroundRect::new(-1000.0, -1000.0, 2000.0, 2000.0);
        let mut out = buffer();
        let count = frustum.intersect_rect(&rect, &mut out);
        assert_eq!(count, 4);
        for point in &out[..count] {
            assert!((point.x.abs() - 10.0).abs() < 1e-9, "hit {point:?}");
            assert!((point.z.abs() - 10.0).abs() < 1e-9, "hit {point:?}");
            assert!(point.y.abs() < 1e-9);
        }
    }

    /// One corner in view: that corner, two edge crossings and one ray hit.
    #[test]
    fn test_partial_overlap_mixes_sources() {
        let frustum = looking_down(10.0, 1.0);
        let rect = GroundRect::new(0.0, 0.0, 100.0, 100.0);
        let mut out = buffer();
        let count = frustum.intersect_rect(&rect, &mut out);
        assert_eq!(count, 4);
        assert_eq!(out[0], DVec3::ZERO);
        let has = |p: DVec3| out[..count].iter().any(|q| (*q - p).length() < 1e-9);
        assert!(has(DVec3::new(10.0, 0.0, 0.0)));
        assert!(has(DVec3::new(0.0, 0.0, 10.0)));
        assert!(has(DVec3::new(10.0, 0.0, 10.0)));
    }

    #[test]
    fn test_ground_hit_ignores_rays_above_horizon() {
        let frustum = looking_down(10.0, 1.0);
        assert!(frustum.ground_hit(DVec3::new(1.0, 0.5, 0.0)).is_none());
        assert!(frustum.ground_hit(DVec3::X).is_none());
        let hit = frustum.ground_hit(DVec3::new(1.0, -1.0, 0.0)).unwrap();
        assert!((hit - DVec3::new(10.0, 0.0, 0.0)).length() < 1e-12);
    }
}
