//! Projected-pixel error metric.

use glam::DVec3;
use orbis_tiles::GroundRect;

/// Reciprocal of the tile image resolution (256 texels, 255 intervals).
pub const INV_255: f64 = 1.0 / 255.0;

/// World size of one source texel of a tile covering `rect`.
pub fn texel_size(rect: &GroundRect) -> f64 {
    rect.max_extent() * INV_255
}

/// Project a sphere of `radius` seen at `eye_distance` to a pixel radius.
///
/// `fov_inv` is `1 / tan(fov_y / 2)` and `half_height` half the viewport
/// height in pixels. Distances at or inside the sphere give infinity.
pub fn project_radius(radius: f64, eye_distance: f64, fov_inv: f64, half_height: f64) -> f64 {
    let d2 = eye_distance * eye_distance - radius * radius;
    if d2 <= 0.0 {
        return f64::INFINITY;
    }
    fov_inv * radius / d2.sqrt() * half_height
}

/// Worst-case projected texel radius over the visible points of a cell.
///
/// A point closer to the eye than one texel means the camera is inside the
/// tile, which counts as infinite error.
pub fn screen_error(
    points: &[DVec3],
    eye: DVec3,
    texel: f64,
    fov_inv: f64,
    half_height: f64,
) -> f64 {
    let mut max = 0.0_f64;
    for point in points {
        let distance = point.distance(eye);
        if distance < texel {
            return f64::INFINITY;
        }
        max = max.max(project_radius(texel, distance, fov_inv, half_height));
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texel_size_uses_larger_extent() {
        let rect = GroundRect::new(0.0, 0.0, 51.0, 255.0);
        assert!((texel_size(&rect) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_project_radius_known_value() {
        // r = 3, d = 5: r / sqrt(d² - r²) = 3 / 4.
        let px = project_radius(3.0, 5.0, 2.0, 100.0);
        assert!((px - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_project_radius_shrinks_with_distance() {
        let near = project_radius(1.0, 10.0, 1.0, 360.0);
        let far = project_radius(1.0, 100.0, 1.0, 360.0);
        assert!(near > far);
        assert!(project_radius(1.0, 1.0, 1.0, 360.0).is_infinite());
    }

    /// The nearest point dominates the worst-case error.
    #[test]
    fn test_screen_error_takes_maximum() {
        let eye = DVec3::new(0.0, 10.0, 0.0);
        let points = [DVec3::new(0.0, 0.0, 100.0), DVec3::ZERO];
        let err = screen_error(&points, eye, 1.0, 1.0, 100.0);
        let expected = project_radius(1.0, 10.0, 1.0, 100.0);
        assert!((err - expected).abs() < 1e-12);
    }

    #[test]
    fn test_screen_error_infinite_inside_texel() {
        let eye = DVec3::new(0.0, 0.5, 0.0);
        let points = [DVec3::new(0.0, 0.0, 100.0), DVec3::ZERO];
        assert!(screen_error(&points, eye, 1.0, 1.0, 100.0).is_infinite());
    }

    #[test]
    fn test_screen_error_no_points() {
        assert_eq!(screen_error(&[], DVec3::Y, 1.0, 1.0, 100.0), 0.0);
    }
}
