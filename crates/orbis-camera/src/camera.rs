//! Perspective camera flying over the ground plane.

use glam::{DMat3, DMat4, DQuat, DVec3};
use orbis_tiles::lon_lat_to_world;
use tracing::debug;

use crate::GroundFrustum;

/// A perspective camera in world kilometers.
///
/// After changing `position`, `rotation`, `fov_y` or the viewport directly,
/// call [`GlobeCamera::update`] to refresh the cached frustum. The helper
/// methods do this themselves.
#[derive(Debug, Clone)]
pub struct GlobeCamera {
    /// Position in world space; `y` is the altitude above the ground.
    pub position: DVec3,
    /// Rotation as a unit quaternion. Looks down `-Z` in camera space.
    pub rotation: DQuat,
    /// Vertical field of view in radians.
    pub fov_y: f64,
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    frustum: GroundFrustum,
}

impl GlobeCamera {
    /// A camera one kilometer above the origin, looking straight down.
    pub fn new(fov_y_deg: f64, viewport_width: u32, viewport_height: u32) -> Self {
        let position = DVec3::Y;
        let mut camera = Self {
            position,
            rotation: DQuat::IDENTITY,
            fov_y: fov_y_deg.to_radians(),
            viewport_width,
            viewport_height,
            frustum: GroundFrustum::new(position, DVec3::NEG_Z, [DVec3::NEG_Z; 4]),
        };
        camera.look_at(DVec3::ZERO);
        camera
    }

    /// Width / height of the viewport.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.viewport_width) / f64::from(self.viewport_height.max(1))
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> DVec3 {
        self.rotation * DVec3::Y
    }

    /// The right direction vector (+X in camera space).
    pub fn right(&self) -> DVec3 {
        self.rotation * DVec3::X
    }

    /// Camera-to-world transform.
    pub fn transform(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation, self.position)
    }

    /// `1 / tan(fov_y / 2)`.
    pub fn fov_inv(&self) -> f64 {
        1.0 / (self.fov_y * 0.5).tan()
    }

    /// Half the viewport height in pixels.
    pub fn half_height(&self) -> f64 {
        f64::from(self.viewport_height) * 0.5
    }

    /// Height above the ground plane.
    pub fn altitude(&self) -> f64 {
        self.position.y
    }

    /// The frustum computed by the last [`GlobeCamera::update`].
    pub fn frustum(&self) -> &GroundFrustum {
        &self.frustum
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.update();
    }

    /// Rotate the camera to face `target`, keeping world +Y up.
    ///
    /// When looking straight up or down, world +X (north) is used as up.
    pub fn look_at(&mut self, target: DVec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };
        let world_up = if forward.cross(DVec3::Y).length_squared() < 1e-12 {
            DVec3::X
        } else {
            DVec3::Y
        };
        let right = forward.cross(world_up).normalize();
        let up = right.cross(forward);
        self.rotation = DQuat::from_mat3(&DMat3::from_cols(right, up, -forward)).normalize();
        self.update();
    }

    /// Place the camera south of a lon/lat target at `altitude` km and look at it.
    pub fn go_to_lon_lat(&mut self, lon: f64, lat: f64, altitude: f64) {
        let target = lon_lat_to_world(lon, lat);
        self.position = target + DVec3::new(-altitude, altitude, 0.0);
        self.look_at(target);
        debug!(lon, lat, altitude, "Camera moved");
    }

    /// Ground point under the screen center, if the camera looks downward.
    pub fn ground_target(&self) -> Option<DVec3> {
        self.frustum.ground_hit(self.forward())
    }

    /// Recompute the frustum from the current transform and viewport.
    pub fn update(&mut self) -> &GroundFrustum {
        let tan_y = (self.fov_y * 0.5).tan();
        let tan_x = tan_y * self.aspect_ratio();
        let corners = [
            DVec3::new(-tan_x, -tan_y, -1.0),
            DVec3::new(tan_x, -tan_y, -1.0),
            DVec3::new(tan_x, tan_y, -1.0),
            DVec3::new(-tan_x, tan_y, -1.0),
        ];
        let rays = corners.map(|corner| self.rotation * corner);
        self.frustum = GroundFrustum::new(self.position, self.forward(), rays);
        &self.frustum
    }
}
