//! Scripted camera descent toward a fixed ground target.
//!
//! [`Descent`] keeps the camera on the same lon/lat target and shrinks its
//! altitude by a fixed fraction every frame, so successive frames exercise
//! deeper and deeper levels of detail.

use orbis_camera::GlobeCamera;
use orbis_config::CameraConfig;

/// Lowest altitude the descent approaches, in kilometers.
pub const MIN_ALTITUDE_KM: f64 = 0.05;

/// Camera flight state for the headless frame loop.
#[derive(Debug, Clone)]
pub struct Descent {
    pub lon: f64,
    pub lat: f64,
    /// Current altitude in kilometers.
    pub altitude: f64,
    /// Fraction of the altitude lost per frame, in `[0, 1)`.
    pub rate: f64,
}

impl Descent {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            lon: config.start_lon,
            lat: config.start_lat,
            altitude: config.start_altitude_km.max(MIN_ALTITUDE_KM),
            rate: config.descent_per_frame.clamp(0.0, 0.99),
        }
    }

    /// Put the camera at the current altitude over the target.
    pub fn place(&self, camera: &mut GlobeCamera) {
        camera.go_to_lon_lat(self.lon, self.lat, self.altitude);
    }

    /// Descend one frame and move the camera.
    pub fn step(&mut self, camera: &mut GlobeCamera) {
        self.altitude = (self.altitude * (1.0 - self.rate)).max(MIN_ALTITUDE_KM);
        self.place(camera);
    }
}
