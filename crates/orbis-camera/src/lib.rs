//! Globe camera and the ground-rectangle frustum intersector.
//!
//! The camera reduces its view volume to four side planes and four corner
//! rays. [`GroundFrustum::intersect_rect`] uses them to find the points of a
//! ground rectangle the camera can see, which drive the LOD decision.

mod camera;
mod frustum;
mod plane;

pub use camera::GlobeCamera;
pub use frustum::{GroundFrustum, MAX_INTERSECTIONS};
pub use plane::Plane;
