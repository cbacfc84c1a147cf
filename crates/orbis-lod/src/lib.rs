//! Screen-space-error level-of-detail selection over ground quadtrees.
//!
//! Each frame the [`LodSelector`] walks every root quadtree, subdividing
//! cells whose projected texel size exceeds the pixel bias, and returns the
//! flat list of cells to draw. [`order_visible`] then ranks that list so it
//! can be truncated to the render budget.

mod metric;
mod ordering;
mod selector;

pub use metric::{INV_255, project_radius, screen_error, texel_size};
pub use ordering::{DISTANCE_TIE_KM, order_visible};
pub use selector::{LodSelector, VisibleCell};

/// Zoom level of the quadtree roots.
pub const START_LEVEL: u8 = 2;

/// Deepest zoom level the selector descends to.
pub const MAX_LEVEL: u8 = 15;

/// Maximum subdivision depth below a root.
pub const MAX_DEPTH: u8 = MAX_LEVEL - START_LEVEL;
