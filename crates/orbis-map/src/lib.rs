//! Per-frame tile map: LOD selection, slot assignment and texture upkeep.
//!
//! [`GlobeMap::update`] runs one frame: it folds finished loads into the
//! texture cache, selects and ranks the visible cells, and binds each one to
//! a [`RenderSlot`], substituting a loaded ancestor's image when the cell's
//! own texture is not ready yet.

mod assigner;
mod globe_map;
mod overlay;
mod slot;

pub use assigner::{AssignStats, TileSlotAssigner};
pub use globe_map::{FrameStats, GlobeMap};
pub use overlay::{CellOverlay, level_hue};
pub use slot::{QuadrantStack, RenderSlot, TextureOffset};
