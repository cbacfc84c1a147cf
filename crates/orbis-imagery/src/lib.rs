//! Tile imagery: image sources, the background loader and the texture cache.
//!
//! The [`TileTextureCache`] owns every tile image. Loads run on a
//! [`WorkerLoader`] pool and are folded back into the cache on the frame
//! thread by [`TileTextureCache::poll`], so the cache itself is never shared
//! across threads.

mod cache;
mod error;
mod loader;
mod source;
mod texture;

pub use cache::{TextureEvent, TileTextureCache};
pub use error::LoadError;
pub use loader::{LoadResult, TextureLoader, WorkerLoader};
pub use source::{HttpImageSource, OfflineImageSource, TILE_SIZE, TileImageSource};
pub use texture::{EMPTY_PIXEL, TextureState, TileTexture, empty_placeholder};
