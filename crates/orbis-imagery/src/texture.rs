//! Per-tile texture entries.

use std::sync::{Arc, OnceLock};

use image::{Rgba, RgbaImage};
use orbis_tiles::TileCoord;

/// The single pixel of the placeholder used for tiles without data.
pub const EMPTY_PIXEL: [u8; 4] = [1, 134, 150, 0];

/// Shared 1×1 placeholder image handed out for every not-found tile.
pub fn empty_placeholder() -> Arc<RgbaImage> {
    static EMPTY: OnceLock<Arc<RgbaImage>> = OnceLock::new();
    Arc::clone(EMPTY.get_or_init(|| Arc::new(RgbaImage::from_pixel(1, 1, Rgba(EMPTY_PIXEL)))))
}

/// Load state of a [`TileTexture`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureState {
    /// The load is in flight.
    Pending,
    /// The tile image is available.
    Ready,
    /// The service has no data for the tile; the placeholder is used.
    Empty,
    /// The load failed; there is no image.
    Failed,
    /// Released; terminal.
    Destroyed,
}

/// A cached tile image and its bookkeeping flags.
#[derive(Clone, Debug)]
pub struct TileTexture {
    coord: TileCoord,
    fixed: bool,
    active: bool,
    state: TextureState,
    image: Option<Arc<RgbaImage>>,
}

impl TileTexture {
    pub(crate) fn pending(coord: TileCoord, fixed: bool) -> Self {
        Self {
            coord,
            fixed,
            active: false,
            state: TextureState::Pending,
            image: None,
        }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Pinned: never evicted, destroyed or deactivated once active.
    pub fn fixed(&self) -> bool {
        self.fixed
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> TextureState {
        self.state
    }

    /// The decoded image, or the shared placeholder for empty tiles.
    pub fn image(&self) -> Option<&Arc<RgbaImage>> {
        self.image.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.state == TextureState::Pending
    }

    /// True once an image (real or placeholder) can be sampled.
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, TextureState::Ready | TextureState::Empty)
    }

    pub(crate) fn pin(&mut self) {
        self.fixed = true;
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn finish(&mut self, state: TextureState, image: Option<Arc<RgbaImage>>) {
        self.state = state;
        self.image = image;
    }

    pub(crate) fn release(&mut self) {
        self.state = TextureState::Destroyed;
        self.active = false;
        self.image = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_shared() {
        let a = empty_placeholder();
        let b = empty_placeholder();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.dimensions(), (1, 1));
        assert_eq!(a.get_pixel(0, 0).0, EMPTY_PIXEL);
    }

    #[test]
    fn test_pending_texture_has_no_image() {
        let texture = TileTexture::pending(TileCoord::new(1, 2, 3), false);
        assert!(texture.is_pending());
        assert!(!texture.is_loaded());
        assert!(texture.image().is_none());
        assert!(!texture.active());
    }

    #[test]
    fn test_failed_is_not_loaded() {
        let mut texture = TileTexture::pending(TileCoord::new(1, 2, 3), false);
        texture.finish(TextureState::Failed, None);
        assert!(!texture.is_loaded());
        assert!(!texture.is_pending());
    }

    #[test]
    fn test_release_clears_image() {
        let mut texture = TileTexture::pending(TileCoord::new(1, 2, 3), false);
        texture.finish(TextureState::Empty, Some(empty_placeholder()));
        assert!(texture.is_loaded());
        texture.release();
        assert_eq!(texture.state(), TextureState::Destroyed);
        assert!(texture.image().is_none());
    }
}
