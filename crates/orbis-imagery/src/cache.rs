//! Bounded cache of tile textures keyed by tile coordinate.

use std::collections::VecDeque;
use std::sync::Arc;

use orbis_config::ImageryConfig;
use orbis_tiles::TileCoord;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

use crate::{LoadResult, TextureLoader, TextureState, TileTexture, empty_placeholder};

/// State changes reported to the renderer by [`TileTextureCache::drain_events`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureEvent {
    /// A load finished in the given state (`Ready`, `Empty` or `Failed`).
    Loaded { coord: TileCoord, state: TextureState },
    /// A loaded texture was marked active or inactive.
    ActiveChanged { coord: TileCoord, active: bool },
    /// The texture was released and removed from the cache.
    Destroyed { coord: TileCoord },
}

/// Owns every tile texture and its load.
///
/// Each entry is tracked in exactly one index: `pending` while loading,
/// then `active` or `inactive` by its active flag. `inactive` keeps
/// insertion order; its front is the next eviction candidate. The capacity
/// is soft: when nothing is evictable, insertion proceeds anyway.
pub struct TileTextureCache {
    loader: Box<dyn TextureLoader>,
    entries: FxHashMap<TileCoord, TileTexture>,
    pending: FxHashSet<TileCoord>,
    active: FxHashSet<TileCoord>,
    inactive: VecDeque<TileCoord>,
    events: Vec<TextureEvent>,
    capacity: usize,
    min_zoom: u8,
    max_zoom: u8,
}

impl TileTextureCache {
    pub fn new(loader: Box<dyn TextureLoader>, capacity: usize, min_zoom: u8, max_zoom: u8) -> Self {
        Self {
            loader,
            entries: FxHashMap::default(),
            pending: FxHashSet::default(),
            active: FxHashSet::default(),
            inactive: VecDeque::new(),
            events: Vec::new(),
            capacity,
            min_zoom,
            max_zoom,
        }
    }

    pub fn from_config(config: &ImageryConfig, loader: Box<dyn TextureLoader>) -> Self {
        Self::new(loader, config.cache_capacity, config.min_zoom, config.max_zoom)
    }

    /// Whether textures are ever requested at `zoom`.
    pub fn supports_zoom(&self, zoom: u8) -> bool {
        (self.min_zoom..=self.max_zoom).contains(&zoom)
    }

    /// Return the entry for `coord`, creating it and starting its load if absent.
    ///
    /// Returns `None` for zoom levels outside the supported range. When the
    /// cache is full, the oldest evictable inactive entry is released first.
    pub fn request(&mut self, coord: TileCoord) -> Option<&TileTexture> {
        self.request_inner(coord, false)
    }

    /// Like [`Self::request`], but pins the entry so it is never evicted.
    pub fn request_fixed(&mut self, coord: TileCoord) -> Option<&TileTexture> {
        self.request_inner(coord, true)
    }

    fn request_inner(&mut self, coord: TileCoord, fixed: bool) -> Option<&TileTexture> {
        if !self.supports_zoom(coord.zoom) {
            trace!(%coord, "Texture request outside zoom range refused");
            return None;
        }
        if self.entries.contains_key(&coord) {
            let texture = self.entries.get_mut(&coord)?;
            if fixed {
                texture.pin();
            }
            return Some(texture);
        }

        if self.entries.len() >= self.capacity && !self.evict_one() {
            debug!(size = self.entries.len(), capacity = self.capacity, "Texture cache over capacity");
        }

        let mut texture = TileTexture::pending(coord, fixed);
        if self.loader.submit(coord) {
            self.pending.insert(coord);
        } else {
            warn!(%coord, "Texture loader rejected request");
            texture.finish(TextureState::Failed, None);
            self.inactive.push_back(coord);
        }
        Some(self.entries.entry(coord).or_insert(texture))
    }

    pub fn get(&self, coord: &TileCoord) -> Option<&TileTexture> {
        self.entries.get(coord)
    }

    /// Mark a texture active or inactive. Returns `true` if the flag changed.
    ///
    /// Ignored while the texture is pending, and a fixed texture that is
    /// active cannot be deactivated.
    pub fn set_active(&mut self, coord: &TileCoord, active: bool) -> bool {
        let Some(texture) = self.entries.get_mut(coord) else {
            return false;
        };
        if texture.is_pending() || texture.active() == active {
            return false;
        }
        if texture.active() && texture.fixed() {
            return false;
        }
        texture.set_active(active);
        if active {
            self.inactive.retain(|c| c != coord);
            self.active.insert(*coord);
        } else {
            self.active.remove(coord);
            self.inactive.push_back(*coord);
        }
        self.events.push(TextureEvent::ActiveChanged {
            coord: *coord,
            active,
        });
        true
    }

    /// Deactivate every active, non-fixed texture.
    pub fn deactivate_all(&mut self) {
        let mut active: Vec<TileCoord> = self.active.iter().copied().collect();
        active.sort();
        for coord in active {
            self.set_active(&coord, false);
        }
    }

    /// Release a texture and drop it from every index. No-op for fixed entries.
    pub fn destroy(&mut self, coord: &TileCoord) -> bool {
        match self.entries.get(coord) {
            Some(texture) if !texture.fixed() => {}
            _ => return false,
        }
        if let Some(mut texture) = self.entries.remove(coord) {
            texture.release();
        }
        self.pending.remove(coord);
        self.active.remove(coord);
        self.inactive.retain(|c| c != coord);
        self.events.push(TextureEvent::Destroyed { coord: *coord });
        true
    }

    fn evict_one(&mut self) -> bool {
        let candidate = self.inactive.iter().copied().find(|coord| {
            self.entries
                .get(coord)
                .is_some_and(|t| !t.fixed() && !t.active() && !t.is_pending())
        });
        match candidate {
            Some(coord) => {
                trace!(%coord, "Evicting texture");
                self.destroy(&coord)
            }
            None => false,
        }
    }

    /// Fold completed loads into the cache. Returns the number applied.
    ///
    /// Results for textures destroyed while loading are discarded.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        for result in self.loader.drain_results() {
            if self.complete(result) {
                applied += 1;
            }
        }
        applied
    }

    fn complete(&mut self, result: LoadResult) -> bool {
        let LoadResult { coord, outcome } = result;
        let Some(texture) = self.entries.get_mut(&coord).filter(|t| t.is_pending()) else {
            trace!(%coord, "Discarding load for released texture");
            return false;
        };
        match outcome {
            Ok(Some(image)) => texture.finish(TextureState::Ready, Some(Arc::new(image))),
            Ok(None) => texture.finish(TextureState::Empty, Some(empty_placeholder())),
            Err(err) => {
                warn!(%coord, error = %err, "Tile load failed");
                texture.finish(TextureState::Failed, None);
            }
        }
        let state = texture.state();
        self.pending.remove(&coord);
        self.inactive.push_back(coord);
        self.events.push(TextureEvent::Loaded { coord, state });
        true
    }

    /// Take the events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<TextureEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn inactive_count(&self) -> usize {
        self.inactive.len()
    }

    /// Loads still running in the loader.
    pub fn in_flight_count(&self) -> usize {
        self.loader.in_flight_count()
    }
}
