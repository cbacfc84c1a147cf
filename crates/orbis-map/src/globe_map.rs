//! The per-frame driver tying selection, ranking and slot assignment together.

use orbis_camera::GlobeCamera;
use orbis_config::{Config, LodConfig, MAX_CELL_BIAS, MAX_TILES, MIN_CELL_BIAS, MIN_TILES};
use orbis_imagery::{TextureEvent, TextureLoader, TileTextureCache};
use orbis_lod::{LodSelector, VisibleCell, order_visible};
use orbis_tiles::{EarthRoots, GeoBounds, Quadtree, TileCoord, earth_bounds, sane_earth};
use tracing::{debug, info};

use crate::{CellOverlay, RenderSlot, TileSlotAssigner};

/// Summary of one [`GlobeMap::update`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    /// Cells selected before truncation to the tile budget.
    pub visible_cells: usize,
    /// Slots shown.
    pub drawn: usize,
    pub own_texture: usize,
    pub ancestor_proxy: usize,
    /// Shown slots with nothing to sample.
    pub empty: usize,
    /// Loads folded into the cache at the start of the frame.
    pub loads_applied: usize,
    pub cache_size: usize,
    pub pending_loads: usize,
    /// Deepest subdivision reached in any quadtree so far.
    pub tree_depth: u8,
}

/// Root quadtrees, texture cache and render slots of the whole globe.
pub struct GlobeMap {
    start_level: u8,
    trees: Vec<Quadtree>,
    roots: EarthRoots,
    bounds: Option<GeoBounds>,
    selector: LodSelector,
    max_tiles: usize,
    cache: TileTextureCache,
    assigner: TileSlotAssigner,
    visible: Vec<VisibleCell>,
    overlay: Vec<CellOverlay>,
    frame: u64,
}

impl GlobeMap {
    /// Build one quadtree per divisible root tile and start loading the
    /// root textures.
    ///
    /// Root textures (divisible and static) are pinned so the ancestor
    /// fallback always ends at a resident image.
    pub fn new(config: &Config, loader: Box<dyn TextureLoader>) -> Self {
        let start_level = config.lod.effective_start_level();
        let roots = sane_earth(start_level);
        let bounds = earth_bounds(&roots);
        let trees: Vec<Quadtree> = roots.divisible.iter().copied().map(Quadtree::web_mercator).collect();
        let mut cache = TileTextureCache::from_config(&config.imagery, loader);
        for &coord in roots.divisible.iter().chain(&roots.static_tiles) {
            if cache.request_fixed(coord).is_none() {
                debug!(%coord, "Root texture outside imagery zoom range");
            }
        }

        info!(
            trees = trees.len(),
            static_tiles = roots.static_tiles.len(),
            start_level,
            "Globe map built"
        );

        Self {
            start_level,
            trees,
            roots,
            bounds,
            selector: LodSelector::from_config(&config.lod),
            max_tiles: config.lod.effective_max_tiles(),
            cache,
            assigner: TileSlotAssigner::new(MAX_TILES),
            visible: Vec::new(),
            overlay: Vec::new(),
            frame: 0,
        }
    }

    /// Run one frame against `camera`, whose frustum must be current.
    pub fn update(&mut self, camera: &GlobeCamera) -> FrameStats {
        self.frame += 1;
        let loads_applied = self.cache.poll();

        let mut visible = self.selector.select(&mut self.trees, camera);
        let visible_cells = visible.len();
        order_visible(&mut visible, self.max_tiles);

        let assigned = self.assigner.assign(&visible, &self.trees, &mut self.cache);
        self.overlay = visible
            .iter()
            .map(|cell| CellOverlay::new(cell.coord, cell.rect, cell.level))
            .collect();
        self.visible = visible;

        let stats = FrameStats {
            frame: self.frame,
            visible_cells,
            drawn: assigned.shown,
            own_texture: assigned.own,
            ancestor_proxy: assigned.proxied,
            empty: assigned.empty,
            loads_applied,
            cache_size: self.cache.len(),
            pending_loads: self.cache.pending_count(),
            tree_depth: self.tree_depth(),
        };
        debug!(?stats, "Frame updated");
        stats
    }

    /// Deepest level below a root that any quadtree has been split to.
    pub fn tree_depth(&self) -> u8 {
        self.trees.iter().map(Quadtree::depth).max().unwrap_or(0)
    }

    /// Zoom level of the quadtree roots.
    pub fn start_level(&self) -> u8 {
        self.start_level
    }

    /// Apply a changed LOD configuration; takes effect next frame.
    ///
    /// The root level is fixed when the map is built, so the depth cap is
    /// measured from it. Lowering the cap drops all subdivisions so cells
    /// below the new cap are released.
    pub fn apply_lod_config(&mut self, config: &LodConfig) {
        let max_depth = config.effective_max_level().saturating_sub(self.start_level);
        if max_depth < self.selector.max_depth() {
            for tree in &mut self.trees {
                tree.reset();
            }
            debug!(max_depth, "Quadtrees reset for shallower depth cap");
        }
        self.selector = LodSelector::new(config.effective_bias(), max_depth);
        self.max_tiles = config.effective_max_tiles();
        debug!(bias = self.selector.bias(), max_tiles = self.max_tiles, "LOD settings changed");
    }

    /// Set the pixel-error bias, clamped to the accepted range.
    pub fn set_bias(&mut self, bias: f64) {
        self.selector.set_bias(bias.clamp(MIN_CELL_BIAS, MAX_CELL_BIAS));
    }

    pub fn bias(&self) -> f64 {
        self.selector.bias()
    }

    /// Set the tile budget, clamped to the accepted range.
    pub fn set_max_tiles(&mut self, max_tiles: usize) {
        self.max_tiles = max_tiles.clamp(MIN_TILES, MAX_TILES);
    }

    pub fn max_tiles(&self) -> usize {
        self.max_tiles
    }

    /// The whole slot pool, visible or not.
    pub fn slots(&self) -> &[RenderSlot] {
        self.assigner.slots()
    }

    pub fn visible_slots(&self) -> impl Iterator<Item = &RenderSlot> {
        self.assigner.visible_slots()
    }

    /// Cells drawn last frame, ranked.
    pub fn visible(&self) -> &[VisibleCell] {
        &self.visible
    }

    /// Outlines of the cells drawn last frame.
    pub fn overlay(&self) -> &[CellOverlay] {
        &self.overlay
    }

    pub fn trees(&self) -> &[Quadtree] {
        &self.trees
    }

    /// Thin polar tiles drawn without subdivision.
    pub fn static_tiles(&self) -> &[TileCoord] {
        &self.roots.static_tiles
    }

    /// Lon/lat extent covered by the map.
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }

    pub fn cache(&self) -> &TileTextureCache {
        &self.cache
    }

    /// Texture state changes since the last call, for the renderer.
    pub fn drain_texture_events(&mut self) -> Vec<TextureEvent> {
        self.cache.drain_events()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
