//! Binding visible cells to render slots and textures.

use orbis_imagery::TileTextureCache;
use orbis_lod::VisibleCell;
use orbis_tiles::{Quadtree, TileCoord};
use rustc_hash::FxHashSet;

use crate::{QuadrantStack, RenderSlot};

/// Counts from one [`TileSlotAssigner::assign`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssignStats {
    /// Slots shown this frame.
    pub shown: usize,
    /// Slots sampling their own tile's texture.
    pub own: usize,
    /// Slots sampling an ancestor's texture.
    pub proxied: usize,
    /// Shown slots with no loaded texture at all.
    pub empty: usize,
}

/// Maps the ranked visible cells onto a fixed pool of render slots.
#[derive(Clone, Debug)]
pub struct TileSlotAssigner {
    slots: Vec<RenderSlot>,
    bound: FxHashSet<TileCoord>,
}

impl TileSlotAssigner {
    pub fn new(pool_size: usize) -> Self {
        Self {
            slots: (0..pool_size).map(RenderSlot::new).collect(),
            bound: FxHashSet::default(),
        }
    }

    pub fn slots(&self) -> &[RenderSlot] {
        &self.slots
    }

    pub fn pool_size(&self) -> usize {
        self.slots.len()
    }

    /// Slots the renderer should draw this frame.
    pub fn visible_slots(&self) -> impl Iterator<Item = &RenderSlot> {
        self.slots.iter().filter(|slot| slot.visible())
    }

    /// Bind `visible` (already ranked and truncated) to the slot pool.
    ///
    /// Each cell's own texture is requested. The slot samples the first
    /// loaded texture found walking from the cell up through its ancestors,
    /// with the sub-rectangle that reproduces the cell's area. Bound
    /// textures are marked active; textures bound last frame but not this
    /// one are marked inactive afterwards. Cells beyond the pool are
    /// dropped and unused slots hidden.
    pub fn assign(
        &mut self,
        visible: &[VisibleCell],
        trees: &[Quadtree],
        cache: &mut TileTextureCache,
    ) -> AssignStats {
        let mut stats = AssignStats::default();
        let mut bound = FxHashSet::default();

        for (slot, visible_cell) in self.slots.iter_mut().zip(visible) {
            let tree = &trees[visible_cell.tree];
            slot.show(visible_cell.coord, visible_cell.level, visible_cell.rect);
            stats.shown += 1;

            cache.request(visible_cell.coord);

            let mut stack = QuadrantStack::new();
            let mut cell = tree.cell(visible_cell.cell);
            loop {
                let coord = cell.coord();
                if cache.get(&coord).is_some_and(|t| t.is_loaded()) {
                    cache.set_active(&coord, true);
                    slot.bind(coord, stack.fold());
                    bound.insert(coord);
                    if stack.is_empty() {
                        stats.own += 1;
                    } else {
                        stats.proxied += 1;
                    }
                    break;
                }
                let Some(parent) = cell.parent().filter(|_| stack.push(cell.quadrant())) else {
                    stats.empty += 1;
                    break;
                };
                cell = tree.cell(parent);
            }
        }

        for slot in self.slots.iter_mut().skip(stats.shown) {
            slot.hide();
        }

        for coord in self.bound.difference(&bound) {
            cache.set_active(coord, false);
        }
        self.bound = bound;
        stats
    }
}
