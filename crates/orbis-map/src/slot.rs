//! Render slots and texture sub-rectangles.

use orbis_tiles::{GroundRect, QUADRANT_OFFSETS, TileCoord};

/// Where a slot's tile lies inside the texture it samples.
///
/// `u` runs along world X and `v` along world Z, both in `[0, 1)`; `scale`
/// is the fraction of the texture's extent covered by the tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureOffset {
    pub u: f64,
    pub v: f64,
    pub scale: f64,
}

impl TextureOffset {
    /// The whole texture.
    pub const IDENTITY: Self = Self {
        u: 0.0,
        v: 0.0,
        scale: 1.0,
    };
}

impl Default for TextureOffset {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Quadrant indices gathered while walking from a cell up to an ancestor.
///
/// Bounded by the deepest zoom a tile coordinate can have, so the walk
/// never allocates.
#[derive(Clone, Debug)]
pub struct QuadrantStack {
    items: [u8; Self::CAPACITY],
    len: usize,
}

impl Default for QuadrantStack {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadrantStack {
    pub const CAPACITY: usize = TileCoord::MAX_ZOOM as usize + 1;

    pub fn new() -> Self {
        Self {
            items: [0; Self::CAPACITY],
            len: 0,
        }
    }

    /// Push the quadrant of the cell just left behind. Returns `false` when full.
    pub fn push(&mut self, quadrant: u8) -> bool {
        if self.len == Self::CAPACITY {
            return false;
        }
        self.items[self.len] = quadrant;
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fold the gathered quadrants, outermost first, into an offset inside
    /// the ancestor's texture.
    pub fn fold(&self) -> TextureOffset {
        let mut offset = TextureOffset {
            u: 0.0,
            v: 0.0,
            scale: 1.0 / (1u64 << self.len) as f64,
        };
        let mut f = 1.0;
        for &quadrant in self.items[..self.len].iter().rev() {
            f *= 0.5;
            let (du, dv) = QUADRANT_OFFSETS[quadrant as usize];
            offset.u += du * f;
            offset.v += dv * f;
        }
        offset
    }
}

/// One element of the fixed render-slot pool.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSlot {
    index: usize,
    coord: Option<TileCoord>,
    level: u8,
    rect: GroundRect,
    visible: bool,
    texture: Option<TileCoord>,
    offset: TextureOffset,
}

impl RenderSlot {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            coord: None,
            level: 0,
            rect: GroundRect::new(0.0, 0.0, 0.0, 0.0),
            visible: false,
            texture: None,
            offset: TextureOffset::IDENTITY,
        }
    }

    /// Position in the pool.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Tile shown by this slot.
    pub fn coord(&self) -> Option<TileCoord> {
        self.coord
    }

    /// Depth of the shown cell below its quadtree root.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Ground rectangle to draw.
    pub fn rect(&self) -> &GroundRect {
        &self.rect
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Tile whose texture is sampled; may be an ancestor of [`Self::coord`].
    pub fn texture(&self) -> Option<TileCoord> {
        self.texture
    }

    pub fn offset(&self) -> TextureOffset {
        self.offset
    }

    /// Whether an ancestor's texture stands in for the tile's own.
    pub fn is_proxy(&self) -> bool {
        self.texture.is_some() && self.texture != self.coord
    }

    pub(crate) fn show(&mut self, coord: TileCoord, level: u8, rect: GroundRect) {
        self.coord = Some(coord);
        self.level = level;
        self.rect = rect;
        self.visible = true;
        self.texture = None;
        self.offset = TextureOffset::IDENTITY;
    }

    pub(crate) fn bind(&mut self, texture: TileCoord, offset: TextureOffset) {
        self.texture = Some(texture);
        self.offset = offset;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
        self.texture = None;
        self.offset = TextureOffset::IDENTITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stack_is_identity() {
        assert_eq!(QuadrantStack::new().fold(), TextureOffset::IDENTITY);
    }

    /// One level up: the tile is a quarter at its quadrant's corner.
    #[test]
    fn test_single_level_offsets() {
        for (quadrant, (du, dv)) in QUADRANT_OFFSETS.iter().enumerate() {
            let mut stack = QuadrantStack::new();
            stack.push(quadrant as u8);
            let offset = stack.fold();
            assert_eq!(offset.scale, 0.5);
            assert_eq!((offset.u, offset.v), (du * 0.5, dv * 0.5));
        }
    }

    /// The quadrant nearest the ancestor weighs the most.
    #[test]
    fn test_fold_order_outermost_first() {
        let mut stack = QuadrantStack::new();
        stack.push(1); // cell within its parent: +X-Z
        stack.push(2); // parent within the grandparent: +X+Z
        let offset = stack.fold();
        assert_eq!(offset.scale, 0.25);
        assert_eq!(offset.u, 0.75);
        assert_eq!(offset.v, 0.5);
    }

    #[test]
    fn test_stack_capacity() {
        let mut stack = QuadrantStack::new();
        for _ in 0..QuadrantStack::CAPACITY {
            assert!(stack.push(0));
        }
        assert!(!stack.push(0));
        assert_eq!(stack.len(), QuadrantStack::CAPACITY);
    }

    #[test]
    fn test_slot_proxy_detection() {
        let mut slot = RenderSlot::new(0);
        let coord = TileCoord::new(4, 4, 5);
        slot.show(coord, 3, GroundRect::new(0.0, 0.0, 1.0, 1.0));
        assert!(!slot.is_proxy());
        slot.bind(coord, TextureOffset::IDENTITY);
        assert!(!slot.is_proxy());
        slot.bind(coord.parent().unwrap(), TextureOffset::IDENTITY);
        assert!(slot.is_proxy());
        slot.hide();
        assert!(!slot.visible());
        assert!(slot.texture().is_none());
    }
}
