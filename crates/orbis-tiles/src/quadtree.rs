//! Arena-backed ground quadtree with lazy 4-way subdivision.

use std::sync::Arc;

use glam::DVec3;

use crate::{GroundRect, TileCoord, TilingScheme, WebMercator};

/// Half-step `(x, z)` offset of each child quadrant inside its parent.
///
/// Index 0 is the `-X-Z` corner, then counter-clockwise: `+X-Z`, `+X+Z`, `-X+Z`.
pub const QUADRANT_OFFSETS: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

/// Stable index of a cell inside its [`Quadtree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u32);

impl CellId {
    /// The root cell of every quadtree.
    pub const ROOT: CellId = CellId(0);

    /// Position in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the quadtree: a tile at a subdivision level with a fixed
/// ground rectangle.
#[derive(Clone, Debug)]
pub struct Cell {
    id: CellId,
    coord: TileCoord,
    level: u8,
    quadrant: u8,
    rect: GroundRect,
    center: DVec3,
    parent: Option<CellId>,
    children: Option<[CellId; 4]>,
}

impl Cell {
    fn new(
        id: CellId,
        coord: TileCoord,
        level: u8,
        quadrant: u8,
        rect: GroundRect,
        parent: Option<CellId>,
    ) -> Self {
        Self {
            id,
            coord,
            level,
            quadrant,
            rect,
            center: rect.center(),
            parent,
            children: None,
        }
    }

    /// Arena id of this cell.
    #[must_use]
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Tile this cell represents.
    #[must_use]
    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Subdivision depth below the quadtree root (root = 0).
    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Index of this cell within its parent's children (0 for the root).
    #[must_use]
    pub fn quadrant(&self) -> u8 {
        self.quadrant
    }

    /// Ground rectangle covered by this cell.
    #[must_use]
    pub fn rect(&self) -> &GroundRect {
        &self.rect
    }

    /// Center of [`Self::rect`] on the ground plane.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Parent cell, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<CellId> {
        self.parent
    }

    /// Children in quadrant order, `None` until split.
    #[must_use]
    pub fn children(&self) -> Option<[CellId; 4]> {
        self.children
    }

    /// Whether this is the quadtree root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A quadtree rooted at one top-level tile.
///
/// Cells live in an arena and refer to each other by [`CellId`], so parent
/// links never form shared-ownership cycles. Cells are only ever appended.
#[derive(Clone, Debug)]
pub struct Quadtree {
    scheme: Arc<dyn TilingScheme>,
    cells: Vec<Cell>,
    depth: u8,
}

impl Quadtree {
    /// Create a quadtree whose root covers `root`'s projected ground rectangle.
    #[must_use]
    pub fn new(root: TileCoord, scheme: Arc<dyn TilingScheme>) -> Self {
        let rect = scheme.world_rect(&root);
        Self {
            scheme,
            cells: vec![Cell::new(CellId::ROOT, root, 0, 0, rect, None)],
            depth: 0,
        }
    }

    /// Create a quadtree over the Web-Mercator pyramid.
    #[must_use]
    pub fn web_mercator(root: TileCoord) -> Self {
        Self::new(root, Arc::new(WebMercator))
    }

    /// The root cell.
    #[must_use]
    pub fn root(&self) -> &Cell {
        &self.cells[0]
    }

    /// Look up a cell.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this quadtree.
    #[must_use]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    /// Look up a cell, returning `None` for foreign ids.
    #[must_use]
    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index())
    }

    /// Deepest level any cell has been split to.
    #[must_use]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Number of cells created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A quadtree always holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The tiling scheme used to split coordinates.
    #[must_use]
    pub fn scheme(&self) -> &Arc<dyn TilingScheme> {
        &self.scheme
    }

    /// Split a cell into four children, or return the existing ones.
    pub fn split(&mut self, id: CellId) -> [CellId; 4] {
        let parent = &self.cells[id.index()];
        if let Some(children) = parent.children {
            return children;
        }

        let coords = self.scheme.split(&parent.coord);
        let level = parent.level + 1;
        let rect = parent.rect;
        let first = self.cells.len() as u32;
        let ids = [0u32, 1, 2, 3].map(|i| CellId(first + i));

        for (quadrant, (coord, offset)) in coords.into_iter().zip(QUADRANT_OFFSETS).enumerate() {
            self.cells.push(Cell::new(
                ids[quadrant],
                coord,
                level,
                quadrant as u8,
                rect.quarter(offset),
                Some(id),
            ));
        }
        self.cells[id.index()].children = Some(ids);
        self.depth = self.depth.max(level);
        ids
    }

    /// Cells from the root down to, but excluding, `id`. Empty for the root.
    #[must_use]
    pub fn ancestors(&self, id: CellId) -> Vec<CellId> {
        let mut out = Vec::with_capacity(self.cell(id).level as usize);
        let mut current = self.cell(id).parent;
        while let Some(parent) = current {
            out.push(parent);
            current = self.cell(parent).parent;
        }
        out.reverse();
        out
    }

    /// The parent's children (including `id` itself), `None` for the root.
    #[must_use]
    pub fn siblings(&self, id: CellId) -> Option<[CellId; 4]> {
        let parent = self.cell(id).parent?;
        self.cell(parent).children
    }

    /// Drop every cell below the root.
    pub fn reset(&mut self) {
        self.cells.truncate(1);
        self.cells[0].children = None;
        self.depth = 0;
    }
}
