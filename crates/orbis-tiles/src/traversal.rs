//! Depth-first and breadth-first quadtree traversal with visitor control.
//!
//! Both walks keep a visited set so a visitor that re-enters a node, or an
//! arena that gained a back-edge, never loops.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::{Cell, CellId, Quadtree};

/// Visitor control for [`Quadtree::dfs`].
#[derive(Debug, Default)]
pub struct DfsControl {
    /// Do not descend into the current cell's children.
    pub stop_propagation: bool,
    /// Abort the whole traversal.
    pub terminate: bool,
    path: Vec<CellId>,
}

impl DfsControl {
    /// Cells from the traversal start down to the current cell's parent.
    #[must_use]
    pub fn path(&self) -> &[CellId] {
        &self.path
    }
}

/// Visitor control for [`Quadtree::bfs`].
#[derive(Debug, Default)]
pub struct BfsControl {
    /// Do not enqueue the current cell's children.
    pub stop_propagation: bool,
    /// Abort the whole traversal.
    pub terminate: bool,
    level: u32,
}

impl BfsControl {
    /// Distance in levels from the traversal start.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Quadtree {
    /// Depth-first walk from `start` over existing cells.
    pub fn dfs<F>(&self, start: CellId, visitor: F)
    where
        F: FnMut(&Cell, &mut DfsControl),
    {
        let mut visited = FxHashSet::default();
        self.dfs_with_visited(start, &mut visited, visitor);
    }

    /// Depth-first walk sharing a caller-owned visited set.
    pub fn dfs_with_visited<F>(&self, start: CellId, visited: &mut FxHashSet<CellId>, mut visitor: F)
    where
        F: FnMut(&Cell, &mut DfsControl),
    {
        let mut control = DfsControl::default();
        self.dfs_visit(start, visited, &mut control, &mut visitor);
    }

    fn dfs_visit<F>(
        &self,
        id: CellId,
        visited: &mut FxHashSet<CellId>,
        control: &mut DfsControl,
        visitor: &mut F,
    ) where
        F: FnMut(&Cell, &mut DfsControl),
    {
        if control.terminate || !visited.insert(id) {
            return;
        }
        let cell = self.cell(id);
        control.stop_propagation = false;
        visitor(cell, control);
        if control.stop_propagation || control.terminate {
            return;
        }
        let Some(children) = cell.children() else {
            return;
        };
        control.path.push(id);
        for child in children {
            self.dfs_visit(child, visited, control, visitor);
        }
        control.path.pop();
    }

    /// Breadth-first walk from `start`, one level at a time.
    pub fn bfs<F>(&self, start: CellId, visitor: F)
    where
        F: FnMut(&Cell, &mut BfsControl),
    {
        let mut visited = FxHashSet::default();
        self.bfs_with_visited(start, &mut visited, visitor);
    }

    /// Breadth-first walk sharing a caller-owned visited set.
    pub fn bfs_with_visited<F>(&self, start: CellId, visited: &mut FxHashSet<CellId>, mut visitor: F)
    where
        F: FnMut(&Cell, &mut BfsControl),
    {
        let mut control = BfsControl::default();
        let mut queue = VecDeque::from([start]);

        while !queue.is_empty() {
            for _ in 0..queue.len() {
                let Some(id) = queue.pop_front() else { break };
                if !visited.insert(id) {
                    continue;
                }
                let cell = self.cell(id);
                control.stop_propagation = false;
                visitor(cell, &mut control);
                if control.terminate {
                    return;
                }
                if control.stop_propagation {
                    continue;
                }
                if let Some(children) = cell.children() {
                    queue.extend(children);
                }
            }
            control.level += 1;
        }
    }
}
