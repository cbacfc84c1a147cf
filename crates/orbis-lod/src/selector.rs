//! Greedy top-down subdivision driven by projected texel error.

use glam::DVec3;
use orbis_camera::{GlobeCamera, MAX_INTERSECTIONS};
use orbis_config::LodConfig;
use orbis_tiles::{CellId, GroundRect, Quadtree, TileCoord};
use tracing::debug;

use crate::{MAX_DEPTH, metric};

/// A cell chosen for display this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleCell {
    /// Index of the quadtree the cell belongs to.
    pub tree: usize,
    /// Cell within that quadtree.
    pub cell: CellId,
    /// Tile the cell represents.
    pub coord: TileCoord,
    /// Depth below the quadtree root.
    pub level: u8,
    /// Ground rectangle of the cell.
    pub rect: GroundRect,
    /// Center of `rect`.
    pub center: DVec3,
    /// Camera-to-center distance.
    pub distance: f64,
}

/// Selects the cells to draw for a camera and a set of root quadtrees.
#[derive(Clone, Debug)]
pub struct LodSelector {
    bias: f64,
    max_depth: u8,
}

impl Default for LodSelector {
    fn default() -> Self {
        Self::new(orbis_config::MIN_CELL_BIAS, MAX_DEPTH)
    }
}

impl LodSelector {
    /// Create a selector subdividing cells whose error exceeds `bias` pixels,
    /// never deeper than `max_depth` below a root.
    pub fn new(bias: f64, max_depth: u8) -> Self {
        Self { bias, max_depth }
    }

    /// Build a selector from the clamped LOD configuration.
    pub fn from_config(config: &LodConfig) -> Self {
        Self::new(config.effective_bias(), config.max_depth())
    }

    /// Pixel-error threshold.
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Change the pixel-error threshold.
    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    /// Maximum subdivision depth below a root.
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Walk every tree from its root and return the cells to draw.
    ///
    /// Invisible cells are skipped with their subtrees. Visible cells whose
    /// error exceeds the bias are split (lazily) and replaced by their
    /// children, unless they already sit at the maximum depth or at
    /// [`TileCoord::MAX_ZOOM`]. The result is
    /// unordered; see [`crate::order_visible`].
    pub fn select(&self, trees: &mut [Quadtree], camera: &GlobeCamera) -> Vec<VisibleCell> {
        let frustum = camera.frustum();
        let eye = camera.position;
        let fov_inv = camera.fov_inv();
        let half_height = camera.half_height();

        let mut visible = Vec::new();
        let mut points = [DVec3::ZERO; MAX_INTERSECTIONS];
        let mut stack = Vec::new();
        let mut tested = 0usize;

        for (index, tree) in trees.iter_mut().enumerate() {
            stack.clear();
            stack.push(CellId::ROOT);

            while let Some(id) = stack.pop() {
                let cell = tree.cell(id);
                let rect = *cell.rect();
                let level = cell.level();
                tested += 1;

                let count = frustum.intersect_rect(&rect, &mut points);
                if count == 0 {
                    continue;
                }

                let refine = level < self.max_depth && cell.coord().zoom < TileCoord::MAX_ZOOM && {
                    let texel = metric::texel_size(&rect);
                    let error =
                        metric::screen_error(&points[..count], eye, texel, fov_inv, half_height);
                    error > self.bias
                };

                if refine {
                    let children = tree.split(id);
                    stack.extend(children.iter().rev());
                } else {
                    let center = cell.center();
                    visible.push(VisibleCell {
                        tree: index,
                        cell: id,
                        coord: cell.coord(),
                        level,
                        rect,
                        center,
                        distance: center.distance(eye),
                    });
                }
            }
        }

        debug!(
            tested,
            visible = visible.len(),
            bias = self.bias,
            "LOD selection complete"
        );
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order_visible;
    use orbis_tiles::sane_earth;

    fn polar_tree() -> Quadtree {
        Quadtree::web_mercator(TileCoord::new(0, 0, 2))
    }

    /// Camera `altitude` km straight above the center of `tree`'s root.
    fn camera_above(tree: &Quadtree, altitude: f64) -> GlobeCamera {
        let mut camera = GlobeCamera::new(60.0, 1280, 720);
        let center = tree.root().center();
        camera.position = center + DVec3::new(0.0, altitude, 0.0);
        camera.look_at(center);
        camera
    }

    /// From far away the root alone is within tolerance.
    #[test]
    fn test_high_camera_selects_root_only() {
        let mut trees = vec![polar_tree()];
        let camera = camera_above(&trees[0], 20_000.0);
        let visible = LodSelector::default().select(&mut trees, &camera);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].cell, CellId::ROOT);
        assert_eq!(visible[0].coord, TileCoord::new(0, 0, 2));
        assert!(trees[0].root().children().is_none(), "root must not be split");
    }

    /// Just above the ground every selected cell sits at the maximum depth.
    #[test]
    fn test_low_camera_reaches_max_depth() {
        let mut trees = vec![polar_tree()];
        let camera = camera_above(&trees[0], 0.5);
        let visible = LodSelector::default().select(&mut trees, &camera);
        assert!(!visible.is_empty());
        for cell in &visible {
            assert_eq!(cell.level, MAX_DEPTH, "cell {} not at max depth", cell.coord);
            assert_eq!(cell.coord.zoom, 2 + MAX_DEPTH);
        }
    }

    #[test]
    fn test_depth_cap_is_respected() {
        let mut trees = vec![polar_tree()];
        let camera = camera_above(&trees[0], 0.5);
        let selector = LodSelector::new(4.0, 3);
        let visible = selector.select(&mut trees, &camera);
        assert!(!visible.is_empty());
        assert!(visible.iter().all(|c| c.level == 3));
    }

    /// Raising the bias never yields more cells.
    #[test]
    fn test_monotonic_in_bias() {
        let roots = sane_earth(2);
        let mut camera = GlobeCamera::new(60.0, 1280, 720);
        camera.go_to_lon_lat(-122.44, 37.75, 50.0);

        let mut previous = usize::MAX;
        for bias in [4.0, 8.0, 16.0, 64.0, 256.0] {
            let mut trees: Vec<Quadtree> =
                roots.divisible.iter().map(|&c| Quadtree::web_mercator(c)).collect();
            let count = LodSelector::new(bias, MAX_DEPTH).select(&mut trees, &camera).len();
            assert!(count <= previous, "bias {bias}: {count} > {previous}");
            previous = count;
        }
    }

    #[test]
    fn test_invisible_trees_are_not_split() {
        let roots = sane_earth(2);
        let mut trees: Vec<Quadtree> =
            roots.divisible.iter().map(|&c| Quadtree::web_mercator(c)).collect();
        let mut camera = GlobeCamera::new(60.0, 1280, 720);
        camera.go_to_lon_lat(-122.44, 37.75, 10.0);
        let visible = LodSelector::default().select(&mut trees, &camera);

        assert!(!visible.is_empty());
        for (index, tree) in trees.iter().enumerate() {
            if visible.iter().all(|c| c.tree != index) {
                assert_eq!(tree.len(), 1, "tree {index} split without visible cells");
            }
        }
    }

    /// Selected cells never overlap: no cell is an ancestor of another.
    #[test]
    fn test_selection_is_a_cover() {
        let roots = sane_earth(2);
        let mut trees: Vec<Quadtree> =
            roots.divisible.iter().map(|&c| Quadtree::web_mercator(c)).collect();
        let mut camera = GlobeCamera::new(60.0, 1280, 720);
        camera.go_to_lon_lat(2.35, 48.85, 30.0);
        let mut visible = LodSelector::default().select(&mut trees, &camera);

        for a in &visible {
            let ancestors = trees[a.tree].ancestors(a.cell);
            assert!(
                visible
                    .iter()
                    .all(|b| b.tree != a.tree || !ancestors.contains(&b.cell)),
                "{} has a selected ancestor",
                a.coord
            );
        }

        order_visible(&mut visible, 32);
        assert!(visible.len() <= 32);
        assert!(visible.windows(2).all(|w| w[0].distance <= w[1].distance + 1e-6));
    }

    /// A configured depth past the tile pyramid is capped at the deepest zoom.
    #[test]
    fn test_deep_config_stops_at_max_zoom() {
        let config = LodConfig {
            max_level: 40,
            ..LodConfig::default()
        };
        let selector = LodSelector::from_config(&config);
        assert_eq!(usize::from(selector.max_depth()), usize::from(TileCoord::MAX_ZOOM) - 2);

        for selector in [selector, LodSelector::new(4.0, u8::MAX)] {
            let mut trees = vec![Quadtree::web_mercator(TileCoord::new(1, 1, 2))];
            let camera = camera_above(&trees[0], 1e-9);
            let visible = selector.select(&mut trees, &camera);
            assert!(!visible.is_empty());
            assert!(visible.iter().all(|c| c.coord.zoom <= TileCoord::MAX_ZOOM));
        }
    }

    #[test]
    fn test_config_zoom_limit_matches_tile_pyramid() {
        assert_eq!(orbis_config::MAX_ZOOM_LEVEL, TileCoord::MAX_ZOOM);
    }

    #[test]
    fn test_from_config_clamps() {
        let config = LodConfig {
            pixel_bias: 0.5,
            ..LodConfig::default()
        };
        let selector = LodSelector::from_config(&config);
        assert_eq!(selector.bias(), orbis_config::MIN_CELL_BIAS);
        assert_eq!(selector.max_depth(), MAX_DEPTH);
    }
}
