//! Ranking of visible cells before truncation to the tile budget.

use std::cmp::Ordering;

use crate::VisibleCell;

/// Camera distances closer than this (in km) are treated as equal.
pub const DISTANCE_TIE_KM: f64 = 1e-6;

fn distance_bucket(distance: f64) -> i64 {
    (distance / DISTANCE_TIE_KM).round() as i64
}

fn compare(a: &VisibleCell, b: &VisibleCell) -> Ordering {
    distance_bucket(a.distance)
        .cmp(&distance_bucket(b.distance))
        .then(a.level.cmp(&b.level))
        .then(a.coord.cmp(&b.coord))
}

/// Sort nearest first, coarser cells winning distance ties, then truncate
/// to `max_tiles`.
///
/// Ties are bucketed at [`DISTANCE_TIE_KM`] and finally broken by tile
/// coordinate, so the order is total and deterministic.
pub fn order_visible(cells: &mut Vec<VisibleCell>, max_tiles: usize) {
    cells.sort_by(compare);
    cells.truncate(max_tiles);
}
