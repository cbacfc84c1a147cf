use orbis_tiles::{GroundRect, TileCoord};

/// Subdivision levels spanned by one full turn of the hue wheel.
const HUE_PERIOD: f32 = 12.0;

/// Hue in `[0, 1)` used to tint cell outlines of the given level.
pub fn level_hue(level: u8) -> f32 {
    (f32::from(level) / HUE_PERIOD).fract()
}

/// Debug outline of one selected cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellOverlay {
    pub coord: TileCoord,
    pub rect: GroundRect,
    pub level: u8,
    pub hue: f32,
}

impl CellOverlay {
    pub fn new(coord: TileCoord, rect: GroundRect, level: u8) -> Self {
        Self {
            coord,
            rect,
            level,
            hue: level_hue(level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_hue_wraps() {
        assert_eq!(level_hue(0), 0.0);
        assert_eq!(level_hue(6), 0.5);
        assert_eq!(level_hue(12), 0.0);
        assert_eq!(level_hue(15), level_hue(3));
    }

    #[test]
    fn test_overlay_carries_hue() {
        let overlay = CellOverlay::new(TileCoord::new(0, 0, 5), GroundRect::new(0.0, 0.0, 1.0, 1.0), 3);
        assert_eq!(overlay.hue, 0.25);
    }
}
