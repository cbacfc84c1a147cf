//! Command-line argument parsing for the orbis viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// orbis command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orbis", about = "Adaptive tile streaming globe viewer")]
pub struct CliArgs {
    /// Viewport width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Pixel-error bias (4..=256).
    #[arg(long)]
    pub bias: Option<f64>,

    /// Maximum number of rendered tiles (8..=32).
    #[arg(long)]
    pub max_tiles: Option<usize>,

    /// Longitude of the camera target in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Latitude of the camera target in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Initial camera altitude in kilometers.
    #[arg(long)]
    pub altitude: Option<f64>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 60)]
    pub frames: u32,

    /// Synthesize tile images locally instead of fetching them.
    #[arg(long)]
    pub offline: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.viewport.width = w;
        }
        if let Some(h) = args.height {
            self.viewport.height = h;
        }
        if let Some(bias) = args.bias {
            self.lod.pixel_bias = bias;
        }
        if let Some(max_tiles) = args.max_tiles {
            self.lod.max_tiles = max_tiles;
        }
        if let Some(lon) = args.lon {
            self.camera.start_lon = lon;
        }
        if let Some(lat) = args.lat {
            self.camera.start_lat = lat;
        }
        if let Some(altitude) = args.altitude {
            self.camera.start_altitude_km = altitude;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            bias: Some(64.0),
            lon: Some(2.35),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.viewport.width, 1920);
        assert_eq!(config.lod.pixel_bias, 64.0);
        assert_eq!(config.camera.start_lon, 2.35);
        // Non-overridden fields retain defaults
        assert_eq!(config.viewport.height, 720);
        assert_eq!(config.lod.max_tiles, 32);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_negative_coordinates() {
        let args = CliArgs::try_parse_from(["orbis", "--lon", "-122.4", "--lat", "37.7", "--offline"])
            .unwrap();
        assert_eq!(args.lon, Some(-122.4));
        assert_eq!(args.lat, Some(37.7));
        assert!(args.offline);
        assert_eq!(args.frames, 60);
    }
}
