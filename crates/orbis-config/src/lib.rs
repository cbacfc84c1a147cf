//! Configuration for the orbis globe viewer.
//!
//! Provides the tunables of the tile LOD engine (pixel-error bias, tile budget,
//! zoom bounds, cache capacity) plus viewport, camera and debug settings.
//! Settings persist to disk as RON and accept CLI overrides via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, ImageryConfig, LodConfig, MAX_CELL_BIAS, MAX_START_LEVEL,
    MAX_TILES, MAX_ZOOM_LEVEL, MIN_CELL_BIAS, MIN_TILES, ViewportConfig, default_config_dir,
};
pub use error::ConfigError;
