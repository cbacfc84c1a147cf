//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest accepted pixel-error bias.
pub const MIN_CELL_BIAS: f64 = 4.0;
/// Largest accepted pixel-error bias.
pub const MAX_CELL_BIAS: f64 = 256.0;
/// Smallest accepted render-slot budget.
pub const MIN_TILES: usize = 8;
/// Largest accepted render-slot budget (size of the slot pool).
pub const MAX_TILES: usize = 32;
/// Deepest zoom a tile coordinate can address.
pub const MAX_ZOOM_LEVEL: u8 = 30;
/// Deepest accepted quadtree root level. Level `z` seeds `4^z` roots.
pub const MAX_START_LEVEL: u8 = 4;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Viewport and projection settings.
    pub viewport: ViewportConfig,
    /// Level-of-detail selection settings.
    pub lod: LodConfig,
    /// Tile image service and texture cache settings.
    pub imagery: ImageryConfig,
    /// Initial camera placement and scripted flight.
    pub camera: CameraConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Viewport configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f64,
}

/// Level-of-detail configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Projected texel radius in pixels above which a cell is subdivided.
    pub pixel_bias: f64,
    /// Maximum number of tiles rendered in one frame.
    pub max_tiles: usize,
    /// Zoom level of the quadtree roots.
    pub start_level: u8,
    /// Deepest zoom level the selector may reach.
    pub max_level: u8,
}

/// Tile imagery configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageryConfig {
    /// URL template with `{z}`, `{x}`, `{y}` and `{token}` placeholders.
    pub url_template: String,
    /// Access token substituted for `{token}`.
    pub access_token: String,
    /// Lowest zoom level for which textures are requested.
    pub min_zoom: u8,
    /// Highest zoom level for which textures are requested.
    pub max_zoom: u8,
    /// Soft capacity of the texture cache.
    pub cache_capacity: usize,
    /// Number of loader worker threads.
    pub worker_count: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Longitude of the initial look-at target in degrees.
    pub start_lon: f64,
    /// Latitude of the initial look-at target in degrees.
    pub start_lat: f64,
    /// Initial camera altitude above the ground plane in kilometers.
    pub start_altitude_km: f64,
    /// Fraction of the altitude lost per simulated frame.
    pub descent_per_frame: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Emit the visible cell rectangles every frame.
    pub show_cell_bounds: bool,
}

// --- Default implementations ---

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fov_y_deg: 60.0,
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            pixel_bias: MIN_CELL_BIAS,
            max_tiles: MAX_TILES,
            start_level: 2,
            max_level: 15,
        }
    }
}

impl Default for ImageryConfig {
    fn default() -> Self {
        Self {
            url_template: "https://api.mapbox.com/v4/mapbox.terrain-rgb/{z}/{x}/{y}.pngraw?access_token={token}"
                .to_string(),
            access_token: String::new(),
            min_zoom: 2,
            max_zoom: 14,
            cache_capacity: 256,
            worker_count: 4,
            timeout_secs: 10,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_lon: -122.444_872_403_434_83,
            start_lat: 37.756_605_453_462_3,
            start_altitude_km: 100.0,
            descent_per_frame: 0.05,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_cell_bounds: false,
        }
    }
}

impl LodConfig {
    /// Pixel bias clamped to [`MIN_CELL_BIAS`, `MAX_CELL_BIAS`].
    #[must_use]
    pub fn effective_bias(&self) -> f64 {
        self.pixel_bias.clamp(MIN_CELL_BIAS, MAX_CELL_BIAS)
    }

    /// Tile budget clamped to [`MIN_TILES`, `MAX_TILES`].
    #[must_use]
    pub fn effective_max_tiles(&self) -> usize {
        self.max_tiles.clamp(MIN_TILES, MAX_TILES)
    }

    /// Deepest zoom level, clamped to [`MAX_ZOOM_LEVEL`].
    #[must_use]
    pub fn effective_max_level(&self) -> u8 {
        self.max_level.min(MAX_ZOOM_LEVEL)
    }

    /// Root level, clamped to [`MAX_START_LEVEL`] and never below the
    /// effective max level.
    #[must_use]
    pub fn effective_start_level(&self) -> u8 {
        self.start_level.min(MAX_START_LEVEL).min(self.effective_max_level())
    }

    /// Maximum subdivision depth below a quadtree root.
    #[must_use]
    pub fn max_depth(&self) -> u8 {
        self.effective_max_level() - self.effective_start_level()
    }
}

/// Platform configuration directory for orbis, if one can be determined.
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("orbis"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let new_config = read_config(&config_path)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
