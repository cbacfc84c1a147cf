//! orbis: headless globe viewer driving the tile LOD engine.
//!
//! Places a camera over the configured lon/lat, then runs a fixed number of
//! frames while the camera descends. Each frame selects the visible tiles,
//! binds them to render slots and folds finished tile loads back in between
//! frames. Frame statistics go to the log.
//!
//! Run with: `cargo run -p orbis-viewer -- --offline --frames 120`

mod flight;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use orbis_camera::GlobeCamera;
use orbis_config::{CliArgs, Config, default_config_dir};
use orbis_imagery::{HttpImageSource, OfflineImageSource, TextureEvent, TileImageSource, WorkerLoader};
use orbis_map::GlobeMap;
use tracing::{debug, info, trace, warn};

use crate::flight::Descent;

/// Simulated frame interval.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Frames between checks for an edited config file.
const RELOAD_INTERVAL: u32 = 30;

fn main() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut file_config = Config::load_or_create(&config_dir)?;
    let mut config = file_config.clone();
    config.apply_cli_overrides(&args);

    orbis_log::init_logging(Some(&config_dir.join("logs")), cfg!(debug_assertions), Some(&config));

    info!("orbis viewer");
    info!(
        "Viewport: {}x{} | fov {:.0}° | bias {:.0}px | max tiles {}",
        config.viewport.width,
        config.viewport.height,
        config.viewport.fov_y_deg,
        config.lod.effective_bias(),
        config.lod.effective_max_tiles(),
    );

    let source: Arc<dyn TileImageSource> = if args.offline {
        info!("Using offline tile source");
        Arc::new(OfflineImageSource::default())
    } else {
        if config.imagery.access_token.is_empty() && config.imagery.url_template.contains("{token}") {
            warn!("No imagery access token configured; remote tiles will likely fail");
        }
        Arc::new(HttpImageSource::from_config(&config.imagery))
    };
    let loader = WorkerLoader::new(config.imagery.worker_count, source)?;
    info!(workers = loader.worker_count(), "Tile loader started");

    let mut map = GlobeMap::new(&config, Box::new(loader));
    if let Some(bounds) = map.bounds() {
        info!(
            "Coverage: lon {:.1}..{:.1}, lat {:.1}..{:.1}",
            bounds.west, bounds.east, bounds.south, bounds.north
        );
    }

    let mut camera = GlobeCamera::new(
        config.viewport.fov_y_deg,
        config.viewport.width,
        config.viewport.height,
    );
    let mut descent = Descent::from_config(&config.camera);
    descent.place(&mut camera);

    for frame in 0..args.frames {
        if frame > 0 {
            descent.step(&mut camera);
        }

        let stats = map.update(&camera);
        info!(
            "Frame {:>4} | alt {:>9.3} km | cells {:>3} | drawn {:>2} (own {:>2}, proxy {:>2}, empty {:>2}) | cache {:>3} | pending {:>3}",
            stats.frame,
            descent.altitude,
            stats.visible_cells,
            stats.drawn,
            stats.own_texture,
            stats.ancestor_proxy,
            stats.empty,
            stats.cache_size,
            stats.pending_loads,
        );

        if config.debug.show_cell_bounds {
            for cell in map.overlay() {
                debug!(
                    coord = %cell.coord,
                    level = cell.level,
                    hue = cell.hue,
                    x = cell.rect.origin_x,
                    z = cell.rect.origin_z,
                    width = cell.rect.width,
                    depth = cell.rect.depth,
                    "Cell bounds"
                );
            }
        }

        for event in map.drain_texture_events() {
            match event {
                TextureEvent::Loaded { coord, state } => trace!(%coord, ?state, "Texture upload"),
                TextureEvent::ActiveChanged { coord, active } => trace!(%coord, active, "Texture activity"),
                TextureEvent::Destroyed { coord } => trace!(%coord, "Texture release"),
            }
        }

        if frame > 0 && frame % RELOAD_INTERVAL == 0 {
            match file_config.reload(&config_dir) {
                Ok(Some(reloaded)) => {
                    file_config = reloaded;
                    config = file_config.clone();
                    config.apply_cli_overrides(&args);
                    map.apply_lod_config(&config.lod);
                }
                Ok(None) => {}
                Err(err) => warn!(error = %err, "Config reload failed"),
            }
        }

        std::thread::sleep(FRAME_INTERVAL);
    }

    info!(
        frames = map.frame(),
        cached = map.cache().len(),
        depth = map.tree_depth(),
        "Viewer finished"
    );
    Ok(())
}
