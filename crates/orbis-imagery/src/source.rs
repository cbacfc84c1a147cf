//! Where tile image bytes come from.

use std::io::{Cursor, Read};
use std::time::Duration;

use image::{ImageFormat, Rgba, RgbaImage};
use orbis_config::ImageryConfig;
use orbis_tiles::TileCoord;

use crate::LoadError;

/// Edge length in pixels of a tile image.
pub const TILE_SIZE: u32 = 256;

/// Response bodies larger than this are rejected.
const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

/// Fetches encoded tile images by coordinate.
///
/// `Ok(None)` means the service has no data for the tile. Both outcomes are
/// final; the loader does not retry.
pub trait TileImageSource: Send + Sync {
    fn fetch(&self, coord: TileCoord) -> Result<Option<Vec<u8>>, LoadError>;
}

/// Fetches tiles from a slippy-map HTTP endpoint.
#[derive(Debug)]
pub struct HttpImageSource {
    agent: ureq::Agent,
    url_template: String,
    access_token: String,
}

impl HttpImageSource {
    /// Create a source from a URL template with `{z}`, `{x}`, `{y}` and
    /// `{token}` placeholders.
    pub fn new(url_template: impl Into<String>, access_token: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            url_template: url_template.into(),
            access_token: access_token.into(),
        }
    }

    pub fn from_config(config: &ImageryConfig) -> Self {
        Self::new(
            config.url_template.clone(),
            config.access_token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// The request URL for a tile.
    pub fn url_for(&self, coord: TileCoord) -> String {
        self.url_template
            .replace("{z}", &coord.zoom.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace("{token}", &self.access_token)
    }
}

impl TileImageSource for HttpImageSource {
    fn fetch(&self, coord: TileCoord) -> Result<Option<Vec<u8>>, LoadError> {
        let response = match self.agent.get(&self.url_for(coord)).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if response.status() != 200 {
            return Err(LoadError::Status(response.status()));
        }
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_BODY_BYTES)
            .read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }
}

/// Synthesizes PNG tiles locally for headless runs.
///
/// Each tile is a gradient seeded by its coordinate. Tiles deeper than
/// `max_data_zoom` report no data.
#[derive(Debug, Clone)]
pub struct OfflineImageSource {
    tile_size: u32,
    max_data_zoom: u8,
}

impl Default for OfflineImageSource {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            max_data_zoom: u8::MAX,
        }
    }
}

impl OfflineImageSource {
    pub fn new(tile_size: u32, max_data_zoom: u8) -> Self {
        Self {
            tile_size: tile_size.max(1),
            max_data_zoom,
        }
    }

    /// The image served for `coord`, before encoding.
    pub fn render(&self, coord: TileCoord) -> RgbaImage {
        let size = self.tile_size;
        let last = (size - 1).max(1);
        let tint = (u32::from(coord.zoom) * 17 % 256) as u8;
        RgbaImage::from_fn(size, size, |px, py| {
            let r = (px * 255 / last) as u8;
            let g = (py * 255 / last) as u8;
            let b = tint ^ ((coord.x ^ coord.y) & 0xff) as u8;
            Rgba([r, g, b, 255])
        })
    }
}

impl TileImageSource for OfflineImageSource {
    fn fetch(&self, coord: TileCoord) -> Result<Option<Vec<u8>>, LoadError> {
        if coord.zoom > self.max_data_zoom {
            return Ok(None);
        }
        let mut bytes = Cursor::new(Vec::new());
        self.render(coord).write_to(&mut bytes, ImageFormat::Png)?;
        Ok(Some(bytes.into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_template_substitution() {
        let source = HttpImageSource::new(
            "https://tiles.example.com/{z}/{x}/{y}.png?key={token}",
            "abc",
            Duration::from_secs(1),
        );
        assert_eq!(
            source.url_for(TileCoord::new(5, 9, 4)),
            "https://tiles.example.com/4/5/9.png?key=abc"
        );
    }

    #[test]
    fn test_from_config_uses_template() {
        let config = ImageryConfig {
            url_template: "http://localhost/{z}-{x}-{y}".to_string(),
            ..ImageryConfig::default()
        };
        let source = HttpImageSource::from_config(&config);
        assert_eq!(source.url_for(TileCoord::new(1, 2, 3)), "http://localhost/3-1-2");
    }

    /// Offline tiles decode back into images of the configured size.
    #[test]
    fn test_offline_source_serves_png() {
        let source = OfflineImageSource::new(16, 10);
        let bytes = source.fetch(TileCoord::new(1, 1, 3)).unwrap().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert_eq!(decoded, source.render(TileCoord::new(1, 1, 3)));
    }

    #[test]
    fn test_offline_source_has_no_deep_data() {
        let source = OfflineImageSource::new(16, 10);
        assert!(source.fetch(TileCoord::new(0, 0, 11)).unwrap().is_none());
    }

    /// Nothing listens on this port, so the request fails in transport.
    #[test]
    fn test_http_source_transport_error() {
        let source = HttpImageSource::new("http://127.0.0.1:9/{z}/{x}/{y}", "", Duration::from_secs(2));
        let result = source.fetch(TileCoord::new(0, 0, 2));
        assert!(matches!(result, Err(LoadError::Transport(_))), "got {result:?}");
    }
}
