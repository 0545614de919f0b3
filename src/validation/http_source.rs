//! Production image source: HTTP(S) via `ureq`, local files via `std::fs`,
//! decoding and re-encoding via the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Fetch `http(s)://` | `ureq::Agent` (connect + read timeouts) |
//! | Read `file://` / bare path | `std::fs::read` |
//! | Decode (JPEG, PNG, GIF, WebP) | `image::load_from_memory` |
//! | Size estimate | `JpegEncoder` at the configured quality |

use super::source::{Dimensions, ImageSource, LoadedImage, SourceError};
use crate::config::HttpConfig;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

pub struct HttpSource {
    agent: ureq::Agent,
    max_body_bytes: u64,
    reencode_quality: u8,
}

impl HttpSource {
    pub fn new(http: &HttpConfig, reencode_quality: u8) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_millis(http.connect_timeout_ms))
            .timeout_read(Duration::from_millis(http.read_timeout_ms))
            .user_agent(&http.user_agent)
            .build();
        Self {
            agent,
            max_body_bytes: http.max_body_bytes,
            reencode_quality: reencode_quality.clamp(1, 100),
        }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| SourceError::Fetch(format!("{url}: {e}")))?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(self.max_body_bytes)
            .read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn read_bytes(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        if is_remote(url) {
            return self.fetch(url);
        }
        let path = url.strip_prefix("file://").unwrap_or(url);
        Ok(std::fs::read(Path::new(path))?)
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(&HttpConfig::default(), crate::config::DEFAULT_REENCODE_QUALITY)
    }
}

fn is_remote(url: &str) -> bool {
    let lowered = url.trim_start().to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

impl ImageSource for HttpSource {
    fn load(&self, url: &str) -> Result<LoadedImage, SourceError> {
        let bytes = self.read_bytes(url)?;
        let pixels = image::load_from_memory(&bytes)
            .map_err(|e| SourceError::Decode(format!("{url}: {e}")))?;
        Ok(LoadedImage {
            dimensions: Dimensions::new(pixels.width(), pixels.height()),
            pixels: Some(pixels),
        })
    }

    fn estimate_size(&self, image: &LoadedImage) -> Result<u64, SourceError> {
        let Some(pixels) = &image.pixels else {
            return Err(SourceError::Unsupported("no decoded pixels to re-encode".into()));
        };
        // JPEG has no alpha channel; flatten first.
        let rgb = DynamicImage::ImageRgb8(pixels.to_rgb8());
        let mut encoded = Vec::new();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(
            &mut encoded,
            self.reencode_quality,
        ))
        .map_err(|e| SourceError::Decode(format!("re-encode failed: {e}")))?;
        Ok(encoded.len() as u64)
    }
}
