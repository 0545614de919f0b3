//! Image source trait and shared types.
//!
//! The [`ImageSource`] trait is the validator's only window onto image bytes:
//! `load` decodes enough of an image to know its dimensions, and the optional
//! `estimate_size` reports roughly how large it is when encoded.
//!
//! Implementations:
//!
//! - [`HttpSource`](super::http_source::HttpSource): fetches over HTTP(S) or
//!   reads local files, decodes with the `image` crate.
//! - [`NullSource`]: decoding unavailable. Every load fails, so every URL that
//!   passes the pattern rules comes back `Unknown`.
//!
//! Both methods are blocking; the validator moves them onto tokio's blocking
//! pool and enforces its own timeout.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Fetch failed: {0}")]
    Fetch(String),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Not supported: {0}")]
    Unsupported(String),
}

/// Pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn shorter_edge(self) -> u32 {
        self.width.min(self.height)
    }
}

/// Outcome of a successful [`ImageSource::load`].
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub dimensions: Dimensions,
    /// Decoded pixels, when the source kept them. Size estimation by
    /// re-encoding needs these.
    pub pixels: Option<DynamicImage>,
}

impl LoadedImage {
    pub fn dimensions_only(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            pixels: None,
        }
    }
}

pub trait ImageSource: Send + Sync + 'static {
    /// Fetch and decode the image at `url`.
    fn load(&self, url: &str) -> Result<LoadedImage, SourceError>;

    /// Approximate encoded size in bytes. Sources that can't estimate keep
    /// the default, which reports [`SourceError::Unsupported`].
    fn estimate_size(&self, image: &LoadedImage) -> Result<u64, SourceError> {
        let _ = image;
        Err(SourceError::Unsupported("size estimation".into()))
    }
}

/// A source for contexts with no image decoding at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSource;

impl ImageSource for NullSource {
    fn load(&self, _url: &str) -> Result<LoadedImage, SourceError> {
        Err(SourceError::Unsupported("image decoding".into()))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Canned response for one URL.
    #[derive(Debug, Clone, Copy)]
    pub enum MockImage {
        /// Loads with these dimensions; `size` feeds `estimate_size`
        /// (`None` = estimation unsupported).
        Loads { dims: Dimensions, size: Option<u64> },
        /// Load fails.
        Broken,
    }

    /// Mock source that records every call and answers from a table.
    /// Uses Mutex so it is Sync and can cross into spawn_blocking.
    #[derive(Default)]
    pub struct MockSource {
        pub images: HashMap<String, MockImage>,
        pub delay: Option<Duration>,
        pub loads: Mutex<Vec<String>>,
        pub estimates: Mutex<Vec<Dimensions>>,
    }

    impl MockSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, url: &str, image: MockImage) -> Self {
            self.images.insert(url.to_string(), image);
            self
        }

        pub fn slow(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn loaded_urls(&self) -> Vec<String> {
            self.loads.lock().unwrap().clone()
        }
    }

    impl ImageSource for MockSource {
        fn load(&self, url: &str) -> Result<LoadedImage, SourceError> {
            self.loads.lock().unwrap().push(url.to_string());
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            match self.images.get(url) {
                Some(MockImage::Loads { dims, .. }) => Ok(LoadedImage::dimensions_only(*dims)),
                Some(MockImage::Broken) | None => {
                    Err(SourceError::Fetch(format!("no mock image for {url}")))
                }
            }
        }

        fn estimate_size(&self, image: &LoadedImage) -> Result<u64, SourceError> {
            self.estimates.lock().unwrap().push(image.dimensions);
            let size = self.images.values().find_map(|m| match m {
                MockImage::Loads { dims, size } if *dims == image.dimensions => Some(*size),
                _ => None,
            });
            match size.flatten() {
                Some(bytes) => Ok(bytes),
                None => Err(SourceError::Unsupported("mock size".into())),
            }
        }
    }

    #[test]
    fn mock_records_loads() {
        let source = MockSource::new().with(
            "https://h/a.jpg",
            MockImage::Loads {
                dims: Dimensions::new(800, 600),
                size: Some(50_000),
            },
        );
        let loaded = source.load("https://h/a.jpg").unwrap();
        assert_eq!(loaded.dimensions, Dimensions::new(800, 600));
        assert_eq!(source.estimate_size(&loaded).unwrap(), 50_000);
        assert!(source.load("https://h/missing.jpg").is_err());
        assert_eq!(source.loaded_urls(), ["https://h/a.jpg", "https://h/missing.jpg"]);
    }

    #[test]
    fn null_source_never_loads() {
        assert!(matches!(
            NullSource.load("https://h/a.jpg"),
            Err(SourceError::Unsupported(_))
        ));
    }

    #[test]
    fn default_estimate_is_unsupported() {
        let image = LoadedImage::dimensions_only(Dimensions::new(10, 10));
        assert!(matches!(
            NullSource.estimate_size(&image),
            Err(SourceError::Unsupported(_))
        ));
    }

    #[test]
    fn shorter_edge() {
        assert_eq!(Dimensions::new(800, 540).shorter_edge(), 540);
    }
}
