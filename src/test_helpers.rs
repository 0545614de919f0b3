//! Shared test utilities: context and tag builders, plus fixture images
//! generated on the fly with the `image` crate.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use crate::template::TemplateContext;
use crate::types::{ContentRating, ImageTag, ManualLink};

/// A context with every field set.
pub fn full_context() -> TemplateContext {
    TemplateContext::new()
        .with_code("ABP-123")
        .with_studio("Prestige")
        .with_performer("Yui Hatano (葉月ゆい)")
}

pub fn manual(url: &str) -> ManualLink {
    ManualLink::new(url)
}

pub fn template_tag(index: usize, performers: &[&str]) -> ImageTag {
    ImageTag {
        url: String::new(),
        performers: performers.iter().map(|p| p.to_string()).collect(),
        content_rating: ContentRating::None,
        image_index: Some(index),
    }
}

pub fn manual_tag(url: &str, performers: &[&str], rating: ContentRating) -> ImageTag {
    ImageTag {
        url: url.to_string(),
        performers: performers.iter().map(|p| p.to_string()).collect(),
        content_rating: rating,
        image_index: None,
    }
}

/// Single-colour PNG. Re-encodes to a very small JPEG.
pub fn write_flat_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb([200, 200, 200]))
        .save(&path)
        .unwrap();
    path
}

/// Deterministic pseudo-random noise PNG. Re-encodes to a large JPEG.
pub fn write_noise_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let mut state: u32 = 0x2545_f491;
    let img = RgbImage::from_fn(width, height, |_, _| {
        // xorshift32
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    });
    img.save(&path).unwrap();
    path
}
