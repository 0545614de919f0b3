//! Shared records that cross the engine's I/O boundary.
//!
//! These are persisted by the host application next to the combined link
//! field (see [`links`](crate::links)) and must keep their wire shape:
//!
//! ```json
//! { "url": "https://…/a.jpg", "performers": ["Rei"], "contentRating": "NN" }
//! { "url": "", "performers": [], "contentRating": null, "imageIndex": 3 }
//! ```

use serde::{Deserialize, Serialize};

/// Content rating attached to a single image.
///
/// On the wire this is `null` for [`ContentRating::None`], `"NN"` for
/// [`ContentRating::Partial`] and `"N"` for [`ContentRating::Full`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<RatingCode>", into = "Option<RatingCode>")]
pub enum ContentRating {
    #[default]
    None,
    Partial,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum RatingCode {
    #[serde(rename = "NN")]
    Partial,
    #[serde(rename = "N")]
    Full,
}

impl From<Option<RatingCode>> for ContentRating {
    fn from(code: Option<RatingCode>) -> Self {
        match code {
            None => ContentRating::None,
            Some(RatingCode::Partial) => ContentRating::Partial,
            Some(RatingCode::Full) => ContentRating::Full,
        }
    }
}

impl From<ContentRating> for Option<RatingCode> {
    fn from(rating: ContentRating) -> Self {
        match rating {
            ContentRating::None => None,
            ContentRating::Partial => Some(RatingCode::Partial),
            ContentRating::Full => Some(RatingCode::Full),
        }
    }
}

/// An individually curated, non-generated image URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualLink {
    pub url: String,
    /// Unique, order-insignificant.
    #[serde(default)]
    pub performers: Vec<String>,
    #[serde(default)]
    pub content_rating: ContentRating,
}

impl ManualLink {
    /// An untagged link.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            performers: Vec::new(),
            content_rating: ContentRating::None,
        }
    }
}

/// Annotation for one resolved image.
///
/// With `image_index` set the tag describes a position in the
/// template-generated sequence and `url` is informational only. Without it
/// the tag is keyed by exact `url` and belongs to a manual link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTag {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub performers: Vec<String>,
    #[serde(default)]
    pub content_rating: ContentRating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_index: Option<usize>,
}

impl ImageTag {
    /// Whether this tag describes a template position rather than a manual URL.
    pub fn is_template_tag(&self) -> bool {
        self.image_index.is_some()
    }
}

/// Trim, drop empties, and de-duplicate a performer list, keeping the first
/// occurrence of each name.
pub fn normalize_performers<I, S>(performers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in performers {
        let name = name.as_ref().trim();
        if !name.is_empty() && !out.iter().any(|existing| existing == name) {
            out.push(name.to_string());
        }
    }
    out
}
