//! The combined link field: one template plus manually curated URLs.
//!
//! # Wire format
//!
//! The host stores a single string of comma-separated entries:
//!
//! ```text
//! https://cdn/@studio/*/##.jpg,https://other/a.jpg,https://other/b.jpg
//! └────────── template ───────┘ └─ manual ──────┘ └─ manual ──────┘
//! ```
//!
//! - An entry containing a digit run (`#`) is the template. Only the first
//!   such entry counts; later ones are dropped.
//! - Every other non-empty entry is a manual URL, kept verbatim and in order.
//!   Duplicates are allowed.
//!
//! # Known limitations
//!
//! - A manual URL containing a literal comma cannot be represented. It is
//!   split into several manual entries on parse. There is no escaping.
//! - A manual URL containing `#` (e.g. a fragment) is read as a template.
//! - A template with no digit run is not a template. [`build`] leaves it out
//!   rather than writing an entry that would parse back as a manual URL.
//! - Entries that are empty or whitespace-only are skipped. Everything else,
//!   surrounding whitespace included, is kept as written.
//!
//! Neither case is an error: parsing never fails and keeps as much of the
//! input as it can.
//!
//! Per-link performers and ratings are not in the string; they live in the
//! [`ImageTag`] list persisted next to it and are joined back on parse.

use crate::sequence::is_sequence_template;
use crate::types::{ImageTag, ManualLink};
use serde::{Deserialize, Serialize};

/// Template slots reserved in the legacy tag numbering, and the count the
/// estimator assumes for any sequence template.
pub const DEFAULT_RESERVED_TEMPLATE_SLOTS: usize = 50;

const SEPARATOR: char = ',';

/// Parsed form of the combined link field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSet {
    /// Empty when the field has no template entry.
    pub template: String,
    pub manual_links: Vec<ManualLink>,
}

impl LinkSet {
    pub fn new(template: impl Into<String>, manual_links: Vec<ManualLink>) -> Self {
        Self {
            template: template.into(),
            manual_links,
        }
    }

    /// Parse the combined string, joining per-URL tags onto manual links.
    pub fn parse(serialized: &str, tags: &[ImageTag]) -> Self {
        let (template, manual_links) = parse(serialized, tags);
        Self {
            template,
            manual_links,
        }
    }

    /// Serialize back to the combined string.
    pub fn build(&self) -> String {
        build(&self.template, &self.manual_links)
    }

    pub fn has_template(&self) -> bool {
        is_sequence_template(&self.template)
    }

    pub fn is_empty(&self) -> bool {
        self.template.is_empty() && self.manual_links.is_empty()
    }

    /// See [`estimate`].
    pub fn estimate(&self, reserved_slots: usize) -> usize {
        estimate_with(&self.template, &self.manual_links, reserved_slots)
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.manual_links.iter().map(|l| l.url.as_str())
    }
}

/// Split the combined string into its template and manual links.
///
/// Manual links pick up `performers` and `content_rating` from the first tag
/// whose `url` matches exactly and has no `image_index`. Links without a
/// matching tag are untagged.
pub fn parse(serialized: &str, tags: &[ImageTag]) -> (String, Vec<ManualLink>) {
    let mut template = String::new();
    let mut manual_links = Vec::new();

    for entry in serialized.split(SEPARATOR) {
        if entry.trim().is_empty() {
            continue;
        }
        if is_sequence_template(entry) {
            if template.is_empty() {
                template = entry.to_string();
            } else {
                tracing::debug!(entry, "ignoring extra template entry");
            }
            continue;
        }
        manual_links.push(tagged_link(entry, tags));
    }

    (template, manual_links)
}

fn tagged_link(url: &str, tags: &[ImageTag]) -> ManualLink {
    match tags.iter().find(|t| !t.is_template_tag() && t.url == url) {
        Some(tag) => ManualLink {
            url: url.to_string(),
            performers: tag.performers.clone(),
            content_rating: tag.content_rating,
        },
        None => ManualLink::new(url),
    }
}

/// Join a template and manual links into the combined string.
///
/// The template goes first when it has a digit run; otherwise it is dropped.
/// Tag-derived fields are not written; they travel in the tag list.
pub fn build(template: &str, manual_links: &[ManualLink]) -> String {
    let template = if is_sequence_template(template) {
        Some(template)
    } else {
        if !template.trim().is_empty() {
            tracing::debug!(template, "dropping template without a digit run");
        }
        None
    };
    template
        .into_iter()
        .chain(manual_links.iter().map(|l| l.url.as_str()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Rough total image count for UI expectation-setting.
///
/// A sequence template counts as a fixed [`DEFAULT_RESERVED_TEMPLATE_SLOTS`]
/// images regardless of how many actually exist. This is an upper-bound
/// guess, not a count.
pub fn estimate(template: &str, manual_links: &[ManualLink]) -> usize {
    estimate_with(template, manual_links, DEFAULT_RESERVED_TEMPLATE_SLOTS)
}

/// [`estimate`] with an explicit reserved-slot count.
pub fn estimate_with(template: &str, manual_links: &[ManualLink], reserved_slots: usize) -> usize {
    let generated = if is_sequence_template(template) {
        reserved_slots
    } else {
        0
    };
    generated + manual_links.len()
}
