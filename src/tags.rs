//! Tag bookkeeping for generated and manual images.
//!
//! Every image shown for a record can carry an [`ImageTag`]. Two kinds share
//! one list:
//!
//! - **Template tags** have `image_index` set and describe a position in the
//!   template-generated sequence. Their `url` is informational.
//! - **Manual tags** have no `image_index` and are keyed by exact `url`.
//!
//! The ledger keeps the list consistent as the caller edits the template or
//! the manual links. Lookups tolerate inconsistency: a missing tag reads as
//! "untagged", and orphans left behind by outside edits are only removed by
//! an explicit [`TagLedger::prune`].
//!
//! ## Slot numbering
//!
//! For legacy ordering, template positions occupy slots `[0, reserved)` and
//! the k-th manual link sits at slot `reserved + k` (see
//! [`TagLedger::manual_slot`]). The reserved count defaults to
//! [`DEFAULT_RESERVED_TEMPLATE_SLOTS`]. It is a numbering convention only;
//! sequences longer than the reserved range are still generated, their extra
//! positions just can't be tagged from the template side.

use crate::links::{DEFAULT_RESERVED_TEMPLATE_SLOTS, LinkSet};
use crate::sequence::is_sequence_template;
use crate::types::{ContentRating, ImageTag, normalize_performers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLedger {
    tags: Vec<ImageTag>,
    reserved_slots: usize,
}

impl Default for TagLedger {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TagLedger {
    pub fn new(tags: Vec<ImageTag>) -> Self {
        Self::with_reserved_slots(tags, DEFAULT_RESERVED_TEMPLATE_SLOTS)
    }

    pub fn with_reserved_slots(tags: Vec<ImageTag>, reserved_slots: usize) -> Self {
        Self {
            tags,
            reserved_slots,
        }
    }

    pub fn tags(&self) -> &[ImageTag] {
        &self.tags
    }

    pub fn into_tags(self) -> Vec<ImageTag> {
        self.tags
    }

    pub fn reserved_slots(&self) -> usize {
        self.reserved_slots
    }

    /// Legacy slot number for the k-th manual link.
    pub fn manual_slot(&self, k: usize) -> usize {
        self.reserved_slots + k
    }

    fn in_template_range(&self, index: usize) -> bool {
        index < self.reserved_slots
    }

    pub fn tag_for_url(&self, url: &str) -> Option<&ImageTag> {
        self.tags
            .iter()
            .find(|t| !t.is_template_tag() && t.url == url)
    }

    pub fn tag_for_index(&self, index: usize) -> Option<&ImageTag> {
        self.tags.iter().find(|t| t.image_index == Some(index))
    }

    /// React to a template edit. A template that is empty or has no digit run
    /// invalidates every template tag; otherwise template tags stay.
    pub fn on_template_changed(&mut self, new_template: &str) {
        if is_sequence_template(new_template) {
            return;
        }
        let before = self.tags.len();
        self.tags.retain(|t| !t.is_template_tag());
        let dropped = before - self.tags.len();
        if dropped > 0 {
            tracing::debug!(dropped, "cleared template tags");
        }
    }

    /// Replace `performers` on every template tag in the reserved range.
    /// Ratings are left alone.
    pub fn assign_template_performers<S: AsRef<str>>(&mut self, performers: &[S]) {
        let performers = normalize_performers(performers);
        let reserved = self.reserved_slots;
        for tag in &mut self.tags {
            if tag.image_index.is_some_and(|i| i < reserved) {
                tag.performers = performers.clone();
            }
        }
    }

    /// Tag one template position, creating the tag if needed. Returns `false`
    /// without changing anything when `index` is outside the reserved range.
    pub fn set_template_tag<S: AsRef<str>>(
        &mut self,
        index: usize,
        url: &str,
        performers: &[S],
        content_rating: ContentRating,
    ) -> bool {
        if !self.in_template_range(index) {
            return false;
        }
        let performers = normalize_performers(performers);
        match self.tags.iter_mut().find(|t| t.image_index == Some(index)) {
            Some(tag) => {
                tag.url = url.to_string();
                tag.performers = performers;
                tag.content_rating = content_rating;
            }
            None => self.tags.push(ImageTag {
                url: url.to_string(),
                performers,
                content_rating,
                image_index: Some(index),
            }),
        }
        true
    }

    /// Start tracking a new manual link as untagged. A link that already has
    /// a tag (e.g. a duplicate URL) keeps it.
    pub fn add_manual_link(&mut self, url: &str) {
        if self.tag_for_url(url).is_some() {
            return;
        }
        self.tags.push(ImageTag {
            url: url.to_string(),
            performers: Vec::new(),
            content_rating: ContentRating::None,
            image_index: None,
        });
    }

    /// Drop the tag for a removed manual link.
    pub fn remove_manual_link(&mut self, url: &str) {
        self.tags.retain(|t| t.is_template_tag() || t.url != url);
    }

    /// Update a manual link's tag in place. A missing tag is created.
    pub fn update_manual_link<S: AsRef<str>>(
        &mut self,
        url: &str,
        performers: &[S],
        content_rating: ContentRating,
    ) {
        let performers = normalize_performers(performers);
        match self
            .tags
            .iter_mut()
            .find(|t| !t.is_template_tag() && t.url == url)
        {
            Some(tag) => {
                tag.performers = performers;
                tag.content_rating = content_rating;
            }
            None => self.tags.push(ImageTag {
                url: url.to_string(),
                performers,
                content_rating,
                image_index: None,
            }),
        }
    }

    /// Remove tags that no longer describe anything in `links`: manual tags
    /// whose URL is gone, template tags when there is no sequence template,
    /// and template tags outside the reserved range.
    pub fn prune(&mut self, links: &LinkSet) {
        let has_template = links.has_template();
        let reserved = self.reserved_slots;
        let before = self.tags.len();
        self.tags.retain(|t| match t.image_index {
            Some(i) => has_template && i < reserved,
            None => links.urls().any(|u| u == t.url),
        });
        let pruned = before - self.tags.len();
        if pruned > 0 {
            tracing::debug!(pruned, "pruned orphan tags");
        }
    }
}
