//! # Media Links
//!
//! The templated media-link engine of a media cataloguing tool. A record's
//! gallery is described by a short template string plus a list of manually
//! curated URLs; this crate turns that into concrete image URLs, keeps the
//! per-image tags consistent, and guesses which generated URLs point at
//! "image not ready" placeholders.
//!
//! # Flow
//!
//! ```text
//! combined field ──parse──▶ LinkSet { template, manual_links } ◀──tags── ImageTag[]
//!                               │
//!        template + context ────┼──resolve/expand──▶ preview URLs ──classify──▶ verdicts
//!                               │
//!        caller edits ──────────┴──TagLedger──▶ ImageTag[] ──build──▶ combined field
//! ```
//!
//! Storage, authentication and presentation belong to the host application.
//! The engine only reads three optional context fields (code, studio,
//! performer) and returns plain values: unresolved tokens, `Unknown`
//! verdicts and orphan tags are all ordinary results, never errors.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`template`] | Token substitution (`*`, `@studio`, `@firstname`, `@lastname`) |
//! | [`names`] | Performer-name parsing behind the name tokens |
//! | [`sequence`] | Digit-run (`#`) detection and URL sequence generation |
//! | [`links`] | Combined link-field parse/build and the image-count estimate |
//! | [`tags`] | [`TagLedger`](tags::TagLedger): keeps tags in step with edits |
//! | [`validation`] | Best-effort placeholder detection with a per-URL timeout |
//! | [`types`] | Persisted records (`ManualLink`, `ImageTag`, `ContentRating`) |
//! | [`config`] | `media-links.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Concurrency
//!
//! Everything except [`validation`] is pure and synchronous; callers own all
//! state and thread it through. Validation is async (tokio) and independent
//! per URL, with no cache and no retries.

pub mod config;
pub mod links;
pub mod names;
pub mod output;
pub mod sequence;
pub mod tags;
pub mod template;
pub mod types;
pub mod validation;

pub use links::LinkSet;
pub use tags::TagLedger;
pub use template::TemplateContext;
pub use types::{ContentRating, ImageTag, ManualLink};

#[cfg(test)]
pub(crate) mod test_helpers;
