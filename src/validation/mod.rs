//! Best-effort placeholder detection for generated gallery URLs.
//!
//! | Stage | Check | Needs network |
//! |---|---|---|
//! | **A** | URL matches a placeholder denylist pattern | no |
//! | **B** | decoded image too small, or re-encodes too small | yes |
//!
//! The module is split into:
//! - **Rules**: the Stage A denylist ([`PlaceholderRules`])
//! - **Heuristics**: verdict types and the pure Stage B decision ([`judge`])
//! - **Source**: [`ImageSource`] trait + [`NullSource`]
//! - **HTTP source**: [`HttpSource`], the production `ImageSource`
//! - **Validator**: [`GalleryValidator`], which runs both stages with a timeout

pub mod heuristics;
pub mod http_source;
pub mod rules;
pub mod source;
pub mod validator;

pub use heuristics::{Thresholds, ValidationResult, Verdict, judge};
pub use http_source::HttpSource;
pub use rules::{DEFAULT_PLACEHOLDER_PATTERNS, PlaceholderRules};
pub use source::{Dimensions, ImageSource, LoadedImage, NullSource, SourceError};
pub use validator::GalleryValidator;
