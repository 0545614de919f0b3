//! Placeholder resolution for media-link templates.
//!
//! A template is a URL with tokens that are filled from the host record:
//!
//! | Token | Replaced with |
//! |---|---|
//! | `*` | the record code, verbatim |
//! | `@studio` | the studio name, lowercased |
//! | `@firstname` | first part of the first performer's name, lowercased |
//! | `@lastname` | last part of the first performer's name, lowercased |
//!
//! Runs of `#` are the digit-run marker owned by [`sequence`](crate::sequence)
//! and pass through resolution untouched.
//!
//! A token whose context field is missing stays in the output as literal
//! text. Callers detect an incomplete preview with [`has_unresolved_tokens`]
//! instead of getting an error.
//!
//! Substitution is a single left-to-right scan, so text inserted for one
//! token is never re-scanned for another (a code containing `@studio` stays
//! as-is).

use crate::names::parse_performer_name;
use serde::{Deserialize, Serialize};

pub const CODE_TOKEN: &str = "*";
pub const STUDIO_TOKEN: &str = "@studio";
pub const FIRSTNAME_TOKEN: &str = "@firstname";
pub const LASTNAME_TOKEN: &str = "@lastname";

/// No token is a prefix of another, so match order doesn't matter.
const TOKENS: &[&str] = &[STUDIO_TOKEN, FIRSTNAME_TOKEN, LASTNAME_TOKEN, CODE_TOKEN];

/// The three scalar fields a template may draw from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateContext {
    pub code: Option<String>,
    pub studio: Option<String>,
    pub performer: Option<String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_studio(mut self, studio: impl Into<String>) -> Self {
        self.studio = Some(studio.into());
        self
    }

    pub fn with_performer(mut self, performer: impl Into<String>) -> Self {
        self.performer = Some(performer.into());
        self
    }
}

/// Context values pre-computed once per resolve call.
struct Substitutions {
    code: Option<String>,
    studio: Option<String>,
    first: Option<String>,
    last: Option<String>,
}

impl Substitutions {
    fn from_context(ctx: &TemplateContext) -> Self {
        let name = ctx.performer.as_deref().and_then(parse_performer_name);
        Self {
            code: ctx.code.clone().filter(|c| !c.is_empty()),
            studio: ctx
                .studio
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
            first: name.as_ref().map(|n| n.first.clone()),
            last: name.map(|n| n.last),
        }
    }

    fn value_for(&self, token: &str) -> Option<&str> {
        match token {
            CODE_TOKEN => self.code.as_deref(),
            STUDIO_TOKEN => self.studio.as_deref(),
            FIRSTNAME_TOKEN => self.first.as_deref(),
            LASTNAME_TOKEN => self.last.as_deref(),
            _ => None,
        }
    }
}

/// Find the token starting at the beginning of `s`, if any.
fn token_at(s: &str) -> Option<&'static str> {
    TOKENS.iter().copied().find(|t| s.starts_with(t))
}

/// Substitute every token whose context field is present.
///
/// ```
/// use media_links::template::{resolve, TemplateContext};
///
/// let ctx = TemplateContext::new().with_code("ABP-123").with_studio("Prestige");
/// assert_eq!(resolve("https://cdn/@studio/*/##.jpg", &ctx), "https://cdn/prestige/ABP-123/##.jpg");
/// assert_eq!(resolve("@firstname.jpg", &ctx), "@firstname.jpg");
/// ```
pub fn resolve(template: &str, ctx: &TemplateContext) -> String {
    let subs = Substitutions::from_context(ctx);
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if let Some(token) = token_at(rest) {
            out.push_str(subs.value_for(token).unwrap_or(token));
            rest = &rest[token.len()..];
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    out
}

/// Whether `s` still contains any token syntax.
pub fn has_unresolved_tokens(s: &str) -> bool {
    s.char_indices().any(|(i, _)| token_at(&s[i..]).is_some())
}

/// Expand a template for display, or `None` when some token could not be
/// resolved from `ctx` and the preview would show raw token text.
pub fn preview(template: &str, ctx: &TemplateContext, max_count: usize) -> Option<Vec<String>> {
    if has_unresolved_tokens(&resolve(template, ctx)) {
        return None;
    }
    Some(crate::sequence::expand(template, ctx, max_count))
}
