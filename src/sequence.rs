//! Sequence expansion: one template, many URLs.
//!
//! The first maximal run of `#` in a template is the digit-run marker. Its
//! length is the digit width:
//!
//! | Run | Indices | Rendering |
//! |---|---|---|
//! | `#` | 1, 2, … (unbounded) | `1`, `2`, … `10`, `11` (no padding) |
//! | `##` | 1..=99 | `01`, `02`, … `99` |
//! | `###` | 1..=999 | `001`, … `999` |
//!
//! Width 1 is the only unbounded width: `#` keeps counting past 9.
//!
//! Later `#` runs are not markers and are emitted literally. Expansion is pure
//! generation; nothing is fetched or filtered here.

use crate::template::{TemplateContext, resolve};

/// Location of the digit-run marker within a template (byte offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitRun {
    pub start: usize,
    pub width: usize,
}

impl DigitRun {
    pub fn end(self) -> usize {
        self.start + self.width
    }

    /// Highest index this width can render, `None` for unbounded.
    pub fn max_index(self) -> Option<usize> {
        if self.width <= 1 {
            return None;
        }
        u32::try_from(self.width)
            .ok()
            .and_then(|w| 10usize.checked_pow(w))
            .map(|p| p - 1)
    }

    /// Render `index` in this run's width.
    pub fn render(self, index: usize) -> String {
        if self.width <= 1 {
            index.to_string()
        } else {
            format!("{:0width$}", index, width = self.width)
        }
    }
}

/// Find the first maximal run of `#`.
pub fn find_digit_run(template: &str) -> Option<DigitRun> {
    let start = template.find('#')?;
    let width = template[start..].bytes().take_while(|&b| b == b'#').count();
    Some(DigitRun { start, width })
}

/// Whether `template` describes a sequence (contains a digit run).
pub fn is_sequence_template(template: &str) -> bool {
    find_digit_run(template).is_some()
}

/// Remove the digit-run marker, leaving the rest of the template as written.
pub fn strip_digit_run(template: &str) -> String {
    match find_digit_run(template) {
        Some(run) => format!("{}{}", &template[..run.start], &template[run.end()..]),
        None => template.to_string(),
    }
}

/// Generate up to `max_count` URLs, index 1 upward, in ascending order.
///
/// Returns an empty list for templates without a digit run. Tokens are
/// resolved through [`resolve`]; unresolved tokens stay literal in every URL.
///
/// ```
/// use media_links::sequence::expand;
/// use media_links::template::TemplateContext;
///
/// let urls = expand("img##.jpg", &TemplateContext::new(), 3);
/// assert_eq!(urls, ["img01.jpg", "img02.jpg", "img03.jpg"]);
/// ```
pub fn expand(template: &str, ctx: &TemplateContext, max_count: usize) -> Vec<String> {
    let Some(run) = find_digit_run(template) else {
        return Vec::new();
    };

    // Resolve each side separately so a `#` inside a context value can never
    // be mistaken for the marker.
    let prefix = resolve(&template[..run.start], ctx);
    let suffix = resolve(&template[run.end()..], ctx);

    let count = run.max_index().map_or(max_count, |cap| cap.min(max_count));
    (1..=count)
        .map(|i| format!("{prefix}{}{suffix}", run.render(i)))
        .collect()
}
