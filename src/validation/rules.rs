//! URL-pattern rules: the cheap first stage of placeholder detection.
//!
//! Image hosts publish a stand-in before real artwork exists, and they tend
//! to do it at predictable places: a reserved `now_printing` path or
//! filename, an SVG error icon, or a `noimage`-style name. Matching the
//! lowercased URL against a denylist of such substrings catches these
//! without any network access.

use crate::sequence::strip_digit_run;

/// Stock denylist. Each entry is matched as a lowercase substring.
pub const DEFAULT_PLACEHOLDER_PATTERNS: &[&str] = &[
    "/now_printing/",
    "now_printing",
    "nowprinting",
    ".svg",
    "noimage",
    "no_image",
    "no-image",
    "notfound",
    "not_found",
    "not-found",
    "image_not_available",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderRules {
    patterns: Vec<String>,
}

impl Default for PlaceholderRules {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_PATTERNS.iter().copied())
    }
}

impl PlaceholderRules {
    /// Build from raw patterns. Patterns are lowercased; blank ones dropped.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// First denylist entry found in `url`, if any.
    pub fn matched_pattern(&self, url: &str) -> Option<&str> {
        let lowered = url.to_lowercase();
        self.patterns
            .iter()
            .find(|p| lowered.contains(p.as_str()))
            .map(String::as_str)
    }

    pub fn is_placeholder_url(&self, url: &str) -> bool {
        self.matched_pattern(url).is_some()
    }

    /// Whether the template itself points at a placeholder, in which case
    /// every URL it generates would too and the gallery can be suppressed
    /// without checking them one by one.
    ///
    /// Only the digit-run marker is removed; tokens stay unresolved.
    pub fn template_is_entirely_placeholder(&self, template: &str) -> bool {
        self.is_placeholder_url(&strip_digit_run(template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_printing_path_matches() {
        let rules = PlaceholderRules::default();
        assert_eq!(
            rules.matched_pattern("https://pics.example/n/now_printing/now_printing.jpg"),
            Some("/now_printing/")
        );
    }

    #[test]
    fn svg_icon_matches() {
        let rules = PlaceholderRules::default();
        assert_eq!(rules.matched_pattern("https://h/static/icon.svg"), Some(".svg"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rules = PlaceholderRules::default();
        assert!(rules.is_placeholder_url("https://h/NoImage_Large.JPG"));
    }

    #[test]
    fn ordinary_urls_pass() {
        let rules = PlaceholderRules::default();
        assert!(!rules.is_placeholder_url("https://h/abp123/abp123pl.jpg"));
        assert!(!rules.is_placeholder_url("https://h/img01.jpg"));
    }

    #[test]
    fn custom_patterns_are_normalised() {
        let rules = PlaceholderRules::new(["  COMING_SOON ", ""]);
        assert_eq!(rules.patterns(), ["coming_soon"]);
        assert!(rules.is_placeholder_url("https://h/coming_soon.png"));
        assert!(!rules.is_placeholder_url("https://h/icon.svg"));
    }

    #[test]
    fn whole_template_suppression() {
        let rules = PlaceholderRules::default();
        assert!(rules.template_is_entirely_placeholder("https://host/n/now_printing/now_printing.jpg#"));
        assert!(!rules.template_is_entirely_placeholder("https://host/img##.jpg"));
    }

    #[test]
    fn suppression_sees_text_split_by_the_run() {
        let rules = PlaceholderRules::new(["now_printing"]);
        assert!(rules.template_is_entirely_placeholder("https://h/now_##printing.jpg"));
    }
}
