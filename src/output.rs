//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.
//!
//! ## Expand
//!
//! ```text
//! 001 https://cdn/prestige/abp-123-01.jpg
//! 002 https://cdn/prestige/abp-123-02.jpg
//! ```
//!
//! ## Classify
//!
//! ```text
//! 001 placeholder https://h/now_printing.jpg
//!     url matches placeholder pattern 'now_printing'
//! 002 valid https://h/01.jpg
//!     800x540, ~61234 bytes
//! ```
//!
//! ## Parse
//!
//! ```text
//! Template
//!     https://cdn/@studio/*-##.jpg
//! Manual links
//! 050 https://h/a.jpg
//!     Performers: Rei, Yui
//!     Rating: partial
//! Estimated images: 51
//! ```

use crate::links::LinkSet;
use crate::types::ContentRating;
use crate::validation::ValidationResult;

fn index_prefix(index: usize) -> String {
    format!("{:03}", index)
}

fn rating_label(rating: ContentRating) -> &'static str {
    match rating {
        ContentRating::None => "none",
        ContentRating::Partial => "partial",
        ContentRating::Full => "full",
    }
}

pub fn format_expansion(urls: &[String]) -> Vec<String> {
    if urls.is_empty() {
        return vec!["(not a sequence template)".to_string()];
    }
    urls.iter()
        .enumerate()
        .map(|(i, url)| format!("{} {}", index_prefix(i + 1), url))
        .collect()
}

pub fn print_expansion(urls: &[String]) {
    for line in format_expansion(urls) {
        println!("{}", line);
    }
}

pub fn format_classification(urls: &[String], results: &[ValidationResult]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (url, result)) in urls.iter().zip(results).enumerate() {
        lines.push(format!("{} {} {}", index_prefix(i + 1), result.verdict, url));
        lines.push(format!("    {}", result.reason));
    }
    lines
}

pub fn print_classification(urls: &[String], results: &[ValidationResult]) {
    for line in format_classification(urls, results) {
        println!("{}", line);
    }
}

/// `reserved_slots` numbers manual links the way the tag ledger does.
pub fn format_link_set(set: &LinkSet, reserved_slots: usize) -> Vec<String> {
    let mut lines = Vec::new();

    if !set.template.is_empty() {
        lines.push("Template".to_string());
        lines.push(format!("    {}", set.template));
    }

    if !set.manual_links.is_empty() {
        lines.push("Manual links".to_string());
        for (k, link) in set.manual_links.iter().enumerate() {
            lines.push(format!("{} {}", index_prefix(reserved_slots + k), link.url));
            if !link.performers.is_empty() {
                lines.push(format!("    Performers: {}", link.performers.join(", ")));
            }
            if link.content_rating != ContentRating::None {
                lines.push(format!("    Rating: {}", rating_label(link.content_rating)));
            }
        }
    }

    lines.push(format!("Estimated images: {}", set.estimate(reserved_slots)));
    lines
}

pub fn print_link_set(set: &LinkSet, reserved_slots: usize) {
    for line in format_link_set(set, reserved_slots) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::manual;
    use crate::types::ManualLink;

    #[test]
    fn expansion_lines_are_numbered_from_one() {
        let lines = format_expansion(&["a1".to_string(), "a2".to_string()]);
        assert_eq!(lines, ["001 a1", "002 a2"]);
    }

    #[test]
    fn empty_expansion_says_why() {
        assert_eq!(format_expansion(&[]), ["(not a sequence template)"]);
    }

    #[test]
    fn classification_shows_verdict_and_reason() {
        let urls = vec!["https://h/x.svg".to_string()];
        let results = vec![ValidationResult::placeholder("url matches placeholder pattern '.svg'")];
        let lines = format_classification(&urls, &results);
        assert_eq!(lines[0], "001 placeholder https://h/x.svg");
        assert_eq!(lines[1], "    url matches placeholder pattern '.svg'");
    }

    #[test]
    fn link_set_lists_template_then_manual_links() {
        let set = LinkSet::new(
            "https://cdn/##.jpg",
            vec![
                ManualLink {
                    url: "https://h/a.jpg".into(),
                    performers: vec!["Rei".into(), "Yui".into()],
                    content_rating: ContentRating::Partial,
                },
                manual("https://h/b.jpg"),
            ],
        );
        let lines = format_link_set(&set, 50);
        assert_eq!(
            lines,
            [
                "Template",
                "    https://cdn/##.jpg",
                "Manual links",
                "050 https://h/a.jpg",
                "    Performers: Rei, Yui",
                "    Rating: partial",
                "051 https://h/b.jpg",
                "Estimated images: 52",
            ]
        );
    }

    #[test]
    fn empty_link_set_only_estimates() {
        assert_eq!(format_link_set(&LinkSet::default(), 50), ["Estimated images: 0"]);
    }
}
