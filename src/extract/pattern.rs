// src/extract/pattern.rs
// =============================================================================
// The default link scanner: a plain-text search for href="...".
//
// This is not an HTML parser. It only sees double-quoted attributes, so
// href='x', href=x and attributes built by JavaScript are not found.
// Use the html scanner when those matter.
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;

// Non-greedy so two anchors on one line produce two matches
const HREF_PATTERN: &str = r#"href="(.*?)""#;

fn href_regex() -> &'static Regex {
    static HREF_RE: OnceLock<Regex> = OnceLock::new();
    // The pattern is a constant, so failing to compile it is a programmer error
    HREF_RE.get_or_init(|| Regex::new(HREF_PATTERN).expect("href pattern is a valid regex"))
}

// Yields the raw text between the quotes of every href="..." in `content`
pub fn href_targets(content: &str) -> impl Iterator<Item = &str> {
    href_regex()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_double_quoted_targets_in_order() {
        let html = r#"<a href="/one">1</a><a class="x" href="two.html">2</a>"#;
        let targets: Vec<&str> = href_targets(html).collect();
        assert_eq!(targets, vec!["/one", "two.html"]);
    }

    #[test]
    fn test_is_not_greedy() {
        let html = r#"<a href="/a">A</a> <a href="/b">B</a>"#;
        assert_eq!(href_targets(html).count(), 2);
    }

    #[test]
    fn test_ignores_single_quoted_and_unquoted() {
        let html = "<a href='/single'>s</a><a href=/bare>b</a>";
        assert_eq!(href_targets(html).count(), 0);
    }

    #[test]
    fn test_matches_any_tag_with_href() {
        // <link href="..."> is picked up too, the scan is purely textual
        let html = r#"<link rel="stylesheet" href="/style.css">"#;
        let targets: Vec<&str> = href_targets(html).collect();
        assert_eq!(targets, vec!["/style.css"]);
    }

    #[test]
    fn test_empty_href() {
        let targets: Vec<&str> = href_targets(r#"<a href="">here</a>"#).collect();
        assert_eq!(targets, vec![""]);
    }
}
