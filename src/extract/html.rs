// src/extract/html.rs
// =============================================================================
// The stricter link scanner, selected with `--extractor html`.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Unlike the pattern scanner this sees href='x' and href=x, and it decodes
// entities such as &amp; before the link is resolved.
// =============================================================================

use scraper::{Html, Selector};

// Returns the href attribute of every <a> element, in document order
//
// The returned strings are owned because `Html` is dropped at the end of
// this function.
pub fn href_targets(content: &str) -> Vec<String> {
    let document = Html::parse_document(content);

    // "a[href]" is a constant and known to be a valid selector
    let selector = Selector::parse("a[href]").expect("a[href] is a valid selector");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
