// src/extract/mod.rs
// =============================================================================
// This module turns a fetched page into the set of absolute links it points to.
//
// Submodules:
// - pattern: scans the raw text for href="..." (the default)
// - html: parses the page with scraper and reads every a[href]
// - resolve: joins an href onto the page URL and filters non-web links
//
// Both scanners feed the same resolver, so the output rules are identical:
// every returned string is an absolute URL with a scheme and a host.
//
// Rust concepts:
// - Enums: To pick which scanner runs
// - HashSet: Links are unique per page
// - Iterators: filter_map() drops links that fail to resolve
// =============================================================================

mod html;
mod pattern;
mod resolve;

use std::collections::HashSet;

use clap::ValueEnum;
use tracing::{info, warn};
use url::Url;

// Which scanner to run over the page body
//
// #[derive(ValueEnum)] lets clap accept `--extractor pattern` / `--extractor html`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExtractMode {
    /// Textual href="..." scan; misses single-quoted and unquoted attributes
    #[default]
    Pattern,
    /// Full HTML parse of every <a href>; a strict superset of `pattern`
    Html,
}

// Extracts every link on a page as an absolute URL
//
// Parameters:
//   content: the page body (borrowed, the caller drops it afterwards)
//   base_url: the URL the page was fetched from
//   mode: which scanner to use
//
// Returns: the set of resolved links, possibly empty
//
// Example:
//   content = r#"<a href="/b">B</a>"#
//   base_url = "https://a.test/"
//   result = {"https://a.test/b"}
pub fn extract_links(content: &str, base_url: &str, mode: ExtractMode) -> HashSet<String> {
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            warn!("Invalid base URL {}: {}", base_url, e);
            return HashSet::new();
        }
    };

    let found: HashSet<String> = match mode {
        ExtractMode::Pattern => pattern::href_targets(content)
            .filter_map(|href| resolve::resolve_link(&base, href))
            .collect(),
        ExtractMode::Html => html::href_targets(content)
            .iter()
            .filter_map(|href| resolve::resolve_link(&base, href))
            .collect(),
    };

    info!("found {} links for {}", found.len(), base_url);
    found
}
