// src/extract/resolve.rs
// =============================================================================
// Resolves a possibly-relative href against the page it was found on.
//
// Url::join follows the WHATWG URL rules a browser uses:
//   base = "https://a.com/x/y"
//   "z"               -> "https://a.com/x/z"
//   "/docs"           -> "https://a.com/docs"
//   "//cdn.test/lib"  -> "https://cdn.test/lib"
//   "?q=1"            -> "https://a.com/x/y?q=1"
//   "#top"            -> "https://a.com/x/y#top"
// =============================================================================

use tracing::{debug, warn};
use url::Url;

// Returns Some(absolute_url), or None when the link is skipped
//
// Skipped links:
// - hrefs Url::join rejects (bad IPv6 literal, invalid port, ...)
// - links without a host (mailto:, javascript:, data:, tel:)
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let resolved = match base.join(href) {
        Ok(url) => url,
        Err(e) => {
            warn!("Error parsing url: {} ({})", href, e);
            return None;
        }
    };

    match resolved.host_str() {
        Some(host) if !host.is_empty() => Some(resolved.into()),
        _ => {
            debug!("Skipping link without a host: {}", resolved);
            None
        }
    }
}
