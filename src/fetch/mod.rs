// src/fetch/mod.rs
// =============================================================================
// This module downloads pages.
//
// Submodules:
// - http: the GET itself, the shared connection context and the error kinds
//
// This file (mod.rs) re-exports the public API so callers can write
// `fetch::fetch_page()` instead of `fetch::http::fetch_page()`.
// =============================================================================

mod http;

pub use http::{fetch_page, FetchContext, FetchError, FetchErrorKind};
