// src/crawl/mod.rs
// =============================================================================
// This module runs the crawl itself.
//
// Submodules:
// - config: the settings for a run and the shared HTTP client
// - task: one seed URL, fetched, extracted, written, failures absorbed
// - batch: all seed URLs at once, bounded concurrency, run summary
//
// There is no recursion: every seed is fetched exactly once and the links it
// yields are recorded, not followed.
// =============================================================================

mod batch;
mod config;
mod task;

pub use batch::{crawl_all, CrawlSummary};
pub use config::{CrawlConfig, DEFAULT_USER_AGENT};
