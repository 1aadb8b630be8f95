// src/crawl/task.rs
// =============================================================================
// One crawl task: fetch a single seed URL, pull its links out, and hand them
// to the sink.
//
// A task never fails from the caller's point of view. Whatever goes wrong
// (bad status, timeout, refused connection, even a panic in the extractor)
// is logged here and turned into a `CrawlOutcome::Failed`, so one bad URL
// cannot stop its siblings.
//
// Rust concepts:
// - Enums with data: The outcome is either a set of links or a failure tag
// - catch_unwind: Turns a panic inside a future into an Err value
// - AssertUnwindSafe: Tells the compiler we accept the unwind-safety risk
// =============================================================================

use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::error;

use crate::extract::{extract_links, ExtractMode};
use crate::fetch::{fetch_page, FetchContext, FetchError, FetchErrorKind};
use crate::sink::{ResultSink, SinkError};

/// Why a task produced no links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The fetcher reported a known error
    Fetch(FetchErrorKind),
    /// Something panicked while crawling the URL
    Unexpected,
}

/// The result of crawling one URL
#[derive(Debug)]
pub enum CrawlOutcome {
    /// The page was fetched; the set may still be empty
    Found(HashSet<String>),
    Failed(FailureKind),
}

impl CrawlOutcome {
    // The links the sink should write; empty for failures
    //
    // This is where "fetch failed" and "page had no links" become the same
    // thing: both end up as an empty set.
    pub fn into_links(self) -> HashSet<String> {
        match self {
            CrawlOutcome::Found(links) => links,
            CrawlOutcome::Failed(_) => HashSet::new(),
        }
    }

    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            CrawlOutcome::Found(_) => None,
            CrawlOutcome::Failed(kind) => Some(*kind),
        }
    }
}

// What one task contributed to the run, for the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskReport {
    pub failure: Option<FailureKind>,
    pub records: usize,
}

// Fetches `url` and extracts its links, absorbing every failure
pub async fn run(url: &str, context: &FetchContext, mode: ExtractMode) -> CrawlOutcome {
    isolate(url, parse(url, context, mode)).await
}

// Runs one task and appends its links to the sink
//
// Only a sink failure comes back as Err; that is a problem with the output
// file, not with the URL, and the batch must stop.
pub async fn write_one(
    url: &str,
    context: &FetchContext,
    mode: ExtractMode,
    sink: &ResultSink,
) -> Result<TaskReport, SinkError> {
    let outcome = run(url, context, mode).await;
    record(url, outcome, sink).await
}

// Hands a finished outcome to the sink and reports what was written
pub async fn record(
    url: &str,
    outcome: CrawlOutcome,
    sink: &ResultSink,
) -> Result<TaskReport, SinkError> {
    let failure = outcome.failure();
    let records = sink.append(url, &outcome.into_links()).await?;
    Ok(TaskReport { failure, records })
}

async fn parse(
    url: &str,
    context: &FetchContext,
    mode: ExtractMode,
) -> Result<HashSet<String>, FetchError> {
    let html = fetch_page(url, context).await?;
    Ok(extract_links(&html, url, mode))
}

// The task boundary: known errors and panics both become CrawlOutcome::Failed
//
// Panics are logged with `unexpected = true` so they can be filtered apart
// from ordinary fetch failures.
pub async fn isolate<F>(url: &str, work: F) -> CrawlOutcome
where
    F: Future<Output = Result<HashSet<String>, FetchError>>,
{
    match AssertUnwindSafe(work).catch_unwind().await {
        Ok(Ok(links)) => CrawlOutcome::Found(links),
        Ok(Err(e)) => {
            error!(
                url,
                unexpected = false,
                kind = %e.kind(),
                status = ?e.status(),
                "fetch failed for {} [{}]: {}",
                url,
                e.status().map_or_else(|| "-".to_string(), |s| s.to_string()),
                e
            );
            CrawlOutcome::Failed(FailureKind::Fetch(e.kind()))
        }
        Err(payload) => {
            error!(
                url,
                unexpected = true,
                panic = %panic_message(payload.as_ref()),
                "unexpected failure while crawling {}",
                url
            );
            CrawlOutcome::Failed(FailureKind::Unexpected)
        }
    }
}

// Panics carry either a &str or a String; anything else has no message
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
