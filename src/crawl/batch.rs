// src/crawl/batch.rs
// =============================================================================
// This module crawls a whole batch of seed URLs.
//
// How it works:
// 1. Build one HTTP client for the batch (one connection pool for all tasks)
// 2. Turn every seed into a crawl task future
// 3. Run up to `concurrency` of them at once with buffer_unordered
// 4. Fold each finished task's report into a CrawlSummary
//
// Tasks write their own lines to the sink as they finish, so the output order
// is completion order. A failing URL only shows up in the logs and the
// summary; a failing sink stops the whole batch.
//
// Rust concepts:
// - Streams: An async iterator of futures
// - buffer_unordered: Runs N futures at once, yields results as they finish
// - try_fold: Like fold, but stops at the first Err
// =============================================================================

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;
use tracing::info;

use super::config::CrawlConfig;
use super::task::{self, FailureKind, TaskReport};
use crate::fetch::FetchContext;
use crate::sink::{ResultSink, SinkError};

/// Totals for one run, printed when the batch finishes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub seeds: usize,
    pub pages_with_links: usize,
    pub pages_without_links: usize,
    pub fetch_failures: usize,
    pub unexpected_failures: usize,
    pub records_written: usize,
}

impl CrawlSummary {
    fn new(seeds: usize) -> Self {
        Self {
            seeds,
            ..Self::default()
        }
    }

    fn record(&mut self, report: TaskReport) {
        match report.failure {
            Some(FailureKind::Fetch(_)) => self.fetch_failures += 1,
            Some(FailureKind::Unexpected) => self.unexpected_failures += 1,
            None if report.records > 0 => self.pages_with_links += 1,
            None => self.pages_without_links += 1,
        }
        self.records_written += report.records;
    }
}

// Crawls every seed URL and writes the results to `sink`
//
// Parameters:
//   seeds: the unique seed URLs (read once, never modified)
//   sink: the output file, header already written
//   config: concurrency, timeout, headers and extractor for this run
//
// Returns: the run summary, or the first sink error
pub async fn crawl_all(
    seeds: &HashSet<String>,
    sink: &ResultSink,
    config: &CrawlConfig,
) -> Result<CrawlSummary> {
    let client = config
        .build_client()
        .context("failed to build the HTTP client")?;
    let context = FetchContext::new(client, config.headers.clone());
    let limit = config.effective_concurrency(seeds.len());

    info!("crawling {} seed url(s), {} at a time", seeds.len(), limit);

    let summary = drive(seeds, sink, limit, |url| {
        task::write_one(url, &context, config.extract_mode, sink)
    })
    .await?;

    info!(
        "crawl finished: {} record(s) from {} page(s)",
        summary.records_written, summary.pages_with_links
    );
    Ok(summary)
}

// Runs `task` once per seed, at most `limit` at a time, and folds the reports
async fn drive<'a, F, Fut>(
    seeds: &'a HashSet<String>,
    sink: &ResultSink,
    limit: usize,
    run_one: F,
) -> Result<CrawlSummary>
where
    F: FnMut(&'a String) -> Fut,
    Fut: Future<Output = Result<TaskReport, SinkError>>,
{
    stream::iter(seeds)
        .map(run_one)
        .buffer_unordered(limit)
        .try_fold(CrawlSummary::new(seeds.len()), |mut summary, report| async move {
            summary.record(report);
            Ok::<_, SinkError>(summary)
        })
        .await
        .with_context(|| format!("aborting crawl, could not write to {}", sink.path().display()))
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. What is buffer_unordered?
//    - It pulls futures from the stream and keeps up to N of them running
//    - Results come out in the order they finish, not the order they started
//    - With --concurrency 0 the limit is the number of seeds
//
// 2. Are the tasks threads?
//    - No, they are futures polled on the current task
//    - They take turns at every .await (network, body read, file write)
//
// 3. Why does a SinkError stop everything?
//    - try_fold returns as soon as one item is Err
//    - The remaining futures are dropped, which cancels them
//    - Lines already written stay in the file and are complete
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractMode;
    use crate::fetch::FetchError;
    use reqwest::header::HeaderMap;
    use reqwest::Client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn seeds(items: &[String]) -> HashSet<String> {
        items.iter().cloned().collect()
    }

    async fn mount(server: &MockServer, route: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    fn records(sink: &ResultSink) -> Vec<String> {
        let contents = std::fs::read_to_string(sink.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("source_url\tparsed_url"));
        let mut rest: Vec<String> = lines.map(str::to_string).collect();
        rest.sort();
        rest
    }

    #[tokio::test]
    async fn test_single_seed_end_to_end() {
        let server = MockServer::start().await;
        mount(&server, "/", 200, r#"<a href="/b">...<a href="https://c.test/d">"#).await;
        let seed = format!("{}/", server.uri());

        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::create(dir.path().join("out.tsv")).await.unwrap();

        let summary = crawl_all(&seeds(&[seed.clone()]), &sink, &CrawlConfig::default())
            .await
            .unwrap();

        let mut expected = vec![
            format!("{}\t{}/b", seed, server.uri()),
            format!("{}\thttps://c.test/d", seed),
        ];
        expected.sort();
        assert_eq!(records(&sink), expected);
        assert_eq!(summary.records_written, 2);
        assert_eq!(summary.pages_with_links, 1);
    }

    #[tokio::test]
    async fn test_not_found_seed_writes_header_only() {
        let server = MockServer::start().await;
        mount(&server, "/", 404, r#"<a href="/never">x</a>"#).await;

        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::create(dir.path().join("out.tsv")).await.unwrap();

        let summary = crawl_all(
            &seeds(&[format!("{}/", server.uri())]),
            &sink,
            &CrawlConfig::default(),
        )
        .await
        .unwrap();

        assert!(records(&sink).is_empty());
        assert_eq!(summary.fetch_failures, 1);
        assert_eq!(summary.records_written, 0);
    }

    #[tokio::test]
    async fn test_failing_seed_does_not_block_others() {
        let server = MockServer::start().await;
        mount(&server, "/broken", 500, "").await;
        mount(&server, "/one", 200, r#"<a href="/one/child">c</a>"#).await;
        mount(&server, "/two", 200, r#"<a href="https://elsewhere.test/">e</a>"#).await;
        mount(&server, "/empty", 200, "<p>no anchors</p>").await;

        let broken = format!("{}/broken", server.uri());
        let one = format!("{}/one", server.uri());
        let two = format!("{}/two", server.uri());
        let empty = format!("{}/empty", server.uri());

        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::create(dir.path().join("out.tsv")).await.unwrap();

        let summary = crawl_all(
            &seeds(&[broken.clone(), one.clone(), two.clone(), empty.clone()]),
            &sink,
            &CrawlConfig::default(),
        )
        .await
        .unwrap();

        let lines = records(&sink);
        let mut expected = vec![
            format!("{}\t{}/one/child", one, server.uri()),
            format!("{}\thttps://elsewhere.test/", two),
        ];
        expected.sort();
        assert_eq!(lines, expected);
        assert!(!lines.iter().any(|l| l.starts_with(&broken)));
        assert!(!lines.iter().any(|l| l.starts_with(&empty)));

        assert_eq!(
            summary,
            CrawlSummary {
                seeds: 4,
                pages_with_links: 2,
                pages_without_links: 1,
                fetch_failures: 1,
                unexpected_failures: 0,
                records_written: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_many_seeds_with_small_limit() {
        let server = MockServer::start().await;
        let mut all = Vec::new();
        for i in 0..30 {
            let route = format!("/p{}", i);
            mount(&server, &route, 200, r#"<a href="a">a</a><a href="b">b</a>"#).await;
            all.push(format!("{}{}", server.uri(), route));
        }

        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::create(dir.path().join("out.tsv")).await.unwrap();
        let config = CrawlConfig {
            concurrency: 4,
            ..CrawlConfig::default()
        };

        let summary = crawl_all(&seeds(&all), &sink, &config).await.unwrap();

        let lines = records(&sink);
        assert_eq!(lines.len(), 60);
        assert_eq!(summary.records_written, 60);
        for line in &lines {
            let (source, link) = line.split_once('\t').unwrap();
            assert!(all.contains(&source.to_string()));
            assert!(link.starts_with("http://"));
        }
    }

    #[tokio::test]
    async fn test_empty_seed_set() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::create(dir.path().join("out.tsv")).await.unwrap();

        let summary = crawl_all(&HashSet::new(), &sink, &CrawlConfig::default())
            .await
            .unwrap();
        assert_eq!(summary, CrawlSummary::default());
        assert!(records(&sink).is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_aborts_batch() {
        let server = MockServer::start().await;
        mount(&server, "/", 200, r#"<a href="/b">b</a>"#).await;

        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::create(dir.path().join("out.tsv")).await.unwrap();
        dir.close().unwrap();

        let result = crawl_all(
            &seeds(&[format!("{}/", server.uri())]),
            &sink,
            &CrawlConfig::default(),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unbounded_html_mode_with_mixed_seeds() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/page",
            200,
            "<a href='/x'>x</a><a href=\"sp ace\">s</a><a href=\"mailto:me@a.test\">m</a>",
        )
        .await;
        let page = format!("{}/page", server.uri());

        // Bind a port, then free it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let refused = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::create(dir.path().join("out.tsv")).await.unwrap();
        let config = CrawlConfig {
            concurrency: 0,
            extract_mode: ExtractMode::Html,
            ..CrawlConfig::default()
        };

        let all = seeds(&[
            page.clone(),
            refused,
            "ftp://x/".to_string(),
            "garbage".to_string(),
        ]);
        let summary = crawl_all(&all, &sink, &config).await.unwrap();

        let mut expected = vec![
            format!("{}\t{}/x", page, server.uri()),
            format!("{}\t{}/sp%20ace", page, server.uri()),
        ];
        expected.sort();
        assert_eq!(records(&sink), expected);
        assert_eq!(summary.fetch_failures, 3);
        assert_eq!(summary.pages_with_links, 1);
        assert_eq!(summary.records_written, 2);
    }

    #[tokio::test]
    async fn test_panicking_task_is_counted_and_siblings_still_write() {
        let server = MockServer::start().await;
        mount(&server, "/a", 200, r#"<a href="/a/1">1</a>"#).await;
        mount(&server, "/b", 200, r#"<a href="/b/1">1</a><a href="/b/2">2</a>"#).await;

        let a = format!("{}/a", server.uri());
        let b = format!("{}/b", server.uri());
        let boom = format!("{}/boom", server.uri());
        let all = seeds(&[a.clone(), b.clone(), boom.clone()]);

        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::create(dir.path().join("out.tsv")).await.unwrap();
        let context = FetchContext::new(Client::new(), HeaderMap::new());
        let (context, sink_ref) = (&context, &sink);

        let summary = drive(&all, &sink, all.len(), |url| async move {
            let outcome = if url.ends_with("/boom") {
                let work = async {
                    if true {
                        panic!("extractor blew up");
                    }
                    Ok::<_, FetchError>(HashSet::new())
                };
                task::isolate(url, work).await
            } else {
                task::run(url, context, ExtractMode::Pattern).await
            };
            task::record(url, outcome, sink_ref).await
        })
        .await
        .unwrap();

        let mut expected = vec![
            format!("{}\t{}/a/1", a, server.uri()),
            format!("{}\t{}/b/1", b, server.uri()),
            format!("{}\t{}/b/2", b, server.uri()),
        ];
        expected.sort();
        let lines = records(&sink);
        assert_eq!(lines, expected);
        assert!(!lines.iter().any(|l| l.starts_with(&boom)));

        assert_eq!(summary.unexpected_failures, 1);
        assert_eq!(summary.pages_with_links, 2);
        assert_eq!(summary.records_written, 3);
    }
}
