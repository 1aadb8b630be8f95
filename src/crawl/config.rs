// src/crawl/config.rs
// =============================================================================
// Settings for one crawl run, and the shared HTTP client built from them.
// =============================================================================

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::cli::Cli;
use crate::extract::ExtractMode;

pub const DEFAULT_USER_AGENT: &str = concat!("link-harvester/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_CONCURRENCY: usize = 50;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum HeaderParseError {
    #[error("header '{0}' must look like 'Name: value'")]
    MissingColon(String),

    #[error("invalid header name in '{raw}': {source}")]
    InvalidName {
        raw: String,
        #[source]
        source: reqwest::header::InvalidHeaderName,
    },

    #[error("invalid header value in '{raw}': {source}")]
    InvalidValue {
        raw: String,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Pages in flight at once; 0 lifts the limit
    pub concurrency: usize,
    pub timeout: Duration,
    pub user_agent: String,
    /// Sent with every request, never interpreted
    pub headers: HeaderMap,
    pub extract_mode: ExtractMode,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: HeaderMap::new(),
            extract_mode: ExtractMode::default(),
        }
    }
}

impl CrawlConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, HeaderParseError> {
        let mut headers = HeaderMap::new();
        for raw in &cli.headers {
            let (name, value) = parse_header(raw)?;
            headers.append(name, value);
        }

        Ok(Self {
            concurrency: cli.concurrency,
            timeout: Duration::from_secs(cli.timeout),
            user_agent: cli.user_agent.clone(),
            headers,
            extract_mode: cli.extractor,
        })
    }

    // How many tasks buffer_unordered may run for a batch of `seeds` URLs
    //
    // 0 means one task per seed. The result is never 0, since
    // buffer_unordered(0) would never poll anything.
    pub fn effective_concurrency(&self, seeds: usize) -> usize {
        let limit = if self.concurrency == 0 {
            seeds
        } else {
            self.concurrency.min(seeds)
        };
        limit.max(1)
    }

    // One client for the whole batch; it owns the connection pool
    pub fn build_client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
    }
}

// Parses "Name: value" into a header pair
pub fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), HeaderParseError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| HeaderParseError::MissingColon(raw.to_string()))?;

    let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|source| {
        HeaderParseError::InvalidName {
            raw: raw.to_string(),
            source,
        }
    })?;
    let value = HeaderValue::from_str(value.trim()).map_err(|source| {
        HeaderParseError::InvalidValue {
            raw: raw.to_string(),
            source,
        }
    })?;

    Ok((name, value))
}
