// src/fetch/http.rs
// =============================================================================
// This module downloads a single page.
//
// Key functionality:
// - Makes one HTTP GET per URL over a shared, pooled client
// - Treats any non-2xx status as a failure (no partial content)
// - Sorts failures into a small set of kinds (status, timeout, transport)
// - Never retries; the caller decides what a failure means
//
// Rust concepts:
// - async/await: For network I/O
// - thiserror: To derive Display and Error for our error enum
// - Borrowing: The client is shared by reference across many fetches
// =============================================================================

use reqwest::header::HeaderMap;
use reqwest::Client;
use std::fmt;
use thiserror::Error;
use tracing::info;
use url::Url;

// The connection context shared by every fetch in a batch
//
// `client` owns the connection pool. `headers` are extra request headers
// given on the command line; they are attached to every GET untouched.
#[derive(Debug, Clone)]
pub struct FetchContext {
    client: Client,
    headers: HeaderMap,
}

impl FetchContext {
    pub fn new(client: Client, headers: HeaderMap) -> Self {
        Self { client, headers }
    }
}

/// The broad category of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// The server answered with a non-2xx status
    HttpStatus,
    /// Connection, DNS, TLS, redirect or body-read failure
    Transport,
    /// The request did not finish within the client timeout
    Timeout,
    /// The URL could not be parsed at all
    InvalidUrl,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchErrorKind::HttpStatus => "http_status",
            FetchErrorKind::Transport => "transport",
            FetchErrorKind::Timeout => "timeout",
            FetchErrorKind::InvalidUrl => "invalid_url",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{message} for {url}")]
    Transport { url: String, message: String },
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::InvalidUrl { .. } => FetchErrorKind::InvalidUrl,
            FetchError::HttpStatus { .. } => FetchErrorKind::HttpStatus,
            FetchError::Timeout { .. } => FetchErrorKind::Timeout,
            FetchError::Transport { .. } => FetchErrorKind::Transport,
        }
    }

    // The HTTP status code, when the server got far enough to send one
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Fetches a page and returns its body as text
//
// Parameters:
//   url: the page to download (borrowed)
//   context: the shared client and pass-through headers
//
// Returns: Ok(body) on a 2xx response, otherwise a classified FetchError
pub async fn fetch_page(url: &str, context: &FetchContext) -> Result<String, FetchError> {
    let target = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let response = context
        .client
        .get(target)
        .headers(context.headers.clone())
        .send()
        .await
        .map_err(|e| categorize_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    info!("got response [{}] for url: {}", status.as_u16(), url);

    let body = response.text().await.map_err(|e| categorize_error(url, e))?;
    Ok(body)
}

// Categorizes the different error types reqwest can return
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// - Body decoding problems
fn categorize_error(url: &str, error: reqwest::Error) -> FetchError {
    let url = url.to_string();

    if error.is_timeout() {
        return FetchError::Timeout { url };
    }

    if let Some(status) = error.status() {
        return FetchError::HttpStatus {
            url,
            status: status.as_u16(),
        };
    }

    // Convert error to string once, the checks below only look at the text
    let error_string = error.to_string();

    let message = if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "Could not resolve hostname".to_string()
        } else {
            "Connection failed".to_string()
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "SSL certificate error".to_string()
    } else if error.is_body() || error.is_decode() {
        format!("Failed to read response body: {}", error_string)
    } else {
        error_string
    };

    FetchError::Transport { url, message }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. What does status.is_success() cover?
//    - Every 2xx code (200, 201, 204, ...)
//    - Redirects with a Location header are followed by the client first
//
// 2. What does .headers() do on a RequestBuilder?
//    - It merges the given HeaderMap into the request
//    - It takes the map by value, hence the clone
//
// 3. Where does the timeout come from?
//    - It is configured once on the Client (see crawl::config)
//    - reqwest reports it through error.is_timeout()
// -----------------------------------------------------------------------------
