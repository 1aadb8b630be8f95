// src/sink.rs
// =============================================================================
// This module writes crawl results to the output file.
//
// File format (UTF-8, tab-separated, one record per line):
//
//   source_url	parsed_url
//   https://a.test/	https://a.test/b
//   https://a.test/	https://c.test/d
//
// Many crawl tasks finish at unpredictable times and all of them append to
// the same file. Every append holds a mutex for the whole open/write/flush,
// and one source's lines go out in a single write_all, so a line from one
// task is never split by a line from another.
//
// Rust concepts:
// - tokio::sync::Mutex: An async lock that can be held across .await
// - RAII guards: The lock is released when `_guard` goes out of scope
// =============================================================================

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

// Written once, before any task starts
pub const HEADER: &str = "source_url\tparsed_url\n";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create output file {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to append results for {url} to {}: {source}", .path.display())]
    Append {
        url: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// The append-only destination for (source_url, discovered_url) records
#[derive(Debug)]
pub struct ResultSink {
    path: PathBuf,
    // Guards the file, not any data; only one append may touch it at a time
    lock: Mutex<()>,
}

impl ResultSink {
    // Creates (or truncates) the output file and writes the header line
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        tokio::fs::write(&path, HEADER)
            .await
            .map_err(|source| SinkError::Create {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Appends one line per link for `source_url`
    //
    // Returns: the number of records written (0 for an empty set, in which
    // case the file is not opened at all)
    pub async fn append(
        &self,
        source_url: &str,
        links: &HashSet<String>,
    ) -> Result<usize, SinkError> {
        if links.is_empty() {
            return Ok(0);
        }

        let mut buffer = String::new();
        for link in links {
            buffer.push_str(source_url);
            buffer.push('\t');
            buffer.push_str(link);
            buffer.push('\n');
        }

        let _guard = self.lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|source| self.append_error(source_url, source))?;

        file.write_all(buffer.as_bytes())
            .await
            .map_err(|source| self.append_error(source_url, source))?;
        file.flush()
            .await
            .map_err(|source| self.append_error(source_url, source))?;

        info!("wrote results for source url: {}", source_url);
        Ok(links.len())
    }

    fn append_error(&self, url: &str, source: io::Error) -> SinkError {
        SinkError::Append {
            url: url.to_string(),
            path: self.path.clone(),
            source,
        }
    }
}
