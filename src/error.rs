// src/error.rs
// =============================================================================
// Error types for every stage of a mirror run.
//
// - ConfigError: the run could not even start (bad origin URL, zero permits)
// - FetchError: a single resource could not be downloaded
// - PersistError: a downloaded resource could not be written to disk
// - ParseError: a page could not be scanned for references
// - CrawlError: what one crawl task can fail with (fetch or persist)
//
// We use `thiserror` to derive Display/Error for these enums. The binary
// (main.rs) still uses anyhow::Result at the very top, where any error is
// just printed and turned into an exit code.
// =============================================================================

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid origin URL '{url}': {source}")]
    InvalidOrigin {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("origin URL has no host: {0}")]
    MissingHost(String),

    #[error("unsupported scheme '{scheme}' in origin URL (expected http or https)")]
    UnsupportedScheme { scheme: String },

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Why a single download failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("TLS error while fetching {url}: {message}")]
    Tls { url: String, message: String },

    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create directories for {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("page content is not valid UTF-8 (first bad byte at offset {offset})")]
    InvalidEncoding { offset: usize },
}

/// A crawl task's own failure. Only the root task's CrawlError reaches the caller.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = FetchError::Status {
            url: "http://site.test/a".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "http://site.test/a answered HTTP 404");
    }

    #[test]
    fn test_crawl_error_is_transparent() {
        let err: CrawlError = FetchError::Timeout {
            url: "http://site.test/".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "request to http://site.test/ timed out");
    }
}
