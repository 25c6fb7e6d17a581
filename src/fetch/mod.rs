// src/fetch/mod.rs
// =============================================================================
// This module downloads resources for the mirror.
//
// The crawler only knows about the Fetcher trait. The real implementation
// (HttpFetcher, in http.rs) talks to the network with reqwest; tests plug in
// an in-memory fake so crawl behavior can be checked without a server.
//
// Rust concepts:
// - Traits: A shared interface that several types can implement
// - async-trait: Lets a trait have async methods and still be used as dyn
// =============================================================================

mod http;

pub use http::HttpFetcher;

use crate::error::FetchError;
use async_trait::async_trait;
use url::Url;

/// A successfully downloaded resource
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// The raw response body
    pub bytes: Vec<u8>,
    /// The Content-Type header, if the server sent one
    pub content_type: Option<String>,
}

impl FetchedResource {
    /// True when the server says this is an HTML page worth scanning for links
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(content_type: Option<&str>) -> FetchedResource {
        FetchedResource {
            bytes: Vec::new(),
            content_type: content_type.map(str::to_string),
        }
    }

    #[test]
    fn test_is_html() {
        assert!(resource(Some("text/html")).is_html());
        assert!(resource(Some("Text/HTML; charset=utf-8")).is_html());
        assert!(!resource(Some("image/png")).is_html());
        assert!(!resource(None).is_html());
    }
}
