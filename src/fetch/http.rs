// src/fetch/http.rs
// =============================================================================
// The network-backed Fetcher.
//
// Key functionality:
// - One shared reqwest Client for the whole run (connection pooling)
// - Optional "skip TLS verification" for self-signed test sites
// - Non-2xx responses count as failures
// - reqwest errors are sorted into timeout / TLS / connect / other
//
// Rust concepts:
// - async/await: Downloads run concurrently on the tokio runtime
// - Error sources: std::error::Error::source() walks the cause chain
// =============================================================================

use super::{FetchedResource, Fetcher};
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use std::error::Error as _;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the shared client
    //
    // Parameters:
    //   skip_tls_verify: accept invalid or self-signed certificates
    pub fn new(skip_tls_verify: bool) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("site-mirror/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(skip_tls_verify)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError> {
        // Send a GET request. A network-level failure (DNS, refused
        // connection, TLS handshake, timeout) shows up here as Err
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        // We got an answer, but a 404 or 500 page is not the resource
        // we asked for, so anything outside 2xx is a failure
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // The crawler uses Content-Type to decide whether to look for links.
        // Header values may contain non-ASCII bytes; those are ignored
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // The body can still fail halfway through (connection reset, timeout)
        let bytes = response
            .bytes()
            .await
            .map_err(|e| categorize_error(url, e))?;

        // Bytes -> Vec<u8>: the rest of the crate only needs plain bytes
        Ok(FetchedResource {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

// Sorts a reqwest error into one of our FetchError variants
//
// reqwest's Display only shows the outermost message, so we look at the
// whole source chain when searching for TLS hints. The URL is stripped
// first so a host like "ssl.example.com" doesn't look like a TLS failure.
fn categorize_error(url: &Url, error: reqwest::Error) -> FetchError {
    let url = url.to_string();
    let error = error.without_url();
    let message = error_chain(&error);
    let lowered = message.to_lowercase();

    if error.is_timeout() {
        FetchError::Timeout { url }
    } else if lowered.contains("certificate") || lowered.contains("tls") || lowered.contains("ssl") {
        FetchError::Tls { url, message }
    } else if error.is_connect() {
        FetchError::Connect { url, message }
    } else {
        FetchError::Request { url, message }
    }
}

fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why map_err everywhere?
//    - reqwest returns reqwest::Error, but the Fetcher trait promises FetchError
//    - map_err converts one into the other, then ? returns it early
//
// 2. Why #[async_trait]?
//    - The crawler stores the fetcher as Arc<dyn Fetcher>
//    - Plain async fns in traits can't be used through dyn yet,
//      async_trait boxes the returned future so they can
//
// 3. What does danger_accept_invalid_certs do?
//    - It turns off certificate checks for this client only
//    - Handy for staging sites with self-signed certificates
//    - Never the default: the user has to pass --skip-tls-verify
// -----------------------------------------------------------------------------
