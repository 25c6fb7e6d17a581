// src/config.rs
// =============================================================================
// The validated settings for one mirror run.
//
// The CLI layer hands us raw strings and numbers; MirrorConfig::new checks
// them once so the crawler never has to deal with a malformed origin.
// =============================================================================

use crate::error::ConfigError;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Entry point of the crawl and the scope boundary (its host)
    pub origin: Url,
    /// Inclusive recursion bound; the origin itself is depth 0
    pub max_depth: usize,
    /// Where mirrored files are written
    pub output_root: PathBuf,
    /// Number of fetches allowed in flight at the same time
    pub concurrency: usize,
    /// Follow <img>, <script> and <link> references, not just <a href>
    pub include_assets: bool,
    /// Accept invalid TLS certificates
    pub skip_tls_verify: bool,
}

impl MirrorConfig {
    pub fn new(
        origin: &str,
        max_depth: usize,
        output_root: impl Into<PathBuf>,
        concurrency: usize,
        include_assets: bool,
        skip_tls_verify: bool,
    ) -> Result<Self, ConfigError> {
        let origin = Url::parse(origin).map_err(|source| ConfigError::InvalidOrigin {
            url: origin.to_string(),
            source,
        })?;

        if origin.scheme() != "http" && origin.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme {
                scheme: origin.scheme().to_string(),
            });
        }

        if origin.host_str().is_none() {
            return Err(ConfigError::MissingHost(origin.to_string()));
        }

        if concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        Ok(Self {
            origin,
            max_depth,
            output_root: output_root.into(),
            concurrency,
            include_assets,
            skip_tls_verify,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = MirrorConfig::new("http://site.test/", 2, "out", 4, true, false).unwrap();
        assert_eq!(config.origin.host_str(), Some("site.test"));
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.output_root, PathBuf::from("out"));
    }

    #[test]
    fn test_rejects_relative_origin() {
        let err = MirrorConfig::new("/just/a/path", 1, "out", 1, true, false).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOrigin { .. }));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = MirrorConfig::new("ftp://site.test/", 1, "out", 1, true, false).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme { .. }));
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let err = MirrorConfig::new("http://site.test/", 1, "out", 0, true, false).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroConcurrency));
    }
}
