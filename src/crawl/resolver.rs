// src/crawl/resolver.rs
// =============================================================================
// Turns a reference found in a page into an absolute URL, or rejects it.
//
// Rules, checked in order:
// 1. "/path"        -> origin scheme + host + "/path"
//    "//host/path"  -> origin scheme + "//host/path" (scheme-relative)
// 2. "https://..."  -> used as-is (anything that already parses with a scheme)
// 3. anything else  -> appended to the current page's URL, after making sure
//                      that URL ends in '/'
// 4. the result must be on the origin's host, otherwise it is OutOfScope
//
// Fragments are dropped: "page#intro" and "page" are the same resource.
// No other normalization happens, so "/a" and "/a/" stay different.
// =============================================================================

use url::{Position, Url};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Same host as the origin; should be crawled
    InScope(Url),
    /// Another host (or no host at all, like mailto:); silently ignored
    OutOfScope,
    /// Could not be turned into a URL
    Malformed,
}

#[derive(Debug, Clone)]
pub struct Resolver {
    origin: Url,
}

impl Resolver {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    // Resolves `raw` as found on the page at `base`
    //
    // Examples (origin and base = http://site.test/blog):
    //   "/about"               -> InScope(http://site.test/about)
    //   "post-1"               -> InScope(http://site.test/blog/post-1)
    //   "http://other.test/b"  -> OutOfScope
    //   "mailto:me@site.test"  -> OutOfScope
    pub fn resolve(&self, base: &Url, raw: &str) -> Resolution {
        // "//host/x" is read the way browsers read it (a scheme-relative
        // URL), not as a path on the origin; the host check below still applies
        let candidate = if let Some(rest) = raw.strip_prefix("//") {
            format!("{}://{}", self.origin.scheme(), rest)
        } else if raw.starts_with('/') {
            // Everything before the path: "scheme://host[:port]"
            format!("{}{}", &self.origin[..Position::BeforePath], raw)
        } else if has_scheme(raw) {
            raw.to_string()
        } else if raw.starts_with('#') {
            // Same-page anchor
            base[..Position::AfterQuery].to_string()
        } else if raw.starts_with('?') {
            format!("{}{}", &base[..Position::AfterPath], raw)
        } else {
            let mut dir = base[..Position::AfterPath].to_string();
            if !dir.ends_with('/') {
                dir.push('/');
            }
            dir.push_str(raw);
            dir
        };

        let mut url = match Url::parse(&candidate) {
            Ok(url) => url,
            Err(_) => return Resolution::Malformed,
        };
        url.set_fragment(None);

        if url.host_str().is_some() && url.host_str() == self.origin.host_str() {
            Resolution::InScope(url)
        } else {
            Resolution::OutOfScope
        }
    }
}

// True for "http:", "mailto:", "javascript:" and other RFC 3986 schemes.
// A colon after a '/' (e.g. "a/b:c") is part of a relative path instead.
fn has_scheme(raw: &str) -> bool {
    match raw.split_once(':') {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver {
        Resolver::new(Url::parse("http://site.test/").unwrap())
    }

    fn resolve(base: &str, raw: &str) -> Resolution {
        resolver().resolve(&Url::parse(base).unwrap(), raw)
    }

    fn in_scope(url: &str) -> Resolution {
        Resolution::InScope(Url::parse(url).unwrap())
    }

    #[test]
    fn test_root_relative() {
        assert_eq!(
            resolve("http://site.test/deep/page", "/a"),
            in_scope("http://site.test/a")
        );
    }

    #[test]
    fn test_root_relative_keeps_port() {
        let resolver = Resolver::new(Url::parse("http://127.0.0.1:8080/").unwrap());
        let base = Url::parse("http://127.0.0.1:8080/x").unwrap();
        assert_eq!(
            resolver.resolve(&base, "/a"),
            in_scope("http://127.0.0.1:8080/a")
        );
    }

    #[test]
    fn test_absolute_same_host() {
        assert_eq!(
            resolve("http://site.test/", "http://site.test/b?x=1"),
            in_scope("http://site.test/b?x=1")
        );
    }

    #[test]
    fn test_absolute_other_host_is_out_of_scope() {
        assert_eq!(
            resolve("http://site.test/", "http://other.test/b"),
            Resolution::OutOfScope
        );
    }

    #[test]
    fn test_scheme_relative() {
        assert_eq!(
            resolve("http://site.test/", "//cdn.other.test/lib.js"),
            Resolution::OutOfScope
        );
        assert_eq!(
            resolve("http://site.test/", "//site.test/lib.js"),
            in_scope("http://site.test/lib.js")
        );
    }

    #[test]
    fn test_relative_gets_trailing_separator() {
        assert_eq!(
            resolve("http://site.test/blog", "post-1"),
            in_scope("http://site.test/blog/post-1")
        );
        assert_eq!(
            resolve("http://site.test/blog/", "post-1"),
            in_scope("http://site.test/blog/post-1")
        );
    }

    #[test]
    fn test_relative_ignores_base_query() {
        assert_eq!(
            resolve("http://site.test/list?page=2", "item"),
            in_scope("http://site.test/list/item")
        );
    }

    #[test]
    fn test_dot_segments_are_resolved() {
        assert_eq!(
            resolve("http://site.test/a/b", "../c"),
            in_scope("http://site.test/a/c")
        );
    }

    #[test]
    fn test_fragment_is_dropped() {
        assert_eq!(
            resolve("http://site.test/a", "#top"),
            in_scope("http://site.test/a")
        );
        assert_eq!(
            resolve("http://site.test/", "/docs#install"),
            in_scope("http://site.test/docs")
        );
    }

    #[test]
    fn test_query_only_reference() {
        assert_eq!(
            resolve("http://site.test/list?page=1", "?page=2"),
            in_scope("http://site.test/list?page=2")
        );
    }

    #[test]
    fn test_non_http_schemes_are_out_of_scope() {
        assert_eq!(
            resolve("http://site.test/", "mailto:me@site.test"),
            Resolution::OutOfScope
        );
        assert_eq!(
            resolve("http://site.test/", "javascript:void(0)"),
            Resolution::OutOfScope
        );
    }

    #[test]
    fn test_malformed_reference() {
        assert_eq!(resolve("http://site.test/", "http://[::1"), Resolution::Malformed);
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("https://x"));
        assert!(has_scheme("mailto:a@b"));
        assert!(!has_scheme("a/b:c"));
        assert!(!has_scheme("page.html"));
        assert!(!has_scheme("1abc:x"));
    }
}
