// src/crawl/registry.rs
// =============================================================================
// The set of resources already claimed during this run.
//
// A claim is the single place where duplicate work is prevented: the first
// task to claim a URL fetches it, every later task (even one racing on
// another thread) sees `false` and stops. Nothing is ever removed, so a
// resource whose fetch failed is not retried through another link.
// =============================================================================

use dashmap::DashSet;
use url::Url;

#[derive(Debug, Default)]
pub struct VisitedRegistry {
    claimed: DashSet<String>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns true exactly once per URL: for the caller that claimed it
    //
    // DashSet::insert locks the URL's shard for the check-and-insert, so two
    // callers can never both get `true`.
    pub fn try_claim(&self, url: &Url) -> bool {
        self.claimed.insert(url.as_str().to_string())
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not a Mutex<HashSet<String>>?
//    - That works too, but every claim would wait on one global lock
//    - DashSet splits the set into shards, each with its own lock
//
// 2. Why does try_claim take &self, not &mut self?
//    - Many tasks call it at once through a shared Arc
//    - DashSet handles the locking inside, so a shared reference is enough
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_claim_once() {
        let registry = VisitedRegistry::new();
        let url = Url::parse("http://site.test/a").unwrap();

        assert!(registry.try_claim(&url));
        assert!(!registry.try_claim(&url));
        assert!(!registry.try_claim(&url));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_no_normalization_beyond_parsing() {
        let registry = VisitedRegistry::new();
        for url in ["http://site.test/a", "http://site.test/a/", "http://site.test/A"] {
            assert!(registry.try_claim(&Url::parse(url).unwrap()));
        }
        assert_eq!(registry.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_claims_have_one_winner() {
        let registry = Arc::new(VisitedRegistry::new());
        let winners = Arc::new(AtomicUsize::new(0));
        let url = Url::parse("http://site.test/shared").unwrap();

        let mut handles = Vec::new();
        for _ in 0..64 {
            let registry = registry.clone();
            let winners = winners.clone();
            let url = url.clone();
            handles.push(tokio::spawn(async move {
                if registry.try_claim(&url) {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }
}
