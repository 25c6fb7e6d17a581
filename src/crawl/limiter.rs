// src/crawl/limiter.rs
// =============================================================================
// Caps how many fetches are in flight at once.
//
// A tokio Semaphore holds `concurrency` permits. acquire() waits for one and
// hands back a FetchPermit; dropping the permit releases it. Because release
// happens in Drop, every way out of the fetch stage (success, error, early
// return with ?) gives the permit back.
//
// We also count in-flight permits and remember the highest count seen, which
// the crawl summary log and the tests use.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Semaphore, SemaphorePermit};

#[derive(Debug)]
pub struct FetchLimiter {
    permits: Semaphore,
    capacity: usize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// A held fetch slot; released when dropped
#[derive(Debug)]
pub struct FetchPermit<'a> {
    _permit: SemaphorePermit<'a>,
    limiter: &'a FetchLimiter,
}

impl FetchLimiter {
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Semaphore::new(capacity),
            capacity,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    // Waits until a permit is free
    pub async fn acquire(&self) -> FetchPermit<'_> {
        // The semaphore is owned here and never closed, so acquire cannot fail
        let permit = self
            .permits
            .acquire()
            .await
            .expect("fetch limiter semaphore is never closed");

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        FetchPermit {
            _permit: permit,
            limiter: self,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of permits held at the same time so far
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Drop for FetchPermit<'_> {
    fn drop(&mut self) {
        // Runs before the semaphore permit field is dropped
        self.limiter.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_drop_releases_permit() {
        let limiter = FetchLimiter::new(1);
        {
            let _permit = limiter.acquire().await;
            assert_eq!(limiter.in_flight(), 1);
        }
        assert_eq!(limiter.in_flight(), 0);

        // Would hang forever if the first permit had leaked
        let _again = limiter.acquire().await;
        assert_eq!(limiter.peak(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_never_more_than_capacity() {
        let limiter = Arc::new(FetchLimiter::new(3));

        let mut handles = Vec::new();
        for _ in 0..24 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                let _permit = limiter.acquire().await;
                assert!(limiter.in_flight() <= 3);
                tokio::time::sleep(Duration::from_millis(5)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(limiter.peak() <= limiter.capacity());
        assert_eq!(limiter.in_flight(), 0);
    }
}
