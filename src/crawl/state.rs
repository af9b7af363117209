// src/crawl/state.rs
// =============================================================================
// The only state that concurrent crawl tasks touch.
//
// - VisitedRegistry: which URLs have already been dispatched for fetching
// - Frontier: URLs discovered during the current wave, i.e. next wave's work
//
// Both hide their collection behind a mutex and expose one method per
// critical section. Callers never get at the raw HashSet/Vec, and no lock is
// ever held across an .await (parking_lot guards are not Send, so the
// compiler enforces that inside spawned tasks).
// =============================================================================

use parking_lot::Mutex;
use std::collections::HashSet;
use std::mem;

use crate::page::NormalizedUrl;

#[derive(Debug, Default)]
pub struct VisitedRegistry {
    urls: Mutex<HashSet<NormalizedUrl>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` and returns true if it was not yet present.
    ///
    /// The membership test and the insert happen under one lock, so two
    /// concurrent callers can never both get `true` for the same URL.
    pub fn check_and_mark(&self, url: &NormalizedUrl) -> bool {
        self.urls.lock().insert(url.clone())
    }

    pub fn len(&self) -> usize {
        self.urls.lock().len()
    }
}

// Append-only while a wave runs; emptied in one step when the wave starts.
#[derive(Debug, Default)]
pub struct Frontier {
    urls: Mutex<Vec<NormalizedUrl>>,
}

impl Frontier {
    pub fn with_seed(seed: NormalizedUrl) -> Self {
        Self {
            urls: Mutex::new(vec![seed]),
        }
    }

    // Appends a whole page's worth of links under a single lock
    pub fn extend<I>(&self, urls: I)
    where
        I: IntoIterator<Item = NormalizedUrl>,
    {
        self.urls.lock().extend(urls);
    }

    /// Swaps the frontier for an empty one and returns what it held.
    ///
    /// Anything pushed after this call lands in the new, empty frontier, so the
    /// returned snapshot never grows while the wave that consumes it runs.
    pub fn take(&self) -> Vec<NormalizedUrl> {
        mem::take(&mut *self.urls.lock())
    }

    pub fn len(&self) -> usize {
        self.urls.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn url(raw: &str) -> NormalizedUrl {
        NormalizedUrl::parse(raw).unwrap()
    }

    #[test]
    fn test_check_and_mark_once() {
        let visited = VisitedRegistry::new();
        let page = url("http://example.com/a");

        assert!(visited.check_and_mark(&page));
        assert!(!visited.check_and_mark(&page));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_urls_compare_exactly() {
        let visited = VisitedRegistry::new();
        assert!(visited.check_and_mark(&url("http://example.com/a")));
        assert!(visited.check_and_mark(&url("http://example.com/a/")));
        assert!(visited.check_and_mark(&url("http://example.com/a?x=1")));
        assert_eq!(visited.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_get_one_winner() {
        let visited = Arc::new(VisitedRegistry::new());
        let page = url("http://example.com/contended");

        let mut handles = Vec::new();
        for _ in 0..64 {
            let visited = Arc::clone(&visited);
            let page = page.clone();
            handles.push(tokio::spawn(async move { visited.check_and_mark(&page) }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_take_resets_frontier() {
        let frontier = Frontier::with_seed(url("http://example.com/"));
        frontier.extend(vec![url("http://example.com/a"), url("http://example.com/b")]);
        assert_eq!(frontier.len(), 3);

        let snapshot = frontier.take();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].as_str(), "http://example.com/");
        assert_eq!(frontier.len(), 0);

        // pushes after the snapshot belong to the next wave only
        frontier.extend(vec![url("http://example.com/c")]);
        assert_eq!(snapshot.len(), 3);
        assert_eq!(frontier.take(), vec![url("http://example.com/c")]);
    }

    #[test]
    fn test_frontier_keeps_duplicates() {
        let frontier = Frontier::default();
        frontier.extend(vec![url("http://example.com/a"), url("http://example.com/a")]);
        assert_eq!(frontier.take().len(), 2);
    }
}
