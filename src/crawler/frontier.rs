//! Frontier store for one crawl
//!
//! This module owns the breadth-first queue together with the discovered and
//! visited sets. All of it sits behind a single lock so that the dedup check,
//! the set insertion, and the queue push happen as one step no matter how many
//! discovery passes run at once.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct FrontierState {
    /// URLs waiting to be fetched, in discovery order
    queue: VecDeque<String>,

    /// Every URL ever accepted into the queue
    discovered: HashSet<String>,

    /// URLs whose fetch has been attempted
    visited: HashSet<String>,

    /// URLs handed out by `dequeue` whose processing has not completed
    in_flight: usize,
}

/// Frontier store: FIFO queue plus discovered/visited state
///
/// Invariants:
/// - a URL enters the discovered set at most once
/// - visited ⊆ discovered
/// - the queue only ever holds discovered URLs, each at most once
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds the frontier with the crawl root
    ///
    /// Returns the discovered count afterwards (1 on a fresh frontier).
    pub fn seed(&self, url: &str) -> usize {
        let mut state = self.state();
        if state.discovered.insert(url.to_string()) {
            state.queue.push_back(url.to_string());
        }
        state.discovered.len()
    }

    /// Accepts `url` into the frontier unless it was discovered before
    ///
    /// This is the only dedup gate: among any number of concurrent callers
    /// offering the same URL exactly one receives `true`.
    pub fn try_enqueue(&self, url: &str) -> bool {
        let mut state = self.state();
        if state.discovered.contains(url) {
            return false;
        }
        state.discovered.insert(url.to_string());
        state.queue.push_back(url.to_string());
        true
    }

    /// Pops the oldest pending URL without waiting
    ///
    /// A returned URL counts as in flight until [`Frontier::complete`] is
    /// called for it. `None` only means the queue is empty right now; use
    /// [`Frontier::is_exhausted`] to tell whether more work can still arrive.
    pub fn dequeue(&self) -> Option<String> {
        let mut state = self.state();
        let url = state.queue.pop_front()?;
        state.in_flight += 1;
        Some(url)
    }

    /// Records that a fetch of `url` was attempted
    ///
    /// Idempotent. Returns `true` the first time a URL is marked; URLs that
    /// were never discovered are ignored and return `false`.
    pub fn mark_visited(&self, url: &str) -> bool {
        let mut state = self.state();
        if !state.discovered.contains(url) {
            tracing::warn!("Ignoring visit of undiscovered URL {}", url);
            return false;
        }
        state.visited.insert(url.to_string())
    }

    /// Releases the in-flight slot taken by `dequeue`
    pub fn complete(&self, url: &str) {
        let mut state = self.state();
        match state.in_flight.checked_sub(1) {
            Some(remaining) => state.in_flight = remaining,
            None => tracing::warn!("Completion of {} without a matching dequeue", url),
        }
    }

    /// True when nothing is queued and nothing is in flight
    pub fn is_exhausted(&self) -> bool {
        let state = self.state();
        state.queue.is_empty() && state.in_flight == 0
    }

    /// Number of URLs ever discovered
    pub fn discovered_count(&self) -> usize {
        self.state().discovered.len()
    }

    /// Number of URLs whose fetch was attempted
    pub fn visited_count(&self) -> usize {
        self.state().visited.len()
    }

    /// Number of URLs waiting in the queue
    pub fn queued(&self) -> usize {
        self.state().queue.len()
    }

    /// Number of dequeued URLs still being processed
    pub fn in_flight(&self) -> usize {
        self.state().in_flight
    }

    pub fn is_discovered(&self, url: &str) -> bool {
        self.state().discovered.contains(url)
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.state().visited.contains(url)
    }

    /// Snapshot of the discovered set
    pub fn discovered(&self) -> HashSet<String> {
        self.state().discovered.clone()
    }

    /// Snapshot of the visited set
    pub fn visited(&self) -> HashSet<String> {
        self.state().visited.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_frontier_is_exhausted() {
        let frontier = Frontier::new();
        assert!(frontier.is_exhausted());
        assert_eq!(frontier.discovered_count(), 0);
        assert_eq!(frontier.dequeue(), None);
    }

    #[test]
    fn test_seed() {
        let frontier = Frontier::new();
        assert_eq!(frontier.seed("https://www.example.com"), 1);
        assert_eq!(frontier.queued(), 1);
        assert!(frontier.is_discovered("https://www.example.com"));
        assert!(!frontier.is_exhausted());
    }

    #[test]
    fn test_try_enqueue_is_idempotent() {
        let frontier = Frontier::new();
        assert!(frontier.try_enqueue("https://example.com/a"));
        assert!(!frontier.try_enqueue("https://example.com/a"));
        assert!(!frontier.try_enqueue("https://example.com/a"));
        assert_eq!(frontier.discovered_count(), 1);
        assert_eq!(frontier.queued(), 1);
    }

    #[test]
    fn test_seeded_root_is_deduplicated() {
        let frontier = Frontier::new();
        frontier.seed("https://example.com");
        assert!(!frontier.try_enqueue("https://example.com"));
    }

    #[test]
    fn test_dequeue_is_fifo() {
        let frontier = Frontier::new();
        frontier.seed("https://example.com");
        frontier.try_enqueue("https://example.com/1");
        frontier.try_enqueue("https://example.com/2");

        assert_eq!(frontier.dequeue().as_deref(), Some("https://example.com"));
        assert_eq!(frontier.dequeue().as_deref(), Some("https://example.com/1"));
        assert_eq!(frontier.dequeue().as_deref(), Some("https://example.com/2"));
        assert_eq!(frontier.dequeue(), None);
    }

    #[test]
    fn test_in_flight_blocks_exhaustion() {
        let frontier = Frontier::new();
        frontier.seed("https://example.com");

        let url = frontier.dequeue().unwrap();
        assert_eq!(frontier.queued(), 0);
        assert_eq!(frontier.in_flight(), 1);
        assert!(!frontier.is_exhausted());

        frontier.complete(&url);
        assert!(frontier.is_exhausted());
    }

    #[test]
    fn test_unbalanced_complete_does_not_underflow() {
        let frontier = Frontier::new();
        frontier.complete("https://example.com");
        assert_eq!(frontier.in_flight(), 0);
        assert!(frontier.is_exhausted());
    }

    #[test]
    fn test_mark_visited_idempotent() {
        let frontier = Frontier::new();
        frontier.seed("https://example.com");
        let url = frontier.dequeue().unwrap();

        assert!(frontier.mark_visited(&url));
        assert!(!frontier.mark_visited(&url));
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_visited_stays_subset_of_discovered() {
        let frontier = Frontier::new();
        frontier.seed("https://example.com");

        assert!(!frontier.mark_visited("https://elsewhere.com"));
        assert!(!frontier.is_visited("https://elsewhere.com"));
        assert!(frontier.visited().is_subset(&frontier.discovered()));
    }

    #[test]
    fn test_concurrent_try_enqueue_has_single_winner() {
        let frontier = Arc::new(Frontier::new());
        let winners: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    let frontier = Arc::clone(&frontier);
                    scope.spawn(move || frontier.try_enqueue("https://example.com/hot"))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap() as usize)
                .sum()
        });

        assert_eq!(winners, 1);
        assert_eq!(frontier.queued(), 1);
    }

    #[test]
    fn test_concurrent_producers_enqueue_each_url_once() {
        let frontier = Arc::new(Frontier::new());
        std::thread::scope(|scope| {
            for _ in 0..8 {
                let frontier = Arc::clone(&frontier);
                scope.spawn(move || {
                    for i in 0..100 {
                        frontier.try_enqueue(&format!("https://example.com/p/{}", i));
                    }
                });
            }
        });

        assert_eq!(frontier.discovered_count(), 100);
        let mut drained = HashSet::new();
        while let Some(url) = frontier.dequeue() {
            assert!(drained.insert(url), "URL dequeued twice");
        }
        assert_eq!(drained.len(), 100);
    }
}
