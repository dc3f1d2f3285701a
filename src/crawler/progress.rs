use crate::crawler::frontier::Frontier;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Periodic liveness line for a running crawl
///
/// Stop it with [`ProgressReporter::stop`] once the crawl leaves its
/// running phase. Dropping the reporter (for instance when the crawl task is
/// aborted) cancels the background task as well.
pub struct ProgressReporter {
    domain: String,
    ticks: Arc<AtomicUsize>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Starts reporting every `interval`, beginning immediately
    pub fn start(domain: &str, frontier: Arc<Frontier>, interval: Duration) -> Self {
        let ticks = Arc::new(AtomicUsize::new(0));
        let task_ticks = Arc::clone(&ticks);
        let task_domain = domain.to_string();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                task_ticks.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    "Crawling {} ... {} discovered, {} visited, {} in flight",
                    task_domain,
                    frontier.discovered_count(),
                    frontier.visited_count(),
                    frontier.in_flight()
                );
            }
        });

        Self {
            domain: domain.to_string(),
            ticks,
            handle: Some(handle),
        }
    }

    /// Cancels the reporter and waits for it to finish
    ///
    /// Returns the number of progress lines emitted.
    pub async fn stop(mut self) -> usize {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {
                    tracing::debug!("Progress reporter for {} stopped", self.domain);
                }
                Err(e) => {
                    tracing::warn!("Progress reporter for {} failed: {}", self.domain, e);
                }
            }
        }
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
