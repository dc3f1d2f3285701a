//! Bounded fetch dispatcher
//!
//! Drains the frontier with at most N render operations in flight. A slot is
//! taken from the semaphore before a URL is dequeued, so a URL never leaves
//! the queue unless its fetch can start right away. URLs accepted by the
//! discovery pass are sent over a channel the moment the frontier takes
//! them; the dispatcher, as the single owner of the result sink, drains it.

use crate::crawler::discovery::LinkDiscovery;
use crate::crawler::frontier::Frontier;
use crate::crawler::renderer::{RenderError, Renderer};
use crate::output::ResultSink;
use crate::{DiscovererError, Result};
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// Counters collected over one dispatch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    /// Fetches attempted, successful or not
    pub fetched: usize,
    /// Fetches whose render failed
    pub render_failures: usize,
    /// URLs handed to the result sink, root excluded
    pub discovered: usize,
}

/// Result of one fetch task
///
/// On success, the number of URLs the page added to the frontier.
struct FetchReport {
    url: String,
    outcome: std::result::Result<usize, RenderError>,
}

/// Holds a dequeued URL in flight until dropped
///
/// Dropping releases the frontier's in-flight slot, which also happens when
/// the fetch task panics or is aborted.
struct InFlight {
    frontier: Arc<Frontier>,
    url: String,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.frontier.complete(&self.url);
    }
}

pub struct Dispatcher {
    frontier: Arc<Frontier>,
    renderer: Arc<dyn Renderer>,
    discovery: Arc<LinkDiscovery>,
    slots: Arc<Semaphore>,
}

impl Dispatcher {
    /// Creates a dispatcher allowing `max_concurrency` simultaneous renders
    ///
    /// A bound of zero is raised to one.
    pub fn new(
        frontier: Arc<Frontier>,
        renderer: Arc<dyn Renderer>,
        discovery: Arc<LinkDiscovery>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            frontier,
            renderer,
            discovery,
            slots: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    /// Runs fetches until the frontier is exhausted
    ///
    /// Every URL accepted by a discovery pass is pushed to `sink` exactly
    /// once, even when its fetch task dies afterwards. Render failures are
    /// logged and counted; only sink I/O errors abort the run, in which case
    /// every outstanding fetch is cancelled before returning.
    pub async fn run<W>(&self, sink: &mut ResultSink<W>) -> Result<DispatchStats>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let mut tasks: JoinSet<FetchReport> = JoinSet::new();
        let (found_tx, mut found_rx) = mpsc::unbounded_channel();

        let result = self.drive(&mut tasks, found_tx, &mut found_rx, sink).await;
        if result.is_err() {
            tasks.shutdown().await;
        }
        result
    }

    async fn drive<W>(
        &self,
        tasks: &mut JoinSet<FetchReport>,
        found_tx: mpsc::UnboundedSender<String>,
        found_rx: &mut UnboundedReceiver<String>,
        sink: &mut ResultSink<W>,
    ) -> Result<DispatchStats>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let mut stats = DispatchStats::default();

        loop {
            while let Some(joined) = tasks.try_join_next() {
                record(joined, found_rx, sink, &mut stats).await?;
            }

            if self.frontier.is_exhausted() {
                break;
            }

            let permit = Arc::clone(&self.slots)
                .acquire_owned()
                .await
                .map_err(|e| DiscovererError::Task(e.to_string()))?;

            match self.frontier.dequeue() {
                Some(url) => {
                    let guard = InFlight {
                        frontier: Arc::clone(&self.frontier),
                        url: url.clone(),
                    };
                    let frontier = Arc::clone(&self.frontier);
                    let renderer = Arc::clone(&self.renderer);
                    let discovery = Arc::clone(&self.discovery);
                    let found = found_tx.clone();

                    tasks.spawn(async move {
                        let _permit = permit;
                        let _guard = guard;

                        frontier.mark_visited(&url);
                        let outcome = match renderer.render(&url).await {
                            Ok(html) => {
                                let links = discovery.discover_with(&html, &url, |accepted| {
                                    // The receiver outlives every fetch task
                                    let _ = found.send(accepted);
                                });
                                Ok(links.accepted)
                            }
                            Err(e) => Err(e),
                        };
                        FetchReport { url, outcome }
                    });
                }
                None => {
                    // Queue is empty but fetches are still running; wait for one
                    drop(permit);
                    match tasks.join_next().await {
                        Some(joined) => record(joined, found_rx, sink, &mut stats).await?,
                        None => break,
                    }
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            record(joined, found_rx, sink, &mut stats).await?;
        }
        drain(found_rx, sink, &mut stats).await?;

        Ok(stats)
    }
}

/// Moves every URL delivered so far into the sink
async fn drain<W>(
    found: &mut UnboundedReceiver<String>,
    sink: &mut ResultSink<W>,
    stats: &mut DispatchStats,
) -> Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    while let Ok(url) = found.try_recv() {
        stats.discovered += 1;
        sink.push(url).await?;
    }
    Ok(())
}

async fn record<W>(
    joined: std::result::Result<FetchReport, JoinError>,
    found: &mut UnboundedReceiver<String>,
    sink: &mut ResultSink<W>,
    stats: &mut DispatchStats,
) -> Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    // A finished task has already sent everything it accepted
    drain(found, sink, stats).await?;

    match joined {
        Ok(FetchReport {
            url,
            outcome: Ok(accepted),
        }) => {
            stats.fetched += 1;
            tracing::debug!("Fetched {} ({} new)", url, accepted);
        }
        Ok(FetchReport {
            url,
            outcome: Err(e),
        }) => {
            stats.fetched += 1;
            stats.render_failures += 1;
            tracing::warn!("Failed to render {}: {}", url, e);
        }
        Err(e) => {
            stats.render_failures += 1;
            tracing::error!("Fetch task ended abnormally: {}", e);
        }
    }
    Ok(())
}
