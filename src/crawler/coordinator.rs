//! Crawl orchestrator - one domain from seed to final flush
//!
//! This module drives a single crawl through its lifecycle:
//! - Init: verify the renderer, prepare the result file, seed the frontier
//! - Running: dispatch fetches until the frontier is exhausted
//! - Completed / Failed: final flush and outcome reporting
//!
//! The current state is published on a watch channel so callers holding a
//! [`CrawlHandle`] can observe it while the crawl runs in its own task.

use crate::config::Config;
use crate::crawler::discovery::LinkDiscovery;
use crate::crawler::dispatcher::{DispatchStats, Dispatcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::progress::ProgressReporter;
use crate::crawler::renderer::Renderer;
use crate::output::{result_path, ResultSink};
use crate::state::CrawlState;
use crate::url::{Canonicalizer, CrawlTarget};
use crate::{DiscovererError, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Summary of a finished crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Root URL of the crawl
    pub domain: String,

    /// Result file holding every discovered URL
    pub output: PathBuf,

    /// URLs written to the result file, root included
    pub discovered: usize,

    /// URLs whose fetch was attempted
    pub visited: usize,

    /// Fetches that produced no HTML
    pub render_failures: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlOutcome {
    /// Wall-clock duration of the crawl
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Handle to a crawl running in the background
#[derive(Debug)]
pub struct CrawlHandle {
    target: CrawlTarget,
    state: watch::Receiver<CrawlState>,
    task: JoinHandle<Result<CrawlOutcome>>,
}

impl CrawlHandle {
    pub fn target(&self) -> &CrawlTarget {
        &self.target
    }

    /// Latest published state
    pub fn state(&self) -> CrawlState {
        *self.state.borrow()
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<CrawlState> {
        self.state.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the crawl; the result file keeps whatever was flushed so far
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Waits for the crawl to end
    pub async fn wait(self) -> Result<CrawlOutcome> {
        self.task
            .await
            .map_err(|e| DiscovererError::Task(e.to_string()))?
    }
}

/// Runs crawls with a shared configuration and renderer
#[derive(Clone)]
pub struct Orchestrator {
    config: Arc<Config>,
    renderer: Arc<dyn Renderer>,
}

impl Orchestrator {
    pub fn new(config: Arc<Config>, renderer: Arc<dyn Renderer>) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Crawls `target` to completion on the current task
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - The frontier was exhausted and every result flushed
    /// * `Err(DiscovererError)` - Setup or result file I/O failed
    pub async fn crawl(&self, target: &CrawlTarget) -> Result<CrawlOutcome> {
        let (state, _observer) = watch::channel(CrawlState::Init);
        self.run(target, &state).await
    }

    /// Starts crawling `target` in a background task
    pub fn spawn(&self, target: CrawlTarget) -> CrawlHandle {
        let (state_tx, state_rx) = watch::channel(CrawlState::Init);
        let orchestrator = self.clone();
        let task_target = target.clone();

        let task = tokio::spawn(async move { orchestrator.run(&task_target, &state_tx).await });

        CrawlHandle {
            target,
            state: state_rx,
            task,
        }
    }

    async fn run(
        &self,
        target: &CrawlTarget,
        state: &watch::Sender<CrawlState>,
    ) -> Result<CrawlOutcome> {
        let result = self.execute(target, state).await;
        settle(target, state, &result);
        result
    }

    async fn execute(
        &self,
        target: &CrawlTarget,
        state: &watch::Sender<CrawlState>,
    ) -> Result<CrawlOutcome> {
        let started_at = Utc::now();
        tracing::info!("Starting crawl of {}", target.root());

        // Everything that can fail on configuration happens before the
        // result file is touched
        self.renderer
            .ensure_available()
            .await
            .map_err(|e| DiscovererError::Setup(e.to_string()))?;
        let canonicalizer = Canonicalizer::new(
            target,
            self.config.crawler.host_match,
            &self.config.filter,
        )?;
        let output = result_path(&self.config.output.directory, target.root())?;

        tokio::fs::create_dir_all(&self.config.output.directory).await?;
        let mut sink = ResultSink::create(&output, self.config.crawler.chunk_size).await?;

        let frontier = Arc::new(Frontier::new());
        let stats = self
            .traverse(target, canonicalizer, Arc::clone(&frontier), &mut sink, state)
            .await?;

        let file = sink.finish().await?;
        file.sync_all().await?;

        let outcome = CrawlOutcome {
            domain: target.root().to_string(),
            output,
            discovered: frontier.discovered_count(),
            visited: frontier.visited_count(),
            render_failures: stats.render_failures,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Completed crawl of {}. Found {} URLs ({} render failures) in {}s",
            outcome.domain,
            outcome.discovered,
            outcome.render_failures,
            outcome.elapsed().num_seconds()
        );
        tracing::info!("Results saved to {}", outcome.output.display());

        Ok(outcome)
    }

    /// Running phase: seed, write the root, then dispatch until exhausted
    ///
    /// The progress reporter and every fetch task are gone by the time this
    /// returns, whether the sink failed or not.
    async fn traverse<W>(
        &self,
        target: &CrawlTarget,
        canonicalizer: Canonicalizer,
        frontier: Arc<Frontier>,
        sink: &mut ResultSink<W>,
        state: &watch::Sender<CrawlState>,
    ) -> Result<DispatchStats>
    where
        W: AsyncWrite + Unpin + Send,
    {
        frontier.seed(target.root());
        sink.write_root(target.root()).await?;

        transition(state, CrawlState::Running);

        let discovery = Arc::new(LinkDiscovery::new(canonicalizer, Arc::clone(&frontier)));
        let dispatcher = Dispatcher::new(
            Arc::clone(&frontier),
            Arc::clone(&self.renderer),
            discovery,
            self.config.crawler.max_concurrency as usize,
        );
        let progress = ProgressReporter::start(
            target.root(),
            Arc::clone(&frontier),
            Duration::from_secs(self.config.crawler.progress_interval_secs),
        );

        let dispatched = dispatcher.run(sink).await;
        progress.stop().await;
        dispatched
    }
}

/// Publishes the terminal state matching `result`
fn settle<T>(target: &CrawlTarget, state: &watch::Sender<CrawlState>, result: &Result<T>) {
    match result {
        Ok(_) => transition(state, CrawlState::Completed),
        Err(e) => {
            tracing::error!("Crawl of {} failed: {}", target.root(), e);
            transition(state, CrawlState::Failed);
        }
    }
}

fn transition(state: &watch::Sender<CrawlState>, next: CrawlState) {
    let current = *state.borrow();
    if !current.can_transition_to(next) {
        tracing::warn!("Ignoring crawl state change {} -> {}", current, next);
        return;
    }
    tracing::debug!("Crawl state {} -> {}", current, next);
    state.send_replace(next);
}
