//! Request boundary for batch crawls
//!
//! This module handles:
//! - Vetting a batch of domains before any crawl starts
//! - Spawning one independent crawl per accepted domain
//! - Locating the result file of a finished crawl

mod batch;
mod probe;

pub use batch::validate_batch;
pub use probe::{HttpProbe, ProbeFailure, ReachabilityProbe};

use crate::config::Config;
use crate::crawler::{CrawlHandle, Orchestrator, Renderer};
use crate::output::locate_result;
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Accepts batches of domains and runs their crawls
#[derive(Clone)]
pub struct DiscoveryService {
    orchestrator: Orchestrator,
    probe: Arc<dyn ReachabilityProbe>,
}

impl DiscoveryService {
    pub fn new(
        config: Arc<Config>,
        renderer: Arc<dyn Renderer>,
        probe: Arc<dyn ReachabilityProbe>,
    ) -> Self {
        Self {
            orchestrator: Orchestrator::new(config, renderer),
            probe,
        }
    }

    /// Validates `domains` and starts crawling each of them
    ///
    /// Returns as soon as the crawls are spawned; each handle reports its own
    /// progress and outcome. Nothing is started if validation fails.
    pub async fn start(&self, domains: &[String]) -> Result<Vec<CrawlHandle>> {
        let config = self.orchestrator.config();
        let targets =
            validate_batch(domains, self.probe.as_ref(), config.crawler.min_batch_size).await?;

        let handles: Vec<CrawlHandle> = targets
            .into_iter()
            .map(|target| self.orchestrator.spawn(target))
            .collect();

        tracing::info!("Crawling started for {} domains", handles.len());
        Ok(handles)
    }

    /// Path of the result file for `domain`
    pub fn locate(&self, domain: &str) -> Result<PathBuf> {
        locate_result(&self.orchestrator.config().output.directory, domain)
    }
}
