use async_trait::async_trait;
use product_discoverer::config::Config;
use product_discoverer::crawler::{RenderError, Renderer};
use product_discoverer::service::{ProbeFailure, ReachabilityProbe};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory site: URL -> HTML, anything else is a 404
///
/// Also tracks how many renders overlap so concurrency bounds can be checked.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    delay: Duration,
    pub calls: AtomicUsize,
    active: AtomicUsize,
    pub peak: AtomicUsize,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for FakeSite {
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| RenderError::Status {
                url: url.to_string(),
                status: 404,
            })
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Probe failing only the listed roots
#[derive(Default)]
pub struct FakeProbe {
    pub down: HashSet<String>,
}

#[async_trait]
impl ReachabilityProbe for FakeProbe {
    async fn probe(&self, url: &str) -> Result<(), ProbeFailure> {
        if self.down.contains(url) {
            Err(ProbeFailure::Status(404))
        } else {
            Ok(())
        }
    }
}

/// Default configuration writing into `dir`
pub fn config_in(dir: &Path) -> Config {
    let mut config = Config::with_output_dir(dir.join("output_files"));
    config.crawler.progress_interval_secs = 1;
    config
}

/// Lines of a result file
pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
