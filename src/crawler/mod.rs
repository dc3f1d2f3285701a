//! Crawler module for breadth-first URL discovery
//!
//! This module contains the core crawling logic, including:
//! - The frontier store shared by every fetch of a crawl
//! - Page rendering over plain HTTP or a headless browser
//! - Hyperlink extraction and the discovery pass
//! - Bounded fetch dispatch and overall crawl orchestration

#[cfg(feature = "browser")]
mod browser;
mod coordinator;
mod discovery;
mod dispatcher;
mod frontier;
mod parser;
mod progress;
mod renderer;

#[cfg(feature = "browser")]
pub use browser::BrowserRenderer;
pub use coordinator::{CrawlHandle, CrawlOutcome, Orchestrator};
pub use discovery::{LinkDiscovery, PageLinks};
pub use dispatcher::{DispatchStats, Dispatcher};
pub use frontier::Frontier;
pub use parser::extract_hrefs;
pub use progress::ProgressReporter;
pub use renderer::{build_http_client, build_renderer, HttpRenderer, RenderError, Renderer};
