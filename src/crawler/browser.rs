//! Headless Chromium renderer
//!
//! One browser process is launched per renderer and shared by every fetch;
//! each render opens its own tab, scrolls it a fixed number of times to
//! trigger lazy loading, and closes it again.

use crate::config::{RendererConfig, UserAgentConfig};
use crate::crawler::renderer::{RenderError, Renderer};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight)";

pub struct BrowserRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    user_agent: String,
    timeout: Duration,
    max_scrolls: u32,
    scroll_wait: Duration,
}

impl BrowserRenderer {
    /// Launches Chromium and starts its event loop
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Unavailable`] if no browser can be started.
    pub async fn launch(
        config: &RendererConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, RenderError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let browser_config = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(RenderError::Unavailable)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| RenderError::Unavailable(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::info!("Launched headless browser");

        Ok(Self {
            browser,
            handler,
            user_agent: user_agent.header_value(),
            timeout,
            max_scrolls: config.max_scrolls,
            scroll_wait: Duration::from_millis(config.scroll_wait_ms),
        })
    }

    async fn render_page(&self, page: &Page, url: &str) -> Result<String, RenderError> {
        let browser_error = |e: chromiumoxide::error::CdpError| RenderError::Browser {
            url: url.to_string(),
            message: e.to_string(),
        };

        page.set_user_agent(self.user_agent.as_str())
            .await
            .map_err(browser_error)?;
        page.goto(url).await.map_err(browser_error)?;

        // The full scroll budget is always spent
        for _ in 0..self.max_scrolls {
            page.evaluate(SCROLL_TO_BOTTOM)
                .await
                .map_err(browser_error)?;
            tokio::time::sleep(self.scroll_wait).await;
        }

        page.content().await.map_err(browser_error)
    }
}

#[async_trait]
impl Renderer for BrowserRenderer {
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Browser {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let rendered = tokio::time::timeout(self.timeout, self.render_page(&page, url))
            .await
            .unwrap_or_else(|_| {
                Err(RenderError::Timeout {
                    url: url.to_string(),
                })
            });

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close tab for {}: {}", url, e);
        }

        rendered
    }

    async fn ensure_available(&self) -> Result<(), RenderError> {
        self.browser
            .version()
            .await
            .map(|_| ())
            .map_err(|e| RenderError::Unavailable(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}

impl Drop for BrowserRenderer {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
