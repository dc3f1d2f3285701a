//! Rendering collaborators
//!
//! A renderer turns a URL into the HTML the link discovery pass works on.
//! This module defines the [`Renderer`] seam plus the plain HTTP
//! implementation; the headless browser lives in `browser.rs` behind the
//! `browser` feature.

use crate::config::{Config, RendererConfig, RendererKind, UserAgentConfig};
use crate::DiscovererError;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Reasons a renderer could not produce HTML for a URL
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Expected HTML at {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Browser error for {url}: {message}")]
    Browser { url: String, message: String },

    #[error("Renderer unavailable: {0}")]
    Unavailable(String),
}

/// Produces fully rendered HTML for a page
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders `url`; any error is terminal for that URL
    async fn render(&self, url: &str) -> Result<String, RenderError>;

    /// Verifies the rendering engine can be used at all
    async fn ensure_available(&self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Short name for log lines
    fn name(&self) -> &'static str;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use product_discoverer::config::UserAgentConfig;
/// use product_discoverer::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renderer that fetches the server response without executing scripts
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(config: &RendererConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, Duration::from_secs(config.timeout_secs))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RenderError::Timeout {
                    url: url.to_string(),
                }
            } else {
                RenderError::Http {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // A missing Content-Type is given the benefit of the doubt
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.is_empty() && !content_type.contains("html") {
            return Err(RenderError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        response.text().await.map_err(|e| RenderError::Http {
            url: url.to_string(),
            source: e,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Builds the renderer selected by the configuration
///
/// The browser renderer launches Chromium here, so an unavailable engine is
/// reported before any crawl starts.
pub async fn build_renderer(config: &Config) -> Result<Arc<dyn Renderer>, DiscovererError> {
    match config.renderer.kind {
        RendererKind::Http => Ok(Arc::new(HttpRenderer::new(
            &config.renderer,
            &config.user_agent,
        )?)),
        #[cfg(feature = "browser")]
        RendererKind::Browser => {
            let renderer =
                crate::crawler::browser::BrowserRenderer::launch(&config.renderer, &config.user_agent)
                    .await
                    .map_err(|e| DiscovererError::Setup(e.to_string()))?;
            Ok(Arc::new(renderer))
        }
        #[cfg(not(feature = "browser"))]
        RendererKind::Browser => Err(DiscovererError::Setup(
            "browser renderer requested but the 'browser' feature is not enabled".to_string(),
        )),
    }
}
