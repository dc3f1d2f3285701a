//! Reachability probes used to vet a batch before crawling

use crate::config::{UserAgentConfig, ValidationConfig};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Why a domain failed its reachability check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("timed out")]
    Timeout,

    #[error("{0}")]
    Transport(String),
}

/// Checks that a root URL answers before a crawl is committed to it
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<(), ProbeFailure>;
}

/// Probe issuing a single HEAD request
///
/// Any response below 400 counts as reachable; redirects are not followed.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(
        validation: &ValidationConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent.header_value())
            .timeout(Duration::from_secs(validation.probe_timeout_secs))
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ReachabilityProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<(), ProbeFailure> {
        let response = self.client.head(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProbeFailure::Timeout
            } else {
                ProbeFailure::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(ProbeFailure::Status(status));
        }
        Ok(())
    }
}
