//! Product-Discoverer: exhaustive same-domain URL discovery
//!
//! This crate crawls a domain breadth-first, renders each page through a
//! pluggable renderer so script-populated links are visible, and streams every
//! canonical URL it finds to a plain-text result file.

pub mod config;
pub mod crawler;
pub mod output;
pub mod service;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Product-Discoverer operations
#[derive(Debug, Error)]
pub enum DiscovererError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Renderer setup failed: {0}")]
    Setup(String),

    #[error("The following URLs are invalid or unreachable: {}", .domains.join(", "))]
    Unreachable { domains: Vec<String> },

    #[error("The following domains would share a result file: {}", .domains.join(", "))]
    OutputCollision { domains: Vec<String> },

    #[error("At least {minimum} domains are required per batch, got {actual}")]
    BatchTooSmall { minimum: usize, actual: usize },

    #[error("Results file not found for {domain}")]
    NotFound { domain: String },

    #[error("Invalid result identifier derived from {domain}: {identifier}")]
    InvalidIdentifier { domain: String, identifier: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawl task failed: {0}")]
    Task(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid exclusion pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Product-Discoverer operations
pub type Result<T> = std::result::Result<T, DiscovererError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlHandle, CrawlOutcome, Orchestrator};
pub use state::CrawlState;
pub use crate::url::{Canonicalizer, CrawlTarget, Rejection};
