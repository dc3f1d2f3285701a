//! Configuration module for Product-Discoverer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section except `[output]` falls back to defaults.
//!
//! # Example
//!
//! ```no_run
//! use product_discoverer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("discoverer.toml")).unwrap();
//! println!("Results go to {}", config.output.directory.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FilterConfig, HostMatch, OutputConfig, RendererConfig, RendererKind,
    UserAgentConfig, ValidationConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
