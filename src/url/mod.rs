//! URL handling module for Product-Discoverer
//!
//! This module provides hyperlink canonicalization, host matching, crawl
//! target derivation, and the result-file identifier rule.

mod canonicalize;
mod domain;
mod matcher;
mod target;

// Re-export main types and functions
pub use canonicalize::{Canonicalizer, Rejection};
pub use domain::{host_key, strip_www};
pub use matcher::host_matches;
pub use target::{normalize_domain, output_identifier, CrawlTarget};
