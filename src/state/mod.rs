//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of one domain's crawl (init, running, completed, failed)

mod crawl_state;

// Re-export main types
pub use crawl_state::CrawlState;
