//! Output module for crawl results
//!
//! This module handles:
//! - Streaming discovered URLs to the result file in chunks
//! - Naming result files after the crawled domain
//! - Locating previously written results

mod paths;
mod sink;

pub use paths::{locate_result, result_path, RESULT_EXTENSION};
pub use sink::ResultSink;
