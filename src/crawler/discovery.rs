//! Link discovery pass
//!
//! Turns a rendered page into newly accepted frontier entries: extract every
//! anchor, canonicalize it against the page URL, and offer the survivors to
//! the frontier. Whatever the frontier accepts is handed to the caller as
//! soon as it is enqueued, so it can reach the result sink exactly once.

use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract_hrefs;
use crate::url::Canonicalizer;
use std::sync::Arc;
use url::Url;

/// Counts gathered while processing one page
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageLinks {
    /// Anchors found in the markup
    pub found: usize,
    /// Canonical URLs this page added to the frontier
    pub accepted: usize,
    /// Anchors the canonicalizer rejected
    pub rejected: usize,
    /// Canonical URLs the frontier had already seen
    pub duplicates: usize,
}

#[derive(Debug)]
pub struct LinkDiscovery {
    canonicalizer: Canonicalizer,
    frontier: Arc<Frontier>,
}

impl LinkDiscovery {
    pub fn new(canonicalizer: Canonicalizer, frontier: Arc<Frontier>) -> Self {
        Self {
            canonicalizer,
            frontier,
        }
    }

    /// Processes the rendered HTML of `page_url`
    ///
    /// Returns the URLs this call added to the frontier, in document order.
    /// Rejected hyperlinks are dropped without affecting the rest of the page.
    pub fn discover(&self, html: &str, page_url: &str) -> Vec<String> {
        self.discover_with_counts(html, page_url).0
    }

    /// Same as [`LinkDiscovery::discover`], also reporting per-page counts
    pub fn discover_with_counts(&self, html: &str, page_url: &str) -> (Vec<String>, PageLinks) {
        let mut accepted = Vec::new();
        let counts = self.discover_with(html, page_url, |url| accepted.push(url));
        (accepted, counts)
    }

    /// Processes the rendered HTML of `page_url`, calling `accept` with each
    /// URL right after the frontier takes it
    ///
    /// A URL enqueued here is always passed to `accept` before the next
    /// hyperlink is looked at.
    pub fn discover_with<F>(&self, html: &str, page_url: &str, mut accept: F) -> PageLinks
    where
        F: FnMut(String),
    {
        let mut counts = PageLinks::default();

        let base = match Url::parse(page_url) {
            Ok(base) => base,
            Err(e) => {
                tracing::warn!("Cannot use {} as a base URL: {}", page_url, e);
                return counts;
            }
        };

        let hrefs = extract_hrefs(html);
        counts.found = hrefs.len();

        for href in hrefs {
            match self.canonicalizer.canonicalize(&href, &base) {
                Ok(url) => {
                    if self.frontier.try_enqueue(&url) {
                        counts.accepted += 1;
                        accept(url);
                    } else {
                        counts.duplicates += 1;
                    }
                }
                Err(reason) => {
                    counts.rejected += 1;
                    tracing::trace!("Rejected {} on {}: {}", href, page_url, reason);
                }
            }
        }

        tracing::debug!(
            "{}: {} links, {} new, {} rejected, {} already known",
            page_url,
            counts.found,
            counts.accepted,
            counts.rejected,
            counts.duplicates
        );

        counts
    }
}
