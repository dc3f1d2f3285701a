use crate::service::probe::ReachabilityProbe;
use crate::url::{normalize_domain, CrawlTarget};
use crate::{DiscovererError, Result};
use futures::future::join_all;
use std::collections::BTreeMap;

/// Normalizes and probes a batch of user-supplied domains
///
/// Every domain is normalized (scheme and `www.` added as needed) and probed
/// concurrently. The batch is accepted only if all of them answer; otherwise
/// the error lists every failing domain and nothing is returned.
///
/// # Arguments
///
/// * `domains` - Raw domains as supplied by the caller
/// * `probe` - Reachability check applied to each normalized root
/// * `min_batch_size` - Smallest batch accepted
///
/// # Returns
///
/// * `Ok(Vec<CrawlTarget>)` - One target per domain, in input order
/// * `Err(DiscovererError::BatchTooSmall)` - Fewer than `min_batch_size` domains
/// * `Err(DiscovererError::Unreachable)` - At least one domain is invalid or down
/// * `Err(DiscovererError::OutputCollision)` - Two domains map to the same result file
pub async fn validate_batch(
    domains: &[String],
    probe: &dyn ReachabilityProbe,
    min_batch_size: usize,
) -> Result<Vec<CrawlTarget>> {
    if domains.len() < min_batch_size {
        return Err(DiscovererError::BatchTooSmall {
            minimum: min_batch_size,
            actual: domains.len(),
        });
    }

    let checks = domains.iter().map(|raw| async move {
        let normalized = match normalize_domain(raw) {
            Ok(normalized) => normalized,
            Err(e) => {
                tracing::warn!("Invalid domain {}: {}", raw, e);
                return Err(raw.trim().to_string());
            }
        };

        if let Err(reason) = probe.probe(&normalized).await {
            tracing::warn!("{} is unreachable: {}", normalized, reason);
            return Err(normalized);
        }

        CrawlTarget::new(&normalized).map_err(|e| {
            tracing::warn!("Invalid crawl root {}: {}", normalized, e);
            normalized.clone()
        })
    });

    let mut targets = Vec::with_capacity(domains.len());
    let mut failing = Vec::new();
    for checked in join_all(checks).await {
        match checked {
            Ok(target) => targets.push(target),
            Err(domain) => failing.push(domain),
        }
    }

    if !failing.is_empty() {
        return Err(DiscovererError::Unreachable { domains: failing });
    }

    let colliding = colliding_roots(&targets);
    if !colliding.is_empty() {
        tracing::warn!("Result file collision in batch: {}", colliding.join(", "));
        return Err(DiscovererError::OutputCollision { domains: colliding });
    }

    tracing::info!("Validated batch of {} domains", targets.len());
    Ok(targets)
}

/// Roots of every target whose identifier is shared with another target
///
/// Grouped by identifier; within a group the input order is kept.
fn colliding_roots(targets: &[CrawlTarget]) -> Vec<String> {
    let mut by_identifier: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for target in targets {
        by_identifier
            .entry(target.identifier())
            .or_default()
            .push(target.root());
    }

    by_identifier
        .into_values()
        .filter(|roots| roots.len() > 1)
        .flatten()
        .map(str::to_string)
        .collect()
}
