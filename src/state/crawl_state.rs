/// Crawl lifecycle state definitions
///
/// A crawl moves `Init → Running → {Completed, Failed}`; a setup failure may
/// also move it straight from `Init` to `Failed`.
use std::fmt;

/// Represents the lifecycle state of one domain's crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Target validated; output and frontier being prepared
    Init,

    /// Fetch/discover loop in progress
    Running,

    // ===== Terminal States =====
    /// Frontier exhausted and every result flushed
    Completed,

    /// Setup or output failure aborted the crawl
    Failed,
}

impl CrawlState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::Running)
                | (Self::Init, Self::Failed)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
