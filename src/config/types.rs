use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Product-Discoverer
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Maximum number of simultaneous render operations per crawl
    pub max_concurrency: u32,

    /// Number of discovered URLs buffered before the result file is appended
    pub chunk_size: usize,

    /// Seconds between liveness messages while a crawl is running
    pub progress_interval_secs: u64,

    /// Smallest batch of domains accepted by the request boundary
    pub min_batch_size: usize,

    /// How discovered hosts are matched against the target host
    pub host_match: HostMatch,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            chunk_size: 500,
            progress_interval_secs: 5,
            min_batch_size: 10,
            host_match: HostMatch::Substring,
        }
    }
}

/// Host containment policy for the same-domain check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostMatch {
    /// The target host may appear anywhere in the candidate host
    #[default]
    Substring,
    /// The candidate must be the target host or one of its subdomains
    Suffix,
}

/// Which rendering collaborator to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RendererKind {
    /// Plain HTTP GET, no script execution
    #[default]
    Http,
    /// Headless Chromium (requires the `browser` feature)
    Browser,
}

/// Rendering collaborator configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RendererConfig {
    pub kind: RendererKind,

    /// Per-page timeout in seconds
    pub timeout_secs: u64,

    /// Number of scroll-to-bottom steps performed by the browser renderer
    pub max_scrolls: u32,

    /// Pause between scroll steps (milliseconds)
    pub scroll_wait_ms: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::Http,
            timeout_secs: 30,
            max_scrolls: 5,
            scroll_wait_ms: 1500,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,

    /// Email address for crawler-related contact
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ProductDiscoverer".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Link filtering vocabulary
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FilterConfig {
    /// Path suffixes that never point at content pages
    pub excluded_extensions: Vec<String>,

    /// Words that exclude a path when found anywhere in it (case-insensitive)
    pub excluded_words: Vec<String>,
}

const DEFAULT_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".ico", ".pdf", ".docx",
];

const DEFAULT_WORDS: &[&str] = &[
    "chat",
    "contact",
    "reward",
    "profile",
    "club",
    "write-to-us",
    "return",
    "payment",
    "help",
    "service",
    "user-agreement",
    "policies",
    "aboutus",
    "history",
    "blog",
    "account",
    "wishlist",
    "viewcart",
    "login",
    "logout",
];

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            excluded_words: DEFAULT_WORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory receiving one `<identifier>.txt` file per crawled domain
    pub directory: PathBuf,
}

/// Pre-flight reachability configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ValidationConfig {
    /// Timeout for each HEAD probe, in seconds
    pub probe_timeout_secs: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: 60,
        }
    }
}

impl Config {
    /// Builds a configuration with defaults for everything but the output directory
    pub fn with_output_dir(directory: impl Into<PathBuf>) -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            renderer: RendererConfig::default(),
            user_agent: UserAgentConfig::default(),
            filter: FilterConfig::default(),
            output: OutputConfig {
                directory: directory.into(),
            },
            validation: ValidationConfig::default(),
        }
    }
}
