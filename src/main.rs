//! Product-Discoverer main entry point
//!
//! This is the command-line interface for the Product-Discoverer crawler.

use anyhow::Context;
use clap::{Parser, Subcommand};
use product_discoverer::config::{load_config_with_hash, Config, RendererKind};
use product_discoverer::crawler::build_renderer;
use product_discoverer::service::{DiscoveryService, HttpProbe};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Product-Discoverer: exhaustive same-domain URL discovery
///
/// Crawls each domain of a batch breadth-first, renders every page so that
/// script-generated links are visible, and writes every canonical URL it
/// finds to one text file per domain.
#[derive(Parser, Debug)]
#[command(name = "product-discoverer")]
#[command(version)]
#[command(about = "Exhaustive same-domain URL discovery", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a batch of domains and crawl each of them
    Crawl {
        /// Domains to crawl; a scheme and `www.` are added when missing
        #[arg(value_name = "DOMAIN", required = true)]
        domains: Vec<String>,
    },

    /// Print the result file written for a domain
    Locate {
        #[arg(value_name = "DOMAIN")]
        domain: String,
    },

    /// Validate the configuration and renderer without crawling
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    match cli.command {
        Command::Crawl { domains } => handle_crawl(config, &domains).await,
        Command::Locate { domain } => handle_locate(&config, &domain),
        Command::Check => handle_check(&config).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("product_discoverer=info,warn"),
            1 => EnvFilter::new("product_discoverer=debug,info"),
            2 => EnvFilter::new("product_discoverer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `crawl`: validates the batch, then waits for every crawl
async fn handle_crawl(config: Config, domains: &[String]) -> anyhow::Result<()> {
    let config = Arc::new(config);

    let renderer = build_renderer(&config)
        .await
        .context("failed to set up the renderer")?;
    renderer
        .ensure_available()
        .await
        .context("renderer is not usable")?;
    let probe = HttpProbe::new(&config.validation, &config.user_agent)
        .context("failed to build the reachability probe")?;

    let service = DiscoveryService::new(Arc::clone(&config), renderer, Arc::new(probe));
    let handles = service.start(domains).await?;
    println!("Crawling started for {} domains", handles.len());

    let mut failed = 0usize;
    for handle in handles {
        let root = handle.target().root().to_string();
        match handle.wait().await {
            Ok(outcome) => println!(
                "✓ {}: {} URLs -> {}",
                outcome.domain,
                outcome.discovered,
                outcome.output.display()
            ),
            Err(e) => {
                failed += 1;
                eprintln!("✗ {}: {}", root, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} crawls failed", failed, domains.len());
    }
    Ok(())
}

/// Handles `locate`: prints the result file path for a domain
fn handle_locate(config: &Config, domain: &str) -> anyhow::Result<()> {
    let path = product_discoverer::output::locate_result(&config.output.directory, domain)?;
    println!("{}", path.display());
    Ok(())
}

/// Handles `check`: shows the effective configuration and probes the renderer
async fn handle_check(config: &Config) -> anyhow::Result<()> {
    println!("=== Product-Discoverer Check ===\n");

    println!("Crawler Configuration:");
    println!("  Max concurrency: {}", config.crawler.max_concurrency);
    println!("  Chunk size: {}", config.crawler.chunk_size);
    println!(
        "  Progress interval: {}s",
        config.crawler.progress_interval_secs
    );
    println!("  Minimum batch size: {}", config.crawler.min_batch_size);
    println!("  Host match: {:?}", config.crawler.host_match);

    println!("\nRenderer:");
    println!("  Kind: {:?}", config.renderer.kind);
    println!("  Timeout: {}s", config.renderer.timeout_secs);
    if config.renderer.kind == RendererKind::Browser {
        println!("  Max scrolls: {}", config.renderer.max_scrolls);
        println!("  Scroll wait: {}ms", config.renderer.scroll_wait_ms);
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nFilters:");
    println!(
        "  Excluded extensions: {}",
        config.filter.excluded_extensions.join(" ")
    );
    println!("  Excluded words: {}", config.filter.excluded_words.len());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());

    let renderer = build_renderer(config)
        .await
        .context("failed to set up the renderer")?;
    renderer
        .ensure_available()
        .await
        .context("renderer is not usable")?;

    println!("\n✓ Configuration is valid");
    println!("✓ Renderer '{}' is available", renderer.name());

    Ok(())
}
