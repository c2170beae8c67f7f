//! Sitescribe main entry point
//!
//! This is the command-line interface for the Sitescribe site harvester.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use sitescribe::config::{compute_config_hash, prepare, read_config, seed_url, Config};
use sitescribe::crawler::Coordinator;
use sitescribe::output::{dedupe_file, print_report};
use sitescribe::url::DomainScope;
use tracing_subscriber::EnvFilter;

/// Sitescribe: a polite same-site text harvester
///
/// Sitescribe follows internal links from a seed page, saves the plain text
/// of every HTML page it finds and removes lines repeated within a page.
#[derive(Parser, Debug)]
#[command(name = "sitescribe")]
#[command(version = "1.0.0")]
#[command(about = "A polite same-site text harvester", long_about = None)]
struct Cli {
    /// Page to start from; `https://` is added when no scheme is given
    #[arg(value_name = "SEED_URL")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to visit
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Number of concurrent workers (1-50)
    #[arg(short, long, value_name = "N")]
    workers: Option<u32>,

    /// Delay before every request, in seconds (minimum 0.3)
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// Directory receiving the output files
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Skip the deduplication pass after the crawl
    #[arg(long, conflicts_with = "dedupe_only")]
    no_dedupe: bool,

    /// Deduplicate an existing page store without crawling
    #[arg(long, conflicts_with = "dry_run")]
    dedupe_only: bool,

    /// Validate the configuration and show what would be crawled
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = build_config(&cli)?;

    if cli.dedupe_only {
        return handle_dedupe_only(&config);
    }

    prepare(&mut config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitescribe=info,warn"),
            1 => EnvFilter::new("sitescribe=debug,info"),
            2 => EnvFilter::new("sitescribe=trace,debug"),
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

/// Loads the configuration file (if any) and applies command line overrides
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = read_config(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(seed) = &cli.seed {
        config.crawler.seed_url = seed.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(workers) = cli.workers {
        config.crawler.max_workers = workers;
    }
    if let Some(delay) = cli.delay {
        config.crawler.request_delay = delay;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
    if cli.no_dedupe {
        config.output.deduplicate = false;
    }

    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<()> {
    let seed = seed_url(config)?;
    let scope = DomainScope::from_seed(&seed)?;

    println!("=== Sitescribe Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed: {}", seed);
    println!("  Domains: {}", scope.hosts().join(", "));
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Workers: {}", config.crawler.max_workers);
    println!("  Delay: {}s", config.crawler.request_delay);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);

    println!("\nOutput:");
    println!("  Pages: {}", config.output.pages_path().display());
    println!("  Links: {}", config.output.links_path().display());
    println!("  Errors: {}", config.output.errors_path().display());
    if config.output.deduplicate {
        println!(
            "  Deduplicated: {}",
            config.output.deduplicated_path().display()
        );
    } else {
        println!("  Deduplicated: disabled");
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --dedupe-only mode: deduplicates an existing page store
fn handle_dedupe_only(config: &Config) -> Result<()> {
    let input = config.output.pages_path();
    let output = config.output.deduplicated_path();

    println!("=== Deduplicating Page Store ===\n");
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());
    println!();

    let stats = dedupe_file(&input, &output)
        .with_context(|| format!("Failed to deduplicate {}", input.display()))?;

    println!("Sections: {}", stats.sections);
    println!("Lines before: {}", stats.total_lines);
    println!("Lines after: {}", stats.unique_lines);
    println!("Removed: {} ({:.1}%)", stats.removed_lines(), stats.saved_percent());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<()> {
    let coordinator = Coordinator::new(config).context("Failed to start crawl")?;

    let cancel = coordinator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing in-flight pages");
            cancel.cancel();
        }
    });

    let report = coordinator.run().await.context("Crawl failed")?;
    print_report(&report);

    if !report.errors.is_empty() {
        if let Some(path) = &report.files.errors {
            println!("\n{} errors logged to {}", report.errors.len(), path.display());
        }
    }

    Ok(())
}
