//! Listing-Harvest main entry point
//!
//! This is the command-line interface for the Listing-Harvest page harvester.

use anyhow::Context;
use clap::Parser;
use listing_harvest::config::{load_config_with_hash, Config, ConfigOverrides};
use listing_harvest::crawler::{run_harvest, ListingUrls, PageRequest};
use listing_harvest::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Listing-Harvest: a listing-to-detail page harvester
///
/// Listing-Harvest walks a site's listing pages, follows every detail link,
/// extracts one record per detail page and stores each as its own JSON file.
#[derive(Parser, Debug)]
#[command(name = "listing-harvest")]
#[command(version)]
#[command(about = "Harvest detail records from paginated listings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Number of listing pages to crawl (replaces crawler.total-pages, skipping discovery)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pages: Option<u32>,

    /// Number of listing pages processed in parallel (0 = one per CPU)
    #[arg(long)]
    workers: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let overrides = ConfigOverrides {
        total_pages: cli.pages,
        workers: cli.workers,
    };
    let (config, hash) = load_config_with_hash(&cli.config, &overrides)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    let summary = run_harvest(&config, None)
        .await
        .context("harvest aborted")?;

    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_harvest=info,warn"),
            1 => EnvFilter::new("listing_harvest=debug,info"),
            2 => EnvFilter::new("listing_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved plan
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let listing = ListingUrls::from_site(&config.site)?;
    let rules = config.site.profile.detail_rules()?;

    println!("=== Listing-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Profile: {}", config.site.profile);
    println!("  First listing page: {}", listing.url_for(PageRequest::first()));

    println!("\nCrawler:");
    match config.crawler.total_pages {
        Some(total) => println!("  Listing pages: {}", total),
        None => println!("  Listing pages: discovered from the first listing page"),
    }
    println!("  Workers: {}", config.crawler.worker_count());
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.crawler.request_timeout_secs, config.crawler.connect_timeout_secs
    );
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nRecords:");
    println!("  Named by: {}", rules.name_field());
    println!("  Fields: {}", rules.field_names().collect::<Vec<_>>().join(", "));
    println!("  Output directory: {}", config.output.results_dir);

    println!("\n✓ Configuration is valid");

    Ok(())
}
