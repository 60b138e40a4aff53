//! Data Sentry main entry point
//!
//! This is the command-line interface for the Data Sentry listings scraper.

use clap::Parser;
use data_sentry::config::{load_config_with_hash, Config};
use data_sentry::output::{open_sinks, print_summary, write_all};
use data_sentry::pipeline::{scrape_all, Clock, SourceJob, SystemClock};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Data Sentry: trending listings scraper
///
/// Fetches the front pages of Hacker News, Product Hunt and selected
/// subreddits, extracts their listings, and saves them as CSV.
#[derive(Parser, Debug)]
#[command(name = "data-sentry")]
#[command(version = "1.0.0")]
#[command(about = "Scrapes trending listings into tabular files", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in sources when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory for CSV output (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// SQLite database that also receives the run (overrides the config file)
    #[arg(long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    if let Some(dir) = cli.output_dir {
        config.output.data_dir = dir.display().to_string();
    }
    if let Some(database) = cli.database {
        config.output.database_path = Some(database.display().to_string());
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_scrape(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("data_sentry=info,warn"),
            1 => EnvFilter::new("data_sentry=debug,info"),
            2 => EnvFilter::new("data_sentry=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the jobs
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let jobs = SourceJob::from_sources(&config.sources)?;

    println!("=== Data Sentry Dry Run ===\n");

    println!("Fetcher:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  User agent: {}", config.fetcher.user_agent);

    println!("\nOutput:");
    println!("  CSV directory: {}", config.output.data_dir);
    if let Some(database) = &config.output.database_path {
        println!("  Database: {}", database);
    }

    println!("\nSources ({}):", jobs.len());
    for job in &jobs {
        println!("  - {} (top {})", job.source_name(), job.cap());
        println!("    * {}", job.url());
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config) -> data_sentry::Result<()> {
    let run_started = SystemClock.now();

    let report = scrape_all(config).await?;

    let receipts = if report.is_empty() {
        tracing::warn!("No data scraped; skipping output files");
        Vec::new()
    } else {
        let sinks = open_sinks(&config.output, run_started)?;
        write_all(&sinks, &report.records)?
    };

    print_summary(&report, &receipts);

    Ok(())
}
