//! Site-Crawler main entry point
//!
//! This is the command-line interface for the single-host site crawler.

use anyhow::{bail, Context};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use site_crawler::config::{
    load_config_with_hash, validate, validate_options, Config, CrawlOptions,
};
use site_crawler::crawler::crawl;
use site_crawler::output::{print_statistics, write_csv_report, write_csv_report_to_path};
use tracing_subscriber::EnvFilter;

/// Site-Crawler: a bounded-concurrency single-host crawler
///
/// Starting from SEED, the crawler follows every link that stays under the
/// seed, records each page's heading, first paragraph, links and images, and
/// writes the result as a CSV report.
///
/// With SEED alone the crawl is sequential and unbounded and the report goes
/// to standard output, unless --config supplies the limits. With
/// MAX_CONCURRENCY and MAX_PAGES the crawl is bounded and the report goes to
/// the configured report path.
#[derive(Parser, Debug)]
#[command(name = "site-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A bounded-concurrency single-host crawler", long_about = None)]
struct Cli {
    /// Absolute http(s) URL to start from; also bounds the crawl scope
    #[arg(value_name = "SEED")]
    seed: String,

    /// Maximum number of pages fetched at the same time
    #[arg(value_name = "MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    /// Maximum number of pages claimed for the whole crawl
    #[arg(value_name = "MAX_PAGES")]
    max_pages: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the CSV report to this file instead
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate arguments and configuration and exit without crawling
    #[arg(long)]
    dry_run: bool,
}

/// How the report is produced once the crawl ends
#[derive(Debug)]
enum ReportTarget {
    Stdout,
    File(PathBuf),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_ref())?;
    let (options, target) = resolve_mode(&cli, &config)?;

    if cli.dry_run {
        handle_dry_run(&options, &target);
        return Ok(());
    }

    handle_crawl(options, &config, target, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the legacy mode can stream the report on stdout.
fn setup_logging(verbose: u8, quiet: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::new(log_directives(verbose, quiet, rust_log.as_deref()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Filter directives for the given flags; `RUST_LOG` only applies without them
fn log_directives(verbose: u8, quiet: bool, rust_log: Option<&str>) -> String {
    if quiet {
        // Only show errors
        return "error".to_string();
    }

    match (verbose, rust_log) {
        (0, Some(directives)) if !directives.trim().is_empty() => directives.to_string(),
        (0, _) => "site_crawler=info,warn".to_string(),
        (1, _) => "site_crawler=debug,info".to_string(),
        (2, _) => "site_crawler=trace,debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Loads the configuration file when given, defaults otherwise
fn load_configuration(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Picks crawl options and report target from the positional arguments
///
/// With SEED alone and no `--config`, the crawl is sequential and unbounded
/// and the report goes to stdout. With SEED alone and a `--config` file, the
/// file's limits apply. MAX_CONCURRENCY and MAX_PAGES override either.
/// The resulting options are validated before anything runs.
fn resolve_mode(cli: &Cli, config: &Config) -> anyhow::Result<(CrawlOptions, ReportTarget)> {
    let fetch_timeout = config.crawler.fetch_timeout();
    let report_file = || {
        cli.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.output.report_path))
    };

    let (options, target) = match (cli.max_concurrency, cli.max_pages) {
        (None, None) if cli.config.is_some() => (
            CrawlOptions::from_config(&cli.seed, &config.crawler),
            ReportTarget::File(report_file()),
        ),
        (None, None) => {
            let target = cli
                .output
                .clone()
                .map_or(ReportTarget::Stdout, ReportTarget::File);
            (CrawlOptions::sequential(&cli.seed, fetch_timeout), target)
        }
        (Some(max_concurrency), Some(max_pages)) => {
            let options = CrawlOptions {
                seed: cli.seed.clone(),
                max_concurrency,
                max_pages,
                fetch_timeout,
            };
            (options, ReportTarget::File(report_file()))
        }
        _ => bail!("MAX_CONCURRENCY and MAX_PAGES must be given together"),
    };

    validate_options(&options).context("invalid crawl options")?;
    Ok((options, target))
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(options: &CrawlOptions, target: &ReportTarget) {
    println!("=== Site-Crawler Dry Run ===\n");

    println!("Seed: {}", options.seed);
    println!("  Max concurrency: {}", options.max_concurrency);
    if options.max_pages == usize::MAX {
        println!("  Max pages: unbounded");
    } else {
        println!("  Max pages: {}", options.max_pages);
    }
    match options.fetch_timeout {
        Some(timeout) => println!("  Fetch timeout: {}ms", timeout.as_millis()),
        None => println!("  Fetch timeout: none"),
    }

    match target {
        ReportTarget::Stdout => println!("\nReport: stdout"),
        ReportTarget::File(path) => println!("\nReport: {}", path.display()),
    }
}

/// Handles the main crawl operation
async fn handle_crawl(
    options: CrawlOptions,
    config: &Config,
    target: ReportTarget,
    quiet: bool,
) -> anyhow::Result<()> {
    tracing::info!("Starting crawl of: {}", options.seed);

    let outcome = match crawl(options, &config.user_agent).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    match target {
        ReportTarget::Stdout => {
            write_csv_report(&outcome.pages, io::stdout().lock())
                .context("failed to write report")?;
        }
        ReportTarget::File(path) => {
            if !quiet {
                print_statistics(&outcome.statistics);
            }
            write_csv_report_to_path(&outcome.pages, &path)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }

    tracing::info!("Crawl completed: {} pages", outcome.pages.len());
    Ok(())
}
