//! sitecrawl main entry point
//!
//! This is the command-line interface for the sitecrawl same-host crawler.

use anyhow::Context;
use clap::Parser;
use sitecrawl::config::{load_config, CliOverrides, Config};
use sitecrawl::crawler::run_crawl;
use sitecrawl::output::{print_report, Report};
use std::io::IsTerminal;
use std::path::PathBuf;
use termcolor::ColorChoice;
use tracing_subscriber::EnvFilter;

/// sitecrawl: crawl every page of one site
///
/// sitecrawl starts from a URL (or from the pages listed in a sitemap), follows
/// every link that stays on the same host, fetches each page exactly once with a
/// bounded number of requests in flight, and reports the status and response time
/// of every page it found.
#[derive(Parser, Debug)]
#[command(name = "sitecrawl")]
#[command(version)]
#[command(about = "A bounded-concurrency same-host crawler", long_about = None)]
struct Cli {
    /// Page to start crawling from
    #[arg(long, value_name = "URL", conflicts_with = "sitemap")]
    url: Option<String>,

    /// Sitemap (or sitemap index) listing the pages to start from
    #[arg(long, value_name = "URL")]
    sitemap: Option<String>,

    /// Maximum number of pages fetched at once [default: 10]
    #[arg(short = 'c', long, value_name = "N")]
    concurrency: Option<u32>,

    /// Username for basic auth
    #[arg(long)]
    username: Option<String>,

    /// Password for basic auth
    #[arg(long)]
    password: Option<String>,

    /// Custom headers sent with every request, as "Name:Value,Name:Value"
    #[arg(long, value_name = "HEADERS")]
    headers: Option<String>,

    /// Per-request timeout in milliseconds [default: 10000]
    #[arg(long = "timeout-ms", value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Path to a TOML configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every page as it is fetched (-v); more for debug (-vv) and trace (-vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the report without colour
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            url: self.url.clone(),
            sitemap: self.sitemap.clone(),
            max_concurrency: self.concurrency,
            request_timeout_ms: self.timeout_ms,
            verbose: self.verbose > 0,
            username: self.username.clone(),
            password: self.password.clone(),
            headers: self.headers.clone(),
        }
    }

    fn color_choice(&self) -> ColorChoice {
        if self.no_color || !std::io::stdout().is_terminal() {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}", e);
            return Err(e);
        }
    };

    let outcome = match run_crawl(&config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e).context("Crawl failed");
        }
    };

    if let Some(stats) = outcome.sitemap {
        tracing::debug!(
            "Sitemaps fetched: {}, skipped: {}",
            stats.sitemaps_fetched,
            stats.sitemaps_failed
        );
    }

    let report = Report::new(outcome.records, outcome.tally);
    print_report(&report, cli.color_choice()).context("Failed to write report")?;

    Ok(())
}

/// Loads the optional config file and layers the flags on top
///
/// Validation happens when the crawl is set up.
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    config.apply_overrides(cli.overrides());
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 | 1 => EnvFilter::new("sitecrawl=info,warn"),
            2 => EnvFilter::new("sitecrawl=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
