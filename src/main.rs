//! Focus-Crawl main entry point
//!
//! This is the command-line interface for the Focus-Crawl focused crawler.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use focus_crawl::config::{load_config, validate, Config, RenderMode, Traversal};
use focus_crawl::output::{
    consume_records, print_statistics, PreviewLogger, RecordSink, TextFileWriter,
};
use focus_crawl::Coordinator;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Focus-Crawl: a budgeted, focused web crawler
///
/// Focus-Crawl visits pages reachable from a seed URL, extracts their
/// readable text and hands every page with text to the output stage. Pages
/// on script-heavy sites are rendered in a headless browser first.
#[derive(Parser, Debug)]
#[command(name = "focus-crawl")]
#[command(version)]
#[command(about = "A budgeted, focused web crawler", long_about = None)]
struct Cli {
    /// Seed URL (overrides `seed-url` from the config file)
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum number of distinct pages to visit
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Number of concurrent crawl workers
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Visit pages breadth-first instead of depth-first
    #[arg(long)]
    breadth_first: bool,

    /// Extraction strategy selection
    #[arg(long, value_enum, value_name = "MODE")]
    render: Option<RenderArg>,

    /// Write every extracted page as a .txt file into this directory
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RenderArg {
    /// Render only seeds on known script-heavy hosts
    Auto,
    /// Render every page
    Always,
    /// Never render
    Never,
}

impl From<RenderArg> for RenderMode {
    fn from(arg: RenderArg) -> Self {
        match arg {
            RenderArg::Auto => RenderMode::Auto,
            RenderArg::Always => RenderMode::Always,
            RenderArg::Never => RenderMode::Never,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let coordinator = Coordinator::new(config.clone()).context("Failed to start crawl")?;

    if cli.dry_run {
        print_dry_run(&config, &coordinator);
        return Ok(());
    }

    handle_crawl(&config, coordinator, cli.output_dir).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("focus_crawl=info,warn"),
            1 => EnvFilter::new("focus_crawl=debug,info"),
            2 => EnvFilter::new("focus_crawl=trace,debug"),
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

/// Loads the config file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
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
        config.crawler.workers = workers;
    }
    if cli.breadth_first {
        config.crawler.traversal = Traversal::BreadthFirst;
    }
    if let Some(render) = cli.render {
        config.crawler.render_mode = render.into();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective run parameters
fn print_dry_run(config: &Config, coordinator: &Coordinator) {
    println!("=== Focus-Crawl Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed: {}", coordinator.seed());
    println!("  Strategy: {}", coordinator.strategy());
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Traversal: {:?}", config.crawler.traversal);

    println!("\nStatic extraction:");
    println!("  User agent: {}", config.fetch.user_agent);
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Max seen links: {}", config.focused.max_seen_links);
    println!("  Max known links: {}", config.focused.max_known_links);

    println!("\nRendered extraction:");
    println!("  Settle: {}ms", config.render.settle_ms);
    println!("  Timeout: {}s", config.render.timeout_secs);
    println!(
        "  Rendered domains: {}",
        config.crawler.rendered_domains.join(", ")
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    coordinator: Coordinator,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut sinks: Vec<Box<dyn RecordSink>> = vec![Box::new(PreviewLogger)];
    if let Some(dir) = output_dir {
        let writer = TextFileWriter::new(&dir)
            .with_context(|| format!("Failed to prepare output directory {}", dir.display()))?;
        sinks.push(Box::new(writer));
    }

    let (tx, rx) = mpsc::channel(config.crawler.workers * 2);
    let consumer = tokio::spawn(consume_records(rx, sinks));

    let stats = coordinator.run(tx).await.context("Crawl failed")?;

    consumer
        .await
        .context("Record consumer panicked")?
        .context("Failed to write records")?;

    print_statistics(&stats);
    Ok(())
}
