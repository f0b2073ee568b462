//! Wiki-Ripple main entry point
//!
//! This is the command-line interface for the Wiki-Ripple crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wiki_ripple::config::{load_config_with_hash, Config};
use wiki_ripple::crawler::{crawl, CrawlMode, RunOptions, StopCondition};
use wiki_ripple::index::SqliteIndex;
use wiki_ripple::output::{print_crawl_summary, print_index_stats, TermReport};

/// Wiki-Ripple: a breadth-first wiki crawler
///
/// Wiki-Ripple starts at one page, indexes the words of every page it visits
/// and follows internal links in breadth-first order.
#[derive(Parser, Debug)]
#[command(name = "wiki-ripple")]
#[command(version)]
#[command(about = "A breadth-first wiki crawler and term index", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Read pages from the fixtures directory and re-index them unconditionally
    #[arg(long)]
    test_mode: bool,

    /// Stop after this many newly indexed pages
    #[arg(long, default_value_t = 1, conflicts_with = "exhaust")]
    pages: usize,

    /// Crawl until the queue is empty
    #[arg(long)]
    exhaust: bool,

    /// Queue the source page's links before crawling
    #[arg(long)]
    prime: bool,

    /// Clear the index before crawling
    #[arg(long)]
    fresh: bool,

    /// Term whose per-page counts are printed after the crawl
    #[arg(long, default_value = "the")]
    term: String,

    /// Print counts for a term from the existing index and exit
    #[arg(long, value_name = "TERM", conflicts_with_all = ["test_mode", "exhaust", "prime", "fresh"])]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let index = Arc::new(open_index(&config)?);

    if let Some(term) = &cli.query {
        print_index_stats(&index.stats()?);
        print_term_report(&index, term)?;
        return Ok(());
    }

    if cli.fresh {
        tracing::info!("Clearing index before crawl");
        index.clear()?;
    }

    let options = RunOptions {
        mode: if cli.test_mode {
            CrawlMode::Test
        } else {
            CrawlMode::Normal
        },
        stop: if cli.exhaust {
            StopCondition::Exhausted
        } else {
            StopCondition::NewPages(cli.pages)
        },
        prime: cli.prime,
    };

    tracing::info!(
        "Crawling from {} in {:?} mode until {:?}",
        config.crawler.source,
        options.mode,
        options.stop
    );

    let summary = crawl(&config, Arc::clone(&index), options)
        .await
        .context("Crawl failed")?;

    if !cli.quiet {
        print_crawl_summary(&summary);
    }
    print_term_report(&index, &cli.term)?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wiki_ripple=info,warn"),
            1 => EnvFilter::new("wiki_ripple=debug,info"),
            2 => EnvFilter::new("wiki_ripple=trace,debug"),
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

fn open_index(config: &Config) -> anyhow::Result<SqliteIndex> {
    let path = Path::new(&config.output.database_path);
    tracing::info!("Opening index at {}", path.display());
    let index = SqliteIndex::open(path)?;
    Ok(index)
}

fn print_term_report(index: &SqliteIndex, term: &str) -> anyhow::Result<()> {
    let report = TermReport::query(index, term)?;
    println!(
        "Counts for '{}' ({} pages, {} occurrences):",
        report.term,
        report.entries.len(),
        report.total()
    );
    print!("{}", report);
    Ok(())
}
