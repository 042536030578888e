//! Quire-Harvest main entry point
//!
//! Command-line interface for the page image harvester.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use quire_harvest::config::{load_config, Config};
use quire_harvest::harvest::{HarvestRun, Harvester, HttpDownloader};
use quire_harvest::output::print_summary;
use quire_harvest::viewer::{build_viewer_url, ChromeViewer};
use tracing_subscriber::EnvFilter;

/// Quire-Harvest: page image harvester for dynamic document viewers
///
/// Opens a document in a local browser, pages through it, and downloads
/// every page image exactly once into the output directory. The run ends on
/// its own when no new pages appear, or earlier when the configured end page
/// is reached.
#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "Page image harvester for dynamic document viewers", long_about = None)]
struct Cli {
    /// Document identifier as it appears in the viewer URL
    #[arg(value_name = "DOCUMENT_ID")]
    document_id: String,

    /// Page token to open the document at
    #[arg(short, long, default_value = "PP1", value_name = "TOKEN")]
    start: String,

    /// Stop once this page token has been observed
    #[arg(short, long, value_name = "TOKEN")]
    end: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to write page images into (overrides config)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Run the browser without a visible window
    #[arg(long)]
    headless: bool,

    /// Start downloading without asking for confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration; defaults apply without a file
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };
    if cli.headless {
        config.viewer.headless = true;
    }

    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    // Open the document so the operator can look at it before anything is
    // downloaded
    let url = build_viewer_url(&config.viewer, &cli.document_id, &cli.start);
    let viewer = ChromeViewer::open(&config.viewer, &url).await?;

    if !cli.yes && !confirm_start()? {
        println!("Aborted by user.");
        viewer.close().await?;
        return Ok(());
    }

    let downloader = HttpDownloader::new(Duration::from_secs(config.harvest.download_timeout_secs))?;
    let run = HarvestRun {
        document_id: cli.document_id.clone(),
        end_token: cli.end.clone(),
        output_dir,
    };

    let harvester = Harvester::new(&viewer, &downloader, run, &config.harvest);
    let result = harvester.run().await;

    match result {
        Ok(summary) => {
            viewer.close().await?;
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            let _ = viewer.close().await;
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quire=info,quire_harvest=info,warn"),
            1 => EnvFilter::new("quire=debug,quire_harvest=debug,info"),
            2 => EnvFilter::new("quire=trace,quire_harvest=trace,debug"),
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

/// Asks the operator to confirm the run once the document is on screen
fn confirm_start() -> io::Result<bool> {
    print!("Viewer is open - check the document looks right. Start downloading? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
