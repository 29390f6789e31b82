//! # Scraperly
//!
//! Fetches the listing page of each configured news site, extracts headlines
//! and links with per-site selectors, ranks every headline by keyword into
//! High, Medium, or Low importance, and shows the result in a terminal UI
//! or prints it once.
//!
//! ## Usage
//!
//! ```sh
//! scraperly                                  # interactive UI
//! scraperly --headless --export news.xlsx    # one-shot, with spreadsheet
//! ```
//!
//! ## Architecture
//!
//! 1. **Registry**: load site descriptors (built-in or YAML)
//! 2. **Fetching**: download each listing page
//! 3. **Extracting**: pull `(text, link)` pairs out of the markup
//! 4. **Classifying**: keyword match into an importance tier
//! 5. **Aggregating**: merge sites in registry order, drop duplicate text
//! 6. **Output**: terminal UI, stdout, spreadsheet, or JSON digest

use clap::Parser;
use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod classify;
mod cli;
mod error;
mod models;
mod outputs;
mod scrapers;
mod sites;
mod ui;
mod utils;

use aggregate::{ScrapeReport, aggregate};
use cli::Cli;
use models::ImportanceTier;
use outputs::{json, xlsx};
use scrapers::HttpFetcher;
use ui::ScrapeContext;
use utils::ensure_writable_parent;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    // The UI owns the terminal, so its logs go to a file.
    init_tracing(if args.headless { None } else { Some(args.log_file.as_str()) })?;
    debug!(?args, "Parsed CLI arguments");

    let sites = sites::load_sites(args.sites.as_deref()).await?;
    let fetcher = HttpFetcher::new(args.timeout())?;

    if args.headless {
        return run_headless(&args, &fetcher, &sites).await;
    }

    info!("Starting terminal UI");
    let ctx = ScrapeContext {
        fetcher,
        sites,
        concurrency: args.concurrency,
    };
    let export_path = Path::new(args.export_path()).to_path_buf();
    let handle = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || ui::run(handle, ctx, export_path)).await??;
    info!("Terminal UI closed");
    Ok(())
}

fn init_tracing(log_file: Option<&str>) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339());

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

async fn run_headless(
    args: &Cli,
    fetcher: &HttpFetcher,
    sites: &[models::SiteDescriptor],
) -> Result<(), Box<dyn Error>> {
    let start_time = std::time::Instant::now();

    // Fail before scraping if an output cannot be written
    for path in [args.export.as_deref(), args.json_output.as_deref()].into_iter().flatten() {
        if let Err(e) = ensure_writable_parent(Path::new(path)).await {
            error!(%path, error = %e, "Output directory is not writable");
            return Err(e);
        }
    }

    let report = aggregate(fetcher, sites, args.concurrency).await;
    print_report(&report);

    if let Some(path) = &args.export {
        xlsx::write_workbook(&report.headlines, Path::new(path))?;
        println!("\nHeadlines exported successfully to {path}");
    }
    if let Some(path) = &args.json_output {
        json::write_digest(&report.headlines, Path::new(path)).await?;
        println!("JSON digest written to {path}");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        headlines = report.headlines.len(),
        failed_sites = report.failed_sites(),
        "Execution complete"
    );
    Ok(())
}

fn print_report(report: &ScrapeReport) {
    if report.headlines.is_empty() {
        println!("No headlines found");
    }
    for tier in ImportanceTier::ALL {
        let group: Vec<_> = report
            .headlines
            .iter()
            .filter(|h| h.importance == tier)
            .collect();
        if group.is_empty() {
            continue;
        }
        println!("\n{} {} Importance ({})", tier.glyph(), tier, group.len());
        for h in group {
            println!("  [{}] {}", h.source, h.text);
            if !h.link.is_empty() {
                println!("      {}", h.link);
            }
        }
    }
    println!();
    for outcome in &report.outcomes {
        match &outcome.error {
            Some(e) => eprintln!("warning: {} skipped: {}", outcome.name, e),
            None => println!("{}: {} headlines", outcome.name, outcome.extracted),
        }
    }
}
