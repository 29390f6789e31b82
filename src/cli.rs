//! Command-line interface definitions for Scraperly.
//!
//! All options can also be provided via environment variables.

use crate::aggregate::DEFAULT_CONCURRENCY;
use crate::outputs::xlsx::DEFAULT_FILENAME;
use crate::scrapers::fetch::DEFAULT_TIMEOUT;
use clap::Parser;
use std::time::Duration;

/// Scrape news listing pages and rank headlines by importance.
///
/// # Examples
///
/// ```sh
/// # Interactive terminal UI
/// scraperly
///
/// # One-shot run, print to stdout and write both exports
/// scraperly --headless --export news.xlsx --json-output out/news.json
///
/// # Custom site registry
/// scraperly --sites sites.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Scrape once, print headlines grouped by importance, and exit
    #[arg(long)]
    pub headless: bool,

    /// Spreadsheet path. In headless mode the file is written only when this
    /// flag is given
    #[arg(short, long, env = "SCRAPERLY_EXPORT")]
    pub export: Option<String>,

    /// Write a JSON digest of the headlines (headless mode)
    #[arg(short, long, env = "SCRAPERLY_JSON_OUTPUT")]
    pub json_output: Option<String>,

    /// YAML site registry replacing the built-in one
    #[arg(short, long, env = "SCRAPERLY_SITES")]
    pub sites: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "SCRAPERLY_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Sites fetched at once; output order is unaffected
    #[arg(long, env = "SCRAPERLY_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Log file for the terminal UI
    #[arg(long, env = "SCRAPERLY_LOG_FILE", default_value = "scraperly.log")]
    pub log_file: String,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Spreadsheet path used by the terminal UI.
    pub fn export_path(&self) -> &str {
        self.export.as_deref().unwrap_or(DEFAULT_FILENAME)
    }
}
