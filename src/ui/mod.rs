//! Interactive terminal UI.
//!
//! The UI loop owns the terminal and all [`AppState`]. Each scrape runs as a
//! single tokio task that never touches the state; it hands its
//! [`ScrapeReport`](crate::aggregate::ScrapeReport) back over a channel which
//! the loop drains between input polls.

mod render;
pub mod state;

use crate::aggregate::aggregate;
use crate::models::SiteDescriptor;
use crate::outputs::xlsx::write_workbook;
use crate::scrapers::HttpFetcher;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode},
};
use futures::FutureExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use state::{AppState, Command, WorkerEvent};
use std::io::{self, Write};
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Sender, channel};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

/// Everything a scrape worker needs, shared across runs.
#[derive(Debug)]
pub struct ScrapeContext {
    pub fetcher: HttpFetcher,
    pub sites: Vec<SiteDescriptor>,
    pub concurrency: usize,
}

fn spawn_scrape(handle: &Handle, ctx: Arc<ScrapeContext>, tx: Sender<WorkerEvent>) {
    info!(sites = ctx.sites.len(), "Starting scrape worker");
    handle.spawn(async move {
        let run = aggregate(&ctx.fetcher, &ctx.sites, ctx.concurrency);
        let event = match AssertUnwindSafe(run).catch_unwind().await {
            Ok(report) => WorkerEvent::Finished(report),
            Err(_) => {
                error!("Scrape worker panicked");
                WorkerEvent::Failed("scrape worker panicked".to_string())
            }
        };
        if tx.send(event).is_err() {
            warn!("UI closed before scrape finished");
        }
    });
}

/// Leaves raw mode and the alternate screen when dropped, including while
/// unwinding from a panic in the event loop.
struct TerminalGuard<W: Write> {
    out: W,
    raw_mode: bool,
}

impl TerminalGuard<io::Stdout> {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut guard = Self {
            out: io::stdout(),
            raw_mode: true,
        };
        execute!(guard.out, EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if self.raw_mode {
            if let Err(e) = disable_raw_mode() {
                warn!(error = %e, "Could not leave raw mode");
            }
        }
        if let Err(e) = execute!(self.out, LeaveAlternateScreen, Show) {
            warn!(error = %e, "Could not restore terminal");
        }
    }
}

/// Run the UI until the user quits.
///
/// Blocks the calling thread, so call it from a blocking context such as
/// `spawn_blocking`. Scrape workers are spawned on `handle`.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to. The
/// terminal is restored on every exit path, panics included.
pub fn run(handle: Handle, ctx: ScrapeContext, export_path: PathBuf) -> io::Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    event_loop(&mut terminal, &handle, Arc::new(ctx), &export_path)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handle: &Handle,
    ctx: Arc<ScrapeContext>,
    export_path: &Path,
) -> io::Result<()> {
    let (tx, rx) = channel();
    let mut state = AppState::new();
    let mut shown_title = String::new();

    if state.begin_scrape() {
        spawn_scrape(handle, Arc::clone(&ctx), tx.clone());
    }

    loop {
        while let Ok(event) = rx.try_recv() {
            state.apply_worker(event);
        }

        let title = state.title();
        if title != shown_title {
            execute!(terminal.backend_mut(), SetTitle(&title))?;
            shown_title = title;
        }
        terminal.draw(|f| render::draw(f, &state))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match state.on_key(key.code, key.modifiers) {
            Some(Command::Quit) => break,
            Some(Command::Scrape) => spawn_scrape(handle, Arc::clone(&ctx), tx.clone()),
            Some(Command::Export) => {
                let result = write_workbook(&state.headlines, export_path);
                if let Err(e) = &result {
                    error!(error = %e, path = %export_path.display(), "Export failed");
                }
                state.export_finished(result, export_path);
            }
            Some(Command::Visit(url)) => {
                info!(%url, "Opening site");
                if let Err(e) = webbrowser::open(&url) {
                    warn!(%url, error = %e, "Could not open browser");
                    state.notify("Error", format!("Could not open {url}:\n{e}"));
                }
            }
            None => {}
        }
    }

    Ok(())
}
