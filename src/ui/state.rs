//! Terminal UI state.
//!
//! Everything the screen shows is derived from this struct: whether a scrape
//! is in flight, the current headlines grouped by tier, the focused panel and
//! its selection, and an optional modal notice. Key handling lives here too
//! so the transitions can be tested without a terminal.

use crate::aggregate::ScrapeReport;
use crate::error::ExportError;
use crate::models::{Headline, ImportanceTier};
use crate::utils::truncate_for_log;
use crossterm::event::{KeyCode, KeyModifiers};
use std::path::Path;

const APP_NAME: &str = "Scraperly News";

/// Message from the scrape worker to the UI loop.
#[derive(Debug)]
pub enum WorkerEvent {
    Finished(ScrapeReport),
    Failed(String),
}

/// Side effect requested by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scrape,
    Export,
    Visit(String),
    Quit,
}

/// Title bar status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Scraping,
    Loaded(usize),
    NoHeadlines,
    Failed,
}

/// A blocking notification; input is swallowed until it is dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

#[derive(Debug)]
pub struct AppState {
    pub status: Status,
    /// All headlines of the last finished scrape, in aggregation order.
    pub headlines: Vec<Headline>,
    /// `headlines` split by tier, indexed like [`ImportanceTier::ALL`].
    pub groups: [Vec<Headline>; 3],
    pub selected: [Option<usize>; 3],
    pub focus: usize,
    pub notice: Option<Notice>,
    pub failed_sites: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn tier_index(tier: ImportanceTier) -> usize {
    match tier {
        ImportanceTier::High => 0,
        ImportanceTier::Medium => 1,
        ImportanceTier::Low => 2,
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            status: Status::Idle,
            headlines: Vec::new(),
            groups: Default::default(),
            selected: [None; 3],
            focus: 0,
            notice: None,
            failed_sites: 0,
        }
    }

    pub fn is_scraping(&self) -> bool {
        self.status == Status::Scraping
    }

    pub fn can_scrape(&self) -> bool {
        !self.is_scraping()
    }

    pub fn can_export(&self) -> bool {
        !self.is_scraping() && !self.headlines.is_empty()
    }

    /// Whether the panel for `tier` has a row selected.
    pub fn can_visit(&self, tier: usize) -> bool {
        !self.is_scraping() && self.selected[tier].is_some()
    }

    pub fn title(&self) -> String {
        match self.status {
            Status::Idle => APP_NAME.to_string(),
            Status::Scraping => format!("{APP_NAME} - Scraping..."),
            Status::Loaded(n) => format!("{APP_NAME} - {n} headlines loaded"),
            Status::NoHeadlines => format!("{APP_NAME} - No headlines found"),
            Status::Failed => format!("{APP_NAME} - Error during scrape"),
        }
    }

    /// Enter the scraping state. Returns `false` when a scrape is already
    /// running.
    pub fn begin_scrape(&mut self) -> bool {
        if self.is_scraping() {
            return false;
        }
        self.status = Status::Scraping;
        self.selected = [None; 3];
        true
    }

    /// Apply the worker's result, replacing whatever was shown before.
    pub fn apply_worker(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Finished(report) => self.finish_scrape(report),
            WorkerEvent::Failed(reason) => {
                self.clear_results();
                self.status = Status::Failed;
                self.notify("Error", format!("An error occurred:\n{reason}"));
            }
        }
    }

    fn finish_scrape(&mut self, report: ScrapeReport) {
        self.clear_results();
        self.failed_sites = report.failed_sites();
        for headline in &report.headlines {
            self.groups[tier_index(headline.importance)].push(headline.clone());
        }
        self.status = if report.headlines.is_empty() {
            Status::NoHeadlines
        } else {
            Status::Loaded(report.headlines.len())
        };
        self.headlines = report.headlines;
    }

    fn clear_results(&mut self) {
        self.headlines.clear();
        self.groups = Default::default();
        self.selected = [None; 3];
        self.failed_sites = 0;
    }

    pub fn notify(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.notice = Some(Notice {
            title: title.into(),
            body: body.into(),
        });
    }

    /// Record the outcome of an export as a notice.
    pub fn export_finished(&mut self, result: Result<(), ExportError>, path: &Path) {
        match result {
            Ok(()) => self.notify(
                "Export Successful",
                format!("Headlines exported successfully to {}", path.display()),
            ),
            Err(ExportError::Empty) => self.notify("No Data", "No headlines to export."),
            Err(e) => self.notify(
                "Export Failed",
                format!("Could not export file:\n{}", truncate_for_log(&e.to_string(), 300)),
            ),
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % 3;
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + 2) % 3;
    }

    pub fn select_next(&mut self) {
        let len = self.groups[self.focus].len();
        if len == 0 {
            return;
        }
        let slot = &mut self.selected[self.focus];
        *slot = Some(match *slot {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        if self.groups[self.focus].is_empty() {
            return;
        }
        let slot = &mut self.selected[self.focus];
        *slot = Some(slot.map_or(0, |i| i.saturating_sub(1)));
    }

    /// The selected headline of the focused panel.
    pub fn selected_headline(&self) -> Option<&Headline> {
        self.selected[self.focus].and_then(|i| self.groups[self.focus].get(i))
    }

    /// Map a key press to a state change and, possibly, a command.
    pub fn on_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Command::Quit);
        }
        if self.notice.is_some() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                self.notice = None;
            }
            return None;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('s') => self.begin_scrape().then_some(Command::Scrape),
            KeyCode::Char('e') => self.can_export().then_some(Command::Export),
            KeyCode::Tab => {
                self.focus_next();
                None
            }
            KeyCode::BackTab => {
                self.focus_prev();
                None
            }
            KeyCode::Char(c @ '1'..='3') => {
                self.focus = c as usize - '1' as usize;
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Enter | KeyCode::Char('o') => self.visit_selected(),
            _ => None,
        }
    }

    fn visit_selected(&mut self) -> Option<Command> {
        if !self.can_visit(self.focus) {
            return None;
        }
        let url = self.selected_headline()?.site_url.clone();
        if url.is_empty() {
            self.notify("No Link", "No website link available for this news outlet.");
            return None;
        }
        Some(Command::Visit(url))
    }
}
