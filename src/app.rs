use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::ResultsResult;
use crate::model::{Page, Window};
use crate::pager::Pager;
use crate::transform::{transform, PageView};

const MAX_STEP_DIGITS: usize = 6;

/// What the status line reports about the page on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum PageStatus {
    Loading(Window),
    Ready,
    /// The agent returned nothing for a non-empty window.
    EndOfResults,
    FetchFailed(String),
    Malformed(String),
    InvalidStep,
}

/// A fetch the caller should start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub seq: u64,
    pub window: Window,
}

/// A finished fetch, sent back to the UI loop.
#[derive(Debug)]
pub struct Response {
    pub seq: u64,
    pub outcome: ResultsResult<Page>,
}

pub struct App {
    pager: Pager,
    // Pager as it stood for the page on screen; restored when a fetch fails.
    shown: Pager,
    step_input: String,
    view: PageView,
    status: PageStatus,
    latest_seq: u64,
    quit: bool,
}

impl App {
    pub fn new(start: u64, step: u64) -> Self {
        let pager = Pager::at(start, step);
        Self {
            view: PageView::empty(pager.window()),
            status: PageStatus::Loading(pager.window()),
            shown: pager.clone(),
            pager,
            step_input: step.to_string(),
            latest_seq: 0,
            quit: false,
        }
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn step_input(&self) -> &str {
        &self.step_input
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// First fetch on startup.
    pub fn initial_request(&mut self) -> Request {
        let window = self.pager.window();
        self.issue(window)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Request> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => {
                self.quit = true;
                None
            }
            (_, KeyCode::Left) | (_, KeyCode::Char('h')) | (_, KeyCode::Char('p')) => {
                let step = self.step()?;
                let window = self.pager.prev(step);
                Some(self.issue(window))
            }
            (_, KeyCode::Right) | (_, KeyCode::Char('l')) | (_, KeyCode::Char('n')) => {
                let step = self.step()?;
                let window = self.pager.next(step);
                Some(self.issue(window))
            }
            (_, KeyCode::Enter) => {
                let step = self.step()?;
                let window = self.pager.apply_step(step);
                Some(self.issue(window))
            }
            (_, KeyCode::Char('r')) => {
                let window = self.pager.reload();
                Some(self.issue(window))
            }
            (_, KeyCode::Char(c)) if c.is_ascii_digit() => {
                if self.step_input.len() < MAX_STEP_DIGITS {
                    self.step_input.push(c);
                }
                None
            }
            (_, KeyCode::Backspace) => {
                self.step_input.pop();
                None
            }
            _ => None,
        }
    }

    /// Applies a finished fetch. Responses to anything but the latest request
    /// are dropped; returns whether the screen changed.
    pub fn apply(&mut self, response: Response) -> bool {
        if response.seq != self.latest_seq {
            tracing::debug!(
                "dropping stale response #{} (latest is #{})",
                response.seq,
                self.latest_seq
            );
            return false;
        }

        match response.outcome {
            Ok(page) => {
                tracing::info!(
                    "#{} [{}, {}) returned {} records",
                    response.seq,
                    page.window.start,
                    page.window.stop,
                    page.records.len()
                );
                self.view = transform(&page);
                self.pager.record_returned(self.view.returned_upper);
                self.shown = self.pager.clone();
                self.status = if page.is_empty() && page.window.width() > 0 {
                    PageStatus::EndOfResults
                } else {
                    PageStatus::Ready
                };
            }
            Err(e) => {
                tracing::warn!("#{}: {}", response.seq, e);
                self.pager = self.shown.clone();
                self.status = if e.is_malformed() {
                    PageStatus::Malformed(e.to_string())
                } else {
                    PageStatus::FetchFailed(e.to_string())
                };
            }
        }
        true
    }

    fn issue(&mut self, window: Window) -> Request {
        self.latest_seq += 1;
        self.status = PageStatus::Loading(window);
        tracing::info!(
            "request #{} for [{}, {})",
            self.latest_seq,
            window.start,
            window.stop
        );
        Request {
            seq: self.latest_seq,
            window,
        }
    }

    // Page size as currently typed; zero or blank refuses to navigate.
    fn step(&mut self) -> Option<u64> {
        match self.step_input.parse::<u64>() {
            Ok(step) if step > 0 => Some(step),
            _ => {
                self.status = PageStatus::InvalidStep;
                None
            }
        }
    }
}
