//! Screen state machine.
//!
//! Every user action and every clock tick goes through [`Controller::dispatch`],
//! which owns the single [`Session`] and applies the transition table:
//!
//! | page      | action          | next page                    |
//! |-----------|-----------------|------------------------------|
//! | Landing   | Initialize      | Countdown                    |
//! | Countdown | Tick (elapsed)  | Countdown, then Session      |
//! | Session   | Choose / Submit | Session, or Results at end   |
//! | Session   | OpenCustom      | Session (custom input)       |
//! | Session   | CancelCustom    | Session (standard input)     |
//! | Results   | Export          | Results                      |
//! | Results   | StartNew        | Landing                      |
//! | not Landing | Home          | Landing                      |

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use itertools::Itertools;

use crate::config::Pacing;
use crate::deck::DeckProvider;
use crate::report::{self, Summary};
use crate::session::{InputMode, Label, Page, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Initialize,
    Tick,
    Choose(Label),
    OpenCustom,
    SubmitCustom(String),
    CancelCustom,
    Export,
    StartNew,
    Home,
}

/// Visual 3-2-1 before the first case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub remaining: u8,
    next_step_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    Failed(String),
}

#[derive(Debug)]
pub struct Controller {
    session: Session,
    provider: DeckProvider,
    pacing: Pacing,
    export_dir: PathBuf,
    countdown: Option<Countdown>,
    summary: Option<Summary>,
    last_export: Option<ExportOutcome>,
}

impl Controller {
    pub fn new(provider: DeckProvider, pacing: Pacing) -> Self {
        let deck = provider.deal();
        log::info!("new deck: {}", deck.iter().join(", "));
        Self {
            session: Session::new(deck),
            provider,
            pacing,
            export_dir: PathBuf::from("."),
            countdown: None,
            summary: None,
            last_export: None,
        }
    }

    pub fn with_export_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.export_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn page(&self) -> Page {
        self.session.page
    }

    pub fn input_mode(&self) -> InputMode {
        self.session.input_mode
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    /// Metrics computed when the results page was entered.
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn last_export(&self) -> Option<&ExportOutcome> {
        self.last_export.as_ref()
    }

    /// Applies one action. Returns whether anything visible changed.
    pub fn dispatch(&mut self, action: Action, now: Instant) -> bool {
        let page = self.session.page;
        let mode = self.session.input_mode;

        match (page, mode, action) {
            (_, _, Action::Home) if page != Page::Landing => {
                self.go_home();
                true
            }
            (Page::Landing, _, Action::Initialize) => {
                // the deck was dealt on entry to Landing
                self.start_countdown(now);
                true
            }
            (Page::Countdown, _, Action::Tick) => self.on_countdown_tick(now),
            (Page::Session, InputMode::Standard, Action::Choose(label)) => {
                self.record(&label.to_string(), now);
                true
            }
            (Page::Session, InputMode::Standard, Action::OpenCustom) => {
                self.session.input_mode = InputMode::Custom;
                true
            }
            (Page::Session, InputMode::Custom, Action::SubmitCustom(text)) => {
                self.record(&text, now);
                true
            }
            (Page::Session, InputMode::Custom, Action::CancelCustom) => {
                self.session.input_mode = InputMode::Standard;
                true
            }
            (Page::Results, _, Action::Export) => {
                self.export();
                true
            }
            (Page::Results, _, Action::StartNew) => {
                self.go_home();
                true
            }
            (_, _, Action::Tick) => false,
            (page, mode, action) => {
                log::debug!("ignoring {:?} on {} ({:?})", action, page, mode);
                false
            }
        }
    }

    fn reset(&mut self) {
        let deck = self.provider.deal();
        log::info!("new deck: {}", deck.iter().join(", "));
        self.session.reset(deck);
        self.countdown = None;
        self.summary = None;
        self.last_export = None;
    }

    fn go_home(&mut self) {
        log::info!("home from {}", self.session.page);
        self.reset();
        self.session.page = Page::Landing;
    }

    fn start_countdown(&mut self, now: Instant) {
        if self.pacing.countdown_from == 0 {
            self.enter_session(now);
            return;
        }
        self.session.page = Page::Countdown;
        self.countdown = Some(Countdown {
            remaining: self.pacing.countdown_from,
            next_step_at: now + self.pacing.countdown_tick,
        });
    }

    /// Steps at most once per tick so every number gets drawn.
    fn on_countdown_tick(&mut self, now: Instant) -> bool {
        let Some(countdown) = self.countdown.as_mut() else {
            self.enter_session(now);
            return true;
        };
        if now < countdown.next_step_at {
            return false;
        }

        countdown.remaining = countdown.remaining.saturating_sub(1);
        countdown.next_step_at = now + self.pacing.countdown_tick;
        if countdown.remaining == 0 {
            self.countdown = None;
            self.enter_session(now);
        }
        true
    }

    fn enter_session(&mut self, now: Instant) {
        if self.session.is_exhausted() {
            self.enter_results();
            return;
        }
        self.session.page = Page::Session;
        if self.session.begin_case(now, self.pacing.settle) {
            log::debug!(
                "timing case {}/{}",
                self.session.cursor + 1,
                self.session.total_cases()
            );
        }
    }

    fn record(&mut self, raw: &str, now: Instant) {
        let result = self.session.record_choice(raw, now, Local::now().time());
        log::info!(
            "{} -> {} in {:.3}s",
            result.image_id,
            result.diagnosis,
            result.elapsed_secs
        );
        self.enter_session(now);
    }

    fn enter_results(&mut self) {
        self.session.page = Page::Results;
        self.session.stopwatch.clear();
        let summary = report::summarize(&self.session.results);
        log::info!(
            "session complete: {} cases, mean {:?}",
            summary.cases,
            summary.mean_secs
        );
        self.summary = Some(summary);
    }

    fn export(&mut self) {
        self.last_export = Some(match report::export(&self.session.results, &self.export_dir) {
            Ok(path) => ExportOutcome::Saved(path),
            Err(e) => {
                log::error!("export failed: {}", e);
                ExportOutcome::Failed(e.to_string())
            }
        });
    }
}
