use std::time::{Duration, Instant};

use chrono::{NaiveTime, Timelike};
use serde::{Serialize, Serializer};

use crate::timer::{round_millis, Stopwatch};

/// Stored when the free-text diagnosis is blank.
pub const UNDISCLOSED: &str = "Undisclosed";
/// Stored when the cursor points past the deck.
pub const UNKNOWN_IMAGE: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Page {
    Landing,
    Countdown,
    Session,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Standard,
    Custom,
}

/// The two fixed answers offered for every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Label {
    Normal,
    Tumor,
}

/// One answered case. Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    #[serde(rename = "Image_ID")]
    pub image_id: String,
    #[serde(rename = "Diagnosis")]
    pub diagnosis: String,
    #[serde(rename = "Time_Seconds")]
    pub elapsed_secs: f64,
    #[serde(rename = "Timestamp", serialize_with = "serialize_hms")]
    pub timestamp: NaiveTime,
}

fn serialize_hms<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&t.format("%H:%M:%S"))
}

/// Blank input becomes [`UNDISCLOSED`]; anything else is trimmed and title-cased.
pub fn normalize_diagnosis(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return UNDISCLOSED.to_string();
    }
    title_case(trimmed)
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                // multi-char uppercase mappings (ß -> SS) keep only their first char upper
                let mut upper = c.to_uppercase();
                if let Some(first) = upper.next() {
                    out.push(first);
                }
                out.extend(upper.flat_map(char::to_lowercase));
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// The single live session: page, deck, progress, and the answers so far.
#[derive(Debug, Clone)]
pub struct Session {
    pub page: Page,
    pub deck: Vec<String>,
    pub cursor: usize,
    pub results: Vec<CaseResult>,
    pub stopwatch: Stopwatch,
    pub input_mode: InputMode,
}

impl Session {
    pub fn new(deck: Vec<String>) -> Self {
        Self {
            page: Page::Landing,
            deck,
            cursor: 0,
            results: Vec::new(),
            stopwatch: Stopwatch::new(),
            input_mode: InputMode::Standard,
        }
    }

    /// Clears all progress and installs a freshly dealt deck. The page is left alone.
    pub fn reset(&mut self, deck: Vec<String>) {
        self.deck = deck;
        self.cursor = 0;
        self.results.clear();
        self.stopwatch.clear();
        self.input_mode = InputMode::Standard;
    }

    pub fn current_image(&self) -> Option<&str> {
        self.deck.get(self.cursor).map(String::as_str)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.deck.len()
    }

    pub fn total_cases(&self) -> usize {
        self.deck.len()
    }

    /// Fraction of the deck already answered, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.deck.is_empty() {
            1.0
        } else {
            self.cursor.min(self.deck.len()) as f64 / self.deck.len() as f64
        }
    }

    /// Starts the stopwatch for the current case unless it is already running.
    pub fn begin_case(&mut self, now: Instant, settle: Duration) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.stopwatch.start(now, settle)
    }

    /// Records an answer for the current case and moves on to the next one.
    pub fn record_choice(&mut self, raw: &str, now: Instant, clock: NaiveTime) -> &CaseResult {
        let elapsed = self.stopwatch.stop(now);
        let image_id = self
            .current_image()
            .unwrap_or(UNKNOWN_IMAGE)
            .to_string();

        self.results.push(CaseResult {
            image_id,
            diagnosis: normalize_diagnosis(raw),
            elapsed_secs: round_millis(elapsed),
            timestamp: clock.with_nanosecond(0).unwrap_or(clock),
        });

        if self.cursor < self.deck.len() {
            self.cursor += 1;
        }
        self.input_mode = InputMode::Standard;

        &self.results[self.results.len() - 1]
    }
}
