use ratatui::{layout::Rect, Frame};

use crate::{app::App, session::Page};

use super::{render_countdown, render_landing, render_results, render_session};

/// A UI Screen boundary: responsible for rendering the body of one page
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect);
}

pub struct LandingScreen;

impl Screen for LandingScreen {
    fn render(&self, _app: &App, f: &mut Frame, area: Rect) {
        render_landing(f, area);
    }
}

pub struct CountdownScreen;

impl Screen for CountdownScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        render_countdown(app, f, area);
    }
}

pub struct SessionScreen;

impl Screen for SessionScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        render_session(app, f, area);
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        render_results(app, f, area);
    }
}

/// Helper to construct the appropriate screen for the current page
pub fn current_screen(page: Page) -> Box<dyn Screen> {
    match page {
        Page::Landing => Box::new(LandingScreen),
        Page::Countdown => Box::new(CountdownScreen),
        Page::Session => Box::new(SessionScreen),
        Page::Results => Box::new(ResultsScreen),
    }
}
