use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::controller::{Action, Controller};
use crate::images::{ImageSource, ImageStatus};
use crate::session::{InputMode, Label, Page};

/// What a single key press means on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCommand {
    Dispatch(Action),
    Type(char),
    Erase,
    Submit,
    Quit,
    Ignore,
}

pub fn key_command(page: Page, mode: InputMode, key: KeyEvent) -> KeyCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyCommand::Quit;
    }

    if page == Page::Session && mode == InputMode::Custom {
        return match key.code {
            KeyCode::Enter => KeyCommand::Submit,
            KeyCode::Esc => KeyCommand::Dispatch(Action::CancelCustom),
            KeyCode::Backspace => KeyCommand::Erase,
            KeyCode::Home => KeyCommand::Dispatch(Action::Home),
            KeyCode::Char(c) => KeyCommand::Type(c),
            _ => KeyCommand::Ignore,
        };
    }

    match (page, key.code) {
        (_, KeyCode::Esc) | (_, KeyCode::Char('q')) => KeyCommand::Quit,
        (Page::Landing, KeyCode::Enter) | (Page::Landing, KeyCode::Char('i')) => {
            KeyCommand::Dispatch(Action::Initialize)
        }
        (Page::Landing, _) => KeyCommand::Ignore,
        (_, KeyCode::Home) | (_, KeyCode::Char('h')) => KeyCommand::Dispatch(Action::Home),
        (Page::Session, KeyCode::Char('n')) | (Page::Session, KeyCode::Char('1')) => {
            KeyCommand::Dispatch(Action::Choose(Label::Normal))
        }
        (Page::Session, KeyCode::Char('t')) | (Page::Session, KeyCode::Char('2')) => {
            KeyCommand::Dispatch(Action::Choose(Label::Tumor))
        }
        (Page::Session, KeyCode::Char('o')) | (Page::Session, KeyCode::Char('3')) => {
            KeyCommand::Dispatch(Action::OpenCustom)
        }
        (Page::Results, KeyCode::Char('s')) => KeyCommand::Dispatch(Action::Export),
        (Page::Results, KeyCode::Char('n')) | (Page::Results, KeyCode::Enter) => {
            KeyCommand::Dispatch(Action::StartNew)
        }
        _ => KeyCommand::Ignore,
    }
}

/// Everything the event loop and the renderer share.
pub struct App {
    pub controller: Controller,
    pub draft: String,
    images: Box<dyn ImageSource>,
    image: Option<(String, ImageStatus)>,
    should_quit: bool,
}

impl App {
    pub fn new(controller: Controller, images: Box<dyn ImageSource>) -> Self {
        Self {
            controller,
            draft: String::new(),
            images,
            image: None,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Resolution of the image currently on screen, if any.
    pub fn image_status(&self) -> Option<&ImageStatus> {
        match (self.controller.page(), &self.image) {
            (Page::Session, Some((_, status))) => Some(status),
            _ => None,
        }
    }

    pub fn on_tick(&mut self, now: Instant) -> bool {
        let changed = self.controller.dispatch(Action::Tick, now);
        if changed {
            self.refresh_image();
        }
        changed
    }

    /// Returns true when the screen needs redrawing.
    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let command = key_command(self.controller.page(), self.controller.input_mode(), key);
        match command {
            KeyCommand::Quit => {
                self.should_quit = true;
                false
            }
            KeyCommand::Ignore => false,
            KeyCommand::Type(c) => {
                self.draft.push(c);
                true
            }
            KeyCommand::Erase => self.draft.pop().is_some(),
            KeyCommand::Submit => {
                let text = std::mem::take(&mut self.draft);
                self.apply(Action::SubmitCustom(text), now)
            }
            KeyCommand::Dispatch(action) => {
                if matches!(action, Action::OpenCustom | Action::CancelCustom | Action::Home) {
                    self.draft.clear();
                }
                self.apply(action, now)
            }
        }
    }

    fn apply(&mut self, action: Action, now: Instant) -> bool {
        let changed = self.controller.dispatch(action, now);
        if changed {
            self.refresh_image();
        }
        changed
    }

    fn refresh_image(&mut self) {
        let session = self.controller.session();
        let current = match (session.page, session.current_image()) {
            (Page::Session, Some(id)) => id,
            _ => {
                self.image = None;
                return;
            }
        };
        if self.image.as_ref().map(|(id, _)| id.as_str()) != Some(current) {
            let status = self.images.resolve(current);
            self.image = Some((current.to_string(), status));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Pacing;
    use crate::deck::DeckProvider;
    use std::path::PathBuf;

    struct NothingThere;

    impl ImageSource for NothingThere {
        fn resolve(&self, id: &str) -> ImageStatus {
            ImageStatus::Missing {
                path: PathBuf::from(id),
            }
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(images: &[&str]) -> App {
        let controller = Controller::new(
            DeckProvider::new(images.iter().copied()),
            Pacing::immediate(),
        );
        App::new(controller, Box::new(NothingThere))
    }

    fn start(app: &mut App, now: Instant) {
        app.on_key(key(KeyCode::Enter), now);
        while app.controller.page() == Page::Countdown {
            app.on_tick(now);
        }
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for page in [Page::Landing, Page::Countdown, Page::Session, Page::Results] {
            for mode in [InputMode::Standard, InputMode::Custom] {
                assert_eq!(key_command(page, mode, ctrl_c), KeyCommand::Quit);
            }
        }
    }

    #[test]
    fn custom_mode_captures_letters() {
        let cmd = key_command(Page::Session, InputMode::Custom, key(KeyCode::Char('q')));
        assert_eq!(cmd, KeyCommand::Type('q'));
        let cmd = key_command(Page::Session, InputMode::Custom, key(KeyCode::Esc));
        assert_eq!(cmd, KeyCommand::Dispatch(Action::CancelCustom));
    }

    #[test]
    fn landing_has_no_home() {
        assert_eq!(
            key_command(Page::Landing, InputMode::Standard, key(KeyCode::Char('h'))),
            KeyCommand::Ignore
        );
        assert_eq!(
            key_command(Page::Results, InputMode::Standard, key(KeyCode::Char('h'))),
            KeyCommand::Dispatch(Action::Home)
        );
    }

    #[test]
    fn typed_diagnosis_is_recorded() {
        let mut app = app(&["a.jpg", "b.jpg"]);
        let now = Instant::now();
        start(&mut app, now);

        app.on_key(key(KeyCode::Char('o')), now);
        for c in "benign cystt".chars() {
            app.on_key(key(KeyCode::Char(c)), now);
        }
        app.on_key(key(KeyCode::Backspace), now);
        assert_eq!(app.draft, "benign cyst");
        app.on_key(key(KeyCode::Enter), now);

        let results = &app.controller.session().results;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].diagnosis, "Benign Cyst");
        assert!(app.draft.is_empty());
        assert_eq!(app.controller.input_mode(), InputMode::Standard);
    }

    #[test]
    fn cancel_discards_draft() {
        let mut app = app(&["a.jpg"]);
        let now = Instant::now();
        start(&mut app, now);
        app.on_key(key(KeyCode::Char('3')), now);
        app.on_key(key(KeyCode::Char('x')), now);
        app.on_key(key(KeyCode::Esc), now);
        assert!(app.draft.is_empty());
        assert!(!app.should_quit());
        assert_eq!(app.controller.input_mode(), InputMode::Standard);
    }

    #[test]
    fn missing_image_does_not_block() {
        let mut app = app(&["a.jpg", "b.jpg"]);
        let now = Instant::now();
        start(&mut app, now);
        assert!(matches!(app.image_status(), Some(ImageStatus::Missing { .. })));

        app.on_key(key(KeyCode::Char('n')), now);
        app.on_key(key(KeyCode::Char('t')), now);
        assert_eq!(app.controller.page(), Page::Results);
        assert!(app.image_status().is_none());
    }

    #[test]
    fn escape_quits_outside_custom_mode() {
        let mut app = app(&["a.jpg"]);
        app.on_key(key(KeyCode::Esc), Instant::now());
        assert!(app.should_quit());
    }
}
