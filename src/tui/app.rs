//! Application state and key handling

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::notify::notifier::Notifier;
use crate::pomodoro::pomodoro::{Phase, Timer};
use crate::pomodoro::session::{DEFAULT_BREAK, DEFAULT_SESSIONS, DEFAULT_WORK};

/// Which input box has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Work,
    Break,
    Sessions,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Sessions,
            Self::Sessions => Self::Work,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Work => Self::Sessions,
            Self::Break => Self::Work,
            Self::Sessions => Self::Break,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "Work Duration",
            Self::Break => "Break Duration",
            Self::Sessions => "Sessions",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Work => DEFAULT_WORK,
            Self::Break => DEFAULT_BREAK,
            Self::Sessions => DEFAULT_SESSIONS,
        }
    }

    pub fn char_limit(self) -> usize {
        match self {
            Self::Work | Self::Break => 10,
            Self::Sessions => 2,
        }
    }

    pub const ALL: [Field; 3] = [Field::Work, Field::Break, Field::Sessions];
}

pub struct App<N> {
    pub timer: Timer<N>,
    pub focused: Field,
    work: String,
    rest: String,
    sessions: String,
}

impl<N: Notifier> App<N> {
    pub fn new(timer: Timer<N>) -> Self {
        Self {
            timer,
            focused: Field::default(),
            work: String::new(),
            rest: String::new(),
            sessions: String::new(),
        }
    }

    /// Pre-fill the sessions box, e.g. from `--sessions`.
    pub fn with_sessions(mut self, sessions: u32) -> Self {
        self.sessions = sessions.to_string();
        self
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Work => &self.work,
            Field::Break => &self.rest,
            Field::Sessions => &self.sessions,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Work => &mut self.work,
            Field::Break => &mut self.rest,
            Field::Sessions => &mut self.sessions,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }

    pub fn on_tick(&mut self, now: DateTime<Local>) {
        self.timer.on_tick(now);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: DateTime<Local>) {
        let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'));
        if ctrl_c {
            self.timer.quit(now);
            return;
        }

        match self.timer.phase() {
            Phase::Input => self.handle_input_key(key, now),
            Phase::Work | Phase::Break => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') => self.timer.quit(now),
                KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                    self.timer.toggle_pause(now)
                }
                _ => {}
            },
            Phase::Complete => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                    self.timer.quit(now);
                }
            }
            Phase::Quit => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent, now: DateTime<Local>) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.timer.quit(now),
            KeyCode::Tab | KeyCode::Down => {
                self.focused = self.focused.next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = self.focused.prev();
            }
            KeyCode::Enter => {
                let (work, rest, sessions) = (
                    self.work.clone(),
                    self.rest.clone(),
                    self.sessions.clone(),
                );
                self.timer.submit(&work, &rest, &sessions, now);
            }
            KeyCode::Backspace => {
                self.value_mut(self.focused).pop();
            }
            KeyCode::Char(c) if !c.is_control() => {
                let limit = self.focused.char_limit();
                let value = self.value_mut(self.focused);
                if value.chars().count() < limit {
                    value.push(c);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::notifier::RecordingNotifier;
    use chrono::TimeDelta;

    fn now() -> DateTime<Local> {
        DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .with_timezone(&Local)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn new_app() -> App<RecordingNotifier> {
        App::new(Timer::new(RecordingNotifier::default()))
    }

    fn type_text(app: &mut App<RecordingNotifier>, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)), now());
        }
    }

    #[test]
    fn test_focus_cycles_both_ways() {
        let mut app = new_app();
        assert_eq!(app.focused, Field::Work);
        app.handle_key(key(KeyCode::Tab), now());
        assert_eq!(app.focused, Field::Break);
        app.handle_key(key(KeyCode::Down), now());
        assert_eq!(app.focused, Field::Sessions);
        app.handle_key(key(KeyCode::Tab), now());
        assert_eq!(app.focused, Field::Work);
        app.handle_key(key(KeyCode::BackTab), now());
        assert_eq!(app.focused, Field::Sessions);
        app.handle_key(key(KeyCode::Up), now());
        assert_eq!(app.focused, Field::Break);
    }

    #[test]
    fn test_typing_respects_limits() {
        let mut app = new_app();
        type_text(&mut app, "1h30m10s500");
        assert_eq!(app.value(Field::Work), "1h30m10s50");

        app.handle_key(key(KeyCode::Backspace), now());
        assert_eq!(app.value(Field::Work), "1h30m10s5");

        app.focused = Field::Sessions;
        type_text(&mut app, "123");
        assert_eq!(app.value(Field::Sessions), "12");
    }

    #[test]
    fn test_enter_submits_form() {
        let mut app = new_app();
        type_text(&mut app, "50");
        app.handle_key(key(KeyCode::Tab), now());
        type_text(&mut app, "10m");
        app.handle_key(key(KeyCode::Enter), now());

        assert_eq!(app.timer.phase(), Phase::Work);
        let plan = app.timer.state().plan().unwrap();
        assert_eq!(plan.work(), TimeDelta::minutes(50));
        assert_eq!(plan.rest(), TimeDelta::minutes(10));
        assert_eq!(plan.sessions(), 4);
    }

    #[test]
    fn test_invalid_form_keeps_input() {
        let mut app = new_app();
        type_text(&mut app, "abc");
        app.handle_key(key(KeyCode::Enter), now());
        assert_eq!(app.timer.phase(), Phase::Input);
        assert!(app.timer.last_error().is_some());
        assert_eq!(app.value(Field::Work), "abc");
    }

    #[test]
    fn test_prefilled_sessions() {
        let mut app = new_app().with_sessions(2);
        app.handle_key(key(KeyCode::Enter), now());
        assert_eq!(app.timer.state().plan().unwrap().sessions(), 2);
    }

    #[test]
    fn test_pause_keys() {
        let mut app = new_app();
        app.handle_key(key(KeyCode::Enter), now());

        app.handle_key(key(KeyCode::Char(' ')), now());
        assert!(app.timer.state().interval().unwrap().is_paused());
        app.handle_key(key(KeyCode::Char('p')), now());
        assert!(!app.timer.state().interval().unwrap().is_paused());

        // Typing keys mean nothing once the timer runs.
        app.handle_key(key(KeyCode::Char('x')), now());
        assert_eq!(app.timer.phase(), Phase::Work);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = new_app();
        app.handle_key(key(KeyCode::Char('q')), now());
        assert!(app.is_finished());

        let mut app = new_app();
        app.handle_key(key(KeyCode::Enter), now());
        app.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            now(),
        );
        assert!(app.is_finished());
    }

    #[test]
    fn test_complete_only_accepts_quit() {
        let mut app = new_app();
        type_text(&mut app, "1");
        app.handle_key(key(KeyCode::Tab), now());
        type_text(&mut app, "1");
        app.handle_key(key(KeyCode::Tab), now());
        type_text(&mut app, "1");
        app.handle_key(key(KeyCode::Enter), now());

        app.on_tick(now() + TimeDelta::minutes(1));
        app.on_tick(now() + TimeDelta::minutes(2));
        assert_eq!(app.timer.phase(), Phase::Complete);

        app.handle_key(key(KeyCode::Char('p')), now());
        assert_eq!(app.timer.phase(), Phase::Complete);
        app.handle_key(key(KeyCode::Char('Q')), now());
        assert!(app.is_finished());
    }
}
