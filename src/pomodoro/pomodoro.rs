//! Interval state machine
//!
//! `step` is a pure transition `(state, event, now) -> (state', effects)`.
//! `Timer` owns the current state, feeds it events and hands the emitted
//! effects to a `Notifier`.

use chrono::{DateTime, Local, TimeDelta};
use tracing::{debug, info};

use crate::error::ParseError;
use crate::notify::notifier::Notifier;
use crate::pomodoro::session::SessionPlan;

pub const TICK_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PomodoroMode {
    Work,
    Break,
}

impl PomodoroMode {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            PomodoroMode::Work => "WORK",
            PomodoroMode::Break => "BREAK",
        }
    }

    pub(crate) fn emoji(&self) -> &str {
        match self {
            PomodoroMode::Work => "🍅",
            PomodoroMode::Break => "☕",
        }
    }
}

/// Coarse stage of the run, for rendering and key routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Input,
    Work,
    Break,
    Complete,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Running,
    Paused { since: DateTime<Local> },
}

/// One armed work or break interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    mode: PomodoroMode,
    started_at: DateTime<Local>,
    duration: TimeDelta,
    paused_total: TimeDelta,
    pause: Pause,
}

impl Interval {
    pub fn start(mode: PomodoroMode, duration: TimeDelta, now: DateTime<Local>) -> Self {
        Self {
            mode,
            started_at: now,
            duration,
            paused_total: TimeDelta::zero(),
            pause: Pause::Running,
        }
    }

    pub fn mode(&self) -> PomodoroMode {
        self.mode
    }

    pub fn paused_total(&self) -> TimeDelta {
        self.paused_total
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.pause, Pause::Paused { .. })
    }

    /// Active time spent in this interval. Frozen while paused.
    pub fn elapsed(&self, now: DateTime<Local>) -> TimeDelta {
        let until = match self.pause {
            Pause::Paused { since } => since,
            Pause::Running => now,
        };
        until - self.started_at - self.paused_total
    }

    /// May be negative once the interval has run out.
    pub fn remaining(&self, now: DateTime<Local>) -> TimeDelta {
        self.duration - self.elapsed(now)
    }

    /// Fraction of the interval elapsed, clamped to [0, 1].
    pub fn progress(&self, now: DateTime<Local>) -> f64 {
        let total = self.duration.num_milliseconds();
        if total <= 0 {
            return 1.0;
        }
        let elapsed = self.elapsed(now).num_milliseconds();
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }

    fn toggle_pause(&mut self, now: DateTime<Local>) {
        self.pause = match self.pause {
            Pause::Paused { since } => {
                self.paused_total += (now - since).max(TimeDelta::zero());
                Pause::Running
            }
            Pause::Running => Pause::Paused { since: now },
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Input,
    Running {
        plan: SessionPlan,
        session: u32,
        interval: Interval,
    },
    Complete {
        plan: SessionPlan,
    },
    Quit,
}

impl TimerState {
    pub fn phase(&self) -> Phase {
        match self {
            TimerState::Input => Phase::Input,
            TimerState::Running { interval, .. } => match interval.mode {
                PomodoroMode::Work => Phase::Work,
                PomodoroMode::Break => Phase::Break,
            },
            TimerState::Complete { .. } => Phase::Complete,
            TimerState::Quit => Phase::Quit,
        }
    }

    pub fn plan(&self) -> Option<&SessionPlan> {
        match self {
            TimerState::Running { plan, .. } | TimerState::Complete { plan } => Some(plan),
            TimerState::Input | TimerState::Quit => None,
        }
    }

    /// One-based session number for display; the session count once complete.
    pub fn session_number(&self) -> u32 {
        match self {
            TimerState::Running { session, .. } => session.saturating_add(1),
            TimerState::Complete { plan } => plan.sessions(),
            TimerState::Input | TimerState::Quit => 0,
        }
    }

    pub fn interval(&self) -> Option<&Interval> {
        match self {
            TimerState::Running { interval, .. } => Some(interval),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Submit {
        work: String,
        rest: String,
        sessions: String,
    },
    Start(SessionPlan),
    TogglePause,
    Tick,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    /// Alert text for the interval of `mode` that just ran out.
    pub fn interval_done(mode: PomodoroMode, session: u32, sessions: u32) -> Self {
        match mode {
            PomodoroMode::Work => Self {
                title: "Work Session Complete!".to_string(),
                message: format!(
                    "Session {}/{} done! Time for a break! ☕",
                    session + 1,
                    sessions
                ),
            },
            PomodoroMode::Break if session + 1 >= sessions => Self {
                title: "Break Complete!".to_string(),
                message: "All sessions completed! Great work! 🎉".to_string(),
            },
            PomodoroMode::Break => Self {
                title: "Break Complete!".to_string(),
                message: format!("Break over! Starting session {}/{}", session + 2, sessions),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify(Notice),
    Rejected(ParseError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: TimerState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(state: TimerState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

fn start_work(plan: SessionPlan, session: u32, now: DateTime<Local>) -> TimerState {
    TimerState::Running {
        plan,
        session,
        interval: Interval::start(PomodoroMode::Work, plan.work(), now),
    }
}

fn start_break(plan: SessionPlan, session: u32, now: DateTime<Local>) -> TimerState {
    TimerState::Running {
        plan,
        session,
        interval: Interval::start(PomodoroMode::Break, plan.rest(), now),
    }
}

/// Apply one event. Events that do not fit the current phase leave it untouched.
pub fn step(state: TimerState, event: Event, now: DateTime<Local>) -> Transition {
    match (state, event) {
        (_, Event::Quit) => Transition::stay(TimerState::Quit),

        (
            TimerState::Input,
            Event::Submit {
                work,
                rest,
                sessions,
            },
        ) => match SessionPlan::from_form(&work, &rest, &sessions) {
            Ok(plan) => Transition::stay(start_work(plan, 0, now)),
            Err(e) => Transition {
                state: TimerState::Input,
                effects: vec![Effect::Rejected(e)],
            },
        },

        (TimerState::Input, Event::Start(plan)) => Transition::stay(start_work(plan, 0, now)),

        (
            TimerState::Running {
                plan,
                session,
                mut interval,
            },
            Event::TogglePause,
        ) => {
            interval.toggle_pause(now);
            Transition::stay(TimerState::Running {
                plan,
                session,
                interval,
            })
        }

        (
            TimerState::Running {
                plan,
                session,
                interval,
            },
            Event::Tick,
        ) if !interval.is_paused() && interval.remaining(now) <= TimeDelta::zero() => {
            let notice = Notice::interval_done(interval.mode, session, plan.sessions());
            let state = match interval.mode {
                PomodoroMode::Work => start_break(plan, session, now),
                PomodoroMode::Break => {
                    let next = session + 1;
                    if next >= plan.sessions() {
                        TimerState::Complete { plan }
                    } else {
                        start_work(plan, next, now)
                    }
                }
            };
            Transition {
                state,
                effects: vec![Effect::Notify(notice)],
            }
        }

        (state, _) => Transition::stay(state),
    }
}

/// Drives `step` and dispatches its effects.
pub struct Timer<N> {
    state: TimerState,
    notifier: N,
    last_error: Option<ParseError>,
}

impl<N: Notifier> Timer<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            state: TimerState::Input,
            notifier,
            last_error: None,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[cfg(test)]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Why the last submit was rejected, if it was.
    pub fn last_error(&self) -> Option<&ParseError> {
        self.last_error.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.state == TimerState::Quit
    }

    /// Validate the input form and start the first work interval.
    pub fn submit(&mut self, work: &str, rest: &str, sessions: &str, now: DateTime<Local>) -> bool {
        if self.phase() != Phase::Input {
            return false;
        }
        self.apply(
            Event::Submit {
                work: work.to_string(),
                rest: rest.to_string(),
                sessions: sessions.to_string(),
            },
            now,
        );
        self.phase() == Phase::Work
    }

    /// Skip the input form with an already validated plan.
    pub fn start(&mut self, plan: SessionPlan, now: DateTime<Local>) {
        self.apply(Event::Start(plan), now);
    }

    pub fn toggle_pause(&mut self, now: DateTime<Local>) {
        self.apply(Event::TogglePause, now);
    }

    pub fn on_tick(&mut self, now: DateTime<Local>) {
        self.apply(Event::Tick, now);
    }

    pub fn quit(&mut self, now: DateTime<Local>) {
        self.apply(Event::Quit, now);
    }

    fn apply(&mut self, event: Event, now: DateTime<Local>) {
        let before = self.phase();
        let was_paused = self.state.interval().is_some_and(Interval::is_paused);
        let state = std::mem::replace(&mut self.state, TimerState::Quit);
        let transition = step(state, event, now);
        self.state = transition.state;

        for effect in transition.effects {
            match effect {
                Effect::Notify(notice) => {
                    info!("{}: {}", notice.title, notice.message);
                    self.notifier.notify(&notice.title, &notice.message);
                }
                Effect::Rejected(e) => {
                    debug!("Rejected session plan: {}", e);
                    self.last_error = Some(e);
                }
            }
        }

        let after = self.phase();
        if before != after {
            if after == Phase::Work {
                self.last_error = None;
            }
            info!(
                "[{}] {:?} -> {:?} (session {}/{})",
                now.format("%H:%M:%S"),
                before,
                after,
                self.state.session_number(),
                self.state.plan().map_or(0, SessionPlan::sessions)
            );
        } else {
            match self.state.interval() {
                Some(interval) if interval.is_paused() && !was_paused => {
                    debug!("Paused {:?}", after);
                }
                Some(interval) if !interval.is_paused() && was_paused => {
                    debug!(
                        "Resumed {:?}, {}s paused in total",
                        after,
                        interval.paused_total().num_seconds()
                    );
                }
                _ => {}
            }
        }
    }
}
