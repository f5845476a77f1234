//! Session plan: the validated work/break/sessions triple for one run.

use chrono::TimeDelta;

use crate::error::ParseError;
use crate::pomodoro::duration;

pub const DEFAULT_WORK: &str = "25m";
pub const DEFAULT_BREAK: &str = "5m";
pub const DEFAULT_SESSIONS: &str = "4";

/// Work/break lengths and session count. Immutable once a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPlan {
    work: TimeDelta,
    rest: TimeDelta,
    sessions: u32,
}

impl SessionPlan {
    pub fn new(work: TimeDelta, rest: TimeDelta, sessions: u32) -> Result<Self, ParseError> {
        if work <= TimeDelta::zero() {
            return Err(ParseError::ZeroDuration("work"));
        }
        if rest <= TimeDelta::zero() {
            return Err(ParseError::ZeroDuration("break"));
        }
        if sessions == 0 {
            return Err(ParseError::InvalidSessions(sessions.to_string()));
        }
        Ok(Self {
            work,
            rest,
            sessions,
        })
    }

    /// Build a plan from form text, substituting defaults for blank fields.
    pub fn from_form(work: &str, rest: &str, sessions: &str) -> Result<Self, ParseError> {
        let work = duration::parse(or_default(work, DEFAULT_WORK))?;
        let rest = duration::parse(or_default(rest, DEFAULT_BREAK))?;
        let sessions = parse_sessions(or_default(sessions, DEFAULT_SESSIONS))?;
        Self::new(work, rest, sessions)
    }

    pub fn work(&self) -> TimeDelta {
        self.work
    }

    pub fn rest(&self) -> TimeDelta {
        self.rest
    }

    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    /// Focus time across the whole run.
    pub fn total_work(&self) -> TimeDelta {
        scale(self.work, self.sessions)
    }

    /// Break time across the whole run, not counting the final break.
    pub fn total_rest(&self) -> TimeDelta {
        scale(self.rest, self.sessions - 1)
    }
}

fn scale(span: TimeDelta, times: u32) -> TimeDelta {
    i32::try_from(times)
        .ok()
        .and_then(|n| span.checked_mul(n))
        .unwrap_or(TimeDelta::MAX)
}

fn or_default<'a>(text: &'a str, default: &'a str) -> &'a str {
    if text.trim().is_empty() {
        default
    } else {
        text
    }
}

fn parse_sessions(text: &str) -> Result<u32, ParseError> {
    let trimmed = text.trim();
    match trimmed.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::InvalidSessions(trimmed.to_string())),
    }
}
