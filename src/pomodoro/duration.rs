//! Duration text parsing and display
//!
//! Accepts minute counts ("25", "+5") and compound unit expressions with an
//! optional sign ("1h30m", "90s", "-5m", ".5h", "1.h", "250ms", "500us").
//! Results are signed; rejecting non-positive lengths is up to the caller.

use chrono::TimeDelta;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;

static MINUTES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?\d+$").expect("valid minutes regex"));

static COMPOUND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([-+]?)((?:(?:\d+\.?\d*|\.\d+)(?:ns|us|µs|μs|ms|s|m|h))+)$")
        .expect("valid duration regex")
});

static COMPONENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+\.?\d*|\.\d+)(ns|us|µs|μs|ms|s|m|h)").expect("valid component regex")
});

const NANOS_PER_MICRO: f64 = 1_000.0;
const NANOS_PER_MILLI: f64 = 1_000.0 * NANOS_PER_MICRO;
const NANOS_PER_SECOND: f64 = 1_000.0 * NANOS_PER_MILLI;
const NANOS_PER_MINUTE: f64 = 60.0 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: f64 = 60.0 * NANOS_PER_MINUTE;

/// Parse user supplied duration text. Plain integers are minutes.
pub fn parse(text: &str) -> Result<TimeDelta, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    if MINUTES_RE.is_match(trimmed) {
        let minutes: i64 = trimmed
            .parse()
            .map_err(|_| ParseError::OutOfRange(trimmed.to_string()))?;
        return TimeDelta::try_minutes(minutes)
            .ok_or_else(|| ParseError::OutOfRange(trimmed.to_string()));
    }

    let Some(caps) = COMPOUND_RE.captures(trimmed) else {
        return Err(ParseError::InvalidDuration(trimmed.to_string()));
    };
    let negative = &caps[1] == "-";

    let mut total = TimeDelta::zero();
    for component in COMPONENT_RE.captures_iter(&caps[2]) {
        let value: f64 = component[1]
            .parse()
            .map_err(|_| ParseError::InvalidDuration(trimmed.to_string()))?;
        let unit = match &component[2] {
            "h" => NANOS_PER_HOUR,
            "m" => NANOS_PER_MINUTE,
            "s" => NANOS_PER_SECOND,
            "ms" => NANOS_PER_MILLI,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ns" => 1.0,
            _ => return Err(ParseError::InvalidDuration(trimmed.to_string())),
        };

        let nanos = (value * unit).round();
        if !nanos.is_finite() || nanos >= i64::MAX as f64 {
            return Err(ParseError::OutOfRange(trimmed.to_string()));
        }
        total = total
            .checked_add(&TimeDelta::nanoseconds(nanos as i64))
            .ok_or_else(|| ParseError::OutOfRange(trimmed.to_string()))?;
    }

    Ok(if negative { -total } else { total })
}

/// Render a span as `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format(span: TimeDelta) -> String {
    if span < TimeDelta::zero() {
        return "0s".to_string();
    }

    let total = span.num_seconds();
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
