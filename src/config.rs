//! Command line flags and run configuration

use chrono::TimeDelta;
use clap::Parser;
use std::path::PathBuf;

use crate::error::{FlagError, ParseError};
use crate::pomodoro::duration;
use crate::pomodoro::session::SessionPlan;

const DEFAULT_SESSIONS: u32 = 4;

const AFTER_HELP: &str = r#"Usage:
  pomo                           Interactive mode
  pomo -t <duration> -b <duration> [-s <sessions>]

Examples:
  pomo                       # Interactive mode
  pomo -t 25m -b 5m          # 25min work, 5min break, 4 sessions
  pomo -t 1h -b 10m -s 2     # 1hour work, 10min break, 2 sessions
  pomo -t 45m -b 15m -s 6    # 45min work, 15min break, 6 sessions

Duration formats:
  - Minutes: 25m, 30m
  - Hours: 1h, 1h30m
  - Seconds: 90s, 300s
  - Just numbers default to minutes: 25 = 25m

Controls:
  - Tab/Arrow keys: Navigate inputs
  - Enter: Start timer
  - Space/P: Pause/Resume (during timer)
  - Q/Ctrl+C: Quit
"#;

/// 🍅 Pomodoro Timer
#[derive(Parser, Debug)]
#[command(name = "pomo")]
#[command(about = "🍅 Pomodoro Timer")]
#[command(version)]
#[command(after_help = AFTER_HELP)]
pub struct Config {
    /// Work session duration (e.g., 25m, 1h30m, 45s)
    #[arg(short = 't', long = "timer", value_name = "DURATION", allow_hyphen_values = true)]
    pub timer: Option<String>,

    /// Break duration (e.g., 5m, 10m)
    #[arg(short = 'b', long = "break", value_name = "DURATION", allow_hyphen_values = true)]
    pub rest: Option<String>,

    /// Number of sessions (default: 4)
    #[arg(
        short,
        long,
        value_name = "NUMBER",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub sessions: Option<u32>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log file location
    #[arg(short, long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Skip the sound cue when an interval ends
    #[arg(long)]
    pub silent: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn sessions(&self) -> u32 {
        self.sessions.unwrap_or(DEFAULT_SESSIONS)
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pomo")
                .join("pomo.log")
        })
    }

    /// The plan to start with when both durations were given on the command line.
    pub fn direct_plan(&self) -> Result<Option<SessionPlan>, FlagError> {
        let (Some(timer), Some(rest)) = (&self.timer, &self.rest) else {
            return Ok(None);
        };

        let work = duration::parse(timer).map_err(FlagError::Timer)?;
        let rest = duration::parse(rest).map_err(FlagError::Break)?;
        if work <= TimeDelta::zero() {
            return Err(FlagError::Timer(ParseError::ZeroDuration("work")));
        }
        if rest <= TimeDelta::zero() {
            return Err(FlagError::Break(ParseError::ZeroDuration("break")));
        }

        let plan = SessionPlan::new(work, rest, self.sessions()).map_err(FlagError::Timer)?;
        Ok(Some(plan))
    }
}
