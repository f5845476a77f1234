use thiserror::Error;

/// Rejected duration or session text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty duration")]
    Empty,

    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),

    #[error("duration out of range: {0:?}")]
    OutOfRange(String),

    #[error("invalid session count: {0:?}")]
    InvalidSessions(String),

    #[error("{0} duration must be greater than zero")]
    ZeroDuration(&'static str),
}

/// A duration passed on the command line that cannot start a run.
#[derive(Debug, Error)]
pub enum FlagError {
    #[error("Error parsing timer duration: {0}")]
    Timer(#[source] ParseError),

    #[error("Error parsing break duration: {0}")]
    Break(#[source] ParseError),
}
