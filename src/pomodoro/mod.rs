pub mod duration;
pub mod pomodoro;
pub mod session;
