use chrono::Local;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod notify;
mod pomodoro;
mod tui;

use config::Config;
use notify::notifier::DesktopNotifier;
use pomodoro::pomodoro::Timer;
use tui::app::App;

/// The TUI owns the terminal, so logs go to an append-only file.
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pomo={}", config.log_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    if let Err(e) = init_logging(&config) {
        eprintln!("Logging disabled: {}", e);
    }

    let plan = match config.direct_plan() {
        Ok(plan) => plan,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let notifier = if config.silent {
        DesktopNotifier::new(None)
    } else {
        DesktopNotifier::default()
    };

    let mut app = App::new(Timer::new(notifier));
    if let Some(sessions) = config.sessions {
        app = app.with_sessions(sessions);
    }

    match plan {
        Some(plan) => {
            info!(
                "Starting {} sessions of {}s work / {}s break",
                plan.sessions(),
                plan.work().num_seconds(),
                plan.rest().num_seconds()
            );
            app.timer.start(plan, Local::now());
        }
        None => info!("Starting in interactive mode"),
    }

    if let Err(e) = tui::run(&mut app).await {
        error!("Error running program: {}", e);
        eprintln!("Error running program: {}", e);
        std::process::exit(1);
    }

    info!("Session ended at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}
