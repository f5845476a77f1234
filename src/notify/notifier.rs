use notify_rust::Notification;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

pub const DEFAULT_SOUND: &str = "/usr/share/sounds/alsa/Front_Left.wav";
const SOUND_PLAYER: &str = "paplay";
const NOTIFICATION_TIMEOUT_MS: i32 = 5000;

/// Receives interval-complete alerts. Delivery is best effort.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str);
}

/// Desktop alert plus an audible cue, delivered off the caller's thread.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    sound: Option<PathBuf>,
}

impl DesktopNotifier {
    pub fn new(sound: Option<PathBuf>) -> Self {
        Self { sound }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new(Some(PathBuf::from(DEFAULT_SOUND)))
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) {
        let title = title.to_string();
        let message = message.to_string();
        let sound = self.sound.clone();
        let job = move || deliver(&title, &message, sound.as_deref());

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => {
                std::thread::spawn(job);
            }
        }
    }
}

fn deliver(title: &str, message: &str, sound: Option<&Path>) {
    if let Err(e) = send_notification(title, message) {
        warn!("Failed to send notification: {}", e);
    }
    if let Some(sound) = sound {
        if let Err(e) = play_sound(sound) {
            debug!("Failed to play {}: {}", sound.display(), e);
        }
    }
}

fn send_notification(title: &str, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    Notification::new()
        .summary(title)
        .body(message)
        .timeout(NOTIFICATION_TIMEOUT_MS)
        .show()?;
    Ok(())
}

fn play_sound(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let status = Command::new(SOUND_PLAYER)
        .arg(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    if !status.success() {
        return Err(format!("{} exited with {}", SOUND_PLAYER, status).into());
    }
    Ok(())
}

/// Keeps every alert in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: std::cell::RefCell<Vec<(String, String)>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.borrow().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.sent
            .borrow_mut()
            .push((title.to_string(), message.to_string()));
    }
}
