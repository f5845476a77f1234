//! UI rendering

use chrono::{DateTime, Local};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
};

use crate::notify::notifier::Notifier;
use crate::pomodoro::duration;
use crate::pomodoro::pomodoro::{Interval, PomodoroMode, TimerState};
use crate::pomodoro::session::SessionPlan;
use crate::tui::app::{App, Field};

const RED: Color = Color::Rgb(0xFF, 0x6B, 0x6B);
const TEAL: Color = Color::Rgb(0x4E, 0xCD, 0xC4);
const YELLOW: Color = Color::Rgb(0xFF, 0xE6, 0x6D);
const SALMON: Color = Color::Rgb(0xFF, 0xA0, 0x7A);
const MINT: Color = Color::Rgb(0x95, 0xE1, 0xD3);
const PALE_GREEN: Color = Color::Rgb(0xA8, 0xE6, 0xCF);

/// Width shared by the input fields and the progress gauge.
const CONTENT_WIDTH: u16 = 50;

/// Main draw function
pub fn draw<N: Notifier>(f: &mut Frame, app: &App<N>, now: DateTime<Local>) {
    let area = f.area();
    match app.timer.state() {
        TimerState::Input => draw_input(f, app, area),
        TimerState::Running {
            plan,
            session,
            interval,
        } => draw_timer(f, plan, *session, interval, now, area),
        TimerState::Complete { plan } => draw_complete(f, plan, area),
        TimerState::Quit => {}
    }
}

fn title(text: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(RED).add_modifier(Modifier::BOLD),
    )))
}

fn help(text: &str) -> Paragraph<'_> {
    Paragraph::new(text).style(Style::default().fg(PALE_GREEN))
}

fn draw_input<N: Notifier>(f: &mut Frame, app: &App<N>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // Work
            Constraint::Length(3), // Break
            Constraint::Length(3), // Sessions
            Constraint::Length(1), // Error
            Constraint::Min(2),    // Help
        ])
        .split(area);

    f.render_widget(title("🍅 Pomodoro Timer Setup"), chunks[0]);

    for (field, chunk) in Field::ALL.into_iter().zip(&chunks[1..4]) {
        draw_field(f, app, field, *chunk);
    }

    if let Some(err) = app.timer.last_error() {
        let line = Paragraph::new(format!("⚠ {}", err)).style(Style::default().fg(Color::Red));
        f.render_widget(line, chunks[4]);
    }

    f.render_widget(
        help("Tab/↑↓: Navigate • Enter: Start • Ctrl+C: Quit\nFormat: 25m, 1h30m, 90s"),
        chunks[5],
    );
}

fn draw_field<N: Notifier>(f: &mut Frame, app: &App<N>, field: Field, area: Rect) {
    let is_focused = app.focused == field;
    let border_color = if is_focused { RED } else { TEAL };
    let value = app.value(field);

    let mut spans = vec![Span::raw(format!("{}: ", field.label()))];
    if value.is_empty() {
        spans.push(Span::styled(
            field.placeholder(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(value));
    }
    if is_focused {
        spans.push(Span::styled("█", Style::default().fg(RED)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let width = area.width.min(CONTENT_WIDTH);
    let area = Rect { width, ..area };
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_timer(
    f: &mut Frame,
    plan: &SessionPlan,
    session: u32,
    interval: &Interval,
    now: DateTime<Local>,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(2), // Session counter
            Constraint::Length(1), // Gauge
            Constraint::Length(3), // Remaining
            Constraint::Min(1),    // Help
        ])
        .split(area);

    let (heading, emoji) = match interval.mode() {
        PomodoroMode::Work => ("🍅 Focus Time", "💪"),
        PomodoroMode::Break => ("☕ Break Time", "🛋"),
    };

    f.render_widget(title(heading).alignment(Alignment::Center), chunks[0]);

    let counter = Paragraph::new(format!("Session {} of {}", session + 1, plan.sessions()))
        .style(Style::default().fg(MINT))
        .alignment(Alignment::Center);
    f.render_widget(counter, chunks[1]);

    let ratio = interval.progress(now);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(RED).bg(Color::DarkGray))
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    f.render_widget(gauge, centered(chunks[2], CONTENT_WIDTH));

    let remaining = duration::format(interval.remaining(now));
    let status = if interval.is_paused() {
        Span::styled(
            format!("⏸ PAUSED - {} remaining", remaining),
            Style::default().fg(SALMON).bold(),
        )
    } else {
        Span::styled(
            format!("{} {} remaining", emoji, remaining),
            Style::default().fg(YELLOW).bold(),
        )
    };
    let status =
        Paragraph::new(vec![Line::raw(""), Line::from(status)]).alignment(Alignment::Center);
    f.render_widget(status, chunks[3]);

    f.render_widget(
        help(&format!(
            "{} {} • Space/P: Pause/Resume • Q: Quit",
            interval.mode().emoji(),
            interval.mode().as_str()
        ))
        .alignment(Alignment::Center),
        chunks[4],
    );
}

fn draw_complete(f: &mut Frame, plan: &SessionPlan, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(4), // Stats
            Constraint::Min(1),    // Help
        ])
        .split(area);

    f.render_widget(
        title("🎉 Pomodoro Session Complete!").alignment(Alignment::Center),
        chunks[0],
    );

    let stats = Paragraph::new(vec![
        Line::raw(format!("Completed {} sessions", plan.sessions())),
        Line::raw(format!(
            "Total focus time: {}",
            duration::format(plan.total_work())
        )),
        Line::raw(format!(
            "Total break time: {}",
            duration::format(plan.total_rest())
        )),
    ])
    .style(Style::default().fg(YELLOW).add_modifier(Modifier::BOLD))
    .alignment(Alignment::Center);
    f.render_widget(stats, chunks[1]);

    f.render_widget(help("Q: Quit").alignment(Alignment::Center), chunks[2]);
}

/// Horizontally centre a strip of at most `width` columns.
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::notifier::RecordingNotifier;
    use crate::pomodoro::pomodoro::Timer;
    use chrono::TimeDelta;
    use ratatui::{Terminal, backend::TestBackend};

    fn now() -> DateTime<Local> {
        DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .with_timezone(&Local)
    }

    fn render(app: &App<RecordingNotifier>, at: DateTime<Local>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 20)).unwrap();
        terminal.draw(|f| draw(f, app, at)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn started(work: &str, rest: &str, sessions: &str) -> App<RecordingNotifier> {
        let mut timer = Timer::new(RecordingNotifier::default());
        assert!(timer.submit(work, rest, sessions, now()));
        App::new(timer)
    }

    #[test]
    fn test_input_view() {
        let app = App::new(Timer::new(RecordingNotifier::default()));
        let screen = render(&app, now());
        assert!(screen.contains("Work Duration: 25m"));
        assert!(screen.contains("Break Duration: 5m"));
        assert!(screen.contains("Sessions: 4"));
    }

    #[test]
    fn test_input_view_shows_rejection() {
        let mut timer = Timer::new(RecordingNotifier::default());
        assert!(!timer.submit("abc", "", "", now()));
        let screen = render(&App::new(timer), now());
        assert!(screen.contains("invalid duration"));
    }

    #[test]
    fn test_timer_view() {
        let app = started("25m", "5m", "4");
        let screen = render(&app, now() + TimeDelta::minutes(5));
        assert!(screen.contains("Session 1 of 4"));
        assert!(screen.contains("20:00 remaining"));
        assert!(screen.contains("20%"));
    }

    #[test]
    fn test_paused_view() {
        let mut app = started("25m", "5m", "4");
        app.timer.toggle_pause(now() + TimeDelta::minutes(1));
        let screen = render(&app, now() + TimeDelta::minutes(30));
        assert!(screen.contains("PAUSED - 24:00 remaining"));
    }

    #[test]
    fn test_complete_view() {
        let mut app = started("1m", "1m", "2");
        for minute in 1..=4 {
            app.on_tick(now() + TimeDelta::minutes(minute));
        }
        let screen = render(&app, now() + TimeDelta::minutes(4));
        assert!(screen.contains("Completed 2 sessions"));
        assert!(screen.contains("Total focus time: 02:00"));
        assert!(screen.contains("Total break time: 01:00"));
    }

    #[test]
    fn test_centered() {
        let area = Rect::new(0, 0, 70, 1);
        assert_eq!(centered(area, 50), Rect::new(10, 0, 50, 1));
        assert_eq!(centered(Rect::new(2, 0, 20, 1), 50), Rect::new(2, 0, 20, 1));
    }
}
