//! Rendering for the workout planner TUI.

use alphagain::pipeline::GenerationResult;
use alphagain::session::{HistoryEntry, SessionHistory};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{ActivePane, App, FormField};
use crate::logs::{LogLevel, LogLine};

// Public utilities

/// Truncate a string to at most `max` characters, appending "..." if
/// truncated.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Colour for a log level's label. Errors are also bold.
pub fn log_level_style(level: LogLevel) -> Style {
    let colour = match level {
        LogLevel::Trace => Color::DarkGray,
        LogLevel::Debug => Color::Cyan,
        LogLevel::Info => Color::Green,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Error => Color::Red,
    };
    let style = Style::new().fg(colour);
    if level == LogLevel::Error {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

/// One-line summary of a history entry for the history list.
pub fn entry_summary(entry: &HistoryEntry) -> String {
    let time = entry
        .timestamp
        .split_once(' ')
        .map_or(entry.timestamp.as_str(), |(_, t)| t);
    let mark = if entry.result.is_success() { "ok " } else { "err" };
    format!(
        "{time} {mark} {} / {} / {} min",
        entry.request.fitness_level(),
        entry.request.goal(),
        entry.request.duration_minutes()
    )
}

fn border_style(app: &App, pane: ActivePane) -> Style {
    if app.active_pane == pane {
        Style::new().fg(Color::Cyan)
    } else {
        Style::new().fg(Color::DarkGray)
    }
}

fn inner_height(area: Rect) -> usize {
    usize::from(area.height.saturating_sub(2))
}

/// Screen rows a borderless, wrapped `body` needs inside a bordered `area`.
/// Scroll offsets count these rows, not logical lines.
fn wrapped_rows(body: &Paragraph, area: Rect) -> usize {
    body.line_count(area.width.saturating_sub(2))
}

fn to_row(offset: usize) -> u16 {
    u16::try_from(offset).unwrap_or(u16::MAX)
}

// Root render

pub(crate) fn render(frame: &mut Frame, app: &App, history: &SessionHistory) {
    let area = frame.area();

    let mut constraints = vec![Constraint::Length(3), Constraint::Min(10)];
    if app.show_logs {
        constraints.push(Constraint::Percentage(30));
    }
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_status(frame, chunks[0], app, history);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(20)])
        .split(chunks[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FormField::ALL.len() as u16 + 2),
            Constraint::Min(3),
        ])
        .split(middle[0]);

    render_form(frame, left[0], app);
    render_history(frame, left[1], app, history);
    render_plan(frame, middle[1], app, history);

    if app.show_logs {
        render_logs(frame, chunks[2], &app.logs, app);
    }
    render_hints(frame, chunks[chunks.len() - 1], app);
}

// Status pane

fn render_status(frame: &mut Frame, area: Rect, app: &App, history: &SessionHistory) {
    let line = Line::from(vec![
        Span::styled("Model: ", Style::new().fg(Color::DarkGray)),
        Span::raw(app.model.clone()),
        Span::raw("   "),
        Span::styled("Session: ", Style::new().fg(Color::DarkGray)),
        Span::raw(app.session_id.clone()),
        Span::raw("   "),
        Span::styled("Plans: ", Style::new().fg(Color::DarkGray)),
        Span::styled(
            format!("{}/{}", history.success_count(), history.len()),
            Style::new().fg(Color::Cyan),
        ),
    ]);

    let title = if app.busy {
        " AlphaGain [generating] "
    } else {
        " AlphaGain "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::Blue))
        .title(title);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

// Form pane

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.active_pane == ActivePane::Form;

    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let focused = editing && field == app.form.focused();
            let marker = if focused { "> " } else { "  " };
            let value_style = if focused {
                Style::new()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::new().fg(Color::White)
            };
            let value = if focused {
                format!("< {} >", app.form.value(field))
            } else {
                format!("  {}", app.form.value(field))
            };
            Line::from(vec![
                Span::styled(marker, value_style),
                Span::styled(
                    format!("{:<14}", field.label()),
                    Style::new().fg(Color::DarkGray),
                ),
                Span::styled(value, value_style),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, ActivePane::Form))
        .title(" Your Profile ");

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// History pane

fn render_history(frame: &mut Frame, area: Rect, app: &App, history: &SessionHistory) {
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = history
        .all()
        .iter()
        .map(|entry| {
            let style = if entry.result.is_success() {
                Style::new().fg(Color::White)
            } else {
                Style::new().fg(Color::Red)
            };
            ListItem::new(Span::styled(truncate_str(&entry_summary(entry), width), style))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, ActivePane::History))
        .title(format!(" History ({}) ", history.len()));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::new().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(app.selected);
    frame.render_stateful_widget(list, area, &mut state);
}

// Plan pane

fn plan_lines(entry: &HistoryEntry) -> Vec<Line<'_>> {
    let mut lines: Vec<Line> = entry
        .request
        .parameters()
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label}: "), Style::new().fg(Color::DarkGray)),
                Span::raw(value),
            ])
        })
        .collect();
    lines.push(Line::from(""));

    match &entry.result {
        GenerationResult::Success { text } => {
            lines.extend(text.lines().map(|l| Line::from(Span::raw(l))));
        }
        GenerationResult::Failure { message } => {
            let style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
            lines.extend(message.lines().map(|l| Line::from(Span::styled(l, style))));
        }
    }
    lines
}

fn render_plan(frame: &mut Frame, area: Rect, app: &App, history: &SessionHistory) {
    let entry = app.selected.and_then(|i| history.get(i));

    let (lines, title) = match entry {
        Some(entry) => (
            plan_lines(entry),
            format!(" Workout Plan ({}) ", entry.timestamp),
        ),
        None => (
            vec![Line::from(Span::styled(
                "Fill in your profile and press [Enter] to generate a plan.",
                Style::new().fg(Color::DarkGray),
            ))],
            " Workout Plan ".to_string(),
        ),
    };

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    let max_scroll = wrapped_rows(&body, area).saturating_sub(inner_height(area));
    let scroll = app.plan_scroll.min(max_scroll);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, ActivePane::Plan))
        .title(title);

    frame.render_widget(body.block(block).scroll((to_row(scroll), 0)), area);
}

// Log pane

fn log_line(log: &LogLine) -> Line<'_> {
    Line::from(vec![
        Span::styled(format!("{} ", log.time), Style::new().fg(Color::DarkGray)),
        Span::styled(format!("{} ", log.level.label()), log_level_style(log.level)),
        Span::raw(log.message.as_str()),
    ])
}

fn render_logs(frame: &mut Frame, area: Rect, logs: &[LogLine], app: &App) {
    // Debug and trace lines only go to the log file.
    let lines: Vec<Line> = logs
        .iter()
        .filter(|log| log.level >= LogLevel::Info)
        .map(log_line)
        .collect();

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    let rows = wrapped_rows(&body, area);
    let top = rows.saturating_sub(inner_height(area) + app.log_scroll.min(rows));

    let block = Block::bordered()
        .border_style(border_style(app, ActivePane::Log))
        .title(" Log ");
    frame.render_widget(body.block(block).scroll((to_row(top), 0)), area);
}

// Hint bar

fn render_hints(frame: &mut Frame, area: Rect, app: &App) {
    let (text, style) = if let Some(ref msg) = app.status_message {
        (msg.clone(), Style::new().fg(Color::Yellow))
    } else {
        let pane_keys = match app.active_pane {
            ActivePane::Form => "[Up/Down] field  [Left/Right] change",
            ActivePane::History => "[Up/Down] select",
            ActivePane::Plan | ActivePane::Log => "[Up/Down] scroll",
        };
        (
            format!(
                "{pane_keys}  [Enter] generate  [p] PDF  [m] Markdown  [Tab] pane  [,] logs  [q] quit"
            ),
            Style::new().fg(Color::DarkGray),
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(Span::styled(text, style)).block(block), area);
}
