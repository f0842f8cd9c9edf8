//! Key handling for the workout planner TUI.

use alphagain::export::DocumentFormat;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{ActivePane, App};

/// Work the event loop must do in response to a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Build a request from the form and generate a plan.
    Generate,
    /// Save the selected history entry.
    Export(DocumentFormat),
}

/// Apply `key` to `app`. `history_len` bounds the history selection.
pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App, history_len: usize) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    // Ctrl+C always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return None;
    }

    app.status_message = None;

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return None;
        }
        KeyCode::Enter => return Some(Command::Generate),
        KeyCode::Char('p') => return Some(Command::Export(DocumentFormat::Pdf)),
        KeyCode::Char('m') => return Some(Command::Export(DocumentFormat::Markdown)),
        KeyCode::Char(',') => {
            app.show_logs = !app.show_logs;
            if app.show_logs {
                app.active_pane = ActivePane::Log;
            } else if app.active_pane == ActivePane::Log {
                app.active_pane = ActivePane::Form;
            }
            return None;
        }
        KeyCode::Tab => {
            app.cycle_pane(true);
            return None;
        }
        KeyCode::BackTab => {
            app.cycle_pane(false);
            return None;
        }
        _ => {}
    }

    match app.active_pane {
        ActivePane::Form => handle_form_key(key, app),
        ActivePane::History => handle_history_key(key, app, history_len),
        ActivePane::Plan => handle_plan_key(key, app),
        ActivePane::Log => handle_log_key(key, app),
    }
    None
}

fn handle_form_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.form.focus_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.form.focus_next(),
        KeyCode::Left | KeyCode::Char('h') => app.form.adjust(false),
        KeyCode::Right | KeyCode::Char('l') => app.form.adjust(true),
        _ => {}
    }
}

fn handle_history_key(key: KeyEvent, app: &mut App, history_len: usize) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(false, history_len),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(true, history_len),
        KeyCode::Home if history_len > 0 => app.select(0),
        KeyCode::End if history_len > 0 => app.select(history_len - 1),
        _ => {}
    }
}

fn handle_plan_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.plan_scroll = app.plan_scroll.saturating_sub(3),
        KeyCode::Down | KeyCode::Char('j') => app.plan_scroll = app.plan_scroll.saturating_add(3),
        KeyCode::PageUp => app.plan_scroll = app.plan_scroll.saturating_sub(20),
        KeyCode::PageDown => app.plan_scroll = app.plan_scroll.saturating_add(20),
        KeyCode::Home => app.plan_scroll = 0,
        _ => {}
    }
}

fn handle_log_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.log_scroll = app.log_scroll.saturating_add(3),
        KeyCode::Down | KeyCode::Char('j') => app.log_scroll = app.log_scroll.saturating_sub(3),
        KeyCode::PageUp => app.log_scroll = app.log_scroll.saturating_add(20),
        KeyCode::PageDown => app.log_scroll = app.log_scroll.saturating_sub(20),
        KeyCode::End => app.log_scroll = 0, // follow tail
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FormField;
    use alphagain::request::{FitnessLevel, Goal};

    fn press(app: &mut App, code: KeyCode) -> Option<Command> {
        handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), app, 0)
    }

    #[test]
    fn quit_keys() {
        let mut app = App::new("m", "s");
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = App::new("m", "s");
        handle_key_event(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut app,
            0,
        );
        assert!(app.should_quit);
    }

    #[test]
    fn enter_and_export_keys_produce_commands() {
        let mut app = App::new("m", "s");
        assert_eq!(press(&mut app, KeyCode::Enter), Some(Command::Generate));
        assert_eq!(
            press(&mut app, KeyCode::Char('p')),
            Some(Command::Export(DocumentFormat::Pdf))
        );
        assert_eq!(
            press(&mut app, KeyCode::Char('m')),
            Some(Command::Export(DocumentFormat::Markdown))
        );
    }

    #[test]
    fn arrows_edit_the_form() {
        let mut app = App::new("m", "s");
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.fitness_level, FitnessLevel::Intermediate);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.form.focused(), FormField::Goal);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.goal, Goal::MuscleGain);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.form.focused(), FormField::Equipment);
    }

    #[test]
    fn history_pane_moves_selection() {
        let mut app = App::new("m", "s");
        app.active_pane = ActivePane::History;
        handle_key_event(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE), &mut app, 3);
        assert_eq!(app.selected, Some(2));
        handle_key_event(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE), &mut app, 3);
        assert_eq!(app.selected, Some(1));
        handle_key_event(KeyEvent::new(KeyCode::Home, KeyModifiers::NONE), &mut app, 3);
        assert_eq!(app.selected, Some(0));
        // Form untouched.
        assert_eq!(app.form.fitness_level, FitnessLevel::Beginner);
    }

    #[test]
    fn plan_and_log_scroll() {
        let mut app = App::new("m", "s");
        app.active_pane = ActivePane::Plan;
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.plan_scroll, 23);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.plan_scroll, 0);

        press(&mut app, KeyCode::Char(','));
        assert!(app.show_logs);
        assert_eq!(app.active_pane, ActivePane::Log);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.log_scroll, 3);
        press(&mut app, KeyCode::End);
        assert_eq!(app.log_scroll, 0);
    }

    #[test]
    fn hiding_logs_moves_focus_off_the_log_pane() {
        let mut app = App::new("m", "s");
        press(&mut app, KeyCode::Char(','));
        press(&mut app, KeyCode::Char(','));
        assert!(!app.show_logs);
        assert_eq!(app.active_pane, ActivePane::Form);
    }

    #[test]
    fn tab_cycles_panes() {
        let mut app = App::new("m", "s");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_pane, ActivePane::History);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_pane, ActivePane::Plan);
    }

    #[test]
    fn any_key_clears_the_status_message() {
        let mut app = App::new("m", "s");
        app.status_message = Some("Saved".into());
        press(&mut app, KeyCode::Down);
        assert!(app.status_message.is_none());
    }
}
