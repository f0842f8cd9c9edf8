//! Interactive terminal workout planner.
//!
//! Renders a request form, the session's history, the selected plan, and
//! an optional log pane (ratatui + crossterm). Generation runs through an
//! [`alphagain::Session`] owned by the caller; the UI blocks on each
//! request after showing a "generating" status, so there is never more
//! than one request in flight.
//!
//! # Quick start
//!
//! ```ignore
//! use alphagain::prelude::*;
//! use alphagain_tui::{TuiConfig, run_tui};
//!
//! let config = AppConfig::from_env()?;
//! let runtime = tokio::runtime::Runtime::new()?;
//! let client = GeminiClient::from_config(&config)?;
//! let mut session = Session::new(WorkoutPipeline::new(client));
//! run_tui(&mut session, &runtime, &TuiConfig::default())?;
//! let history = session.end();
//! ```

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use alphagain::api::GenerationClient;
use alphagain::api::gemini::DEFAULT_MODEL;
use alphagain::export::{self, DocumentFormat};
use alphagain::session::{Session, SessionHistory};
use crossterm::event::{self, Event};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute};
use ratatui::prelude::*;
use tokio::runtime::Runtime;
use tracing::warn;

mod app;
mod input;
pub mod logs;
mod render;

pub use logs::{LogBuffer, LogLevel, LogLine, UiTracingLayer};
pub use render::{entry_summary, log_level_style, truncate_str};

use app::App;
use input::{Command, handle_key_event};
use render::render;

/// What the UI needs besides the session itself.
pub struct TuiConfig {
    /// Model name shown in the status bar.
    pub model: String,
    /// Directory exported documents are written to.
    pub export_dir: PathBuf,
    /// Optional log buffer from the tracing layer, drained once per frame
    /// into the log pane.
    pub log_buffer: Option<LogBuffer>,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            export_dir: PathBuf::from("."),
            log_buffer: None,
        }
    }
}

/// Run the TUI event loop (blocking) until the user quits.
///
/// Must not be called from inside an async context: generation requests
/// are driven with [`Runtime::block_on`].
pub fn run_tui<C: GenerationClient>(
    session: &mut Session<C>,
    runtime: &Runtime,
    config: &TuiConfig,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut app = App::new(config.model.clone(), session.id());

    let result = event_loop(&mut terminal, &mut app, session, runtime, config);

    // Put the terminal back even if the loop failed.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend, C: GenerationClient>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    session: &mut Session<C>,
    runtime: &Runtime,
    config: &TuiConfig,
) -> io::Result<()> {
    loop {
        if app.should_quit {
            return Ok(());
        }

        if let Some(ref log_buf) = config.log_buffer {
            app.push_logs(log_buf.drain());
        }

        terminal.draw(|frame| render(frame, app, session.history()))?;

        // Redraw at least every 100ms so new log lines show up.
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            let command = handle_key_event(key, app, session.history().len());
            match command {
                Some(Command::Generate) => {
                    generate(terminal, app, session, runtime)?;
                }
                Some(Command::Export(format)) => {
                    export_selected(app, session.history(), format, config);
                }
                None => {}
            }
        }
    }
}

/// Run one request through the session, showing a busy status meanwhile.
fn generate<B: Backend, C: GenerationClient>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    session: &mut Session<C>,
    runtime: &Runtime,
) -> io::Result<()> {
    let request = match app.form.to_request() {
        Ok(request) => request,
        Err(e) => {
            app.status_message = Some(format!("Invalid input: {e}"));
            return Ok(());
        }
    };

    app.busy = true;
    app.status_message = Some("Generating your workout plan...".into());
    terminal.draw(|frame| render(frame, app, session.history()))?;

    let succeeded = runtime
        .block_on(session.generate(request))
        .result
        .is_success();

    app.busy = false;
    app.select(session.history().len() - 1);
    app.status_message = Some(if succeeded {
        "Workout plan ready. [p] PDF  [m] Markdown to save it.".into()
    } else {
        "Generation failed; see the plan pane for details.".into()
    });
    Ok(())
}

fn export_selected(
    app: &mut App,
    history: &SessionHistory,
    format: DocumentFormat,
    config: &TuiConfig,
) {
    let Some(entry) = app.selected.and_then(|i| history.get(i)) else {
        app.status_message = Some("Nothing to export yet. Generate a plan first.".into());
        return;
    };

    let saved = export::export(&entry.result, &entry.request, format)
        .and_then(|doc| export::write_document(&doc, &config.export_dir));
    app.status_message = Some(match saved {
        Ok(path) => format!("Saved {}", path.display()),
        Err(e) => {
            warn!("Export failed: {e}");
            format!("Export failed: {e}")
        }
    });
}
