//! Log pane feed.
//!
//! [`UiTracingLayer`] turns each tracing event into a [`LogLine`] and parks
//! it in a [`LogBuffer`]. The UI thread collects whatever has piled up once
//! per frame, so emitting an event never touches the terminal.

use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Once this many lines are held, the oldest are discarded.
pub const MAX_LOG_LINES: usize = 2000;
/// Lines left after discarding.
pub const LOG_TRIM_TO: usize = 1200;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    /// `HH:MM:SS`, local time.
    pub time: String,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Five-column label, so messages line up in the pane.
    pub fn label(self) -> &'static str {
        const LABELS: [&str; 5] = ["TRACE", "DEBUG", "INFO ", "WARN ", "ERROR"];
        LABELS[self as usize]
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::ERROR {
            Self::Error
        } else if level == tracing::Level::WARN {
            Self::Warn
        } else if level == tracing::Level::INFO {
            Self::Info
        } else if level == tracing::Level::DEBUG {
            Self::Debug
        } else {
            Self::Trace
        }
    }
}

/// Keep only the newest [`LOG_TRIM_TO`] lines once `lines` outgrows
/// [`MAX_LOG_LINES`].
pub fn trim_logs(lines: &mut Vec<LogLine>) {
    if lines.len() <= MAX_LOG_LINES {
        return;
    }
    let keep_from = lines.len() - LOG_TRIM_TO;
    lines.drain(..keep_from);
}

/// Lines captured since the last [`drain`](Self::drain). Cloning shares
/// the same storage.
#[derive(Clone, Default)]
pub struct LogBuffer {
    pending: Arc<Mutex<Vec<LogLine>>>,
}

impl LogBuffer {
    /// Take every pending line, oldest first.
    pub fn drain(&self) -> Vec<LogLine> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *pending)
    }

    fn push(&self, line: LogLine) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.push(line);
        trim_logs(&mut pending);
    }
}

/// Tracing layer feeding a [`LogBuffer`].
pub struct UiTracingLayer {
    sink: LogBuffer,
}

impl UiTracingLayer {
    /// The layer to install, plus the buffer the UI should drain.
    pub fn new() -> (Self, LogBuffer) {
        let sink = LogBuffer::default();
        let reader = sink.clone();
        (Self { sink }, reader)
    }
}

impl<S> Layer<S> for UiTracingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = LineBuilder::default();
        event.record(&mut line);

        self.sink.push(LogLine {
            time: Local::now().format("%H:%M:%S").to_string(),
            level: (*event.metadata().level()).into(),
            message: line.finish(),
        });
    }
}

/// Collects the `message` field verbatim and the remaining fields as
/// `key=value` pairs.
#[derive(Default)]
struct LineBuilder {
    message: String,
    fields: String,
}

impl LineBuilder {
    fn add(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if field.name() == "message" {
            self.message = value.to_string();
            return;
        }
        if !self.fields.is_empty() {
            self.fields.push_str(", ");
        }
        let _ = write!(self.fields, "{}={value}", field.name());
    }

    /// `message {k=v, ...}`, or just the pairs when there is no message.
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields.replace(", ", " "),
            (false, false) => format!("{} {{{}}}", self.message, self.fields),
        }
    }
}

impl Visit for LineBuilder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.add(field, format_args!("{value}"));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.add(field, format_args!("{value:?}"));
    }
}
