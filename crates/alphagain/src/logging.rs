//! Tracing subscriber setup.
//!
//! Events go to an append-only log file, one line per event:
//!
//! ```text
//! 2026-03-07 09:05:01  INFO Workout plan generated
//! ```
//!
//! The filter defaults to `info` and can be overridden with the
//! `ALPHAGAIN_LOG` environment variable (same syntax as `RUST_LOG`).
//! Front-ends may stack their own layer on top, e.g. the TUI log pane.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::format::{DefaultFields, Format, Full, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::{LookupSpan, Registry};
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the filter directive.
pub const FILTER_VAR: &str = "ALPHAGAIN_LOG";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file `{path}`: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot install tracing subscriber: {0}")]
    Init(String),
}

impl LoggingError {
    /// What still works after this error, for the startup warning.
    pub fn fallback(&self) -> &'static str {
        match self {
            Self::Open { .. } => "continuing without a log file",
            Self::Init(_) => "continuing with the subscriber that is already installed",
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS` in local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Filter from `ALPHAGAIN_LOG`, or `info`. Noisy HTTP internals are
/// capped at `warn` either way.
pub fn env_filter() -> EnvFilter {
    let directive = std::env::var(FILTER_VAR).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    ["hyper=warn", "hyper_util=warn", "reqwest=warn"]
        .into_iter()
        .filter_map(|d| d.parse().ok())
        .fold(filter, EnvFilter::add_directive)
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| LoggingError::Open {
            path: path.display().to_string(),
            source,
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.display().to_string(),
            source,
        })
}

/// Plain-text formatting layer writing to the log file.
pub type FileLayer<S> =
    tracing_subscriber::fmt::Layer<S, DefaultFields, Format<Full, LocalTimer>, Mutex<File>>;

/// A formatting layer that appends plain-text lines to `path`.
pub fn file_layer<S>(path: &Path) -> Result<FileLayer<S>, LoggingError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let file = open_log_file(path)?;
    Ok(tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_timer(LocalTimer))
}

/// Install the global subscriber: filter, file sink, and `extra`.
///
/// If the log file cannot be opened the subscriber is still installed
/// without it and the open error is returned, so callers can warn and
/// carry on. Pass [`Identity`](tracing_subscriber::layer::Identity) when
/// there is no extra layer.
pub fn init<L>(log_file: &Path, extra: L) -> Result<(), LoggingError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    let (file, open_error) = match file_layer(log_file) {
        Ok(layer) => (Some(layer), None),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(extra)
        .with(env_filter())
        .with(file)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    match open_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
