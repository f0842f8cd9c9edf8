//! Interactive session: a pipeline plus the history it has produced.
//!
//! A [`Session`] is created when the user starts the tool and dropped (or
//! [`end`](Session::end)ed) when they leave. It owns its
//! [`SessionHistory`] outright; nothing is shared between sessions and no
//! locking is involved, since one session only ever runs one request at a
//! time.

pub mod history;

pub use history::{HistoryEntry, SessionHistory, TIMESTAMP_FORMAT};

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Local};
use tracing::info;

use crate::api::GenerationClient;
use crate::pipeline::WorkoutPipeline;
use crate::request::WorkoutRequest;

static SESSIONS_STARTED: AtomicU32 = AtomicU32::new(0);

/// `ss-YYYYmmdd-HHMMSS-N`: start time plus the session's number within
/// this process, so sessions started in the same second still differ.
fn session_id(started: DateTime<Local>) -> String {
    let number = SESSIONS_STARTED.fetch_add(1, Ordering::Relaxed) + 1;
    format!("ss-{}-{number}", started.format("%Y%m%d-%H%M%S"))
}

/// One user's interactive visit.
pub struct Session<C> {
    id: String,
    pipeline: WorkoutPipeline<C>,
    history: SessionHistory,
}

impl<C: GenerationClient> Session<C> {
    /// Start a session with an empty history.
    pub fn new(pipeline: WorkoutPipeline<C>) -> Self {
        let id = session_id(Local::now());
        info!(session = %id, "Session started");
        Self {
            id,
            pipeline,
            history: SessionHistory::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn pipeline(&self) -> &WorkoutPipeline<C> {
        &self.pipeline
    }

    /// Run the pipeline for `request` and record the outcome.
    ///
    /// Failed generations are recorded too. Returns the new entry.
    pub async fn generate(&mut self, request: WorkoutRequest) -> &HistoryEntry {
        let result = self.pipeline.run(&request).await;
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.history
            .append(HistoryEntry::new(request, result, timestamp));
        info!(
            session = %self.id,
            entries = self.history.len(),
            "Recorded workout request"
        );
        &self.history.all()[self.history.len() - 1]
    }

    /// Tear the session down, handing back its history.
    pub fn end(self) -> SessionHistory {
        info!(
            session = %self.id,
            entries = self.history.len(),
            succeeded = self.history.success_count(),
            "Session ended"
        );
        self.history
    }
}
