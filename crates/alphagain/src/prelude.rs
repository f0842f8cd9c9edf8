//! Convenience re-exports for common `alphagain` types.
//!
//! ```ignore
//! use alphagain::prelude::*;
//! ```
//!
//! Covers building a request, running it through a session, and saving
//! the result. Wire-level types (Gemini request/response bodies, retry
//! tuning) stay in their modules.

// ── Request ─────────────────────────────────────────────────────────
pub use crate::request::{Equipment, FitnessLevel, Gender, Goal, RequestError, WorkoutRequest};

// ── Generation ──────────────────────────────────────────────────────
pub use crate::api::{
    GeminiClient, GenerateFuture, GenerationClient, GenerationError, GenerationErrorKind,
};
pub use crate::pipeline::{GenerationResult, WorkoutPipeline};
pub use crate::prompt::PromptBuilder;

// ── Session ─────────────────────────────────────────────────────────
pub use crate::session::{HistoryEntry, Session, SessionHistory};

// ── Export and setup ────────────────────────────────────────────────
pub use crate::config::{AppConfig, ConfigError};
pub use crate::export::{DocumentFormat, ExportError, ExportedDocument, export, write_document};
