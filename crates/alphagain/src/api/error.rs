//! Tagged failures from the generation service.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure classes a [`GenerationClient`](super::GenerationClient) reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    /// Missing, invalid, or rejected credential.
    Unauthenticated,
    /// Network failure, timeout, rate limit, or server-side outage.
    Unavailable,
    /// Anything else: malformed responses, unexpected statuses, empty output.
    Unexpected,
}

impl GenerationErrorKind {
    /// Short user-facing description of the failure class.
    pub fn description(self) -> &'static str {
        match self {
            Self::Unauthenticated => "Authentication failed",
            Self::Unavailable => "The generation service is unavailable",
            Self::Unexpected => "Unexpected error from the generation service",
        }
    }
}

impl fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Unavailable => "unavailable",
            Self::Unexpected => "unexpected",
        })
    }
}

/// A classified generation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Unauthenticated, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Unavailable, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Unexpected, message)
    }

    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        self.kind == GenerationErrorKind::Unavailable
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::unavailable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            Self::unavailable(format!("connection failed: {e}"))
        } else if e.is_request() || e.is_body() {
            Self::unavailable(format!("request failed: {e}"))
        } else if e.is_decode() {
            Self::unexpected(format!("failed to decode response: {e}"))
        } else {
            Self::unexpected(format!("request failed: {e}"))
        }
    }
}
