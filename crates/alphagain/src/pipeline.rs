//! Request → prompt → generation, with every failure turned into a value.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info};

use crate::api::{GenerationClient, GenerationError, GenerationErrorKind};
use crate::prompt::PromptBuilder;
use crate::request::WorkoutRequest;

/// Outcome of one pipeline run. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    /// The generated plan, exactly as the service returned it.
    Success { text: String },
    /// A user-facing description of why generation failed.
    Failure { message: String },
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The generated plan, if any.
    pub fn plan(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    /// Text to show in place of the plan: the plan itself or the failure message.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Success { text } => text,
            Self::Failure { message } => message,
        }
    }
}

/// Turn a classified error into the message shown instead of a plan.
pub fn describe_failure(err: &GenerationError) -> String {
    let mut message = format!("{}: {}", err.kind.description(), err.message);
    match err.kind {
        GenerationErrorKind::Unauthenticated => {
            message.push_str(". Check that GOOGLE_API_KEY is set correctly.");
        }
        GenerationErrorKind::Unavailable => {
            message.push_str(". Please try again in a moment.");
        }
        GenerationErrorKind::Unexpected => {}
    }
    message
}

/// Builds the prompt for a request and sends it through a [`GenerationClient`].
pub struct WorkoutPipeline<C> {
    client: C,
}

impl<C: GenerationClient> WorkoutPipeline<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one request. Never fails: errors come back as [`GenerationResult::Failure`].
    pub async fn run(&self, request: &WorkoutRequest) -> GenerationResult {
        let prompt = PromptBuilder::build(request);
        let start = Instant::now();

        match self.client.generate(&prompt).await {
            Ok(text) => {
                info!(
                    level = %request.fitness_level(),
                    goal = %request.goal(),
                    chars = text.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Workout plan generated successfully"
                );
                GenerationResult::Success { text }
            }
            Err(e) => {
                error!(
                    kind = %e.kind,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Failed to generate workout plan: {}",
                    e.message
                );
                GenerationResult::Failure {
                    message: describe_failure(&e),
                }
            }
        }
    }
}
