//! Personalized workout plans from a hosted generative model.
//!
//! `alphagain` turns six user-chosen parameters (fitness level, goal,
//! gender, age, time per day, equipment) into a prompt, sends it to Google's
//! Gemini `generateContent` API, and hands back either the generated plan or
//! a user-facing failure message. Every request made during a session is
//! kept, in order, in that session's history.
//!
//! # Getting started
//!
//! ```ignore
//! use alphagain::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let client = GeminiClient::from_config(&config)?;
//!     let mut session = Session::new(WorkoutPipeline::new(client));
//!
//!     let request = WorkoutRequest::new(
//!         FitnessLevel::Intermediate,
//!         Goal::MuscleGain,
//!         Gender::Female,
//!         34,
//!         45,
//!         Equipment::Dumbbells,
//!     )?;
//!
//!     let entry = session.generate(request).await;
//!     println!("{}", entry.result.display_text());
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Request parameters and validation:** [`request`], starting with
//!   [`WorkoutRequest`](request::WorkoutRequest).
//! - **The prompt text:** [`PromptBuilder`](prompt::PromptBuilder).
//! - **Talking to the model:** the [`GenerationClient`](api::GenerationClient)
//!   trait and its HTTP implementation [`GeminiClient`](api::GeminiClient).
//!   Errors are classified into [`GenerationErrorKind`](api::GenerationErrorKind).
//! - **Request → result:** [`WorkoutPipeline`](pipeline::WorkoutPipeline),
//!   which never fails and always returns a
//!   [`GenerationResult`](pipeline::GenerationResult).
//! - **Per-session history:** [`Session`](session::Session) and
//!   [`SessionHistory`](session::SessionHistory).
//! - **Saving a plan:** [`export`] renders PDF or Markdown documents.
//! - **Settings and log output:** [`config`] and [`logging`].

pub mod api;
pub mod config;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod prelude;
pub mod prompt;
pub mod request;
pub mod session;

pub use api::{GeminiClient, GenerationClient, GenerationError, GenerationErrorKind};
pub use config::{AppConfig, ConfigError};
pub use pipeline::{GenerationResult, WorkoutPipeline};
pub use request::{Equipment, FitnessLevel, Gender, Goal, RequestError, WorkoutRequest};
pub use session::{HistoryEntry, Session, SessionHistory};
