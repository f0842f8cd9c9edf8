//! Generation service boundary.
//!
//! - [`GenerationClient`]: the seam the pipeline calls through. Anything
//!   that can turn a prompt into text (the real service, a test stub)
//!   implements it.
//! - [`gemini`]: [`GeminiClient`], the HTTP implementation for Google's
//!   `generateContent` endpoint.
//! - [`error`]: [`GenerationError`] and its [`GenerationErrorKind`] tags.
//! - [`retry`]: optional backoff for transient (`Unavailable`) failures.

pub mod error;
pub mod gemini;
pub mod retry;

pub use error::{GenerationError, GenerationErrorKind};
pub use gemini::GeminiClient;
pub use retry::RetryConfig;

use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`GenerationClient::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;

/// Sends a prompt to a text-generation service.
///
/// Implementations must always resolve to a tagged result. Transport
/// failures, bad credentials, and malformed responses all come back as a
/// [`GenerationError`]; nothing escapes as a panic.
pub trait GenerationClient: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a>;
}

impl<C: GenerationClient + ?Sized> GenerationClient for Box<C> {
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        (**self).generate(prompt)
    }
}

impl<C: GenerationClient + ?Sized> GenerationClient for std::sync::Arc<C> {
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        (**self).generate(prompt)
    }
}
