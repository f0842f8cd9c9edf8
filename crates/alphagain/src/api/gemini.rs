//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! Sends a single user turn and returns the first candidate's text. Every
//! failure is classified into a [`GenerationError`]:
//!
//! | Condition | Kind |
//! |-----------|------|
//! | timeout, connect error, other transport error | `Unavailable` |
//! | HTTP 401 / 403, or HTTP 400 about the API key | `Unauthenticated` |
//! | HTTP 408 / 429 / 5xx | `Unavailable` |
//! | other status, bad JSON, no text in the response | `Unexpected` |

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::{GenerateFuture, GenerationClient, GenerationError, RetryConfig};
use crate::config::AppConfig;

/// Base URL of the Generative Language API.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for workout generation.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default per-request timeout. Expiry is reported as `Unavailable`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Longest slice of a raw error body copied into an error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

// ── Request types ──────────────────────────────────────────────────

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    candidate_count: u32,
}

// ── Response types ─────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    message: String,
    status: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ApiError,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async client for Gemini text generation.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    retry: RetryConfig,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

fn http_client(timeout: Duration) -> Result<reqwest::Client, GenerationError> {
    reqwest::Client::builder()
        .user_agent(concat!("alphagain/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| GenerationError::unexpected(format!("failed to build HTTP client: {e}")))
}

impl GeminiClient {
    /// Create a client with default model, temperature, and timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GenerationError> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            retry: RetryConfig::default(),
        })
    }

    /// Create a client from loaded application config.
    pub fn from_config(config: &AppConfig) -> Result<Self, GenerationError> {
        Ok(Self {
            client: http_client(config.request_timeout)?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            temperature: config.temperature,
            retry: config.retry.clone(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different API root (proxies, local stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, GenerationError> {
        self.client = http_client(timeout)?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// One request/response round trip, no retries.
    async fn send(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                candidate_count: 1,
            },
        };
        debug!(
            "Gemini request: model={}, prompt={} chars, temp={}",
            self.model,
            prompt.len(),
            self.temperature
        );

        let start = Instant::now();
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(
            "Gemini response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(classify_status(status.as_u16(), &text));
        }
        extract_text(&text)
    }
}

impl GenerationClient for GeminiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(async move {
            if prompt.trim().is_empty() {
                return Err(GenerationError::unexpected("prompt is empty"));
            }
            if self.api_key.trim().is_empty() {
                return Err(GenerationError::unauthenticated("no API key configured"));
            }

            let mut attempt = 0;
            loop {
                match self.send(prompt).await {
                    Ok(text) => return Ok(text),
                    Err(e) if e.is_transient() && self.retry.allows_retry(attempt) => {
                        let delay = self.retry.backoff(attempt);
                        warn!(
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            "Generation service unavailable, retrying: {}",
                            e.message
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        })
    }
}

// ── Response classification ────────────────────────────────────────

fn truncate_chars(s: &str, max: usize) -> String {
    let mut out: String = s.chars().take(max).collect();
    if s.chars().count() > max {
        out.push_str("...");
    }
    out
}

fn mentions_api_key(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("api key") || lower.contains("api_key")
}

/// Map a non-2xx response to a tagged error.
pub(crate) fn classify_status(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|env| env.error.message)
        .unwrap_or_else(|_| truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS));
    let message = format!("HTTP {status}: {message}");

    match status {
        401 | 403 => GenerationError::unauthenticated(message),
        400 if mentions_api_key(&message) => GenerationError::unauthenticated(message),
        408 | 429 | 500..=599 => GenerationError::unavailable(message),
        _ => GenerationError::unexpected(message),
    }
}

/// Pull the generated text out of a 2xx response body.
pub(crate) fn extract_text(body: &str) -> Result<String, GenerationError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::unexpected(format!("failed to parse response: {e}")))?;

    if let Some(err) = parsed.error {
        return Err(match err.status.as_deref() {
            Some("UNAUTHENTICATED" | "PERMISSION_DENIED") => {
                GenerationError::unauthenticated(err.message)
            }
            Some("UNAVAILABLE" | "RESOURCE_EXHAUSTED" | "DEADLINE_EXCEEDED") => {
                GenerationError::unavailable(err.message)
            }
            _ => GenerationError::unexpected(format!("API error: {}", err.message)),
        });
    }

    if let Some(ref usage) = parsed.usage_metadata {
        trace!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_token_count.unwrap_or(0),
            usage.candidates_token_count.unwrap_or(0),
            usage.total_token_count.unwrap_or(0),
        );
    }

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        let reason = parsed
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map_or_else(
                || "no candidates in response".to_string(),
                |r| format!("prompt was blocked ({r})"),
            );
        return Err(GenerationError::unexpected(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
        return Err(GenerationError::unexpected(format!(
            "response contained no text (finish reason: {reason})"
        )));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GenerationErrorKind;

    #[test]
    fn request_body_uses_camel_case() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                candidate_count: 1,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["candidateCount"], 1);
    }

    #[test]
    fn extract_text_joins_parts_unmodified() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[
            {"text":"Day 1: squats\n"},{"text":"Day 2: rest"}]},"finishReason":"STOP"}]}"#;
        assert_eq!(extract_text(body).unwrap(), "Day 1: squats\nDay 2: rest");
    }

    #[test]
    fn extract_text_reports_blocked_prompt() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let err = extract_text(body).unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Unexpected);
        assert!(err.message.contains("SAFETY"));
    }

    #[test]
    fn extract_text_rejects_empty_candidate() {
        let body = r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#;
        let err = extract_text(body).unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Unexpected);
        assert!(err.message.contains("MAX_TOKENS"));
    }

    #[test]
    fn extract_text_rejects_garbage() {
        let err = extract_text("<html>oops</html>").unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Unexpected);
    }

    #[test]
    fn extract_text_maps_embedded_error_status() {
        let body = r#"{"error":{"code":403,"message":"denied","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(
            extract_text(body).unwrap_err().kind,
            GenerationErrorKind::Unauthenticated
        );
    }

    #[test]
    fn classify_auth_statuses() {
        assert_eq!(
            classify_status(401, "nope").kind,
            GenerationErrorKind::Unauthenticated
        );
        assert_eq!(
            classify_status(403, "").kind,
            GenerationErrorKind::Unauthenticated
        );
        let invalid_key = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let err = classify_status(400, invalid_key);
        assert_eq!(err.kind, GenerationErrorKind::Unauthenticated);
        assert!(err.message.starts_with("HTTP 400: API key not valid"));
    }

    #[test]
    fn classify_transient_statuses() {
        for status in [408, 429, 500, 502, 503, 504] {
            assert_eq!(
                classify_status(status, "busy").kind,
                GenerationErrorKind::Unavailable,
                "status {status}"
            );
        }
    }

    #[test]
    fn classify_other_statuses_as_unexpected() {
        let err = classify_status(404, r#"{"error":{"message":"model not found"}}"#);
        assert_eq!(err.kind, GenerationErrorKind::Unexpected);
        assert_eq!(err.message, "HTTP 404: model not found");
        assert_eq!(
            classify_status(400, "bad field").kind,
            GenerationErrorKind::Unexpected
        );
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(1000);
        let err = classify_status(500, &body);
        assert!(err.message.len() < 400);
        assert!(err.message.ends_with("..."));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = GeminiClient::new("secret-key-123").unwrap();
        let dbg = format!("{client:?}");
        assert!(!dbg.contains("secret-key-123"));
        assert!(dbg.contains(DEFAULT_MODEL));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = GeminiClient::new("k")
            .unwrap()
            .with_base_url("http://localhost:9999/v1beta/")
            .with_model("gemini-test");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }

    #[tokio::test]
    async fn empty_prompt_fails_without_network() {
        let client = GeminiClient::new("k")
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let err = client.generate("   ").await.unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Unexpected);
    }

    #[tokio::test]
    async fn blank_key_is_unauthenticated() {
        let client = GeminiClient::new("").unwrap();
        let err = client.generate("plan please").await.unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Unauthenticated);
    }
}
