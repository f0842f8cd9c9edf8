//! Integration tests for the Gemini HTTP client.
//!
//! Each test starts a scripted HTTP stub on a random local port and points
//! a [`GeminiClient`] at it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use alphagain::api::{GeminiClient, GenerationClient, GenerationErrorKind, RetryConfig};
use alphagain::{GenerationResult, WorkoutPipeline, WorkoutRequest};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request as seen by the stub.
#[derive(Debug, Clone)]
struct Captured {
    head: String,
    body: String,
}

type Log = Arc<Mutex<Vec<Captured>>>;

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

async fn read_request(stream: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = find_header_end(&buf) {
            break end;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Captured {
        head,
        body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
    }
}

/// Serve `responses` in order, one connection each, then stop listening.
async fn spawn_stub(responses: Vec<(u16, String)>) -> (String, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let seen = log.clone();
    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            let captured = read_request(&mut stream).await;
            seen.lock().unwrap().push(captured);

            let reply = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        }
    });

    (format!("http://{addr}/v1beta"), log)
}

fn ok_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 40, "totalTokenCount": 160 }
    })
    .to_string()
}

fn error_body(code: u16, message: &str, status: &str) -> String {
    serde_json::json!({ "error": { "code": code, "message": message, "status": status } })
        .to_string()
}

fn client(base: &str) -> GeminiClient {
    GeminiClient::new("test-key")
        .unwrap()
        .with_base_url(base)
        .with_model("gemini-test")
}

fn fast_retry(retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries: retries,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
        jitter: false,
    }
}

// ── Success ─────────────────────────────────────────────────────────

#[tokio::test]
async fn success_returns_text_verbatim() {
    let plan = "## Day 1\n- 3x10 squats\n\n## Day 2\nRest";
    let (base, log) = spawn_stub(vec![(200, ok_body(plan))]).await;

    let text = client(&base).generate("make me a plan").await.unwrap();
    assert_eq!(text, plan);

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let head = requests[0].head.to_lowercase();
    assert!(head.starts_with("post /v1beta/models/gemini-test:generatecontent http/1.1"));
    assert!(head.contains("x-goog-api-key: test-key"));

    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "make me a plan");
    let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
    assert!((temperature - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn temperature_override_is_sent() {
    let (base, log) = spawn_stub(vec![(200, ok_body("ok"))]).await;
    client(&base)
        .with_temperature(1.5)
        .generate("p")
        .await
        .unwrap();

    let body: serde_json::Value =
        serde_json::from_str(&log.lock().unwrap()[0].body).unwrap();
    assert_eq!(body["generationConfig"]["temperature"], 1.5);
}

// ── Classification ──────────────────────────────────────────────────

#[tokio::test]
async fn rejected_key_is_unauthenticated() {
    let (base, _log) = spawn_stub(vec![(
        400,
        error_body(400, "API key not valid. Please pass a valid API key.", "INVALID_ARGUMENT"),
    )])
    .await;

    let err = client(&base).generate("p").await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::Unauthenticated);
    assert!(err.message.contains("API key not valid"));
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let (base, log) = spawn_stub(vec![(
        401,
        error_body(401, "Request had invalid authentication credentials.", "UNAUTHENTICATED"),
    )])
    .await;

    let err = client(&base)
        .with_retry(fast_retry(3))
        .generate("p")
        .await
        .unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::Unauthenticated);
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn overloaded_service_is_unavailable_without_retries() {
    let (base, log) = spawn_stub(vec![(
        503,
        error_body(503, "The model is overloaded.", "UNAVAILABLE"),
    )])
    .await;

    let err = client(&base).generate("p").await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::Unavailable);
    assert_eq!(err.message, "HTTP 503: The model is overloaded.");
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unavailable_is_retried_when_configured() {
    let (base, log) = spawn_stub(vec![
        (503, error_body(503, "overloaded", "UNAVAILABLE")),
        (429, error_body(429, "quota", "RESOURCE_EXHAUSTED")),
        (200, ok_body("third time lucky")),
    ])
    .await;

    let text = client(&base)
        .with_retry(fast_retry(2))
        .generate("p")
        .await
        .unwrap();
    assert_eq!(text, "third time lucky");
    assert_eq!(log.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn malformed_success_body_is_unexpected() {
    let (base, _log) = spawn_stub(vec![(200, "not json".to_string())]).await;
    let err = client(&base).generate("p").await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::Unexpected);
}

#[tokio::test]
async fn unreachable_service_is_unavailable() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let err = client(&format!("http://{addr}/v1beta"))
        .generate("p")
        .await
        .unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::Unavailable);
}

#[tokio::test]
async fn timeout_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _ = read_request(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let err = client(&format!("http://{addr}/v1beta"))
        .with_timeout(Duration::from_millis(200))
        .unwrap()
        .generate("p")
        .await
        .unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::Unavailable);
}

// ── Through the pipeline ────────────────────────────────────────────

#[tokio::test]
async fn pipeline_reports_authentication_failure() {
    let (base, _log) = spawn_stub(vec![(
        403,
        error_body(403, "Permission denied.", "PERMISSION_DENIED"),
    )])
    .await;

    let pipeline = WorkoutPipeline::new(client(&base));
    let result = pipeline.run(&WorkoutRequest::default()).await;
    let GenerationResult::Failure { message } = result else {
        panic!("expected failure, got {result:?}");
    };
    assert!(message.starts_with("Authentication failed"));
    assert!(message.contains("Permission denied."));
}

#[tokio::test]
async fn pipeline_sends_built_prompt() {
    let (base, log) = spawn_stub(vec![(200, ok_body("plan"))]).await;

    let pipeline = WorkoutPipeline::new(client(&base));
    let result = pipeline.run(&WorkoutRequest::default()).await;
    assert_eq!(result.plan(), Some("plan"));

    let body: serde_json::Value =
        serde_json::from_str(&log.lock().unwrap()[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Fitness Level: Beginner"));
    assert!(prompt.contains("Time Available per Day: 30\n"));
}
