//! End-to-end runs through a [`Session`] with a stub generation client.

use std::sync::Mutex;

use alphagain::prelude::*;

/// Replies from a script, one entry per call, and keeps every prompt.
struct Scripted {
    replies: Mutex<Vec<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl Scripted {
    fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl GenerationClient for Scripted {
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(GenerationError::unexpected("script exhausted")));
        Box::pin(async move { reply })
    }
}

/// Derives the plan from the prompt, so each result can be traced back
/// to the request that produced it.
struct EchoAge;

impl GenerationClient for EchoAge {
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        let age = prompt
            .lines()
            .find_map(|l| l.strip_prefix("- Age: "))
            .unwrap_or("?")
            .to_string();
        Box::pin(async move { Ok(format!("Plan for age {age}")) })
    }
}

fn baseline() -> WorkoutRequest {
    WorkoutRequest::new(
        FitnessLevel::Beginner,
        Goal::WeightLoss,
        Gender::Male,
        25,
        30,
        Equipment::Bodyweight,
    )
    .unwrap()
}

#[tokio::test]
async fn successful_generation_is_recorded() {
    let mut session = Session::new(WorkoutPipeline::new(Scripted::new(vec![Ok(
        "Plan A".to_string(),
    )])));

    let entry = session.generate(baseline()).await;
    assert_eq!(
        entry.result,
        GenerationResult::Success {
            text: "Plan A".into()
        }
    );

    let history = session.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history.all()[0].request, baseline());
    assert_eq!(history.all()[0].result.plan(), Some("Plan A"));
}

#[tokio::test]
async fn authentication_failure_is_recorded() {
    let mut session = Session::new(WorkoutPipeline::new(Scripted::new(vec![Err(
        GenerationError::unauthenticated("HTTP 401: API key not valid"),
    )])));

    let entry = session.generate(baseline()).await;
    let GenerationResult::Failure { message } = &entry.result else {
        panic!("expected failure, got {:?}", entry.result);
    };
    assert!(message.contains("Authentication"));
    assert!(message.contains("GOOGLE_API_KEY"));

    assert_eq!(session.history().len(), 1);
    assert!(!session.history().all()[0].result.is_success());
}

#[tokio::test]
async fn sequential_requests_keep_order_and_pairing() {
    let first = baseline();
    let second = WorkoutRequest::new(
        FitnessLevel::Advanced,
        Goal::MuscleGain,
        Gender::Female,
        41,
        60,
        Equipment::FullGym,
    )
    .unwrap();

    let mut session = Session::new(WorkoutPipeline::new(EchoAge));
    session.generate(first.clone()).await;
    session.generate(second.clone()).await;

    let history = session.end();
    assert_eq!(history.len(), 2);

    let entries = history.all();
    assert_eq!(entries[0].request, first);
    assert_eq!(entries[0].result.plan(), Some("Plan for age 25"));
    assert_eq!(entries[1].request, second);
    assert_eq!(entries[1].result.plan(), Some("Plan for age 41"));
    assert!(entries[0].timestamp <= entries[1].timestamp);
}

#[tokio::test]
async fn failures_and_successes_interleave() {
    let mut session = Session::new(WorkoutPipeline::new(Scripted::new(vec![
        Ok("first".into()),
        Err(GenerationError::unavailable("timed out")),
        Ok("third".into()),
    ])));

    for _ in 0..3 {
        session.generate(baseline()).await;
    }

    let history = session.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history.success_count(), 2);
    assert_eq!(history.get(0).unwrap().result.plan(), Some("first"));
    assert!(history.get(1).unwrap().result.display_text().contains("try again"));
    assert_eq!(history.latest().unwrap().result.plan(), Some("third"));

    let prompts = session.pipeline().client().prompts.lock().unwrap();
    assert_eq!(prompts.len(), 3);
    assert!(prompts.iter().all(|p| *p == PromptBuilder::build(&baseline())));
}

#[tokio::test]
async fn separate_sessions_do_not_share_history() {
    let mut a = Session::new(WorkoutPipeline::new(EchoAge));
    let b = Session::new(WorkoutPipeline::new(EchoAge));

    a.generate(baseline()).await;

    assert_eq!(a.history().len(), 1);
    assert!(b.history().is_empty());
    assert_ne!(a.id(), b.id());
}

#[test]
fn out_of_range_values_are_rejected_before_the_pipeline() {
    let too_young = WorkoutRequest::new(
        FitnessLevel::Beginner,
        Goal::Endurance,
        Gender::Other,
        11,
        30,
        Equipment::Dumbbells,
    );
    assert!(matches!(
        too_young,
        Err(RequestError::OutOfRange { field: "age", .. })
    ));

    let too_long = WorkoutRequest::new(
        FitnessLevel::Beginner,
        Goal::Endurance,
        Gender::Other,
        30,
        121,
        Equipment::Dumbbells,
    );
    assert!(matches!(
        too_long,
        Err(RequestError::OutOfRange { field: "duration", .. })
    ));
}
