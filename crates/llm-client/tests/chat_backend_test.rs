//! End-to-end tests of the model-backed scorer against a mock
//! chat-completions server.

use axum::routing::post;
use axum::{Json, Router};
use catalog::{Activity, ActivityCategory};
use llm_client::{LlmConfig, LlmScorer};
use matching::{MatchingCriteria, ScoreOrigin};
use pipeline::{ActivityScorer, ScoringError};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn start_mock_backend(content: &'static str) -> (String, tokio::task::JoinHandle<()>) {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(move |Json(_body): Json<Value>| async move {
            Json(json!({
                "choices": [{ "message": { "role": "assistant", "content": content } }]
            }))
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("Failed to get local address");
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Mock backend failed");
    });

    (format!("http://{}", addr), handle)
}

fn candidates() -> Vec<Activity> {
    let mut tutoring = Activity::new(
        21,
        "Tutorías",
        "Tutorías de matemática",
        ActivityCategory::OngVolunteering,
    );
    tutoring.is_virtual = true;
    let shelter = Activity::new(
        22,
        "Albergue",
        "Apoyo en albergue de animales",
        ActivityCategory::OngVolunteering,
    );
    vec![tutoring, shelter]
}

#[tokio::test]
async fn test_scorer_over_http() {
    let (addr, handle) = start_mock_backend(
        r#"```json
{"matches": [
  {"activityId": 22, "score": 91, "reasons": ["Loves animals", "Weekend availability"]},
  {"activityId": 21, "score": 64, "reasons": ["Virtual"]},
  {"activityId": 40, "score": 99, "reasons": ["Not a candidate"]}
]}
```"#,
    )
    .await;

    let scorer = LlmScorer::from_config(LlmConfig::new("test-key").with_base_url(addr));
    assert_eq!(scorer.backend_name(), "OpenAiChatBackend");

    let mut criteria = MatchingCriteria::new(8);
    criteria.interests = vec!["animales".to_string()];

    let scores = scorer.score(&criteria, &candidates()).await.unwrap();
    let ids: Vec<_> = scores.iter().map(|s| s.activity_id).collect();
    assert_eq!(ids, vec![22, 21]);
    assert_eq!(scores[0].score, 91);
    assert_eq!(scores[0].reasons.len(), 2);
    assert!(scores.iter().all(|s| s.scored_by == ScoreOrigin::Model));

    handle.abort();
}

#[tokio::test]
async fn test_free_text_answer_over_http() {
    let (addr, handle) = start_mock_backend("Activity 21 looks great!").await;

    let scorer = LlmScorer::from_config(LlmConfig::new("test-key").with_base_url(addr));
    let result = scorer.score(&MatchingCriteria::new(8), &candidates()).await;
    assert!(matches!(result, Err(ScoringError::MalformedResponse(_))));

    handle.abort();
}

#[tokio::test]
async fn test_wrong_path_is_unavailable() {
    // Nothing is routed, so every request gets a 404
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, Router::new()).await.unwrap();
    });

    let scorer =
        LlmScorer::from_config(LlmConfig::new("test-key").with_base_url(format!("http://{addr}")));
    let result = scorer.score(&MatchingCriteria::new(8), &candidates()).await;
    assert!(matches!(result, Err(ScoringError::Unavailable(_))));

    handle.abort();
}
