use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ai_llm_service::{CompletionClient, OllamaError};
use api::build_router;
use api::core::app_state::AppState;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use faq_engine::{
    AnswerResolver, EngineConfig, FaqLine, FaqTable, InMemorySessionStore, SessionStore,
};
use futures::future::BoxFuture;
use rag_store::{RagError, TopMatch, VectorRetriever};
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Default)]
struct CountingCompletion {
    calls: AtomicUsize,
}

impl CompletionClient for CountingCompletion {
    fn complete<'a>(
        &'a self,
        _prompt: &'a str,
        _model: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, OllamaError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("generated".to_string())
        })
    }
}

struct NoMatch;

impl VectorRetriever for NoMatch {
    fn query_top_match<'a>(
        &'a self,
        _text: &'a str,
    ) -> BoxFuture<'a, Result<Option<TopMatch>, RagError>> {
        Box::pin(async { Ok(None) })
    }
}

struct TestApp {
    router: axum::Router,
    completion: Arc<CountingCompletion>,
    sessions: Arc<InMemorySessionStore>,
}

fn test_app() -> TestApp {
    let faq = FaqTable::from_lines(&[FaqLine::Pair {
        line_no: 0,
        question: "What are your hours?".into(),
        answer: "We are open 9-5.".into(),
    }]);
    let completion = Arc::new(CountingCompletion::default());
    let sessions = Arc::new(InMemorySessionStore::new(Duration::from_secs(60), 100));
    let resolver = AnswerResolver::new(
        &EngineConfig::default(),
        faq,
        completion.clone(),
        Arc::new(NoMatch),
        sessions.clone(),
    );
    TestApp {
        router: build_router(Arc::new(AppState::new(resolver))),
        completion,
        sessions,
    }
}

async fn post_chat(router: &axum::Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn faq_question_end_to_end() {
    let app = test_app();
    let (status, body) = post_chat(
        &app.router,
        json!({"question": "What are your hours?"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "We are open 9-5.");
    let id = body["session_id"].as_str().unwrap();
    assert_eq!(id.len(), 36);
    assert_eq!(app.completion.calls.load(Ordering::SeqCst), 0);
    assert_eq!(app.sessions.history(id).len(), 1);
}

#[tokio::test]
async fn blank_question_is_rejected_without_session() {
    let app = test_app();
    let (status, body) = post_chat(&app.router, json!({"question": "   "}).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"answer": "Please ask a question."}));
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn sessions_are_minted_per_call_and_echoed_when_given() {
    let app = test_app();
    let q = json!({"question": "Anything new?"}).to_string();
    let (_, first) = post_chat(&app.router, q.clone()).await;
    let (_, second) = post_chat(&app.router, q).await;
    assert_ne!(first["session_id"], second["session_id"]);
    assert_eq!(
        first["answer"],
        "I'm not able to answer this question. Escalating to human support."
    );

    let (_, echoed) = post_chat(
        &app.router,
        json!({"question": "hi", "session_id": "abc"}).to_string(),
    )
    .await;
    assert_eq!(echoed["session_id"], "abc");

    let (_, summary) = post_chat(
        &app.router,
        json!({"question": "summarize", "session_id": "abc"}).to_string(),
    )
    .await;
    assert_eq!(summary["answer"], "generated");
    assert_eq!(app.completion.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let app = test_app();
    let (status, body) = post_chat(&app.router, "{not json").await;
    assert!(status.is_client_error(), "{status}");
    assert_eq!(body["error"], "BAD_REQUEST");

    let (status, _) = post_chat(&app.router, json!({"session_id": "x"}).to_string()).await;
    assert!(status.is_client_error(), "{status}");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = test_app();
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::ORIGIN, "http://example.org")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"question": "What are your hours?"}).to_string()))
        .unwrap();
    let res = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(
        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
