// tests/http_api_test.rs
// End-to-end HTTP scenarios against the router with a scripted provider.


use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use mbbs_tutor::api::http_router;
use mbbs_tutor::config::SummaryTrigger;
use test_helpers::ScriptedProvider;

async fn create_test_app(provider: Arc<ScriptedProvider>) -> (Router, sqlx::SqlitePool) {
    let (state, pool) = test_helpers::create_test_app_state(
        test_helpers::test_config(6, SummaryTrigger::Windowed),
        provider,
    )
    .await;
    (http_router(state), pool)
}

fn ask_json(body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// `sid=<value>` pair from a Set-Cookie header, ready to send back.
fn session_cookie(response: &axum::response::Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|pair| pair.trim().to_string())
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn message_count(pool: &sqlx::SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM messages")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_new_session_ask_then_history() {
    let provider = Arc::new(ScriptedProvider::new());
    let (app, _pool) = create_test_app(provider).await;

    let response = app
        .clone()
        .oneshot(ask_json(json!({ "question": "What is the Krebs cycle?" }), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("sid="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    let cookie = session_cookie(&response).unwrap();

    let body = json_body(response).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["mode"], json!("explain"));
    assert!(!body["answer"].as_str().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(get("/history", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body = json_body(response).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["turns"], json!(1));
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], json!("user"));
    assert_eq!(messages[0]["content"], json!("What is the Krebs cycle?"));
    assert_eq!(messages[1]["role"], json!("assistant"));
    assert!(messages[0]["at"].as_str().is_some());
}

#[tokio::test]
async fn test_returning_session_gets_no_new_cookie() {
    let provider = Arc::new(ScriptedProvider::new());
    let (app, _pool) = create_test_app(provider).await;

    let response = app
        .clone()
        .oneshot(ask_json(json!({ "question": "Define anemia" }), None))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();

    let response = app
        .clone()
        .oneshot(ask_json(json!({ "question": "Classify it" }), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body = json_body(app.oneshot(get("/history", Some(&cookie))).await.unwrap()).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_flashcards_mode_uses_flashcard_template() {
    let provider = Arc::new(ScriptedProvider::new());
    let (app, _pool) = create_test_app(provider.clone()).await;

    let response = app
        .oneshot(ask_json(
            json!({ "question": "Renal physiology", "mode": "flashcards" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["mode"], json!("flashcards"));

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    let prompt = &calls[0][1].content;
    assert!(prompt.contains("Create 10 high-yield MBBS flashcards on: Renal physiology"));
    assert!(!prompt.contains("Student request:"));
}

#[tokio::test]
async fn test_unknown_mode_falls_back_to_explain() {
    let provider = Arc::new(ScriptedProvider::new());
    let (app, _pool) = create_test_app(provider.clone()).await;

    let response = app
        .oneshot(ask_json(
            json!({ "question": "Heart failure", "mode": "podcast", "exam_focus": "Third Prof" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["mode"], json!("explain"));

    let prompt = &provider.calls()[0][1].content;
    assert!(prompt.contains("[MODE: EXPLAIN]\nHeart failure"));
    assert!(prompt.contains("Exam focus: Third Prof"));
}

#[tokio::test]
async fn test_blank_question_is_rejected_without_writes() {
    let provider = Arc::new(ScriptedProvider::new());
    let (app, pool) = create_test_app(provider.clone()).await;

    for body in [json!({ "question": "   " }), json!({ "mode": "quiz" })] {
        let response = app.clone().oneshot(ask_json(body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let body = json_body(response).await;
        assert_eq!(body["ok"], json!(false));
        assert_eq!(body["error"], json!("question is required"));
    }

    assert_eq!(message_count(&pool).await, 0);
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_form_encoded_ask() {
    let provider = Arc::new(ScriptedProvider::new());
    let (app, _pool) = create_test_app(provider.clone()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("question=Explain+the+Frank-Starling+law&mode=quiz"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["mode"], json!("quiz"));
    assert!(provider.calls()[0][1]
        .content
        .contains("[MODE: QUIZ]\nExplain the Frank-Starling law"));
}

#[tokio::test]
async fn test_tampered_cookie_starts_a_new_session() {
    let provider = Arc::new(ScriptedProvider::new());
    let (app, _pool) = create_test_app(provider).await;

    let response = app
        .clone()
        .oneshot(ask_json(json!({ "question": "Define shock" }), None))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();
    let forged = format!("{}0", cookie);

    let response = app
        .clone()
        .oneshot(get("/history", Some(&forged)))
        .await
        .unwrap();
    let fresh_cookie = session_cookie(&response).unwrap();
    assert_ne!(fresh_cookie, cookie);

    let body = json_body(response).await;
    assert!(body["messages"].as_array().unwrap().is_empty());
    assert_eq!(body["summary"], json!(""));
}

#[tokio::test]
async fn test_provider_outage_maps_to_bad_gateway() {
    let provider = Arc::new(ScriptedProvider::failing());
    let (app, _pool) = create_test_app(provider).await;

    let response = app
        .oneshot(ask_json(json!({ "question": "Define sepsis" }), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = json_body(response).await;
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["error_code"], json!("UPSTREAM_UNAVAILABLE"));
}

#[tokio::test]
async fn test_health() {
    let provider = Arc::new(ScriptedProvider::new());
    let (app, _pool) = create_test_app(provider).await;

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["service"], json!("MBBS Tutor Assistant with Memory"));
}
