//! End-to-end tests for the HTTP surface, driving the router in-process.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use futures_util::future::{BoxFuture, FutureExt};
use serde_json::{json, Value};
use tower::ServiceExt;

use strategist::{
    ai::LlmClient,
    engine::ParameterExtractor,
    routes::build_router,
    state::AppState,
};

struct MockLlm(&'static str);

impl LlmClient for MockLlm {
    fn complete<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, anyhow::Result<String>> {
        async move { Ok::<_, anyhow::Error>(self.0.to_string()) }.boxed()
    }

    fn label(&self) -> String {
        "mock".into()
    }
}

fn app_with(extractor: ParameterExtractor) -> Router {
    build_router(Arc::new(AppState::with_extractor(extractor)))
}

fn mocked_app(reply: &'static str) -> Router {
    app_with(ParameterExtractor::with_llm(Arc::new(MockLlm(reply))))
}

async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/generate_strategy")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn generate_strategy_with_mocked_llm() {
    let app = mocked_app(
        r#"Here are the parameters:
{"duration":5,"stake":10,"initial_stake":10,"profit_threshold":100,"loss_threshold":50}"#,
    );
    let body = json!({ "prompt": "5 tick duration, $10 stake, profit target $100, stop loss $50" });

    let (status, json) = post_json(app, &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let xml = json["strategy"].as_str().unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<field name=\"NUM\">5</field>"));
    assert!(xml.contains("<field name=\"NUM\">-50</field>"));
    assert!(xml.contains("<field name=\"NUM\">100</field>"));
    assert_eq!(xml.matches("<variable ").count(), 5);
}

#[tokio::test]
async fn missing_prompt_is_bad_request() {
    let (status, json) = post_json(mocked_app("{}"), r#"{"text": "hi"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Missing prompt in request body" }));
}

#[tokio::test]
async fn unreadable_body_is_bad_request() {
    let (status, json) = post_json(mocked_app("{}"), "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing prompt in request body");
}

#[tokio::test]
async fn invalid_parameters_are_bad_request() {
    let app = mocked_app(r#"{"duration": "ten"}"#);
    let (status, json) = post_json(app, r#"{"prompt": "ten ticks please"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Could not extract valid parameters from prompt");
}

#[tokio::test]
async fn rules_mode_needs_no_llm() {
    let app = app_with(ParameterExtractor::rules_only());
    let body = json!({ "prompt": "Create a strategy with 5 ticks, $10 stake, profit of $100 and loss of $50" });

    let (status, json) = post_json(app, &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let xml = json["strategy"].as_str().unwrap();
    assert!(xml.contains("<field name=\"NUM\">-50</field>"));
    assert!(xml.ends_with("</xml>"));
}

#[tokio::test]
async fn identical_requests_give_identical_documents() {
    let body = json!({ "prompt": "3 ticks, $2 stake, profit $20, loss $10" }).to_string();
    let (_, first) = post_json(app_with(ParameterExtractor::rules_only()), &body).await;
    let (_, second) = post_json(app_with(ParameterExtractor::rules_only()), &body).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn health_reports_extractor_mode() {
    let app = app_with(ParameterExtractor::rules_only());
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["extractor"], "rules");
}
