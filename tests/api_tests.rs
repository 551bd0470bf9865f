//! Router-level tests for the HTTP API.
//!
//! Each test builds the full router, including middleware, and drives it with
//! `tower::ServiceExt::oneshot` so no listener is needed.
//!
//! Run with: cargo test --test api_tests
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use insight_agent::config::AppConfig;
use insight_agent::create_router;
use insight_agent::routes::analyze::AnalyzeResponse;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_router(&AppConfig::default())
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn analyze(text: &str) -> AnalyzeResponse {
    let response = send(app(), post_json("/analyze", json!({ "text": text }).to_string())).await;
    assert_eq!(response.status(), StatusCode::OK, "text = {text:?}");
    serde_json::from_value(json_body(response).await).unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let response = send(app(), Request::get("/healthz").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_analyze_sample_sentence() {
    let text = "I love cloud engineering!";
    let result = analyze(text).await;

    assert_eq!(result.original_text, text);
    assert_eq!(result.word_count, 4);
    assert_eq!(result.character_count, text.chars().count());
    assert_eq!(result.character_count, 25);
}

#[tokio::test]
async fn test_analyze_response_fields() {
    let response = send(app(), post_json("/analyze", r#"{"text":"a b"}"#)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "original_text": "a b", "word_count": 2, "character_count": 3 })
    );
}

#[tokio::test]
async fn test_analyze_whitespace_only_accepted() {
    let result = analyze("   ").await;
    assert_eq!(result.original_text, "   ");
    assert_eq!(result.word_count, 0);
    assert_eq!(result.character_count, 3);
}

#[tokio::test]
async fn test_analyze_preserves_text_exactly() {
    let text = "\n  Grüße, 世界! 🦀\t";
    let result = analyze(text).await;
    assert_eq!(result.original_text, text);
    assert_eq!(result.word_count, 3);
    assert_eq!(result.character_count, text.chars().count());
}

#[tokio::test]
async fn test_analyze_empty_text_rejected() {
    let response = send(app(), post_json("/analyze", r#"{"text":""}"#)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json_body(response).await,
        json!({
            "detail": [{
                "type": "string_too_short",
                "loc": ["body", "text"],
                "msg": "String should have at least 1 character",
            }]
        })
    );
}

#[tokio::test]
async fn test_analyze_missing_text_rejected() {
    let response = send(app(), post_json("/analyze", r#"{"content":"hello"}"#)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["detail"][0]["type"], "missing");
    assert_eq!(body["detail"][0]["loc"], json!(["body", "text"]));
}

#[tokio::test]
async fn test_analyze_non_string_text_rejected() {
    let response = send(app(), post_json("/analyze", r#"{"text":123}"#)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["detail"][0]["type"], "string_type");
}

#[tokio::test]
async fn test_analyze_malformed_json_rejected() {
    let response = send(app(), post_json("/analyze", r#"{"text": "unterminated"#)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["detail"][0]["type"], "json_invalid");
    assert_eq!(body["detail"][0]["loc"], json!(["body"]));
}

#[tokio::test]
async fn test_analyze_without_content_type_reads_json() {
    let request = Request::post("/analyze")
        .body(Body::from(r#"{"text":"hi there"}"#))
        .unwrap();
    let response = send(app(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let result: AnalyzeResponse = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(result.original_text, "hi there");
    assert_eq!(result.word_count, 2);
    assert_eq!(result.character_count, 8);
}

#[tokio::test]
async fn test_analyze_empty_body_is_missing() {
    let response = send(app(), post_json("/analyze", Body::empty())).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json_body(response).await,
        json!({
            "detail": [{ "type": "missing", "loc": ["body"], "msg": "Field required" }]
        })
    );
}

#[tokio::test]
async fn test_analyze_non_json_content_type_rejected() {
    let request = Request::post("/analyze")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"text":"hello"}"#))
        .unwrap();
    let response = send(app(), request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json_body(response).await["detail"][0]["type"],
        "model_attributes_type"
    );
}

#[tokio::test]
async fn test_analyze_non_object_body_rejected() {
    let response = send(app(), post_json("/analyze", r#"["hello"]"#)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json_body(response).await["detail"][0]["type"],
        "model_attributes_type"
    );
}

#[tokio::test]
async fn test_analyze_body_over_limit_rejected() {
    let mut config = AppConfig::default();
    config.analyze.max_body_bytes = 32;
    let app = create_router(&config);

    let text = "word ".repeat(20);
    let response = send(app, post_json("/analyze", json!({ "text": text }).to_string())).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        json_body(response).await,
        json!({ "detail": "Request body too large" })
    );
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let response = send(app(), Request::get("/nope").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "detail": "Not Found" }));
}

#[tokio::test]
async fn test_wrong_method_not_allowed() {
    let response = send(app(), Request::get("/analyze").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_responses_carry_request_id_and_server_headers() {
    let first = send(app(), Request::get("/healthz").body(Body::empty()).unwrap()).await;
    let second = send(app(), post_json("/analyze", r#"{"text":""}"#)).await;

    let first_id = first.headers()["x-request-id"].to_str().unwrap().to_string();
    let second_id = second.headers()["x-request-id"].to_str().unwrap().to_string();
    assert_eq!(first_id.len(), 36);
    assert_ne!(first_id, second_id);

    let server = first.headers()[header::SERVER].to_str().unwrap();
    assert!(server.starts_with("insight-agent/"));
}
