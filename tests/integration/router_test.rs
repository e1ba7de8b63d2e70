//! Router integration tests
//!
//! Exercise the Axum host: catalog fallbacks and handlers that return
//! `ApiError`.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use xfreport::backend::error::{ApiError, ReportExt};
use xfreport::backend::reporting::{ErrorReporter, MemoryConsole};
use xfreport::backend::server::{create_router, create_router_with, AppState};
use xfreport::shared::ReporterConfig;

fn recording_state() -> (AppState, MemoryConsole) {
    let console = MemoryConsole::new();
    let (reporter, _worker) = ErrorReporter::builder(ReporterConfig::default())
        .console(console.clone())
        .spawn();
    (AppState::new(reporter), console)
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn load_account(State(reporter): State<ErrorReporter>) -> Result<String, ApiError> {
    std::fs::read_to_string("/definitely/not/here/account.json").or_report(&reporter)
}

#[tokio::test]
async fn test_unknown_route_is_catalog_not_found() {
    let (state, console) = recording_state();
    let app = create_router(state);

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"error": "Not found", "status": 404}));
    assert!(console.errors().is_empty());
}

#[tokio::test]
async fn test_wrong_method_is_method_not_allowed() {
    let (state, _console) = recording_state();
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Method not allowed", "status": 405})
    );
}

#[tokio::test]
async fn test_health() {
    let (state, _console) = recording_state();
    let app = create_router(state);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_handler_failure_is_generic_500_and_logged() {
    let (state, console) = recording_state();
    let routes = Router::new().route("/account", get(load_account));
    let app = create_router_with(routes, state);

    let response = app
        .oneshot(Request::builder().uri("/account").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body, json!({"error": "An error occurred", "status": 500}));
    assert!(!body.to_string().contains("account.json"));

    let errors = console.errors();
    assert_eq!(errors.len(), 1);
    assert_starts_with!(errors[0], "[Error] An error occurred (");
}
