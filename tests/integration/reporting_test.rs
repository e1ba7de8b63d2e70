//! Reporting integration tests
//!
//! Drive `ApiError` construction against a wiremock webhook and check what
//! reaches the remote channel and the console.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xfreport::backend::error::{ApiError, ErrorTemplate};
use xfreport::backend::reporting::{MemoryConsole, SubmissionBudget};
use xfreport::shared::config::{DEFAULT_AVATAR_URL, DEFAULT_REPORTER_NAME};
use xfreport::shared::{Details, LoggingMode};

use crate::common::webhook::{config_for_url, TEST_VERSION};
use crate::common::{spawn_reporter, webhook_config};

async fn mount_webhook(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_remote_mode_posts_one_incident() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let console = MemoryConsole::new();
    let (reporter, worker) = spawn_reporter(webhook_config(&server, 10), &console);

    let mut details = Details::new();
    details.insert("account".to_string(), json!("42"));
    let err = ApiError::new(
        &reporter,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Database offline",
        LoggingMode::Remote,
        Some(details),
        None,
    );
    assert_eq!(err.http_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.message(), "Database offline");

    drop(reporter);
    worker.join().await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let user_agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert_starts_with!(user_agent, &format!("MC-Auth.org/{} (", TEST_VERSION));
    assert_contains!(user_agent, std::env::consts::ARCH);
    assert_contains!(user_agent, "(+https://github.com/Mc-Auth-com/Mc-Auth-Web#readme)");

    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(
        body,
        json!({
            "username": DEFAULT_REPORTER_NAME,
            "avatar_url": DEFAULT_AVATAR_URL,
            "embeds": [{
                "title": "An error occurred",
                "fields": [
                    {"name": "HTTP-Code", "value": 500, "inline": true},
                    {"name": "Message", "value": "Database offline", "inline": true},
                    {"name": "Details", "value": "```JS\n{\n  \"account\": \"42\"\n}\n```"}
                ]
            }]
        })
    );

    // Remote-only: nothing written as an error entry, only the response line.
    assert!(console.errors().is_empty());
    assert_eq!(console.infos(), vec!["Remote channel responded (204): ".to_string()]);
}

#[tokio::test]
async fn test_both_mode_writes_console_and_posts() {
    let server = MockServer::start().await;
    mount_webhook(&server, ResponseTemplate::new(200).set_body_string("{\"ok\":true}")).await;

    let console = MemoryConsole::new();
    let (reporter, worker) = spawn_reporter(webhook_config(&server, 10), &console);

    let failure = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    let err = ApiError::from_failure_default(&reporter, &failure);
    assert_eq!(err.message(), "An error occurred");

    // The console entry is written before construction returns.
    assert_eq!(console.errors().len(), 1);
    assert_starts_with!(console.errors()[0], "[Error] An error occurred (");

    drop(reporter);
    worker.join().await;

    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    assert_eq!(
        console.infos(),
        vec!["Remote channel responded (200): {\"ok\":true}".to_string()]
    );
}

#[tokio::test]
async fn test_off_mode_writes_nothing() {
    let server = MockServer::start().await;
    mount_webhook(&server, ResponseTemplate::new(204)).await;

    let console = MemoryConsole::new();
    let (reporter, worker) = spawn_reporter(webhook_config(&server, 10), &console);

    let err = ErrorTemplate::NOT_FOUND.create(&reporter, None);
    assert_eq!(err.http_code(), StatusCode::NOT_FOUND);
    assert_eq!(err.message(), "Not found");

    let budget = Arc::clone(reporter.budget());
    drop(reporter);
    worker.join().await;

    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(console.errors().is_empty());
    assert!(console.infos().is_empty());
    assert!(console.diagnostics().is_empty());
    assert_eq!(budget.remaining(), 10);
}

#[tokio::test]
async fn test_exhausted_budget_skips_remote_but_keeps_console() {
    let server = MockServer::start().await;
    mount_webhook(&server, ResponseTemplate::new(204)).await;

    let console = MemoryConsole::new();
    let (reporter, worker) = spawn_reporter(webhook_config(&server, 0), &console);

    let failure = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    let _ = ApiError::from_failure(
        &reporter,
        &failure,
        StatusCode::INTERNAL_SERVER_ERROR,
        LoggingMode::Both,
        None,
    );

    drop(reporter);
    worker.join().await;

    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(console.errors().len(), 1);
    assert!(console.diagnostics().is_empty());
}

#[tokio::test]
async fn test_budget_is_spent_per_submission() {
    let server = MockServer::start().await;
    mount_webhook(&server, ResponseTemplate::new(204)).await;

    let console = MemoryConsole::new();
    let (reporter, worker) = spawn_reporter(webhook_config(&server, 2), &console);

    for _ in 0..5 {
        let _ = ErrorTemplate::SERVER_ERROR.create(&reporter, None);
    }

    drop(reporter);
    worker.join().await;

    assert_eq!(server.received_requests().await.unwrap().len(), 2);
    assert_eq!(console.errors().len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_burst_respects_budget() {
    let server = MockServer::start().await;
    mount_webhook(&server, ResponseTemplate::new(204)).await;

    let console = MemoryConsole::new();
    let (reporter, worker) = spawn_reporter(webhook_config(&server, 5), &console);

    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let reporter = reporter.clone();
            tokio::spawn(async move {
                let _ = ApiError::new(
                    &reporter,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "burst",
                    LoggingMode::Remote,
                    None,
                    None,
                );
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    drop(reporter);
    worker.join().await;

    assert_eq!(server.received_requests().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_unreachable_endpoint_does_not_fail_construction() {
    // Nothing listens on port 1.
    let console = MemoryConsole::new();
    let (reporter, worker) = spawn_reporter(config_for_url("http://127.0.0.1:1/hook", 10), &console);

    let err = ApiError::new(
        &reporter,
        StatusCode::BAD_GATEWAY,
        "Upstream failed",
        LoggingMode::Both,
        None,
        None,
    );
    assert_eq!(err.http_code(), StatusCode::BAD_GATEWAY);
    assert_eq!(err.message(), "Upstream failed");

    drop(reporter);
    worker.join().await;

    assert_eq!(console.errors().len(), 1);
    let diagnostics = console.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_starts_with!(diagnostics[0], "Remote channel submission failed: transport error");
}

#[tokio::test]
async fn test_rate_limit_header_lowers_budget() {
    let server = MockServer::start().await;
    mount_webhook(
        &server,
        ResponseTemplate::new(204).insert_header("X-RateLimit-Remaining", "2"),
    )
    .await;

    let console = MemoryConsole::new();
    let budget = Arc::new(SubmissionBudget::new(10));
    let (reporter, worker) = xfreport::backend::reporting::ErrorReporter::builder(webhook_config(&server, 10))
        .console(console.clone())
        .budget(Arc::clone(&budget))
        .spawn();

    let _ = ErrorTemplate::SERVER_ERROR.create(&reporter, None);

    drop(reporter);
    worker.join().await;

    assert_eq!(budget.remaining(), 2);
}

#[tokio::test]
async fn test_rate_limit_is_lifted_after_reset_delay() {
    let server = MockServer::start().await;
    mount_webhook(
        &server,
        ResponseTemplate::new(204)
            .insert_header("X-RateLimit-Remaining", "0")
            .insert_header("X-RateLimit-Reset-After", "1.0"),
    )
    .await;

    let console = MemoryConsole::new();
    let (reporter, worker) = spawn_reporter(webhook_config(&server, 10), &console);
    let budget = Arc::clone(reporter.budget());

    let _ = ErrorTemplate::SERVER_ERROR.create(&reporter, None);

    drop(reporter);
    worker.join().await;

    assert_eq!(budget.remaining(), 0);
    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert_eq!(budget.remaining(), 9);
}

#[tokio::test]
async fn test_non_success_response_is_logged_not_raised() {
    let server = MockServer::start().await;
    mount_webhook(&server, ResponseTemplate::new(429).set_body_string("rate limited")).await;

    let console = MemoryConsole::new();
    let (reporter, worker) = spawn_reporter(webhook_config(&server, 10), &console);

    let _ = ErrorTemplate::SERVER_ERROR.create(&reporter, None);

    drop(reporter);
    worker.join().await;

    assert_eq!(
        console.infos(),
        vec!["Remote channel responded (429): rate limited".to_string()]
    );
    assert!(console.diagnostics().is_empty());
}
