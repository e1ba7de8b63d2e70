/**
 * Server Initialization
 *
 * This module assembles the Axum router around an `ErrorReporter`.
 *
 * # Routes
 *
 * - `GET /health` - liveness probe
 * - any unknown path - `NOT_FOUND` from the error catalog
 * - a known path with the wrong method - `METHOD_NOT_ALLOWED`
 *
 * Application routes are merged in by the embedding service through
 * `create_router_with`.
 */

use axum::{extract::State, routing::get, Router};

use crate::backend::error::{ApiError, ErrorTemplate};
use crate::backend::reporting::{ErrorReporter, RemoteWorker};
use crate::backend::server::config::load_reporter_config;
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// 1. **Load configuration**: reporter settings from file or environment
/// 2. **Start the reporter**: console sink, budget and remote worker
/// 3. **Create router**: health route and catalog-driven fallbacks
///
/// # Returns
///
/// The router and the remote worker handle. Keep the worker to drain
/// queued incidents on shutdown.
pub async fn create_app() -> (Router<()>, RemoteWorker) {
    tracing::info!("Initializing error reporting server");

    let config = load_reporter_config();
    let (reporter, worker) = ErrorReporter::builder(config).spawn();

    let app = create_router(AppState::new(reporter));
    tracing::info!("Router configured");

    (app, worker)
}

/// Create the router with only the built-in routes
pub fn create_router(app_state: AppState) -> Router<()> {
    create_router_with(Router::new(), app_state)
}

/// Add the built-in routes and fallbacks to an application router
pub fn create_router_with(routes: Router<AppState>, app_state: AppState) -> Router<()> {
    routes
        .route("/health", get(health))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(app_state)
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found(State(reporter): State<ErrorReporter>) -> ApiError {
    ErrorTemplate::NOT_FOUND.create(&reporter, None)
}

async fn method_not_allowed(State(reporter): State<ErrorReporter>) -> ApiError {
    ErrorTemplate::METHOD_NOT_ALLOWED.create(&reporter, None)
}
