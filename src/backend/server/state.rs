/**
 * Application State Management
 *
 * This module defines the application state shared by every request handler
 * and the `FromRef` implementation that lets handlers extract the error
 * reporter on its own.
 *
 * # Thread Safety
 *
 * `ErrorReporter` is an `Arc` handle, so cloning `AppState` per request is
 * cheap and every clone reports into the same console sink, budget and
 * remote worker.
 *
 * # Example
 *
 * ```rust
 * use axum::extract::State;
 * use xfreport::backend::error::{ApiError, ErrorTemplate};
 * use xfreport::backend::reporting::ErrorReporter;
 *
 * async fn handler(State(reporter): State<ErrorReporter>) -> Result<(), ApiError> {
 *     Err(ErrorTemplate::UNAUTHORIZED.create(&reporter, None))
 * }
 * ```
 */

use axum::extract::FromRef;

use crate::backend::reporting::ErrorReporter;

/// Application state
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Reporter used by every handler that constructs an `ApiError`
    pub reporter: ErrorReporter,
}

impl AppState {
    pub fn new(reporter: ErrorReporter) -> Self {
        Self { reporter }
    }
}

impl FromRef<AppState> for ErrorReporter {
    fn from_ref(state: &AppState) -> Self {
        state.reporter.clone()
    }
}
