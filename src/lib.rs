//! XFReport - Error Reporting Library
//!
//! XFReport turns failures inside a web service into uniform, HTTP-aware
//! errors and decides where each one is surfaced: to the client, to the
//! operator console, to a remote incident webhook, or nowhere.
//!
//! # Overview
//!
//! - `ApiError` carries a status, a client-safe message, internal details
//!   and a stack trace
//! - `ErrorTemplate` names recurring error kinds once
//! - `ErrorReporter` writes console entries and queues remote incidents
//! - `WebhookClient` posts incidents to a Discord-style webhook
//! - `SubmissionBudget` keeps the webhook from being flooded
//!
//! # Module Structure
//!
//! - **`shared`** - logging modes, configuration, reporting-path errors
//! - **`backend`** - error types, reporting engine, Axum host
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - the Axum host (`backend::server`) and the
//!   `xfreport-server` binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::http::StatusCode;
//! use xfreport::backend::error::{ApiError, ErrorTemplate};
//! use xfreport::backend::reporting::ErrorReporter;
//! use xfreport::shared::{LoggingMode, ReporterConfig};
//!
//! # async fn example() {
//! let config = ReporterConfig::from_env().unwrap_or_default();
//! let (reporter, worker) = ErrorReporter::builder(config).spawn();
//!
//! let missing = ErrorTemplate::NOT_FOUND.create(&reporter, None);
//! assert_eq!(missing.http_code(), StatusCode::NOT_FOUND);
//!
//! let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
//! let fault = ApiError::from_failure(&reporter, &io, StatusCode::INTERNAL_SERVER_ERROR, LoggingMode::Both, None);
//! assert_eq!(fault.message(), "An error occurred");
//!
//! drop(reporter);
//! worker.join().await;
//! # }
//! ```
//!
//! # Error Handling
//!
//! Reporting never fails the code that raised the error. Problems while
//! posting to the webhook are written to the console as diagnostics.

/// Shared types and data structures
pub mod shared;

/// Error types, reporting engine and server host
pub mod backend;
