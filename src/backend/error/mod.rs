//! Backend Error Module
//!
//! This module defines the error value that route handlers return and the
//! catalog of recurring error kinds.
//!
//! # Architecture
//!
//! The error module is organized into focused submodules:
//!
//! - **`types`** - `ApiError`, its constructors and `ReportExt`
//! - **`catalog`** - `ErrorTemplate` constants and lookup by name
//! - **`conversion`** - `IntoResponse` for `ApiError`
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - ApiError definition and construction
//! ├── catalog.rs    - Error templates
//! └── conversion.rs - HTTP response conversion
//! ```
//!
//! # Reporting
//!
//! Constructing an `ApiError` reports it through an `ErrorReporter`
//! (see `backend::reporting`). Handlers only decide the status, the message
//! and the logging mode; where the report goes is the reporter's concern.
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::extract::State;
//! use xfreport::backend::error::{ApiError, ErrorTemplate};
//! use xfreport::backend::reporting::ErrorReporter;
//!
//! async fn handler(State(reporter): State<ErrorReporter>) -> Result<String, ApiError> {
//!     Err(ErrorTemplate::FORBIDDEN.create(&reporter, None))
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error templates
pub mod catalog;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{ApiError, ReportExt, GENERIC_MESSAGE};
pub use catalog::ErrorTemplate;
