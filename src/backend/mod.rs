//! Backend Module
//!
//! This module contains the server-side half of XFReport: the error value
//! handlers return, the engine that reports it, and the Axum host that wires
//! both into a running service.
//!
//! # Architecture
//!
//! - **`error`** - `ApiError`, the template catalog, HTTP response conversion
//! - **`reporting`** - `ErrorReporter`, console sinks, webhook client, budget
//! - **`server`** - state, configuration loading, router assembly (`ssr`)
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs       - Module exports and documentation
//! ├── error/       - Error types and catalog
//! ├── reporting/   - Console and remote reporting
//! └── server/      - Axum host
//! ```
//!
//! # Error Flow
//!
//! 1. A handler constructs an `ApiError` (directly, from a caught failure,
//!    or from a template)
//! 2. Construction calls `ErrorReporter::report`, which writes the console
//!    entry and queues the remote incident without waiting on it
//! 3. The handler returns the error; `IntoResponse` writes only the status
//!    and the public message
//!
//! # Thread Safety
//!
//! - `ErrorReporter` is an `Arc` handle, shareable across handlers
//! - The submission budget is updated atomically
//! - The remote worker runs on its own Tokio task

/// Backend error types
pub mod error;

/// Error reporting engine
pub mod reporting;

/// Server setup and configuration
#[cfg(feature = "ssr")]
pub mod server;

/// Re-export commonly used types
pub use error::{ApiError, ErrorTemplate, ReportExt};
pub use reporting::ErrorReporter;
#[cfg(feature = "ssr")]
pub use server::create_app;
