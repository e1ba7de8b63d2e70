//! Error Template Catalog
//!
//! Recurring failures are declared once here and referenced by name or
//! constant, so every call site produces the same status, message and
//! logging mode.
//!
//! | Name                  | Code | Message             | Mode    |
//! |-----------------------|------|---------------------|---------|
//! | `BAD_REQUEST`         | 400  | Bad request         | off     |
//! | `UNAUTHORIZED`        | 401  | Unauthorized        | off     |
//! | `FORBIDDEN`           | 403  | Forbidden           | off     |
//! | `NOT_FOUND`           | 404  | Not found           | off     |
//! | `METHOD_NOT_ALLOWED`  | 405  | Method not allowed  | off     |
//! | `TOO_MANY_REQUESTS`   | 429  | Too many requests   | off     |
//! | `SERVER_ERROR`        | 500  | An error occurred   | both    |
//! | `SERVICE_UNAVAILABLE` | 503  | Service unavailable | console |
//!
//! # Example
//!
//! ```rust
//! use xfreport::backend::error::catalog::ErrorTemplate;
//! use xfreport::backend::reporting::ErrorReporter;
//!
//! let reporter = ErrorReporter::disabled();
//! let err = ErrorTemplate::NOT_FOUND.create(&reporter, None);
//! assert_eq!(err.http_code().as_u16(), 404);
//! ```

use axum::http::StatusCode;

use crate::backend::error::types::{ApiError, GENERIC_MESSAGE};
use crate::backend::reporting::ErrorReporter;
use crate::shared::{Details, LoggingMode};

/// A named, fixed `(code, message, mode)` triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorTemplate {
    pub name: &'static str,
    pub http_code: StatusCode,
    pub message: &'static str,
    pub default_mode: LoggingMode,
}

impl ErrorTemplate {
    pub const BAD_REQUEST: Self = Self::define("BAD_REQUEST", StatusCode::BAD_REQUEST, "Bad request", LoggingMode::Off);
    pub const UNAUTHORIZED: Self = Self::define("UNAUTHORIZED", StatusCode::UNAUTHORIZED, "Unauthorized", LoggingMode::Off);
    pub const FORBIDDEN: Self = Self::define("FORBIDDEN", StatusCode::FORBIDDEN, "Forbidden", LoggingMode::Off);
    pub const NOT_FOUND: Self = Self::define("NOT_FOUND", StatusCode::NOT_FOUND, "Not found", LoggingMode::Off);
    pub const METHOD_NOT_ALLOWED: Self =
        Self::define("METHOD_NOT_ALLOWED", StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", LoggingMode::Off);
    pub const TOO_MANY_REQUESTS: Self =
        Self::define("TOO_MANY_REQUESTS", StatusCode::TOO_MANY_REQUESTS, "Too many requests", LoggingMode::Off);
    pub const SERVER_ERROR: Self =
        Self::define("SERVER_ERROR", StatusCode::INTERNAL_SERVER_ERROR, GENERIC_MESSAGE, LoggingMode::Both);
    pub const SERVICE_UNAVAILABLE: Self =
        Self::define("SERVICE_UNAVAILABLE", StatusCode::SERVICE_UNAVAILABLE, "Service unavailable", LoggingMode::Console);

    /// Every template in the catalog
    pub const ALL: [Self; 8] = [
        Self::BAD_REQUEST,
        Self::UNAUTHORIZED,
        Self::FORBIDDEN,
        Self::NOT_FOUND,
        Self::METHOD_NOT_ALLOWED,
        Self::TOO_MANY_REQUESTS,
        Self::SERVER_ERROR,
        Self::SERVICE_UNAVAILABLE,
    ];

    const fn define(
        name: &'static str,
        http_code: StatusCode,
        message: &'static str,
        default_mode: LoggingMode,
    ) -> Self {
        Self {
            name,
            http_code,
            message,
            default_mode,
        }
    }

    /// Look a template up by name
    pub fn by_name(name: &str) -> Option<&'static ErrorTemplate> {
        CATALOG.iter().find(|template| template.name == name)
    }

    /// Build and report an error from this template
    pub fn create(&self, reporter: &ErrorReporter, internal_details: Option<Details>) -> ApiError {
        ApiError::new(
            reporter,
            self.http_code,
            self.message,
            self.default_mode,
            internal_details,
            None,
        )
    }
}

static CATALOG: [ErrorTemplate; 8] = ErrorTemplate::ALL;
