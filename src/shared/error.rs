//! Reporting Error Types
//!
//! This module defines the errors that can occur while *reporting* an error:
//! submitting an incident to the remote channel or serializing its payload.
//!
//! These errors never reach the code that constructed the original
//! `ApiError`. The remote worker consumes them and writes a console
//! diagnostic instead.
//!
//! # Error Categories
//!
//! - `Transport` - The HTTP request to the webhook endpoint failed
//! - `Serialization` - The incident payload could not be serialized
//! - `WorkerStopped` - The remote worker is no longer accepting incidents
//!
//! # Thread Safety
//!
//! All error types are `Send + Sync` and can be safely moved into the worker task.
use thiserror::Error;

/// Failures on the reporting path itself
#[derive(Debug, Error)]
pub enum ReportingError {
    /// The webhook request could not be sent or its response could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The remote worker has shut down and dropped its receiver
    #[error("remote worker stopped")]
    WorkerStopped,
}
