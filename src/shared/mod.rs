//! Shared Module
//!
//! This module contains the types shared by every part of the reporter:
//! logging modes, reporter configuration and the errors of the reporting
//! path itself.
//!
//! # Overview
//!
//! None of these types touch the network or the HTTP layer. They are plain
//! values that are resolved at startup or chosen at an error's call site.

/// Logging modes
pub mod mode;

/// Reporting-path error types
pub mod error;

/// Reporter configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use mode::LoggingMode;
pub use error::ReportingError;
pub use config::{ConfigError, ReporterConfig, ReporterConfigBuilder};

/// Operator-only structured context attached to a reported error
pub type Details = serde_json::Map<String, serde_json::Value>;
