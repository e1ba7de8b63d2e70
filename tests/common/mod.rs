//! Common test utilities
//!
//! Shared helpers for building reporters that point at a wiremock server
//! and record their console output in memory.

#[macro_use]
pub mod assertions;
pub mod webhook;

pub use webhook::{spawn_reporter, webhook_config};
