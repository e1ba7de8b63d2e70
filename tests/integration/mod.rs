//! Integration tests
//!
//! End-to-end behaviour of the reporter against a mock webhook and of the
//! Axum host.

mod reporting_test;
mod router_test;
