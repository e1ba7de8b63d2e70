//! Webhook test helpers
//!
//! Builds reporter configurations aimed at a `wiremock::MockServer` and
//! starts reporters with an in-memory console.

use wiremock::MockServer;
use xfreport::backend::reporting::{ErrorReporter, MemoryConsole, RemoteWorker};
use xfreport::shared::ReporterConfig;

/// Version string every test reporter puts in its User-Agent
pub const TEST_VERSION: &str = "1.2.3";

/// Configuration posting to `<server>/hook` with a fixed, non-refilling quota
pub fn webhook_config(server: &MockServer, quota: u32) -> ReporterConfig {
    config_for_url(&format!("{}/hook", server.uri()), quota)
}

/// Configuration posting to an arbitrary URL
pub fn config_for_url(url: &str, quota: u32) -> ReporterConfig {
    ReporterConfig::builder()
        .app_version(TEST_VERSION)
        .webhook_url(url)
        .expect("test webhook URL is valid")
        .submission_quota(quota)
        .refill_secs(0)
        .build()
        .expect("test configuration is valid")
}

/// Start a reporter whose console output lands in `console`
pub fn spawn_reporter(config: ReporterConfig, console: &MemoryConsole) -> (ErrorReporter, RemoteWorker) {
    ErrorReporter::builder(config)
        .console(console.clone())
        .spawn()
}
