//! Reporting Module
//!
//! Everything that happens after an `ApiError` is constructed: console
//! entries, the remote incident channel and the budget protecting it.
//!
//! # Module Structure
//!
//! ```text
//! reporting/
//! ├── mod.rs        - Module exports
//! ├── dispatcher.rs - ErrorReporter and the remote worker
//! ├── console.rs    - Console sinks and entry formatting
//! ├── webhook.rs    - Remote channel HTTP client
//! └── budget.rs     - Remote submission budget
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use xfreport::backend::reporting::ErrorReporter;
//! use xfreport::shared::ReporterConfig;
//!
//! # async fn example() -> Result<(), xfreport::shared::ConfigError> {
//! let config = ReporterConfig::from_env()?;
//! let (reporter, worker) = ErrorReporter::builder(config).spawn();
//! // hand `reporter` to the router state ...
//! drop(reporter);
//! worker.join().await;
//! # Ok(())
//! # }
//! ```

/// Error dispatcher
pub mod dispatcher;

/// Console channel
pub mod console;

/// Remote channel client
pub mod webhook;

/// Remote submission budget
pub mod budget;

pub use dispatcher::{ErrorReporter, RemoteWorker, ReporterBuilder};
pub use console::{ConsoleSink, TracingConsole};
#[cfg(any(test, feature = "test-util"))]
pub use console::MemoryConsole;
pub use webhook::{Incident, WebhookClient};
pub use budget::{Permit, SubmissionBudget};
