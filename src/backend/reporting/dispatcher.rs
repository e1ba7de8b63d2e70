/**
 * Error Dispatcher
 *
 * `ErrorReporter` is the engine behind every `ApiError` construction. Given
 * a report and a logging mode it writes the console entry and hands the
 * incident to the remote channel.
 *
 * # Pipeline
 *
 * 1. `Off` returns immediately.
 * 2. Console modes write one `[Error]` entry synchronously.
 * 3. Remote modes check that a webhook is configured, take one unit from the
 *    `SubmissionBudget`, and push an `Incident` onto an unbounded channel.
 *    If the worker is gone the unit is handed back.
 *
 * The console write always happens before the incident is queued. Nothing
 * in `report` awaits, and nothing in it can fail back into the caller. A
 * console sink that panics loses its entry; the panic does not unwind into
 * the caller.
 *
 * # Remote Worker
 *
 * A background task (`RemoteWorker`) drains the channel. Every incident is
 * posted on its own task, so a slow endpoint never holds up later
 * incidents. The outcome of each post is only logged:
 *
 * - `Remote channel responded (<status>): <body>` on completion
 * - `Remote channel submission failed: <reason>` on transport failure
 *
 * The worker also lowers the budget to the endpoint's
 * `X-RateLimit-Remaining` value when one is returned, until the endpoint's
 * `X-RateLimit-Reset-After` delay has passed.
 *
 * # Thread Safety
 *
 * `ErrorReporter` is a cheap `Arc` clone and can be stored in axum state.
 * The budget is atomic, so errors raised on different worker threads at
 * the same instant cannot spend the same submission twice.
 */

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use crate::backend::reporting::budget::{Permit, SubmissionBudget};
use crate::backend::reporting::console::{format_entry, ConsoleSink, TracingConsole, CONSOLE_TARGET};
use crate::backend::reporting::webhook::{Incident, WebhookClient};
use crate::shared::{Details, LoggingMode, ReporterConfig, ReportingError};

/// Dispatches reported errors to the console and the remote channel
#[derive(Clone)]
pub struct ErrorReporter {
    inner: Arc<ReporterInner>,
}

struct ReporterInner {
    console: Arc<dyn ConsoleSink>,
    budget: Arc<SubmissionBudget>,
    remote: Option<mpsc::UnboundedSender<Queued>>,
}

type Queued = (Incident, Permit);

impl ErrorReporter {
    /// Reporter that writes console entries through `tracing` and never
    /// submits remotely
    pub fn disabled() -> Self {
        Self::from_parts(
            Arc::new(TracingConsole),
            Arc::new(SubmissionBudget::default()),
            None,
        )
    }

    /// Start building a reporter from resolved configuration
    pub fn builder(config: ReporterConfig) -> ReporterBuilder {
        ReporterBuilder {
            config,
            console: None,
            budget: None,
            client: None,
        }
    }

    fn from_parts(
        console: Arc<dyn ConsoleSink>,
        budget: Arc<SubmissionBudget>,
        remote: Option<mpsc::UnboundedSender<Queued>>,
    ) -> Self {
        Self {
            inner: Arc::new(ReporterInner {
                console,
                budget,
                remote,
            }),
        }
    }

    /// Report one error occurrence
    ///
    /// Never blocks on I/O and never fails. Problems on the reporting path
    /// are written to the console as diagnostics and go no further.
    pub fn report(
        &self,
        http_code: StatusCode,
        message: &str,
        mode: LoggingMode,
        details: Option<&Details>,
        stack: Option<&[String]>,
    ) {
        if mode == LoggingMode::Off {
            return;
        }

        if mode.console() {
            let entry = format_entry(message, stack, details, Utc::now());
            self.write_console(|console| console.error(&entry));
        }

        if mode.remote() {
            self.submit_remote(http_code, message, details);
        }
    }

    fn submit_remote(&self, http_code: StatusCode, message: &str, details: Option<&Details>) {
        let Some(remote) = &self.inner.remote else {
            tracing::debug!(target: CONSOLE_TARGET, "No remote channel configured, skipping submission");
            return;
        };

        let Some(permit) = self.inner.budget.try_acquire() else {
            tracing::debug!(
                target: CONSOLE_TARGET,
                http_code = http_code.as_u16(),
                "Remote submission budget exhausted, skipping submission"
            );
            return;
        };

        let incident = Incident {
            http_code: http_code.as_u16(),
            message: message.to_string(),
            details: details.cloned(),
        };

        if remote.send((incident, permit)).is_err() {
            self.inner.budget.release(permit);
            let line = format!("Remote channel submission failed: {}", ReportingError::WorkerStopped);
            self.write_console(|console| console.diagnostic(&line));
        }
    }

    fn write_console(&self, write: impl FnOnce(&dyn ConsoleSink)) {
        let console = self.inner.console.as_ref();
        if panic::catch_unwind(AssertUnwindSafe(|| write(console))).is_err() {
            tracing::warn!(target: CONSOLE_TARGET, "Console sink panicked, entry dropped");
        }
    }

    /// Budget shared with the remote channel
    pub fn budget(&self) -> &Arc<SubmissionBudget> {
        &self.inner.budget
    }

    /// Whether remote submissions can happen at all
    pub fn remote_enabled(&self) -> bool {
        self.inner.remote.is_some()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorReporter")
            .field("remote_enabled", &self.remote_enabled())
            .field("budget_remaining", &self.inner.budget.remaining())
            .finish()
    }
}

/// Builder for `ErrorReporter`
pub struct ReporterBuilder {
    config: ReporterConfig,
    console: Option<Arc<dyn ConsoleSink>>,
    budget: Option<Arc<SubmissionBudget>>,
    client: Option<WebhookClient>,
}

impl ReporterBuilder {
    /// Replace the tracing console sink
    pub fn console<C: ConsoleSink + 'static>(mut self, console: C) -> Self {
        self.console = Some(Arc::new(console));
        self
    }

    /// Share an existing budget instead of creating one from the config
    pub fn budget(mut self, budget: Arc<SubmissionBudget>) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Replace the webhook client built from the config
    pub fn client(mut self, client: WebhookClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the reporter and start its remote worker
    ///
    /// The worker is only started when a webhook client is available. It
    /// needs a Tokio runtime; outside of one the remote channel is disabled
    /// with a diagnostic instead of panicking.
    pub fn spawn(self) -> (ErrorReporter, RemoteWorker) {
        let console = self.console.unwrap_or_else(|| Arc::new(TracingConsole));
        let budget = self.budget.unwrap_or_else(|| {
            Arc::new(match self.config.refill_window {
                Some(window) => SubmissionBudget::with_refill(self.config.submission_quota, window),
                None => SubmissionBudget::new(self.config.submission_quota),
            })
        });
        let client = self.client.or_else(|| WebhookClient::from_config(&self.config));

        let Some(client) = client else {
            tracing::info!(target: CONSOLE_TARGET, "Remote error reporting disabled (no webhook URL)");
            let reporter = ErrorReporter::from_parts(console, budget, None);
            return (reporter, RemoteWorker { handle: None });
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                console.diagnostic(&format!("Remote channel disabled, no async runtime: {}", e));
                let reporter = ErrorReporter::from_parts(console, budget, None);
                return (reporter, RemoteWorker { handle: None });
            }
        };

        tracing::info!(
            target: CONSOLE_TARGET,
            endpoint = %client.endpoint().host_str().unwrap_or("-"),
            quota = budget.quota(),
            "Remote error reporting enabled"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = runtime.spawn(run_worker(rx, client, Arc::clone(&console), Arc::clone(&budget)));
        let reporter = ErrorReporter::from_parts(console, budget, Some(tx));

        (reporter, RemoteWorker { handle: Some(handle) })
    }
}

/// Handle to the background task that posts incidents
///
/// Dropping the handle detaches the task; it keeps running until every
/// `ErrorReporter` clone is gone.
#[derive(Debug)]
pub struct RemoteWorker {
    handle: Option<JoinHandle<()>>,
}

impl RemoteWorker {
    /// Whether a worker task was started
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Wait until every queued incident has been posted
    ///
    /// Resolves once all `ErrorReporter` clones have been dropped and the
    /// queue is drained.
    pub async fn join(self) {
        if let Some(handle) = self.handle {
            if let Err(e) = handle.await {
                tracing::warn!(target: CONSOLE_TARGET, "Remote worker ended abnormally: {}", e);
            }
        }
    }

    /// Stop the worker, dropping queued and in-flight incidents
    pub fn abort(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Queued>,
    client: WebhookClient,
    console: Arc<dyn ConsoleSink>,
    budget: Arc<SubmissionBudget>,
) {
    let client = Arc::new(client);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            incident = rx.recv() => {
                let Some((incident, permit)) = incident else { break };
                let client = Arc::clone(&client);
                let console = Arc::clone(&console);
                let budget = Arc::clone(&budget);
                in_flight.spawn(async move {
                    post_incident(&client, &incident, permit, console.as_ref(), &budget).await;
                });
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }

    while in_flight.join_next().await.is_some() {}
    tracing::debug!(target: CONSOLE_TARGET, "Remote worker stopped");
}

async fn post_incident(
    client: &WebhookClient,
    incident: &Incident,
    permit: Permit,
    console: &dyn ConsoleSink,
    budget: &SubmissionBudget,
) {
    match client.submit(incident).await {
        Ok(response) => {
            if let Some(remaining) = response.rate_limit_remaining {
                budget.apply_rate_limit(permit, remaining, response.rate_limit_reset_after);
            }
            console.info(&format!(
                "Remote channel responded ({}): {}",
                response.status, response.body
            ));
        }
        Err(e) => {
            console.diagnostic(&format!("Remote channel submission failed: {}", e));
        }
    }
}
