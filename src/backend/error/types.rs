/**
 * Reported Error Type
 *
 * `ApiError` is the value that travels up the request pipeline when
 * something goes wrong. It carries two facets:
 *
 * - **Public**: `http_code` and `message`, the only fields ever written to a
 *   client response
 * - **Internal**: `internal_details` and `stack_trace`, for operators only
 *
 * # Construction
 *
 * - `ApiError::new` - full control over code, message, mode, details, stack
 * - `ApiError::from_failure` - wrap a caught error; its text is demoted to
 *   internal details and the public message becomes "An error occurred"
 * - `ApiError::create_named` / `ErrorTemplate::create` - from the catalog
 *
 * Every construction reports itself through the given `ErrorReporter`
 * according to its logging mode. Reporting never fails the construction.
 */

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;

use axum::http::StatusCode;
use serde_json::Value;

use crate::backend::error::catalog::ErrorTemplate;
use crate::backend::reporting::ErrorReporter;
use crate::shared::{Details, LoggingMode};

/// Public message used whenever the real cause must stay internal
pub const GENERIC_MESSAGE: &str = "An error occurred";

/// Details key under which a wrapped failure's text is stored
pub const FAILURE_MESSAGE_KEY: &str = "message";

/// Details key under which a wrapped failure's source chain is stored
pub const FAILURE_CAUSES_KEY: &str = "causes";

/// An error reported to the client and, depending on its mode, to operators
///
/// Immutable once constructed.
#[derive(Debug, Clone)]
pub struct ApiError {
    http_code: StatusCode,
    message: String,
    internal_details: Option<Details>,
    stack_trace: Option<Vec<String>>,
}

impl ApiError {
    /// Construct an error and report it
    ///
    /// When `stack_trace` is `None` a backtrace is captured here, which only
    /// yields frames when backtraces are enabled (`RUST_BACKTRACE`). An empty
    /// message is replaced by [`GENERIC_MESSAGE`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use axum::http::StatusCode;
    /// use xfreport::backend::error::ApiError;
    /// use xfreport::backend::reporting::ErrorReporter;
    /// use xfreport::shared::LoggingMode;
    ///
    /// let reporter = ErrorReporter::disabled();
    /// let err = ApiError::new(&reporter, StatusCode::CONFLICT, "Name taken", LoggingMode::Off, None, None);
    /// assert_eq!(err.http_code(), StatusCode::CONFLICT);
    /// ```
    pub fn new(
        reporter: &ErrorReporter,
        http_code: StatusCode,
        message: impl Into<String>,
        mode: LoggingMode,
        internal_details: Option<Details>,
        stack_trace: Option<Vec<String>>,
    ) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = GENERIC_MESSAGE.to_string();
        }

        let error = Self {
            http_code,
            message,
            internal_details,
            stack_trace: stack_trace.or_else(capture_stack),
        };

        reporter.report(
            error.http_code,
            &error.message,
            mode,
            error.internal_details.as_ref(),
            error.stack_trace.as_deref(),
        );

        error
    }

    /// Wrap a caught failure
    ///
    /// The failure's text goes into the internal details under `message`,
    /// or under `message_<unix millis>` if the caller already used that key.
    /// Its `source()` chain, if any, is stored under `causes`. The public
    /// message is always [`GENERIC_MESSAGE`].
    pub fn from_failure<E>(
        reporter: &ErrorReporter,
        failure: &E,
        http_code: StatusCode,
        mode: LoggingMode,
        internal_details: Option<Details>,
    ) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut details = internal_details.unwrap_or_default();

        let failure_message = failure.to_string();
        if !failure_message.is_empty() {
            insert_unique(&mut details, FAILURE_MESSAGE_KEY, Value::String(failure_message));
        }

        let causes = source_chain(failure);
        if !causes.is_empty() {
            insert_unique(&mut details, FAILURE_CAUSES_KEY, Value::from(causes));
        }

        let details = (!details.is_empty()).then_some(details);
        Self::new(reporter, http_code, GENERIC_MESSAGE, mode, details, None)
    }

    /// Wrap a caught failure as an unexpected server fault
    ///
    /// Same as [`ApiError::from_failure`] with `500` and [`LoggingMode::Both`].
    pub fn from_failure_default<E>(reporter: &ErrorReporter, failure: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self::from_failure(
            reporter,
            failure,
            StatusCode::INTERNAL_SERVER_ERROR,
            LoggingMode::Both,
            None,
        )
    }

    /// Construct an error from the catalog template called `name`
    ///
    /// # Panics
    ///
    /// Panics if no template has that name. Template names are fixed at
    /// compile time, so this is a wiring defect, not a runtime condition.
    pub fn create_named(
        reporter: &ErrorReporter,
        name: &str,
        internal_details: Option<Details>,
    ) -> Self {
        let template = ErrorTemplate::by_name(name)
            .unwrap_or_else(|| panic!("unknown error template `{}`", name));
        template.create(reporter, internal_details)
    }

    /// HTTP status to send to the client
    pub fn http_code(&self) -> StatusCode {
        self.http_code
    }

    /// Client-safe message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Operator-only context; never send this to a client
    pub fn internal_details(&self) -> Option<&Details> {
        self.internal_details.as_ref()
    }

    /// Captured stack frames; never send these to a client
    pub fn stack_trace(&self) -> Option<&[String]> {
        self.stack_trace.as_deref()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

/// Convert fallible results into reported `ApiError`s
///
/// ```rust,no_run
/// use xfreport::backend::error::{ApiError, ReportExt};
/// use xfreport::backend::reporting::ErrorReporter;
///
/// fn load(reporter: &ErrorReporter) -> Result<String, ApiError> {
///     std::fs::read_to_string("accounts.json").or_report(reporter)
/// }
/// ```
pub trait ReportExt<T> {
    /// Report a failure as a 500 logged to console and remote channel
    fn or_report(self, reporter: &ErrorReporter) -> Result<T, ApiError>;

    /// Report a failure with an explicit status and mode
    fn or_report_with(
        self,
        reporter: &ErrorReporter,
        http_code: StatusCode,
        mode: LoggingMode,
    ) -> Result<T, ApiError>;
}

impl<T, E> ReportExt<T> for Result<T, E>
where
    E: std::error::Error,
{
    fn or_report(self, reporter: &ErrorReporter) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::from_failure_default(reporter, &e))
    }

    fn or_report_with(
        self,
        reporter: &ErrorReporter,
        http_code: StatusCode,
        mode: LoggingMode,
    ) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::from_failure(reporter, &e, http_code, mode, None))
    }
}

/// Insert `value` under `key`, or under a timestamped variant if `key` is taken
///
/// Returns the key that was used.
pub fn insert_unique(details: &mut Details, key: &str, value: Value) -> String {
    let key = unique_key(details, key, chrono::Utc::now().timestamp_millis());
    details.insert(key.clone(), value);
    key
}

fn unique_key(details: &Details, key: &str, token: i64) -> String {
    if !details.contains_key(key) {
        return key.to_string();
    }

    let stamped = format!("{}_{}", key, token);
    if !details.contains_key(&stamped) {
        return stamped;
    }

    (1u32..)
        .map(|n| format!("{}_{}", stamped, n))
        .find(|candidate| !details.contains_key(candidate))
        .unwrap_or(stamped)
}

fn source_chain<E>(failure: &E) -> Vec<String>
where
    E: std::error::Error + ?Sized,
{
    let mut causes = Vec::new();
    let mut current = failure.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes
}

fn capture_stack() -> Option<Vec<String>> {
    let backtrace = Backtrace::capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return None;
    }

    let frames: Vec<String> = backtrace
        .to_string()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    (!frames.is_empty()).then_some(frames)
}
