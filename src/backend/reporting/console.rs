/**
 * Console Channel
 *
 * This module defines where console entries go and what they look like.
 *
 * # Entry Format
 *
 * Each report produces exactly one line:
 *
 * ```text
 * [Error] Not found ({"srvTime":"Fri, 16 Oct 2026 09:12:44 GMT","stack":null,"details":null})
 * ```
 *
 * The context object always carries `srvTime` (UTC, RFC 1123), `stack`
 * (frame lines or `null`) and `details` (internal details or `null`).
 *
 * # Sinks
 *
 * - `TracingConsole` - the production sink, writes through `tracing`
 * - `MemoryConsole` - keeps every line in memory, for tests (`test-util`)
 *
 * Sinks must not panic. A panicking sink loses the entry, and the reporter
 * logs a warning through `tracing` instead.
 */

#[cfg(any(test, feature = "test-util"))]
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::shared::Details;

/// Tracing target for everything the reporter writes
pub const CONSOLE_TARGET: &str = "error_report";

/// Destination for console entries and reporter diagnostics
///
/// Implementations must not panic.
pub trait ConsoleSink: Send + Sync {
    /// Write one `[Error]` report entry
    fn error(&self, entry: &str);

    /// Write an informational line, such as a remote channel response
    fn info(&self, line: &str);

    /// Write a diagnostic about a failure on the reporting path itself
    fn diagnostic(&self, line: &str);
}

/// Console sink backed by `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingConsole;

impl ConsoleSink for TracingConsole {
    fn error(&self, entry: &str) {
        tracing::error!(target: CONSOLE_TARGET, "{}", entry);
    }

    fn info(&self, line: &str) {
        tracing::info!(target: CONSOLE_TARGET, "{}", line);
    }

    fn diagnostic(&self, line: &str) {
        tracing::warn!(target: CONSOLE_TARGET, "{}", line);
    }
}

/// Console sink that records every line
///
/// Clones share the same buffers.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    errors: Arc<Mutex<Vec<String>>>,
    infos: Arc<Mutex<Vec<String>>>,
    diagnostics: Arc<Mutex<Vec<String>>>,
}

#[cfg(any(test, feature = "test-util"))]
impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report entries written so far
    pub fn errors(&self) -> Vec<String> {
        snapshot(&self.errors)
    }

    pub fn infos(&self) -> Vec<String> {
        snapshot(&self.infos)
    }

    /// Diagnostics written so far
    pub fn diagnostics(&self) -> Vec<String> {
        snapshot(&self.diagnostics)
    }
}

#[cfg(any(test, feature = "test-util"))]
impl ConsoleSink for MemoryConsole {
    fn error(&self, entry: &str) {
        push(&self.errors, entry);
    }

    fn info(&self, line: &str) {
        push(&self.infos, line);
    }

    fn diagnostic(&self, line: &str) {
        push(&self.diagnostics, line);
    }
}

// A poisoned buffer still holds valid lines.
#[cfg(any(test, feature = "test-util"))]
fn push(buffer: &Mutex<Vec<String>>, line: &str) {
    let mut lines = buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    lines.push(line.to_string());
}

#[cfg(any(test, feature = "test-util"))]
fn snapshot(buffer: &Mutex<Vec<String>>) -> Vec<String> {
    buffer
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Format a server timestamp the way HTTP dates are written
pub fn server_time(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build the single console line for a report
pub fn format_entry(
    message: &str,
    stack: Option<&[String]>,
    details: Option<&Details>,
    now: DateTime<Utc>,
) -> String {
    let context = EntryContext {
        srv_time: server_time(now),
        stack,
        details,
    };
    let context = serde_json::to_string(&context)
        .unwrap_or_else(|e| format!("{{\"contextError\":\"{}\"}}", e));

    format!("[Error] {} ({})", message, context)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryContext<'a> {
    srv_time: String,
    stack: Option<&'a [String]>,
    details: Option<&'a Details>,
}
