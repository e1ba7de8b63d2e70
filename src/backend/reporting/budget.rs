/**
 * Remote Submission Budget
 *
 * This module limits how many incidents are sent to the remote channel.
 * The budget is a counter owned by whoever builds the reporter and shared
 * with it through an `Arc`; it is never a hidden global.
 *
 * # Concurrency
 *
 * Errors may be constructed from any Tokio worker thread at the same time.
 * The counter and the window it belongs to live in one atomic word, so a
 * decrement and a refill can never interleave: a burst of errors can never
 * spend more than the remaining budget, and a refill never erases a
 * decrement made in the new window.
 *
 * # Refill
 *
 * With a refill window configured, time is cut into fixed windows counted
 * from the budget's creation. The first acquire in a new window resets the
 * counter to the quota.
 *
 * # Endpoint Rate Limits
 *
 * Every successful acquire returns a `Permit` naming its window. The permit
 * is used to hand the unit back when the incident never left the process,
 * and to apply the endpoint's own rate limit. A rate limit only clamps the
 * window it was earned in, and the withheld units come back once the
 * endpoint's reset delay has passed.
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::shared::config::DEFAULT_REFILL_WINDOW;

/// One unit taken from the budget in a given window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permit {
    window: u32,
}

/// Process-wide allowance of remote submissions
#[derive(Debug)]
pub struct SubmissionBudget {
    quota: u32,
    window: Option<Duration>,
    epoch: Instant,
    /// `(window index, remaining)`
    state: AtomicU64,
    /// `(window index, units held back by an endpoint rate limit)`
    withheld: AtomicU64,
    /// Milliseconds since `epoch` until which withheld units stay held
    hold_until: AtomicU64,
}

fn pack(window: u32, count: u32) -> u64 {
    (u64::from(window) << 32) | u64::from(count)
}

fn unpack(word: u64) -> (u32, u32) {
    ((word >> 32) as u32, word as u32)
}

impl SubmissionBudget {
    /// Create a budget that is never refilled
    pub fn new(quota: u32) -> Self {
        Self::build(quota, None)
    }

    /// Create a budget that is reset to `quota` every `window`
    pub fn with_refill(quota: u32, window: Duration) -> Self {
        Self::build(quota, Some(window))
    }

    fn build(quota: u32, window: Option<Duration>) -> Self {
        Self {
            quota,
            window,
            epoch: Instant::now(),
            state: AtomicU64::new(pack(0, quota)),
            withheld: AtomicU64::new(pack(0, 0)),
            hold_until: AtomicU64::new(0),
        }
    }

    /// Take one submission from the budget
    ///
    /// Returns `false` without changing anything when the budget is spent.
    pub fn try_consume(&self) -> bool {
        self.try_acquire().is_some()
    }

    /// Take one submission and return the permit for it
    pub fn try_acquire(&self) -> Option<Permit> {
        self.try_acquire_at(Instant::now())
    }

    pub(crate) fn try_acquire_at(&self, now: Instant) -> Option<Permit> {
        self.lift_expired_hold(now);
        let current = self.window_at(now);

        let previous = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                let (window, left) = unpack(word);
                if current > window {
                    self.quota.checked_sub(1).map(|left| pack(current, left))
                } else {
                    left.checked_sub(1).map(|left| pack(window, left))
                }
            })
            .ok()?;

        let (window, _) = unpack(previous);
        if current > window {
            tracing::debug!(
                target: "error_report",
                quota = self.quota,
                "Remote submission budget refilled"
            );
        }

        Some(Permit {
            window: window.max(current),
        })
    }

    /// Hand back a unit whose incident was never submitted
    ///
    /// Ignored once the permit's window is over, and never raises the
    /// counter above the quota.
    pub fn release(&self, permit: Permit) {
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                let (window, left) = unpack(word);
                (window == permit.window && left < self.quota).then(|| pack(window, left + 1))
            });
    }

    /// Submissions left in the current window
    ///
    /// Returns withheld units first if their hold has expired.
    pub fn remaining(&self) -> u32 {
        self.remaining_at(Instant::now())
    }

    pub(crate) fn remaining_at(&self, now: Instant) -> u32 {
        self.lift_expired_hold(now);
        let (window, left) = unpack(self.state.load(Ordering::Acquire));
        if self.window_at(now) > window {
            self.quota
        } else {
            left
        }
    }

    pub fn quota(&self) -> u32 {
        self.quota
    }

    /// Restore the full quota in the current window
    pub fn reset(&self) {
        let now = Instant::now();
        self.withheld.store(pack(0, 0), Ordering::Release);
        self.state.store(pack(self.window_at(now), self.quota), Ordering::Release);
    }

    /// Lower the counter to the endpoint's reported allowance
    ///
    /// `permit` is the unit the reporting submission was sent with; a limit
    /// from an earlier window is ignored. The units taken away come back
    /// after `reset_after`, or after one refill window when the endpoint
    /// sent no delay.
    pub fn apply_rate_limit(&self, permit: Permit, limit: u32, reset_after: Option<Duration>) {
        self.apply_rate_limit_at(permit, limit, reset_after, Instant::now());
    }

    pub(crate) fn apply_rate_limit_at(
        &self,
        permit: Permit,
        limit: u32,
        reset_after: Option<Duration>,
        now: Instant,
    ) {
        let Ok(previous) = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                let (window, left) = unpack(word);
                (window == permit.window && left > limit).then(|| pack(window, limit))
            })
        else {
            return;
        };

        let (_, left) = unpack(previous);
        let hold = reset_after
            .or(self.window)
            .unwrap_or(DEFAULT_REFILL_WINDOW);
        let until = self
            .millis_since_epoch(now)
            .saturating_add(hold.as_millis() as u64);
        self.hold_until.fetch_max(until, Ordering::AcqRel);

        let _ = self
            .withheld
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                let (window, held) = unpack(word);
                let held = if window == permit.window { held } else { 0 };
                Some(pack(permit.window, held.saturating_add(left - limit)))
            });

        tracing::debug!(
            target: "error_report",
            limit,
            hold_ms = hold.as_millis() as u64,
            "Remote submission budget lowered to endpoint rate limit"
        );
    }

    fn lift_expired_hold(&self, now: Instant) {
        if self.millis_since_epoch(now) < self.hold_until.load(Ordering::Acquire) {
            return;
        }

        let (window, held) = unpack(self.withheld.swap(pack(0, 0), Ordering::AcqRel));
        if held == 0 {
            return;
        }

        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                let (current, left) = unpack(word);
                (current == window).then(|| pack(current, left.saturating_add(held).min(self.quota)))
            });
    }

    fn window_at(&self, now: Instant) -> u32 {
        let Some(window) = self.window else {
            return 0;
        };
        let length = (window.as_millis() as u64).max(1);
        u32::try_from(self.millis_since_epoch(now) / length).unwrap_or(u32::MAX)
    }

    fn millis_since_epoch(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.epoch).as_millis() as u64
    }
}

impl Default for SubmissionBudget {
    fn default() -> Self {
        Self::new(crate::shared::config::DEFAULT_SUBMISSION_QUOTA)
    }
}
