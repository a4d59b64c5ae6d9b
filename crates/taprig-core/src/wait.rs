//! Bounded polling for asynchronously rendered UI.
//!
//! UI rendering on a device is asynchronous relative to command dispatch: a
//! fixed sleep is both flaky (too short) and slow (too long). The primitive
//! here is [`poll`] — retry a fallible operation until it succeeds or a
//! deadline elapses, returning immediately on success. Every higher-level
//! wait in the crate goes through it; no other code sleeps.
//!
//! Only transient errors ([`DriverError::is_transient`]) are retried. A
//! missing element is an expected state while a screen is still rendering;
//! a malformed locator or a dead session is not, and propagates on the
//! first attempt.
//!
//! # Example
//!
//! ```no_run
//! use taprig_core::driver::DriverError;
//! use taprig_core::wait::{poll, WaitSpec};
//!
//! # async fn example() -> Result<(), DriverError> {
//! let spec = WaitSpec::with_timeout_ms(10_000).unwrap();
//! let value = poll(&spec, "result text", || async {
//!     Err::<String, _>(DriverError::NotFound("id=result".into()))
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::driver::DriverError;

/// Poll interval used when only a timeout is given.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Errors raised by [`WaitSpec`] construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitSpecError {
    /// The timeout was zero.
    #[error("wait timeout must be greater than zero")]
    ZeroTimeout,

    /// The poll interval was zero.
    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    /// The poll interval exceeded the timeout, so no retry could ever fit.
    #[error("poll interval must not exceed the timeout")]
    IntervalExceedsTimeout,
}

/// Validated timing parameters for a bounded wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSpec {
    timeout: Duration,
    poll_interval: Duration,
}

impl WaitSpec {
    /// Create a spec, validating that both durations are nonzero and that
    /// the interval does not exceed the timeout.
    pub fn new(timeout: Duration, poll_interval: Duration) -> Result<Self, WaitSpecError> {
        if timeout.is_zero() {
            return Err(WaitSpecError::ZeroTimeout);
        }
        if poll_interval.is_zero() {
            return Err(WaitSpecError::ZeroInterval);
        }
        if poll_interval > timeout {
            return Err(WaitSpecError::IntervalExceedsTimeout);
        }
        Ok(Self {
            timeout,
            poll_interval,
        })
    }

    /// Create a spec from a timeout in milliseconds, deriving the default
    /// poll interval (clamped so it never exceeds the timeout).
    pub fn with_timeout_ms(timeout_ms: u64) -> Result<Self, WaitSpecError> {
        let timeout = Duration::from_millis(timeout_ms);
        Self::new(timeout, DEFAULT_POLL_INTERVAL.min(timeout))
    }

    /// The deadline for the whole wait.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The sleep between unsuccessful attempts.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for WaitSpec {
    /// 10 seconds with the default 250 ms interval, matching the stock
    /// explicit-wait budget.
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Repeatedly invoke `attempt` until it succeeds or the deadline elapses.
///
/// On `Ok` the value is returned immediately, with no trailing sleep. On a
/// transient error the poller sleeps [`poll_interval`](WaitSpec::poll_interval)
/// and retries until elapsed time reaches [`timeout`](WaitSpec::timeout), at
/// which point it fails with [`DriverError::WaitTimeout`] carrying `subject`,
/// the elapsed time, and the last transient error observed. Any
/// non-transient error propagates immediately without retry.
///
/// `subject` is a human-readable description of what is being waited for
/// (typically a rendered [`Locator`](crate::locator::Locator)) so a failing
/// wait is diagnosable as slow render vs missing element.
pub async fn poll<T, F, Fut>(
    spec: &WaitSpec,
    subject: &str,
    mut attempt: F,
) -> Result<T, DriverError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DriverError>>,
{
    let start = Instant::now();
    let mut rounds: u32 = 0;

    loop {
        rounds += 1;
        match attempt().await {
            Ok(value) => {
                debug!(
                    subject,
                    rounds,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "wait satisfied"
                );
                return Ok(value);
            }
            Err(err) if err.is_transient() => {
                let elapsed = start.elapsed();
                if elapsed >= spec.timeout {
                    debug!(
                        subject,
                        rounds,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "wait deadline elapsed"
                    );
                    return Err(DriverError::WaitTimeout {
                        subject: subject.to_string(),
                        timeout_ms: spec.timeout.as_millis() as u64,
                        elapsed_ms: elapsed.as_millis() as u64,
                        last_error: err.to_string(),
                    });
                }
                trace!(subject, rounds, "not yet available, retrying");
                tokio::time::sleep(spec.poll_interval).await;
            }
            // Fail fast: anything other than "not yet present" is not an
            // expected transient state.
            Err(err) => return Err(err),
        }
    }
}
