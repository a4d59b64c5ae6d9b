//! Session lifecycle management.
//!
//! A [`Session`] owns exactly one live remote automation session: it is
//! created before any page object is constructed and must be released after
//! the last assertion, on every exit path. [`Session::run`] is the supported
//! fixture shape: it opens a session, hands it to the async test body, and
//! closes it whether the body returns, errors, or panics. A failed assertion
//! unwinds; the fixture catches the unwind, tears the session down, then
//! resumes it so the test still fails. A teardown failure is logged but
//! never masks the body's result, which is already determined by the time
//! teardown runs.
//!
//! [`close`](Session::close) is idempotent: closing an already-closed
//! session is a no-op, not an error.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use taprig_core::config::SessionConfig;
//! use taprig_core::session::Session;
//! use taprig_core::wire::HttpDriver;
//!
//! # async fn example() -> Result<(), taprig_core::driver::DriverError> {
//! let endpoint: url::Url = "http://localhost:4723".parse().unwrap();
//! let driver = Arc::new(HttpDriver::new(endpoint.clone()));
//! let config = SessionConfig::android_settings(endpoint);
//!
//! Session::run(driver, config, |session| async move {
//!     // build page objects on `session`, interact, assert
//!     let _ = session.handle()?;
//!     Ok(())
//! })
//! .await
//! # }
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::Mutex;

use futures_util::FutureExt;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::driver::{AutomationDriver, DriverError, SessionId};

/// Exclusive owner of one remote automation session.
///
/// Never share a session across concurrent tests: the remote server treats
/// a session as exclusive to one client context, and interleaved command
/// streams have undefined ordering. Each test opens its own.
pub struct Session {
    driver: Arc<dyn AutomationDriver>,
    config: SessionConfig,
    // Taken on close; None means released. Never held across an await.
    handle: Mutex<Option<SessionId>>,
}

impl Session {
    /// Open a remote session with the given configuration.
    ///
    /// Fails with [`DriverError::SessionCreation`] if the server rejects
    /// the configuration. On success the returned session is the sole
    /// owner of the remote handle.
    pub async fn open(
        driver: Arc<dyn AutomationDriver>,
        config: SessionConfig,
    ) -> Result<Arc<Self>, DriverError> {
        let id = driver.create_session(&config).await?;
        info!(
            session = %id,
            platform = %config.platform,
            device = %config.device_id,
            backend = %config.automation_backend,
            "session opened"
        );
        Ok(Arc::new(Self {
            driver,
            config,
            handle: Mutex::new(Some(id)),
        }))
    }

    /// The driver backing this session.
    pub fn driver(&self) -> &Arc<dyn AutomationDriver> {
        &self.driver
    }

    /// The configuration this session was opened with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The live remote handle, or [`DriverError::NoSession`] once closed.
    ///
    /// A closed session is fail-fast: callers (including mid-poll waits)
    /// get the error on their next command rather than a retry loop.
    pub fn handle(&self) -> Result<SessionId, DriverError> {
        self.handle
            .lock()
            .expect("session handle lock poisoned")
            .clone()
            .ok_or(DriverError::NoSession)
    }

    /// Release the remote session.
    ///
    /// Idempotent: the first call deletes the remote session, subsequent
    /// calls are no-ops. The handle is relinquished even if the delete
    /// command fails, so a failed teardown is never retried against a
    /// half-dead session.
    pub async fn close(&self) -> Result<(), DriverError> {
        let id = self
            .handle
            .lock()
            .expect("session handle lock poisoned")
            .take();

        match id {
            Some(id) => {
                debug!(session = %id, "closing session");
                self.driver.delete_session(&id).await
            }
            None => Ok(()),
        }
    }

    /// Open a session, run the test body, and close on every exit path.
    ///
    /// The body's result is returned as-is; a teardown failure is logged
    /// with `tracing::warn!` and never masks it. A panicking body (a failed
    /// `assert!` included) is caught, the session is closed, and the panic
    /// is resumed.
    pub async fn run<T, F, Fut>(
        driver: Arc<dyn AutomationDriver>,
        config: SessionConfig,
        body: F,
    ) -> Result<T, DriverError>
    where
        F: FnOnce(Arc<Session>) -> Fut,
        Fut: Future<Output = Result<T, DriverError>>,
    {
        let session = Self::open(driver, config).await?;
        let outcome = AssertUnwindSafe(body(Arc::clone(&session)))
            .catch_unwind()
            .await;

        if let Err(err) = session.close().await {
            warn!(error = %err, "session teardown failed");
        }

        match outcome {
            Ok(result) => result,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Cannot issue an async delete from drop; flag the leak instead.
        if let Ok(guard) = self.handle.lock() {
            if let Some(id) = guard.as_ref() {
                warn!(session = %id, "session dropped without close; remote session may leak");
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
