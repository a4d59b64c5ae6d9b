//! Automation driver trait for backend-agnostic UI automation.
//!
//! This module defines the [`AutomationDriver`] trait, the narrow command
//! set the harness needs from a remote automation server: session
//! create/delete, element resolution, click/type/read, a page-source dump,
//! and direct activity launch. The session manager and page objects are
//! written against this trait, so tests can swap the HTTP client
//! ([`HttpDriver`](crate::wire::HttpDriver)) for an in-process double.
//!
//! All errors are unified behind [`DriverError`] so consumers handle
//! failures the same way regardless of the backend. Only
//! [`DriverError::NotFound`] is transient: a missing element is an expected
//! state while the UI is still rendering, and the
//! [bounded poller](crate::wait) retries it. Everything else — a rejected
//! configuration, a stale handle, a dead session, a server fault — is
//! fail-fast.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SessionConfig;
use crate::element::ElementRef;
use crate::locator::{Locator, LocatorError};

/// Errors that can occur during automation driver operations.
#[derive(Error, Debug)]
pub enum DriverError {
    /// A locator failed local validation; never sent to the server.
    #[error("invalid locator: {0}")]
    InvalidLocator(#[from] LocatorError),

    /// The remote server rejected the session configuration.
    #[error("session creation failed: {0}")]
    SessionCreation(String),

    /// No live session backs this operation (never opened, or already
    /// closed).
    #[error("no active session")]
    NoSession,

    /// The locator matched no element in the current UI tree. The only
    /// transient error; the poller retries it.
    #[error("element not found: {0}")]
    NotFound(String),

    /// A resolved element reference was invalidated before use. Surfaced
    /// to the caller, never retried: silent retry after an invalidated
    /// reference can mask a real UI state change.
    #[error("stale element reference: {0}")]
    Stale(String),

    /// A wait deadline elapsed before the condition held.
    #[error(
        "timed out after {elapsed_ms}ms (budget {timeout_ms}ms) waiting for {subject}: {last_error}"
    )]
    WaitTimeout {
        /// What was being waited for (locator rendering or similar).
        subject: String,
        /// The configured deadline in milliseconds.
        timeout_ms: u64,
        /// Wall time actually spent before giving up.
        elapsed_ms: u64,
        /// The last transient error observed before the deadline.
        last_error: String,
    },

    /// Any other fault reported by the remote server.
    #[error("server error: {0}")]
    Server(String),

    /// The server could not be reached or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),
}

impl DriverError {
    /// Returns true if the error is an expected transient state that a
    /// bounded wait may retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, DriverError::NotFound(_))
    }
}

/// Server-issued session identifier.
///
/// Owning a `SessionId` does not own the remote session; the
/// [`Session`](crate::session::Session) manager does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a server-issued id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id, as used in command URLs.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for backend-agnostic mobile UI automation.
///
/// Implementors provide the remote command set; one sequential stream of
/// commands per session. Element handles returned by
/// [`find_element`](AutomationDriver::find_element) are valid only until
/// the UI tree changes and must not be cached across polling rounds.
#[async_trait]
pub trait AutomationDriver: Send + Sync {
    /// Create a remote session for the given configuration.
    ///
    /// Fails with [`DriverError::SessionCreation`] if the server rejects
    /// the configuration (unreachable endpoint, unknown device, invalid
    /// app reference).
    async fn create_session(&self, config: &SessionConfig) -> Result<SessionId, DriverError>;

    /// Release the remote session and all resources bound to it.
    async fn delete_session(&self, session: &SessionId) -> Result<(), DriverError>;

    /// Resolve a locator against the current UI tree.
    ///
    /// Fails with [`DriverError::NotFound`] when no node matches right now.
    async fn find_element(
        &self,
        session: &SessionId,
        locator: &Locator,
    ) -> Result<ElementRef, DriverError>;

    /// Click (tap) a resolved element.
    async fn click(&self, session: &SessionId, element: &ElementRef) -> Result<(), DriverError>;

    /// Type text into a resolved element.
    async fn send_keys(
        &self,
        session: &SessionId,
        element: &ElementRef,
        text: &str,
    ) -> Result<(), DriverError>;

    /// Read the rendered text of a resolved element.
    async fn get_text(
        &self,
        session: &SessionId,
        element: &ElementRef,
    ) -> Result<String, DriverError>;

    /// Dump the full UI tree as XML. Diagnostic use only.
    async fn page_source(&self, session: &SessionId) -> Result<String, DriverError>;

    /// Launch an activity directly, bypassing on-screen navigation.
    ///
    /// Command-level success does not imply the target screen rendered;
    /// callers must follow with an element wait.
    async fn start_activity(
        &self,
        session: &SessionId,
        component: &str,
    ) -> Result<(), DriverError>;
}
