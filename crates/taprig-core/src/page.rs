//! Page objects over a live session.
//!
//! [`Page`] is the shared capability set every screen object is built from:
//! locate, interact, read state. All element resolution goes through the
//! [bounded poller](crate::wait) — `locate` polls the remote UI tree for a
//! locator match until it appears or the wait deadline elapses. Nothing in
//! this module talks to the server except through the session's driver, and
//! nothing sleeps outside the poller.
//!
//! Element handles are never reused: every operation performs a fresh
//! lookup, so a handle resolved in one polling round is never acted on in
//! another. If the UI tree changes between resolving a handle and acting on
//! it, the server reports a stale reference, which is surfaced as
//! [`DriverError::Stale`] and never silently retried — retrying after an
//! invalidated reference can mask a real UI state change.
//!
//! Concrete screens implement [`Screen`], adding only named locators and
//! thin operations composed from the capabilities here:
//!
//! ```
//! use taprig_core::locator::Locator;
//! use taprig_core::page::{Page, Screen};
//!
//! struct CalculatorScreen {
//!     page: Page,
//! }
//!
//! impl Screen for CalculatorScreen {
//!     fn page(&self) -> &Page {
//!         &self.page
//!     }
//! }
//!
//! impl CalculatorScreen {
//!     fn result_locator() -> Locator {
//!         Locator::id("com.android.calculator2:id/result").unwrap()
//!     }
//! }
//! ```

use std::sync::Arc;

use tracing::{debug, debug_span, Instrument};

use crate::driver::DriverError;
use crate::element::ElementRef;
use crate::locator::{Locator, LocatorError};
use crate::session::Session;
use crate::wait::{poll, WaitSpec};

/// The capability set screen objects are built from.
///
/// Holds a session handle and the wait parameters used for every element
/// resolution. Cheap to construct; one per screen object.
#[derive(Debug, Clone)]
pub struct Page {
    session: Arc<Session>,
    wait: WaitSpec,
}

impl Page {
    /// Build a page over a session with the default wait (10 s).
    pub fn new(session: Arc<Session>) -> Self {
        Self::with_wait(session, WaitSpec::default())
    }

    /// Build a page with explicit wait parameters.
    pub fn with_wait(session: Arc<Session>, wait: WaitSpec) -> Self {
        Self { session, wait }
    }

    /// The session this page drives.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The wait parameters used for element resolution.
    pub fn wait(&self) -> &WaitSpec {
        &self.wait
    }

    /// Resolve a locator, polling until a match appears or the wait
    /// deadline elapses.
    ///
    /// The returned handle is valid only until the UI tree changes; act on
    /// it immediately and do not store it.
    pub async fn locate(&self, locator: &Locator) -> Result<ElementRef, DriverError> {
        let session = self.session.as_ref();
        let subject = locator.to_string();
        poll(&self.wait, &subject, || async move {
            let handle = session.handle()?;
            session.driver().find_element(&handle, locator).await
        })
        .await
    }

    /// Wait for any of `locators` to resolve; returns the index of the
    /// first one that matched together with its handle.
    ///
    /// Each polling round tries the locators in order; a round where none
    /// matches counts as one transient miss. Non-transient errors from any
    /// locator propagate immediately.
    pub async fn wait_for_any(
        &self,
        locators: &[Locator],
    ) -> Result<(usize, ElementRef), DriverError> {
        if locators.is_empty() {
            return Err(LocatorError::EmptySet.into());
        }

        let session = self.session.as_ref();
        let subject = locators
            .iter()
            .map(Locator::to_string)
            .collect::<Vec<_>>()
            .join(" | ");

        poll(&self.wait, &subject, || async move {
            let handle = session.handle()?;
            let mut last_miss = String::new();
            for (index, locator) in locators.iter().enumerate() {
                match session.driver().find_element(&handle, locator).await {
                    Ok(element) => return Ok((index, element)),
                    Err(err) if err.is_transient() => last_miss = err.to_string(),
                    Err(err) => return Err(err),
                }
            }
            Err(DriverError::NotFound(last_miss))
        })
        .await
    }

    /// Tap the element the locator resolves to.
    pub async fn tap(&self, locator: &Locator) -> Result<(), DriverError> {
        let span = debug_span!("tap", locator = %locator);
        async {
            let element = self.locate(locator).await?;
            let handle = self.session.handle()?;
            self.session.driver().click(&handle, &element).await
        }
        .instrument(span)
        .await
    }

    /// Type text into the element the locator resolves to.
    pub async fn type_text(&self, locator: &Locator, text: &str) -> Result<(), DriverError> {
        let span = debug_span!("type_text", locator = %locator);
        async {
            let element = self.locate(locator).await?;
            let handle = self.session.handle()?;
            self.session.driver().send_keys(&handle, &element, text).await
        }
        .instrument(span)
        .await
    }

    /// Read the rendered text of the element the locator resolves to.
    pub async fn read_text(&self, locator: &Locator) -> Result<String, DriverError> {
        let span = debug_span!("read_text", locator = %locator);
        async {
            let element = self.locate(locator).await?;
            let handle = self.session.handle()?;
            self.session.driver().get_text(&handle, &element).await
        }
        .instrument(span)
        .await
    }

    /// Launch an activity directly, bypassing on-screen navigation.
    ///
    /// Command-level success does not imply the target screen rendered;
    /// follow with [`locate`](Self::locate) or
    /// [`wait_for_any`](Self::wait_for_any) to confirm it did.
    pub async fn launch(&self, component: &str) -> Result<(), DriverError> {
        debug!(component, "launching activity");
        let handle = self.session.handle()?;
        self.session.driver().start_activity(&handle, component).await
    }

    /// Dump the full UI tree as XML. Diagnostic use only.
    pub async fn page_source(&self) -> Result<String, DriverError> {
        let handle = self.session.handle()?;
        self.session.driver().page_source(&handle).await
    }
}

/// The seam concrete screen objects implement.
///
/// A screen adds named locators and thin named operations; everything it
/// does goes through the [`Page`] it wraps.
pub trait Screen {
    /// The underlying capability set.
    fn page(&self) -> &Page;
}
