//! Shared test helpers for taprig-core integration tests.
//!
//! Provides [`MockDriver`], a scripted in-process automation server double:
//! elements can be registered as present immediately or appearing after a
//! number of polling rounds, clicks can be scripted to report stale
//! references, and the live remote-session count is tracked so lifecycle
//! tests can assert it returns to zero.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use taprig_core::config::SessionConfig;
use taprig_core::driver::{AutomationDriver, DriverError, SessionId};
use taprig_core::element::ElementRef;
use taprig_core::locator::Locator;

/// How a scripted element behaves across polling rounds.
struct ElementScript {
    /// Element id returned once resolved.
    id: String,
    /// The find-element round (1-based, per locator) on which the element
    /// first appears.
    appear_on_round: usize,
    /// Rounds observed so far.
    rounds: usize,
}

#[derive(Default)]
struct MockState {
    elements: HashMap<Locator, ElementScript>,
    /// Rendered text per element id.
    texts: HashMap<String, String>,
    /// Element ids that report a stale reference when acted on.
    stale: Vec<String>,
    /// Element ids clicked, in order.
    taps: Vec<String>,
    /// Text typed per element id, in order.
    typed: Vec<(String, String)>,
    /// Components launched via start_activity, in order.
    launches: Vec<String>,
}

/// Scripted automation server double.
pub struct MockDriver {
    open_sessions: AtomicUsize,
    sessions_created: AtomicUsize,
    state: Mutex<MockState>,
}

impl MockDriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            open_sessions: AtomicUsize::new(0),
            sessions_created: AtomicUsize::new(0),
            state: Mutex::new(MockState::default()),
        })
    }

    /// Register an element that is present from the first poll.
    pub fn element(&self, locator: &Locator, id: &str) {
        self.element_after(locator, id, 1);
    }

    /// Register an element that first resolves on the given (1-based)
    /// find-element round for its locator.
    pub fn element_after(&self, locator: &Locator, id: &str, appear_on_round: usize) {
        let mut state = self.state.lock().unwrap();
        state.elements.insert(
            locator.clone(),
            ElementScript {
                id: id.to_string(),
                appear_on_round,
                rounds: 0,
            },
        );
    }

    /// Script the rendered text for an element id.
    pub fn text(&self, id: &str, text: &str) {
        let mut state = self.state.lock().unwrap();
        state.texts.insert(id.to_string(), text.to_string());
    }

    /// Script an element id to report a stale reference when acted on.
    pub fn stale(&self, id: &str) {
        self.state.lock().unwrap().stale.push(id.to_string());
    }

    /// Element ids clicked so far, in order.
    pub fn taps(&self) -> Vec<String> {
        self.state.lock().unwrap().taps.clone()
    }

    /// Text typed so far, as (element id, text) pairs.
    pub fn typed(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().typed.clone()
    }

    /// Components launched so far, in order.
    pub fn launches(&self) -> Vec<String> {
        self.state.lock().unwrap().launches.clone()
    }

    /// Remote sessions currently live.
    pub fn open_session_count(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }

    /// Remote sessions ever created.
    pub fn sessions_created(&self) -> usize {
        self.sessions_created.load(Ordering::SeqCst)
    }

    fn check_stale(state: &MockState, element: &ElementRef) -> Result<(), DriverError> {
        if state.stale.iter().any(|id| id == element.id()) {
            return Err(DriverError::Stale(format!(
                "element {} is no longer attached to the UI tree",
                element.id()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AutomationDriver for MockDriver {
    async fn create_session(&self, _config: &SessionConfig) -> Result<SessionId, DriverError> {
        let n = self.sessions_created.fetch_add(1, Ordering::SeqCst) + 1;
        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(SessionId::new(format!("mock-session-{n}")))
    }

    async fn delete_session(&self, _session: &SessionId) -> Result<(), DriverError> {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_element(
        &self,
        _session: &SessionId,
        locator: &Locator,
    ) -> Result<ElementRef, DriverError> {
        let mut state = self.state.lock().unwrap();
        match state.elements.get_mut(locator) {
            Some(script) => {
                script.rounds += 1;
                if script.rounds >= script.appear_on_round {
                    Ok(ElementRef::new(script.id.clone()))
                } else {
                    Err(DriverError::NotFound(format!(
                        "element not found: {locator}"
                    )))
                }
            }
            None => Err(DriverError::NotFound(format!(
                "element not found: {locator}"
            ))),
        }
    }

    async fn click(&self, _session: &SessionId, element: &ElementRef) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        Self::check_stale(&state, element)?;
        state.taps.push(element.id().to_string());
        Ok(())
    }

    async fn send_keys(
        &self,
        _session: &SessionId,
        element: &ElementRef,
        text: &str,
    ) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        Self::check_stale(&state, element)?;
        state
            .typed
            .push((element.id().to_string(), text.to_string()));
        Ok(())
    }

    async fn get_text(
        &self,
        _session: &SessionId,
        element: &ElementRef,
    ) -> Result<String, DriverError> {
        let state = self.state.lock().unwrap();
        Self::check_stale(&state, element)?;
        state
            .texts
            .get(element.id())
            .cloned()
            .ok_or_else(|| DriverError::Server(format!("no text scripted for {}", element.id())))
    }

    async fn page_source(&self, _session: &SessionId) -> Result<String, DriverError> {
        let state = self.state.lock().unwrap();
        let nodes: String = state
            .elements
            .values()
            .map(|script| format!("<node resource-id=\"{}\"/>", script.id))
            .collect();
        Ok(format!("<hierarchy>{nodes}</hierarchy>"))
    }

    async fn start_activity(
        &self,
        _session: &SessionId,
        component: &str,
    ) -> Result<(), DriverError> {
        self.state
            .lock()
            .unwrap()
            .launches
            .push(component.to_string());
        Ok(())
    }
}

/// Stock configuration for tests; the endpoint is never dialed by the mock.
pub fn test_config() -> SessionConfig {
    SessionConfig::android_settings("http://localhost:4723".parse().unwrap())
}

/// Install the fmt subscriber once so `RUST_LOG=taprig_core=debug` surfaces
/// harness logs during test debugging. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
