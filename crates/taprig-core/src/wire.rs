//! HTTP client for W3C WebDriver / Appium automation servers.
//!
//! [`HttpDriver`] implements [`AutomationDriver`] over the WebDriver wire
//! protocol: JSON request/response bodies under a `{"value": ...}` envelope,
//! with server faults reported as W3C error codes. This is the only module
//! that knows the protocol shape; everything above it works in terms of the
//! driver trait.
//!
//! # Example
//!
//! ```no_run
//! use taprig_core::wire::HttpDriver;
//!
//! let driver = HttpDriver::new("http://localhost:4723".parse().unwrap());
//! ```

use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, debug_span, Instrument};
use url::Url;

use async_trait::async_trait;

use crate::config::SessionConfig;
use crate::driver::{AutomationDriver, DriverError, SessionId};
use crate::element::ElementRef;
use crate::locator::Locator;

/// Timeout for any single HTTP request to the server.
///
/// Generous because a find-element command may itself block server-side
/// while the device settles; the harness's own wait deadlines are enforced
/// above this layer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// W3C WebDriver client over HTTP.
///
/// Holds a connection pool; cheap to clone the underlying client via `Arc`
/// at the [`Session`](crate::session::Session) layer. One driver can serve
/// many sequential sessions, but each session's command stream must stay
/// sequential.
pub struct HttpDriver {
    http: reqwest::Client,
    base: String,
}

impl HttpDriver {
    /// Create a client targeting the given server endpoint
    /// (e.g. `http://localhost:4723`).
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: endpoint.as_str().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    /// Send a request and unwrap the W3C `value` envelope.
    ///
    /// Non-2xx responses (and 2xx bodies carrying an `error` field, which
    /// some servers emit) are mapped onto [`DriverError`] via the W3C
    /// error code.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, DriverError> {
        let response = request
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| DriverError::Transport(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| DriverError::Transport(format!("malformed response body: {e}")))?;
        let value = body.get("value").cloned().unwrap_or(Value::Null);

        if !status.is_success() || value.get("error").map_or(false, Value::is_string) {
            return Err(wire_error(&value, status.as_u16()));
        }
        Ok(value)
    }
}

/// Map a W3C error payload onto the driver error taxonomy.
fn wire_error(value: &Value, status: u16) -> DriverError {
    let code = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("no error message")
        .to_string();

    match code {
        "no such element" => DriverError::NotFound(message),
        "stale element reference" => DriverError::Stale(message),
        "session not created" => DriverError::SessionCreation(message),
        "invalid session id" => DriverError::NoSession,
        "" => DriverError::Server(format!("HTTP {status}: {message}")),
        _ => DriverError::Server(format!("{code}: {message}")),
    }
}

#[async_trait]
impl AutomationDriver for HttpDriver {
    async fn create_session(&self, config: &SessionConfig) -> Result<SessionId, DriverError> {
        let span = debug_span!("create_session", device = %config.device_id);
        async {
            let body = json!({
                "capabilities": { "alwaysMatch": config.to_capabilities() }
            });
            let value = self
                .execute(self.http.post(self.url("session")).json(&body))
                .await
                .map_err(|err| match err {
                    e @ DriverError::SessionCreation(_) => e,
                    // An unreachable endpoint is fatal to the test, not a
                    // generic transport hiccup.
                    other => DriverError::SessionCreation(other.to_string()),
                })?;

            let id = value
                .get("sessionId")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    DriverError::SessionCreation("response carried no sessionId".into())
                })?;
            debug!(session = id, "remote session created");
            Ok(SessionId::new(id))
        }
        .instrument(span)
        .await
    }

    async fn delete_session(&self, session: &SessionId) -> Result<(), DriverError> {
        let path = self.url(&format!("session/{session}"));
        self.execute(self.http.delete(path)).await?;
        Ok(())
    }

    async fn find_element(
        &self,
        session: &SessionId,
        locator: &Locator,
    ) -> Result<ElementRef, DriverError> {
        let body = json!({
            "using": locator.strategy().wire_name(),
            "value": locator.value(),
        });
        let path = self.url(&format!("session/{session}/element"));
        let value = self
            .execute(self.http.post(path).json(&body))
            .await
            .map_err(|err| match err {
                DriverError::NotFound(msg) => DriverError::NotFound(format!("{locator} ({msg})")),
                other => other,
            })?;

        serde_json::from_value(value)
            .map_err(|e| DriverError::Transport(format!("malformed element response: {e}")))
    }

    async fn click(&self, session: &SessionId, element: &ElementRef) -> Result<(), DriverError> {
        let path = self.url(&format!("session/{session}/element/{}/click", element.id()));
        self.execute(self.http.post(path).json(&json!({}))).await?;
        Ok(())
    }

    async fn send_keys(
        &self,
        session: &SessionId,
        element: &ElementRef,
        text: &str,
    ) -> Result<(), DriverError> {
        let path = self.url(&format!("session/{session}/element/{}/value", element.id()));
        self.execute(self.http.post(path).json(&json!({ "text": text })))
            .await?;
        Ok(())
    }

    async fn get_text(
        &self,
        session: &SessionId,
        element: &ElementRef,
    ) -> Result<String, DriverError> {
        let path = self.url(&format!("session/{session}/element/{}/text", element.id()));
        let value = self.execute(self.http.get(path)).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DriverError::Transport("text response was not a string".into()))
    }

    async fn page_source(&self, session: &SessionId) -> Result<String, DriverError> {
        let path = self.url(&format!("session/{session}/source"));
        let value = self.execute(self.http.get(path)).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DriverError::Transport("source response was not a string".into()))
    }

    async fn start_activity(
        &self,
        session: &SessionId,
        component: &str,
    ) -> Result<(), DriverError> {
        let span = debug_span!("start_activity", component);
        async {
            let body = json!({
                "script": "mobile: startActivity",
                "args": [{ "component": component }],
            });
            let path = self.url(&format!("session/{session}/execute/sync"));
            self.execute(self.http.post(path).json(&body)).await?;
            Ok(())
        }
        .instrument(span)
        .await
    }
}
