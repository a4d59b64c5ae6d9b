//! Session configuration.
//!
//! A [`SessionConfig`] declares everything the remote automation server
//! needs to bind a session: where the server listens, which device to drive,
//! which automation backend to load, what app launches by default, and how
//! much state to reset between sessions. It is constructed once per test and
//! immutable for the session's lifetime.
//!
//! [`SessionConfig::to_capabilities`] renders the W3C
//! `capabilities.alwaysMatch` object an Appium 2 server accepts.
//!
//! # Example
//!
//! ```
//! use taprig_core::config::SessionConfig;
//!
//! let config = SessionConfig::android_settings("http://localhost:4723".parse().unwrap());
//! let caps = config.to_capabilities();
//! assert_eq!(caps["platformName"], "Android");
//! assert_eq!(caps["appium:appPackage"], "com.android.settings");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

/// How much app state the server should reset when creating a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetPolicy {
    /// Reinstall / clear app data. Slower, fully isolated.
    Full,
    /// Preserve app state between sessions. Faster, less isolated.
    None,
}

/// The application the session targets by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetApp {
    /// Android package name (e.g. `com.android.settings`).
    pub package: String,
    /// Activity launched when the session starts (e.g. `.Settings`).
    pub entry_activity: String,
}

/// Immutable per-session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Where the remote automation server listens.
    pub server_endpoint: Url,
    /// Target OS family (e.g. `Android`).
    pub platform: String,
    /// Which device or emulator to bind (e.g. `emulator-5554`).
    pub device_id: String,
    /// Which driver implementation the server should load
    /// (e.g. `UiAutomator2`).
    pub automation_backend: String,
    /// What launches by default when no explicit launch is issued.
    pub app: TargetApp,
    /// State-reset behavior between sessions.
    pub reset_policy: ResetPolicy,
}

impl SessionConfig {
    /// Configuration matching the stock Android Settings setup: local
    /// Appium server, default emulator, UiAutomator2, state preserved
    /// between sessions.
    pub fn android_settings(server_endpoint: Url) -> Self {
        Self {
            server_endpoint,
            platform: "Android".to_string(),
            device_id: "emulator-5554".to_string(),
            automation_backend: "UiAutomator2".to_string(),
            app: TargetApp {
                package: "com.android.settings".to_string(),
                entry_activity: ".Settings".to_string(),
            },
            reset_policy: ResetPolicy::None,
        }
    }

    /// Render the W3C `alwaysMatch` capabilities object for this
    /// configuration.
    ///
    /// `platformName` is the only standard capability; everything else is
    /// vendor-prefixed with `appium:` as Appium 2 requires.
    pub fn to_capabilities(&self) -> Value {
        let mut caps = json!({
            "platformName": self.platform,
            "appium:deviceName": self.device_id,
            "appium:automationName": self.automation_backend,
            "appium:appPackage": self.app.package,
            "appium:appActivity": self.app.entry_activity,
        });
        match self.reset_policy {
            ResetPolicy::None => caps["appium:noReset"] = json!(true),
            ResetPolicy::Full => caps["appium:fullReset"] = json!(true),
        }
        caps
    }
}
