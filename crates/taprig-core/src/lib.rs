//! # taprig-core
//!
//! Core library for Appium-backed Android UI test automation.
//!
//! This crate drives a remote WebDriver-style automation server to launch
//! activities, locate on-screen elements, perform interactions, and assert
//! rendered state. The center of it is the session lifecycle plus the
//! bounded element-resolution engine: one remote session per test with
//! guaranteed teardown, and a single timeout-bounded polling primitive that
//! every explicit wait goes through.
//!
//! ## Modules
//!
//! - [`locator`] - Validated strategy + value descriptors for UI queries
//! - [`element`] - Opaque handles to resolved UI nodes
//! - [`config`] - Per-session configuration and W3C capability rendering
//! - [`driver`] - The backend-agnostic remote command set and error taxonomy
//! - [`wire`] - HTTP WebDriver client implementing the driver trait
//! - [`wait`] - The bounded poller behind every explicit wait
//! - [`session`] - Session lifecycle with guaranteed release
//! - [`page`] - Page-object capability set built on the poller
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use taprig_core::config::SessionConfig;
//! use taprig_core::locator::Locator;
//! use taprig_core::page::Page;
//! use taprig_core::session::Session;
//! use taprig_core::wire::HttpDriver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), taprig_core::driver::DriverError> {
//!     let endpoint: url::Url = "http://localhost:4723".parse().unwrap();
//!     let driver = Arc::new(HttpDriver::new(endpoint.clone()));
//!     let config = SessionConfig::android_settings(endpoint);
//!
//!     Session::run(driver, config, |session| async move {
//!         let page = Page::new(session);
//!         page.launch("com.android.settings/.Settings$DateTimeSettingsActivity")
//!             .await?;
//!         page.locate(&Locator::class_name("android.widget.Switch")?).await?;
//!         Ok(())
//!     })
//!     .await
//! }
//! ```

pub mod config;
pub mod driver;
pub mod element;
pub mod locator;
pub mod page;
pub mod session;
pub mod wait;
pub mod wire;
