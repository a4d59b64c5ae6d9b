//! Element locators for UI queries.
//!
//! A [`Locator`] is a platform-agnostic descriptor (`strategy` + `value`)
//! identifying zero or more UI nodes at query time. It is a pure value type:
//! it is not bound to any resolved node, and the same locator can be queried
//! repeatedly as the UI tree changes.
//!
//! Locators are validated at construction. A malformed locator is rejected
//! locally with [`LocatorError`] and never sent to the remote server.
//!
//! # Example
//!
//! ```
//! use taprig_core::locator::{Locator, Strategy};
//!
//! let result = Locator::id("com.android.calculator2:id/result").unwrap();
//! assert_eq!(result.strategy(), Strategy::Id);
//! assert_eq!(result.to_string(), "id=com.android.calculator2:id/result");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by locator construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// The locator value was empty or whitespace-only.
    #[error("locator value must not be empty")]
    EmptyValue,

    /// A wait over a set of locators was given no locators at all.
    #[error("locator set must not be empty")]
    EmptySet,
}

/// The query strategy the remote server should use to resolve a locator.
///
/// This is a closed set: anything outside it is rejected at construction
/// rather than at remote-call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Match by resource id (e.g. `com.android.calculator2:id/digit_1`).
    Id,
    /// Match by widget class name (e.g. `android.widget.Switch`).
    ClassName,
    /// Match by accessibility id / content description.
    AccessibilityId,
    /// Match by XPath expression over the UI tree.
    XPath,
}

impl Strategy {
    /// The WebDriver wire name for this strategy, as sent in the
    /// `using` field of a find-element request.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Strategy::Id => "id",
            Strategy::ClassName => "class name",
            Strategy::AccessibilityId => "accessibility id",
            Strategy::XPath => "xpath",
        }
    }
}

/// A validated `strategy` + `value` pair identifying UI nodes.
///
/// Immutable; equality and hashing are derived so locators can be used as
/// map keys or compared in assertions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    /// Create a locator, validating that `value` is non-empty.
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Result<Self, LocatorError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(LocatorError::EmptyValue);
        }
        Ok(Self { strategy, value })
    }

    /// Shorthand for [`Strategy::Id`].
    pub fn id(value: impl Into<String>) -> Result<Self, LocatorError> {
        Self::new(Strategy::Id, value)
    }

    /// Shorthand for [`Strategy::ClassName`].
    pub fn class_name(value: impl Into<String>) -> Result<Self, LocatorError> {
        Self::new(Strategy::ClassName, value)
    }

    /// Shorthand for [`Strategy::AccessibilityId`].
    pub fn accessibility_id(value: impl Into<String>) -> Result<Self, LocatorError> {
        Self::new(Strategy::AccessibilityId, value)
    }

    /// Shorthand for [`Strategy::XPath`].
    pub fn xpath(value: impl Into<String>) -> Result<Self, LocatorError> {
        Self::new(Strategy::XPath, value)
    }

    /// The query strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The query value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy.wire_name(), self.value)
    }
}
