//! Resolved element handles.
//!
//! An [`ElementRef`] is an opaque handle to a UI node that the remote server
//! resolved from a locator. It is valid only until the UI tree changes; the
//! server may invalidate it silently. Handles are therefore produced and
//! consumed within a single page-object operation and never cached across
//! polling rounds.

use serde::{Deserialize, Serialize};

/// The W3C WebDriver JSON key carrying an element id in responses.
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Opaque handle to a resolved remote UI node.
///
/// Serializes to/from the W3C element representation
/// `{"element-6066-11e4-a52e-4f735466cecf": "<id>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
    /// The server-assigned element id.
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    id: String,
}

impl ElementRef {
    /// Wrap a server-assigned element id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The raw element id, as used in command URLs.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for ElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}
