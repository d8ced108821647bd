//! Control messages a page can post to its controller.

use serde_json::Value;

/// The only message the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// `{ "type": "SKIP_WAITING" }`
    SkipWaiting,
}

impl ControlMessage {
    /// Recognise a control message; any other shape is `None`.
    ///
    /// Extra fields are tolerated as long as `type` matches exactly.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value.get("type").and_then(Value::as_str) {
            Some("SKIP_WAITING") => Some(Self::SkipWaiting),
            _ => None,
        }
    }
}
