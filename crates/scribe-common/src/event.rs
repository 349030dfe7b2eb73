use serde::{Deserialize, Serialize};
use std::fmt;

/// A single recognized occurrence in the driver log.
///
/// Events are produced one line at a time and consumed immediately by the
/// correlation engine. They are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum ExtractedEvent {
    /// An XPath locator was sent to the driver (usually a find-element request).
    LocatorDiscovered(String),
    /// The driver answered with an element reference.
    ElementBound(String),
    /// `/element/<id>/click`
    InteractionClick(String),
    /// `/element/<id>/value`, the element about to receive typed text.
    InteractionValueTarget(String),
    /// The text payload of a send-keys request.
    InteractionText(String),
}

impl ExtractedEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractedEvent::LocatorDiscovered(_) => "locator",
            ExtractedEvent::ElementBound(_) => "element",
            ExtractedEvent::InteractionClick(_) => "click",
            ExtractedEvent::InteractionValueTarget(_) => "value",
            ExtractedEvent::InteractionText(_) => "text",
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            ExtractedEvent::LocatorDiscovered(s)
            | ExtractedEvent::ElementBound(s)
            | ExtractedEvent::InteractionClick(s)
            | ExtractedEvent::InteractionValueTarget(s)
            | ExtractedEvent::InteractionText(s) => s,
        }
    }
}

impl fmt::Display for ExtractedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.payload())
    }
}
