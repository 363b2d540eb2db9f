use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Informational,
}

/// A legacy construct the engine left in place for a human to look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEvent {
    pub declaring_type: String,
    pub snippet: String,
    pub message: String,
    pub severity: Severity,
}

impl MappingEvent {
    pub fn informational(declaring_type: impl Into<String>, snippet: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            snippet: snippet.into(),
            message: message.into(),
            severity: Severity::Informational,
        }
    }
}

pub const MULTIPLE_MAPPINGS_POSSIBLE: &str = "Multiple mappings possible";
pub const NO_AUTOMATIC_MAPPING: &str = "No automatic mapping possible";
pub const MAPPING_MISSING: &str = "Legacy usage found but no mapping exists";
pub const TEMPLATE_FAILED: &str = "Template could not be applied";

/// Fire-and-forget receiver of mapping events. The engine never reads events back.
pub trait EventSink {
    fn record(&mut self, event: MappingEvent);
}

/// Collects events in order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MappingLog {
    events: Vec<MappingEvent>,
}

impl MappingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[MappingEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<MappingEvent> {
        self.events
    }
}

impl EventSink for MappingLog {
    fn record(&mut self, event: MappingEvent) {
        self.events.push(event);
    }
}

/// Drops every event.
pub struct Discard;

impl EventSink for Discard {
    fn record(&mut self, _event: MappingEvent) {}
}
