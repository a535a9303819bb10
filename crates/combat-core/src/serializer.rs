//! Stable dictionary serialization for events.
//!
//! Every event serializes to a mapping with a `kind` discriminator plus its
//! declared fields; enumerations render as their symbolic names. The schema
//! is additive: new fields may be appended, existing fields are never renamed
//! or retyped within a major version.

use serde_json::Value;

use crate::event::Event;

/// Converts events to and from JSON-compatible mappings.
pub struct EventSerializer;

impl EventSerializer {
    /// Serializes one event to its stable mapping.
    pub fn to_value(event: &Event) -> Result<Value, serde_json::Error> {
        serde_json::to_value(event)
    }

    /// Reconstructs an event from its mapping.
    pub fn from_value(value: Value) -> Result<Event, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Serializes a batch, preserving order.
    pub fn to_values(events: &[Event]) -> Result<Vec<Value>, serde_json::Error> {
        events.iter().map(Self::to_value).collect()
    }
}
