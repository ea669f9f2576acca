//! Event publication.
//!
//! The service hands finished events to an [`EventSink`]. Publishing is
//! fire-and-forget: sinks never block and never report failure back to the
//! caller.

use crate::config::{EventSinkKind, EventsConfig};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Destination for published events.
pub trait EventSink: Send + Sync {
    fn publish(&self, subject: &str, payload: Value);
}

/// Writes each event as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, subject: &str, payload: Value) {
        info!(subject = subject, payload = %payload, "Persona event");
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn publish(&self, _subject: &str, _payload: Value) {}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedEvent {
    pub subject: String,
    pub payload: Value,
}

/// Forwards events over an unbounded channel.
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<PublishedEvent>,
}

impl ChannelEventSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PublishedEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn publish(&self, subject: &str, payload: Value) {
        let event = PublishedEvent {
            subject: subject.to_string(),
            payload,
        };
        if self.sender.send(event).is_err() {
            warn!(subject = subject, "Event receiver closed, dropping event");
        }
    }
}

/// Sink selected by the `[events]` config section.
pub fn sink_for(config: &EventsConfig) -> Arc<dyn EventSink> {
    match config.sink {
        EventSinkKind::Log => Arc::new(TracingEventSink),
        EventSinkKind::Disabled => Arc::new(NoopEventSink),
    }
}
