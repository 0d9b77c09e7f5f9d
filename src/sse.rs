//! Server-sent event model used by the relay.
//!
//! An event is an optional name plus a text payload. Unnamed events carry
//! JSON-encoded result records; named ones carry status and terminal markers.

use axum::response::sse::Event;
use serde::Serialize;

pub const STATUS: &str = "status";
pub const ERROR: &str = "error";
pub const END: &str = "end";

pub const SEARCH_STARTED: &str = "Search started";
pub const NO_RESULTS: &str = "No results found";
pub const STREAMING_RESULTS: &str = "Streaming results";
pub const EMPTY_END: &str = "[]";
pub const END_OF_STREAM: &str = "end_of_stream";

/// One emitted search hit. `index` is 1-based emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    name: Option<&'static str>,
    data: String,
}

impl SseEvent {
    pub fn status(message: &str) -> Self {
        Self::named(STATUS, message)
    }

    pub fn end(payload: &str) -> Self {
        Self::named(END, payload)
    }

    pub fn error(message: &str) -> Self {
        Self::named(ERROR, message)
    }

    pub fn record(record: &ResultRecord) -> Result<Self, serde_json::Error> {
        Ok(SseEvent {
            name: None,
            data: serde_json::to_string(record)?,
        })
    }

    fn named(name: &'static str, data: &str) -> Self {
        // CR cannot be framed in an SSE field
        SseEvent {
            name: Some(name),
            data: data.replace("\r\n", "\n").replace('\r', "\n"),
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// `end` and `error` close a stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self.name, Some(END) | Some(ERROR))
    }

    /// Wire representation, including the blank line that closes the event.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        if let Some(name) = self.name {
            out.push_str("event: ");
            out.push_str(name);
            out.push('\n');
        }
        for line in self.data.split('\n') {
            out.push_str("data: ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

impl From<SseEvent> for Event {
    fn from(value: SseEvent) -> Self {
        let event = Event::default();
        let event = match value.name {
            Some(name) => event.event(name),
            None => event,
        };
        event.data(value.data)
    }
}
