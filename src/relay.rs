//! Stream translator.
//!
//! Turns one upstream search call into a paced sequence of SSE events:
//!
//! ```text
//! status: Search started
//! ├─ upstream failure ──────────────▶ error: <message>
//! ├─ zero results ─▶ status: No results found ─▶ end: []
//! └─ results ─▶ status: Streaming results
//!               ─▶ data: {record} (≤ count, paced, disconnect-checked)
//!               ─▶ end: end_of_stream
//! ```
//!
//! Exactly one terminal event (`end` or `error`) closes every stream, except
//! when the client goes away mid-stream: then emission just stops.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::RelayError;
use crate::sse::{
    EMPTY_END, END_OF_STREAM, NO_RESULTS, ResultRecord, SEARCH_STARTED, STREAMING_RESULTS,
    SseEvent,
};
use crate::upstream::{SearchParams, SearchProvider};

/// The peer is gone; nothing more can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnected;

/// Destination of a stream's events.
#[async_trait]
pub trait EventSink: Send {
    async fn send(&mut self, event: SseEvent) -> Result<(), Disconnected>;

    /// Non-blocking liveness check of the client connection.
    fn is_disconnected(&self) -> bool;
}

/// Sink feeding an HTTP response body through a bounded channel.
///
/// Once the server drops the body (client hung up) the receiver is gone and
/// the sink reports itself disconnected.
pub struct ChannelSink {
    tx: mpsc::Sender<SseEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<SseEvent>) -> Self {
        ChannelSink { tx }
    }

    pub fn channel(capacity: usize) -> (ChannelSink, mpsc::Receiver<SseEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (ChannelSink::new(tx), rx)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn send(&mut self, event: SseEvent) -> Result<(), Disconnected> {
        self.tx.send(event).await.map_err(|_| Disconnected)
    }

    fn is_disconnected(&self) -> bool {
        self.tx.is_closed()
    }
}

/// How a stream ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// All results up to `count` were sent, followed by `end: end_of_stream`.
    Completed { emitted: usize },
    /// Upstream had nothing; `end: []` was sent.
    NoResults,
    /// An `error` event was sent.
    Failed { message: String },
    /// The client left; no terminal event was sent.
    Disconnected { emitted: usize },
}

pub struct StreamTranslator {
    provider: Arc<dyn SearchProvider>,
    pacing: Duration,
}

impl StreamTranslator {
    pub fn new(provider: Arc<dyn SearchProvider>, pacing: Duration) -> Self {
        Self { provider, pacing }
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Runs one request to completion, writing every event to `sink` as it
    /// is produced. Failures become a single `error` event here and never
    /// escape to the caller.
    pub async fn stream<S>(&self, sink: &mut S, params: &SearchParams) -> StreamOutcome
    where
        S: EventSink + ?Sized,
    {
        let outcome = match self.run(sink, params).await {
            Ok(Progress::Completed { emitted }) => {
                match sink.send(SseEvent::end(END_OF_STREAM)).await {
                    Ok(()) => StreamOutcome::Completed { emitted },
                    Err(Disconnected) => StreamOutcome::Disconnected { emitted },
                }
            }
            Ok(Progress::NoResults) => StreamOutcome::NoResults,
            Ok(Progress::Disconnected { emitted }) => StreamOutcome::Disconnected { emitted },
            Err(err) => {
                let message = err.client_message();
                tracing::warn!(query = %params.query, error = %err, "search stream failed");
                match sink.send(SseEvent::error(&message)).await {
                    Ok(()) => StreamOutcome::Failed { message },
                    Err(Disconnected) => StreamOutcome::Disconnected { emitted: 0 },
                }
            }
        };

        tracing::info!(query = %params.query, ?outcome, "search stream finished");
        outcome
    }

    async fn run<S>(&self, sink: &mut S, params: &SearchParams) -> Result<Progress, RelayError>
    where
        S: EventSink + ?Sized,
    {
        if sink.send(SseEvent::status(SEARCH_STARTED)).await.is_err() {
            return Ok(Progress::Disconnected { emitted: 0 });
        }

        let results = self.provider.fetch(params).await?.into_results();
        tracing::debug!(query = %params.query, results = results.len(), "upstream returned");

        if results.is_empty() {
            if sink.send(SseEvent::status(NO_RESULTS)).await.is_err()
                || sink.send(SseEvent::end(EMPTY_END)).await.is_err()
            {
                return Ok(Progress::Disconnected { emitted: 0 });
            }
            return Ok(Progress::NoResults);
        }

        if sink.send(SseEvent::status(STREAMING_RESULTS)).await.is_err() {
            return Ok(Progress::Disconnected { emitted: 0 });
        }

        let limit = usize::try_from(params.count).unwrap_or(usize::MAX);
        let mut emitted = 0;
        for (i, result) in results.into_iter().take(limit).enumerate() {
            let record = ResultRecord {
                index: i + 1,
                title: result.title.unwrap_or_default(),
                description: result.description.unwrap_or_default(),
                url: result.url.unwrap_or_default(),
            };
            let event = SseEvent::record(&record).map_err(RelayError::Encode)?;
            if sink.send(event).await.is_err() {
                return Ok(Progress::Disconnected { emitted });
            }
            emitted += 1;

            if sink.is_disconnected() {
                tracing::debug!(query = %params.query, emitted, "client disconnected");
                return Ok(Progress::Disconnected { emitted });
            }

            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        Ok(Progress::Completed { emitted })
    }
}

/// Where the inner run stopped before the terminal event is decided.
enum Progress {
    Completed { emitted: usize },
    NoResults,
    Disconnected { emitted: usize },
}
