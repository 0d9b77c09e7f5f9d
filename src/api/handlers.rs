use axum::{
    Json,
    extract::State,
    http::{HeaderName, StatusCode, header},
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
};
use futures::StreamExt;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;

use crate::relay::{ChannelSink, StreamTranslator};
use crate::upstream::SearchParams;

use super::models::SearchRequest;

/// Events buffered between the translator task and the response body.
const EVENT_BUFFER: usize = 8;

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

pub async fn search_handler(
    State(translator): State<Arc<StreamTranslator>>,
    Json(request): Json<SearchRequest>,
) -> Result<Response, (StatusCode, String)> {
    if request.query.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query cannot be empty".to_string()));
    }

    let params = SearchParams::from(request);
    tracing::info!(
        query = %params.query,
        count = params.count,
        language = %params.language,
        "search stream requested"
    );

    let (mut sink, rx) = ChannelSink::channel(EVENT_BUFFER);
    tokio::spawn(async move {
        translator.stream(&mut sink, &params).await;
    });

    let events = ReceiverStream::new(rx).map(|event| Ok::<Event, Infallible>(event.into()));

    Ok((
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
            (X_ACCEL_BUFFERING, "no"),
        ],
        Sse::new(events),
    )
        .into_response())
}
