use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::handlers::SessionQuery;
use crate::state::AppState;

/// Server-sent progress events of one browser session.
///
/// The first event (`session`) carries the session id, minted here when the client did
/// not bring one; uploads send it back as `X-Upload-Session`. Progress follows as
/// `upload` events.
pub async fn upload_progress(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session = query
        .session
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::debug!(session = %session, "Progress subscriber connected");

    let rx = state.progress.subscribe(&session);
    let hello = stream::iter([Ok(Event::default().event("session").data(session))]);

    let updates = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default().event("upload").data(json))),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize progress event");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::debug!(skipped = n, "Progress subscriber lagged, skipping events");
            None
        }
    });

    Sse::new(hello.chain(updates)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
