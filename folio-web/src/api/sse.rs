//! Server-Sent Events for one view session
//!
//! Streams the session's events (slide changes from auto-advance, play state,
//! modal, brief pending/settled). The stream ends after `SessionClosed`.
//! A disconnected stream releases the session for cleanup.

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use folio_common::events::SiteEvent;
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::sessions::find_session;
use crate::{ApiResult, AppState};

const HEARTBEAT: Duration = Duration::from_secs(15);

/// GET /api/sessions/:id/events
pub async fn session_event_stream(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let session = find_session(&state, id).await?;
    info!(session_id = %id, "SSE client connected");

    let mut rx = state.event_bus.subscribe();
    let guard = session.attach_stream(&state.sessions);
    drop(session);

    let stream = async_stream::stream! {
        let _guard = guard;
        loop {
            tokio::select! {
                _ = tokio::time::sleep(HEARTBEAT) => {
                    debug!("SSE: Sending heartbeat");
                    yield Ok(Event::default().comment("heartbeat"));
                }

                received = rx.recv() => {
                    let event = match received {
                        Ok(event) => event,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(session_id = %id, skipped, "SSE client lagged");
                            continue;
                        }
                        Err(RecvError::Closed) => break,
                    };
                    if event.session_id() != id {
                        continue;
                    }

                    let event_type = event.event_type();
                    match serde_json::to_string(&event) {
                        Ok(event_json) => {
                            debug!("SSE: Sending {}", event_type);
                            yield Ok(Event::default().event(event_type).data(event_json));
                        }
                        Err(e) => {
                            warn!("SSE: Failed to serialize event {}: {}", event_type, e);
                        }
                    }

                    if matches!(event, SiteEvent::SessionClosed { .. }) {
                        info!(session_id = %id, "SSE stream ended");
                        break;
                    }
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(HEARTBEAT).text("heartbeat")))
}
