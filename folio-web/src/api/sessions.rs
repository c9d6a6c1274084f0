//! View session endpoints
//!
//! A page creates one session on load and drives its highlight reel, project
//! modal and scroll strips through these routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use folio_common::carousel::CarouselSnapshot;
use folio_common::modal::Overflow;
use folio_common::scroll::{
    ScrollAffordance, ScrollDirection, ScrollMetrics, ScrollRequest, ScrollTrigger,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::session::ViewSession;
use crate::{ApiError, ApiResult, AppState};

/// POST /api/sessions request
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Page overflow value before any modal opens
    #[serde(default)]
    pub body_overflow: Overflow,
}

/// POST /api/sessions response
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub carousel: CarouselSnapshot,
    pub body_overflow: Overflow,
}

/// GET /api/sessions/:id response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub carousel: CarouselSnapshot,
    pub body_overflow: Overflow,
    pub open_project: Option<String>,
    pub brief_in_flight: bool,
}

#[derive(Debug, Serialize)]
pub struct ModalOpenResponse {
    pub project_id: String,
    pub body_overflow: Overflow,
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct ModalCloseResponse {
    pub body_overflow: Overflow,
}

/// POST /api/sessions/:id/strips/:strip_id/measure request
#[derive(Debug, Deserialize)]
pub struct MeasureRequest {
    #[serde(default = "default_trigger")]
    pub trigger: ScrollTrigger,
    pub metrics: ScrollMetrics,
}

fn default_trigger() -> ScrollTrigger {
    ScrollTrigger::Mount
}

/// POST /api/sessions/:id/strips/:strip_id/scroll request
#[derive(Debug, Deserialize)]
pub struct ScrollStripRequest {
    pub direction: ScrollDirection,
}

/// Look up a session and mark it as recently seen
pub(crate) async fn find_session(state: &AppState, id: Uuid) -> ApiResult<Arc<ViewSession>> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session {}", id)))?;
    session.touch();
    Ok(session)
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
    request: Option<Json<CreateSessionRequest>>,
) -> ApiResult<(StatusCode, Json<CreateSessionResponse>)> {
    let Json(request) = request.unwrap_or_default();
    let session = ViewSession::start(
        Uuid::new_v4(),
        state.catalog.highlights().len(),
        state.carousel_interval,
        request.body_overflow,
        state.event_bus.clone(),
    )
    .await?;

    let response = CreateSessionResponse {
        session_id: session.id(),
        carousel: session.carousel().await,
        body_overflow: request.body_overflow,
    };
    state.sessions.insert(session).await;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionStatusResponse>> {
    let session = find_session(&state, id).await?;
    Ok(Json(SessionStatusResponse {
        session_id: session.id(),
        created_at: session.created_at(),
        carousel: session.carousel().await,
        body_overflow: session.body_overflow().await,
        open_project: session.open_project_id().await,
        brief_in_flight: session.brief_in_flight(),
    }))
}

/// DELETE /api/sessions/:id
///
/// Stops the reel timer, releases any scroll lock and ends the event stream.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Session {}", id)))
    }
}

/// POST /api/sessions/:id/carousel/next
pub async fn carousel_next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CarouselSnapshot>> {
    let session = find_session(&state, id).await?;
    Ok(Json(session.next_slide().await))
}

/// POST /api/sessions/:id/carousel/prev
pub async fn carousel_prev(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CarouselSnapshot>> {
    let session = find_session(&state, id).await?;
    Ok(Json(session.prev_slide().await))
}

/// POST /api/sessions/:id/carousel/toggle
pub async fn carousel_toggle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CarouselSnapshot>> {
    let session = find_session(&state, id).await?;
    Ok(Json(session.toggle_play().await))
}

/// POST /api/sessions/:id/carousel/goto/:index
pub async fn carousel_goto(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> ApiResult<Json<CarouselSnapshot>> {
    let session = find_session(&state, id).await?;
    Ok(Json(session.go_to_slide(index).await?))
}

/// POST /api/sessions/:id/modal/:project_id
pub async fn open_modal(
    State(state): State<AppState>,
    Path((id, project_id)): Path<(Uuid, String)>,
) -> ApiResult<Json<ModalOpenResponse>> {
    let session = find_session(&state, id).await?;
    let project = state
        .catalog
        .find(&project_id)
        .ok_or_else(|| ApiError::NotFound(format!("Project {}", project_id)))?;
    let next = state.catalog.next_after(&project.id);

    let opened = session
        .open_modal(project.clone(), next, &state.renderer)
        .await;
    info!(session_id = %id, project_id = %project.id, "Project opened");

    Ok(Json(ModalOpenResponse {
        project_id: project.id.clone(),
        body_overflow: opened.body_overflow,
        html: opened.html,
    }))
}

/// DELETE /api/sessions/:id/modal
pub async fn close_modal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ModalCloseResponse>> {
    let session = find_session(&state, id).await?;
    Ok(Json(ModalCloseResponse {
        body_overflow: session.close_modal().await,
    }))
}

/// POST /api/sessions/:id/strips/:strip_id/measure
pub async fn measure_strip(
    State(state): State<AppState>,
    Path((id, strip_id)): Path<(Uuid, usize)>,
    Json(request): Json<MeasureRequest>,
) -> ApiResult<Json<ScrollAffordance>> {
    let m = request.metrics;
    let finite = m.offset.is_finite() && m.viewport_width.is_finite() && m.total_width.is_finite();
    if !finite || m.viewport_width < 0.0 || m.total_width < 0.0 {
        return Err(ApiError::BadRequest(
            "Strip metrics must be finite and widths non-negative".to_string(),
        ));
    }

    let session = find_session(&state, id).await?;
    Ok(Json(
        session.measure_strip(strip_id, request.trigger, m).await,
    ))
}

/// POST /api/sessions/:id/strips/:strip_id/scroll
pub async fn scroll_strip(
    State(state): State<AppState>,
    Path((id, strip_id)): Path<(Uuid, usize)>,
    Json(request): Json<ScrollStripRequest>,
) -> ApiResult<Json<ScrollRequest>> {
    let session = find_session(&state, id).await?;
    Ok(Json(session.scroll_strip(strip_id, request.direction).await))
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/events", get(super::session_event_stream))
        .route("/api/sessions/:id/carousel/next", post(carousel_next))
        .route("/api/sessions/:id/carousel/prev", post(carousel_prev))
        .route("/api/sessions/:id/carousel/toggle", post(carousel_toggle))
        .route("/api/sessions/:id/carousel/goto/:index", post(carousel_goto))
        .route("/api/sessions/:id/modal", axum::routing::delete(close_modal))
        .route("/api/sessions/:id/modal/:project_id", post(open_modal))
        .route("/api/sessions/:id/strips/:strip_id/measure", post(measure_strip))
        .route("/api/sessions/:id/strips/:strip_id/scroll", post(scroll_strip))
}
