//! Brief lab endpoints

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use folio_common::content::GeneratedBrief;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::sessions::find_session;
use crate::brief::{generate_brief, validate_prompt};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct BriefRequest {
    pub prompt: String,
}

/// POST /api/brief
pub async fn create_brief(
    State(state): State<AppState>,
    Json(request): Json<BriefRequest>,
) -> ApiResult<Json<GeneratedBrief>> {
    let brief = generate_brief(state.brief.as_ref(), &request.prompt).await?;
    Ok(Json(brief))
}

/// POST /api/sessions/:id/brief
///
/// Blank prompts are rejected before the slot is claimed. While one brief is
/// pending for the session further submissions get 409.
pub async fn create_session_brief(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<BriefRequest>,
) -> ApiResult<Json<GeneratedBrief>> {
    let session = find_session(&state, id).await?;
    let prompt = validate_prompt(&request.prompt)?;

    let slot = session
        .try_begin_brief()
        .ok_or_else(|| ApiError::Conflict("A brief is already being generated".to_string()))?;

    let result = generate_brief(state.brief.as_ref(), prompt).await;
    slot.settle(result.is_ok());

    let brief = result?;
    info!(session_id = %id, "Brief delivered");
    Ok(Json(brief))
}

pub fn brief_routes() -> Router<AppState> {
    Router::new()
        .route("/api/brief", post(create_brief))
        .route("/api/sessions/:id/brief", post(create_session_brief))
}
