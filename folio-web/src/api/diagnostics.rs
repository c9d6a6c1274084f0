//! Client diagnostics

use axum::{http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use tracing::warn;

use crate::AppState;

/// POST /api/diagnostics/media-error request
#[derive(Debug, Deserialize)]
pub struct MediaErrorReport {
    pub src: String,
    /// `img` or `video`
    #[serde(default)]
    pub kind: Option<String>,
    /// Where on the page the media sat (chapter, highlight, ...)
    #[serde(default)]
    pub context: Option<String>,
}

/// POST /api/diagnostics/media-error
///
/// The page has already hidden the element; this only records the failure.
pub async fn report_media_error(Json(report): Json<MediaErrorReport>) -> StatusCode {
    let src: String = report.src.chars().take(512).collect();
    warn!(
        src = %src,
        kind = report.kind.as_deref().unwrap_or("unknown"),
        context = report.context.as_deref().unwrap_or("unknown"),
        "Media failed to load"
    );
    StatusCode::NO_CONTENT
}

pub fn diagnostics_routes() -> Router<AppState> {
    Router::new().route("/api/diagnostics/media-error", post(report_media_error))
}
