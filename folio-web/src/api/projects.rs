//! Catalog read endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use folio_common::content::HighlightItem;
use folio_common::render::ChapterLayout;
use serde::Serialize;

use crate::{ApiError, ApiResult, AppState};

/// One entry of the work grid
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub cover_image_url: String,
    pub chapter_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectSummary>,
    pub highlights: Vec<HighlightItem>,
}

#[derive(Debug, Serialize)]
pub struct ProjectLayoutResponse {
    pub project_id: String,
    pub title: String,
    pub chapters: Vec<ChapterLayout>,
}

/// GET /api/projects
pub async fn list_projects(State(state): State<AppState>) -> Json<ProjectListResponse> {
    let projects = state
        .catalog
        .projects()
        .iter()
        .map(|p| ProjectSummary {
            id: p.id.clone(),
            title: p.title.clone(),
            category: p.category.clone(),
            description: p.description.clone(),
            cover_image_url: p.cover_image_url.clone(),
            chapter_count: p.chapters.len(),
        })
        .collect();

    Json(ProjectListResponse {
        projects,
        highlights: state.catalog.highlights().to_vec(),
    })
}

/// GET /api/projects/:id/layout
///
/// Chapter layouts in authored order, as the modal would render them.
pub async fn get_project_layout(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<ProjectLayoutResponse>> {
    let project = state
        .catalog
        .find(&project_id)
        .ok_or_else(|| ApiError::NotFound(format!("Project {}", project_id)))?;

    Ok(Json(ProjectLayoutResponse {
        project_id: project.id.clone(),
        title: project.title.clone(),
        chapters: state.renderer.render_all(&project.chapters),
    }))
}

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects))
        .route("/api/projects/:id/layout", get(get_project_layout))
}
