//! UI serving routes
//!
//! The landing page is composed per request from the catalog; script and
//! stylesheet are embedded at compile time.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::{pages, AppState};

const APP_JS: &str = include_str!("../../ui/app.js");
const SITE_CSS: &str = include_str!("../../ui/site.css");

/// GET /
pub async fn serve_index(State(state): State<AppState>) -> Html<String> {
    Html(pages::index_html(
        &state.catalog,
        state.carousel_interval,
        state.brief_enabled,
    ))
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// GET /static/site.css
pub async fn serve_site_css() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css")],
        SITE_CSS,
    )
        .into_response()
}

pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(serve_index))
        .route("/static/app.js", get(serve_app_js))
        .route("/static/site.css", get(serve_site_css))
}
