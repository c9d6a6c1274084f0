//! folio-web library - portfolio site service
//!
//! Serves the landing page and project detail views, keeps a view session per
//! open page (highlight reel, modal, scroll strips, brief slot) and relays
//! brief requests to the generative text service.

pub mod api;
pub mod brief;
pub mod config;
pub mod error;
pub mod pages;
pub mod scheduler;
pub mod session;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use folio_common::content::Catalog;
use folio_common::events::EventBus;
use folio_common::render::ChapterRenderer;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::brief::{BriefGenerator, DisabledBriefGenerator, GeminiClient};
use crate::config::SiteConfig;
use crate::session::{SessionRegistry, SESSION_IDLE_TTL, SESSION_SWEEP_INTERVAL};

/// Per-receiver buffer of the event bus
pub const EVENT_BUS_CAPACITY: usize = 256;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Projects and highlight slides, fixed at startup
    pub catalog: Arc<Catalog>,
    pub renderer: ChapterRenderer,
    /// Live view sessions
    pub sessions: SessionRegistry,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    pub brief: Arc<dyn BriefGenerator>,
    /// False when no provider credential is configured
    pub brief_enabled: bool,
    pub carousel_interval: Duration,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Must be called inside a tokio runtime for idle sessions to be reaped
    pub fn new(
        catalog: Catalog,
        brief: Arc<dyn BriefGenerator>,
        brief_enabled: bool,
        carousel_interval: Duration,
    ) -> Self {
        let sessions = SessionRegistry::new();
        sessions.spawn_reaper(SESSION_IDLE_TTL, SESSION_SWEEP_INTERVAL);

        Self {
            catalog: Arc::new(catalog),
            renderer: ChapterRenderer::new(),
            sessions,
            event_bus: EventBus::new(EVENT_BUS_CAPACITY),
            brief,
            brief_enabled,
            carousel_interval,
            startup_time: Utc::now(),
        }
    }

    /// State for a resolved configuration; without a credential the brief lab
    /// is served but every generation fails
    pub fn from_config(catalog: Catalog, config: &SiteConfig) -> Self {
        let client = config.gemini_api_key.clone().and_then(|key| {
            GeminiClient::new(key, config.gemini_model.clone())
                .map_err(|e| warn!("Brief client unavailable: {}", e))
                .ok()
        });

        match client {
            Some(client) => Self::new(catalog, Arc::new(client), true, config.carousel_interval),
            None => Self::new(
                catalog,
                Arc::new(DisabledBriefGenerator),
                false,
                config.carousel_interval,
            ),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .merge(api::project_routes())
        .merge(api::session_routes())
        .merge(api::brief_routes())
        .merge(api::diagnostics_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
