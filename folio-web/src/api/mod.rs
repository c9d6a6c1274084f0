//! HTTP API handlers for folio-web

pub mod brief;
pub mod buildinfo;
pub mod diagnostics;
pub mod health;
pub mod projects;
pub mod sessions;
pub mod sse;
pub mod ui;

pub use brief::brief_routes;
pub use buildinfo::get_build_info;
pub use diagnostics::diagnostics_routes;
pub use health::health_routes;
pub use projects::project_routes;
pub use sessions::session_routes;
pub use sse::session_event_stream;
pub use ui::ui_routes;
