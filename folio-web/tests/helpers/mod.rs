//! Shared fixtures for folio-web integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
};
use folio_common::content::{Catalog, GeneratedBrief};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use folio_web::brief::{BriefError, BriefGenerator};
use folio_web::{build_router, AppState};

pub const TEST_INTERVAL: Duration = Duration::from_millis(3500);

/// Brief generator that records calls instead of reaching the network
#[derive(Default)]
pub struct FakeBrief {
    calls: AtomicUsize,
    fail: bool,
    /// When set, generation waits for a notification
    gate: Option<Arc<Notify>>,
}

impl FakeBrief {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BriefGenerator for FakeBrief {
    async fn generate(&self, prompt: &str) -> Result<GeneratedBrief, BriefError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(BriefError::GenerationFailed);
        }
        Ok(GeneratedBrief {
            problem: format!("Nobody has solved: {}", prompt),
            solution: "A focused mobile app".to_string(),
            persona: "Retired nurse, 68".to_string(),
            key_features: vec![
                "Group finder".to_string(),
                "Route maps".to_string(),
                "Reminders".to_string(),
                "Buddy check-ins".to_string(),
            ],
        })
    }
}

/// State over the built-in catalog and the given generator
pub fn setup_state(brief: Arc<FakeBrief>) -> AppState {
    let catalog = Catalog::builtin().expect("Built-in catalog should be valid");
    AppState::new(catalog, brief, true, TEST_INTERVAL)
}

pub fn setup_app(brief: Arc<FakeBrief>) -> axum::Router {
    build_router(setup_state(brief))
}

pub fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}
