//! Integration tests for view sessions: highlight reel, project modal,
//! scroll strips, brief slot and the session event stream

mod helpers;

use axum::http::StatusCode;
use folio_common::events::{EventBus, SiteEvent};
use folio_common::modal::Overflow;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tower::util::ServiceExt; // for `oneshot` method
use uuid::Uuid;

use folio_web::build_router;
use folio_web::session::{
    ViewSession, SESSION_IDLE_TTL, SESSION_SWEEP_INTERVAL, STREAM_RECONNECT_GRACE,
};
use helpers::{
    extract_json, json_request, setup_app, setup_state, test_request, FakeBrief, TEST_INTERVAL,
};

async fn create_session(app: &axum::Router, body_overflow: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/sessions",
            json!({ "body_overflow": body_overflow }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = extract_json(response.into_body()).await;
    json["session_id"].as_str().unwrap().to_string()
}

async fn post(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app.clone().oneshot(test_request("POST", uri)).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request("POST", uri, body))
        .await
        .unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app.clone().oneshot(test_request("GET", uri)).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[tokio::test]
async fn test_create_session_starts_playing_at_first_slide() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));

    let response = app
        .clone()
        .oneshot(test_request("POST", "/api/sessions"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = extract_json(response.into_body()).await;
    assert_eq!(json["carousel"]["active_index"], 0);
    assert_eq!(json["carousel"]["is_playing"], true);
    assert_eq!(json["carousel"]["len"], 3);
    assert_eq!(json["body_overflow"], "unset");

    let (status, health) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["active_sessions"], 1);
}

#[tokio::test]
async fn test_delete_session() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let id = create_session(&app, "auto").await;
    let uri = format!("/api/sessions/{}", id);

    let response = app
        .clone()
        .oneshot(test_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, json) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");

    let response = app.oneshot(test_request("DELETE", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let uri = format!("/api/sessions/{}/carousel/next", Uuid::new_v4());

    let (status, _) = post(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Highlight reel
// =============================================================================

#[tokio::test]
async fn test_carousel_navigation_wraps() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let id = create_session(&app, "auto").await;

    let (status, json) = post(&app, &format!("/api/sessions/{}/carousel/prev", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["active_index"], 2);
    assert_eq!(json["previous_index"], 0);
    assert_eq!(json["direction"], "backward");

    let (_, json) = post(&app, &format!("/api/sessions/{}/carousel/next", id)).await;
    assert_eq!(json["active_index"], 0);
    assert_eq!(json["previous_index"], 2);
    assert_eq!(json["direction"], "forward");
}

#[tokio::test]
async fn test_carousel_goto() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let id = create_session(&app, "auto").await;

    let (status, json) = post(&app, &format!("/api/sessions/{}/carousel/goto/2", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["active_index"], 2);
    assert_eq!(json["previous_index"], 0);

    // Jumping to the active slide changes nothing
    let (status, json) = post(&app, &format!("/api/sessions/{}/carousel/goto/2", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["active_index"], 2);
    assert_eq!(json["previous_index"], 0);

    let (status, json) = post(&app, &format!("/api/sessions/{}/carousel/goto/3", id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_carousel_toggle() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let id = create_session(&app, "auto").await;
    let uri = format!("/api/sessions/{}/carousel/toggle", id);

    let (_, json) = post(&app, &uri).await;
    assert_eq!(json["is_playing"], false);

    let (_, json) = post(&app, &uri).await;
    assert_eq!(json["is_playing"], true);
}

#[tokio::test(start_paused = true)]
async fn test_reel_auto_advances() {
    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();
    let session = ViewSession::start(Uuid::new_v4(), 3, TEST_INTERVAL, Overflow::Unset, bus)
        .await
        .unwrap();

    tokio::time::sleep(TEST_INTERVAL + Duration::from_millis(100)).await;
    assert_eq!(session.carousel().await.active_index, 1);

    match rx.recv().await.unwrap() {
        SiteEvent::SlideChanged {
            active_index,
            previous_index,
            ..
        } => {
            assert_eq!(active_index, 1);
            assert_eq!(previous_index, Some(0));
        }
        other => panic!("unexpected event {:?}", other),
    }

    tokio::time::sleep(TEST_INTERVAL).await;
    assert_eq!(session.carousel().await.active_index, 2);

    session.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_manual_navigation_restarts_interval() {
    let session = ViewSession::start(
        Uuid::new_v4(),
        3,
        TEST_INTERVAL,
        Overflow::Unset,
        EventBus::new(16),
    )
    .await
    .unwrap();

    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert_eq!(session.next_slide().await.active_index, 1);

    // The first deadline at 3500 ms has been replaced
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(session.carousel().await.active_index, 1);

    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert_eq!(session.carousel().await.active_index, 2);

    session.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_paused_and_closed_reels_stay_put() {
    let session = ViewSession::start(
        Uuid::new_v4(),
        3,
        TEST_INTERVAL,
        Overflow::Unset,
        EventBus::new(16),
    )
    .await
    .unwrap();

    session.toggle_play().await;
    tokio::time::sleep(TEST_INTERVAL * 4).await;
    assert_eq!(session.carousel().await.active_index, 0);

    session.toggle_play().await;
    session.close().await;
    tokio::time::sleep(TEST_INTERVAL * 4).await;
    assert_eq!(session.carousel().await.active_index, 0);
}

// =============================================================================
// Project modal
// =============================================================================

#[tokio::test]
async fn test_modal_locks_and_restores_overflow() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let id = create_session(&app, "auto").await;

    let (status, json) = post(&app, &format!("/api/sessions/{}/modal/2", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["project_id"], "2");
    assert_eq!(json["body_overflow"], "hidden");
    let html = json["html"].as_str().unwrap();
    assert!(html.contains("Assignor"));
    assert!(html.contains("data-open-project=\"3\""));

    let (_, status_json) = get(&app, &format!("/api/sessions/{}", id)).await;
    assert_eq!(status_json["open_project"], "2");

    let response = app
        .clone()
        .oneshot(test_request("DELETE", &format!("/api/sessions/{}/modal", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = extract_json(response.into_body()).await;
    assert_eq!(json["body_overflow"], "auto");

    let (_, status_json) = get(&app, &format!("/api/sessions/{}", id)).await;
    assert!(status_json["open_project"].is_null());
}

#[tokio::test]
async fn test_switching_projects_keeps_pre_modal_overflow() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let id = create_session(&app, "scroll").await;

    post(&app, &format!("/api/sessions/{}/modal/1", id)).await;
    let (_, json) = post(&app, &format!("/api/sessions/{}/modal/2", id)).await;
    assert_eq!(json["body_overflow"], "hidden");

    let response = app
        .clone()
        .oneshot(test_request("DELETE", &format!("/api/sessions/{}/modal", id)))
        .await
        .unwrap();
    let json = extract_json(response.into_body()).await;
    assert_eq!(json["body_overflow"], "scroll");
}

#[tokio::test]
async fn test_last_project_links_back_to_first() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let id = create_session(&app, "auto").await;

    let (status, json) = post(&app, &format!("/api/sessions/{}/modal/4", id)).await;
    assert_eq!(status, StatusCode::OK);
    let html = json["html"].as_str().unwrap();
    assert!(html.contains("Next Project"));
    assert!(html.contains("data-open-project=\"1\""));
}

#[tokio::test]
async fn test_unknown_project_modal_is_404() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let id = create_session(&app, "auto").await;

    let (status, _) = post(&app, &format!("/api/sessions/{}/modal/99", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, status_json) = get(&app, &format!("/api/sessions/{}", id)).await;
    assert_eq!(status_json["body_overflow"], "auto");
}

// =============================================================================
// Scroll strips
// =============================================================================

#[tokio::test]
async fn test_strip_affordances_follow_offset() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let id = create_session(&app, "auto").await;
    let uri = format!("/api/sessions/{}/strips/0/measure", id);

    let (status, json) = post_json(
        &app,
        &uri,
        json!({ "metrics": { "offset": 0.0, "viewport_width": 300.0, "total_width": 1000.0 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["can_scroll_left"], false);
    assert_eq!(json["can_scroll_right"], true);

    let (_, json) = post_json(
        &app,
        &uri,
        json!({
            "trigger": "scroll",
            "metrics": { "offset": 700.0, "viewport_width": 300.0, "total_width": 1000.0 }
        }),
    )
    .await;
    assert_eq!(json["can_scroll_left"], true);
    assert_eq!(json["can_scroll_right"], false);
}

#[tokio::test]
async fn test_strip_scroll_steps_by_viewport_fraction() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let id = create_session(&app, "auto").await;

    // Unmeasured strips do not move
    let (_, json) = post_json(
        &app,
        &format!("/api/sessions/{}/strips/1/scroll", id),
        json!({ "direction": "right" }),
    )
    .await;
    assert_eq!(json["delta"], 0.0);

    post_json(
        &app,
        &format!("/api/sessions/{}/strips/1/measure", id),
        json!({ "metrics": { "offset": 0.0, "viewport_width": 300.0, "total_width": 1000.0 } }),
    )
    .await;

    let (_, json) = post_json(
        &app,
        &format!("/api/sessions/{}/strips/1/scroll", id),
        json!({ "direction": "right" }),
    )
    .await;
    assert_eq!(json["delta"], 240.0);
    assert_eq!(json["behavior"], "smooth");

    let (_, json) = post_json(
        &app,
        &format!("/api/sessions/{}/strips/1/scroll", id),
        json!({ "direction": "left" }),
    )
    .await;
    assert_eq!(json["delta"], -240.0);
}

#[tokio::test]
async fn test_negative_strip_width_rejected() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let id = create_session(&app, "auto").await;

    let (status, _) = post_json(
        &app,
        &format!("/api/sessions/{}/strips/0/measure", id),
        json!({ "metrics": { "offset": 0.0, "viewport_width": -1.0, "total_width": 1000.0 } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Brief slot
// =============================================================================

#[tokio::test]
async fn test_session_brief_rejects_blank_prompt() {
    let brief = Arc::new(FakeBrief::succeeding());
    let app = setup_app(brief.clone());
    let id = create_session(&app, "auto").await;

    let (status, _) = post_json(
        &app,
        &format!("/api/sessions/{}/brief", id),
        json!({ "prompt": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(brief.calls(), 0);

    let (_, status_json) = get(&app, &format!("/api/sessions/{}", id)).await;
    assert_eq!(status_json["brief_in_flight"], false);
}

#[tokio::test]
async fn test_second_brief_while_pending_is_409() {
    let gate = Arc::new(Notify::new());
    let brief = Arc::new(FakeBrief::gated(gate.clone()));
    let app = setup_app(brief.clone());
    let id = create_session(&app, "auto").await;
    let uri = format!("/api/sessions/{}/brief", id);

    let first = tokio::spawn(
        app.clone()
            .oneshot(json_request("POST", &uri, json!({ "prompt": "walking groups" }))),
    );

    let mut pending = false;
    for _ in 0..200 {
        let (_, status_json) = get(&app, &format!("/api/sessions/{}", id)).await;
        if status_json["brief_in_flight"] == true {
            pending = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(pending, "first brief never became pending");

    let (status, json) = post_json(&app, &uri, json!({ "prompt": "another idea" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "CONFLICT");
    assert_eq!(brief.calls(), 1);

    gate.notify_one();
    let response = first.await.unwrap().unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, status_json) = get(&app, &format!("/api/sessions/{}", id)).await;
    assert_eq!(status_json["brief_in_flight"], false);
}

#[tokio::test]
async fn test_failed_session_brief_releases_slot() {
    let brief = Arc::new(FakeBrief::failing());
    let app = setup_app(brief.clone());
    let id = create_session(&app, "auto").await;
    let uri = format!("/api/sessions/{}/brief", id);

    let (status, _) = post_json(&app, &uri, json!({ "prompt": "an idea" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, _) = post_json(&app, &uri, json!({ "prompt": "an idea" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(brief.calls(), 2);
}

// =============================================================================
// Event stream
// =============================================================================

#[tokio::test]
async fn test_event_stream_relays_slide_changes() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));
    let id = create_session(&app, "auto").await;

    let response = app
        .clone()
        .oneshot(test_request("GET", &format!("/api/sessions/{}/events", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let mut body = response.into_body();

    post(&app, &format!("/api/sessions/{}/carousel/next", id)).await;

    let frame = tokio::time::timeout(Duration::from_secs(2), body.frame())
        .await
        .expect("Should receive an event")
        .expect("Stream should be open")
        .expect("Frame should be readable");
    let data = frame.into_data().expect("Should be a data frame");
    let text = String::from_utf8(data.to_vec()).unwrap();
    assert!(text.contains("event: SlideChanged"));
    assert!(text.contains("\"active_index\":1"));
}

#[tokio::test]
async fn test_event_stream_for_unknown_session_is_404() {
    let app = setup_app(Arc::new(FakeBrief::succeeding()));

    let response = app
        .oneshot(test_request(
            "GET",
            &format!("/api/sessions/{}/events", Uuid::new_v4()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Session cleanup
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_abandoned_sessions_are_reaped() {
    let state = setup_state(Arc::new(FakeBrief::succeeding()));
    let sessions = state.sessions.clone();
    let app = build_router(state);

    for _ in 0..20 {
        create_session(&app, "auto").await;
    }
    assert_eq!(sessions.len().await, 20);

    // No DELETE and no event stream: only the idle sweep can end these
    tokio::time::sleep(Duration::from_secs(3600)).await;
    assert_eq!(sessions.len().await, 0);

    let (_, health) = get(&app, "/health").await;
    assert_eq!(health["active_sessions"], 0);
}

#[tokio::test(start_paused = true)]
async fn test_active_session_survives_idle_sweep() {
    let state = setup_state(Arc::new(FakeBrief::succeeding()));
    let sessions = state.sessions.clone();
    let app = build_router(state);
    let id = create_session(&app, "auto").await;

    for _ in 0..6 {
        tokio::time::sleep(SESSION_IDLE_TTL / 2).await;
        let (status, _) = get(&app, &format!("/api/sessions/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(sessions.len().await, 1);

    tokio::time::sleep(SESSION_IDLE_TTL + SESSION_SWEEP_INTERVAL * 2).await;
    assert_eq!(sessions.len().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_open_event_stream_keeps_session_until_dropped() {
    let state = setup_state(Arc::new(FakeBrief::succeeding()));
    let sessions = state.sessions.clone();
    let app = build_router(state);
    let id = create_session(&app, "auto").await;

    let response = app
        .clone()
        .oneshot(test_request("GET", &format!("/api/sessions/{}/events", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body();

    tokio::time::sleep(Duration::from_secs(3600)).await;
    assert_eq!(sessions.len().await, 1);

    drop(body);
    tokio::time::sleep(STREAM_RECONNECT_GRACE + Duration::from_secs(1)).await;
    assert_eq!(sessions.len().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_stream_reconnect_within_grace_keeps_session() {
    let state = setup_state(Arc::new(FakeBrief::succeeding()));
    let sessions = state.sessions.clone();
    let app = build_router(state);
    let id = create_session(&app, "auto").await;
    let events = format!("/api/sessions/{}/events", id);

    let first = app
        .clone()
        .oneshot(test_request("GET", &events))
        .await
        .unwrap();
    drop(first);

    tokio::time::sleep(STREAM_RECONNECT_GRACE / 3).await;
    let second = app
        .clone()
        .oneshot(test_request("GET", &events))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    tokio::time::sleep(STREAM_RECONNECT_GRACE * 2).await;
    assert_eq!(sessions.len().await, 1);
    drop(second);
}
