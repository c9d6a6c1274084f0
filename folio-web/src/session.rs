//! Per-viewer page sessions
//!
//! Each open page gets a [`ViewSession`] holding its own highlight reel,
//! project modal, scroll strips and brief-generation slot. Carousel
//! transitions for one session are serialized behind a single async mutex,
//! and the auto-advance timer task re-enters through that same mutex.
//!
//! Sessions end on an explicit DELETE, when their last event stream goes away
//! and is not re-attached within [`STREAM_RECONNECT_GRACE`], or when the idle
//! sweep finds them untouched for longer than the TTL with no stream attached.

use chrono::{DateTime, Utc};
use folio_common::carousel::{CarouselController, CarouselSnapshot, TimerDirective, TimerTicket};
use folio_common::content::Project;
use folio_common::events::{EventBus, SiteEvent};
use folio_common::modal::{ModalController, Overflow, PageScroll};
use folio_common::render::ChapterRenderer;
use folio_common::scroll::{
    HorizontalScrollController, ScrollAffordance, ScrollDirection, ScrollMetrics, ScrollRequest,
    ScrollTrigger,
};
use folio_common::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::pages;
use crate::scheduler::ReelTimer;

/// Sessions untouched for this long with no event stream are closed
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(10 * 60);

/// How often the idle sweep runs
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Time a page has to re-open its event stream before the session is closed
pub const STREAM_RECONNECT_GRACE: Duration = Duration::from_secs(30);

/// Carousel plus the timer executing its directives
#[derive(Debug)]
pub struct Reel {
    carousel: CarouselController,
    timer: ReelTimer,
}

impl Reel {
    pub fn carousel(&self) -> &CarouselController {
        &self.carousel
    }

    pub fn armed_ticket(&self) -> Option<TimerTicket> {
        self.timer.armed()
    }
}

/// Result of opening a project
#[derive(Debug, Clone)]
pub struct OpenedModal {
    pub body_overflow: Overflow,
    pub html: String,
}

pub struct ViewSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    reel: Arc<Mutex<Reel>>,
    modal: Mutex<ModalController>,
    strips: Mutex<HashMap<usize, HorizontalScrollController>>,
    brief_in_flight: AtomicBool,
    event_bus: EventBus,
    last_seen: StdMutex<Instant>,
    attached_streams: AtomicUsize,
}

impl ViewSession {
    /// Create a session with its reel playing and first advance armed
    pub async fn start(
        id: Uuid,
        slide_count: usize,
        interval: Duration,
        body_overflow: Overflow,
        event_bus: EventBus,
    ) -> Result<Arc<Self>> {
        let carousel = CarouselController::new(slide_count, interval)?;
        let first = carousel.pending_ticket();

        let session = Arc::new(Self {
            id,
            created_at: Utc::now(),
            reel: Arc::new(Mutex::new(Reel {
                carousel,
                timer: ReelTimer::new(),
            })),
            modal: Mutex::new(ModalController::new(PageScroll::new(body_overflow))),
            strips: Mutex::new(HashMap::new()),
            brief_in_flight: AtomicBool::new(false),
            event_bus,
            last_seen: StdMutex::new(Instant::now()),
            attached_streams: AtomicUsize::new(0),
        });

        if let Some(ticket) = first {
            let mut reel = session.reel.lock().await;
            arm(&session.reel, &mut reel, TimerDirective::Schedule(ticket), id, &session.event_bus);
        }

        info!(session_id = %id, slides = slide_count, "View session started");
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Record client activity
    pub fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
    }

    /// Time since the client was last heard from
    pub fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .elapsed()
    }

    /// Number of open event streams for this session
    pub fn attached_streams(&self) -> usize {
        self.attached_streams.load(Ordering::Acquire)
    }

    /// Register an event stream; the session is released for cleanup once
    /// the returned guard and every other stream guard have dropped
    pub fn attach_stream(self: &Arc<Self>, registry: &SessionRegistry) -> StreamGuard {
        self.attached_streams.fetch_add(1, Ordering::AcqRel);
        self.touch();
        StreamGuard {
            session: Arc::clone(self),
            registry: registry.clone(),
        }
    }

    pub fn reel(&self) -> &Arc<Mutex<Reel>> {
        &self.reel
    }

    pub async fn carousel(&self) -> CarouselSnapshot {
        self.reel.lock().await.carousel.snapshot()
    }

    pub async fn next_slide(&self) -> CarouselSnapshot {
        let mut reel = self.reel.lock().await;
        let directive = reel.carousel.advance();
        self.finish_transition(&mut reel, directive)
    }

    pub async fn prev_slide(&self) -> CarouselSnapshot {
        let mut reel = self.reel.lock().await;
        let directive = reel.carousel.retreat();
        self.finish_transition(&mut reel, directive)
    }

    /// Jump to a slide; jumping to the active one leaves the timer untouched
    pub async fn go_to_slide(&self, index: usize) -> Result<CarouselSnapshot> {
        let mut reel = self.reel.lock().await;
        let directive = reel.carousel.go_to(index)?;
        Ok(self.finish_transition(&mut reel, directive))
    }

    pub async fn toggle_play(&self) -> CarouselSnapshot {
        let mut reel = self.reel.lock().await;
        let directive = reel.carousel.toggle_play();
        let snapshot = reel.carousel.snapshot();
        arm(&self.reel, &mut reel, directive, self.id, &self.event_bus);
        self.event_bus.emit_lossy(SiteEvent::PlayStateChanged {
            session_id: self.id,
            is_playing: snapshot.is_playing,
            timestamp: Utc::now(),
        });
        snapshot
    }

    fn finish_transition(&self, reel: &mut Reel, directive: TimerDirective) -> CarouselSnapshot {
        let snapshot = reel.carousel.snapshot();
        // Unchanged only comes back from a no-op jump
        if directive != TimerDirective::Unchanged {
            self.event_bus
                .emit_lossy(SiteEvent::slide_changed(self.id, &snapshot));
        }
        arm(&self.reel, reel, directive, self.id, &self.event_bus);
        snapshot
    }

    /// Open a project, locking page scroll, and render its detail view
    pub async fn open_modal(
        &self,
        project: Project,
        next: Option<&Project>,
        renderer: &ChapterRenderer,
    ) -> OpenedModal {
        let project_id = project.id.clone();
        let mut modal = self.modal.lock().await;
        modal.open(project);
        let html = modal
            .render(renderer)
            .map(|view| pages::modal_html(&view, next))
            .unwrap_or_default();
        let body_overflow = modal.page().overflow();
        drop(modal);

        self.event_bus.emit_lossy(SiteEvent::ModalOpened {
            session_id: self.id,
            project_id,
            timestamp: Utc::now(),
        });
        OpenedModal {
            body_overflow,
            html,
        }
    }

    /// Close the modal and return the restored page overflow
    pub async fn close_modal(&self) -> Overflow {
        let mut modal = self.modal.lock().await;
        let was_open = modal.is_open();
        modal.close();
        let overflow = modal.page().overflow();
        drop(modal);

        if was_open {
            self.event_bus.emit_lossy(SiteEvent::ModalClosed {
                session_id: self.id,
                timestamp: Utc::now(),
            });
        }
        overflow
    }

    pub async fn body_overflow(&self) -> Overflow {
        self.modal.lock().await.page().overflow()
    }

    pub async fn open_project_id(&self) -> Option<String> {
        self.modal
            .lock()
            .await
            .open_project()
            .map(|p| p.id.clone())
    }

    /// Re-measure one strip
    pub async fn measure_strip(
        &self,
        strip_id: usize,
        trigger: ScrollTrigger,
        metrics: ScrollMetrics,
    ) -> ScrollAffordance {
        let mut strips = self.strips.lock().await;
        strips
            .entry(strip_id)
            .or_default()
            .observe(trigger, metrics)
    }

    /// Scroll request for one strip; unmeasured strips do not move
    pub async fn scroll_strip(&self, strip_id: usize, direction: ScrollDirection) -> ScrollRequest {
        let strips = self.strips.lock().await;
        match strips.get(&strip_id) {
            Some(strip) => strip.scroll(direction),
            None => HorizontalScrollController::new().scroll(direction),
        }
    }

    /// Claim the brief slot; `None` while another brief is being generated
    pub fn try_begin_brief(self: &Arc<Self>) -> Option<BriefSlot> {
        if self
            .brief_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(session_id = %self.id, "Brief already in flight");
            return None;
        }
        self.event_bus.emit_lossy(SiteEvent::BriefPending {
            session_id: self.id,
            timestamp: Utc::now(),
        });
        Some(BriefSlot {
            session: Arc::clone(self),
            succeeded: false,
        })
    }

    pub fn brief_in_flight(&self) -> bool {
        self.brief_in_flight.load(Ordering::Acquire)
    }

    /// Stop the reel, release the scroll lock and end event streams
    pub async fn close(&self) {
        {
            let mut reel = self.reel.lock().await;
            let directive = reel.carousel.teardown();
            arm(&self.reel, &mut reel, directive, self.id, &self.event_bus);
        }
        self.modal.lock().await.close();

        self.event_bus.emit_lossy(SiteEvent::SessionClosed {
            session_id: self.id,
            timestamp: Utc::now(),
        });
        info!(session_id = %self.id, "View session closed");
    }
}

/// Pending brief marker; the in-flight flag is cleared when this drops,
/// whether generation finished, failed or the request was abandoned
pub struct BriefSlot {
    session: Arc<ViewSession>,
    succeeded: bool,
}

impl BriefSlot {
    /// Record the outcome and release the slot
    pub fn settle(mut self, succeeded: bool) {
        self.succeeded = succeeded;
    }
}

impl Drop for BriefSlot {
    fn drop(&mut self) {
        self.session.brief_in_flight.store(false, Ordering::Release);
        self.session.event_bus.emit_lossy(SiteEvent::BriefSettled {
            session_id: self.session.id,
            succeeded: self.succeeded,
            timestamp: Utc::now(),
        });
    }
}

/// Attached event stream marker
///
/// Dropping the last guard starts the reconnect grace period; if no stream
/// re-attaches in time the session is removed from the registry.
pub struct StreamGuard {
    session: Arc<ViewSession>,
    registry: SessionRegistry,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.session.touch();
        if self.session.attached_streams.fetch_sub(1, Ordering::AcqRel) != 1 {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let registry = self.registry.clone();
        let id = self.session.id;
        debug!(session_id = %id, "Last event stream detached");
        handle.spawn(async move {
            tokio::time::sleep(STREAM_RECONNECT_GRACE).await;
            if registry.remove_detached(id).await {
                info!(session_id = %id, "View session closed after its event stream went away");
            }
        });
    }
}

/// Apply a directive to the reel's timer, wiring the firing back into the reel
fn arm(
    reel_handle: &Arc<Mutex<Reel>>,
    reel: &mut Reel,
    directive: TimerDirective,
    session_id: Uuid,
    event_bus: &EventBus,
) {
    let weak = Arc::downgrade(reel_handle);
    let bus = event_bus.clone();
    reel.timer
        .apply(directive, move |ticket| fire(weak, ticket, session_id, bus));
}

async fn fire(weak: Weak<Mutex<Reel>>, ticket: TimerTicket, session_id: Uuid, bus: EventBus) {
    let Some(reel_handle) = weak.upgrade() else {
        return;
    };
    let mut reel = reel_handle.lock().await;
    let directive = reel.carousel.on_timer_fired(ticket);
    if directive == TimerDirective::Unchanged {
        return;
    }
    debug!(%session_id, active = reel.carousel.active_index(), "Auto-advanced highlight reel");
    bus.emit_lossy(SiteEvent::slide_changed(session_id, &reel.carousel.snapshot()));
    arm(&reel_handle, &mut reel, directive, session_id, &bus);
}

/// Registry of live sessions keyed by id
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<ViewSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: Arc<ViewSession>) {
        self.sessions.write().await.insert(session.id(), session);
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<ViewSession>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Remove and close a session; `false` if it did not exist
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(session) => {
                session.close().await;
                true
            }
            None => false,
        }
    }

    /// Remove and close a session that has no event stream attached
    pub async fn remove_detached(&self, id: Uuid) -> bool {
        let removed = {
            let mut sessions = self.sessions.write().await;
            let detached = sessions
                .get(&id)
                .is_some_and(|session| session.attached_streams() == 0);
            if detached {
                sessions.remove(&id)
            } else {
                None
            }
        };
        match removed {
            Some(session) => {
                session.close().await;
                true
            }
            None => false,
        }
    }

    /// Close sessions idle for at least `ttl` with no event stream attached;
    /// returns how many were closed
    pub async fn reap_idle(&self, ttl: Duration) -> usize {
        let stale: Vec<Arc<ViewSession>> = {
            let mut sessions = self.sessions.write().await;
            let ids: Vec<Uuid> = sessions
                .values()
                .filter(|s| s.attached_streams() == 0 && s.idle_for() >= ttl)
                .map(|s| s.id())
                .collect();
            ids.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        for session in &stale {
            session.close().await;
        }
        if !stale.is_empty() {
            info!(count = stale.len(), "Reaped idle view sessions");
        }
        stale.len()
    }

    /// Run the idle sweep every `period` until every registry handle is gone
    pub fn spawn_reaper(&self, ttl: Duration, period: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime; idle view sessions will not be reaped");
            return;
        };
        let weak = Arc::downgrade(&self.sessions);
        handle.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(sessions) = weak.upgrade() else {
                    debug!("Session registry dropped; idle sweep stopped");
                    break;
                };
                SessionRegistry { sessions }.reap_idle(ttl).await;
            }
        });
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Close every session (server shutdown)
    pub async fn close_all(&self) {
        let drained: Vec<_> = self.sessions.write().await.drain().map(|(_, s)| s).collect();
        for session in drained {
            session.close().await;
        }
    }
}
