//! Site events and EventBus
//!
//! Events are broadcast on a tokio broadcast channel and serialized for SSE.
//! Every event belongs to one view session so streams can filter per viewer.

use crate::carousel::{CarouselSnapshot, SlideDirection};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SiteEvent {
    /// Highlight reel moved to another slide (manual or auto-advance)
    SlideChanged {
        session_id: Uuid,
        active_index: usize,
        previous_index: Option<usize>,
        direction: SlideDirection,
        is_playing: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Highlight reel paused or resumed
    PlayStateChanged {
        session_id: Uuid,
        is_playing: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A project detail view was opened
    ModalOpened {
        session_id: Uuid,
        project_id: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The project detail view was closed
    ModalClosed {
        session_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Brief generation started; the trigger control should be disabled
    BriefPending {
        session_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Brief generation settled (success or failure); re-enable the trigger
    BriefSettled {
        session_id: Uuid,
        succeeded: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// View session torn down; streams for it end
    SessionClosed {
        session_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl SiteEvent {
    pub fn slide_changed(session_id: Uuid, snapshot: &CarouselSnapshot) -> Self {
        SiteEvent::SlideChanged {
            session_id,
            active_index: snapshot.active_index,
            previous_index: snapshot.previous_index,
            direction: snapshot.direction,
            is_playing: snapshot.is_playing,
            timestamp: chrono::Utc::now(),
        }
    }

    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            SiteEvent::SlideChanged { .. } => "SlideChanged",
            SiteEvent::PlayStateChanged { .. } => "PlayStateChanged",
            SiteEvent::ModalOpened { .. } => "ModalOpened",
            SiteEvent::ModalClosed { .. } => "ModalClosed",
            SiteEvent::BriefPending { .. } => "BriefPending",
            SiteEvent::BriefSettled { .. } => "BriefSettled",
            SiteEvent::SessionClosed { .. } => "SessionClosed",
        }
    }

    pub fn session_id(&self) -> Uuid {
        match self {
            SiteEvent::SlideChanged { session_id, .. }
            | SiteEvent::PlayStateChanged { session_id, .. }
            | SiteEvent::ModalOpened { session_id, .. }
            | SiteEvent::ModalClosed { session_id, .. }
            | SiteEvent::BriefPending { session_id, .. }
            | SiteEvent::BriefSettled { session_id, .. }
            | SiteEvent::SessionClosed { session_id, .. } => *session_id,
        }
    }
}

/// Broadcast channel for [`SiteEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SiteEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per receiver
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<SiteEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// UI events are advisory: a viewer without an open stream simply misses them.
    pub fn emit_lossy(&self, event: SiteEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
