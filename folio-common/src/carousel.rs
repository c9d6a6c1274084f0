//! Highlight reel carousel state
//!
//! Transitions are pure: each one returns a [`TimerDirective`] telling the
//! host what to do with the auto-advance timer. The controller tracks the one
//! ticket it considers pending, so the host can arm a single timer per ticket
//! and stale firings are ignored.
//!
//! Invariant: while playing exactly one ticket is pending, while paused none.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Identifies one scheduled auto-advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerTicket {
    pub generation: u64,
    #[serde(with = "duration_ms")]
    pub delay: Duration,
}

/// What the host must do with its timer after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerDirective {
    /// Cancel any armed timer and arm this ticket
    Schedule(TimerTicket),
    /// Cancel any armed timer
    Cancel,
    /// Leave the timer alone
    Unchanged,
}

/// Direction of the last slide change (drives the exit transition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideDirection {
    Forward,
    Backward,
}

/// Serializable view of the carousel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarouselSnapshot {
    pub active_index: usize,
    pub previous_index: Option<usize>,
    pub is_playing: bool,
    pub direction: SlideDirection,
    pub len: usize,
}

#[derive(Debug, Clone)]
pub struct CarouselController {
    len: usize,
    active_index: usize,
    previous_index: Option<usize>,
    direction: SlideDirection,
    is_playing: bool,
    interval: Duration,
    generation: u64,
    pending: Option<TimerTicket>,
}

impl CarouselController {
    /// New carousel at slide 0, playing, with its first ticket pending
    pub fn new(len: usize, interval: Duration) -> Result<Self> {
        if len == 0 {
            return Err(Error::InvalidInput(
                "Carousel needs at least one item".to_string(),
            ));
        }
        let mut controller = Self {
            len,
            active_index: 0,
            previous_index: None,
            direction: SlideDirection::Forward,
            is_playing: true,
            interval,
            generation: 0,
            pending: None,
        };
        controller.reschedule();
        Ok(controller)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn previous_index(&self) -> Option<usize> {
        self.previous_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticket the host should have armed, if any
    pub fn pending_ticket(&self) -> Option<TimerTicket> {
        self.pending
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            active_index: self.active_index,
            previous_index: self.previous_index,
            is_playing: self.is_playing,
            direction: self.direction,
            len: self.len,
        }
    }

    /// Move to the next slide, wrapping to the first
    pub fn advance(&mut self) -> TimerDirective {
        let next = (self.active_index + 1) % self.len;
        self.move_to(next, SlideDirection::Forward)
    }

    /// Move to the previous slide, wrapping to the last
    pub fn retreat(&mut self) -> TimerDirective {
        let prev = (self.active_index + self.len - 1) % self.len;
        self.move_to(prev, SlideDirection::Backward)
    }

    /// Jump to a slide. Jumping to the active slide changes nothing and keeps
    /// the pending timer.
    pub fn go_to(&mut self, index: usize) -> Result<TimerDirective> {
        if index >= self.len {
            return Err(Error::InvalidInput(format!(
                "Slide {} out of range (0..{})",
                index, self.len
            )));
        }
        if index == self.active_index {
            return Ok(TimerDirective::Unchanged);
        }
        let direction = if index > self.active_index {
            SlideDirection::Forward
        } else {
            SlideDirection::Backward
        };
        Ok(self.move_to(index, direction))
    }

    /// Flip between playing and paused
    pub fn toggle_play(&mut self) -> TimerDirective {
        self.is_playing = !self.is_playing;
        debug!(playing = self.is_playing, "Carousel play state toggled");
        self.reschedule()
    }

    /// Handle an auto-advance firing. Only the pending ticket advances the
    /// reel; anything else is stale and ignored.
    pub fn on_timer_fired(&mut self, ticket: TimerTicket) -> TimerDirective {
        if self.pending != Some(ticket) {
            debug!(generation = ticket.generation, "Ignoring stale carousel timer");
            return TimerDirective::Unchanged;
        }
        self.pending = None;
        self.advance()
    }

    /// Drop the pending ticket; the host must cancel its timer
    pub fn teardown(&mut self) -> TimerDirective {
        self.pending = None;
        TimerDirective::Cancel
    }

    fn move_to(&mut self, index: usize, direction: SlideDirection) -> TimerDirective {
        self.previous_index = Some(self.active_index);
        self.active_index = index;
        self.direction = direction;
        debug!(
            from = self.previous_index,
            to = self.active_index,
            "Carousel slide changed"
        );
        self.reschedule()
    }

    fn reschedule(&mut self) -> TimerDirective {
        if self.is_playing {
            self.generation += 1;
            let ticket = TimerTicket {
                generation: self.generation,
                delay: self.interval,
            };
            self.pending = Some(ticket);
            TimerDirective::Schedule(ticket)
        } else {
            self.pending = None;
            TimerDirective::Cancel
        }
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}
