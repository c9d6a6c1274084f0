//! Auto-advance timer shim
//!
//! Executes the [`TimerDirective`]s produced by the carousel: at most one
//! sleeping task is armed at a time, and arming a new ticket cancels the
//! previous task. The fired callback receives the ticket it was armed with so
//! the carousel can reject stale firings.

use folio_common::carousel::{TimerDirective, TimerTicket};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ReelTimer {
    token: Option<CancellationToken>,
    armed: Option<TimerTicket>,
}

impl ReelTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket of the currently armed task, if any
    pub fn armed(&self) -> Option<TimerTicket> {
        self.armed
    }

    /// Carry out a directive; `on_fire` runs once the armed delay elapses
    /// without the task being cancelled
    pub fn apply<F, Fut>(&mut self, directive: TimerDirective, on_fire: F)
    where
        F: FnOnce(TimerTicket) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        match directive {
            TimerDirective::Schedule(ticket) => self.arm(ticket, on_fire),
            TimerDirective::Cancel => self.cancel(),
            TimerDirective::Unchanged => {}
        }
    }

    /// Cancel the armed task, if any
    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        if let Some(ticket) = self.armed.take() {
            debug!(generation = ticket.generation, "Auto-advance timer cancelled");
        }
    }

    fn arm<F, Fut>(&mut self, ticket: TimerTicket, on_fire: F)
    where
        F: FnOnce(TimerTicket) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = child.cancelled() => {}
                _ = tokio::time::sleep(ticket.delay) => {
                    on_fire(ticket).await;
                }
            }
        });

        debug!(
            generation = ticket.generation,
            delay_ms = ticket.delay.as_millis() as u64,
            "Auto-advance timer armed"
        );
        self.token = Some(token);
        self.armed = Some(ticket);
    }
}

impl Drop for ReelTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
