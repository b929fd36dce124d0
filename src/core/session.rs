//! Settled recomputation of derived state
//!
//! Edits arrive in bursts (a slider drag, a file being rewritten). Derived
//! state should only be recomputed once edits have been quiet for a settle
//! delay, and any recomputation issued for an older edit must be treated as
//! stale. The scheduler hands out tickets; scheduling a new edit cancels every
//! earlier ticket.
//!
//! Time is passed in by the caller, so nothing here sleeps or spawns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Handle to one scheduled recomputation
#[derive(Debug, Clone)]
pub struct RecomputeTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl RecomputeTicket {
    /// Generation this ticket was issued for
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once a newer edit was scheduled or the ticket was cancelled
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }
}

#[derive(Debug)]
struct Pending {
    ticket: RecomputeTicket,
    last_edit: Instant,
}

/// Debounces edits into settled recompute tickets
#[derive(Debug)]
pub struct RecomputeScheduler {
    settle: Duration,
    latest: Arc<AtomicU64>,
    pending: Option<Pending>,
}

impl RecomputeScheduler {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    /// Record an edit at `now`, superseding any earlier ticket
    pub fn schedule(&mut self, now: Instant) -> RecomputeTicket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let ticket = RecomputeTicket {
            generation,
            latest: Arc::clone(&self.latest),
        };
        if self.pending.is_some() {
            log::trace!("Edit superseded pending recompute (generation {})", generation - 1);
        }
        self.pending = Some(Pending {
            ticket: ticket.clone(),
            last_edit: now,
        });
        ticket
    }

    /// Whether an edit is waiting to settle
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending edit settles
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| self.settle.saturating_sub(now.saturating_duration_since(p.last_edit)))
    }

    /// Release the pending ticket once the settle delay has passed
    pub fn poll(&mut self, now: Instant) -> Option<RecomputeTicket> {
        let settled = self
            .pending
            .as_ref()
            .is_some_and(|p| now.saturating_duration_since(p.last_edit) >= self.settle);
        if !settled {
            return None;
        }
        let pending = self.pending.take()?;
        log::debug!("Recompute settled (generation {})", pending.ticket.generation);
        Some(pending.ticket)
    }

    /// Drop the pending edit and invalidate every outstanding ticket
    pub fn cancel(&mut self) {
        self.pending = None;
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}

/// A single authoritative record with explicit commit points
///
/// Reads go through [`Session::current`]; edits mark the record dirty and
/// schedule a recompute. [`Session::commit`] returns the record only when a
/// settled, still-current edit is ready.
#[derive(Debug)]
pub struct Session<T> {
    value: T,
    revision: u64,
    scheduler: RecomputeScheduler,
}

impl<T> Session<T> {
    pub fn new(value: T, settle: Duration) -> Self {
        Self {
            value,
            revision: 0,
            scheduler: RecomputeScheduler::new(settle),
        }
    }

    pub fn current(&self) -> &T {
        &self.value
    }

    /// Number of edits applied so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply an edit at `now`
    pub fn edit<F>(&mut self, now: Instant, f: F) -> RecomputeTicket
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.value);
        self.revision += 1;
        self.scheduler.schedule(now)
    }

    /// Replace the record at `now`
    pub fn replace(&mut self, now: Instant, value: T) -> RecomputeTicket {
        self.edit(now, |v| *v = value)
    }

    /// The record, if a settled edit is ready to be recomputed
    pub fn commit(&mut self, now: Instant) -> Option<&T> {
        let ticket = self.scheduler.poll(now)?;
        if ticket.is_current() {
            Some(&self.value)
        } else {
            None
        }
    }

    pub fn scheduler(&self) -> &RecomputeScheduler {
        &self.scheduler
    }
}
