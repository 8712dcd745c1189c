//! Cooperative one-shot job scheduler.
//!
//! The monitor runs on a single loop thread.  Periodic work is expressed
//! as one-shot jobs that re-post themselves, so cancelling a job is always
//! a single removal and a cancelled job can never fire.
//!
//! ```text
//!   post_delayed(Tick, now, 0) ─▶ [Tick @ t0]
//!                                     │ pop_due(t0)
//!                                     ▼
//!                               run_tick() ──▶ post_delayed(Tick, t0, period)
//!                                     │
//!                                     ▼
//!                               [Tick @ t0 + period]
//! ```
//!
//! Capacity is fixed (no heap); the monitor never has more than a couple
//! of jobs pending.

use heapless::Vec;
use log::{debug, warn};

/// Maximum pending jobs.
pub const MAX_JOBS: usize = 4;

// ═══════════════════════════════════════════════════════════════
//  Entries
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
struct Entry<J> {
    job: J,
    due_ms: u64,
    /// Insertion order, breaks ties between equal deadlines.
    seq: u64,
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

pub struct Scheduler<J: Copy + PartialEq + core::fmt::Debug> {
    entries: Vec<Entry<J>, MAX_JOBS>,
    next_seq: u64,
}

impl<J: Copy + PartialEq + core::fmt::Debug> Default for Scheduler<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J: Copy + PartialEq + core::fmt::Debug> Scheduler<J> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Run `job` once, `delay_ms` after `now_ms`.  Re-posting a pending
    /// job moves its deadline.  Returns `false` when the queue is full.
    pub fn post_delayed(&mut self, job: J, now_ms: u64, delay_ms: u64) -> bool {
        self.cancel(job);
        let entry = Entry {
            job,
            due_ms: now_ms.saturating_add(delay_ms),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        if self.entries.push(entry).is_err() {
            warn!("scheduler: queue full, dropping {:?}", job);
            return false;
        }
        debug!("scheduler: {:?} due at {} ms", job, entry.due_ms);
        true
    }

    /// Remove a pending job.  Cancelling a job that is not pending is a
    /// no-op; returns whether anything was removed.
    pub fn cancel(&mut self, job: J) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.job != job);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Remove and return the earliest job due at `now_ms`.  Jobs with the
    /// same deadline come out in posting order.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<J> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.seq))
            .map(|(i, _)| i)?;
        Some(self.entries.swap_remove(idx).job)
    }

    /// Earliest pending deadline.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.due_ms).min()
    }

    pub fn is_pending(&self, job: J) -> bool {
        self.entries.iter().any(|e| e.job == job)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
