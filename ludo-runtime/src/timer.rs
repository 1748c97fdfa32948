//! Deadline-ordered pending wakes.
//!
//! The queue is tiny (the engine keeps at most one sequence pending, plus
//! whatever stale entries a cancel left behind), so a plain vector with a
//! linear scan is enough.

use ludo_core::{SeqToken, Wake};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEntry {
    pub deadline_ms: u64,
    pub token: SeqToken,
    pub wake: Wake,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<TimerEntry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline_ms: u64, token: SeqToken, wake: Wake) {
        self.entries.push(TimerEntry {
            deadline_ms,
            token,
            wake,
        });
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.deadline_ms).min()
    }

    /// Remove and return the earliest entry due at `now_ms`. Ties resolve in
    /// insertion order.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<TimerEntry> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline_ms <= now_ms)
            .min_by_key(|(i, e)| (e.deadline_ms, *i))
            .map(|(i, _)| i)?;
        Some(self.entries.remove(idx))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
