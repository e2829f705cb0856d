//! One-shot deferred callbacks polled from the UI event loop
//!
//! Entries cannot be cancelled once scheduled. Whoever handles a fired entry
//! checks the current state first and drops it when it no longer applies.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct DeferredQueue<K> {
    pending: Vec<(Instant, K)>,
}

impl<K> Default for DeferredQueue<K> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<K> DeferredQueue<K> {
    pub fn schedule(&mut self, now: Instant, delay: Duration, kind: K) {
        self.pending.push((now + delay, kind));
    }

    /// Earliest deadline, for the event loop to sleep until
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(deadline, _)| *deadline).min()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return every entry due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(deadline, _)| *deadline <= now);
        self.pending = pending;
        due.sort_by_key(|(deadline, _)| *deadline);
        due.into_iter().map(|(_, kind)| kind).collect()
    }
}
