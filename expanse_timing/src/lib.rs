// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Timing: a host-agnostic timer queue keyed by id.
//!
//! [`TimerQueue`] holds at most one pending deadline per key. Scheduling a key
//! that is already pending replaces its deadline, so a burst of updates
//! coalesces into a single firing (debounce) instead of stacking duplicate work.
//!
//! The queue does not read a clock. Deadlines are plain [`Duration`]s on
//! whatever timeline the host uses, and the host asks for due keys with
//! [`TimerQueue::drain_due`]. That keeps deferred behavior deterministic in tests.
//!
//! ```rust
//! use core::time::Duration;
//! use expanse_timing::TimerQueue;
//!
//! let ms = Duration::from_millis;
//! let mut timers = TimerQueue::new();
//!
//! timers.schedule("a", ms(500));
//! timers.schedule("b", ms(200));
//! // A new update for "a" pushes its deadline out instead of adding a second timer.
//! timers.schedule("a", ms(700));
//!
//! assert_eq!(timers.next_deadline(), Some(ms(200)));
//! assert_eq!(timers.drain_due(ms(600)), ["b"]);
//! assert_eq!(timers.drain_due(ms(700)), ["a"]);
//! assert!(timers.is_empty());
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;
use core::time::Duration;

use hashbrown::HashMap;

#[derive(Clone, Copy, Debug)]
struct Pending {
    deadline: Duration,
    // Insertion order; breaks ties between equal deadlines.
    seq: u64,
}

/// A set of pending deadlines, at most one per key.
#[derive(Clone)]
pub struct TimerQueue<K> {
    pending: HashMap<K, Pending>,
    next_seq: u64,
}

impl<K: Debug> Debug for TimerQueue<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.pending.len())
            .field("next_seq", &self.next_seq)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> TimerQueue<K> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Schedules `key` to fire at `deadline`, replacing any pending deadline for it.
    ///
    /// Returns the replaced deadline.
    pub fn schedule(&mut self, key: K, deadline: Duration) -> Option<Duration> {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending
            .insert(key, Pending { deadline, seq })
            .map(|p| p.deadline)
    }

    /// Schedules `key` to fire `delay` after `now`.
    pub fn schedule_after(&mut self, key: K, now: Duration, delay: Duration) -> Option<Duration> {
        self.schedule(key, now.saturating_add(delay))
    }

    /// Cancels the pending deadline for `key`. Returns `false` if none was pending.
    pub fn cancel(&mut self, key: K) -> bool {
        self.pending.remove(&key).is_some()
    }

    /// Returns `true` if `key` has a pending deadline.
    #[must_use]
    pub fn is_scheduled(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }

    /// The pending deadline for `key`.
    #[must_use]
    pub fn deadline(&self, key: K) -> Option<Duration> {
        self.pending.get(&key).map(|p| p.deadline)
    }

    /// The earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Iterates over pending keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.pending.keys().copied()
    }

    /// Number of pending keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Cancels everything.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Removes and returns every key whose deadline is at or before `now`.
    ///
    /// Keys are ordered by deadline; equal deadlines fire in scheduling order.
    pub fn drain_due(&mut self, now: Duration) -> Vec<K> {
        let mut due: Vec<(Pending, K)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(k, p)| (*p, *k))
            .collect();
        due.sort_unstable_by_key(|(p, _)| (p.deadline, p.seq));
        for (_, key) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }
}
