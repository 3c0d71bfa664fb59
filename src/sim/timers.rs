//! Deferred callbacks
//!
//! Chain sub-spawns, the scheduler re-arm and the swoosh debounce all fire
//! later than they are requested. Each entry remembers the session that
//! scheduled it; the owner checks that session (and the phase) when the
//! entry comes due, so a callback outliving its session is silently dropped.

use serde::{Deserialize, Serialize};

use super::sequence::SpawnSlot;

/// Work to perform when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Deferred {
    /// A later slot of a chain batch
    ChainSpawn { slot: SpawnSlot },
    /// Issue the next batch
    Rearm,
    /// The swoosh cue finished playing
    SwooshFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerEntry {
    pub due: f64,
    pub session: u64,
    pub action: Deferred,
    seq: u64,
}

/// Pending timers, fired in due-time order (ties in scheduling order)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    entries: Vec<TimerEntry>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: f64, session: u64, action: Deferred) {
        let entry = TimerEntry {
            due,
            session,
            action,
            seq: self.next_seq,
        };
        self.next_seq += 1;

        // Insert after every entry that fires no later than this one
        let index = self.entries.partition_point(|e| e.due <= due);
        self.entries.insert(index, entry);
    }

    /// Remove and return the earliest entry due at or before `now`
    pub fn pop_due(&mut self, now: f64) -> Option<TimerEntry> {
        if self.entries.first().is_some_and(|e| e.due <= now) {
            Some(self.entries.remove(0))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &TimerEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(2.0, 1, Deferred::Rearm);
        queue.schedule(0.5, 1, Deferred::SwooshFinished);
        queue.schedule(1.0, 1, Deferred::ChainSpawn { slot: SpawnSlot::Any });

        assert!(queue.pop_due(0.4).is_none());
        assert_eq!(queue.pop_due(5.0).map(|e| e.action), Some(Deferred::SwooshFinished));
        assert_eq!(
            queue.pop_due(5.0).map(|e| e.action),
            Some(Deferred::ChainSpawn { slot: SpawnSlot::Any })
        );
        assert_eq!(queue.pop_due(5.0).map(|e| e.action), Some(Deferred::Rearm));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_keep_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(1.0, 1, Deferred::Rearm);
        queue.schedule(1.0, 2, Deferred::Rearm);
        assert_eq!(queue.pop_due(1.0).map(|e| e.session), Some(1));
        assert_eq!(queue.pop_due(1.0).map(|e| e.session), Some(2));
    }
}
