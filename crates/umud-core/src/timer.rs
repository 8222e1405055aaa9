//! Cancellable one-shot timers
//!
//! Timer payloads are plain data. Whoever drains the queue decides what a
//! fired [`TimerEvent`] means, which keeps the queue free of callbacks
//! that could capture game state.

use crate::{EntityId, StatusKind};
use serde::{Deserialize, Serialize};

/// Handle returned by [`TimerQueue::delay`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// What a timer does when it fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// An actor's status deadline has been reached
    StatusExpired { actor: EntityId, kind: StatusKind },
}

#[derive(Debug, Clone)]
struct Scheduled {
    handle: TimerHandle,
    due: f64,
    event: TimerEvent,
    durable: bool,
}

/// Pending timers ordered by due time
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    next_handle: u64,
    scheduled: Vec<Scheduled>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire `seconds` after `now`
    pub fn delay(&mut self, now: f64, seconds: f64, event: TimerEvent, durable: bool) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.scheduled.push(Scheduled {
            handle,
            due: now + seconds.max(0.0),
            event,
            durable,
        });
        // stable: equal deadlines fire in arming order
        self.scheduled.sort_by(|a, b| a.due.total_cmp(&b.due));
        handle
    }

    /// Cancel a pending timer. Returns false if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.scheduled.len();
        self.scheduled.retain(|s| s.handle != handle);
        self.scheduled.len() != before
    }

    /// Whether a timer is still waiting to fire
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.scheduled.iter().any(|s| s.handle == handle)
    }

    /// Earliest pending deadline
    pub fn next_due(&self) -> Option<f64> {
        self.scheduled.first().map(|s| s.due)
    }

    /// Remove and return every timer due at or before `now`
    pub fn pop_due(&mut self, now: f64) -> Vec<(TimerHandle, TimerEvent)> {
        let split = self.scheduled.partition_point(|s| s.due <= now);
        self.scheduled
            .drain(..split)
            .map(|s| (s.handle, s.event))
            .collect()
    }

    /// Pending timers flagged durable, in deadline order
    pub fn durable(&self) -> impl Iterator<Item = (TimerHandle, f64, &TimerEvent)> {
        self.scheduled
            .iter()
            .filter(|s| s.durable)
            .map(|s| (s.handle, s.due, &s.event))
    }

    pub fn len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expired(actor: u64) -> TimerEvent {
        TimerEvent::StatusExpired {
            actor: EntityId::new(actor),
            kind: StatusKind::busy(),
        }
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.delay(0.0, 5.0, expired(1), false);
        timers.delay(0.0, 2.0, expired(2), false);
        timers.delay(1.0, 1.0, expired(3), false);
        assert_eq!(timers.next_due(), Some(2.0));

        let fired: Vec<_> = timers.pop_due(2.0).into_iter().map(|(_, e)| e).collect();
        assert_eq!(fired, vec![expired(2), expired(3)]);
        assert_eq!(timers.len(), 1);
        assert!(timers.pop_due(4.9).is_empty());
        assert_eq!(timers.pop_due(5.0).len(), 1);
    }

    #[test]
    fn test_cancel_after_fire_is_harmless() {
        let mut timers = TimerQueue::new();
        let handle = timers.delay(0.0, 1.0, expired(1), false);
        assert!(timers.is_pending(handle));
        assert_eq!(timers.pop_due(1.0).len(), 1);
        assert!(!timers.cancel(handle));
        assert!(!timers.is_pending(handle));
    }

    #[test]
    fn test_cancel_pending() {
        let mut timers = TimerQueue::new();
        let handle = timers.delay(0.0, 1.0, expired(1), false);
        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));
        assert!(timers.pop_due(10.0).is_empty());
    }

    #[test]
    fn test_durable_filter() {
        let mut timers = TimerQueue::new();
        timers.delay(0.0, 3.0, expired(1), true);
        timers.delay(0.0, 3.0, expired(2), false);
        let durable: Vec<_> = timers.durable().map(|(_, due, e)| (due, e.clone())).collect();
        assert_eq!(durable, vec![(3.0, expired(1))]);
    }
}
