//! Wall-clock time sources
//!
//! Deadlines are absolute seconds from a [`Clock`], so remaining time is
//! always recomputed from "now" rather than counted down.

use chrono::Utc;
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    /// Current time in seconds
    fn now(&self) -> f64;
}

/// The real wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the world.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}
