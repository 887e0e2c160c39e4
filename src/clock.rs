//! Wall-clock abstraction
//!
//! Remaining time is always derived from absolute timestamps, so the only
//! thing the timer engine needs from the outside world is "what time is it
//! now". This module supplies that as a trait so tests can drive time by
//! hand.

use std::cell::Cell;

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use web_time::Instant;

/// A point in time, in milliseconds since an arbitrary clock origin
///
/// Only differences between timestamps from the same clock are meaningful.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[display("{_0}ms")]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from a millisecond count
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Returns the millisecond count
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`, zero if `earlier` is later
    pub const fn millis_since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Shifts the timestamp back by `millis`, saturating at the origin
    pub const fn saturating_sub_millis(self, millis: u64) -> Self {
        Self(self.0.saturating_sub(millis))
    }

    /// Shifts the timestamp forward by `millis`
    pub const fn saturating_add_millis(self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }
}

/// Source of monotonic timestamps
pub trait Clock {
    /// Returns the current instant
    fn now(&self) -> Timestamp;
}

/// Monotonic clock backed by the platform's steady timer
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is the moment of construction
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let elapsed = self.origin.elapsed().as_millis();
        Timestamp(u64::try_from(elapsed).unwrap_or(u64::MAX))
    }
}

/// A clock that only moves when told to
///
/// Intended for tests and for embedding the core in deterministic
/// simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Creates a clock reading `start`
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start.as_millis()),
        }
    }

    /// Moves the clock forward by `millis`
    pub fn advance_millis(&self, millis: u64) {
        self.now.set(self.now.get().saturating_add(millis));
    }

    /// Moves the clock forward by whole seconds
    pub fn advance_secs(&self, secs: u64) {
        self.advance_millis(secs.saturating_mul(1000));
    }

    /// Sets the clock to an absolute reading
    pub fn set(&self, at: Timestamp) {
        self.now.set(at.as_millis());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now.get())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
