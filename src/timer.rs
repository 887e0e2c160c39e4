//! Countdown timer state and arithmetic
//!
//! The server never ticks. A running countdown is described by the instant
//! it (virtually) started; the remaining time is derived on demand from that
//! instant and the current clock reading. Pausing freezes the remaining
//! value, and resuming shifts the start instant forward by exactly the time
//! spent paused, so `now - started_at` is always the net running time.

use std::fmt;

use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{clock::Timestamp, constants};

/// A countdown length or reading: a whole number of seconds, or no limit
///
/// On the wire this is either a bare integer or the literal string
/// `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerValue {
    /// A finite number of seconds
    Finite(u32),
    /// The countdown never expires
    Unlimited,
}

impl TimerValue {
    /// Returns the number of seconds, or `None` for [`TimerValue::Unlimited`]
    pub fn seconds(self) -> Option<u32> {
        match self {
            Self::Finite(seconds) => Some(seconds),
            Self::Unlimited => None,
        }
    }

    /// Whether this is the unlimited sentinel
    pub fn is_unlimited(self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

impl Default for TimerValue {
    fn default() -> Self {
        Self::Finite(constants::timer::DEFAULT_SECONDS)
    }
}

impl From<u32> for TimerValue {
    fn from(seconds: u32) -> Self {
        Self::Finite(seconds)
    }
}

impl fmt::Display for TimerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(seconds) => write!(f, "{seconds}s"),
            Self::Unlimited => f.write_str(UNLIMITED),
        }
    }
}

const UNLIMITED: &str = "unlimited";

impl Serialize for TimerValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Finite(seconds) => serializer.serialize_u32(*seconds),
            Self::Unlimited => serializer.serialize_str(UNLIMITED),
        }
    }
}

/// Wire representations accepted for [`TimerValue`]
#[derive(Deserialize)]
#[serde(untagged)]
enum TimerValueSerde {
    Seconds(u32),
    Text(String),
}

impl<'de> Deserialize<'de> for TimerValue {
    fn deserialize<D>(deserializer: D) -> Result<TimerValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        match TimerValueSerde::deserialize(deserializer)? {
            TimerValueSerde::Seconds(seconds) => Ok(Self::Finite(seconds)),
            TimerValueSerde::Text(text) if text == UNLIMITED => Ok(Self::Unlimited),
            TimerValueSerde::Text(text) => Err(serde::de::Error::custom(format!(
                "expected a number of seconds or \"{UNLIMITED}\", got \"{text}\""
            ))),
        }
    }
}

/// Coarse lifecycle of the countdown as shown to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    /// Options have not been shown for the current question yet
    #[display("stopped")]
    Stopped,
    /// Counting down
    #[display("running")]
    Running,
    /// Started, then paused
    #[display("paused")]
    Paused,
}

/// Reasons a timer transition was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The countdown has already been started for this question
    #[error("timer already started")]
    AlreadyStarted,
    /// The countdown is not currently running
    #[error("timer is not running")]
    NotRunning,
    /// The countdown is not currently paused
    #[error("timer is not paused")]
    NotPaused,
}

/// Countdown state for the current question
///
/// Invariants:
/// * `!started` implies `started_at` is absent and `paused` is set
/// * `started && paused` implies `paused_at` holds the pause instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Configured countdown length
    duration: TimerValue,
    /// Upper bound shown next to the countdown
    max: TimerValue,
    /// Remaining value while not running
    frozen: TimerValue,
    /// Virtual start of the countdown, rebased on every resume
    started_at: Option<Timestamp>,
    /// When the current pause began
    paused_at: Option<Timestamp>,
    started: bool,
    paused: bool,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(TimerValue::default())
    }
}

impl TimerState {
    /// Creates a stopped timer of the given length
    pub fn new(duration: TimerValue) -> Self {
        Self {
            duration,
            max: duration,
            frozen: duration,
            started_at: None,
            paused_at: None,
            started: false,
            paused: true,
        }
    }

    /// Configured countdown length
    pub fn duration(&self) -> TimerValue {
        self.duration
    }

    /// Upper bound shown next to the countdown
    pub fn max(&self) -> TimerValue {
        self.max
    }

    /// Virtual start instant, if the countdown has been started
    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    /// Start instant of the current pause, if paused after starting
    pub fn paused_at(&self) -> Option<Timestamp> {
        self.paused_at
    }

    /// Whether the countdown has been started for this question
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether the countdown is not advancing
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current lifecycle as reported in `timer-state`
    pub fn status(&self) -> TimerStatus {
        match (self.started, self.paused) {
            (false, _) => TimerStatus::Stopped,
            (true, true) => TimerStatus::Paused,
            (true, false) => TimerStatus::Running,
        }
    }

    /// Seconds left on the countdown at `now`
    ///
    /// Unlimited timers always report [`TimerValue::Unlimited`]. A paused or
    /// stopped timer reports the value frozen when it stopped advancing. A
    /// running timer counts whole elapsed seconds and never goes below zero.
    pub fn remaining(&self, now: Timestamp) -> TimerValue {
        let TimerValue::Finite(duration) = self.duration else {
            return TimerValue::Unlimited;
        };

        if self.paused {
            return self.frozen;
        }

        let Some(started_at) = self.started_at else {
            return self.frozen;
        };

        let elapsed = now.millis_since(started_at) / 1000;
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        TimerValue::Finite(duration.saturating_sub(elapsed))
    }

    /// Returns the timer to its stopped state for a new (or no) question
    ///
    /// The max is realigned with the configured duration and the frozen
    /// reading is refilled.
    pub fn stop(&mut self) {
        *self = Self::new(self.duration);
    }

    /// Starts the countdown from its full duration
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyStarted`] if the countdown was started before;
    /// a question's countdown only ever starts once.
    pub fn start(&mut self, now: Timestamp) -> Result<(), Error> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }

        self.frozen = self.duration;
        self.started_at = Some(now);
        self.paused_at = None;
        self.started = true;
        self.paused = false;

        Ok(())
    }

    /// Refills the countdown to its full duration without starting it
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyStarted`] once the countdown is under way.
    pub fn rewind(&mut self) -> Result<(), Error> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }

        self.frozen = self.duration;

        Ok(())
    }

    /// Replaces the countdown length, max and reading with `value`
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyStarted`] once the countdown is under way.
    pub fn set_duration(&mut self, value: TimerValue) -> Result<(), Error> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }

        self.duration = value;
        self.max = value;
        self.frozen = value;

        Ok(())
    }

    /// Freezes a running countdown at its current reading
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRunning`] unless the countdown is started and not
    /// already paused.
    pub fn pause(&mut self, now: Timestamp) -> Result<(), Error> {
        if !self.started || self.paused {
            return Err(Error::NotRunning);
        }

        self.frozen = self.remaining(now);
        self.paused_at = Some(now);
        self.paused = true;

        Ok(())
    }

    /// Resumes a paused countdown from the reading it was frozen at
    ///
    /// The start instant moves forward by the length of the pause, so the
    /// elapsed running time is unchanged across the pause.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotPaused`] unless the countdown is started, paused,
    /// and the pause instant is known.
    pub fn resume(&mut self, now: Timestamp) -> Result<(), Error> {
        if !self.started || !self.paused {
            return Err(Error::NotPaused);
        }

        let Some(paused_at) = self.paused_at else {
            return Err(Error::NotPaused);
        };

        let ran_for = paused_at.millis_since(self.started_at.unwrap_or_default());
        self.started_at = Some(now.saturating_sub_millis(ran_for));
        self.paused_at = None;
        self.paused = false;

        Ok(())
    }
}

/// Offset into the countdown audio cue matching a remaining reading
///
/// Lets a display joining mid-countdown start the cue at the right point.
/// Undefined for unlimited timers.
pub fn audio_offset(remaining: TimerValue) -> Option<i64> {
    remaining
        .seconds()
        .map(|seconds| constants::timer::AUDIO_CUE_SECONDS - i64::from(seconds))
}
