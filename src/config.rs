//! Session options
//!
//! Options are supplied by the embedding process when the hub is created
//! and validated once, up front.

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{constants, state::Screen, timer::TimerValue};

/// Errors raised while building a session from options
#[derive(Error, Debug)]
pub enum Error {
    /// The options failed validation
    #[error("invalid options: {0}")]
    Invalid(#[from] garde::Report),
}

/// Validates that a finite countdown length is within bounds
fn validate_timer(value: &TimerValue) -> garde::Result {
    match value {
        TimerValue::Unlimited => Ok(()),
        TimerValue::Finite(seconds)
            if (1..=constants::timer::MAX_SECONDS).contains(seconds) =>
        {
            Ok(())
        }
        TimerValue::Finite(seconds) => Err(garde::Error::new(format!(
            "initial_timer {seconds} is outside of the bounds [1,{}]",
            constants::timer::MAX_SECONDS
        ))),
    }
}

/// Options for a presentation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Options {
    /// Countdown length until the operator changes it
    #[garde(custom(|v, _| validate_timer(v)))]
    pub initial_timer: TimerValue,
    /// Screen shown before the operator picks one
    #[garde(skip)]
    pub initial_screen: Screen,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            initial_timer: TimerValue::Finite(constants::timer::DEFAULT_SECONDS),
            initial_screen: Screen::Logo,
        }
    }
}

impl Options {
    /// Validates the options, returning them unchanged on success
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invalid`] with the validation report if any field is
    /// out of bounds.
    pub fn validated(self) -> Result<Self, Error> {
        self.validate()?;
        Ok(self)
    }
}
